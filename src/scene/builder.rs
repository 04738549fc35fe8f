use crate::{
    assets::library::{MediaAsset, MediaType},
    editor::project::Background,
    foundation::core::{Canvas, Rgba8},
    scene::nodes::{
        BlurBackgroundNode, ContentNode, MediaNode, RenderTree, SceneNode, TextNode, TimeWindow,
    },
    timeline::model::{Element, ElementKind, TextContent, Track, TrackKind},
};

/// Which end of the track list paints on top.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintOrder {
    /// Tracks paint in model order; the last track ends up on top.
    #[default]
    LastTrackOnTop,
    /// Tracks paint in reverse model order; the first track ends up on top.
    FirstTrackOnTop,
}

/// Everything the composer reads.
#[derive(Clone, Copy, Debug)]
pub struct SceneParams<'a> {
    pub tracks: &'a [Track],
    pub media: &'a [MediaAsset],
    pub duration: f64,
    pub canvas: Canvas,
    pub background: &'a Background,
    /// Used when a blur background carries no intensity of its own.
    pub default_blur_intensity: f64,
    pub paint_order: PaintOrder,
}

/// Build the render tree for the given inputs. Pure: no I/O and no failure modes.
///
/// Elements without a positive effective duration, hidden elements, audio elements, elements on
/// muted media/audio tracks and elements whose media asset is missing are left out.
#[tracing::instrument(skip_all, fields(tracks = params.tracks.len(), media = params.media.len()))]
pub fn build_scene(params: &SceneParams<'_>) -> RenderTree {
    let mut ordered: Vec<&Track> = params.tracks.iter().collect();
    if params.paint_order == PaintOrder::FirstTrackOnTop {
        ordered.reverse();
    }

    let content: Vec<ContentNode> = ordered
        .into_iter()
        .filter(|track| !(track.muted && track.kind != TrackKind::Text))
        .flat_map(|track| track.elements.iter())
        .filter_map(|el| content_node(el, params))
        .collect();

    let mut children = Vec::with_capacity(content.len() + 1);
    let background = match params.background {
        Background::Blur { blur_intensity } => {
            let blur_intensity = blur_intensity
                .filter(|b| b.is_finite() && *b >= 0.0)
                .unwrap_or(params.default_blur_intensity);
            children.push(SceneNode::BlurBackground(BlurBackgroundNode {
                blur_intensity,
                content: content.clone(),
            }));
            None
        }
        Background::Color { .. } => params.background.fill().ok().flatten(),
    };
    children.extend(content.into_iter().map(SceneNode::Content));

    tracing::debug!(nodes = children.len(), "scene built");
    RenderTree {
        duration: params.duration,
        canvas: params.canvas,
        background,
        children,
    }
}

fn content_node(el: &Element, params: &SceneParams<'_>) -> Option<ContentNode> {
    if el.effective_duration() <= 0.0 || el.kind.is_hidden() {
        return None;
    }
    let window = TimeWindow {
        start: el.start_time,
        end: el.end_time(),
    };
    match &el.kind {
        ElementKind::Video { media_id, .. } | ElementKind::Image { media_id, .. } => {
            let asset = params.media.iter().find(|m| &m.id == media_id)?;
            let node = MediaNode {
                element_id: el.id.clone(),
                asset: asset.clone(),
                window,
                trim_start: el.trim_start,
            };
            match asset.kind {
                MediaType::Video => Some(ContentNode::Video(node)),
                MediaType::Image => Some(ContentNode::Image(node)),
                MediaType::Audio => None,
            }
        }
        ElementKind::Text(text) => Some(ContentNode::Text(text_node(el, text, window, params.canvas))),
        ElementKind::Audio { .. } => None,
    }
}

fn text_node(el: &Element, text: &TextContent, window: TimeWindow, canvas: Canvas) -> TextNode {
    let opacity = text.opacity.clamp(0.0, 1.0);
    let color = Rgba8::parse(&text.color)
        .unwrap_or(Rgba8::WHITE)
        .with_opacity(opacity);
    let background = Rgba8::parse(&text.background_color)
        .ok()
        .filter(|c| !c.is_transparent())
        .map(|c| c.with_opacity(opacity));
    let center = canvas.center();
    TextNode {
        element_id: el.id.clone(),
        window,
        text: text.clone(),
        position: kurbo::Point::new(center.x + text.x, center.y + text.y),
        color,
        background,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/builder.rs"]
mod tests;
