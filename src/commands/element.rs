use std::collections::HashSet;

use crate::{
    commands::{Command, CommandContext, ElementRef, Snapshot, lookup_element, map_element, track_index},
    foundation::{
        core::{Canvas, Fps},
        error::{ReelError, ReelResult},
        ids::generate_id,
    },
    timeline::{
        model::{Element, ElementKind},
        validate::{
            validate_element_timing, validate_element_track_compatibility,
            validate_required_fields,
        },
    },
};

/// Add an element to a track.
///
/// When it is the first element on an empty timeline and is visual media, the project canvas
/// takes the asset's native size and a video's frame rate becomes the project rate. Undo restores
/// the tracks only; project settings keep the derived values.
#[derive(Debug)]
pub struct AddElement {
    track_id: String,
    element: Element,
    snapshot: Snapshot,
}

impl AddElement {
    pub fn new(track_id: impl Into<String>, mut element: Element) -> Self {
        element.id = generate_id();
        Self {
            track_id: track_id.into(),
            element,
            snapshot: Snapshot::default(),
        }
    }

    pub fn element_id(&self) -> &str {
        &self.element.id
    }
}

impl Command for AddElement {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        let element = &self.element;
        let track_id = self.track_id.as_str();
        let mut is_first = false;
        self.snapshot.apply(ctx, |tracks| {
            let ti = track_index(tracks, track_id)?;
            validate_element_track_compatibility(element, &tracks[ti]).into_result()?;
            validate_required_fields(element)?;
            validate_element_timing(element)?;
            is_first = tracks.iter().all(|t| t.elements.is_empty());
            let mut next = tracks.to_vec();
            next[ti].elements.push(element.clone());
            Ok(next)
        })?;

        if is_first {
            adopt_media_geometry(ctx, &self.element);
        }
        Ok(())
    }

    fn undo(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        self.snapshot.restore(ctx)
    }

    fn description(&self) -> String {
        format!("Add {} element", self.element.kind.type_name())
    }
}

fn adopt_media_geometry(ctx: &CommandContext<'_>, element: &Element) {
    let media_id = match &element.kind {
        ElementKind::Video { media_id, .. } | ElementKind::Image { media_id, .. } => media_id,
        _ => return,
    };
    let Some(asset) = ctx.media.media_asset(media_id) else {
        return;
    };
    let canvas = asset
        .dimensions()
        .and_then(|(w, h)| Canvas::new(w, h).ok());
    let fps = match (&element.kind, asset.fps) {
        (ElementKind::Video { .. }, Some(rate)) => Fps::from_f64(rate).ok(),
        _ => None,
    };
    if canvas.is_none() && fps.is_none() {
        return;
    }
    let applied = ctx.project.update(|settings| {
        if let Some(canvas) = canvas {
            settings.canvas = canvas;
        }
        if let Some(fps) = fps {
            settings.fps = fps;
        }
    });
    if applied {
        tracing::debug!(media_id = %media_id, ?canvas, ?fps, "project geometry taken from first element");
    }
}

/// Remove several elements at once. Missing targets are ignored, but at least one must exist.
#[derive(Debug)]
pub struct DeleteElements {
    targets: Vec<ElementRef>,
    snapshot: Snapshot,
}

impl DeleteElements {
    pub fn new(targets: Vec<ElementRef>) -> Self {
        Self {
            targets,
            snapshot: Snapshot::default(),
        }
    }
}

impl Command for DeleteElements {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        let targets: HashSet<(&str, &str)> = self
            .targets
            .iter()
            .map(|r| (r.track_id.as_str(), r.element_id.as_str()))
            .collect();
        self.snapshot.apply(ctx, |tracks| {
            let mut removed = 0usize;
            let mut next = tracks.to_vec();
            for track in &mut next {
                let before = track.elements.len();
                let tid = track.id.clone();
                track
                    .elements
                    .retain(|e| !targets.contains(&(tid.as_str(), e.id.as_str())));
                removed += before - track.elements.len();
            }
            if removed == 0 {
                return Err(ReelError::not_found("no matching elements to delete"));
            }
            Ok(next)
        })
    }

    fn undo(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        self.snapshot.restore(ctx)
    }

    fn description(&self) -> String {
        format!("Delete {} element(s)", self.targets.len())
    }
}

/// Move an element to `new_start_time`, possibly onto another track.
///
/// Remove from the source, validate against the target and insert happen as one replacement.
#[derive(Debug)]
pub struct MoveElement {
    from: ElementRef,
    target_track_id: String,
    new_start_time: f64,
    snapshot: Snapshot,
}

impl MoveElement {
    pub fn new(from: ElementRef, target_track_id: impl Into<String>, new_start_time: f64) -> Self {
        Self {
            from,
            target_track_id: target_track_id.into(),
            new_start_time,
            snapshot: Snapshot::default(),
        }
    }
}

impl Command for MoveElement {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        let from = &self.from;
        let target_id = self.target_track_id.as_str();
        let new_start = self.new_start_time;
        self.snapshot.apply(ctx, |tracks| {
            let element = lookup_element(tracks, from)?;
            let src = track_index(tracks, &from.track_id)?;
            let dst = track_index(tracks, target_id)?;
            validate_element_track_compatibility(element, &tracks[dst]).into_result()?;

            let moved = Element {
                start_time: new_start,
                ..element.clone()
            };
            validate_element_timing(&moved)?;

            let mut next = tracks.to_vec();
            if src == dst {
                if let Some(slot) = next[src].element_mut(&from.element_id) {
                    *slot = moved;
                }
            } else {
                next[src].elements.retain(|e| e.id != from.element_id);
                next[dst].elements.push(moved);
            }
            Ok(next)
        })
    }

    fn undo(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        self.snapshot.restore(ctx)
    }

    fn description(&self) -> String {
        "Move element".to_owned()
    }
}

/// Set both trims of an element. The effective duration must stay non-negative.
#[derive(Debug)]
pub struct TrimElement {
    at: ElementRef,
    trim_start: f64,
    trim_end: f64,
    snapshot: Snapshot,
}

impl TrimElement {
    pub fn new(at: ElementRef, trim_start: f64, trim_end: f64) -> Self {
        Self {
            at,
            trim_start,
            trim_end,
            snapshot: Snapshot::default(),
        }
    }
}

impl Command for TrimElement {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        let (at, trim_start, trim_end) = (&self.at, self.trim_start, self.trim_end);
        self.snapshot.apply(ctx, |tracks| {
            map_element(tracks, at, |el| {
                el.trim_start = trim_start;
                el.trim_end = trim_end;
                validate_element_timing(el)
            })
        })
    }

    fn undo(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        self.snapshot.restore(ctx)
    }

    fn description(&self) -> String {
        "Trim element".to_owned()
    }
}

#[derive(Debug)]
pub struct UpdateElementStartTime {
    at: ElementRef,
    start_time: f64,
    snapshot: Snapshot,
}

impl UpdateElementStartTime {
    pub fn new(at: ElementRef, start_time: f64) -> Self {
        Self {
            at,
            start_time,
            snapshot: Snapshot::default(),
        }
    }
}

impl Command for UpdateElementStartTime {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        let (at, start_time) = (&self.at, self.start_time);
        self.snapshot.apply(ctx, |tracks| {
            map_element(tracks, at, |el| {
                el.start_time = start_time;
                validate_element_timing(el)
            })
        })
    }

    fn undo(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        self.snapshot.restore(ctx)
    }

    fn description(&self) -> String {
        "Move element start".to_owned()
    }
}

/// Flip visibility of a video, image or text element. Audio has no visibility.
#[derive(Debug)]
pub struct ToggleElementHidden {
    at: ElementRef,
    snapshot: Snapshot,
}

impl ToggleElementHidden {
    pub fn new(at: ElementRef) -> Self {
        Self {
            at,
            snapshot: Snapshot::default(),
        }
    }
}

impl Command for ToggleElementHidden {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        let at = &self.at;
        self.snapshot.apply(ctx, |tracks| {
            map_element(tracks, at, |el| match &mut el.kind {
                ElementKind::Video { hidden, .. } | ElementKind::Image { hidden, .. } => {
                    *hidden = !*hidden;
                    Ok(())
                }
                ElementKind::Text(text) => {
                    text.hidden = !text.hidden;
                    Ok(())
                }
                ElementKind::Audio { .. } => {
                    Err(ReelError::validation("audio elements cannot be hidden"))
                }
            })
        })
    }

    fn undo(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        self.snapshot.restore(ctx)
    }

    fn description(&self) -> String {
        "Toggle element visibility".to_owned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/commands/element.rs"]
mod tests;
