use crate::{
    assets::library::MediaAsset,
    foundation::core::{Canvas, Rgba8},
    timeline::model::TextContent,
};

/// Half-open timeline interval `[start, end)` during which a node is visible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn contains(self, t: f64) -> bool {
        t >= self.start && t < self.end
    }
}

/// Video or image content.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaNode {
    pub element_id: String,
    pub asset: MediaAsset,
    pub window: TimeWindow,
    pub trim_start: f64,
}

impl MediaNode {
    /// Source media time shown at timeline time `t`.
    pub fn source_time(&self, t: f64) -> f64 {
        t - self.window.start + self.trim_start
    }
}

/// Text content with colors already resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    pub element_id: String,
    pub window: TimeWindow,
    pub text: TextContent,
    /// Anchor point: canvas center plus the element's offset.
    pub position: kurbo::Point,
    pub color: Rgba8,
    pub background: Option<Rgba8>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ContentNode {
    Video(MediaNode),
    Image(MediaNode),
    Text(TextNode),
}

impl ContentNode {
    pub fn window(&self) -> TimeWindow {
        match self {
            Self::Video(n) | Self::Image(n) => n.window,
            Self::Text(n) => n.window,
        }
    }

    pub fn element_id(&self) -> &str {
        match self {
            Self::Video(n) | Self::Image(n) => &n.element_id,
            Self::Text(n) => &n.element_id,
        }
    }

    pub fn is_visible_at(&self, t: f64) -> bool {
        self.window().contains(t)
    }
}

/// Content painted offscreen, blurred and cover-scaled behind the sharp content.
#[derive(Clone, Debug, PartialEq)]
pub struct BlurBackgroundNode {
    pub blur_intensity: f64,
    pub content: Vec<ContentNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneNode {
    BlurBackground(BlurBackgroundNode),
    Content(ContentNode),
}

/// Immutable, time-addressable description of what to paint.
///
/// Children are in paint order: earlier children are painted first and end up underneath.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderTree {
    pub duration: f64,
    pub canvas: Canvas,
    /// Solid fill under everything; `None` paints a transparent root.
    pub background: Option<Rgba8>,
    pub children: Vec<SceneNode>,
}

impl RenderTree {
    pub fn empty(canvas: Canvas) -> Self {
        Self {
            duration: 0.0,
            canvas,
            background: None,
            children: Vec::new(),
        }
    }

    /// Sharp content nodes, skipping blur backdrops.
    pub fn content(&self) -> impl Iterator<Item = &ContentNode> {
        self.children.iter().filter_map(|c| match c {
            SceneNode::Content(n) => Some(n),
            SceneNode::BlurBackground(_) => None,
        })
    }

    pub fn visible_at(&self, t: f64) -> impl Iterator<Item = &ContentNode> {
        self.content().filter(move |n| n.is_visible_at(t))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/nodes.rs"]
mod tests;
