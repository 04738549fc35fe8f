use std::sync::Arc;

use crate::foundation::ids::generate_id;

/// Shared, immutable track list. Mutations build a new list and swap the whole `Arc`.
pub type TrackList = Arc<Vec<Track>>;

/// Lane type of a track; constrains which element kinds it may host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    /// Video and image lane.
    Media,
    /// Text overlay lane.
    Text,
    /// Audio lane.
    Audio,
}

impl TrackKind {
    /// Name given to freshly created tracks of this kind.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Media => "Media Track",
            Self::Text => "Text Track",
            Self::Audio => "Audio Track",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Text => "text",
            Self::Audio => "audio",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A typed lane holding time-positioned elements.
pub struct Track {
    /// Stable track id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Lane type.
    #[serde(rename = "type")]
    pub kind: TrackKind,
    /// Elements in insertion order (not necessarily sorted by start time).
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Muted tracks contribute nothing to the rendered scene.
    #[serde(default)]
    pub muted: bool,
    /// Marks the single main media track.
    #[serde(default)]
    pub is_main: bool,
}

impl Track {
    /// New empty track with a fresh id.
    pub fn new(kind: TrackKind, name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            kind,
            elements: Vec::new(),
            muted: false,
            is_main: false,
        }
    }

    /// The synthesized main media track.
    pub fn main() -> Self {
        Self {
            is_main: true,
            ..Self::new(TrackKind::Media, "Main Track")
        }
    }

    pub fn element(&self, element_id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == element_id)
    }

    pub fn element_mut(&mut self, element_id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == element_id)
    }

    /// Latest effective end time across this track's elements, 0 when empty.
    pub fn end_time(&self) -> f64 {
        self.elements
            .iter()
            .map(Element::end_time)
            .fold(0.0, f64::max)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A time-positioned unit of content.
///
/// The timeline interval covered is `[start_time, start_time + effective_duration)`, showing source
/// media from `trim_start` onwards.
pub struct Element {
    /// Stable element id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Untrimmed source duration in seconds.
    pub duration: f64,
    /// Timeline position in seconds.
    pub start_time: f64,
    /// Seconds cut from the head of the source.
    #[serde(default)]
    pub trim_start: f64,
    /// Seconds cut from the tail of the source.
    #[serde(default)]
    pub trim_end: f64,
    /// Kind-specific payload.
    #[serde(flatten)]
    pub kind: ElementKind,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Kind-specific element payload, tagged by `type`.
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    /// Video clip backed by a media asset.
    Video {
        /// Referenced media asset id.
        media_id: String,
        /// Audio of this clip is muted.
        #[serde(default)]
        muted: bool,
        /// Hidden clips are not painted.
        #[serde(default)]
        hidden: bool,
    },
    /// Still image backed by a media asset.
    Image {
        /// Referenced media asset id.
        media_id: String,
        /// Hidden clips are not painted.
        #[serde(default)]
        hidden: bool,
    },
    /// Audio clip backed by a media asset.
    Audio {
        /// Referenced media asset id.
        media_id: String,
        /// Linear gain.
        #[serde(default = "default_volume")]
        volume: f64,
        /// Muted clips are skipped by mixers.
        #[serde(default)]
        muted: bool,
        /// Decoded samples; a live handle that persistence must drop.
        #[serde(skip)]
        buffer: Option<Arc<DecodedAudio>>,
    },
    /// Text overlay.
    Text(TextContent),
}

fn default_volume() -> f64 {
    1.0
}

/// Decoded PCM attached to an audio element at runtime.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedAudio {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved samples.
    pub samples: Arc<[f32]>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Text content plus typography.
///
/// Colors are CSS hex strings or `transparent`; `x`/`y` offset the text from the canvas center.
pub struct TextContent {
    pub content: String,
    pub font_size: f64,
    pub font_family: String,
    pub color: String,
    pub background_color: String,
    pub text_align: TextAlign,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_decoration: TextDecoration,
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
    pub hidden: bool,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            content: "Default Text".to_owned(),
            font_size: 48.0,
            font_family: "Arial".to_owned(),
            color: "#ffffff".to_owned(),
            background_color: "transparent".to_owned(),
            text_align: TextAlign::Center,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_decoration: TextDecoration::None,
            x: 0.0,
            y: 0.0,
            opacity: 1.0,
            hidden: false,
        }
    }
}

impl ElementKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Video { .. } => "video",
            Self::Image { .. } => "image",
            Self::Audio { .. } => "audio",
            Self::Text(_) => "text",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Video, image and audio elements are media-kind.
    pub fn is_media_kind(&self) -> bool {
        !self.is_text()
    }

    pub fn media_id(&self) -> Option<&str> {
        match self {
            Self::Video { media_id, .. }
            | Self::Image { media_id, .. }
            | Self::Audio { media_id, .. } => Some(media_id),
            Self::Text(_) => None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        match self {
            Self::Video { hidden, .. } | Self::Image { hidden, .. } => *hidden,
            Self::Text(text) => text.hidden,
            Self::Audio { .. } => false,
        }
    }
}

impl Element {
    /// New element with a fresh id, placed at `start_time` and untrimmed.
    pub fn new(name: impl Into<String>, start_time: f64, duration: f64, kind: ElementKind) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            duration,
            start_time,
            trim_start: 0.0,
            trim_end: 0.0,
            kind,
        }
    }

    pub fn video(name: impl Into<String>, media_id: impl Into<String>, start: f64, duration: f64) -> Self {
        Self::new(
            name,
            start,
            duration,
            ElementKind::Video {
                media_id: media_id.into(),
                muted: false,
                hidden: false,
            },
        )
    }

    pub fn image(name: impl Into<String>, media_id: impl Into<String>, start: f64, duration: f64) -> Self {
        Self::new(
            name,
            start,
            duration,
            ElementKind::Image {
                media_id: media_id.into(),
                hidden: false,
            },
        )
    }

    pub fn audio(name: impl Into<String>, media_id: impl Into<String>, start: f64, duration: f64) -> Self {
        Self::new(
            name,
            start,
            duration,
            ElementKind::Audio {
                media_id: media_id.into(),
                volume: 1.0,
                muted: false,
                buffer: None,
            },
        )
    }

    pub fn text(content: impl Into<String>, start: f64, duration: f64) -> Self {
        let content = content.into();
        Self::new(
            content.clone(),
            start,
            duration,
            ElementKind::Text(TextContent {
                content,
                ..TextContent::default()
            }),
        )
    }

    /// `duration - trim_start - trim_end`.
    pub fn effective_duration(&self) -> f64 {
        self.duration - self.trim_start - self.trim_end
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.effective_duration()
    }

    /// Whether `t` lies strictly inside the element's timeline interval.
    pub fn strictly_contains(&self, t: f64) -> bool {
        t > self.start_time && t < self.end_time()
    }

    /// Same element with a fresh id.
    pub fn with_new_id(&self) -> Self {
        Self {
            id: generate_id(),
            ..self.clone()
        }
    }
}

/// Project duration: the latest effective end across all tracks, 0 for an empty timeline.
pub fn calculate_total_duration(tracks: &[Track]) -> f64 {
    tracks.iter().map(Track::end_time).fold(0.0, f64::max)
}

pub fn main_track(tracks: &[Track]) -> Option<&Track> {
    tracks.iter().find(|t| t.is_main)
}

/// Prepend an empty main media track when none exists; returns the input unchanged otherwise.
pub fn ensure_main_track(tracks: &TrackList) -> TrackList {
    if tracks.iter().any(|t| t.is_main) {
        return Arc::clone(tracks);
    }
    let mut out = Vec::with_capacity(tracks.len() + 1);
    out.push(Track::main());
    out.extend(tracks.iter().cloned());
    Arc::new(out)
}

/// Locate an element across all tracks, returning `(track_index, element_index)`.
pub fn find_element(tracks: &[Track], track_id: &str, element_id: &str) -> Option<(usize, usize)> {
    let ti = tracks.iter().position(|t| t.id == track_id)?;
    let ei = tracks[ti].elements.iter().position(|e| e.id == element_id)?;
    Some((ti, ei))
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
