use std::{path::Path, sync::Arc};

use anyhow::Context;
use tokio::sync::watch;

use crate::{
    assets::library::MediaAsset,
    foundation::{
        core::{Canvas, Fps, Rgba8},
        error::{ReelError, ReelResult},
        observable::Observable,
    },
    timeline::{
        model::{Track, TrackList},
        validate::validate_track_list,
    },
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Canvas background: a solid fill or a blurred copy of the content.
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Background {
    /// Solid color, CSS hex or `transparent`.
    Color {
        /// Fill color.
        color: String,
    },
    /// Blurred, cover-scaled copy of the content behind it.
    Blur {
        /// Blur radius in pixels; the configured default when absent.
        #[serde(default)]
        blur_intensity: Option<f64>,
    },
}

impl Default for Background {
    fn default() -> Self {
        Self::Color {
            color: "#000000".to_owned(),
        }
    }
}

impl Background {
    /// Fill color for the root node; blur backgrounds paint over a transparent root.
    pub fn fill(&self) -> ReelResult<Option<Rgba8>> {
        match self {
            Self::Color { color } => {
                let c = Rgba8::parse(color)?;
                Ok((!c.is_transparent()).then_some(c))
            }
            Self::Blur { .. } => Ok(None),
        }
    }

    pub fn is_blur(&self) -> bool {
        matches!(self, Self::Blur { .. })
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Settings of the active project.
pub struct ProjectSettings {
    /// Project name.
    pub name: String,
    /// Output canvas size.
    pub canvas: Canvas,
    /// Project frame rate.
    pub fps: Fps,
    /// Canvas background.
    #[serde(default)]
    pub background: Background,
}

impl ProjectSettings {
    pub fn new(name: impl Into<String>, canvas: Canvas, fps: Fps) -> Self {
        Self {
            name: name.into(),
            canvas,
            fps,
            background: Background::default(),
        }
    }
}

/// Holds the active project, if any.
#[derive(Debug, Default)]
pub struct ProjectStore {
    active: Observable<Option<ProjectSettings>>,
}

impl ProjectStore {
    pub fn new(settings: Option<ProjectSettings>) -> Self {
        Self {
            active: Observable::new(settings),
        }
    }

    pub fn active(&self) -> Option<ProjectSettings> {
        self.active.get()
    }

    pub fn load(&self, settings: ProjectSettings) {
        self.active.set(Some(settings));
    }

    pub fn close(&self) -> Option<ProjectSettings> {
        self.active.set(None)
    }

    /// Apply `f` to the active project; returns `false` when no project is loaded.
    pub fn update(&self, f: impl FnOnce(&mut ProjectSettings)) -> bool {
        let mut applied = false;
        self.active.update(|active| {
            if let Some(settings) = active.as_mut() {
                f(settings);
                applied = true;
            }
        });
        applied
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ProjectSettings>> {
        self.active.subscribe()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Plain-value form of a project handed to persistence layers.
pub struct ProjectDocument {
    /// Project settings.
    pub settings: ProjectSettings,
    /// Imported media.
    #[serde(default)]
    pub media: Vec<MediaAsset>,
    /// Track list.
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl ProjectDocument {
    /// Parse and structurally validate a project document.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let doc: Self = serde_json::from_str(s).map_err(|e| ReelError::serde(e.to_string()))?;
        validate_track_list(&doc.tracks)?;
        Ok(doc)
    }

    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read project '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> ReelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReelError::serde(e.to_string()))
    }

    pub fn track_list(&self) -> TrackList {
        Arc::new(self.tracks.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/project.rs"]
mod tests;
