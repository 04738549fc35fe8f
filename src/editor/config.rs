use std::path::Path;

use anyhow::Context;

use crate::{
    filmstrip::service::FilmstripSettings,
    foundation::{
        core::Fps,
        error::{ReelError, ReelResult},
    },
    render::renderer::RendererOpts,
    scene::builder::PaintOrder,
};

/// Render geometry used while no project is loaded.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            width: 600,
            height: 320,
            fps: 30.0,
        }
    }
}

impl PreviewSettings {
    pub fn renderer_opts(&self) -> ReelResult<RendererOpts> {
        Ok(RendererOpts {
            width: self.width,
            height: self.height,
            fps: Fps::from_f64(self.fps)?,
        })
    }
}

/// Editor-wide tunables, loaded from JSON. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum undo entries.
    pub history_depth: usize,
    pub preview: PreviewSettings,
    pub filmstrip: FilmstripSettings,
    pub paint_order: PaintOrder,
    /// Blur radius for blur backgrounds that do not set one.
    pub default_blur_intensity: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: 100,
            preview: PreviewSettings::default(),
            filmstrip: FilmstripSettings::default(),
            paint_order: PaintOrder::default(),
            default_blur_intensity: 8.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| ReelError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read editor config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.history_depth == 0 {
            return Err(ReelError::validation("history_depth must be > 0"));
        }
        if self.preview.width == 0 || self.preview.height == 0 {
            return Err(ReelError::validation("preview size must be non-zero"));
        }
        self.preview.renderer_opts()?;
        self.filmstrip.validate()?;
        if !self.default_blur_intensity.is_finite() || self.default_blur_intensity < 0.0 {
            return Err(ReelError::validation(format!(
                "default_blur_intensity must be a non-negative number, got {}",
                self.default_blur_intensity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/config.rs"]
mod tests;
