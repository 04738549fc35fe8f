use std::sync::Arc;

use image::RgbaImage;
use parking_lot::Mutex;

use crate::foundation::core::Rgba8;

/// Paint target shared between the caller and in-flight renders.
pub type SharedSurface = Arc<Mutex<Surface>>;

/// RGBA8 (straight alpha) paint target.
#[derive(Clone, Debug)]
pub struct Surface {
    pixels: RgbaImage,
    /// Bumped on every present.
    generation: u64,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            generation: 0,
        }
    }

    pub fn shared(width: u32, height: u32) -> SharedSurface {
        Arc::new(Mutex::new(Self::new(width, height)))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clear(&mut self, color: Rgba8) {
        let px = color.to_pixel();
        for p in self.pixels.pixels_mut() {
            *p = px;
        }
    }

    /// Replace the contents with a finished frame, resizing the surface to match it.
    pub fn present(&mut self, frame: RgbaImage) {
        self.pixels = frame;
        self.generation += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
