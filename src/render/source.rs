use std::{future::Future, num::NonZeroUsize, sync::Arc};

use image::RgbaImage;
use lru::LruCache;
use parking_lot::Mutex;

use crate::{
    assets::{
        decode::{decode_image, load_asset_bytes},
        library::{MediaAsset, MediaType},
    },
    foundation::error::ReelResult,
};

/// Decoded frame shared between the renderer and caches.
pub type FrameImage = Arc<RgbaImage>;

/// Decodable half of the media asset store: produces pixels for a media item at a source time.
pub trait FrameSource: Send + Sync + 'static {
    /// Frame of `asset` at `source_time` seconds.
    ///
    /// `Ok(None)` means the source has nothing to show for this media (for example an
    /// unsupported media type); errors are decode failures.
    fn frame(
        &self,
        asset: &MediaAsset,
        source_time: f64,
    ) -> impl Future<Output = ReelResult<Option<FrameImage>>> + Send;
}

/// Serves image assets, decoding each once and keeping the most recently used ones.
///
/// Video and audio assets yield `None`.
#[derive(Debug)]
pub struct StillImageSource {
    cache: Mutex<LruCache<String, FrameImage>>,
}

impl Default for StillImageSource {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(32).unwrap_or(NonZeroUsize::MIN))
    }
}

impl StillImageSource {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn decode(&self, asset: &MediaAsset) -> ReelResult<FrameImage> {
        if let Some(hit) = self.cache.lock().get(&asset.id) {
            return Ok(Arc::clone(hit));
        }
        let bytes = load_asset_bytes(asset)?;
        let image = Arc::new(decode_image(&bytes)?);
        tracing::debug!(media_id = %asset.id, w = image.width(), h = image.height(), "decoded still image");
        self.cache.lock().put(asset.id.clone(), Arc::clone(&image));
        Ok(image)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

impl FrameSource for StillImageSource {
    fn frame(
        &self,
        asset: &MediaAsset,
        _source_time: f64,
    ) -> impl Future<Output = ReelResult<Option<FrameImage>>> + Send {
        let result = match asset.kind {
            MediaType::Image => self.decode(asset).map(Some),
            MediaType::Video | MediaType::Audio => Ok(None),
        };
        std::future::ready(result)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/source.rs"]
mod tests;
