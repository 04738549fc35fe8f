use std::sync::Arc;

use anyhow::Context;
use image::{RgbaImage, imageops::FilterType};

use crate::{
    assets::library::MediaAsset,
    foundation::error::{ReelError, ReelResult},
};

/// Decode encoded image bytes to straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> ReelResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ReelError::decode(format!("decode image from memory: {e}")))?;
    Ok(dyn_img.to_rgba8())
}

/// Encoded bytes for `asset`: in-memory bytes first, then the file at its path.
pub fn load_asset_bytes(asset: &MediaAsset) -> ReelResult<Arc<[u8]>> {
    if let Some(bytes) = &asset.bytes {
        return Ok(Arc::clone(bytes));
    }
    let path = asset
        .path
        .as_ref()
        .ok_or_else(|| ReelError::not_found(format!("media asset '{}' has no source", asset.id)))?;
    let bytes = std::fs::read(path).with_context(|| format!("read media '{}'", path.display()))?;
    Ok(Arc::from(bytes))
}

/// Scale `img` to exactly `width` x `height`.
pub fn thumbnail(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    image::imageops::resize(img, width, height, FilterType::Triangle)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
