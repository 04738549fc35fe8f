use std::{path::PathBuf, sync::Arc};

use tokio::sync::watch;

use crate::foundation::{
    error::{ReelError, ReelResult},
    observable::Observable,
};

/// Shared, immutable media list.
pub type MediaList = Arc<Vec<MediaAsset>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Video,
    Audio,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// An imported media item with the metadata read on import.
///
/// Equality compares in-memory bytes by buffer identity, not content.
pub struct MediaAsset {
    /// Stable media id referenced by timeline elements.
    pub id: String,
    /// Display name (usually the file name).
    pub name: String,
    /// Media type.
    #[serde(rename = "type")]
    pub kind: MediaType,
    /// Native pixel width (visual media only).
    #[serde(default)]
    pub width: Option<u32>,
    /// Native pixel height (visual media only).
    #[serde(default)]
    pub height: Option<u32>,
    /// Native frame rate (video only).
    #[serde(default)]
    pub fps: Option<f64>,
    /// Source duration in seconds (time-based media only).
    #[serde(default)]
    pub duration: Option<f64>,
    /// Location of the encoded source on disk.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Encoded source bytes held in memory; never persisted.
    #[serde(skip)]
    pub bytes: Option<Arc<[u8]>>,
}

impl PartialEq for MediaAsset {
    fn eq(&self, other: &Self) -> bool {
        let same_bytes = match (&self.bytes, &other.bytes) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_bytes
            && self.id == other.id
            && self.name == other.name
            && self.kind == other.kind
            && self.width == other.width
            && self.height == other.height
            && self.fps == other.fps
            && self.duration == other.duration
            && self.path == other.path
    }
}

impl MediaAsset {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: MediaType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            width: None,
            height: None,
            fps: None,
            duration: None,
            path: None,
            bytes: None,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_bytes(mut self, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.bytes = Some(bytes.into());
        self
    }

    pub fn is_visual(&self) -> bool {
        matches!(self.kind, MediaType::Image | MediaType::Video)
    }

    /// Native size when both dimensions are known.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }
}

/// Read-only lookup from media id to a decodable source.
pub trait MediaAssetStore: Send + Sync {
    fn media_asset(&self, id: &str) -> Option<MediaAsset>;

    /// Every known asset, as an immutable snapshot.
    fn snapshot(&self) -> MediaList;
}

/// In-memory media library backing the editor.
#[derive(Debug, Default)]
pub struct MediaLibrary {
    items: Observable<MediaList>,
}

impl MediaLibrary {
    pub fn new(items: Vec<MediaAsset>) -> Self {
        Self {
            items: Observable::new(Arc::new(items)),
        }
    }

    /// Add an asset; ids must be unique.
    pub fn add(&self, asset: MediaAsset) -> ReelResult<()> {
        if self.items.borrow().iter().any(|a| a.id == asset.id) {
            return Err(ReelError::validation(format!(
                "media asset '{}' already exists",
                asset.id
            )));
        }
        self.items.update(|items| Arc::make_mut(items).push(asset));
        Ok(())
    }

    pub fn remove(&self, id: &str) -> ReelResult<MediaAsset> {
        let current = self.items.get();
        let idx = current
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| ReelError::not_found(format!("media asset '{id}'")))?;
        let mut next = (*current).clone();
        let removed = next.remove(idx);
        self.items.set(Arc::new(next));
        Ok(removed)
    }

    pub fn subscribe(&self) -> watch::Receiver<MediaList> {
        self.items.subscribe()
    }
}

impl MediaAssetStore for MediaLibrary {
    fn media_asset(&self, id: &str) -> Option<MediaAsset> {
        self.items.borrow().iter().find(|a| a.id == id).cloned()
    }

    fn snapshot(&self) -> MediaList {
        self.items.get()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/library.rs"]
mod tests;
