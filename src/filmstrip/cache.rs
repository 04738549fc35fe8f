use std::num::NonZeroUsize;

use lru::LruCache;

use crate::{
    filmstrip::tiers::{Tier, timestamp_key, timestamps_for_range},
    render::source::FrameImage,
};

/// One cached thumbnail.
#[derive(Clone, Debug)]
pub struct FilmstripFrame {
    pub media_id: String,
    pub tier: Tier,
    /// Source time in seconds.
    pub timestamp: f64,
    pub image: FrameImage,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameKey {
    pub media_id: String,
    pub tier: Tier,
    pub ts_ms: u64,
}

impl FrameKey {
    pub fn new(media_id: &str, tier: Tier, timestamp: f64) -> Self {
        Self {
            media_id: media_id.to_owned(),
            tier,
            ts_ms: timestamp_key(timestamp),
        }
    }
}

/// LRU over all media and tiers. Tiers of the same media coexist.
#[derive(Debug)]
pub struct FrameCache {
    frames: LruCache<FrameKey, FilmstripFrame>,
}

impl FrameCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            frames: LruCache::new(capacity),
        }
    }

    pub fn insert(&mut self, frame: FilmstripFrame) {
        let key = FrameKey::new(&frame.media_id, frame.tier, frame.timestamp);
        self.frames.put(key, frame);
    }

    pub fn contains(&self, key: &FrameKey) -> bool {
        self.frames.contains(key)
    }

    /// Cached frames of `media_id`/`tier` whose sample times fall inside `[start, end]`, in time
    /// order. Hits are promoted.
    pub fn range(&mut self, media_id: &str, tier: Tier, start: f64, end: f64) -> Vec<FilmstripFrame> {
        timestamps_for_range(start, end, tier)
            .into_iter()
            .filter_map(|ts| self.frames.get(&FrameKey::new(media_id, tier, ts)).cloned())
            .collect()
    }

    /// Drop every frame of `media_id`; returns how many were evicted.
    pub fn remove_media(&mut self, media_id: &str) -> usize {
        let keys: Vec<FrameKey> = self
            .frames
            .iter()
            .filter(|(k, _)| k.media_id == media_id)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &keys {
            self.frames.pop(key);
        }
        keys.len()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filmstrip/cache.rs"]
mod tests;
