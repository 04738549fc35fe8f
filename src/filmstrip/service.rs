use std::{
    collections::HashMap,
    num::NonZeroUsize,
    sync::Arc,
};

use parking_lot::Mutex;
use tokio::{sync::broadcast, task::JoinHandle};

use crate::{
    assets::{decode::thumbnail, library::MediaAsset},
    filmstrip::{
        cache::{FilmstripFrame, FrameCache},
        tiers::{Tier, timestamp_key},
    },
    foundation::error::{ReelError, ReelResult},
    render::source::FrameSource,
};

const EVENT_CAPACITY: usize = 256;

/// Cache size and thumbnail geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FilmstripSettings {
    /// Frames kept across all media and tiers.
    pub cache_capacity: usize,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
}

impl Default for FilmstripSettings {
    fn default() -> Self {
        Self {
            cache_capacity: 150,
            thumbnail_width: 106,
            thumbnail_height: 60,
        }
    }
}

impl FilmstripSettings {
    pub fn validate(&self) -> ReelResult<()> {
        if self.cache_capacity == 0 {
            return Err(ReelError::validation("filmstrip cache_capacity must be > 0"));
        }
        if self.thumbnail_width == 0 || self.thumbnail_height == 0 {
            return Err(ReelError::validation("filmstrip thumbnail size must be non-zero"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FilmstripEvent {
    FrameReady {
        media_id: String,
        tier: Tier,
        timestamp: f64,
    },
    Error {
        media_id: String,
        message: String,
    },
}

impl FilmstripEvent {
    pub fn media_id(&self) -> &str {
        match self {
            Self::FrameReady { media_id, .. } | Self::Error { media_id, .. } => media_id,
        }
    }
}

/// Outstanding work for one media item: requested timestamp keys (with the tier they were
/// requested for) and the batches generating them.
#[derive(Debug, Default)]
struct MediaPending {
    requested: HashMap<u64, Tier>,
    batches: Vec<JoinHandle<()>>,
}

#[derive(Debug)]
struct State {
    cache: FrameCache,
    pending: HashMap<String, MediaPending>,
}

/// Tiered thumbnail cache with deduplicated, cancellable background generation.
///
/// Reads never block or generate. Generation runs as tokio tasks, one per accepted request
/// batch; each produced frame lands in the cache and is announced on the event channel.
pub struct FilmstripService<S: FrameSource> {
    source: Arc<S>,
    settings: FilmstripSettings,
    state: Arc<Mutex<State>>,
    events: broadcast::Sender<FilmstripEvent>,
}

impl<S: FrameSource> std::fmt::Debug for FilmstripService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("FilmstripService")
            .field("settings", &self.settings)
            .field("cached", &state.cache.len())
            .field("pending_media", &state.pending.len())
            .finish()
    }
}

impl<S: FrameSource> FilmstripService<S> {
    pub fn new(source: Arc<S>, settings: FilmstripSettings) -> ReelResult<Self> {
        settings.validate()?;
        let capacity = NonZeroUsize::new(settings.cache_capacity)
            .ok_or_else(|| ReelError::validation("filmstrip cache_capacity must be > 0"))?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            source,
            settings,
            state: Arc::new(Mutex::new(State {
                cache: FrameCache::new(capacity),
                pending: HashMap::new(),
            })),
            events,
        })
    }

    pub fn settings(&self) -> FilmstripSettings {
        self.settings
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FilmstripEvent> {
        self.events.subscribe()
    }

    /// Cached frames of `media_id` at `tier` within `[start, end]`.
    pub fn get_frames(&self, media_id: &str, tier: Tier, start: f64, end: f64) -> Vec<FilmstripFrame> {
        self.state.lock().cache.range(media_id, tier, start, end)
    }

    /// Schedule generation of `timestamps` for `asset` at `tier`.
    ///
    /// Timestamps already requested for this media and not yet produced or cancelled are
    /// dropped. Returns how many were newly scheduled. Must be called within a tokio runtime.
    pub fn request_frames(&self, asset: &MediaAsset, timestamps: &[f64], tier: Tier) -> usize {
        if timestamps.is_empty() {
            return 0;
        }
        let mut state = self.state.lock();
        let pending = state.pending.entry(asset.id.clone()).or_default();
        let mut batch = Vec::new();
        for &ts in timestamps {
            let key = timestamp_key(ts);
            if pending.requested.contains_key(&key) {
                continue;
            }
            pending.requested.insert(key, tier);
            batch.push(ts);
        }
        if batch.is_empty() {
            return 0;
        }

        let scheduled = batch.len();
        tracing::debug!(media_id = %asset.id, tier = tier.index(), scheduled, "filmstrip request");
        pending.batches.retain(|h| !h.is_finished());
        pending.batches.push(tokio::spawn(generate_batch(
            Arc::clone(&self.source),
            Arc::clone(&self.state),
            self.events.clone(),
            self.settings,
            asset.clone(),
            batch,
        )));
        scheduled
    }

    /// Abort outstanding generation for `media_id` and forget what was requested.
    ///
    /// Returns `false` if nothing was pending.
    pub fn cancel_pending(&self, media_id: &str) -> bool {
        let Some(pending) = self.state.lock().pending.remove(media_id) else {
            return false;
        };
        for batch in &pending.batches {
            batch.abort();
        }
        tracing::debug!(media_id, released = pending.requested.len(), "filmstrip cancelled");
        true
    }

    /// Evict every cached frame of `media_id` and cancel its pending work.
    pub fn clear_media(&self, media_id: &str) {
        let evicted = self.state.lock().cache.remove_media(media_id);
        self.cancel_pending(media_id);
        tracing::debug!(media_id, evicted, "filmstrip media cleared");
    }

    /// Cancel everything and empty the cache.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        for (_, pending) in state.pending.drain() {
            for batch in &pending.batches {
                batch.abort();
            }
        }
        state.cache.clear();
    }

    /// Timestamps requested for `media_id` that are not produced yet.
    pub fn pending_count(&self, media_id: &str) -> usize {
        self.state
            .lock()
            .pending
            .get(media_id)
            .map_or(0, |p| p.requested.len())
    }

    pub fn cached_len(&self) -> usize {
        self.state.lock().cache.len()
    }

    /// Wait until every batch scheduled so far has finished or been cancelled.
    pub async fn flush(&self) {
        let batches: Vec<JoinHandle<()>> = {
            let mut state = self.state.lock();
            state
                .pending
                .values_mut()
                .flat_map(|p| std::mem::take(&mut p.batches))
                .collect()
        };
        for batch in batches {
            if let Err(err) = batch.await {
                if !err.is_cancelled() {
                    tracing::warn!(error = %err, "filmstrip batch panicked");
                }
            }
        }
    }
}

#[tracing::instrument(skip_all, fields(media_id = %asset.id, count = timestamps.len()))]
async fn generate_batch<S: FrameSource>(
    source: Arc<S>,
    state: Arc<Mutex<State>>,
    events: broadcast::Sender<FilmstripEvent>,
    settings: FilmstripSettings,
    asset: MediaAsset,
    timestamps: Vec<f64>,
) {
    for (i, &ts) in timestamps.iter().enumerate() {
        let result = match source.frame(&asset, ts).await {
            Ok(Some(image)) => Ok(image),
            Ok(None) => Err(ReelError::decode(format!("no frame for '{}' at {ts}s", asset.id))),
            Err(err) => Err(err),
        };
        let image = match result {
            Ok(image) => image,
            Err(err) => {
                release(&state, &asset.id, &timestamps[i..]);
                tracing::warn!(error = %err, timestamp = ts, "filmstrip generation failed");
                let _ = events.send(FilmstripEvent::Error {
                    media_id: asset.id.clone(),
                    message: err.to_string(),
                });
                return;
            }
        };

        let thumb = Arc::new(thumbnail(&image, settings.thumbnail_width, settings.thumbnail_height));
        let key = timestamp_key(ts);
        let tier = {
            let mut guard = state.lock();
            let Some(pending) = guard.pending.get_mut(&asset.id) else {
                // Cancelled while decoding.
                return;
            };
            let Some(tier) = pending.requested.remove(&key) else {
                continue;
            };
            if pending.requested.is_empty() {
                guard.pending.remove(&asset.id);
            }
            guard.cache.insert(FilmstripFrame {
                media_id: asset.id.clone(),
                tier,
                timestamp: ts,
                image: thumb,
            });
            tier
        };
        let _ = events.send(FilmstripEvent::FrameReady {
            media_id: asset.id.clone(),
            tier,
            timestamp: ts,
        });
    }
}

/// Forget `timestamps` of `media_id` so later requests may retry them.
fn release(state: &Mutex<State>, media_id: &str, timestamps: &[f64]) {
    let mut guard = state.lock();
    if let Some(pending) = guard.pending.get_mut(media_id) {
        for &ts in timestamps {
            pending.requested.remove(&timestamp_key(ts));
        }
        if pending.requested.is_empty() {
            guard.pending.remove(media_id);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filmstrip/service.rs"]
mod tests;
