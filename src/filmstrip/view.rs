use std::sync::Arc;

use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::{
    assets::library::MediaAsset,
    filmstrip::{
        cache::FilmstripFrame,
        service::{FilmstripEvent, FilmstripService},
        tiers::{Tier, timestamps_for_range},
    },
    render::source::FrameSource,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilmstripStatus {
    #[default]
    Idle,
    Generating,
    Ready,
    Error,
}

/// Visible slice of a clip on the timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleRange {
    pub start: f64,
    pub end: f64,
    pub zoom: f64,
}

#[derive(Debug)]
struct Tracked {
    tier: Tier,
    range: VisibleRange,
    expected: usize,
}

/// Filmstrip of one media item as seen by a timeline clip.
///
/// Each [`FilmstripView::track`] call reads what is cached for the new range, requests only the
/// gap and cancels work left over from the previous range. Events for other media or for a tier
/// that is no longer current are ignored.
pub struct FilmstripView<S: FrameSource> {
    service: Arc<FilmstripService<S>>,
    media_id: String,
    events: broadcast::Receiver<FilmstripEvent>,
    tracked: Option<Tracked>,
    frames: Vec<FilmstripFrame>,
    status: FilmstripStatus,
    progress: f64,
}

impl<S: FrameSource> std::fmt::Debug for FilmstripView<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilmstripView")
            .field("media_id", &self.media_id)
            .field("status", &self.status)
            .field("frames", &self.frames.len())
            .field("progress", &self.progress)
            .finish()
    }
}

impl<S: FrameSource> FilmstripView<S> {
    pub fn new(service: Arc<FilmstripService<S>>, media_id: impl Into<String>) -> Self {
        let events = service.subscribe();
        Self {
            service,
            media_id: media_id.into(),
            events,
            tracked: None,
            frames: Vec::new(),
            status: FilmstripStatus::Idle,
            progress: 0.0,
        }
    }

    pub fn frames(&self) -> &[FilmstripFrame] {
        &self.frames
    }

    pub fn status(&self) -> FilmstripStatus {
        self.status
    }

    /// Percentage of the visible timestamps that are cached.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn tier(&self) -> Option<Tier> {
        self.tracked.as_ref().map(|t| t.tier)
    }

    /// Follow a new source, duration or visible range.
    ///
    /// `None` or a non-positive duration resets the view to idle. An asset other than the view's
    /// media puts the view in [`FilmstripStatus::Error`] without requesting anything.
    pub fn track(&mut self, asset: Option<&MediaAsset>, duration: f64, range: VisibleRange) {
        self.teardown();
        let Some(asset) = asset.filter(|_| duration > 0.0) else {
            self.frames.clear();
            self.status = FilmstripStatus::Idle;
            self.progress = 0.0;
            return;
        };
        if asset.id != self.media_id {
            tracing::warn!(media_id = %self.media_id, asset_id = %asset.id, "filmstrip asset mismatch");
            self.frames.clear();
            self.status = FilmstripStatus::Error;
            self.progress = 0.0;
            return;
        }

        let tier = Tier::for_zoom(range.zoom);
        let timestamps = timestamps_for_range(range.start, range.end, tier);
        self.frames = self.service.get_frames(&self.media_id, tier, range.start, range.end);
        self.tracked = Some(Tracked {
            tier,
            range,
            expected: timestamps.len(),
        });

        let missing: Vec<f64> = timestamps
            .iter()
            .copied()
            .filter(|ts| !self.frames.iter().any(|f| f.timestamp == *ts))
            .collect();
        if missing.is_empty() {
            self.status = FilmstripStatus::Ready;
            self.progress = 100.0;
            return;
        }
        self.status = FilmstripStatus::Generating;
        self.progress = percent(self.frames.len(), timestamps.len());
        self.service.request_frames(asset, &missing, tier);
    }

    /// Drain pending service events; returns whether the view changed.
    pub fn poll_events(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => changed |= self.handle_event(&event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(media_id = %self.media_id, skipped, "filmstrip events lagged");
                    changed |= self.refresh();
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return changed,
            }
        }
    }

    /// Apply one service event.
    pub fn handle_event(&mut self, event: &FilmstripEvent) -> bool {
        if event.media_id() != self.media_id {
            return false;
        }
        match event {
            FilmstripEvent::FrameReady { tier, .. } => {
                if self.tracked.as_ref().is_some_and(|t| t.tier == *tier) {
                    self.refresh()
                } else {
                    false
                }
            }
            FilmstripEvent::Error { message, .. } => {
                tracing::warn!(media_id = %self.media_id, %message, "filmstrip generation error");
                self.status = FilmstripStatus::Error;
                true
            }
        }
    }

    fn refresh(&mut self) -> bool {
        let Some(tracked) = &self.tracked else {
            return false;
        };
        let frames =
            self.service
                .get_frames(&self.media_id, tracked.tier, tracked.range.start, tracked.range.end);
        self.progress = percent(frames.len(), tracked.expected);
        if frames.len() == tracked.expected {
            self.status = FilmstripStatus::Ready;
            self.progress = 100.0;
        }
        self.frames = frames;
        true
    }

    /// Stop tracking and cancel outstanding work.
    pub fn teardown(&mut self) {
        if self.tracked.take().is_some() {
            self.service.cancel_pending(&self.media_id);
        }
    }
}

impl<S: FrameSource> Drop for FilmstripView<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn percent(have: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        have as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filmstrip/view.rs"]
mod tests;
