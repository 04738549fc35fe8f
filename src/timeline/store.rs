use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    foundation::observable::Observable,
    timeline::model::{Track, TrackList, calculate_total_duration},
};

/// Owner of the current track list.
///
/// Readers get a cheap `Arc` snapshot; writers publish a complete replacement list.
#[derive(Debug, Default)]
pub struct TimelineStore {
    tracks: Observable<TrackList>,
}

impl TimelineStore {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks: Observable::new(Arc::new(tracks)),
        }
    }

    pub fn tracks(&self) -> TrackList {
        self.tracks.get()
    }

    /// Publish `tracks` as the current list, returning the list it replaced.
    pub fn replace(&self, tracks: TrackList) -> TrackList {
        self.tracks.set(tracks)
    }

    pub fn subscribe(&self) -> watch::Receiver<TrackList> {
        self.tracks.subscribe()
    }

    pub fn total_duration(&self) -> f64 {
        calculate_total_duration(&self.tracks.borrow())
    }
}
