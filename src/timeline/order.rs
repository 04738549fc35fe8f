use crate::timeline::model::{Track, TrackKind};

/// Display rank: text first, then regular media, then the main track, audio last.
fn display_rank(track: &Track) -> u8 {
    match track.kind {
        TrackKind::Text => 0,
        TrackKind::Media if !track.is_main => 1,
        TrackKind::Media => 2,
        TrackKind::Audio => 3,
    }
}

/// Tracks in timeline-panel display order. Stable; never persisted.
pub fn sort_tracks_for_display(tracks: &[Track]) -> Vec<&Track> {
    let mut sorted: Vec<&Track> = tracks.iter().collect();
    sorted.sort_by_key(|t| display_rank(t));
    sorted
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/order.rs"]
mod tests;
