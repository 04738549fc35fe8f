use crate::{
    commands::{Command, CommandContext, Snapshot, track_index},
    foundation::{
        error::{ReelError, ReelResult},
        ids::generate_id,
    },
    timeline::model::{Track, TrackKind},
};

/// Insert an empty track at `index` (clamped), or append it.
#[derive(Debug)]
pub struct AddTrack {
    kind: TrackKind,
    index: Option<usize>,
    track_id: String,
    snapshot: Snapshot,
}

impl AddTrack {
    pub fn new(kind: TrackKind) -> Self {
        Self {
            kind,
            index: None,
            track_id: generate_id(),
            snapshot: Snapshot::default(),
        }
    }

    pub fn at(kind: TrackKind, index: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::new(kind)
        }
    }

    /// Id the new track receives; stable across redo.
    pub fn track_id(&self) -> &str {
        &self.track_id
    }
}

impl Command for AddTrack {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        let track = Track {
            id: self.track_id.clone(),
            ..Track::new(self.kind, self.kind.default_name())
        };
        let index = self.index;
        self.snapshot.apply(ctx, |tracks| {
            let mut next = tracks.to_vec();
            let at = index.map_or(next.len(), |i| i.min(next.len()));
            next.insert(at, track);
            Ok(next)
        })
    }

    fn undo(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        self.snapshot.restore(ctx)
    }

    fn description(&self) -> String {
        format!("Add {}", self.kind.default_name())
    }
}

/// Remove a track and its elements. The main track cannot be removed.
#[derive(Debug)]
pub struct RemoveTrack {
    track_id: String,
    snapshot: Snapshot,
}

impl RemoveTrack {
    pub fn new(track_id: impl Into<String>) -> Self {
        Self {
            track_id: track_id.into(),
            snapshot: Snapshot::default(),
        }
    }
}

impl Command for RemoveTrack {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        let track_id = self.track_id.as_str();
        self.snapshot.apply(ctx, |tracks| {
            let ti = track_index(tracks, track_id)?;
            if tracks[ti].is_main {
                return Err(ReelError::validation("the main track cannot be removed"));
            }
            let mut next = tracks.to_vec();
            next.remove(ti);
            Ok(next)
        })
    }

    fn undo(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        self.snapshot.restore(ctx)
    }

    fn description(&self) -> String {
        "Remove track".to_owned()
    }
}

/// Flip a track's `muted` flag.
#[derive(Debug)]
pub struct ToggleTrackMute {
    track_id: String,
    snapshot: Snapshot,
}

impl ToggleTrackMute {
    pub fn new(track_id: impl Into<String>) -> Self {
        Self {
            track_id: track_id.into(),
            snapshot: Snapshot::default(),
        }
    }
}

impl Command for ToggleTrackMute {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        let track_id = self.track_id.as_str();
        self.snapshot.apply(ctx, |tracks| {
            let ti = track_index(tracks, track_id)?;
            let mut next = tracks.to_vec();
            next[ti].muted = !next[ti].muted;
            Ok(next)
        })
    }

    fn undo(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        self.snapshot.restore(ctx)
    }

    fn description(&self) -> String {
        "Toggle track mute".to_owned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/commands/track.rs"]
mod tests;
