//! Undoable mutations of the track list.
//!
//! Every command captures the full track list before it mutates anything and restores that
//! snapshot verbatim on undo. Forward mutations build a fresh list and publish it in one step.

use std::sync::Arc;

use crate::{
    assets::library::MediaAssetStore,
    editor::project::ProjectStore,
    foundation::error::{ReelError, ReelResult},
    timeline::{
        model::{Element, Track, TrackList},
        store::TimelineStore,
    },
};

pub mod clipboard;
pub mod duplicate;
pub mod element;
pub mod manager;
pub mod split;
pub mod track;

/// Stores a command reads from and writes to.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    pub timeline: &'a TimelineStore,
    pub media: &'a dyn MediaAssetStore,
    pub project: &'a ProjectStore,
}

/// One undoable mutation of the track list.
///
/// `execute` must leave state untouched when it returns `Err`. A command is never executed twice
/// without an intervening `undo`.
pub trait Command: Send {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()>;

    fn undo(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()>;

    /// Human-readable label for history UIs.
    fn description(&self) -> String;
}

/// Pre-execute copy of the track list.
#[derive(Debug, Default)]
pub(crate) struct Snapshot {
    saved: Option<TrackList>,
}

impl Snapshot {
    /// Run `edit` against the current list and publish its result; the prior list becomes the
    /// undo snapshot. On error nothing is published.
    pub(crate) fn apply(
        &mut self,
        ctx: &CommandContext<'_>,
        edit: impl FnOnce(&[Track]) -> ReelResult<Vec<Track>>,
    ) -> ReelResult<()> {
        let before = ctx.timeline.tracks();
        let next = edit(&before)?;
        self.saved = Some(before);
        ctx.timeline.replace(Arc::new(next));
        Ok(())
    }

    pub(crate) fn restore(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        let saved = self
            .saved
            .take()
            .ok_or_else(|| ReelError::validation("command has not been executed"))?;
        ctx.timeline.replace(saved);
        Ok(())
    }
}

/// A `(track, element)` address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ElementRef {
    pub track_id: String,
    pub element_id: String,
}

impl ElementRef {
    pub fn new(track_id: impl Into<String>, element_id: impl Into<String>) -> Self {
        Self {
            track_id: track_id.into(),
            element_id: element_id.into(),
        }
    }
}

pub(crate) fn track_index(tracks: &[Track], track_id: &str) -> ReelResult<usize> {
    tracks
        .iter()
        .position(|t| t.id == track_id)
        .ok_or_else(|| ReelError::not_found(format!("track '{track_id}'")))
}

pub(crate) fn lookup_element<'t>(tracks: &'t [Track], at: &ElementRef) -> ReelResult<&'t Element> {
    let ti = track_index(tracks, &at.track_id)?;
    tracks[ti].element(&at.element_id).ok_or_else(|| {
        ReelError::not_found(format!(
            "element '{}' on track '{}'",
            at.element_id, at.track_id
        ))
    })
}

/// Copy of `tracks` with `f` applied to the element at `at`.
pub(crate) fn map_element(
    tracks: &[Track],
    at: &ElementRef,
    f: impl FnOnce(&mut Element) -> ReelResult<()>,
) -> ReelResult<Vec<Track>> {
    lookup_element(tracks, at)?;
    let mut next = tracks.to_vec();
    let ti = track_index(&next, &at.track_id)?;
    let el = next[ti]
        .element_mut(&at.element_id)
        .ok_or_else(|| ReelError::not_found(format!("element '{}'", at.element_id)))?;
    f(el)?;
    Ok(next)
}

/// Copy of `tracks` where every targeted element is replaced by whatever `f` returns for it.
pub(crate) fn flat_map_targets(
    tracks: &[Track],
    targets: &[ElementRef],
    mut f: impl FnMut(&Element) -> Vec<Element>,
) -> Vec<Track> {
    tracks
        .iter()
        .map(|track| {
            let is_target = |e: &Element| {
                targets
                    .iter()
                    .any(|r| r.track_id == track.id && r.element_id == e.id)
            };
            if !track.elements.iter().any(is_target) {
                return track.clone();
            }
            let mut out = track.clone();
            out.elements = track
                .elements
                .iter()
                .flat_map(|e| if is_target(e) { f(e) } else { vec![e.clone()] })
                .collect();
            out
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/commands/support.rs"]
pub(crate) mod test_support;
