use crate::{
    commands::{Command, CommandContext, ElementRef, Snapshot, lookup_element},
    foundation::error::{ReelError, ReelResult},
    timeline::{
        model::{Element, Track, TrackKind},
        validate::{
            validate_element_timing, validate_element_track_compatibility,
            validate_required_fields,
        },
    },
};

/// A copied element together with the kind of track it came from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClipboardItem {
    pub track_kind: TrackKind,
    pub element: Element,
}

/// Copy buffer for elements.
#[derive(Clone, Debug, Default)]
pub struct Clipboard {
    items: Vec<ClipboardItem>,
}

impl Clipboard {
    /// Replace the buffer with the selected elements. Unknown selections are skipped.
    pub fn copy(&mut self, tracks: &[Track], selection: &[ElementRef]) -> usize {
        self.items = selection
            .iter()
            .filter_map(|at| {
                let element = lookup_element(tracks, at).ok()?;
                let track = tracks.iter().find(|t| t.id == at.track_id)?;
                Some(ClipboardItem {
                    track_kind: track.kind,
                    element: element.clone(),
                })
            })
            .collect();
        self.items.len()
    }

    pub fn items(&self) -> &[ClipboardItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Paste clipboard items at `time`, keeping their relative offsets.
///
/// Every track of an item's recorded kind receives its own copy with a fresh id. Items with no
/// such track are dropped. A copy that fails placement validation rejects the whole paste.
#[derive(Debug)]
pub struct PasteElements {
    time: f64,
    items: Vec<ClipboardItem>,
    pasted_ids: Vec<String>,
    snapshot: Snapshot,
}

impl PasteElements {
    pub fn new(time: f64, items: Vec<ClipboardItem>) -> Self {
        Self {
            time,
            items,
            pasted_ids: Vec::new(),
            snapshot: Snapshot::default(),
        }
    }

    pub fn pasted_ids(&self) -> &[String] {
        &self.pasted_ids
    }
}

impl Command for PasteElements {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        if self.items.is_empty() {
            return Err(ReelError::validation("clipboard is empty"));
        }
        let (items, time) = (&self.items, self.time);
        let anchor = items
            .iter()
            .map(|i| i.element.start_time)
            .fold(f64::INFINITY, f64::min);
        let mut pasted = Vec::new();
        self.snapshot.apply(ctx, |tracks| {
            let mut next = tracks.to_vec();
            for item in items {
                let offset = item.element.start_time - anchor;
                let start_time = (time + offset).max(0.0);
                let mut placed = false;
                for track in next.iter_mut().filter(|t| t.kind == item.track_kind) {
                    let element = Element {
                        start_time,
                        ..item.element.with_new_id()
                    };
                    validate_element_track_compatibility(&element, track).into_result()?;
                    validate_required_fields(&element)?;
                    validate_element_timing(&element)?;
                    pasted.push(element.id.clone());
                    track.elements.push(element);
                    placed = true;
                }
                if !placed {
                    tracing::debug!(kind = item.track_kind.as_str(), "no track for pasted item");
                }
            }
            if pasted.is_empty() {
                return Err(ReelError::not_found("no track accepts the clipboard items"));
            }
            Ok(next)
        })?;
        self.pasted_ids = pasted;
        Ok(())
    }

    fn undo(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        self.snapshot.restore(ctx)
    }

    fn description(&self) -> String {
        format!("Paste {} element(s)", self.items.len())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/commands/clipboard.rs"]
mod tests;
