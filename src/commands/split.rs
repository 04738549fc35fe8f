use crate::{
    commands::{Command, CommandContext, ElementRef, Snapshot, flat_map_targets},
    foundation::{error::ReelResult, ids::generate_id},
    timeline::model::Element,
};

/// Which pieces survive a split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitRetain {
    /// Keep both pieces; the right piece gets a new id.
    #[default]
    Both,
    /// Keep the left piece under the original id.
    Left,
    /// Keep the right piece under a new id.
    Right,
}

/// Split elements at `time`. Elements whose interval does not strictly contain `time` are left
/// untouched.
#[derive(Debug)]
pub struct SplitElements {
    targets: Vec<ElementRef>,
    time: f64,
    retain: SplitRetain,
    new_element_ids: Vec<String>,
    snapshot: Snapshot,
}

impl SplitElements {
    pub fn new(targets: Vec<ElementRef>, time: f64, retain: SplitRetain) -> Self {
        Self {
            targets,
            time,
            retain,
            new_element_ids: Vec::new(),
            snapshot: Snapshot::default(),
        }
    }

    /// Ids of right-hand pieces created by the last execution.
    pub fn new_element_ids(&self) -> &[String] {
        &self.new_element_ids
    }
}

/// `(left, right)` pieces of `el` cut at timeline time `t`, or `None` when `t` is outside it.
pub fn split_element(el: &Element, t: f64) -> Option<(Element, Element)> {
    if !el.strictly_contains(t) {
        return None;
    }
    let first = t - el.start_time;
    let second = el.effective_duration() - first;
    let left = Element {
        trim_end: el.trim_end + second,
        name: format!("{} (left)", el.name),
        ..el.clone()
    };
    let right = Element {
        id: generate_id(),
        start_time: t,
        trim_start: el.trim_start + first,
        name: format!("{} (right)", el.name),
        ..el.clone()
    };
    Some((left, right))
}

impl Command for SplitElements {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        let (targets, time, retain) = (&self.targets, self.time, self.retain);
        let mut created = Vec::new();
        self.snapshot.apply(ctx, |tracks| {
            Ok(flat_map_targets(tracks, targets, |el| {
                let Some((left, right)) = split_element(el, time) else {
                    return vec![el.clone()];
                };
                match retain {
                    SplitRetain::Both => {
                        created.push(right.id.clone());
                        vec![left, right]
                    }
                    SplitRetain::Left => vec![left],
                    SplitRetain::Right => vec![right],
                }
            }))
        })?;
        tracing::debug!(time, pieces = created.len(), "split elements");
        self.new_element_ids = created;
        Ok(())
    }

    fn undo(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        self.snapshot.restore(ctx)
    }

    fn description(&self) -> String {
        "Split elements".to_owned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/commands/split.rs"]
mod tests;
