use crate::{
    commands::{Command, CommandContext, ElementRef, Snapshot, flat_map_targets},
    foundation::error::ReelResult,
    timeline::model::Element,
};

/// Gap left between an element and its duplicate.
pub const DUPLICATE_GAP: f64 = 0.1;

/// Clone elements right after themselves under new ids with a `" (copy)"` suffix.
#[derive(Debug)]
pub struct DuplicateElements {
    targets: Vec<ElementRef>,
    duplicated_ids: Vec<String>,
    snapshot: Snapshot,
}

impl DuplicateElements {
    pub fn new(targets: Vec<ElementRef>) -> Self {
        Self {
            targets,
            duplicated_ids: Vec::new(),
            snapshot: Snapshot::default(),
        }
    }

    pub fn duplicated_ids(&self) -> &[String] {
        &self.duplicated_ids
    }
}

pub fn duplicate_element(el: &Element) -> Element {
    Element {
        name: format!("{} (copy)", el.name),
        start_time: el.end_time() + DUPLICATE_GAP,
        ..el.with_new_id()
    }
}

impl Command for DuplicateElements {
    fn execute(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        let targets = &self.targets;
        let mut created = Vec::new();
        self.snapshot.apply(ctx, |tracks| {
            Ok(flat_map_targets(tracks, targets, |el| {
                let copy = duplicate_element(el);
                created.push(copy.id.clone());
                vec![el.clone(), copy]
            }))
        })?;
        self.duplicated_ids = created;
        Ok(())
    }

    fn undo(&mut self, ctx: &CommandContext<'_>) -> ReelResult<()> {
        self.snapshot.restore(ctx)
    }

    fn description(&self) -> String {
        format!("Duplicate {} element(s)", self.targets.len())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/commands/duplicate.rs"]
mod tests;
