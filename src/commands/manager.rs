use std::collections::VecDeque;

use crate::{
    commands::{Command, CommandContext},
    foundation::error::ReelResult,
};

/// Undo/redo history over executed commands.
///
/// - A failed `execute` is logged, returned, and never recorded.
/// - Executing a new command clears the redo stack.
/// - The undo stack keeps at most `max_depth` entries, dropping the oldest.
pub struct CommandManager {
    undo_stack: VecDeque<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
    max_depth: usize,
}

impl std::fmt::Debug for CommandManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandManager")
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new(100)
    }
}

impl CommandManager {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    pub fn execute(&mut self, ctx: &CommandContext<'_>, mut cmd: Box<dyn Command>) -> ReelResult<()> {
        let label = cmd.description();
        if let Err(err) = cmd.execute(ctx) {
            tracing::warn!(command = %label, error = %err, "command rejected");
            return Err(err);
        }
        tracing::debug!(command = %label, "command executed");
        self.redo_stack.clear();
        self.undo_stack.push_back(cmd);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
        Ok(())
    }

    /// Undo the most recent command. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, ctx: &CommandContext<'_>) -> ReelResult<bool> {
        let Some(mut cmd) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        cmd.undo(ctx)?;
        tracing::debug!(command = %cmd.description(), "command undone");
        self.redo_stack.push(cmd);
        Ok(true)
    }

    /// Re-execute the most recently undone command. A redo that now fails is discarded.
    pub fn redo(&mut self, ctx: &CommandContext<'_>) -> ReelResult<bool> {
        let Some(mut cmd) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(err) = cmd.execute(ctx) {
            tracing::warn!(command = %cmd.description(), error = %err, "redo failed");
            return Err(err);
        }
        tracing::debug!(command = %cmd.description(), "command redone");
        self.undo_stack.push_back(cmd);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.back().map(|c| c.description())
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|c| c.description())
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/commands/manager.rs"]
mod tests;
