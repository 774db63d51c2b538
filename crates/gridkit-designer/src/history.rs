//! Undo/redo history.
//!
//! [`UndoRedoManager`] keeps two stacks of opaque [`Operation`] records. It
//! never applies anything itself: `undo()` hands back the operation so the
//! caller can restore its `before` payload, `redo()` so the caller can
//! re-apply `after`.
//!
//! Pushing new work clears the redo stack. The undo stack is bounded; on
//! overflow the oldest operations are evicted first, so the most recent
//! `max_stack_size` operations are always kept, newest last.

use chrono::{DateTime, Utc};
use gridkit_core::constants::DEFAULT_MAX_HISTORY;
use gridkit_core::{Observers, SubscriptionId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// Kind of edit an operation records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Transform,
    Crop,
    LayerAdd,
    LayerRemove,
    LayerReorder,
    LayerUpdate,
    Paste,
    PresetApply,
    Annotation,
    Configuration,
}

impl OperationType {
    pub fn label(&self) -> &'static str {
        match self {
            OperationType::Transform => "Transform",
            OperationType::Crop => "Crop",
            OperationType::LayerAdd => "Add Layer",
            OperationType::LayerRemove => "Remove Layer",
            OperationType::LayerReorder => "Reorder Layers",
            OperationType::LayerUpdate => "Update Layer",
            OperationType::Paste => "Paste",
            OperationType::PresetApply => "Apply Preset",
            OperationType::Annotation => "Annotate",
            OperationType::Configuration => "Configuration",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A recorded edit: caller-supplied snapshots of the target before and after.
///
/// The history never interprets `before` / `after`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: Uuid,
    pub op_type: OperationType,
    pub target_id: String,
    pub description: String,
    pub before: Value,
    pub after: Value,
    pub timestamp: DateTime<Utc>,
}

impl Operation {
    /// Creates an operation stamped with the current time and a fresh id.
    pub fn new(
        op_type: OperationType,
        description: impl Into<String>,
        target_id: impl Into<String>,
        before: Value,
        after: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            op_type,
            target_id: target_id.into(),
            description: description.into(),
            before,
            after,
            timestamp: Utc::now(),
        }
    }
}

/// One-line, human-readable rendering of an operation for history lists.
pub fn format_operation(op: &Operation) -> String {
    let local = op.timestamp.format("%H:%M:%S");
    if op.target_id.is_empty() {
        format!("[{}] {}: {}", local, op.op_type, op.description)
    } else {
        format!(
            "[{}] {} ({}): {}",
            local, op.op_type, op.target_id, op.description
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_operation(self))
    }
}

/// Both stacks and the bound, as published to observers.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryState {
    /// Oldest first.
    pub undo_stack: Vec<Operation>,
    /// Oldest first; the next redo is the last element.
    pub redo_stack: Vec<Operation>,
    pub max_stack_size: usize,
}

/// Manages bounded undo/redo stacks.
#[derive(Debug)]
pub struct UndoRedoManager {
    state: HistoryState,
    observers: Observers<HistoryState>,
}

impl UndoRedoManager {
    /// Creates an empty history bounded to `max_stack_size` undo entries.
    pub fn new(max_stack_size: usize) -> Self {
        Self {
            state: HistoryState {
                undo_stack: Vec::new(),
                redo_stack: Vec::new(),
                max_stack_size,
            },
            observers: Observers::new(),
        }
    }

    pub fn state(&self) -> &HistoryState {
        &self.state
    }

    /// Records new work: appends to the undo stack, clears redo, evicts the
    /// oldest entries beyond the bound.
    pub fn push_operation(&mut self, op: Operation) {
        debug!("history push: {}", op);
        self.state.undo_stack.push(op);
        self.state.redo_stack.clear();

        let bound = self.state.max_stack_size;
        if self.state.undo_stack.len() > bound {
            let excess = self.state.undo_stack.len() - bound;
            self.state.undo_stack.drain(..excess);
        }
        self.notify();
    }

    /// Moves the newest operation to the redo stack and returns it so the
    /// caller can restore its `before` payload. `None` when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> Option<Operation> {
        let op = self.state.undo_stack.pop()?;
        debug!("history undo: {}", op);
        self.state.redo_stack.push(op.clone());
        self.notify();
        Some(op)
    }

    /// Moves the newest undone operation back to the undo stack and returns
    /// it so the caller can re-apply its `after` payload.
    pub fn redo(&mut self) -> Option<Operation> {
        let op = self.state.redo_stack.pop()?;
        debug!("history redo: {}", op);
        self.state.undo_stack.push(op.clone());
        self.notify();
        Some(op)
    }

    pub fn can_undo(&self) -> bool {
        !self.state.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.state.redo_stack.is_empty()
    }

    /// Empties both stacks.
    pub fn clear_history(&mut self) {
        self.state.undo_stack.clear();
        self.state.redo_stack.clear();
        self.notify();
    }

    pub fn max_stack_size(&self) -> usize {
        self.state.max_stack_size
    }

    /// Changes the bound. Existing entries are not trimmed here; the new
    /// bound is enforced by the next push.
    pub fn set_max_stack_size(&mut self, max_stack_size: usize) {
        self.state.max_stack_size = max_stack_size;
        self.notify();
    }

    /// Undo stack, oldest first.
    pub fn undo_stack(&self) -> &[Operation] {
        &self.state.undo_stack
    }

    /// Redo stack, oldest first.
    pub fn redo_stack(&self) -> &[Operation] {
        &self.state.redo_stack
    }

    pub fn undo_depth(&self) -> usize {
        self.state.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.state.redo_stack.len()
    }

    /// Description of the operation `undo()` would return, for menu labels.
    pub fn peek_undo(&self) -> Option<&str> {
        self.state.undo_stack.last().map(|op| op.description.as_str())
    }

    /// Description of the operation `redo()` would return.
    pub fn peek_redo(&self) -> Option<&str> {
        self.state.redo_stack.last().map(|op| op.description.as_str())
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&HistoryState) + 'static,
    {
        self.observers.subscribe(&self.state, listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn notify(&mut self) {
        self.observers.notify(&self.state);
    }
}

impl Default for UndoRedoManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}
