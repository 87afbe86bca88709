//! Linear undo/redo of document edits.
//!
//! Each edit is recorded as a [`HistoryAction`] that knows how to apply and
//! invert itself against an element sequence. The manager never touches the
//! document directly; it returns new sequences for the caller to install.

use crate::shapes::ElementRef;
use std::sync::Arc;

/// A single reversible document edit.
#[derive(Debug, Clone)]
pub enum HistoryAction {
    /// An element was appended.
    Add(ElementRef),
    /// An element was removed from `index`.
    Remove { element: ElementRef, index: usize },
}

impl HistoryAction {
    /// The action that undoes this one.
    ///
    /// The inverse of an `Add` removes that element; the inverse of a
    /// `Remove` puts it back at its recorded index.
    pub fn inverse(&self) -> Inverse<'_> {
        Inverse(self)
    }

    /// Apply the forward effect: `Add` appends, `Remove` deletes by identity.
    pub fn apply(&self, current: &[ElementRef]) -> Vec<ElementRef> {
        match self {
            HistoryAction::Add(element) => {
                let mut next = current.to_vec();
                next.push(element.clone());
                next
            }
            HistoryAction::Remove { element, .. } => without(current, element),
        }
    }
}

/// Borrowed inverse of a [`HistoryAction`].
#[derive(Debug, Clone, Copy)]
pub struct Inverse<'a>(&'a HistoryAction);

impl Inverse<'_> {
    pub fn apply(&self, current: &[ElementRef]) -> Vec<ElementRef> {
        match self.0 {
            HistoryAction::Add(element) => without(current, element),
            HistoryAction::Remove { element, index } => {
                let mut next = current.to_vec();
                let index = (*index).min(next.len());
                next.insert(index, element.clone());
                next
            }
        }
    }
}

fn without(current: &[ElementRef], element: &ElementRef) -> Vec<ElementRef> {
    current
        .iter()
        .filter(|e| !Arc::ptr_eq(e, element))
        .cloned()
        .collect()
}

/// Two unbounded stacks of actions.
#[derive(Debug, Clone, Default)]
pub struct HistoryManager {
    undo_stack: Vec<HistoryAction>,
    redo_stack: Vec<HistoryAction>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit. Any redoable actions are discarded.
    pub fn track(&mut self, action: HistoryAction) {
        self.undo_stack.push(action);
        self.redo_stack.clear();
    }

    /// Undo the latest action, returning the resulting sequence.
    ///
    /// With nothing to undo, `current` is returned unchanged.
    pub fn undo(&mut self, current: &[ElementRef]) -> Vec<ElementRef> {
        let Some(action) = self.undo_stack.pop() else {
            return current.to_vec();
        };
        let next = action.inverse().apply(current);
        self.redo_stack.push(action);
        next
    }

    /// Redo the latest undone action, returning the resulting sequence.
    pub fn redo(&mut self, current: &[ElementRef]) -> Vec<ElementRef> {
        let Some(action) = self.redo_stack.pop() else {
            return current.to_vec();
        };
        let next = action.apply(current);
        self.undo_stack.push(action);
        next
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
