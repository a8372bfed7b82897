//! Linear edit history.
//!
//! [`EditHistory`] owns the current [`AdjustmentState`], the current baseline
//! bitmap, the original upload, and two stacks of snapshots. Every edit goes
//! through [`EditHistory::commit`], which records the pre-edit snapshot on
//! the undo stack and clears the redo stack. There is no branching: the
//! first commit after an undo throws the redo history away.
//!
//! ```text
//!            commit(s2)          undo             commit(s3)
//! undo: [s0]  ───────►  [s0,s1]  ───►  [s0]  ──────────►  [s0,s1]
//! cur:   s1              s2             s1                  s3
//! redo: []               []             [s2]                []
//! ```
//!
//! Snapshots are cheap: the state is `Copy` and baselines are shared
//! [`ImageHandle`]s, so a snapshot never copies pixels.

use crate::imaging::ImageHandle;
use crate::state::AdjustmentState;
use std::collections::VecDeque;

/// Snapshot of everything an undo restores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryEntry {
    pub state: AdjustmentState,
    /// `None` until the first upload.
    pub baseline: Option<ImageHandle>,
}

#[derive(Debug, Default)]
pub struct EditHistory {
    original: Option<ImageHandle>,
    current: HistoryEntry,
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    /// Maximum undo depth; `None` is unbounded.
    limit: Option<usize>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History that forgets its oldest entries beyond `limit` undo steps.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Start over with a freshly uploaded image.
    pub fn upload(&mut self, image: ImageHandle) {
        self.original = Some(image.clone());
        self.current = HistoryEntry {
            state: AdjustmentState::default(),
            baseline: Some(image),
        };
        self.undo_stack.clear();
        self.redo_stack.clear();
        tracing::debug!("history reset for new upload");
    }

    /// Record the current snapshot and adopt a new state.
    ///
    /// `baseline` replaces the current baseline when given, otherwise the
    /// current one is kept.
    pub fn commit(&mut self, state: AdjustmentState, baseline: Option<ImageHandle>) {
        let next = HistoryEntry {
            state,
            baseline: baseline.or_else(|| self.current.baseline.clone()),
        };
        let previous = std::mem::replace(&mut self.current, next);
        self.push_undo(previous);
        self.redo_stack.clear();
        tracing::debug!(undo = self.undo_stack.len(), "committed edit");
    }

    /// Step back one edit. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.undo_stack.pop_back() else {
            return false;
        };
        let previous = std::mem::replace(&mut self.current, entry);
        self.redo_stack.push(previous);
        tracing::debug!(
            undo = self.undo_stack.len(),
            redo = self.redo_stack.len(),
            "undo"
        );
        true
    }

    /// Re-apply the most recently undone edit. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.redo_stack.pop() else {
            return false;
        };
        let previous = std::mem::replace(&mut self.current, entry);
        self.push_undo(previous);
        tracing::debug!(
            undo = self.undo_stack.len(),
            redo = self.redo_stack.len(),
            "redo"
        );
        true
    }

    /// Commit default adjustments over the original upload.
    ///
    /// A no-op (returning `false`) before the first upload.
    pub fn reset(&mut self) -> bool {
        let Some(original) = self.original.clone() else {
            return false;
        };
        self.commit(AdjustmentState::default(), Some(original));
        true
    }

    fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo_stack.push_back(entry);
        if let Some(limit) = self.limit {
            while self.undo_stack.len() > limit {
                self.undo_stack.pop_front();
            }
        }
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

    pub fn state(&self) -> &AdjustmentState {
        &self.current.state
    }

    pub fn baseline(&self) -> Option<&ImageHandle> {
        self.current.baseline.as_ref()
    }

    pub fn original(&self) -> Option<&ImageHandle> {
        self.original.as_ref()
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.current
    }
}
