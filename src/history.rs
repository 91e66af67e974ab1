//! Undo/redo history: transaction-based snapshot tracking.
//!
//! Records every composer mutation as a [`Transaction`] holding the
//! (segments, cursor) state before and after. A transaction is the atomic
//! unit of undo/redo; the composer coalesces a run of consecutive typing
//! into one transaction, so a typed burst undoes as a unit, while every
//! structural edit (chip insertion, deletion, span removal) is its own.
//!
//! Snapshots rather than granular splices: a composer line is small, and
//! chips make splice replay easy to get subtly wrong, while before/after
//! snapshots are exact by construction. The stack discipline is the usual
//! one: new transactions clear the redo stack (no branching history), and
//! empty transactions (state unchanged between begin and commit) are
//! silently discarded.
//!
//! # Usage
//!
//! ```text
//! history.begin(snapshot_before);
//! // mutate the buffer/cursor
//! history.commit(snapshot_after);
//! ```
//!
//! A `begin` while a transaction is still pending commits the pending one
//! first, using the new `before` as its `after` (the new operation's
//! pre-state is exactly the old operation's post-state).

use crate::position::Position;
use crate::segment::Segment;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A full copy of the editor state at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub segments: Vec<Segment>,
    pub cursor: Position,
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A pair of snapshots that undo/redo as one atomic unit.
#[derive(Debug, Clone)]
struct Transaction {
    before: Snapshot,
    after: Snapshot,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Undo/redo history for one composer.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Transaction>,
    redo_stack: Vec<Transaction>,
    /// The `before` snapshot of an open transaction, when one is pending.
    pending: Option<Snapshot>,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pending: None,
        }
    }

    /// Start a transaction from the given pre-state. If a transaction is
    /// still pending, it is committed first with this snapshot as its
    /// post-state.
    pub fn begin(&mut self, before: Snapshot) {
        if self.pending.is_some() {
            self.commit(before.clone());
        }
        self.pending = Some(before);
    }

    /// Finalize the pending transaction with its post-state. A transaction
    /// whose state did not change is silently discarded. Committing a real
    /// change clears the redo stack.
    pub fn commit(&mut self, after: Snapshot) {
        if let Some(before) = self.pending.take() {
            if before == after {
                return;
            }
            self.redo_stack.clear();
            self.undo_stack.push(Transaction { before, after });
        }
    }

    /// True while a transaction is open (begun, not committed).
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Record that an edit landed inside the open transaction. Forward
    /// history dies the moment a new edit actually happens; waiting for
    /// the commit would leave a stale redo stack visible mid-transaction.
    pub fn note_edit(&mut self) {
        if self.pending.is_some() {
            self.redo_stack.clear();
        }
    }

    /// Undo the last transaction, returning the snapshot to restore, or
    /// `None` when there is nothing to undo. `current` is the live state,
    /// used to auto-commit a still-pending transaction so it can be undone.
    pub fn undo(&mut self, current: &Snapshot) -> Option<Snapshot> {
        if self.pending.is_some() {
            self.commit(current.clone());
        }
        let txn = self.undo_stack.pop()?;
        let restore = txn.before.clone();
        self.redo_stack.push(txn);
        Some(restore)
    }

    /// Redo the last undone transaction, returning the snapshot to restore,
    /// or `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<Snapshot> {
        let txn = self.redo_stack.pop()?;
        let restore = txn.after.clone();
        self.undo_stack.push(txn);
        Some(restore)
    }

    /// True if there are transactions that can be undone.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.pending.is_some()
    }

    /// True if there are transactions that can be redone.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of committed transactions on the undo stack.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of transactions on the redo stack.
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
