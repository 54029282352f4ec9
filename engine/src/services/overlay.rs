//! Optimistic edit overlay.
//!
//! A transient map of cell key to the user's last-submitted hours value,
//! created the instant an edit is submitted (before its write resolves) and
//! retired only when an authoritative fetch confirms the value or the write
//! fails. Each key's state machine:
//!
//! - `Confirmed` (no entry): the grid shows the fetched value.
//! - `Pending(v)`: the grid shows `v` regardless of what the last fetch
//!   returned. Entered synchronously on submit; a rapid resubmission
//!   overwrites the value and bumps the entry's sequence number.
//! - Back to `Confirmed` when [`EditOverlay::reconcile`] sees a fetch whose
//!   fact at the key carries exactly `v` (or no fact at all while `v == 0`,
//!   which is how a delete is confirmed), or when a failed write rolls the
//!   entry back.
//!
//! Write success alone never clears an entry: a stale concurrent fetch could
//! otherwise flicker the cell back to the old value before the read side
//! catches up.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::models::{AllocationFact, CellKey};

/// Observable state of one grid cell's edit lifecycle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CellState {
    /// No in-flight edit; the fetched value is authoritative.
    Confirmed,
    /// An edit is in flight; the grid must show this value.
    Pending(f64),
}

#[derive(Debug, Copy, Clone)]
struct PendingEdit {
    hours: f64,
    seq: u64,
}

#[derive(Default)]
struct OverlayState {
    entries: HashMap<CellKey, PendingEdit>,
    next_seq: u64,
}

/// The pending-edit map. Cheap to share; all methods take `&self`.
#[derive(Default)]
pub struct EditOverlay {
    state: RwLock<OverlayState>,
}

impl EditOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted edit and return its sequence number.
    ///
    /// A second submission for the same key simply overwrites the first: the
    /// overlay always shows the most recently submitted value, and the two
    /// writes race at the store.
    pub fn begin_edit(&self, key: CellKey, hours: f64) -> u64 {
        let mut state = self.state.write();
        state.next_seq += 1;
        let seq = state.next_seq;
        state.entries.insert(key, PendingEdit { hours, seq });
        seq
    }

    /// Remove the entry for a failed write, but only if it still belongs to
    /// that submission. A newer resubmission keeps its pending value even
    /// when an older write for the same cell fails afterwards.
    pub fn rollback(&self, key: CellKey, seq: u64) -> bool {
        let mut state = self.state.write();
        match state.entries.get(&key) {
            Some(entry) if entry.seq == seq => {
                state.entries.remove(&key);
                true
            }
            _ => false,
        }
    }

    /// Current state of a cell.
    pub fn state(&self, key: CellKey) -> CellState {
        match self.state.read().entries.get(&key) {
            Some(entry) => CellState::Pending(entry.hours),
            None => CellState::Confirmed,
        }
    }

    /// Pending value for a cell, if any.
    pub fn value(&self, key: CellKey) -> Option<f64> {
        self.state.read().entries.get(&key).map(|e| e.hours)
    }

    /// Snapshot of all pending entries.
    pub fn pending_entries(&self) -> Vec<(CellKey, f64)> {
        self.state
            .read()
            .entries
            .iter()
            .map(|(key, entry)| (*key, entry.hours))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Retire every pending entry the fetched facts confirm.
    ///
    /// A fact whose summed hours at the key equals the pending value confirms
    /// it; so does the absence of any fact while the pending value is zero
    /// (the delete case — without this rule a delete-to-zero entry would leak
    /// forever). Entries the fetch does not yet agree with stay pending.
    ///
    /// Returns the number of entries cleared.
    pub fn reconcile(&self, facts: &[AllocationFact]) -> usize {
        let mut hours_by_key: HashMap<CellKey, f64> = HashMap::new();
        for fact in facts {
            *hours_by_key.entry(fact.cell_key()).or_insert(0.0) += fact.hours;
        }

        let mut state = self.state.write();
        let before = state.entries.len();
        state.entries.retain(|key, entry| {
            let confirmed = match hours_by_key.get(key) {
                Some(&fetched) => fetched == entry.hours,
                None => entry.hours == 0.0,
            };
            !confirmed
        });
        let cleared = before - state.entries.len();
        if cleared > 0 {
            log::debug!("overlay reconciled: {} entries cleared", cleared);
        }
        cleared
    }
}
