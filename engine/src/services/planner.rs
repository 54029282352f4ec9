//! Stateful controller tying the repository, the edit overlay and the view
//! builders together for one editable planning session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::overlay::{CellState, EditOverlay};
use super::policy::DisplayPolicy;
use super::views::{
    build_consultant_view, build_customer_view, build_project_view, ConsultantRow, CustomerRow,
    ProjectRow,
};
use crate::db::repository::{PlanningRepository, RepositoryError};
use crate::db::services::load_page;
use crate::models::{
    AllocationFact, AllocationId, AllocationPageData, AllocationPatch, CellKey, NewAllocation,
    WeekWindowRequest,
};

#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// An edit was submitted before the first page load completed.
    #[error("no allocation page loaded")]
    NoPage,
}

pub type PlannerResult<T> = Result<T, PlannerError>;

/// What a settled write did to the store, for snapshot bookkeeping.
enum WriteEffect {
    Stored(AllocationFact),
    Removed(AllocationId),
}

/// One planning session over a week window.
///
/// Holds the last fetched page snapshot plus the overlay of in-flight edits.
/// Reads are cheap clones of builder output; writes go through
/// [`submit_cell_edit`](Self::submit_cell_edit) which routes each edit to a
/// create, update or delete against the repository.
pub struct AllocationPlanner<R: PlanningRepository> {
    repo: Arc<R>,
    overlay: EditOverlay,
    snapshot: RwLock<Option<AllocationPageData>>,
    // refreshes may overlap; only the newest fetch is allowed to land
    fetch_generation: AtomicU64,
    applied_generation: AtomicU64,
}

impl<R: PlanningRepository> AllocationPlanner<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            overlay: EditOverlay::new(),
            snapshot: RwLock::new(None),
            fetch_generation: AtomicU64::new(0),
            applied_generation: AtomicU64::new(0),
        }
    }

    pub fn overlay(&self) -> &EditOverlay {
        &self.overlay
    }

    pub fn has_page(&self) -> bool {
        self.snapshot.read().is_some()
    }

    /// Fetch a fresh page for `request` and reconcile pending edits against
    /// it. A fetch that finishes after a newer one already landed is dropped.
    pub async fn refresh(&self, request: WeekWindowRequest) -> PlannerResult<()> {
        let generation = self.fetch_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let page = load_page(self.repo.as_ref(), request).await?;

        let mut snapshot = self.snapshot.write();
        if generation <= self.applied_generation.load(Ordering::SeqCst) {
            log::debug!("dropping stale page fetch (generation {})", generation);
            return Ok(());
        }
        self.applied_generation.store(generation, Ordering::SeqCst);

        let confirmed = self.overlay.reconcile(&page.allocation_facts);
        if confirmed > 0 {
            log::debug!("refresh confirmed {} pending edit(s)", confirmed);
        }
        *snapshot = Some(page);
        Ok(())
    }

    /// Apply one cell edit: the target hours value typed into the grid.
    ///
    /// Routing is decided against the current snapshot: an existing fact is
    /// updated, or deleted when the new value is zero; a missing fact is
    /// created when the value is positive, and a zero over an empty cell is a
    /// no-op. The overlay entry is registered before the write so the grid
    /// never shows the stale value, and rolled back if the write fails.
    ///
    /// Each settled write is folded back into the held snapshot, so a rapid
    /// second edit to the same cell routes against the fact the first edit
    /// just created or removed rather than against the stale fetch.
    pub async fn submit_cell_edit(&self, key: CellKey, hours: f64) -> PlannerResult<()> {
        let existing = {
            let snapshot = self.snapshot.read();
            let page = snapshot.as_ref().ok_or(PlannerError::NoPage)?;
            page.facts_by_cell().get(&key).copied()
        };

        if existing.is_none() && hours <= 0.0 {
            // no fact to delete, but a pending nonzero value may still be
            // showing; the overlay must follow the last-submitted value
            if matches!(self.overlay.state(key), CellState::Pending(v) if v != 0.0) {
                self.overlay.begin_edit(key, 0.0);
            }
            return Ok(());
        }

        let seq = self.overlay.begin_edit(key, hours);
        let outcome = match existing {
            Some((id, _)) if hours <= 0.0 => self
                .repo
                .delete_allocation(id)
                .await
                .map(|_| WriteEffect::Removed(id)),
            Some((id, _)) => self
                .repo
                .update_allocation(id, &AllocationPatch::hours(hours))
                .await
                .map(WriteEffect::Stored),
            None => self
                .repo
                .create_allocation(&NewAllocation::for_cell(key, hours))
                .await
                .map(WriteEffect::Stored),
        };

        match outcome {
            Ok(effect) => {
                self.apply_write_effect(effect);
                Ok(())
            }
            Err(err) => {
                log::warn!("cell edit for {:?} failed, rolling back: {}", key, err);
                self.overlay.rollback(key, seq);
                Err(err.into())
            }
        }
    }

    /// Fold a settled write into the held snapshot so routing stays in step
    /// with the store between refreshes.
    fn apply_write_effect(&self, effect: WriteEffect) {
        let mut snapshot = self.snapshot.write();
        let Some(page) = snapshot.as_mut() else {
            return;
        };
        match effect {
            WriteEffect::Stored(fact) => {
                match page.allocation_facts.iter_mut().find(|f| f.id == fact.id) {
                    Some(slot) => *slot = fact,
                    None => page.allocation_facts.push(fact),
                }
            }
            WriteEffect::Removed(id) => {
                page.allocation_facts.retain(|f| f.id != id);
            }
        }
    }

    /// Clear every cell of a sub-row. Edits run sequentially and the first
    /// failure stops the sweep; cells already cleared stay cleared.
    pub async fn submit_row_clear(&self, keys: &[CellKey]) -> PlannerResult<()> {
        for key in keys {
            self.submit_cell_edit(*key, 0.0).await?;
        }
        Ok(())
    }

    pub fn consultant_view(&self, policy: &DisplayPolicy) -> PlannerResult<Vec<ConsultantRow>> {
        let snapshot = self.snapshot.read();
        let page = snapshot.as_ref().ok_or(PlannerError::NoPage)?;
        Ok(build_consultant_view(page, policy, Some(&self.overlay)))
    }

    pub fn customer_view(&self, policy: &DisplayPolicy) -> PlannerResult<Vec<CustomerRow>> {
        let snapshot = self.snapshot.read();
        let page = snapshot.as_ref().ok_or(PlannerError::NoPage)?;
        Ok(build_customer_view(page, policy))
    }

    pub fn project_view(&self, policy: &DisplayPolicy) -> PlannerResult<Vec<ProjectRow>> {
        let snapshot = self.snapshot.read();
        let page = snapshot.as_ref().ok_or(PlannerError::NoPage)?;
        Ok(build_project_view(page, policy))
    }
}
