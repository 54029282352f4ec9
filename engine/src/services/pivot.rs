//! Shared pivot machinery for the three view builders.
//!
//! All three views follow one algorithm shape: group effective facts by an
//! outer pivot key, then by a sub-row key, filling one cell per window week.
//! The grouping, cell merging and display transform live here once; the
//! builders in [`super::views`] only choose the key-extraction functions and
//! the row headers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

use super::overlay::EditOverlay;
use super::policy::{display_hours, DisplayPolicy};
use crate::models::{
    AllocationId, AllocationPageData, ConsultantId, ProjectId, RoleId, Week,
};

/// One rendered grid cell.
///
/// `hours` is the raw booked value (what the edit path operates on);
/// `display_hours` is what the grid shows after the display policy. When
/// several facts land in one cell their hours are summed and the first-seen
/// fact contributes the id and role labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub allocation_id: Option<AllocationId>,
    pub hours: f64,
    pub display_hours: f64,
    pub is_hidden: bool,
    pub role_id: Option<RoleId>,
    pub role_name: String,
}

impl Cell {
    pub(crate) fn empty() -> Self {
        Self {
            allocation_id: None,
            hours: 0.0,
            display_hours: 0.0,
            is_hidden: false,
            role_id: None,
            role_name: String::new(),
        }
    }
}

/// Key of a sub-row within a pivot row.
///
/// The variants encode the one load-bearing grouping decision: the unassigned
/// pool keeps (project, role) pairs apart, and the customer/project axes keep
/// (consultant, role) pairs apart, so the same entity booked under two roles
/// renders as two rows instead of one row overwriting the other.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubRowKey {
    /// Per-consultant axis: one row per project the consultant touches.
    Project(ProjectId),
    /// Per-consultant axis, pool row: same project under two roles stays split.
    ProjectRole(ProjectId, Option<RoleId>),
    /// Per-customer and per-project axes: consultant booked under a role.
    ConsultantRole(ConsultantId, Option<RoleId>),
}

/// A generic pivot row: a header for the outer entity, sub-rows with one cell
/// per window week, and the per-week display totals of the visible cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow<H, S> {
    pub header: H,
    pub sub_rows: Vec<S>,
    pub total_by_week: Vec<f64>,
}

/// Anything holding a cells-per-week vector; lets totals be computed once for
/// every sub-row shape.
pub trait WeekCells {
    fn cells(&self) -> &[Cell];
}

/// Per-week sum of `display_hours` across all non-hidden cells.
pub fn totals_by_week<S: WeekCells>(sub_rows: &[S], week_count: usize) -> Vec<f64> {
    let mut totals = vec![0.0; week_count];
    for sub_row in sub_rows {
        for (i, cell) in sub_row.cells().iter().enumerate().take(week_count) {
            if !cell.is_hidden {
                totals[i] += cell.display_hours;
            }
        }
    }
    totals
}

/// A fact after overlay merging: raw facts with pending edits substituted in,
/// plus synthetic entries for pending edits with no backing fact yet.
#[derive(Debug, Clone)]
pub(crate) struct EffectiveFact {
    pub allocation_id: Option<AllocationId>,
    pub consultant_id: Option<ConsultantId>,
    pub project_id: ProjectId,
    pub role_id: Option<RoleId>,
    pub week: Week,
    pub hours: f64,
}

/// Collapse the page's facts to one entry per cell key (duplicates summed,
/// first-seen id kept) and overlay the pending edits: a pending value replaces
/// the fetched hours at its key, and a pending key with no backing fact
/// materializes a synthetic entry so the grid shows it immediately.
pub(crate) fn effective_facts(
    page: &AllocationPageData,
    overlay: Option<&EditOverlay>,
) -> Vec<EffectiveFact> {
    let mut order = Vec::new();
    let mut by_key: HashMap<crate::models::CellKey, EffectiveFact> = HashMap::new();

    for fact in &page.allocation_facts {
        let key = fact.cell_key();
        match by_key.get_mut(&key) {
            Some(existing) => existing.hours += fact.hours,
            None => {
                order.push(key);
                by_key.insert(
                    key,
                    EffectiveFact {
                        allocation_id: Some(fact.id),
                        consultant_id: fact.consultant_id,
                        project_id: fact.project_id,
                        role_id: fact.role_id,
                        week: fact.week_of(),
                        hours: fact.hours,
                    },
                );
            }
        }
    }

    if let Some(overlay) = overlay {
        for (key, pending_hours) in overlay.pending_entries() {
            match by_key.get_mut(&key) {
                Some(existing) => existing.hours = pending_hours,
                None => {
                    order.push(key);
                    by_key.insert(
                        key,
                        EffectiveFact {
                            allocation_id: None,
                            consultant_id: key.consultant_id,
                            project_id: key.project_id,
                            role_id: key.role_id,
                            week: key.week_of(),
                            hours: pending_hours,
                        },
                    );
                }
            }
        }
    }

    order.into_iter().filter_map(|key| by_key.remove(&key)).collect()
}

struct CellAccum {
    cell: Cell,
    contributors: u32,
    hidden: u32,
}

impl CellAccum {
    fn empty() -> Self {
        Self {
            cell: Cell::empty(),
            contributors: 0,
            hidden: 0,
        }
    }
}

/// Group effective facts into `outer key -> sub-row key -> cells` buckets.
///
/// Facts whose week falls outside the window are skipped. The display
/// transform is applied per contributing fact (probability is a per-project
/// attribute), so a cell aggregating several projects shows the sum of their
/// individually weighted hours and counts as hidden only when every
/// contributor is hidden.
pub(crate) fn bucket_facts<K, KF, SF, PF, RF>(
    facts: &[EffectiveFact],
    weeks: &[Week],
    policy: &DisplayPolicy,
    probability_of: PF,
    role_name_of: RF,
    outer_key: KF,
    sub_key: SF,
) -> HashMap<K, HashMap<SubRowKey, Vec<Cell>>>
where
    K: Eq + Hash + Copy,
    KF: Fn(&EffectiveFact) -> Option<K>,
    SF: Fn(&EffectiveFact) -> SubRowKey,
    PF: Fn(ProjectId) -> u8,
    RF: Fn(Option<RoleId>) -> String,
{
    let week_index: HashMap<Week, usize> =
        weeks.iter().enumerate().map(|(i, w)| (*w, i)).collect();

    let mut buckets: HashMap<K, HashMap<SubRowKey, Vec<CellAccum>>> = HashMap::new();

    for fact in facts {
        let Some(outer) = outer_key(fact) else {
            continue;
        };
        let Some(&idx) = week_index.get(&fact.week) else {
            continue;
        };

        let cells = buckets
            .entry(outer)
            .or_default()
            .entry(sub_key(fact))
            .or_insert_with(|| (0..weeks.len()).map(|_| CellAccum::empty()).collect());

        let slot = &mut cells[idx];
        if slot.contributors == 0 {
            slot.cell.allocation_id = fact.allocation_id;
            slot.cell.role_id = fact.role_id;
            slot.cell.role_name = role_name_of(fact.role_id);
        }
        slot.cell.hours += fact.hours;
        let d = display_hours(fact.hours, probability_of(fact.project_id), policy);
        if d.is_hidden {
            slot.hidden += 1;
        } else {
            slot.cell.display_hours += d.display_hours;
        }
        slot.contributors += 1;
    }

    buckets
        .into_iter()
        .map(|(outer, sub_rows)| {
            let sub_rows = sub_rows
                .into_iter()
                .map(|(key, accums)| {
                    let cells = accums
                        .into_iter()
                        .map(|mut accum| {
                            accum.cell.is_hidden =
                                accum.contributors > 0 && accum.hidden == accum.contributors;
                            accum.cell
                        })
                        .collect();
                    (key, cells)
                })
                .collect();
            (outer, sub_rows)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllocationFact, CellKey};
    use crate::services::policy::{ProbabilityMode, VisibilityMode};

    fn fact(id: i64, consultant: Option<i64>, project: i64, week: u32, hours: f64) -> AllocationFact {
        AllocationFact {
            id: AllocationId(id),
            consultant_id: consultant.map(ConsultantId),
            project_id: ProjectId(project),
            role_id: None,
            year: 2025,
            week,
            hours,
        }
    }

    fn page(facts: Vec<AllocationFact>, weeks: Vec<Week>) -> AllocationPageData {
        AllocationPageData {
            allocation_facts: facts,
            weeks,
            ..Default::default()
        }
    }

    #[test]
    fn test_effective_facts_sums_duplicates() {
        let page = page(
            vec![fact(1, Some(1), 1, 3, 4.0), fact(2, Some(1), 1, 3, 2.0)],
            vec![Week::new(2025, 3)],
        );
        let effective = effective_facts(&page, None);
        assert_eq!(effective.len(), 1);
        assert_eq!(effective[0].hours, 6.0);
        assert_eq!(effective[0].allocation_id, Some(AllocationId(1)));
    }

    #[test]
    fn test_effective_facts_overlay_replaces_and_materializes() {
        let page = page(vec![fact(1, Some(1), 1, 3, 4.0)], vec![Week::new(2025, 3)]);
        let overlay = EditOverlay::new();
        overlay.begin_edit(page.allocation_facts[0].cell_key(), 9.0);
        overlay.begin_edit(
            CellKey::new(Some(ConsultantId(2)), ProjectId(1), None, Week::new(2025, 3)),
            5.0,
        );

        let effective = effective_facts(&page, Some(&overlay));
        assert_eq!(effective.len(), 2);
        assert_eq!(effective[0].hours, 9.0);
        assert_eq!(effective[1].hours, 5.0);
        assert_eq!(effective[1].allocation_id, None);
    }

    #[test]
    fn test_bucket_facts_fills_window_cells() {
        let weeks = vec![Week::new(2025, 3), Week::new(2025, 4)];
        let page = page(
            vec![fact(1, Some(1), 1, 4, 8.0), fact(2, Some(1), 1, 7, 8.0)],
            weeks.clone(),
        );
        let effective = effective_facts(&page, None);

        let buckets = bucket_facts(
            &effective,
            &weeks,
            &DisplayPolicy::default(),
            |_| 100,
            |_| String::new(),
            |f| Some(f.consultant_id),
            |f| SubRowKey::Project(f.project_id),
        );

        let sub_rows = &buckets[&Some(ConsultantId(1))];
        let cells = &sub_rows[&SubRowKey::Project(ProjectId(1))];
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].hours, 0.0); // week 3 empty
        assert_eq!(cells[1].hours, 8.0);
        // week 7 falls outside the window and is skipped
    }

    #[test]
    fn test_mixed_probability_cell_hidden_only_when_all_hidden() {
        let weeks = vec![Week::new(2025, 3)];
        // project 1 firm, project 2 tentative; both land in the same
        // consultant-role cell under a customer-style pivot
        let page = page(
            vec![fact(1, Some(1), 1, 3, 8.0), fact(2, Some(1), 2, 3, 8.0)],
            weeks.clone(),
        );
        let effective = effective_facts(&page, None);
        let policy = DisplayPolicy::new(ProbabilityMode::Unweighted, VisibilityMode::FirmOnly);

        let buckets = bucket_facts(
            &effective,
            &weeks,
            &policy,
            |p| if p == ProjectId(1) { 100 } else { 50 },
            |_| String::new(),
            |_| Some(()),
            |f| SubRowKey::ConsultantRole(f.consultant_id.unwrap(), f.role_id),
        );

        let cells = &buckets[&()][&SubRowKey::ConsultantRole(ConsultantId(1), None)];
        assert!(!cells[0].is_hidden);
        assert_eq!(cells[0].hours, 16.0);
        assert_eq!(cells[0].display_hours, 8.0); // tentative contributor hidden
    }
}
