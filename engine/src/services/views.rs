//! The three pivoted views of the allocation grid.
//!
//! Pure functions of (page, policy[, overlay]): they may be called repeatedly
//! per render pass, never mutate their inputs and never fail — a dangling
//! foreign key renders the fallback label and color instead of an error.

use std::collections::HashMap;

use super::overlay::EditOverlay;
use super::pivot::{
    bucket_facts, effective_facts, totals_by_week, Cell, PivotRow, SubRowKey, WeekCells,
};
use super::policy::DisplayPolicy;
use crate::models::{
    AllocationPageData, Consultant, ConsultantId, Customer, CustomerId, Project, ProjectId, Role,
    RoleId, FALLBACK_COLOR, UNASSIGNED, UNKNOWN_LABEL,
};
use serde::{Deserialize, Serialize};

/// Synthetic customer id grouping facts whose project lookup misses.
const UNKNOWN_CUSTOMER: CustomerId = CustomerId(-1);

/// A project row nested under a consultant.
///
/// `role_id`/`role_name` are set only for rows of the unassigned pool, whose
/// sub-rows are split per role; ordinary consultant rows may carry a
/// different role per cell instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSubRow {
    pub project_id: ProjectId,
    pub project_name: String,
    pub customer_name: String,
    pub customer_color: String,
    pub probability: u8,
    pub role_id: Option<RoleId>,
    pub role_name: String,
    pub cells: Vec<Cell>,
}

/// A consultant-under-a-role row nested under a customer or project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultantSubRow {
    /// [`UNASSIGNED`] for the "To plan" pool.
    pub consultant_id: ConsultantId,
    pub consultant_name: String,
    pub role_id: Option<RoleId>,
    pub role_name: String,
    pub cells: Vec<Cell>,
}

impl WeekCells for ProjectSubRow {
    fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl WeekCells for ConsultantSubRow {
    fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

pub type ConsultantRow = PivotRow<Consultant, ProjectSubRow>;
pub type CustomerRow = PivotRow<Customer, ConsultantSubRow>;
pub type ProjectRow = PivotRow<Project, ConsultantSubRow>;

impl ConsultantRow {
    /// Booked share of available capacity per week (0 when no capacity).
    ///
    /// This is the value the grid colors the capacity band with.
    pub fn load_by_week(&self) -> Vec<f64> {
        self.total_by_week
            .iter()
            .zip(&self.header.available_hours_by_week)
            .map(|(total, available)| {
                if *available > 0.0 {
                    total / available
                } else {
                    0.0
                }
            })
            .collect()
    }
}

struct Lookups<'a> {
    projects: HashMap<ProjectId, &'a Project>,
    customers: HashMap<CustomerId, &'a Customer>,
    consultants: HashMap<ConsultantId, &'a Consultant>,
    roles: HashMap<RoleId, &'a Role>,
}

impl<'a> Lookups<'a> {
    fn new(page: &'a AllocationPageData) -> Self {
        Self {
            projects: page.projects.iter().map(|p| (p.id, p)).collect(),
            customers: page.customers.iter().map(|c| (c.id, c)).collect(),
            consultants: page.consultants.iter().map(|c| (c.id, c)).collect(),
            roles: page.roles.iter().map(|r| (r.id, r)).collect(),
        }
    }

    fn probability_of(&self, project_id: ProjectId) -> u8 {
        self.projects
            .get(&project_id)
            .map(|p| p.effective_probability())
            .unwrap_or(100)
    }

    fn role_name_of(&self, role_id: Option<RoleId>) -> String {
        role_id
            .and_then(|id| self.roles.get(&id))
            .map(|r| r.name.clone())
            .unwrap_or_default()
    }

    fn consultant_name_of(&self, consultant_id: ConsultantId) -> String {
        self.consultants
            .get(&consultant_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| {
                if consultant_id == UNASSIGNED {
                    crate::models::UNASSIGNED_LABEL.to_string()
                } else {
                    UNKNOWN_LABEL.to_string()
                }
            })
    }
}

fn sort_key(name: &str) -> String {
    name.to_lowercase()
}

/// Build the per-consultant view: one row per consultant ("To plan" pool
/// first, then alphabetical), one sub-row per project touched — pool sub-rows
/// keep (project, role) pairs apart. Sub-rows whose raw hours are zero across
/// the whole window are dropped so removed bookings don't leave stale rows.
///
/// `overlay` carries the in-flight optimistic edits of the editable grid;
/// pending values replace fetched hours and pending keys without a backing
/// fact materialize as new cells immediately.
pub fn build_consultant_view(
    page: &AllocationPageData,
    policy: &DisplayPolicy,
    overlay: Option<&EditOverlay>,
) -> Vec<ConsultantRow> {
    let lookups = Lookups::new(page);
    let facts = effective_facts(page, overlay);

    let mut buckets = bucket_facts(
        &facts,
        &page.weeks,
        policy,
        |p| lookups.probability_of(p),
        |r| lookups.role_name_of(r),
        |f| Some(f.consultant_id.unwrap_or(UNASSIGNED)),
        |f| {
            if f.consultant_id.unwrap_or(UNASSIGNED) == UNASSIGNED {
                SubRowKey::ProjectRole(f.project_id, f.role_id)
            } else {
                SubRowKey::Project(f.project_id)
            }
        },
    );

    // Every directory consultant gets a row; facts pointing at ids the
    // directory doesn't know get a synthesized header instead of vanishing.
    let mut headers: Vec<Consultant> = page.consultants.clone();
    for id in buckets.keys() {
        if !lookups.consultants.contains_key(id) {
            if *id == UNASSIGNED {
                headers.push(Consultant::unassigned_pool(page.weeks.len()));
            } else {
                headers.push(Consultant {
                    id: *id,
                    name: UNKNOWN_LABEL.to_string(),
                    is_external: false,
                    team_id: None,
                    hours_per_week: 0.0,
                    available_hours_by_week: vec![0.0; page.weeks.len()],
                    unavailable_by_week: vec![false; page.weeks.len()],
                });
            }
        }
    }

    headers.sort_by(|a, b| {
        let a_pool = a.id == UNASSIGNED;
        let b_pool = b.id == UNASSIGNED;
        b_pool
            .cmp(&a_pool)
            .then_with(|| sort_key(&a.name).cmp(&sort_key(&b.name)))
            .then_with(|| a.id.cmp(&b.id))
    });

    headers
        .into_iter()
        .map(|header| {
            let mut sub_rows: Vec<ProjectSubRow> = buckets
                .remove(&header.id)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|(key, cells)| {
                    // drop rows that carry no hours anywhere in the window
                    if !cells.iter().any(|c| c.hours > 0.0) {
                        return None;
                    }
                    let (project_id, role_id) = match key {
                        SubRowKey::Project(p) => (p, None),
                        SubRowKey::ProjectRole(p, r) => (p, r),
                        SubRowKey::ConsultantRole(..) => return None, // not produced on this axis
                    };
                    let project = lookups.projects.get(&project_id);
                    Some(ProjectSubRow {
                        project_id,
                        project_name: project
                            .map(|p| p.name.clone())
                            .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
                        customer_name: project
                            .map(|p| p.customer_name.clone())
                            .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
                        customer_color: project
                            .map(|p| p.customer_color.clone())
                            .unwrap_or_else(|| FALLBACK_COLOR.to_string()),
                        probability: project.map(|p| p.effective_probability()).unwrap_or(100),
                        role_id,
                        role_name: lookups.role_name_of(role_id),
                        cells,
                    })
                })
                .collect();

            sub_rows.sort_by(|a, b| {
                sort_key(&a.project_name)
                    .cmp(&sort_key(&b.project_name))
                    .then_with(|| sort_key(&a.role_name).cmp(&sort_key(&b.role_name)))
                    .then_with(|| a.project_id.cmp(&b.project_id))
            });

            let total_by_week = totals_by_week(&sub_rows, page.weeks.len());
            PivotRow {
                header,
                sub_rows,
                total_by_week,
            }
        })
        .collect()
}

fn consultant_sub_rows(
    lookups: &Lookups<'_>,
    sub_rows: HashMap<SubRowKey, Vec<Cell>>,
) -> Vec<ConsultantSubRow> {
    let mut rows: Vec<ConsultantSubRow> = sub_rows
        .into_iter()
        .filter_map(|(key, cells)| {
            let SubRowKey::ConsultantRole(consultant_id, role_id) = key else {
                return None; // not produced on these axes
            };
            Some(ConsultantSubRow {
                consultant_id,
                consultant_name: lookups.consultant_name_of(consultant_id),
                role_id,
                role_name: lookups.role_name_of(role_id),
                cells,
            })
        })
        .collect();

    // consultant name first, then role name; a missing role sorts first
    rows.sort_by(|a, b| {
        sort_key(&a.consultant_name)
            .cmp(&sort_key(&b.consultant_name))
            .then_with(|| sort_key(&a.role_name).cmp(&sort_key(&b.role_name)))
            .then_with(|| a.consultant_id.cmp(&b.consultant_id))
    });
    rows
}

/// Build the per-customer view: one row per customer with at least one fact
/// in the window, sub-rows split by (consultant, role) — the same consultant
/// booked under two roles stays two rows.
pub fn build_customer_view(
    page: &AllocationPageData,
    policy: &DisplayPolicy,
) -> Vec<CustomerRow> {
    let lookups = Lookups::new(page);
    let facts = effective_facts(page, None);

    let buckets = bucket_facts(
        &facts,
        &page.weeks,
        policy,
        |p| lookups.probability_of(p),
        |r| lookups.role_name_of(r),
        |f| {
            Some(
                lookups
                    .projects
                    .get(&f.project_id)
                    .map(|p| p.customer_id)
                    .unwrap_or(UNKNOWN_CUSTOMER),
            )
        },
        |f| SubRowKey::ConsultantRole(f.consultant_id.unwrap_or(UNASSIGNED), f.role_id),
    );

    let mut rows: Vec<CustomerRow> = buckets
        .into_iter()
        .map(|(customer_id, sub_rows)| {
            let header = lookups
                .customers
                .get(&customer_id)
                .map(|c| (*c).clone())
                .unwrap_or_else(|| Customer {
                    id: customer_id,
                    name: UNKNOWN_LABEL.to_string(),
                    color: FALLBACK_COLOR.to_string(),
                });
            let sub_rows = consultant_sub_rows(&lookups, sub_rows);
            let total_by_week = totals_by_week(&sub_rows, page.weeks.len());
            PivotRow {
                header,
                sub_rows,
                total_by_week,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        sort_key(&a.header.name)
            .cmp(&sort_key(&b.header.name))
            .then_with(|| a.header.id.cmp(&b.header.id))
    });
    rows
}

/// Build the per-project view: one row per project with at least one fact in
/// the window, excluding inactive projects and projects of inactive
/// customers; sub-rows as in the per-customer view.
pub fn build_project_view(page: &AllocationPageData, policy: &DisplayPolicy) -> Vec<ProjectRow> {
    let lookups = Lookups::new(page);
    let facts = effective_facts(page, None);

    let buckets = bucket_facts(
        &facts,
        &page.weeks,
        policy,
        |p| lookups.probability_of(p),
        |r| lookups.role_name_of(r),
        |f| match lookups.projects.get(&f.project_id) {
            Some(project) if !project.is_active || !project.customer_is_active => None,
            _ => Some(f.project_id),
        },
        |f| SubRowKey::ConsultantRole(f.consultant_id.unwrap_or(UNASSIGNED), f.role_id),
    );

    let mut rows: Vec<ProjectRow> = buckets
        .into_iter()
        .map(|(project_id, sub_rows)| {
            let header = lookups
                .projects
                .get(&project_id)
                .map(|p| (*p).clone())
                .unwrap_or_else(|| Project {
                    id: project_id,
                    customer_id: UNKNOWN_CUSTOMER,
                    name: UNKNOWN_LABEL.to_string(),
                    customer_name: UNKNOWN_LABEL.to_string(),
                    customer_color: FALLBACK_COLOR.to_string(),
                    probability: None,
                    is_active: true,
                    customer_is_active: true,
                });
            let sub_rows = consultant_sub_rows(&lookups, sub_rows);
            let total_by_week = totals_by_week(&sub_rows, page.weeks.len());
            PivotRow {
                header,
                sub_rows,
                total_by_week,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        sort_key(&a.header.name)
            .cmp(&sort_key(&b.header.name))
            .then_with(|| a.header.id.cmp(&b.header.id))
    });
    rows
}
