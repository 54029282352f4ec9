//! Directory entities: consultants, projects, customers, roles and teams.
//!
//! These are in-memory representations of the directory tables in the
//! relational store. Projects carry denormalized customer fields so the view
//! builders can label rows without a second lookup; a dangling customer
//! reference falls back to [`UNKNOWN_LABEL`] and [`FALLBACK_COLOR`] instead of
//! failing the build.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::define_id_type;

define_id_type!(i64, ConsultantId);
define_id_type!(i64, ProjectId);
define_id_type!(i64, CustomerId);
define_id_type!(i64, RoleId);
define_id_type!(i64, TeamId);
define_id_type!(i64, AllocationId);

/// Synthetic consultant id for the unassigned ("To plan") pool.
///
/// Allocation facts with no consultant group under this id, and the
/// per-consultant view always sorts it first.
pub const UNASSIGNED: ConsultantId = ConsultantId(-1);

/// Display name of the unassigned pool row.
pub const UNASSIGNED_LABEL: &str = "To plan";

/// Label rendered when a foreign key does not resolve.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Color rendered when a customer lookup misses.
pub const FALLBACK_COLOR: &str = "#9e9e9e";

/// A consultant as fetched for one week window.
///
/// `available_hours_by_week` and `unavailable_by_week` are aligned
/// positionally to the requested window. Unavailability marks weeks outside
/// the employment start/end dates and is cosmetic only — it never blocks
/// booking hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultant {
    pub id: ConsultantId,
    pub name: String,
    pub is_external: bool,
    pub team_id: Option<TeamId>,
    /// Base weekly capacity in hours.
    pub hours_per_week: f64,
    /// Capacity net of absences, one entry per window week.
    pub available_hours_by_week: Vec<f64>,
    /// True where the week lies wholly outside the employment window.
    pub unavailable_by_week: Vec<bool>,
}

impl Consultant {
    /// Whether this is the synthetic "To plan" pool entry.
    pub fn is_unassigned_pool(&self) -> bool {
        self.id == UNASSIGNED
    }

    /// The pool entry injected when the directory has no row for it.
    pub fn unassigned_pool(window_len: usize) -> Self {
        Self {
            id: UNASSIGNED,
            name: UNASSIGNED_LABEL.to_string(),
            is_external: false,
            team_id: None,
            hours_per_week: 0.0,
            available_hours_by_week: vec![0.0; window_len],
            unavailable_by_week: vec![false; window_len],
        }
    }
}

/// Employment bounds stored on a consultant directory record.
///
/// Only the local repository interprets these; the fetched [`Consultant`]
/// exposes the derived `unavailable_by_week` flags instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentWindow {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// A project with denormalized customer fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub customer_id: CustomerId,
    pub name: String,
    pub customer_name: String,
    pub customer_color: String,
    /// Percent likelihood the project happens; `None` means firm (100).
    pub probability: Option<u8>,
    pub is_active: bool,
    pub customer_is_active: bool,
}

impl Project {
    /// Effective probability in percent, defaulting to 100 when unset.
    pub fn effective_probability(&self) -> u8 {
        self.probability.unwrap_or(100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}
