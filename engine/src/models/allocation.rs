//! Weekly allocation facts and the composite cell key.

use serde::{Deserialize, Serialize};

use super::entities::{AllocationId, ConsultantId, ProjectId, RoleId, UNASSIGNED};
use super::week::Week;

/// One immutable weekly hours record.
///
/// At most one fact is intended per (consultant-or-none, project,
/// role-or-none, year, week); the store does not enforce this and the view
/// builders tolerate duplicates by summing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationFact {
    pub id: AllocationId,
    /// `None` places the hours in the unassigned "To plan" pool.
    pub consultant_id: Option<ConsultantId>,
    pub project_id: ProjectId,
    pub role_id: Option<RoleId>,
    pub year: i32,
    pub week: u32,
    pub hours: f64,
}

impl AllocationFact {
    pub fn week_of(&self) -> Week {
        Week::new(self.year, self.week)
    }

    /// The overlay key addressing this fact's grid cell.
    pub fn cell_key(&self) -> CellKey {
        CellKey {
            consultant_id: self.consultant_id,
            project_id: self.project_id,
            role_id: self.role_id,
            year: self.year,
            week: self.week,
        }
    }

    /// Consultant id with the pool sentinel substituted for `None`.
    pub fn consultant_or_pool(&self) -> ConsultantId {
        self.consultant_id.unwrap_or(UNASSIGNED)
    }
}

/// Composite key identifying one grid cell.
///
/// Structural equality and hashing over the full tuple; nullable parts stay
/// typed as `Option` rather than being folded into a delimiter string, so two
/// distinct keys can never collide.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellKey {
    pub consultant_id: Option<ConsultantId>,
    pub project_id: ProjectId,
    pub role_id: Option<RoleId>,
    pub year: i32,
    pub week: u32,
}

impl CellKey {
    pub fn new(
        consultant_id: Option<ConsultantId>,
        project_id: ProjectId,
        role_id: Option<RoleId>,
        week: Week,
    ) -> Self {
        Self {
            consultant_id,
            project_id,
            role_id,
            year: week.year,
            week: week.week,
        }
    }

    pub fn week_of(&self) -> Week {
        Week::new(self.year, self.week)
    }
}

/// Payload for creating a new allocation fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAllocation {
    pub consultant_id: Option<ConsultantId>,
    pub project_id: ProjectId,
    pub role_id: Option<RoleId>,
    pub year: i32,
    pub week: u32,
    pub hours: f64,
}

impl NewAllocation {
    /// Build the create payload for one cell key.
    pub fn for_cell(key: CellKey, hours: f64) -> Self {
        Self {
            consultant_id: key.consultant_id,
            project_id: key.project_id,
            role_id: key.role_id,
            year: key.year,
            week: key.week,
            hours,
        }
    }
}

/// Partial update for an existing allocation fact.
///
/// `role_id` is doubly optional: `None` leaves the role untouched,
/// `Some(None)` clears it back to the unassigned role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationPatch {
    pub hours: Option<f64>,
    pub role_id: Option<Option<RoleId>>,
}

impl AllocationPatch {
    pub fn hours(hours: f64) -> Self {
        Self {
            hours: Some(hours),
            role_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(consultant: Option<i64>, role: Option<i64>) -> AllocationFact {
        AllocationFact {
            id: AllocationId(1),
            consultant_id: consultant.map(ConsultantId),
            project_id: ProjectId(10),
            role_id: role.map(RoleId),
            year: 2025,
            week: 14,
            hours: 7.5,
        }
    }

    #[test]
    fn test_cell_key_round_trip() {
        let f = fact(Some(3), Some(2));
        let key = f.cell_key();
        assert_eq!(key.consultant_id, Some(ConsultantId(3)));
        assert_eq!(key.week_of(), Week::new(2025, 14));
    }

    #[test]
    fn test_nullable_parts_do_not_collide() {
        // a pool fact with role 2 and a consultant-2 fact with no role would
        // collide under a string-concatenated "id-id" key
        let a = fact(None, Some(2)).cell_key();
        let b = fact(Some(2), None).cell_key();
        assert_ne!(a, b);
    }

    #[test]
    fn test_consultant_or_pool() {
        assert_eq!(fact(None, None).consultant_or_pool(), UNASSIGNED);
        assert_eq!(fact(Some(4), None).consultant_or_pool(), ConsultantId(4));
    }

    #[test]
    fn test_patch_and_create_helpers() {
        let key = fact(Some(1), None).cell_key();
        let create = NewAllocation::for_cell(key, 8.0);
        assert_eq!(create.hours, 8.0);
        assert_eq!(create.week, 14);

        let patch = AllocationPatch::hours(6.0);
        assert_eq!(patch.hours, Some(6.0));
        assert_eq!(patch.role_id, None);
    }
}
