//! The page-level bundle handed to the view builders.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::allocation::{AllocationFact, CellKey};
use super::entities::{AllocationId, Consultant, Customer, Project, Role, Team};
use super::week::Week;

/// Everything one render pass of the planning grid needs, fetched fresh per
/// week-window request. `weeks` is the ordered, year-boundary-aware expansion
/// of the requested window; consultant availability vectors are aligned to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationPageData {
    pub consultants: Vec<Consultant>,
    pub projects: Vec<Project>,
    pub customers: Vec<Customer>,
    pub roles: Vec<Role>,
    pub teams: Vec<Team>,
    pub allocation_facts: Vec<AllocationFact>,
    pub weeks: Vec<Week>,
}

impl AllocationPageData {
    /// Index facts by cell key, summing duplicate keys and keeping the
    /// first-seen fact id.
    pub fn facts_by_cell(&self) -> HashMap<CellKey, (AllocationId, f64)> {
        let mut index: HashMap<CellKey, (AllocationId, f64)> = HashMap::new();
        for fact in &self.allocation_facts {
            index
                .entry(fact.cell_key())
                .and_modify(|(_, hours)| *hours += fact.hours)
                .or_insert((fact.id, fact.hours));
        }
        index
    }

    /// Position of a week within the window, if present.
    pub fn week_index(&self, week: Week) -> Option<usize> {
        self.weeks.iter().position(|w| *w == week)
    }
}
