//! In-memory local repository implementation.
//!
//! This module provides a local implementation of both repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory behind a `parking_lot::RwLock`, providing fast, deterministic and
//! isolated execution.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::*;

/// In-memory planning repository.
///
/// Stores directory records and allocation facts in HashMaps, ideal for tests
/// that need isolation and speed. The health and write-failure toggles let
/// failure paths be exercised without a real store.
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct ConsultantRecord {
    id: ConsultantId,
    name: String,
    is_external: bool,
    team_id: Option<TeamId>,
    hours_per_week: f64,
    employment: EmploymentWindow,
}

struct ProjectRecord {
    id: ProjectId,
    customer_id: CustomerId,
    name: String,
    probability: Option<u8>,
    is_active: bool,
}

struct LocalData {
    consultants: HashMap<ConsultantId, ConsultantRecord>,
    projects: HashMap<ProjectId, ProjectRecord>,
    customers: HashMap<CustomerId, Customer>,
    roles: HashMap<RoleId, Role>,
    teams: HashMap<TeamId, Team>,
    allocations: HashMap<AllocationId, AllocationFact>,

    /// Hours off per consultant-week, subtracted from weekly capacity.
    absences: HashMap<(ConsultantId, Week), f64>,

    // ID counters
    next_id: i64,

    // Failure toggles
    is_healthy: bool,
    fail_writes: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            consultants: HashMap::new(),
            projects: HashMap::new(),
            customers: HashMap::new(),
            roles: HashMap::new(),
            teams: HashMap::new(),
            allocations: HashMap::new(),
            absences: HashMap::new(),
            next_id: 1,
            is_healthy: true,
            fail_writes: false,
        }
    }
}

impl LocalData {
    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    // ==================== Seed helpers ====================

    pub fn add_customer(&self, name: &str, color: &str) -> CustomerId {
        let mut data = self.data.write();
        let id = CustomerId(data.next_id());
        data.customers.insert(
            id,
            Customer {
                id,
                name: name.to_string(),
                color: color.to_string(),
            },
        );
        id
    }

    pub fn add_project(
        &self,
        customer_id: CustomerId,
        name: &str,
        probability: Option<u8>,
        is_active: bool,
    ) -> ProjectId {
        let mut data = self.data.write();
        let id = ProjectId(data.next_id());
        data.projects.insert(
            id,
            ProjectRecord {
                id,
                customer_id,
                name: name.to_string(),
                probability,
                is_active,
            },
        );
        id
    }

    pub fn add_consultant(
        &self,
        name: &str,
        hours_per_week: f64,
        is_external: bool,
        team_id: Option<TeamId>,
    ) -> ConsultantId {
        let mut data = self.data.write();
        let id = ConsultantId(data.next_id());
        data.consultants.insert(
            id,
            ConsultantRecord {
                id,
                name: name.to_string(),
                is_external,
                team_id,
                hours_per_week,
                employment: EmploymentWindow::default(),
            },
        );
        id
    }

    /// Set the employment start/end dates of a consultant.
    pub fn set_employment(&self, consultant_id: ConsultantId, employment: EmploymentWindow) {
        let mut data = self.data.write();
        if let Some(record) = data.consultants.get_mut(&consultant_id) {
            record.employment = employment;
        }
    }

    /// Record hours of absence (holiday, overhead) for one consultant-week.
    pub fn add_absence(&self, consultant_id: ConsultantId, week: Week, hours: f64) {
        let mut data = self.data.write();
        *data.absences.entry((consultant_id, week)).or_insert(0.0) += hours;
    }

    pub fn add_role(&self, name: &str) -> RoleId {
        let mut data = self.data.write();
        let id = RoleId(data.next_id());
        data.roles.insert(
            id,
            Role {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    pub fn add_team(&self, name: &str) -> TeamId {
        let mut data = self.data.write();
        let id = TeamId(data.next_id());
        data.teams.insert(
            id,
            Team {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    /// Insert an allocation fact directly, bypassing the write path.
    pub fn seed_allocation(
        &self,
        consultant_id: Option<ConsultantId>,
        project_id: ProjectId,
        role_id: Option<RoleId>,
        week: Week,
        hours: f64,
    ) -> AllocationId {
        let mut data = self.data.write();
        let id = AllocationId(data.next_id());
        data.allocations.insert(
            id,
            AllocationFact {
                id,
                consultant_id,
                project_id,
                role_id,
                year: week.year,
                week: week.week,
                hours,
            },
        );
        id
    }

    // ==================== Failure toggles ====================

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Make every subsequent write call fail, for testing rollback paths.
    pub fn set_fail_writes(&self, fail: bool) {
        self.data.write().fail_writes = fail;
    }

    /// Number of allocation facts stored.
    pub fn allocation_count(&self) -> usize {
        self.data.read().allocations.len()
    }

    /// Look up one stored fact by id.
    pub fn allocation(&self, id: AllocationId) -> Option<AllocationFact> {
        self.data.read().allocations.get(&id).cloned()
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };
    }

    // ==================== Internal helpers ====================

    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::ConnectionError(
                "store is not healthy".to_string(),
            ));
        }
        Ok(())
    }

    fn check_writable(&self) -> RepositoryResult<()> {
        self.check_health()?;
        if self.data.read().fail_writes {
            return Err(RepositoryError::WriteRejected(
                "writes are disabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a week lies wholly outside the employment window.
    fn week_outside_employment(employment: &EmploymentWindow, week: Week) -> bool {
        let (Some(monday), Some(sunday)) = (week.monday(), week.sunday()) else {
            return false;
        };
        if let Some(start) = employment.start_date {
            if sunday < start {
                return true;
            }
        }
        if let Some(end) = employment.end_date {
            if monday > end {
                return true;
            }
        }
        false
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryRepository for LocalRepository {
    async fn list_consultants(&self, window: &[Week]) -> RepositoryResult<Vec<Consultant>> {
        self.check_health()?;
        let data = self.data.read();

        let mut consultants: Vec<Consultant> = data
            .consultants
            .values()
            .map(|record| {
                let available_hours_by_week = window
                    .iter()
                    .map(|week| {
                        if Self::week_outside_employment(&record.employment, *week) {
                            return 0.0;
                        }
                        let absence = data
                            .absences
                            .get(&(record.id, *week))
                            .copied()
                            .unwrap_or(0.0);
                        (record.hours_per_week - absence).max(0.0)
                    })
                    .collect();
                let unavailable_by_week = window
                    .iter()
                    .map(|week| Self::week_outside_employment(&record.employment, *week))
                    .collect();
                Consultant {
                    id: record.id,
                    name: record.name.clone(),
                    is_external: record.is_external,
                    team_id: record.team_id,
                    hours_per_week: record.hours_per_week,
                    available_hours_by_week,
                    unavailable_by_week,
                }
            })
            .collect();

        consultants.sort_by_key(|c| c.id);
        Ok(consultants)
    }

    async fn list_projects(&self) -> RepositoryResult<Vec<Project>> {
        self.check_health()?;
        let data = self.data.read();

        let mut projects: Vec<Project> = data
            .projects
            .values()
            .map(|record| {
                let customer = data.customers.get(&record.customer_id);
                Project {
                    id: record.id,
                    customer_id: record.customer_id,
                    name: record.name.clone(),
                    customer_name: customer
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
                    customer_color: customer
                        .map(|c| c.color.clone())
                        .unwrap_or_else(|| FALLBACK_COLOR.to_string()),
                    probability: record.probability,
                    is_active: record.is_active,
                    customer_is_active: customer.is_some(),
                }
            })
            .collect();

        projects.sort_by_key(|p| p.id);
        Ok(projects)
    }

    async fn list_customers(&self) -> RepositoryResult<Vec<Customer>> {
        self.check_health()?;
        let mut customers: Vec<Customer> = self.data.read().customers.values().cloned().collect();
        customers.sort_by_key(|c| c.id);
        Ok(customers)
    }

    async fn list_roles(&self) -> RepositoryResult<Vec<Role>> {
        self.check_health()?;
        let mut roles: Vec<Role> = self.data.read().roles.values().cloned().collect();
        roles.sort_by_key(|r| r.id);
        Ok(roles)
    }

    async fn list_teams(&self) -> RepositoryResult<Vec<Team>> {
        self.check_health()?;
        let mut teams: Vec<Team> = self.data.read().teams.values().cloned().collect();
        teams.sort_by_key(|t| t.id);
        Ok(teams)
    }
}

#[async_trait]
impl AllocationRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn fetch_allocations(&self, window: &[Week]) -> RepositoryResult<Vec<AllocationFact>> {
        self.check_health()?;
        let in_window: HashSet<Week> = window.iter().copied().collect();

        let mut facts: Vec<AllocationFact> = self
            .data
            .read()
            .allocations
            .values()
            .filter(|fact| in_window.contains(&fact.week_of()))
            .cloned()
            .collect();

        facts.sort_by_key(|f| f.id);
        Ok(facts)
    }

    async fn create_allocation(&self, new: &NewAllocation) -> RepositoryResult<AllocationFact> {
        self.check_writable()?;
        if new.hours < 0.0 {
            return Err(RepositoryError::WriteRejected(format!(
                "negative hours: {}",
                new.hours
            )));
        }

        let mut data = self.data.write();
        let id = AllocationId(data.next_id());
        let fact = AllocationFact {
            id,
            consultant_id: new.consultant_id,
            project_id: new.project_id,
            role_id: new.role_id,
            year: new.year,
            week: new.week,
            hours: new.hours,
        };
        log::debug!("create allocation {} ({} h)", id, fact.hours);
        data.allocations.insert(id, fact.clone());
        Ok(fact)
    }

    async fn update_allocation(
        &self,
        id: AllocationId,
        patch: &AllocationPatch,
    ) -> RepositoryResult<AllocationFact> {
        self.check_writable()?;
        if let Some(hours) = patch.hours {
            if hours < 0.0 {
                return Err(RepositoryError::WriteRejected(format!(
                    "negative hours: {}",
                    hours
                )));
            }
        }

        let mut data = self.data.write();
        let fact = data
            .allocations
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("allocation {} not found", id)))?;

        if let Some(hours) = patch.hours {
            fact.hours = hours;
        }
        if let Some(role_id) = patch.role_id {
            fact.role_id = role_id;
        }
        log::debug!("update allocation {}", id);
        Ok(fact.clone())
    }

    async fn delete_allocation(&self, id: AllocationId) -> RepositoryResult<()> {
        self.check_writable()?;
        let mut data = self.data.write();
        if data.allocations.remove(&id).is_none() {
            return Err(RepositoryError::NotFound(format!(
                "allocation {} not found",
                id
            )));
        }
        log::debug!("delete allocation {}", id);
        Ok(())
    }
}
