//! Read-only repository trait for the planning directory.
//!
//! Directory entities (consultants, projects, customers, roles, teams) are
//! fetched whole per page load; there is no pagination or filtering at this
//! seam, the view builders decide what to show.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Consultant, Customer, Project, Role, Team, Week};

/// Repository trait for directory reads.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// List all consultants with availability vectors aligned to `window`.
    ///
    /// Availability is capacity net of recorded absences; the unavailability
    /// flags mark weeks wholly outside the employment start/end dates.
    async fn list_consultants(&self, window: &[Week]) -> RepositoryResult<Vec<Consultant>>;

    /// List all projects with denormalized customer name/color/active flag.
    async fn list_projects(&self) -> RepositoryResult<Vec<Project>>;

    /// List all customers.
    async fn list_customers(&self) -> RepositoryResult<Vec<Customer>>;

    /// List all roles.
    async fn list_roles(&self) -> RepositoryResult<Vec<Role>>;

    /// List all teams.
    async fn list_teams(&self) -> RepositoryResult<Vec<Team>>;
}
