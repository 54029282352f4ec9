//! Service layer over the repository traits.
//!
//! High-level functions orchestrating repository calls. Use these instead of
//! the raw traits in application code: they expand the week window, fetch the
//! page collections together and inject the "To plan" pool entry.

use crate::db::repository::{PlanningRepository, RepositoryResult};
use crate::models::{AllocationPageData, Consultant, WeekWindowRequest, UNASSIGNED};

/// Fetch everything one grid render needs for the requested week window.
///
/// Expands the window (year-boundary aware), fetches the six collections
/// concurrently and appends the synthetic "To plan" consultant when the
/// directory has no row for it, so unassigned facts always have a home row.
pub async fn load_page<R>(
    repo: &R,
    request: WeekWindowRequest,
) -> RepositoryResult<AllocationPageData>
where
    R: PlanningRepository + ?Sized,
{
    let weeks = request.expand();

    let (mut consultants, projects, customers, roles, teams, allocation_facts) = tokio::try_join!(
        repo.list_consultants(&weeks),
        repo.list_projects(),
        repo.list_customers(),
        repo.list_roles(),
        repo.list_teams(),
        repo.fetch_allocations(&weeks),
    )?;

    if !consultants.iter().any(|c| c.id == UNASSIGNED) {
        consultants.push(Consultant::unassigned_pool(weeks.len()));
    }

    log::debug!(
        "loaded page: {} weeks, {} consultants, {} facts",
        weeks.len(),
        consultants.len(),
        allocation_facts.len()
    );

    Ok(AllocationPageData {
        consultants,
        projects,
        customers,
        roles,
        teams,
        allocation_facts,
        weeks,
    })
}
