//! Integration tests exercising the repository traits end to end through the
//! in-memory backend and the page assembly service.

use std::sync::Arc;

use staffgrid::db::services::load_page;
use staffgrid::db::{
    AllocationRepository, DirectoryRepository, LocalRepository, PlanningRepository,
    RepositoryError, RepositoryFactory, RepositoryType,
};
use staffgrid::models::{
    AllocationPatch, CellKey, EmploymentWindow, NewAllocation, Week, WeekWindowRequest, UNASSIGNED,
    UNASSIGNED_LABEL,
};

fn window() -> WeekWindowRequest {
    WeekWindowRequest::new(2025, 10, 12)
}

#[tokio::test]
async fn test_allocation_crud_through_trait_object() {
    let repo = LocalRepository::new();
    let customer = repo.add_customer("Acme", "#1565c0");
    let project = repo.add_project(customer, "Rollout", None, true);
    let consultant = repo.add_consultant("Anna", 40.0, false, None);

    let repo: Arc<dyn PlanningRepository> = Arc::new(repo);
    let key = CellKey::new(Some(consultant), project, None, Week::new(2025, 10));

    let created = repo
        .create_allocation(&NewAllocation::for_cell(key, 8.0))
        .await
        .unwrap();
    assert_eq!(created.hours, 8.0);
    assert_eq!(created.consultant_id, Some(consultant));

    let updated = repo
        .update_allocation(created.id, &AllocationPatch::hours(12.0))
        .await
        .unwrap();
    assert_eq!(updated.hours, 12.0);

    let facts = repo.fetch_allocations(&window().expand()).await.unwrap();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].hours, 12.0);

    repo.delete_allocation(created.id).await.unwrap();
    let facts = repo.fetch_allocations(&window().expand()).await.unwrap();
    assert!(facts.is_empty());
}

#[tokio::test]
async fn test_fetch_is_scoped_to_the_requested_weeks() {
    let repo = LocalRepository::new();
    let customer = repo.add_customer("Acme", "#1565c0");
    let project = repo.add_project(customer, "Rollout", None, true);
    let consultant = repo.add_consultant("Anna", 40.0, false, None);

    repo.seed_allocation(Some(consultant), project, None, Week::new(2025, 9), 8.0);
    repo.seed_allocation(Some(consultant), project, None, Week::new(2025, 10), 8.0);
    repo.seed_allocation(Some(consultant), project, None, Week::new(2025, 13), 8.0);

    let facts = repo.fetch_allocations(&window().expand()).await.unwrap();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].week_of(), Week::new(2025, 10));
}

#[tokio::test]
async fn test_unhealthy_backend_fails_reads() {
    let repo = LocalRepository::new();
    repo.set_healthy(false);

    assert!(!repo.health_check().await.unwrap());
    let result = repo.fetch_allocations(&window().expand()).await;
    assert!(matches!(result, Err(RepositoryError::ConnectionError(_))));
}

#[tokio::test]
async fn test_update_of_missing_allocation_is_not_found() {
    let repo = LocalRepository::new();
    let result = repo
        .update_allocation(
            staffgrid::models::AllocationId(99),
            &AllocationPatch::hours(8.0),
        )
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
async fn test_availability_reflects_absences_and_employment() {
    let repo = LocalRepository::new();
    let anna = repo.add_consultant("Anna", 40.0, false, None);
    repo.add_absence(anna, Week::new(2025, 11), 16.0);
    // employment ends during week 11, so week 12 is out of contract
    repo.set_employment(
        anna,
        EmploymentWindow {
            start_date: None,
            end_date: Week::new(2025, 11).sunday(),
        },
    );

    let consultants = repo.list_consultants(&window().expand()).await.unwrap();
    let anna = consultants.iter().find(|c| c.name == "Anna").unwrap();
    assert_eq!(anna.available_hours_by_week, vec![40.0, 24.0, 0.0]);
    assert_eq!(anna.unavailable_by_week, vec![false, false, true]);
}

#[tokio::test]
async fn test_load_page_injects_the_unassigned_pool() {
    let repo = LocalRepository::new();
    repo.add_consultant("Anna", 40.0, false, None);

    let page = load_page(&repo, window()).await.unwrap();
    assert_eq!(page.weeks.len(), 3);

    let pool = page
        .consultants
        .iter()
        .find(|c| c.id == UNASSIGNED)
        .expect("pool row injected");
    assert_eq!(pool.name, UNASSIGNED_LABEL);
    assert_eq!(pool.available_hours_by_week, vec![0.0; 3]);
}

#[tokio::test]
async fn test_factory_builds_a_working_local_repository() {
    let handle = RepositoryFactory::create(RepositoryType::Local);
    assert!(handle.allocations.health_check().await.unwrap());

    let consultants = handle
        .directory
        .list_consultants(&window().expand())
        .await
        .unwrap();
    assert!(consultants.is_empty());
    let facts = handle
        .allocations
        .fetch_allocations(&window().expand())
        .await
        .unwrap();
    assert!(facts.is_empty());
}
