//! Small command-line utilization report against the in-memory repository.
//!
//! Seeds a handful of consultants and projects, then prints the
//! per-consultant grid for a four week window in both unweighted and
//! probability-weighted form.

use std::sync::Arc;

use anyhow::Result;

use staffgrid::db::repositories::LocalRepository;
use staffgrid::models::{Week, WeekWindowRequest, UNASSIGNED};
use staffgrid::services::{AllocationPlanner, DisplayPolicy};

fn seed(repo: &LocalRepository) {
    let acme = repo.add_customer("Acme Corp", "#1565c0");
    let globex = repo.add_customer("Globex", "#2e7d32");

    let rollout = repo.add_project(acme, "ERP Rollout", None, true);
    let pilot = repo.add_project(globex, "Warehouse Pilot", Some(60), true);

    let developer = repo.add_role("Developer");
    let architect = repo.add_role("Architect");

    let anna = repo.add_consultant("Anna", 40.0, false, None);
    let ben = repo.add_consultant("Ben", 40.0, false, None);

    for week in WeekWindowRequest::new(2025, 10, 13).expand() {
        repo.seed_allocation(Some(anna), rollout, Some(architect), week, 24.0);
        repo.seed_allocation(Some(ben), rollout, Some(developer), week, 16.0);
        repo.seed_allocation(Some(ben), pilot, Some(developer), week, 20.0);
    }
    // open demand in the pool
    repo.seed_allocation(None, pilot, Some(developer), Week::new(2025, 12), 40.0);
}

fn print_view(planner: &AllocationPlanner<LocalRepository>, policy: &DisplayPolicy, title: &str) {
    println!("== {} ==", title);
    let rows = planner
        .consultant_view(policy)
        .expect("page loaded before rendering");
    for row in &rows {
        let load: Vec<String> = row
            .load_by_week()
            .iter()
            .map(|l| format!("{:>4.0}%", l * 100.0))
            .collect();
        if row.header.id == UNASSIGNED {
            println!("{:<12} {}", row.header.name, format_hours(&row.total_by_week));
        } else {
            println!(
                "{:<12} {}  load {}",
                row.header.name,
                format_hours(&row.total_by_week),
                load.join(" ")
            );
        }
        for sub in &row.sub_rows {
            let hours: Vec<f64> = sub.cells.iter().map(|c| c.display_hours).collect();
            println!(
                "  {:<20} ({:<3}%) {}",
                sub.project_name,
                sub.probability,
                format_hours(&hours)
            );
        }
    }
    println!();
}

fn format_hours(hours: &[f64]) -> String {
    hours
        .iter()
        .map(|h| format!("{:>5.1}", h))
        .collect::<Vec<_>>()
        .join(" ")
}

#[tokio::main]
async fn main() -> Result<()> {
    let repo = Arc::new(LocalRepository::new());
    seed(&repo);

    let planner = AllocationPlanner::new(repo);
    planner.refresh(WeekWindowRequest::new(2025, 10, 13)).await?;

    print_view(&planner, &DisplayPolicy::default(), "Booked hours");
    print_view(
        &planner,
        &DisplayPolicy::weighted(),
        "Probability-weighted hours",
    );

    Ok(())
}
