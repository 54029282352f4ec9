use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use staffgrid::models::{
    AllocationFact, AllocationId, AllocationPageData, Consultant, ConsultantId, Customer,
    CustomerId, Project, ProjectId, Role, RoleId, Week, WeekWindowRequest,
};
use staffgrid::services::{build_consultant_view, build_customer_view, DisplayPolicy};

fn synthetic_page(consultants: usize, projects: usize, weeks: usize) -> AllocationPageData {
    let window = WeekWindowRequest::new(2025, 10, 10 + weeks as u32 - 1);
    let weeks: Vec<Week> = window.expand();

    let customers: Vec<Customer> = (0..projects.max(1) / 4 + 1)
        .map(|i| Customer {
            id: CustomerId(1000 + i as i64),
            name: format!("Customer {}", i),
            color: "#1565c0".to_string(),
        })
        .collect();

    let projects: Vec<Project> = (0..projects)
        .map(|i| {
            let customer = &customers[i % customers.len()];
            Project {
                id: ProjectId(i as i64),
                customer_id: customer.id,
                name: format!("Project {}", i),
                customer_name: customer.name.clone(),
                customer_color: customer.color.clone(),
                probability: if i % 3 == 0 { Some(60) } else { None },
                is_active: true,
                customer_is_active: true,
            }
        })
        .collect();

    let consultants: Vec<Consultant> = (0..consultants)
        .map(|i| Consultant {
            id: ConsultantId(100_000 + i as i64),
            name: format!("Consultant {}", i),
            is_external: i % 5 == 0,
            team_id: None,
            hours_per_week: 40.0,
            available_hours_by_week: vec![40.0; weeks.len()],
            unavailable_by_week: vec![false; weeks.len()],
        })
        .collect();

    let mut facts = Vec::new();
    let mut next_id = 1i64;
    for (ci, consultant) in consultants.iter().enumerate() {
        for (wi, week) in weeks.iter().enumerate() {
            let project = &projects[(ci + wi) % projects.len()];
            facts.push(AllocationFact {
                id: AllocationId(next_id),
                consultant_id: Some(consultant.id),
                project_id: project.id,
                role_id: Some(RoleId((ci % 3) as i64)),
                year: week.year,
                week: week.week,
                hours: 8.0 + (ci % 4) as f64 * 8.0,
            });
            next_id += 1;
        }
    }

    let roles = (0..3)
        .map(|i| Role {
            id: RoleId(i),
            name: format!("Role {}", i),
        })
        .collect();

    AllocationPageData {
        consultants,
        projects,
        customers,
        roles,
        teams: vec![],
        allocation_facts: facts,
        weeks,
    }
}

fn bench_consultant_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("consultant_view");

    for size in [10usize, 50, 200] {
        let page = synthetic_page(size, size / 2 + 1, 12);
        group.bench_with_input(
            BenchmarkId::new("consultants", size),
            &page,
            |b, page| {
                b.iter(|| build_consultant_view(black_box(page), &DisplayPolicy::default(), None));
            },
        );
    }

    group.finish();
}

fn bench_weighted_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("display_policy");

    let page = synthetic_page(100, 40, 12);
    group.bench_function("unweighted", |b| {
        b.iter(|| build_consultant_view(black_box(&page), &DisplayPolicy::default(), None));
    });
    group.bench_function("weighted", |b| {
        b.iter(|| build_consultant_view(black_box(&page), &DisplayPolicy::weighted(), None));
    });

    group.finish();
}

fn bench_customer_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("customer_view");

    let page = synthetic_page(100, 40, 12);
    group.bench_function("build", |b| {
        b.iter(|| build_customer_view(black_box(&page), &DisplayPolicy::default()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_consultant_view,
    bench_weighted_policy,
    bench_customer_view
);
criterion_main!(benches);
