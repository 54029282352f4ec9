//! View building and edit orchestration over the allocation page.
//!
//! `policy` and `pivot` are the pure transformation core, `views` exposes the
//! three pivot axes, `overlay` tracks in-flight optimistic edits and
//! `planner` ties it all to a repository for an editable session.

pub mod overlay;
pub mod pivot;
pub mod planner;
pub mod policy;
pub mod views;

pub use overlay::{CellState, EditOverlay};
pub use pivot::{Cell, PivotRow, SubRowKey, WeekCells};
pub use planner::{AllocationPlanner, PlannerError, PlannerResult};
pub use policy::{CellDisplay, DisplayPolicy, ProbabilityMode, VisibilityMode};
pub use views::{
    build_consultant_view, build_customer_view, build_project_view, ConsultantRow,
    ConsultantSubRow, CustomerRow, ProjectRow, ProjectSubRow,
};
