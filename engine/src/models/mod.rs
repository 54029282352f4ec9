//! Domain models for the allocation view engine.
//!
//! In-memory representations of the planning concepts in the relational
//! store: directory entities, ISO week windows, weekly allocation facts and
//! the page bundle one grid render consumes.

pub mod allocation;
pub mod entities;
pub mod macros;
pub mod page;
pub mod week;

pub use allocation::{AllocationFact, AllocationPatch, CellKey, NewAllocation};
pub use entities::{
    AllocationId, Consultant, ConsultantId, Customer, CustomerId, EmploymentWindow, Project,
    ProjectId, Role, RoleId, Team, TeamId, FALLBACK_COLOR, UNASSIGNED, UNASSIGNED_LABEL,
    UNKNOWN_LABEL,
};
pub use page::AllocationPageData;
pub use week::{weeks_in_year, Week, WeekWindowRequest};
