//! Repository trait definitions for store operations.
//!
//! This module provides a collection of focused repository traits that
//! abstract the relational store. By splitting responsibilities across
//! multiple traits, implementations can be more focused and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`directory`]: Read operations for the planning directory
//! - [`allocations`]: Read/write operations for weekly allocation facts
//!
//! # Convenience Trait Bound
//!
//! For functions that need the full store surface, use the
//! [`PlanningRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: PlanningRepository>(repo: &R) -> RepositoryResult<()> {
//!     let roles = repo.list_roles().await?;
//!     let facts = repo.fetch_allocations(&window).await?;
//!     Ok(())
//! }
//! ```

pub mod allocations;
pub mod directory;
pub mod error;

// Re-export error types
pub use error::{RepositoryError, RepositoryResult};

// Re-export all traits
pub use allocations::AllocationRepository;
pub use directory::DirectoryRepository;

/// Composite trait bound for a complete store implementation.
///
/// Automatically implemented for any type that implements both repository
/// traits; use this as the bound when a service needs directory reads and
/// allocation writes together.
pub trait PlanningRepository: DirectoryRepository + AllocationRepository {}

// Blanket implementation: both traits together make a full planning repository
impl<T> PlanningRepository for T where T: DirectoryRepository + AllocationRepository {}
