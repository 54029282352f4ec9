//! Store access layer for planning data.
//!
//! This module provides abstractions for store operations via the Repository
//! pattern, allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (planner controller, CLI, ...)       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Week window expansion                                │
//! │  - Page assembly and pool injection                     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Local Repository (repositories/local.rs, in-memory)    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Production stores (the hosted relational database) are external
//! collaborators: they implement the same traits outside this crate. The core
//! asks nothing of them beyond "a settled write is visible to one subsequent
//! fetch".

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

pub use factory::{RepositoryFactory, RepositoryHandle, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
pub use repository::{
    AllocationRepository, DirectoryRepository, PlanningRepository, RepositoryError,
    RepositoryResult,
};
