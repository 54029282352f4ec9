//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating repository instances based on
//! runtime configuration.

use std::sync::Arc;

use super::repositories::LocalRepository;
use super::repository::{AllocationRepository, DirectoryRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory repository for tests and local development
    Local,
}

impl RepositoryType {
    /// Parse repository type from string.
    ///
    /// # Returns
    /// * `Ok(RepositoryType)` if valid
    /// * `Err(RepositoryError)` if invalid
    pub fn parse(s: &str) -> RepositoryResult<Self> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            other => Err(RepositoryError::ConfigurationError(format!(
                "Unknown repository type: {}",
                other
            ))),
        }
    }

    /// Get repository type from environment variable.
    ///
    /// Reads `STAFFGRID_REPOSITORY`. Defaults to Local if not set or invalid.
    pub fn from_env() -> Self {
        std::env::var("STAFFGRID_REPOSITORY")
            .ok()
            .and_then(|s| Self::parse(&s).ok())
            .unwrap_or(Self::Local)
    }
}

/// Handle bundling the trait objects a repository instance serves.
#[derive(Clone)]
pub struct RepositoryHandle {
    pub directory: Arc<dyn DirectoryRepository>,
    pub allocations: Arc<dyn AllocationRepository>,
}

/// Repository factory for creating repository instances.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    pub fn create(repo_type: RepositoryType) -> RepositoryHandle {
        match repo_type {
            RepositoryType::Local => {
                log::debug!("creating local in-memory repository");
                let local = Arc::new(LocalRepository::new());
                RepositoryHandle {
                    directory: local.clone(),
                    allocations: local,
                }
            }
        }
    }

    /// Create the in-memory repository directly.
    pub fn create_local() -> Arc<LocalRepository> {
        Arc::new(LocalRepository::new())
    }
}
