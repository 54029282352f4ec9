//! Repository trait for weekly allocation facts.
//!
//! The write path offers plain create/update/delete calls with no retries,
//! transactions or locking; the only guarantee the core relies on is that a
//! settled write becomes visible to one subsequent fetch.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{AllocationFact, AllocationId, AllocationPatch, NewAllocation, Week};

/// Repository trait for allocation fact reads and writes.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait AllocationRepository: Send + Sync {
    /// Check if the store connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch every allocation fact falling inside `window`.
    async fn fetch_allocations(&self, window: &[Week]) -> RepositoryResult<Vec<AllocationFact>>;

    /// Create a new allocation fact.
    ///
    /// # Returns
    /// * `Ok(AllocationFact)` - The stored fact including its assigned id
    /// * `Err(RepositoryError)` - If the operation fails
    async fn create_allocation(&self, new: &NewAllocation) -> RepositoryResult<AllocationFact>;

    /// Apply a partial update (hours and/or role) to an existing fact.
    ///
    /// # Returns
    /// * `Ok(AllocationFact)` - The fact after the update
    /// * `Err(RepositoryError::NotFound)` - If the fact doesn't exist
    /// * `Err(RepositoryError)` - If the operation fails
    async fn update_allocation(
        &self,
        id: AllocationId,
        patch: &AllocationPatch,
    ) -> RepositoryResult<AllocationFact>;

    /// Delete an allocation fact.
    ///
    /// # Returns
    /// * `Ok(())` - If the fact was deleted
    /// * `Err(RepositoryError::NotFound)` - If the fact doesn't exist
    async fn delete_allocation(&self, id: AllocationId) -> RepositoryResult<()>;
}
