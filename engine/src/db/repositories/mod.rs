//! Repository implementations.
//!
//! Only the in-memory [`LocalRepository`] ships with this crate; production
//! stores live behind the traits in [`crate::db::repository`] and are wired in
//! by the embedding application.

pub mod local;

pub use local::LocalRepository;
