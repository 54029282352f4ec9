//! # staffgrid
//!
//! Allocation view engine for consulting resource planning.
//!
//! This crate turns a flat collection of weekly allocation facts (consultant /
//! project / role / ISO week / hours) fetched from a relational store into the
//! three pivoted view structures a planning grid renders (by consultant, by
//! customer, by project), applies display policies (probability weighting,
//! visibility filters), and layers optimistic in-flight edits on top until the
//! next authoritative fetch confirms them.
//!
//! ## Architecture
//!
//! The crate is organized into three logical layers:
//!
//! - [`models`]: domain types — ids, ISO week windows, directory entities,
//!   allocation facts and the composite cell key
//! - [`db`]: repository pattern over the relational store, with an in-memory
//!   implementation for tests and local development
//! - [`services`]: the pure pivot builders, the display policy transform, the
//!   optimistic edit overlay and the top-level planner controller
//!
//! View builders are pure and re-entrant: they may be called repeatedly per
//! render pass with no side effects, and they never fail on malformed input —
//! dangling foreign keys render fallback labels instead.

// Allow large error types - RepositoryError carries rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;
pub mod services;
