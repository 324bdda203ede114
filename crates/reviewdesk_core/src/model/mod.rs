//! Domain model for the review pipeline.
//!
//! # Responsibility
//! - Define the canonical records held by the entity store.
//! - Define typed boundary inputs and their one-time validation.
//!
//! # Invariants
//! - Every entity is identified by a stable `uuid` v4.
//! - Statuses are closed enums; storage text is parsed, never passed through.
//! - `Review::total_score` is always derived from its sub-scores.

pub mod assignment;
pub mod document;
pub mod review;
pub mod user;
pub mod validation;
