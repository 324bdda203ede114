//! Storage-free assignment engine.
//!
//! # Responsibility
//! - Account reviewer workload from one consistent snapshot.
//! - Rank eligible reviewers by priority and select a fixed-size panel.
//!
//! # Invariants
//! - Every function here is pure: identical inputs yield the identical panel
//!   in the identical order.
//! - Reviewers at or above the workload cap are never ranked.

pub mod policy;
pub mod scoring;
pub mod workload;
