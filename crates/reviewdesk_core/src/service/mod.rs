//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the operations exposed to callers.
//! - Own transaction boundaries: every mutating operation commits all of its
//!   writes or none of them.
//!
//! # Invariants
//! - Mutating operations emit exactly one `ok` or `error` log event.
//! - Services never bypass repository validation.

use crate::service::error::{ErrorKind, ServiceError};
use log::{log, Level};
use std::time::Instant;

pub mod catalog_service;
pub mod error;
pub mod panel_service;
pub mod review_service;
pub mod stats_service;

fn log_failure(event: &str, started_at: Instant, err: &ServiceError) {
    let level = match err.kind() {
        ErrorKind::Internal => Level::Error,
        _ => Level::Warn,
    };
    log!(
        level,
        "event={} module=service status=error duration_ms={} error_code={} error={}",
        event,
        started_at.elapsed().as_millis(),
        err.code(),
        err
    );
}
