//! Core domain logic for ReviewDesk.
//!
//! Reviewer panel assignment, the review workflow state machine, workload
//! accounting and statistics. This crate is the single source of truth for
//! business invariants; the CLI only parses arguments and prints results.

pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use engine::policy::{PanelPolicy, PriorityWeights, DEFAULT_PANEL_SIZE, DEFAULT_WORKLOAD_CAP};
pub use engine::scoring::{PanelSelectionError, PriorityBreakdown};
pub use logging::{
    default_log_level, init_logging, logging_status, LogLevel, LoggingConfig, LoggingError,
};
pub use model::assignment::{Assignment, AssignmentId, AssignmentStatus};
pub use model::document::{Document, DocumentId, DocumentStatus, NewDocument};
pub use model::review::{Review, ReviewId, ReviewScores, ReviewSubmission};
pub use model::user::{Availability, NewUser, User, UserId, UserRole};
pub use model::validation::ValidationError;
pub use repo::assignment_repo::{DocumentSummary, PanelMember, ReviewerAssignment};
pub use repo::{RepoError, RepoResult};
pub use service::catalog_service::{CatalogService, DocumentOverview};
pub use service::error::{ErrorKind, ServiceError};
pub use service::panel_service::{AssignedReviewer, PanelAssignment, PanelService};
pub use service::review_service::{ReviewReceipt, ReviewService};
pub use service::stats_service::{
    BasicCounts, ReviewerWorkload, ScoreBand, ScoreDistribution, Statistics, StatsService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
