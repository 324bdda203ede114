//! Service error taxonomy.
//!
//! # Invariants
//! - Every failure maps to exactly one `ErrorKind`; callers branch on the
//!   kind, not on message text.
//! - Store failures surface as `ErrorKind::Internal`.

use crate::db::DbError;
use crate::engine::scoring::PanelSelectionError;
use crate::model::assignment::{AssignmentId, AssignmentStatus};
use crate::model::document::{DocumentId, DocumentStatus};
use crate::model::user::UserId;
use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Coarse error class exposed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    InsufficientResources,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::InsufficientResources => "insufficient_resources",
            Self::Internal => "internal",
        }
    }
}

/// Error returned by every use-case operation.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    DocumentNotFound(DocumentId),
    /// Unknown assignment, or one that belongs to another reviewer.
    AssignmentNotFound(AssignmentId),
    UserNotFound(UserId),
    InsufficientReviewers {
        required: usize,
        eligible: usize,
    },
    /// Panel assignment requested for a document that already left `pending`.
    DocumentAlreadyAssigned {
        document_id: DocumentId,
        status: DocumentStatus,
    },
    AlreadyReviewed(AssignmentId),
    DuplicateUsername(String),
    DuplicateEmail(String),
    InvalidTransition {
        assignment_id: AssignmentId,
        from: AssignmentStatus,
        to: AssignmentStatus,
    },
    Repo(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::DocumentNotFound(_) | Self::AssignmentNotFound(_) | Self::UserNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::InsufficientReviewers { .. } => ErrorKind::InsufficientResources,
            Self::DocumentAlreadyAssigned { .. }
            | Self::AlreadyReviewed(_)
            | Self::DuplicateUsername(_)
            | Self::DuplicateEmail(_)
            | Self::InvalidTransition { .. } => ErrorKind::Conflict,
            Self::Repo(RepoError::Validation(_)) => ErrorKind::Validation,
            Self::Repo(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::DocumentNotFound(_) => "document_not_found",
            Self::AssignmentNotFound(_) => "assignment_not_found",
            Self::UserNotFound(_) => "user_not_found",
            Self::InsufficientReviewers { .. } => "insufficient_reviewers",
            Self::DocumentAlreadyAssigned { .. } => "document_already_assigned",
            Self::AlreadyReviewed(_) => "already_reviewed",
            Self::DuplicateUsername(_) => "duplicate_username",
            Self::DuplicateEmail(_) => "duplicate_email",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Repo(_) => "store_failure",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
            Self::AssignmentNotFound(id) => write!(f, "assignment not found: {id}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::InsufficientReviewers { required, eligible } => write!(
                f,
                "insufficient reviewers: need {required}, only {eligible} eligible"
            ),
            Self::DocumentAlreadyAssigned {
                document_id,
                status,
            } => write!(
                f,
                "document {document_id} is already {}; panel assignment requires pending",
                status.as_str()
            ),
            Self::AlreadyReviewed(id) => write!(f, "assignment {id} already has a review"),
            Self::DuplicateUsername(value) => write!(f, "username already exists: {value}"),
            Self::DuplicateEmail(value) => write!(f, "email already in use: {value}"),
            Self::InvalidTransition {
                assignment_id,
                from,
                to,
            } => write!(
                f,
                "assignment {assignment_id} cannot move from {} to {}",
                from.as_str(),
                to.as_str()
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound {
                entity: "document",
                id,
            } => Self::DocumentNotFound(id),
            RepoError::NotFound {
                entity: "assignment",
                id,
            } => Self::AssignmentNotFound(id),
            RepoError::NotFound { entity: "user", id } => Self::UserNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PanelSelectionError> for ServiceError {
    fn from(value: PanelSelectionError) -> Self {
        match value {
            PanelSelectionError::InsufficientReviewers { required, eligible } => {
                Self::InsufficientReviewers { required, eligible }
            }
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}
