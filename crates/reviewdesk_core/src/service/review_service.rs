//! Review workflow use-case service.
//!
//! # Responsibility
//! - Accept one scored review per assignment.
//! - Drive assignment status and re-derive document status from the panel.
//! - List a reviewer's own assignments.
//!
//! # Invariants
//! - Lookup, duplicate check, review insert, assignment update and document
//!   re-derivation run in one `IMMEDIATE` transaction.
//! - A reviewer can neither see nor modify another reviewer's assignment.
//! - A document becomes `completed` in the same transaction that completes
//!   its last open assignment, never earlier.

use crate::db::with_write_transaction;
use crate::model::assignment::{Assignment, AssignmentId, AssignmentStatus};
use crate::model::document::{DocumentId, DocumentStatus};
use crate::model::review::{Review, ReviewSubmission};
use crate::model::user::UserId;
use crate::repo::assignment_repo::{
    AssignmentRepository, ReviewerAssignment, SqliteAssignmentRepository,
};
use crate::repo::document_repo::{DocumentRepository, SqliteDocumentRepository};
use crate::repo::review_repo::{ReviewRepository, SqliteReviewRepository};
use crate::service::error::ServiceError;
use crate::service::log_failure;
use log::info;
use rusqlite::Connection;
use serde::Serialize;
use std::time::Instant;

/// Outcome of an accepted review submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewReceipt {
    pub review: Review,
    pub document_id: DocumentId,
    /// Document status after re-derivation in the same transaction.
    pub document_status: DocumentStatus,
}

pub struct ReviewService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> ReviewService<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Submits the review for one of `reviewer_id`'s assignments.
    ///
    /// Lookup and the duplicate check come before the score range check, so
    /// an invalid submission to a missing or reviewed assignment reports the
    /// missing or reviewed assignment.
    ///
    /// # Errors
    /// - `AssignmentNotFound` when the assignment does not exist or belongs
    ///   to another reviewer.
    /// - `AlreadyReviewed` when the assignment already carries a review.
    /// - `Validation` when a sub-score is out of range; nothing is written.
    pub fn submit_review(
        &mut self,
        assignment_id: AssignmentId,
        reviewer_id: UserId,
        submission: &ReviewSubmission,
    ) -> Result<ReviewReceipt, ServiceError> {
        let started_at = Instant::now();
        let result = with_write_transaction(self.conn, |tx| {
            submit_in_transaction(tx, assignment_id, reviewer_id, submission)
        });

        match &result {
            Ok(receipt) => info!(
                "event=review_submit module=service status=ok assignment_id={} total_score={} document_status={} duration_ms={}",
                assignment_id,
                receipt.review.total_score,
                receipt.document_status.as_str(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("review_submit", started_at, err),
        }
        result
    }

    /// Moves an assignment from `assigned` to `reviewing`.
    ///
    /// The owning document is re-derived and becomes `reviewing`.
    pub fn start_review(
        &mut self,
        assignment_id: AssignmentId,
        reviewer_id: UserId,
    ) -> Result<Assignment, ServiceError> {
        let started_at = Instant::now();
        let result = with_write_transaction(self.conn, |tx| {
            let assignments = SqliteAssignmentRepository::try_new(tx)?;
            let mut assignment = assignments
                .find_for_reviewer(assignment_id, reviewer_id)?
                .ok_or(ServiceError::AssignmentNotFound(assignment_id))?;
            ensure_transition(&assignment, AssignmentStatus::Reviewing)?;

            assignments.set_status(assignment.id, AssignmentStatus::Reviewing)?;
            assignment.status = AssignmentStatus::Reviewing;
            rederive_document_status(tx, &assignments, assignment.document_id)?;
            Ok(assignment)
        });

        match &result {
            Ok(_) => info!(
                "event=review_start module=service status=ok assignment_id={} duration_ms={}",
                assignment_id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("review_start", started_at, err),
        }
        result
    }

    /// Lists every assignment of `reviewer_id` with document summary and
    /// review presence.
    pub fn list_assignments_for(
        &self,
        reviewer_id: UserId,
    ) -> Result<Vec<ReviewerAssignment>, ServiceError> {
        let assignments = SqliteAssignmentRepository::try_new(&*self.conn)?;
        Ok(assignments.list_for_reviewer(reviewer_id)?)
    }

    /// Loads the review attached to one of `reviewer_id`'s assignments.
    pub fn get_review(
        &self,
        assignment_id: AssignmentId,
        reviewer_id: UserId,
    ) -> Result<Option<Review>, ServiceError> {
        let assignments = SqliteAssignmentRepository::try_new(&*self.conn)?;
        let assignment = assignments
            .find_for_reviewer(assignment_id, reviewer_id)?
            .ok_or(ServiceError::AssignmentNotFound(assignment_id))?;
        let reviews = SqliteReviewRepository::try_new(&*self.conn)?;
        Ok(reviews.get_for_assignment(assignment.id)?)
    }
}

fn submit_in_transaction(
    conn: &Connection,
    assignment_id: AssignmentId,
    reviewer_id: UserId,
    submission: &ReviewSubmission,
) -> Result<ReviewReceipt, ServiceError> {
    let assignments = SqliteAssignmentRepository::try_new(conn)?;
    let assignment = assignments
        .find_for_reviewer(assignment_id, reviewer_id)?
        .ok_or(ServiceError::AssignmentNotFound(assignment_id))?;

    let reviews = SqliteReviewRepository::try_new(conn)?;
    if reviews.get_for_assignment(assignment.id)?.is_some() {
        return Err(ServiceError::AlreadyReviewed(assignment.id));
    }
    submission.scores.validate()?;
    ensure_transition(&assignment, AssignmentStatus::Completed)?;

    let review = reviews.create_review(assignment.id, submission)?;
    assignments.set_status(assignment.id, AssignmentStatus::Completed)?;
    let document_status = rederive_document_status(conn, &assignments, assignment.document_id)?;

    Ok(ReviewReceipt {
        review,
        document_id: assignment.document_id,
        document_status,
    })
}

fn ensure_transition(assignment: &Assignment, next: AssignmentStatus) -> Result<(), ServiceError> {
    if !assignment.status.can_transition_to(next) {
        return Err(ServiceError::InvalidTransition {
            assignment_id: assignment.id,
            from: assignment.status,
            to: next,
        });
    }
    Ok(())
}

/// Recomputes document status from the current assignment rows of the same
/// transaction and persists it when it changed.
fn rederive_document_status(
    conn: &Connection,
    assignments: &SqliteAssignmentRepository<'_>,
    document_id: DocumentId,
) -> Result<DocumentStatus, ServiceError> {
    let statuses: Vec<AssignmentStatus> = assignments
        .list_for_document(document_id)?
        .into_iter()
        .map(|assignment| assignment.status)
        .collect();
    let derived = DocumentStatus::derive(&statuses);

    let documents = SqliteDocumentRepository::try_new(conn)?;
    let document = documents
        .get_document(document_id)?
        .ok_or(ServiceError::DocumentNotFound(document_id))?;
    if document.status != derived {
        documents.set_status(document_id, derived)?;
    }
    Ok(derived)
}
