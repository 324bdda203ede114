//! Panel assignment use-case service.
//!
//! # Responsibility
//! - Select and commit a reviewer panel for one document.
//!
//! # Invariants
//! - Candidate scan, workload snapshot, selection, assignment inserts and the
//!   document status update run in one `IMMEDIATE` transaction.
//! - Only `pending` documents receive a panel. A concurrent second call for
//!   the same document waits on the write lock, then observes `assigned` and
//!   fails with `DocumentAlreadyAssigned`.
//! - Any failure leaves no assignment rows behind.

use crate::db::with_write_transaction;
use crate::engine::policy::PanelPolicy;
use crate::engine::scoring::{select_panel, PriorityBreakdown};
use crate::engine::workload::WorkloadSnapshot;
use crate::model::assignment::AssignmentId;
use crate::model::document::{DocumentId, DocumentStatus};
use crate::model::user::UserId;
use crate::repo::assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
use crate::repo::document_repo::{DocumentRepository, SqliteDocumentRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::service::error::ServiceError;
use crate::service::log_failure;
use log::{debug, info};
use rusqlite::Connection;
use serde::Serialize;
use std::time::Instant;

/// One reviewer seated by panel assignment, with contact projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignedReviewer {
    pub reviewer_id: UserId,
    pub name: String,
    pub email: String,
    pub assignment_id: AssignmentId,
    /// Open assignments before this panel was committed.
    pub workload_before: u32,
    pub score: PriorityBreakdown,
}

/// Result of one successful panel assignment, in rank order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelAssignment {
    pub document_id: DocumentId,
    pub reviewers: Vec<AssignedReviewer>,
}

pub struct PanelService<'conn> {
    conn: &'conn mut Connection,
    policy: PanelPolicy,
}

impl<'conn> PanelService<'conn> {
    /// Creates a service with the fixed cap (10) and panel size (3).
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self {
            conn,
            policy: PanelPolicy::default(),
        }
    }

    /// Selects the top-ranked eligible reviewers and assigns them to
    /// `document_id`.
    ///
    /// # Errors
    /// - `DocumentNotFound` when the document does not exist.
    /// - `DocumentAlreadyAssigned` when the document is not `pending`.
    /// - `InsufficientReviewers` when fewer than three active reviewers are
    ///   under the workload cap.
    pub fn assign_panel(&mut self, document_id: DocumentId) -> Result<PanelAssignment, ServiceError> {
        let started_at = Instant::now();
        let policy = self.policy;
        let result = with_write_transaction(self.conn, |tx| {
            assign_in_transaction(tx, document_id, &policy)
        });

        match &result {
            Ok(panel) => info!(
                "event=panel_assign module=service status=ok document_id={} panel_size={} duration_ms={}",
                document_id,
                panel.reviewers.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("panel_assign", started_at, err),
        }
        result
    }
}

fn assign_in_transaction(
    conn: &Connection,
    document_id: DocumentId,
    policy: &PanelPolicy,
) -> Result<PanelAssignment, ServiceError> {
    let documents = SqliteDocumentRepository::try_new(conn)?;
    let document = documents
        .get_document(document_id)?
        .ok_or(ServiceError::DocumentNotFound(document_id))?;
    if document.status != DocumentStatus::Pending {
        return Err(ServiceError::DocumentAlreadyAssigned {
            document_id,
            status: document.status,
        });
    }

    let users = SqliteUserRepository::try_new(conn)?;
    let assignments = SqliteAssignmentRepository::try_new(conn)?;
    let snapshot = WorkloadSnapshot::from_counts(assignments.open_workloads()?);
    let candidates = snapshot.candidates(users.list_panel_candidates()?);
    debug!(
        "event=panel_candidates module=service document_id={} candidates={}",
        document_id,
        candidates.len()
    );

    let panel = select_panel(candidates, document.field.as_deref(), policy)?;

    let mut reviewers = Vec::with_capacity(panel.len());
    for scored in panel {
        let assignment = assignments.create_assignment(document.id, scored.candidate.reviewer_id)?;
        reviewers.push(AssignedReviewer {
            reviewer_id: scored.candidate.reviewer_id,
            name: scored.candidate.name,
            email: scored.candidate.email,
            assignment_id: assignment.id,
            workload_before: scored.candidate.workload,
            score: scored.breakdown,
        });
    }
    documents.set_status(document.id, DocumentStatus::Assigned)?;

    Ok(PanelAssignment {
        document_id,
        reviewers,
    })
}
