//! Catalog use-case service for users and documents.
//!
//! # Responsibility
//! - Create accounts and documents from validated input.
//! - Change reviewer availability, the only reviewer mutation.
//! - Provide the document overview with panel and score summary.
//!
//! # Invariants
//! - Usernames and emails are unique; duplicates are `Conflict` errors.
//! - Documents are created `pending`; callers cannot choose the status.

use crate::db::{with_read_snapshot, with_write_transaction};
use crate::model::document::{Document, DocumentId, NewDocument};
use crate::model::user::{Availability, NewUser, User, UserId, UserRole};
use crate::repo::assignment_repo::{AssignmentRepository, PanelMember, SqliteAssignmentRepository};
use crate::repo::document_repo::{DocumentRepository, SqliteDocumentRepository};
use crate::repo::review_repo::{ReviewRepository, SqliteReviewRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::service::error::ServiceError;
use crate::service::log_failure;
use log::info;
use rusqlite::Connection;
use serde::Serialize;
use std::time::Instant;

/// Document with its panel, review count and mean total score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentOverview {
    pub document: Document,
    pub panel: Vec<PanelMember>,
    pub review_count: usize,
    /// Mean review total rounded to 2 decimals; `None` before any review.
    pub average_score: Option<f64>,
}

pub struct CatalogService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> CatalogService<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Creates one account with its expertise tags.
    pub fn create_user(&mut self, user: &NewUser) -> Result<User, ServiceError> {
        let started_at = Instant::now();
        let result = user
            .validate()
            .map_err(ServiceError::from)
            .and_then(|()| {
                with_write_transaction(self.conn, |tx| {
                    let users = SqliteUserRepository::try_new(tx)?;
                    if users.username_exists(&user.username)? {
                        return Err(ServiceError::DuplicateUsername(
                            user.username.trim().to_string(),
                        ));
                    }
                    if users.email_exists(&user.email)? {
                        return Err(ServiceError::DuplicateEmail(user.normalized_email()));
                    }
                    Ok(users.create_user(user)?)
                })
            });

        match &result {
            Ok(created) => info!(
                "event=user_create module=service status=ok user_id={} role={} expertise_tags={} duration_ms={}",
                created.id,
                created.role.as_str(),
                created.expertise.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("user_create", started_at, err),
        }
        result
    }

    /// Changes reviewer availability and returns the updated account.
    pub fn set_user_status(
        &mut self,
        id: UserId,
        status: Availability,
    ) -> Result<User, ServiceError> {
        let started_at = Instant::now();
        let result = with_write_transaction(self.conn, |tx| {
            let users = SqliteUserRepository::try_new(tx)?;
            users.set_status(id, status)?;
            users.get_user(id)?.ok_or(ServiceError::UserNotFound(id))
        });

        match &result {
            Ok(_) => info!(
                "event=user_status module=service status=ok user_id={} availability={} duration_ms={}",
                id,
                status.as_str(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("user_status", started_at, err),
        }
        result
    }

    pub fn get_user(&self, id: UserId) -> Result<Option<User>, ServiceError> {
        let users = SqliteUserRepository::try_new(&*self.conn)?;
        Ok(users.get_user(id)?)
    }

    pub fn list_users(&self, role: Option<UserRole>) -> Result<Vec<User>, ServiceError> {
        let users = SqliteUserRepository::try_new(&*self.conn)?;
        Ok(users.list_users(role)?)
    }

    /// Creates one `pending` document.
    pub fn create_document(&mut self, document: &NewDocument) -> Result<Document, ServiceError> {
        let started_at = Instant::now();
        let result = document
            .validate()
            .map_err(ServiceError::from)
            .and_then(|()| {
                with_write_transaction(self.conn, |tx| {
                    let documents = SqliteDocumentRepository::try_new(tx)?;
                    Ok(documents.create_document(document)?)
                })
            });

        match &result {
            Ok(created) => info!(
                "event=document_create module=service status=ok document_id={} has_field={} duration_ms={}",
                created.id,
                created.field.is_some(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("document_create", started_at, err),
        }
        result
    }

    pub fn get_document(&self, id: DocumentId) -> Result<Option<Document>, ServiceError> {
        let documents = SqliteDocumentRepository::try_new(&*self.conn)?;
        Ok(documents.get_document(id)?)
    }

    /// Lists every document with its panel and score summary, read from one
    /// snapshot.
    pub fn list_documents(&self) -> Result<Vec<DocumentOverview>, ServiceError> {
        with_read_snapshot(&*self.conn, |tx| {
            let documents = SqliteDocumentRepository::try_new(tx)?;
            let assignments = SqliteAssignmentRepository::try_new(tx)?;
            let reviews = SqliteReviewRepository::try_new(tx)?;

            let mut overviews = Vec::new();
            for document in documents.list_documents()? {
                let panel = assignments.list_panel(document.id)?;
                let scores = reviews.total_scores_for_document(document.id)?;
                overviews.push(DocumentOverview {
                    average_score: average_score(&scores),
                    review_count: scores.len(),
                    panel,
                    document,
                });
            }
            Ok(overviews)
        })
    }
}

fn average_score(scores: &[i32]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: i64 = scores.iter().map(|score| i64::from(*score)).sum();
    let mean = sum as f64 / scores.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}
