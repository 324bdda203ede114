//! Review repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `total_score` is written from `ReviewScores::total()`, never from input.
//! - At most one review exists per assignment (`UNIQUE(assignment_id)`).

use crate::model::assignment::AssignmentId;
use crate::model::document::DocumentId;
use crate::model::review::{Review, ReviewScores, ReviewSubmission};
use crate::repo::{ensure_tables, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const REVIEW_SELECT_SQL: &str = "SELECT
    id,
    assignment_id,
    innovation_score,
    feasibility_score,
    quality_score,
    value_score,
    total_score,
    comments,
    submitted_at
FROM reviews";

/// Repository interface for reviews.
pub trait ReviewRepository {
    /// Inserts the review for one assignment. Callers own the transaction.
    fn create_review(
        &self,
        assignment_id: AssignmentId,
        submission: &ReviewSubmission,
    ) -> RepoResult<Review>;
    fn get_for_assignment(&self, assignment_id: AssignmentId) -> RepoResult<Option<Review>>;
    /// Total scores of every stored review.
    fn list_total_scores(&self) -> RepoResult<Vec<i32>>;
    /// Total scores of reviews attached to one document's assignments.
    fn total_scores_for_document(&self, document_id: DocumentId) -> RepoResult<Vec<i32>>;
}

/// SQLite-backed review repository.
pub struct SqliteReviewRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReviewRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["reviews", "assignments"])?;
        Ok(Self { conn })
    }

    fn query_scores(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<i32>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut scores = Vec::new();
        while let Some(row) = rows.next()? {
            scores.push(row.get(0)?);
        }
        Ok(scores)
    }
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn create_review(
        &self,
        assignment_id: AssignmentId,
        submission: &ReviewSubmission,
    ) -> RepoResult<Review> {
        let scores = submission.scores;
        scores.validate()?;
        let id = Uuid::new_v4();

        self.conn.execute(
            "INSERT INTO reviews (
                id,
                assignment_id,
                innovation_score,
                feasibility_score,
                quality_score,
                value_score,
                total_score,
                comments
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                id.to_string(),
                assignment_id.to_string(),
                scores.innovation,
                scores.feasibility,
                scores.quality,
                scores.value,
                scores.total(),
                submission.comments.as_str(),
            ],
        )?;

        self.get_for_assignment(assignment_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created review {id} missing in read-back"))
        })
    }

    fn get_for_assignment(&self, assignment_id: AssignmentId) -> RepoResult<Option<Review>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REVIEW_SELECT_SQL} WHERE assignment_id = ?1;"))?;
        let mut rows = stmt.query([assignment_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_review_row(row)?));
        }
        Ok(None)
    }

    fn list_total_scores(&self) -> RepoResult<Vec<i32>> {
        self.query_scores("SELECT total_score FROM reviews ORDER BY id ASC;", [])
    }

    fn total_scores_for_document(&self, document_id: DocumentId) -> RepoResult<Vec<i32>> {
        self.query_scores(
            "SELECT r.total_score
             FROM reviews r
             INNER JOIN assignments a ON a.id = r.assignment_id
             WHERE a.document_id = ?1
             ORDER BY r.id ASC;",
            [document_id.to_string()],
        )
    }
}

fn parse_review_row(row: &Row<'_>) -> RepoResult<Review> {
    let id_text: String = row.get("id")?;
    let assignment_text: String = row.get("assignment_id")?;
    let scores = ReviewScores::new(
        row.get("innovation_score")?,
        row.get("feasibility_score")?,
        row.get("quality_score")?,
        row.get("value_score")?,
    );
    let total_score: i32 = row.get("total_score")?;
    if total_score != scores.total() {
        return Err(RepoError::InvalidData(format!(
            "review {id_text} total_score {total_score} does not match sub-scores"
        )));
    }

    Ok(Review {
        id: parse_uuid(&id_text, "reviews.id")?,
        assignment_id: parse_uuid(&assignment_text, "reviews.assignment_id")?,
        scores,
        total_score,
        comments: row.get("comments")?,
        submitted_at: row.get("submitted_at")?,
    })
}
