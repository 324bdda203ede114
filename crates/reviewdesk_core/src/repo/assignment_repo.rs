//! Assignment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist document-to-reviewer bindings and their status.
//! - Provide the workload counts and read models built from assignments.
//!
//! # Invariants
//! - Workload counts only `assigned` and `reviewing` rows.
//! - Lookups scoped by reviewer never expose another reviewer's assignment.
//! - Listing order is `assigned_at ASC, id ASC`.

use crate::model::assignment::{Assignment, AssignmentId, AssignmentStatus};
use crate::model::document::DocumentId;
use crate::model::user::{UserId, UserRole};
use crate::repo::{ensure_tables, parse_enum, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

const ASSIGNMENT_SELECT_SQL: &str = "SELECT
    id,
    document_id,
    reviewer_id,
    status,
    assigned_at
FROM assignments";

/// Document fields shown to a reviewer next to their assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub title: String,
    pub author: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: String,
    pub field: Option<String>,
}

/// Read model for one reviewer's assignment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerAssignment {
    pub assignment: Assignment,
    pub document: DocumentSummary,
    pub has_review: bool,
}

/// One reviewer seated on a document's panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelMember {
    pub assignment_id: AssignmentId,
    pub reviewer_id: UserId,
    pub name: String,
    pub status: AssignmentStatus,
}

/// Per-reviewer assignment counts for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerTally {
    pub reviewer_id: UserId,
    pub name: String,
    pub open_assignments: u32,
    pub completed_assignments: u32,
}

/// Repository interface for assignments.
pub trait AssignmentRepository {
    /// Inserts one `assigned` row. Callers own the transaction.
    fn create_assignment(
        &self,
        document_id: DocumentId,
        reviewer_id: UserId,
    ) -> RepoResult<Assignment>;
    /// Loads an assignment only when it belongs to `reviewer_id`.
    fn find_for_reviewer(
        &self,
        assignment_id: AssignmentId,
        reviewer_id: UserId,
    ) -> RepoResult<Option<Assignment>>;
    fn list_for_document(&self, document_id: DocumentId) -> RepoResult<Vec<Assignment>>;
    fn list_for_reviewer(&self, reviewer_id: UserId) -> RepoResult<Vec<ReviewerAssignment>>;
    fn list_panel(&self, document_id: DocumentId) -> RepoResult<Vec<PanelMember>>;
    fn set_status(&self, id: AssignmentId, status: AssignmentStatus) -> RepoResult<()>;
    /// Open (`assigned`/`reviewing`) assignment count per reviewer, from one query.
    fn open_workloads(&self) -> RepoResult<HashMap<UserId, u32>>;
    /// Open and completed counts for every reviewer-role user.
    fn reviewer_tallies(&self) -> RepoResult<Vec<ReviewerTally>>;
}

/// SQLite-backed assignment repository.
pub struct SqliteAssignmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssignmentRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["assignments", "documents", "users", "reviews"])?;
        Ok(Self { conn })
    }

    fn query_assignments(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<Assignment>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next()? {
            assignments.push(parse_assignment_row(row)?);
        }
        Ok(assignments)
    }
}

impl AssignmentRepository for SqliteAssignmentRepository<'_> {
    fn create_assignment(
        &self,
        document_id: DocumentId,
        reviewer_id: UserId,
    ) -> RepoResult<Assignment> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO assignments (
                id,
                document_id,
                reviewer_id,
                status
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                document_id.to_string(),
                reviewer_id.to_string(),
                AssignmentStatus::Assigned.as_str(),
            ],
        )?;

        self.query_assignments(
            &format!("{ASSIGNMENT_SELECT_SQL} WHERE id = ?1;"),
            [id.to_string()],
        )?
        .into_iter()
        .next()
        .ok_or_else(|| {
            RepoError::InvalidData(format!("created assignment {id} missing in read-back"))
        })
    }

    fn find_for_reviewer(
        &self,
        assignment_id: AssignmentId,
        reviewer_id: UserId,
    ) -> RepoResult<Option<Assignment>> {
        let assignments = self.query_assignments(
            &format!("{ASSIGNMENT_SELECT_SQL} WHERE id = ?1 AND reviewer_id = ?2;"),
            [assignment_id.to_string(), reviewer_id.to_string()],
        )?;
        Ok(assignments.into_iter().next())
    }

    fn list_for_document(&self, document_id: DocumentId) -> RepoResult<Vec<Assignment>> {
        self.query_assignments(
            &format!(
                "{ASSIGNMENT_SELECT_SQL} WHERE document_id = ?1 ORDER BY assigned_at ASC, id ASC;"
            ),
            [document_id.to_string()],
        )
    }

    fn list_for_reviewer(&self, reviewer_id: UserId) -> RepoResult<Vec<ReviewerAssignment>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                a.id AS id,
                a.document_id AS document_id,
                a.reviewer_id AS reviewer_id,
                a.status AS status,
                a.assigned_at AS assigned_at,
                d.title AS title,
                d.author AS author,
                d.abstract AS abstract,
                d.keywords AS keywords,
                d.field AS field,
                EXISTS(SELECT 1 FROM reviews r WHERE r.assignment_id = a.id) AS has_review
             FROM assignments a
             INNER JOIN documents d ON d.id = a.document_id
             WHERE a.reviewer_id = ?1
             ORDER BY a.assigned_at ASC, a.id ASC;",
        )?;
        let mut rows = stmt.query([reviewer_id.to_string()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let assignment = parse_assignment_row(row)?;
            let document = DocumentSummary {
                id: assignment.document_id,
                title: row.get("title")?,
                author: row.get("author")?,
                abstract_text: row.get("abstract")?,
                keywords: row.get("keywords")?,
                field: row.get("field")?,
            };
            let has_review = row.get::<_, i64>("has_review")? == 1;
            items.push(ReviewerAssignment {
                assignment,
                document,
                has_review,
            });
        }
        Ok(items)
    }

    fn list_panel(&self, document_id: DocumentId) -> RepoResult<Vec<PanelMember>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                a.id AS id,
                a.reviewer_id AS reviewer_id,
                a.status AS status,
                u.name AS name
             FROM assignments a
             INNER JOIN users u ON u.id = a.reviewer_id
             WHERE a.document_id = ?1
             ORDER BY a.assigned_at ASC, a.id ASC;",
        )?;
        let mut rows = stmt.query([document_id.to_string()])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            let reviewer_text: String = row.get("reviewer_id")?;
            let status_text: String = row.get("status")?;
            members.push(PanelMember {
                assignment_id: parse_uuid(&id_text, "assignments.id")?,
                reviewer_id: parse_uuid(&reviewer_text, "assignments.reviewer_id")?,
                name: row.get("name")?,
                status: parse_enum(&status_text, "assignments.status", AssignmentStatus::parse)?,
            });
        }
        Ok(members)
    }

    fn set_status(&self, id: AssignmentId, status: AssignmentStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE assignments SET status = ?2 WHERE id = ?1;",
            params![id.to_string(), status.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "assignment",
                id,
            });
        }
        Ok(())
    }

    fn open_workloads(&self) -> RepoResult<HashMap<UserId, u32>> {
        let mut stmt = self.conn.prepare(
            "SELECT reviewer_id, COUNT(*)
             FROM assignments
             WHERE status IN (?1, ?2)
             GROUP BY reviewer_id;",
        )?;
        let mut rows = stmt.query([
            AssignmentStatus::Assigned.as_str(),
            AssignmentStatus::Reviewing.as_str(),
        ])?;
        let mut workloads = HashMap::new();
        while let Some(row) = rows.next()? {
            let reviewer_text: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            workloads.insert(
                parse_uuid(&reviewer_text, "assignments.reviewer_id")?,
                count as u32,
            );
        }
        Ok(workloads)
    }

    fn reviewer_tallies(&self) -> RepoResult<Vec<ReviewerTally>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                u.id AS id,
                u.name AS name,
                COALESCE(SUM(CASE WHEN a.status IN ('assigned', 'reviewing') THEN 1 ELSE 0 END), 0)
                    AS open_count,
                COALESCE(SUM(CASE WHEN a.status = 'completed' THEN 1 ELSE 0 END), 0)
                    AS completed_count
             FROM users u
             LEFT JOIN assignments a ON a.reviewer_id = u.id
             WHERE u.role = ?1
             GROUP BY u.id, u.name
             ORDER BY u.id ASC;",
        )?;
        let mut rows = stmt.query([UserRole::Reviewer.as_str()])?;
        let mut tallies = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            tallies.push(ReviewerTally {
                reviewer_id: parse_uuid(&id_text, "users.id")?,
                name: row.get("name")?,
                open_assignments: row.get::<_, i64>("open_count")? as u32,
                completed_assignments: row.get::<_, i64>("completed_count")? as u32,
            });
        }
        Ok(tallies)
    }
}

fn parse_assignment_row(row: &Row<'_>) -> RepoResult<Assignment> {
    let id_text: String = row.get("id")?;
    let document_text: String = row.get("document_id")?;
    let reviewer_text: String = row.get("reviewer_id")?;
    let status_text: String = row.get("status")?;

    Ok(Assignment {
        id: parse_uuid(&id_text, "assignments.id")?,
        document_id: parse_uuid(&document_text, "assignments.document_id")?,
        reviewer_id: parse_uuid(&reviewer_text, "assignments.reviewer_id")?,
        status: parse_enum(&status_text, "assignments.status", AssignmentStatus::parse)?,
        assigned_at: row.get("assigned_at")?,
    })
}
