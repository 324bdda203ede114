//! Document repository contracts and SQLite implementation.
//!
//! # Invariants
//! - New documents are inserted `pending`.
//! - Listing order is `submitted_at ASC, id ASC`.

use crate::model::document::{Document, DocumentId, DocumentStatus, NewDocument};
use crate::repo::{ensure_tables, parse_enum, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use std::collections::BTreeMap;
use uuid::Uuid;

const DOCUMENT_SELECT_SQL: &str = "SELECT
    id,
    title,
    author,
    abstract,
    keywords,
    field,
    status,
    submitted_at
FROM documents";

/// Repository interface for submitted documents.
pub trait DocumentRepository {
    fn create_document(&self, document: &NewDocument) -> RepoResult<Document>;
    fn get_document(&self, id: DocumentId) -> RepoResult<Option<Document>>;
    fn list_documents(&self) -> RepoResult<Vec<Document>>;
    fn set_status(&self, id: DocumentId, status: DocumentStatus) -> RepoResult<()>;
    /// Counts documents per status. Every status is present, possibly zero.
    fn count_by_status(&self) -> RepoResult<BTreeMap<DocumentStatus, u64>>;
}

/// SQLite-backed document repository.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["documents"])?;
        Ok(Self { conn })
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn create_document(&self, document: &NewDocument) -> RepoResult<Document> {
        document.validate()?;
        let id = Uuid::new_v4();

        self.conn.execute(
            "INSERT INTO documents (
                id,
                title,
                author,
                abstract,
                keywords,
                field,
                status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                id.to_string(),
                document.title.trim(),
                document.author.trim(),
                document.abstract_text.as_str(),
                document.keywords.as_str(),
                document.normalized_field(),
                DocumentStatus::Pending.as_str(),
            ],
        )?;

        self.get_document(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created document {id} missing in read-back"))
        })
    }

    fn get_document(&self, id: DocumentId) -> RepoResult<Option<Document>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DOCUMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_document_row(row)?));
        }
        Ok(None)
    }

    fn list_documents(&self) -> RepoResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL} ORDER BY submitted_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            documents.push(parse_document_row(row)?);
        }
        Ok(documents)
    }

    fn set_status(&self, id: DocumentId, status: DocumentStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE documents SET status = ?2 WHERE id = ?1;",
            params![id.to_string(), status.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "document",
                id,
            });
        }
        Ok(())
    }

    fn count_by_status(&self) -> RepoResult<BTreeMap<DocumentStatus, u64>> {
        let mut counts: BTreeMap<DocumentStatus, u64> = DocumentStatus::ALL
            .into_iter()
            .map(|status| (status, 0))
            .collect();

        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM documents GROUP BY status;")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let status_text: String = row.get(0)?;
            let status = parse_enum(&status_text, "documents.status", DocumentStatus::parse)?;
            let count: i64 = row.get(1)?;
            counts.insert(status, count as u64);
        }
        Ok(counts)
    }
}

fn parse_document_row(row: &Row<'_>) -> RepoResult<Document> {
    let id_text: String = row.get("id")?;
    let status_text: String = row.get("status")?;

    Ok(Document {
        id: parse_uuid(&id_text, "documents.id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        abstract_text: row.get("abstract")?,
        keywords: row.get("keywords")?,
        field: row.get("field")?,
        status: parse_enum(&status_text, "documents.status", DocumentStatus::parse)?,
        submitted_at: row.get("submitted_at")?,
    })
}
