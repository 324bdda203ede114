//! Shared fixtures for integration tests.

#![allow(dead_code)]

use reviewdesk_core::{
    Availability, CatalogService, Document, NewDocument, NewUser, PanelAssignment, PanelService,
    ReviewScores, ReviewSubmission, User, UserRole,
};
use rusqlite::{params, Connection};
use uuid::Uuid;

pub fn reviewer(conn: &mut Connection, username: &str, expertise: &[&str]) -> User {
    user(conn, username, UserRole::Reviewer, expertise, Availability::Active)
}

pub fn user(
    conn: &mut Connection,
    username: &str,
    role: UserRole,
    expertise: &[&str],
    status: Availability,
) -> User {
    CatalogService::new(conn)
        .create_user(&NewUser {
            username: username.to_string(),
            name: format!("{username} name"),
            email: format!("{username}@example.com"),
            role,
            expertise: expertise.iter().map(|tag| tag.to_string()).collect(),
            status,
        })
        .unwrap()
}

pub fn document(conn: &mut Connection, title: &str, field: Option<&str>) -> Document {
    CatalogService::new(conn)
        .create_document(&NewDocument {
            title: title.to_string(),
            author: "Grace".to_string(),
            abstract_text: format!("abstract of {title}"),
            keywords: "testing".to_string(),
            field: field.map(str::to_string),
        })
        .unwrap()
}

pub fn assigned_document(conn: &mut Connection, title: &str) -> (Document, PanelAssignment) {
    let document = document(conn, title, None);
    let panel = PanelService::new(conn).assign_panel(document.id).unwrap();
    (document, panel)
}

pub fn submission(innovation: i32, feasibility: i32, quality: i32, value: i32) -> ReviewSubmission {
    ReviewSubmission {
        scores: ReviewScores::new(innovation, feasibility, quality, value),
        comments: "solid work".to_string(),
    }
}

pub fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))
        .unwrap()
}

/// Gives `reviewer_id` `count` assignments in `status` on filler documents.
pub fn seed_workload(conn: &Connection, reviewer_id: Uuid, count: u32, status: &str) {
    for index in 0..count {
        let document_id = Uuid::new_v4().to_string();
        conn.execute(
            "INSERT INTO documents (id, title, author, status) VALUES (?1, ?2, 'Filler', 'assigned');",
            params![document_id, format!("filler {index}")],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO assignments (id, document_id, reviewer_id, status) VALUES (?1, ?2, ?3, ?4);",
            params![Uuid::new_v4().to_string(), document_id, reviewer_id.to_string(), status],
        )
        .unwrap();
    }
}
