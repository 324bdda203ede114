//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist accounts and their expertise tag sets.
//! - Provide the candidate scan used by panel assignment.
//!
//! # Invariants
//! - Expertise is stored one row per tag in `user_expertise`; encoding into
//!   rows happens only here.
//! - Listing order is `id ASC` so candidate scans are reproducible.

use crate::model::user::{normalize_expertise, Availability, NewUser, User, UserId, UserRole};
use crate::repo::{ensure_tables, parse_enum, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use std::collections::BTreeSet;
use uuid::Uuid;

const USER_SELECT_SQL: &str = "SELECT
    id,
    username,
    name,
    email,
    role,
    status,
    created_at
FROM users";

/// Repository interface for user accounts.
pub trait UserRepository {
    /// Inserts one user with its expertise tags. Callers own the transaction.
    fn create_user(&self, user: &NewUser) -> RepoResult<User>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn username_exists(&self, username: &str) -> RepoResult<bool>;
    fn email_exists(&self, email: &str) -> RepoResult<bool>;
    /// Lists users, optionally restricted to one role.
    fn list_users(&self, role: Option<UserRole>) -> RepoResult<Vec<User>>;
    /// Lists reviewers with `active` availability.
    fn list_panel_candidates(&self) -> RepoResult<Vec<User>>;
    fn set_status(&self, id: UserId, status: Availability) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Creates repository from a migrated connection or transaction.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users", "user_expertise"])?;
        Ok(Self { conn })
    }

    fn query_users(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<User>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(self.conn, row)?);
        }
        Ok(users)
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &NewUser) -> RepoResult<User> {
        user.validate()?;
        let expertise = normalize_expertise(&user.expertise)?;
        let id = Uuid::new_v4();
        let id_text = id.to_string();

        self.conn.execute(
            "INSERT INTO users (
                id,
                username,
                name,
                email,
                role,
                status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                id_text.as_str(),
                user.username.trim(),
                user.name.trim(),
                user.normalized_email(),
                user.role.as_str(),
                user.status.as_str(),
            ],
        )?;

        for tag in &expertise {
            self.conn.execute(
                "INSERT INTO user_expertise (user_id, tag) VALUES (?1, ?2);",
                params![id_text.as_str(), tag.as_str()],
            )?;
        }

        self.get_user(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created user {id} missing in read-back"))
        })
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let users = self.query_users(
            &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
            [id.to_string()],
        )?;
        Ok(users.into_iter().next())
    }

    fn username_exists(&self, username: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1);",
            [username.trim()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1);",
            [email.trim().to_lowercase()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list_users(&self, role: Option<UserRole>) -> RepoResult<Vec<User>> {
        match role {
            Some(role) => self.query_users(
                &format!("{USER_SELECT_SQL} WHERE role = ?1 ORDER BY id ASC;"),
                [role.as_str()],
            ),
            None => self.query_users(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"), []),
        }
    }

    fn list_panel_candidates(&self) -> RepoResult<Vec<User>> {
        self.query_users(
            &format!("{USER_SELECT_SQL} WHERE role = ?1 AND status = ?2 ORDER BY id ASC;"),
            [UserRole::Reviewer.as_str(), Availability::Active.as_str()],
        )
    }

    fn set_status(&self, id: UserId, status: Availability) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE users SET status = ?2 WHERE id = ?1;",
            params![id.to_string(), status.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "user", id });
        }
        Ok(())
    }
}

fn parse_user_row(conn: &Connection, row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "users.id")?;
    let role_text: String = row.get("role")?;
    let status_text: String = row.get("status")?;

    Ok(User {
        id,
        username: row.get("username")?,
        name: row.get("name")?,
        email: row.get("email")?,
        role: parse_enum(&role_text, "users.role", UserRole::parse)?,
        expertise: load_expertise(conn, &id_text)?,
        status: parse_enum(&status_text, "users.status", Availability::parse)?,
        created_at: row.get("created_at")?,
    })
}

fn load_expertise(conn: &Connection, user_id: &str) -> RepoResult<BTreeSet<String>> {
    let mut stmt =
        conn.prepare("SELECT tag FROM user_expertise WHERE user_id = ?1 ORDER BY tag ASC;")?;
    let mut rows = stmt.query([user_id])?;
    let mut tags = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tags.insert(row.get::<_, String>(0)?);
    }
    Ok(tags)
}
