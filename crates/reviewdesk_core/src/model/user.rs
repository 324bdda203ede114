//! User and reviewer model.
//!
//! # Responsibility
//! - Define the account record used for reviewer selection and reporting.
//! - Normalize expertise into a structured tag set.
//!
//! # Invariants
//! - Only users with `UserRole::Reviewer` are candidates for a panel.
//! - Expertise tags are trimmed, non-empty and unique. Case is preserved
//!   because subject matching is case-sensitive.
//! - Email is stored lowercased.

use crate::model::validation::{require_text, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Stable user identifier. Ordering of ids is the panel tie-break.
pub type UserId = Uuid;

pub const USERNAME_MIN_CHARS: usize = 3;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Reviewer,
    Author,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Reviewer => "reviewer",
            Self::Author => "author",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "reviewer" => Some(Self::Reviewer),
            "author" => Some(Self::Author),
            _ => None,
        }
    }
}

/// Reviewer availability. Only `Active` reviewers are considered for panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Active,
    Busy,
    Vacation,
}

impl Availability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Busy => "busy",
            Self::Vacation => "vacation",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "busy" => Some(Self::Busy),
            "vacation" => Some(Self::Vacation),
            _ => None,
        }
    }
}

/// Persisted account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub expertise: BTreeSet<String>,
    pub status: Availability,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl User {
    /// Returns whether this user may be placed on a panel right now.
    pub fn is_panel_candidate(&self) -> bool {
        self.role == UserRole::Reviewer && self.status == Availability::Active
    }
}

/// Account creation input, validated once before reaching storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub status: Availability,
}

impl NewUser {
    /// Checks required fields, username length and email format.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("username", &self.username)?;
        require_text("name", &self.name)?;
        require_text("email", &self.email)?;

        let username_chars = self.username.trim().chars().count();
        if username_chars < USERNAME_MIN_CHARS {
            return Err(ValidationError::UsernameTooShort {
                min: USERNAME_MIN_CHARS,
                actual: username_chars,
            });
        }

        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(ValidationError::InvalidEmail(self.email.clone()));
        }

        normalize_expertise(&self.expertise)?;
        Ok(())
    }

    /// Email in its stored form.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// Trims and deduplicates expertise tags, rejecting blank entries.
pub fn normalize_expertise(tags: &[String]) -> Result<BTreeSet<String>, ValidationError> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::BlankExpertiseTag);
        }
        unique.insert(trimmed.to_string());
    }
    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::{normalize_expertise, Availability, NewUser, UserRole};
    use crate::model::validation::ValidationError;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            name: "Dana Reviewer".to_string(),
            email: email.to_string(),
            role: UserRole::Reviewer,
            expertise: vec!["NLP".to_string()],
            status: Availability::Active,
        }
    }

    #[test]
    fn validate_accepts_well_formed_user() {
        new_user("dana", "Dana@Example.org").validate().unwrap();
    }

    #[test]
    fn validate_rejects_short_username() {
        let err = new_user("da", "dana@example.org").validate().unwrap_err();
        assert_eq!(err, ValidationError::UsernameTooShort { min: 3, actual: 2 });
    }

    #[test]
    fn validate_rejects_malformed_email() {
        let err = new_user("dana", "dana@localhost").validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEmail(_)));
    }

    #[test]
    fn expertise_is_trimmed_deduplicated_and_case_preserving() {
        let tags = vec![" NLP".to_string(), "NLP ".to_string(), "nlp".to_string()];
        let normalized = normalize_expertise(&tags).unwrap();
        assert_eq!(
            normalized.into_iter().collect::<Vec<_>>(),
            vec!["NLP".to_string(), "nlp".to_string()]
        );
    }

    #[test]
    fn expertise_rejects_blank_tag() {
        let tags = vec!["ML".to_string(), "  ".to_string()];
        assert_eq!(
            normalize_expertise(&tags).unwrap_err(),
            ValidationError::BlankExpertiseTag
        );
    }
}
