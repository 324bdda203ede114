//! Submitted document model and status derivation.
//!
//! # Responsibility
//! - Define the document record routed to reviewer panels.
//! - Derive document status from the aggregate state of its panel.
//!
//! # Invariants
//! - A new document starts `pending`.
//! - `assigned` is only set by panel assignment.
//! - `completed` holds iff every assignment of the document is `completed`.

use crate::model::assignment::AssignmentStatus;
use crate::model::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type DocumentId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Assigned,
    Reviewing,
    Completed,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 4] = [
        DocumentStatus::Pending,
        DocumentStatus::Assigned,
        DocumentStatus::Reviewing,
        DocumentStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::Reviewing => "reviewing",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "assigned" => Some(Self::Assigned),
            "reviewing" => Some(Self::Reviewing),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Derives document status from the statuses of all its assignments.
    ///
    /// - no assignments: `Pending`
    /// - every assignment completed: `Completed`
    /// - any assignment reviewing or completed: `Reviewing`
    /// - otherwise: `Assigned`
    pub fn derive(assignments: &[AssignmentStatus]) -> Self {
        if assignments.is_empty() {
            return Self::Pending;
        }
        if assignments
            .iter()
            .all(|status| *status == AssignmentStatus::Completed)
        {
            return Self::Completed;
        }
        if assignments
            .iter()
            .any(|status| *status != AssignmentStatus::Assigned)
        {
            return Self::Reviewing;
        }
        Self::Assigned
    }
}

/// Persisted document record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub author: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: String,
    /// Declared subject field. `None` when the submitter left it blank.
    pub field: Option<String>,
    pub status: DocumentStatus,
    /// Unix epoch milliseconds.
    pub submitted_at: i64,
}

/// Document creation input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub author: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub field: Option<String>,
}

impl NewDocument {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("author", &self.author)?;
        Ok(())
    }

    /// Field in its stored form: trimmed, blank collapsed to `None`.
    pub fn normalized_field(&self) -> Option<String> {
        self.field
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentStatus, NewDocument};
    use crate::model::assignment::AssignmentStatus::{Assigned, Completed, Reviewing};

    #[test]
    fn derive_waits_for_every_assignment() {
        assert_eq!(
            DocumentStatus::derive(&[Completed, Completed, Assigned]),
            DocumentStatus::Reviewing
        );
        assert_eq!(
            DocumentStatus::derive(&[Completed, Completed, Completed]),
            DocumentStatus::Completed
        );
    }

    #[test]
    fn derive_distinguishes_untouched_and_started_panels() {
        assert_eq!(DocumentStatus::derive(&[]), DocumentStatus::Pending);
        assert_eq!(
            DocumentStatus::derive(&[Assigned, Assigned, Assigned]),
            DocumentStatus::Assigned
        );
        assert_eq!(
            DocumentStatus::derive(&[Assigned, Reviewing, Assigned]),
            DocumentStatus::Reviewing
        );
    }

    #[test]
    fn blank_field_normalizes_to_none() {
        let doc = NewDocument {
            title: "t".to_string(),
            author: "a".to_string(),
            field: Some("   ".to_string()),
            ..NewDocument::default()
        };
        assert_eq!(doc.normalized_field(), None);
    }

    #[test]
    fn validate_requires_title_and_author() {
        let doc = NewDocument {
            title: "Attention".to_string(),
            ..NewDocument::default()
        };
        assert!(doc.validate().is_err());
    }
}
