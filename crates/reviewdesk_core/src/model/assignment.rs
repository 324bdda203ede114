//! Assignment model: one document bound to one reviewer.
//!
//! # Invariants
//! - Assignments are created only by panel assignment, status `assigned`.
//! - Status moves forward only: `assigned -> reviewing -> completed`, with
//!   `assigned -> completed` allowed on direct review submission.
//! - `assigned` and `reviewing` count toward reviewer workload.

use crate::model::document::DocumentId;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AssignmentId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Assigned,
    Reviewing,
    Completed,
}

impl AssignmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Reviewing => "reviewing",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "assigned" => Some(Self::Assigned),
            "reviewing" => Some(Self::Reviewing),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Non-terminal assignments count against the reviewer workload cap.
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Completed)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Assigned, Self::Reviewing)
                | (Self::Assigned, Self::Completed)
                | (Self::Reviewing, Self::Completed)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub document_id: DocumentId,
    pub reviewer_id: UserId,
    pub status: AssignmentStatus,
    /// Unix epoch milliseconds.
    pub assigned_at: i64,
}

#[cfg(test)]
mod tests {
    use super::AssignmentStatus::{self, Assigned, Completed, Reviewing};

    #[test]
    fn transitions_only_move_forward() {
        assert!(Assigned.can_transition_to(Reviewing));
        assert!(Assigned.can_transition_to(Completed));
        assert!(Reviewing.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Assigned));
        assert!(!Completed.can_transition_to(Completed));
        assert!(!Reviewing.can_transition_to(Assigned));
    }

    #[test]
    fn only_completed_is_terminal() {
        let open: Vec<AssignmentStatus> = [Assigned, Reviewing, Completed]
            .into_iter()
            .filter(|status| status.is_open())
            .collect();
        assert_eq!(open, vec![Assigned, Reviewing]);
    }
}
