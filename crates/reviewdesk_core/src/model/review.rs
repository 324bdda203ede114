//! Review model and score arithmetic.
//!
//! # Invariants
//! - Sub-score ranges: innovation 0..=30, feasibility 0..=25,
//!   quality 0..=25, value 0..=20.
//! - `total_score == innovation + feasibility + quality + value`; the total is
//!   computed here and never accepted from input.

use crate::model::assignment::AssignmentId;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ReviewId = Uuid;

pub const INNOVATION_MAX: i32 = 30;
pub const FEASIBILITY_MAX: i32 = 25;
pub const QUALITY_MAX: i32 = 25;
pub const VALUE_MAX: i32 = 20;

/// The four bounded sub-scores of one review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewScores {
    pub innovation: i32,
    pub feasibility: i32,
    pub quality: i32,
    pub value: i32,
}

impl ReviewScores {
    pub fn new(innovation: i32, feasibility: i32, quality: i32, value: i32) -> Self {
        Self {
            innovation,
            feasibility,
            quality,
            value,
        }
    }

    /// Rejects any sub-score outside its range. Scores are never clamped.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (criterion, value, max) in [
            ("innovation", self.innovation, INNOVATION_MAX),
            ("feasibility", self.feasibility, FEASIBILITY_MAX),
            ("quality", self.quality, QUALITY_MAX),
            ("value", self.value, VALUE_MAX),
        ] {
            if !(0..=max).contains(&value) {
                return Err(ValidationError::ScoreOutOfRange {
                    criterion,
                    value,
                    max,
                });
            }
        }
        Ok(())
    }

    pub fn total(&self) -> i32 {
        self.innovation + self.feasibility + self.quality + self.value
    }
}

/// Review submission input attached to one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub scores: ReviewScores,
    #[serde(default)]
    pub comments: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub assignment_id: AssignmentId,
    pub scores: ReviewScores,
    pub total_score: i32,
    pub comments: String,
    /// Unix epoch milliseconds.
    pub submitted_at: i64,
}
