//! Read-only statistics over documents, reviewers and reviews.
//!
//! # Invariants
//! - All figures come from one deferred read snapshot.
//! - Histogram bucket counts sum to the number of reviews.

use crate::db::with_read_snapshot;
use crate::model::document::DocumentStatus;
use crate::model::user::UserId;
use crate::repo::assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
use crate::repo::document_repo::{DocumentRepository, SqliteDocumentRepository};
use crate::repo::review_repo::{ReviewRepository, SqliteReviewRepository};
use crate::service::error::ServiceError;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasicCounts {
    pub total_documents: u64,
    pub completed_documents: u64,
    pub total_reviewers: u64,
    pub total_reviews: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerWorkload {
    pub reviewer_id: UserId,
    pub name: String,
    /// Open (`assigned`/`reviewing`) assignments.
    pub current_assignments: u32,
    pub completed_reviews: u32,
    pub total_assignments: u32,
}

/// Total-score band of the review histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScoreBand {
    From90To100,
    From80To89,
    From70To79,
    From60To69,
    Below60,
}

impl ScoreBand {
    pub const ALL: [ScoreBand; 5] = [
        ScoreBand::From90To100,
        ScoreBand::From80To89,
        ScoreBand::From70To79,
        ScoreBand::From60To69,
        ScoreBand::Below60,
    ];

    pub fn for_total(total_score: i32) -> Self {
        match total_score {
            90.. => Self::From90To100,
            80..=89 => Self::From80To89,
            70..=79 => Self::From70To79,
            60..=69 => Self::From60To69,
            _ => Self::Below60,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::From90To100 => "90-100",
            Self::From80To89 => "80-89",
            Self::From70To79 => "70-79",
            Self::From60To69 => "60-69",
            Self::Below60 => "0-59",
        }
    }
}

/// Fixed-bucket histogram of review total scores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreDistribution {
    #[serde(rename = "90-100")]
    pub from_90_to_100: u64,
    #[serde(rename = "80-89")]
    pub from_80_to_89: u64,
    #[serde(rename = "70-79")]
    pub from_70_to_79: u64,
    #[serde(rename = "60-69")]
    pub from_60_to_69: u64,
    #[serde(rename = "0-59")]
    pub below_60: u64,
}

impl ScoreDistribution {
    pub fn from_totals(totals: impl IntoIterator<Item = i32>) -> Self {
        let mut distribution = Self::default();
        for total in totals {
            distribution.record(total);
        }
        distribution
    }

    pub fn record(&mut self, total_score: i32) {
        *self.bucket_mut(ScoreBand::for_total(total_score)) += 1;
    }

    pub fn count(&self, band: ScoreBand) -> u64 {
        match band {
            ScoreBand::From90To100 => self.from_90_to_100,
            ScoreBand::From80To89 => self.from_80_to_89,
            ScoreBand::From70To79 => self.from_70_to_79,
            ScoreBand::From60To69 => self.from_60_to_69,
            ScoreBand::Below60 => self.below_60,
        }
    }

    pub fn total(&self) -> u64 {
        ScoreBand::ALL.into_iter().map(|band| self.count(band)).sum()
    }

    fn bucket_mut(&mut self, band: ScoreBand) -> &mut u64 {
        match band {
            ScoreBand::From90To100 => &mut self.from_90_to_100,
            ScoreBand::From80To89 => &mut self.from_80_to_89,
            ScoreBand::From70To79 => &mut self.from_70_to_79,
            ScoreBand::From60To69 => &mut self.from_60_to_69,
            ScoreBand::Below60 => &mut self.below_60,
        }
    }
}

/// Aggregate returned by `StatsService::statistics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub basic: BasicCounts,
    /// Document count per status; every status is present.
    pub progress: BTreeMap<DocumentStatus, u64>,
    pub reviewer_workload: Vec<ReviewerWorkload>,
    pub score_distribution: ScoreDistribution,
}

pub struct StatsService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> StatsService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn statistics(&self) -> Result<Statistics, ServiceError> {
        with_read_snapshot(self.conn, |tx| {
            let documents = SqliteDocumentRepository::try_new(tx)?;
            let assignments = SqliteAssignmentRepository::try_new(tx)?;
            let reviews = SqliteReviewRepository::try_new(tx)?;

            let progress = documents.count_by_status()?;
            let reviewer_workload: Vec<ReviewerWorkload> = assignments
                .reviewer_tallies()?
                .into_iter()
                .map(|tally| ReviewerWorkload {
                    reviewer_id: tally.reviewer_id,
                    name: tally.name,
                    current_assignments: tally.open_assignments,
                    completed_reviews: tally.completed_assignments,
                    total_assignments: tally.open_assignments + tally.completed_assignments,
                })
                .collect();
            let totals = reviews.list_total_scores()?;

            let basic = BasicCounts {
                total_documents: progress.values().sum(),
                completed_documents: progress
                    .get(&DocumentStatus::Completed)
                    .copied()
                    .unwrap_or(0),
                total_reviewers: reviewer_workload.len() as u64,
                total_reviews: totals.len() as u64,
            };

            Ok(Statistics {
                basic,
                progress,
                reviewer_workload,
                score_distribution: ScoreDistribution::from_totals(totals),
            })
        })
    }
}
