//! Reviewer priority scoring and panel selection.
//!
//! `priority = w_a * availability + w_m * subject_match + w_b * load_balance`
//!
//! - availability: `(cap - workload) / cap`
//! - subject_match: `1.0` exact tag match, `0.8` when the field contains a
//!   tag, otherwise `0.5` (also when the document has no field)
//! - load_balance: `(max - workload) / (max - min)` over the eligible
//!   candidates of this pass, `1.0` when all workloads are equal
//!
//! Ranking is by priority descending, then reviewer id ascending.

use crate::engine::policy::{PanelPolicy, PriorityWeights};
use crate::model::user::{User, UserId};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const EXACT_MATCH: f64 = 1.0;
pub const SUBSTRING_MATCH: f64 = 0.8;
pub const DEFAULT_MATCH: f64 = 0.5;

/// Reviewer considered by one selection pass, with its snapshot workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub reviewer_id: UserId,
    pub name: String,
    pub email: String,
    pub expertise: BTreeSet<String>,
    pub workload: u32,
}

impl Candidate {
    pub fn from_user(user: User, workload: u32) -> Self {
        Self {
            reviewer_id: user.id,
            name: user.name,
            email: user.email,
            expertise: user.expertise,
            workload,
        }
    }
}

/// Per-component scores of one candidate, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriorityBreakdown {
    pub availability: f64,
    pub subject_match: f64,
    pub load_balance: f64,
    pub priority: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub breakdown: PriorityBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSelectionError {
    /// Fewer eligible reviewers than the panel size.
    InsufficientReviewers { required: usize, eligible: usize },
}

impl Display for PanelSelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientReviewers { required, eligible } => write!(
                f,
                "panel needs {required} eligible reviewers, only {eligible} available"
            ),
        }
    }
}

impl Error for PanelSelectionError {}

/// Scores how well `expertise` covers the document `field`.
///
/// Matching is case-sensitive.
pub fn subject_match(field: Option<&str>, expertise: &BTreeSet<String>) -> f64 {
    let Some(field) = field.filter(|value| !value.is_empty()) else {
        return DEFAULT_MATCH;
    };

    if expertise.contains(field) {
        EXACT_MATCH
    } else if expertise
        .iter()
        .any(|tag| !tag.is_empty() && field.contains(tag.as_str()))
    {
        SUBSTRING_MATCH
    } else {
        DEFAULT_MATCH
    }
}

/// Remaining capacity as a fraction of the cap.
pub fn availability(workload: u32, workload_cap: u32) -> f64 {
    let cap = workload_cap.max(1);
    f64::from(cap.saturating_sub(workload)) / f64::from(cap)
}

/// Position of `workload` between the lightest and heaviest candidate.
pub fn load_balance(workload: u32, min_workload: u32, max_workload: u32) -> f64 {
    if max_workload == min_workload {
        return 1.0;
    }
    f64::from(max_workload.saturating_sub(workload)) / f64::from(max_workload - min_workload)
}

/// Weighted sum of the three components.
pub fn priority(
    weights: &PriorityWeights,
    availability: f64,
    subject_match: f64,
    load_balance: f64,
) -> f64 {
    weights.availability * availability
        + weights.subject_match * subject_match
        + weights.load_balance * load_balance
}

/// Drops candidates at or above the cap and ranks the rest.
pub fn rank_candidates(
    candidates: Vec<Candidate>,
    field: Option<&str>,
    policy: &PanelPolicy,
) -> Vec<ScoredCandidate> {
    let eligible: Vec<Candidate> = candidates
        .into_iter()
        .filter(|candidate| candidate.workload < policy.workload_cap)
        .collect();

    let min_workload = eligible.iter().map(|c| c.workload).min().unwrap_or(0);
    let max_workload = eligible.iter().map(|c| c.workload).max().unwrap_or(0);
    let weights = policy.weights;

    let mut scored: Vec<ScoredCandidate> = eligible
        .into_iter()
        .map(|candidate| {
            let availability = availability(candidate.workload, policy.workload_cap);
            let subject_match = subject_match(field, &candidate.expertise);
            let load_balance = load_balance(candidate.workload, min_workload, max_workload);
            let priority = priority(&weights, availability, subject_match, load_balance);
            ScoredCandidate {
                candidate,
                breakdown: PriorityBreakdown {
                    availability,
                    subject_match,
                    load_balance,
                    priority,
                },
            }
        })
        .collect();

    scored.sort_by(compare_ranked);
    scored
}

/// Ranks candidates and keeps the top `panel_size`.
///
/// # Errors
/// - `InsufficientReviewers` when fewer than `panel_size` candidates are
///   under the workload cap.
pub fn select_panel(
    candidates: Vec<Candidate>,
    field: Option<&str>,
    policy: &PanelPolicy,
) -> Result<Vec<ScoredCandidate>, PanelSelectionError> {
    let mut ranked = rank_candidates(candidates, field, policy);
    if ranked.len() < policy.panel_size {
        return Err(PanelSelectionError::InsufficientReviewers {
            required: policy.panel_size,
            eligible: ranked.len(),
        });
    }
    ranked.truncate(policy.panel_size);
    Ok(ranked)
}

fn compare_ranked(left: &ScoredCandidate, right: &ScoredCandidate) -> Ordering {
    right
        .breakdown
        .priority
        .total_cmp(&left.breakdown.priority)
        .then_with(|| left.candidate.reviewer_id.cmp(&right.candidate.reviewer_id))
}

#[cfg(test)]
mod tests {
    use super::{
        availability, load_balance, priority, rank_candidates, select_panel, subject_match,
        Candidate, PanelSelectionError, DEFAULT_MATCH, EXACT_MATCH, SUBSTRING_MATCH,
    };
    use crate::engine::policy::{PanelPolicy, PriorityWeights};
    use std::collections::BTreeSet;
    use uuid::Uuid;

    #[test]
    fn priority_weights_components() {
        let weights = PriorityWeights::default();
        assert!((priority(&weights, 1.0, 1.0, 1.0) - 1.0).abs() < 1e-12);
        assert!((priority(&weights, 0.5, 0.5, 0.0) - 0.375).abs() < 1e-12);
        assert_eq!(priority(&weights, 0.0, 0.0, 0.0), 0.0);
    }

    fn tags(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn candidate(id: u128, workload: u32, expertise: &[&str]) -> Candidate {
        Candidate {
            reviewer_id: Uuid::from_u128(id),
            name: format!("reviewer-{id}"),
            email: format!("reviewer{id}@example.org"),
            expertise: tags(expertise),
            workload,
        }
    }

    fn ids(panel: &[super::ScoredCandidate]) -> Vec<Uuid> {
        panel.iter().map(|c| c.candidate.reviewer_id).collect()
    }

    #[test]
    fn subject_match_prefers_exact_then_substring() {
        assert_eq!(subject_match(Some("NLP"), &tags(&["NLP", "ML"])), EXACT_MATCH);
        assert_eq!(
            subject_match(Some("Applied NLP"), &tags(&["NLP"])),
            SUBSTRING_MATCH
        );
        assert_eq!(subject_match(Some("Robotics"), &tags(&["NLP"])), DEFAULT_MATCH);
    }

    #[test]
    fn subject_match_is_case_sensitive_and_defaults_without_field() {
        assert_eq!(subject_match(Some("nlp"), &tags(&["NLP"])), DEFAULT_MATCH);
        assert_eq!(subject_match(None, &tags(&["NLP"])), DEFAULT_MATCH);
        assert_eq!(subject_match(Some(""), &tags(&["NLP"])), DEFAULT_MATCH);
    }

    #[test]
    fn availability_and_load_balance_components() {
        assert_eq!(availability(0, 10), 1.0);
        assert_eq!(availability(9, 10), 0.1);
        assert_eq!(load_balance(3, 3, 3), 1.0);
        assert_eq!(load_balance(0, 0, 9), 1.0);
        assert_eq!(load_balance(9, 0, 9), 0.0);
    }

    #[test]
    fn capped_reviewer_is_excluded_from_ranking() {
        let candidates = vec![
            candidate(1, 0, &[]),
            candidate(2, 2, &[]),
            candidate(3, 5, &[]),
            candidate(4, 9, &[]),
            candidate(5, 10, &[]),
        ];
        let ranked = rank_candidates(candidates, None, &PanelPolicy::default());
        assert_eq!(ranked.len(), 4);
        assert!(ranked
            .iter()
            .all(|c| c.candidate.reviewer_id != Uuid::from_u128(5)));

        let balance: Vec<f64> = ranked.iter().map(|c| c.breakdown.load_balance).collect();
        assert_eq!(balance[0], 1.0);
        assert_eq!(balance[3], 0.0);
    }

    #[test]
    fn lighter_reviewers_win_when_expertise_is_equal() {
        let candidates = vec![
            candidate(1, 0, &[]),
            candidate(2, 2, &[]),
            candidate(3, 5, &[]),
            candidate(4, 9, &[]),
            candidate(5, 10, &[]),
        ];
        let panel = select_panel(candidates, Some("NLP"), &PanelPolicy::default()).unwrap();
        assert_eq!(
            ids(&panel),
            vec![Uuid::from_u128(1), Uuid::from_u128(2), Uuid::from_u128(3)]
        );
    }

    #[test]
    fn expertise_can_outweigh_small_workload_difference() {
        let candidates = vec![
            candidate(1, 0, &[]),
            candidate(2, 1, &["NLP"]),
            candidate(3, 8, &[]),
            candidate(4, 9, &[]),
        ];
        let panel = select_panel(candidates, Some("NLP"), &PanelPolicy::default()).unwrap();
        assert_eq!(
            ids(&panel),
            vec![Uuid::from_u128(2), Uuid::from_u128(1), Uuid::from_u128(3)]
        );
        assert_eq!(panel[0].breakdown.subject_match, EXACT_MATCH);
    }

    #[test]
    fn ties_break_by_ascending_reviewer_id() {
        let candidates = vec![
            candidate(9, 3, &["ML"]),
            candidate(4, 3, &["ML"]),
            candidate(7, 3, &["ML"]),
            candidate(2, 3, &["ML"]),
        ];
        let panel = select_panel(candidates, Some("ML"), &PanelPolicy::default()).unwrap();
        assert_eq!(
            ids(&panel),
            vec![Uuid::from_u128(2), Uuid::from_u128(4), Uuid::from_u128(7)]
        );
        assert_eq!(panel[0].breakdown.priority, panel[1].breakdown.priority);
    }

    #[test]
    fn identical_inputs_yield_identical_panel() {
        let build = || {
            vec![
                candidate(3, 4, &["Vision"]),
                candidate(1, 0, &["NLP"]),
                candidate(2, 7, &["Computer Vision"]),
                candidate(4, 2, &[]),
            ]
        };
        let first = select_panel(build(), Some("Computer Vision"), &PanelPolicy::default());
        let mut reversed = build();
        reversed.reverse();
        let second = select_panel(reversed, Some("Computer Vision"), &PanelPolicy::default());
        assert_eq!(first, second);
    }

    #[test]
    fn priority_stays_within_unit_interval() {
        let candidates = vec![
            candidate(1, 0, &["NLP"]),
            candidate(2, 9, &[]),
            candidate(3, 4, &["Applied"]),
        ];
        for scored in rank_candidates(candidates, Some("Applied NLP"), &PanelPolicy::default()) {
            assert!((0.0..=1.0).contains(&scored.breakdown.priority));
        }
    }

    #[test]
    fn fewer_eligible_than_panel_size_fails() {
        let candidates = vec![
            candidate(1, 0, &[]),
            candidate(2, 10, &[]),
            candidate(3, 4, &[]),
            candidate(4, 12, &[]),
        ];
        let err = select_panel(candidates, None, &PanelPolicy::default()).unwrap_err();
        assert_eq!(
            err,
            PanelSelectionError::InsufficientReviewers {
                required: 3,
                eligible: 2
            }
        );
    }
}
