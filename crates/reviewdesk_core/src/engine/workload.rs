//! Reviewer workload accounting.
//!
//! Workload is the number of a reviewer's `assigned` or `reviewing`
//! assignments. A snapshot is taken once per selection pass so every
//! candidate is measured at the same instant.

use crate::engine::scoring::Candidate;
use crate::model::user::{User, UserId};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadSnapshot {
    counts: HashMap<UserId, u32>,
}

impl WorkloadSnapshot {
    pub fn from_counts(counts: HashMap<UserId, u32>) -> Self {
        Self { counts }
    }

    /// Open assignment count for `reviewer`; reviewers absent from the
    /// snapshot have none.
    pub fn workload_of(&self, reviewer: UserId) -> u32 {
        self.counts.get(&reviewer).copied().unwrap_or(0)
    }

    /// Pairs each user with its workload from this snapshot.
    pub fn candidates(&self, users: Vec<User>) -> Vec<Candidate> {
        users
            .into_iter()
            .map(|user| {
                let workload = self.workload_of(user.id);
                Candidate::from_user(user, workload)
            })
            .collect()
    }
}
