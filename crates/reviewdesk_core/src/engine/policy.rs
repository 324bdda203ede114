//! Panel selection configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_WORKLOAD_CAP: u32 = 10;
pub const DEFAULT_PANEL_SIZE: usize = 3;

/// Weights of the three priority components. They sum to `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    pub availability: f64,
    pub subject_match: f64,
    pub load_balance: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            availability: 0.40,
            subject_match: 0.35,
            load_balance: 0.25,
        }
    }
}

/// Workload cap, panel size and weights used by one selection pass.
///
/// `workload_cap` must be greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelPolicy {
    pub workload_cap: u32,
    pub panel_size: usize,
    pub weights: PriorityWeights,
}

impl Default for PanelPolicy {
    fn default() -> Self {
        Self {
            workload_cap: DEFAULT_WORKLOAD_CAP,
            panel_size: DEFAULT_PANEL_SIZE,
            weights: PriorityWeights::default(),
        }
    }
}
