use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Upper bound on simulated months (100 years).
pub const DEFAULT_MAX_MONTHS: u32 = 1200;

/// Tunables for a payoff run. Every field has a default so partial
/// configuration objects deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoffConfig {
    /// Safety cap on the month counter before a run is declared non-convergent.
    pub max_months: u32,
    pub recommendation: RecommendationThresholds,
}

impl Default for PayoffConfig {
    fn default() -> Self {
        Self {
            max_months: DEFAULT_MAX_MONTHS,
            recommendation: RecommendationThresholds::default(),
        }
    }
}

/// When Snowball and Avalanche differ by less than both thresholds the
/// comparison recommends Snowball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationThresholds {
    /// Strict upper bound on the absolute difference in payoff months.
    pub max_month_difference: u32,
    /// Strict upper bound on the absolute difference in total interest.
    pub max_interest_difference: Money,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            max_month_difference: 1,
            max_interest_difference: dec!(1.00),
        }
    }
}

impl RecommendationThresholds {
    pub fn is_effectively_equal(&self, month_diff: u32, interest_diff: Decimal) -> bool {
        month_diff < self.max_month_difference
            && interest_diff.abs() < self.max_interest_difference
    }
}
