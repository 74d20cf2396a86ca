use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

/// Decides which active debt receives the pooled extra payment each month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Smallest balance first (tie-break: id).
    Snowball,
    /// Highest interest rate first (tie-break: smallest balance, then id).
    Avalanche,
    /// No focus debt: every debt pays its own minimum and nothing is pooled.
    MinimumOnly,
}

/// The per-debt facts a policy ranks on.
#[derive(Debug, Clone, Copy)]
pub struct RankKey<'a> {
    pub id: &'a str,
    pub balance: Money,
    pub interest_rate: Percent,
}

impl OrderingPolicy {
    /// Total order over active debts; the minimum is the focus debt.
    pub fn rank(&self, a: &RankKey<'_>, b: &RankKey<'_>) -> Ordering {
        match self {
            OrderingPolicy::Snowball => a.balance.cmp(&b.balance).then_with(|| a.id.cmp(b.id)),
            OrderingPolicy::Avalanche => b
                .interest_rate
                .cmp(&a.interest_rate)
                .then_with(|| a.balance.cmp(&b.balance))
                .then_with(|| a.id.cmp(b.id)),
            OrderingPolicy::MinimumOnly => a.id.cmp(b.id),
        }
    }

    /// Whether the extra budget and freed minimums are pooled onto a focus debt.
    pub fn pools_payments(&self) -> bool {
        !matches!(self, OrderingPolicy::MinimumOnly)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderingPolicy::Snowball => "snowball",
            OrderingPolicy::Avalanche => "avalanche",
            OrderingPolicy::MinimumOnly => "minimum_only",
        }
    }
}

impl fmt::Display for OrderingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
