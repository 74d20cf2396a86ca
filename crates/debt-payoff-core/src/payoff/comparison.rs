use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::PayoffConfig;
use crate::error::DebtPayoffError;
use crate::payoff::account::DebtAccount;
use crate::payoff::policy::OrderingPolicy;
use crate::payoff::simulator::{simulate, PayoffInput, PayoffResult};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::DebtPayoffResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which strategy the engine suggests, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub strategy: OrderingPolicy,
    pub reason: String,
}

/// Snowball, Avalanche and the minimum-only baseline side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub snowball: PayoffResult,
    pub avalanche: PayoffResult,
    /// `None` when paying minimums alone never clears the debts.
    pub minimum_only: Option<PayoffResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_only_error: Option<String>,
    pub interest_saved_with_avalanche: Money,
    pub months_saved_with_avalanche: i64,
    pub interest_saved_vs_minimum: Option<Money>,
    pub time_saved_vs_minimum: Option<u32>,
    pub recommendation: Recommendation,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Run Snowball, Avalanche and minimum-only projections and derive savings.
pub fn compare(
    debts: &[DebtAccount],
    monthly_extra: Money,
    start_date: NaiveDate,
    config: &PayoffConfig,
) -> DebtPayoffResult<ComparisonResult> {
    if debts.is_empty() {
        return Err(DebtPayoffError::InvalidInput {
            field: "debts".into(),
            reason: "at least one debt is required to compare strategies".into(),
        });
    }

    let snowball = simulate(
        debts,
        monthly_extra,
        OrderingPolicy::Snowball,
        start_date,
        config,
    )?;
    let avalanche = simulate(
        debts,
        monthly_extra,
        OrderingPolicy::Avalanche,
        start_date,
        config,
    )?;

    let (minimum_only, minimum_only_error) = match simulate(
        debts,
        Decimal::ZERO,
        OrderingPolicy::MinimumOnly,
        start_date,
        config,
    ) {
        Ok(baseline) => (Some(baseline), None),
        Err(e) if e.is_non_convergent() => {
            debug!(error = %e, "minimum-only baseline does not converge");
            (None, Some(e.to_string()))
        }
        Err(e) => return Err(e),
    };

    let interest_saved_with_avalanche = snowball.total_interest - avalanche.total_interest;
    let months_saved_with_avalanche =
        i64::from(snowball.total_months) - i64::from(avalanche.total_months);

    let interest_saved_vs_minimum = minimum_only
        .as_ref()
        .map(|b| b.total_interest - avalanche.total_interest);
    let time_saved_vs_minimum = minimum_only
        .as_ref()
        .map(|b| b.total_months.saturating_sub(avalanche.total_months));

    let recommendation = recommend(&snowball, &avalanche, config);
    info!(
        strategy = %recommendation.strategy,
        %interest_saved_with_avalanche,
        "debt strategy comparison complete"
    );

    Ok(ComparisonResult {
        snowball,
        avalanche,
        minimum_only,
        minimum_only_error,
        interest_saved_with_avalanche,
        months_saved_with_avalanche,
        interest_saved_vs_minimum,
        time_saved_vs_minimum,
        recommendation,
    })
}

/// Avalanche unless the two timelines are effectively the same, in which
/// case Snowball's early wins cost nothing.
fn recommend(
    snowball: &PayoffResult,
    avalanche: &PayoffResult,
    config: &PayoffConfig,
) -> Recommendation {
    let month_diff = snowball.total_months.abs_diff(avalanche.total_months);
    let interest_diff = snowball.total_interest - avalanche.total_interest;

    if config
        .recommendation
        .is_effectively_equal(month_diff, interest_diff)
    {
        Recommendation {
            strategy: OrderingPolicy::Snowball,
            reason: format!(
                "Both strategies finish in about {} months with less than {} difference in \
                 interest; Snowball clears individual debts sooner for quicker wins",
                avalanche.total_months, config.recommendation.max_interest_difference
            ),
        }
    } else {
        Recommendation {
            strategy: OrderingPolicy::Avalanche,
            reason: format!(
                "Avalanche saves {} in interest and {} month(s) compared with Snowball by \
                 paying the highest-rate debt first",
                interest_diff,
                i64::from(snowball.total_months) - i64::from(avalanche.total_months)
            ),
        }
    }
}

/// Compare strategies and wrap the result in the standard output envelope.
pub fn compare_strategies(
    input: &PayoffInput,
) -> DebtPayoffResult<ComputationOutput<ComparisonResult>> {
    let start = Instant::now();
    let config = input.config.clone().unwrap_or_default();
    let mut warnings: Vec<String> = Vec::new();

    let result = compare(&input.debts, input.monthly_extra, input.start_date, &config)?;

    if result.interest_saved_with_avalanche < Decimal::ZERO {
        warnings.push(format!(
            "Snowball pays {} less interest than Avalanche for these debts",
            -result.interest_saved_with_avalanche
        ));
    }
    if let Some(reason) = &result.minimum_only_error {
        warnings.push(format!(
            "Savings versus minimum payments are not computable: {reason}"
        ));
    }
    if input.monthly_extra.is_zero() {
        warnings.push(
            "monthly_extra is zero; strategies differ only through redirected minimums".into(),
        );
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Debt payoff strategy comparison (Snowball vs Avalanche vs minimum payments)",
        &serde_json::json!({
            "debts": input.debts.len(),
            "monthly_extra": input.monthly_extra.to_string(),
            "start_date": input.start_date,
            "max_months": config.max_months,
            "snowball_tie_threshold_months": config.recommendation.max_month_difference,
            "snowball_tie_threshold_interest":
                config.recommendation.max_interest_difference.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
