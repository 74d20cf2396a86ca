use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DebtPayoffError;
use crate::payoff::comparison::{compare, ComparisonResult};
use crate::payoff::policy::OrderingPolicy;
use crate::payoff::simulator::PayoffInput;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::DebtPayoffResult;

/// Input for choosing a strategy: the projection inputs plus the user's pick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionInput {
    #[serde(flatten)]
    pub payoff: PayoffInput,
    pub strategy: OrderingPolicy,
}

/// Body persisted for the user's chosen strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySelection {
    pub strategy_type: OrderingPolicy,
    pub monthly_extra: Money,
    pub projected_payoff_date: NaiveDate,
    /// Interest saved against paying minimums only; `None` if not computable.
    pub total_interest_saved: Option<Money>,
    pub strategy_details: serde_json::Value,
}

/// Build the persistence payload for `strategy` from a finished comparison.
pub fn build_strategy_selection(
    comparison: &ComparisonResult,
    strategy: OrderingPolicy,
) -> DebtPayoffResult<StrategySelection> {
    let chosen = match strategy {
        OrderingPolicy::Snowball => &comparison.snowball,
        OrderingPolicy::Avalanche => &comparison.avalanche,
        OrderingPolicy::MinimumOnly => {
            return Err(DebtPayoffError::InvalidInput {
                field: "strategy".into(),
                reason: "strategy must be 'snowball' or 'avalanche'".into(),
            })
        }
    };

    let total_interest_saved = comparison
        .minimum_only
        .as_ref()
        .map(|baseline| baseline.total_interest - chosen.total_interest);

    let strategy_details = serde_json::json!({
        "total_months": chosen.total_months,
        "total_interest": chosen.total_interest,
        "total_paid": chosen.total_paid,
        "debt_payoff_order": chosen.debt_payoff_order,
        "recommended_strategy": comparison.recommendation.strategy,
        "recommendation_reason": comparison.recommendation.reason,
        "follows_recommendation": comparison.recommendation.strategy == strategy,
    });

    Ok(StrategySelection {
        strategy_type: strategy,
        monthly_extra: chosen.monthly_extra,
        projected_payoff_date: chosen.payoff_date,
        total_interest_saved,
        strategy_details,
    })
}

/// Compare strategies for the input and build the payload for the chosen one.
pub fn select_strategy(
    input: &SelectionInput,
) -> DebtPayoffResult<ComputationOutput<StrategySelection>> {
    let start = Instant::now();
    let config = input.payoff.config.clone().unwrap_or_default();
    let mut warnings: Vec<String> = Vec::new();

    let comparison = compare(
        &input.payoff.debts,
        input.payoff.monthly_extra,
        input.payoff.start_date,
        &config,
    )?;
    let selection = build_strategy_selection(&comparison, input.strategy)?;

    if comparison.recommendation.strategy != input.strategy {
        warnings.push(format!(
            "{} was chosen over the recommended {}",
            input.strategy, comparison.recommendation.strategy
        ));
    }
    if selection.total_interest_saved.is_none() {
        warnings.push(
            "total_interest_saved is not computable: minimum payments never clear these debts"
                .into(),
        );
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Debt payoff strategy selection",
        &serde_json::json!({
            "strategy": input.strategy,
            "debts": input.payoff.debts.len(),
            "monthly_extra": input.payoff.monthly_extra.to_string(),
            "start_date": input.payoff.start_date,
        }),
        warnings,
        elapsed,
        selection,
    ))
}
