use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::PayoffConfig;
use crate::error::DebtPayoffError;
use crate::payoff::account::{validate_debts, validate_monthly_extra, DebtAccount};
use crate::payoff::policy::{OrderingPolicy, RankKey};
use crate::time_value::{add_months, monthly_interest};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::DebtPayoffResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a single payoff projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffInput {
    pub debts: Vec<DebtAccount>,
    pub monthly_extra: Money,
    /// The caller's "today"; month 1 ends one calendar month after it.
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PayoffConfig>,
}

/// One debt's activity within one simulated month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationMonth {
    pub debt_id: String,
    pub balance_before: Money,
    pub interest_accrued: Money,
    pub payment: Money,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub balance_after: Money,
    /// True for the debt that received the pooled payment first.
    pub is_focus: bool,
}

/// All debt activity for one month of the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffMonth {
    pub month: u32,
    pub date: NaiveDate,
    pub total_payment: Money,
    pub total_interest: Money,
    pub debts: Vec<SimulationMonth>,
}

/// When and at what cost a debt reached zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPayoff {
    pub debt_id: String,
    pub name: String,
    pub original_balance: Money,
    /// Zero for debts that were already paid off at the start.
    pub payoff_month: u32,
    pub payoff_date: NaiveDate,
    pub interest_paid: Money,
}

/// Outcome of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffResult {
    pub strategy: OrderingPolicy,
    pub monthly_extra: Money,
    pub start_date: NaiveDate,
    pub total_months: u32,
    pub total_interest: Money,
    pub total_paid: Money,
    pub payoff_date: NaiveDate,
    pub debt_payoff_order: Vec<DebtPayoff>,
    pub schedule: Vec<PayoffMonth>,
}

/// Running state for one debt. Never written back to the caller's account.
struct Ledger<'a> {
    account: &'a DebtAccount,
    balance: Money,
    interest_paid: Money,
}

impl Ledger<'_> {
    /// Ranking uses the balance the debt started with, so the payoff order is
    /// fixed for the whole run.
    fn key(&self) -> RankKey<'_> {
        RankKey {
            id: &self.account.id,
            balance: self.account.current_balance,
            interest_rate: self.account.interest_rate,
        }
    }

    /// Share of the starting balance still owed.
    fn remaining_share(&self) -> Decimal {
        if self.account.current_balance.is_zero() {
            return Decimal::ZERO;
        }
        self.balance
            .checked_div(self.account.current_balance)
            .unwrap_or(Decimal::MAX)
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Simulate month-by-month paydown of `debts` until every balance is zero.
///
/// Each month interest accrues on every active debt, every debt pays its own
/// minimum (capped at what it owes), and the pool of `monthly_extra` plus the
/// minimums of debts paid off in earlier months goes to the focus debt chosen
/// by `policy`. Whatever the focus debt cannot absorb flows to the next debt
/// in policy order.
pub fn simulate(
    debts: &[DebtAccount],
    monthly_extra: Money,
    policy: OrderingPolicy,
    start_date: NaiveDate,
    config: &PayoffConfig,
) -> DebtPayoffResult<PayoffResult> {
    validate_debts(debts)?;
    validate_monthly_extra(monthly_extra)?;

    debug!(
        %policy,
        debts = debts.len(),
        %monthly_extra,
        "starting payoff simulation"
    );

    let mut ledgers: Vec<Ledger<'_>> = debts
        .iter()
        .map(|account| Ledger {
            account,
            balance: account.current_balance,
            interest_paid: Decimal::ZERO,
        })
        .collect();

    let mut debt_payoff_order: Vec<DebtPayoff> = Vec::with_capacity(debts.len());

    // Debts already at zero are recorded up front and never simulated.
    let mut settled: Vec<usize> = (0..ledgers.len())
        .filter(|&i| ledgers[i].balance.is_zero())
        .collect();
    settled.sort_by(|&a, &b| policy.rank(&ledgers[a].key(), &ledgers[b].key()));
    for idx in settled {
        debt_payoff_order.push(payoff_record(&ledgers[idx], 0, start_date));
    }

    let pools = policy.pools_payments();
    let extra = if pools { monthly_extra } else { Decimal::ZERO };
    let committed_minimums: Money = ledgers
        .iter()
        .filter(|l| l.balance > Decimal::ZERO)
        .map(|l| l.account.minimum_payment)
        .sum();

    let mut redirected_minimums = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut schedule: Vec<PayoffMonth> = Vec::new();
    let mut month: u32 = 0;

    loop {
        let mut active: Vec<usize> = (0..ledgers.len())
            .filter(|&i| ledgers[i].balance > Decimal::ZERO)
            .collect();
        if active.is_empty() {
            break;
        }
        active.sort_by(|&a, &b| policy.rank(&ledgers[a].key(), &ledgers[b].key()));

        if month >= config.max_months {
            // Blame the debt that has made the least progress, first in rank
            // order on ties.
            let stuck = active
                .iter()
                .map(|&i| &ledgers[i])
                .min_by(|a, b| b.remaining_share().cmp(&a.remaining_share()))
                .unwrap_or(&ledgers[active[0]]);
            warn!(
                debt_id = %stuck.account.id,
                max_months = config.max_months,
                "payoff simulation hit the month limit"
            );
            return Err(DebtPayoffError::MonthLimitExceeded {
                debt_id: stuck.account.id.clone(),
                debt_name: stuck.account.debt_name.clone(),
                max_months: config.max_months,
                remaining_balance: stuck.balance,
            });
        }
        month += 1;

        // --- Interest accrual and own minimum payments ---
        let mut rows: Vec<SimulationMonth> = Vec::with_capacity(active.len());
        for (rank, &idx) in active.iter().enumerate() {
            let ledger = &ledgers[idx];
            let account = ledger.account;
            let interest = monthly_interest(ledger.balance, account.interest_rate)?;

            // The most this debt could ever receive in a month: its own
            // minimum plus the extra budget and every other freed minimum.
            let max_payment = if pools {
                extra + committed_minimums
            } else {
                account.minimum_payment
            };
            if max_payment <= interest {
                warn!(
                    debt_id = %account.id,
                    month,
                    %interest,
                    %max_payment,
                    "debt can never be amortized"
                );
                return Err(DebtPayoffError::PaymentInsufficient {
                    debt_id: account.id.clone(),
                    debt_name: account.debt_name.clone(),
                    month,
                    monthly_interest: interest,
                    max_payment,
                });
            }

            let owed = ledger.balance + interest;
            rows.push(SimulationMonth {
                debt_id: account.id.clone(),
                balance_before: ledger.balance,
                interest_accrued: interest,
                payment: account.minimum_payment.min(owed),
                interest_paid: Decimal::ZERO,
                principal_paid: Decimal::ZERO,
                balance_after: Decimal::ZERO,
                is_focus: pools && rank == 0,
            });
        }

        // --- Pooled payment: focus debt first, remainder cascades ---
        let mut pool = extra + redirected_minimums;
        for row in rows.iter_mut() {
            if pool.is_zero() {
                break;
            }
            let outstanding = row.balance_before + row.interest_accrued - row.payment;
            let applied = pool.min(outstanding);
            row.payment += applied;
            pool -= applied;
        }

        // --- Settle the month ---
        let date = add_months(start_date, month)?;
        let mut month_payment = Decimal::ZERO;
        let mut month_interest = Decimal::ZERO;
        let mut freed_minimums = Decimal::ZERO;

        for (row, &idx) in rows.iter_mut().zip(active.iter()) {
            row.interest_paid = row.payment.min(row.interest_accrued);
            row.principal_paid = row.payment - row.interest_paid;
            row.balance_after = row.balance_before + row.interest_accrued - row.payment;

            let ledger = &mut ledgers[idx];
            ledger.balance = row.balance_after;
            ledger.interest_paid += row.interest_accrued;

            month_payment += row.payment;
            month_interest += row.interest_accrued;

            if ledger.balance.is_zero() {
                freed_minimums += ledger.account.minimum_payment;
                debt_payoff_order.push(payoff_record(ledger, month, date));
            }
        }

        // Freed minimums join the pool from next month on. Paying minimums
        // only, they simply stop being paid.
        if pools {
            redirected_minimums += freed_minimums;
        }
        total_interest += month_interest;
        total_paid += month_payment;

        schedule.push(PayoffMonth {
            month,
            date,
            total_payment: month_payment,
            total_interest: month_interest,
            debts: rows,
        });
    }

    let payoff_date = add_months(start_date, month)?;

    debug!(
        %policy,
        total_months = month,
        %total_interest,
        "payoff simulation converged"
    );

    Ok(PayoffResult {
        strategy: policy,
        monthly_extra,
        start_date,
        total_months: month,
        total_interest,
        total_paid,
        payoff_date,
        debt_payoff_order,
        schedule,
    })
}

fn payoff_record(ledger: &Ledger<'_>, month: u32, date: NaiveDate) -> DebtPayoff {
    DebtPayoff {
        debt_id: ledger.account.id.clone(),
        name: ledger.account.debt_name.clone(),
        original_balance: ledger.account.current_balance,
        payoff_month: month,
        payoff_date: date,
        interest_paid: ledger.interest_paid,
    }
}

/// Run one projection and wrap it in the standard output envelope.
pub fn calculate_payoff(
    input: &PayoffInput,
    policy: OrderingPolicy,
) -> DebtPayoffResult<ComputationOutput<PayoffResult>> {
    let start = Instant::now();
    let config = input.config.clone().unwrap_or_default();
    let mut warnings: Vec<String> = Vec::new();

    for debt in input.debts.iter().filter(|d| d.is_paid_off()) {
        warnings.push(format!(
            "{} ({}) is already paid off and was excluded",
            debt.debt_name, debt.id
        ));
    }
    if !policy.pools_payments() && input.monthly_extra > Decimal::ZERO {
        warnings.push("monthly_extra is ignored when paying minimums only".into());
    }

    let result = simulate(
        &input.debts,
        input.monthly_extra,
        policy,
        input.start_date,
        &config,
    )?;

    let methodology = match policy {
        OrderingPolicy::Snowball => "Debt Snowball (smallest balance first, monthly amortization)",
        OrderingPolicy::Avalanche => {
            "Debt Avalanche (highest interest rate first, monthly amortization)"
        }
        OrderingPolicy::MinimumOnly => "Minimum payments only (monthly amortization)",
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &serde_json::json!({
            "strategy": policy,
            "debts": input.debts.len(),
            "monthly_extra": input.monthly_extra.to_string(),
            "start_date": input.start_date,
            "interest_accrual": "monthly, APR / 12, rounded to cents",
            "max_months": config.max_months,
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn run(debts: &[DebtAccount], extra: Money, policy: OrderingPolicy) -> PayoffResult {
        simulate(debts, extra, policy, start(), &PayoffConfig::default()).unwrap()
    }

    fn debt(id: &str, balance: Money, rate: Money, min: Money) -> DebtAccount {
        DebtAccount::new(id, format!("Debt {id}"), balance, rate, min)
    }

    // ---------------------------------------------------------------
    // 1. Empty input is a trivial, zero-month result
    // ---------------------------------------------------------------
    #[test]
    fn test_empty_debts_trivial_result() {
        let result = run(&[], dec!(100), OrderingPolicy::Avalanche);
        assert_eq!(result.total_months, 0);
        assert_eq!(result.total_interest, Decimal::ZERO);
        assert_eq!(result.payoff_date, start());
        assert!(result.debt_payoff_order.is_empty());
        assert!(result.schedule.is_empty());
    }

    // ---------------------------------------------------------------
    // 2. First month of a single card: interest first, then principal
    // ---------------------------------------------------------------
    #[test]
    fn test_first_month_split() {
        let debts = vec![debt("a", dec!(5000), dec!(20), dec!(150))];
        let result = run(&debts, Decimal::ZERO, OrderingPolicy::Avalanche);
        let first = &result.schedule[0].debts[0];

        assert_eq!(first.balance_before, dec!(5000));
        assert_eq!(first.interest_accrued, dec!(83.33));
        assert_eq!(first.payment, dec!(150));
        assert_eq!(first.interest_paid, dec!(83.33));
        assert_eq!(first.principal_paid, dec!(66.67));
        assert_eq!(first.balance_after, dec!(4933.33));
        assert!(first.is_focus);
    }

    // ---------------------------------------------------------------
    // 3. Last payment never exceeds what is owed
    // ---------------------------------------------------------------
    #[test]
    fn test_final_payment_capped_at_amount_owed() {
        let debts = vec![debt("a", dec!(5000), dec!(20), dec!(150))];
        let result = run(&debts, Decimal::ZERO, OrderingPolicy::Avalanche);
        let last_month = result.schedule.last().unwrap();
        let last = &last_month.debts[0];

        assert_eq!(last_month.month, 50);
        assert!(last.payment < dec!(150));
        assert_eq!(last.payment, last.balance_before + last.interest_accrued);
        assert_eq!(last.balance_after, Decimal::ZERO);
    }

    // ---------------------------------------------------------------
    // 4. Already-paid debts: month zero, no interest, no schedule rows
    // ---------------------------------------------------------------
    #[test]
    fn test_zero_balance_debt_is_noop() {
        let debts = vec![
            debt("paid", Decimal::ZERO, dec!(29.99), Decimal::ZERO),
            debt("live", dec!(600), Decimal::ZERO, dec!(100)),
        ];
        let result = run(&debts, Decimal::ZERO, OrderingPolicy::Snowball);

        assert_eq!(result.total_months, 6);
        assert_eq!(result.total_interest, Decimal::ZERO);
        assert_eq!(result.debt_payoff_order[0].debt_id, "paid");
        assert_eq!(result.debt_payoff_order[0].payoff_month, 0);
        assert_eq!(result.debt_payoff_order[0].payoff_date, start());
        assert!(result
            .schedule
            .iter()
            .all(|m| m.debts.iter().all(|d| d.debt_id != "paid")));
    }

    // ---------------------------------------------------------------
    // 5. Freed minimums roll onto the next focus debt
    // ---------------------------------------------------------------
    #[test]
    fn test_freed_minimum_snowballs_next_month() {
        // Zero rates keep the arithmetic exact.
        let debts = vec![
            debt("a", dec!(100), Decimal::ZERO, dec!(50)),
            debt("b", dec!(1000), Decimal::ZERO, dec!(50)),
        ];
        let result = run(&debts, Decimal::ZERO, OrderingPolicy::Snowball);

        // a: 50 + 50 -> paid month 2. From month 3 b receives 100/month.
        assert_eq!(result.debt_payoff_order[0].debt_id, "a");
        assert_eq!(result.debt_payoff_order[0].payoff_month, 2);
        let b_month_2 = &result.schedule[1].debts[1];
        let b_month_3 = &result.schedule[2].debts[0];
        assert_eq!(b_month_2.payment, dec!(50));
        assert_eq!(b_month_3.payment, dec!(100));
        assert!(b_month_3.is_focus);
        // b: 900 left after month 2, 100/month -> month 11
        assert_eq!(result.total_months, 11);
    }

    // ---------------------------------------------------------------
    // 6. Pool surplus cascades to the next debt in the same month
    // ---------------------------------------------------------------
    #[test]
    fn test_pool_surplus_cascades() {
        let debts = vec![
            debt("a", dec!(30), Decimal::ZERO, dec!(10)),
            debt("b", dec!(500), Decimal::ZERO, dec!(20)),
        ];
        let result = run(&debts, dec!(100), OrderingPolicy::Snowball);
        let month_1 = &result.schedule[0];

        // a owes 30: 10 minimum + 20 of the pool. The other 80 goes to b.
        assert_eq!(month_1.debts[0].payment, dec!(30));
        assert_eq!(month_1.debts[1].payment, dec!(100));
        assert_eq!(month_1.total_payment, dec!(130));
    }

    // ---------------------------------------------------------------
    // 7. Minimum-only never redirects anything
    // ---------------------------------------------------------------
    #[test]
    fn test_minimum_only_ignores_extra_and_freed_minimums() {
        let debts = vec![
            debt("a", dec!(100), Decimal::ZERO, dec!(50)),
            debt("b", dec!(1000), Decimal::ZERO, dec!(50)),
        ];
        let result = run(&debts, dec!(500), OrderingPolicy::MinimumOnly);

        assert_eq!(result.total_months, 20);
        assert!(result
            .schedule
            .iter()
            .flat_map(|m| m.debts.iter())
            .all(|d| d.payment <= dec!(50) && !d.is_focus));
    }

    // ---------------------------------------------------------------
    // 8. Minimum at or below interest fails fast
    // ---------------------------------------------------------------
    #[test]
    fn test_payment_equal_to_interest_is_non_convergent() {
        // 2000 at 24% accrues exactly 40/month.
        let debts = vec![debt("a", dec!(2000), dec!(24), dec!(40))];
        let err = simulate(
            &debts,
            Decimal::ZERO,
            OrderingPolicy::Avalanche,
            start(),
            &PayoffConfig::default(),
        )
        .unwrap_err();

        match err {
            DebtPayoffError::PaymentInsufficient {
                debt_id,
                month,
                monthly_interest,
                ..
            } => {
                assert_eq!(debt_id, "a");
                assert_eq!(month, 1);
                assert_eq!(monthly_interest, dec!(40.00));
            }
            other => panic!("expected PaymentInsufficient, got {other:?}"),
        }
    }

    // ---------------------------------------------------------------
    // 9. A starving debt converges once the pool reaches it
    // ---------------------------------------------------------------
    #[test]
    fn test_underwater_debt_rescued_by_pool() {
        // b's minimum (10) does not cover its 20/month interest, but the
        // extra budget reaches it after a is gone.
        let debts = vec![
            debt("a", dec!(200), Decimal::ZERO, dec!(100)),
            debt("b", dec!(1000), dec!(24), dec!(10)),
        ];
        let result = run(&debts, dec!(50), OrderingPolicy::Snowball);
        assert!(result.total_months > 2);
        assert_eq!(result.debt_payoff_order.len(), 2);
        assert_eq!(result.debt_payoff_order[1].debt_id, "b");
    }

    // ---------------------------------------------------------------
    // 10. Month cap is enforced
    // ---------------------------------------------------------------
    #[test]
    fn test_month_limit_exceeded() {
        let debts = vec![debt("slow", dec!(10_000), Decimal::ZERO, dec!(10))];
        let config = PayoffConfig {
            max_months: 120,
            ..PayoffConfig::default()
        };
        let err = simulate(
            &debts,
            Decimal::ZERO,
            OrderingPolicy::Snowball,
            start(),
            &config,
        )
        .unwrap_err();

        assert!(err.is_non_convergent());
        match err {
            DebtPayoffError::MonthLimitExceeded {
                max_months,
                remaining_balance,
                ..
            } => {
                assert_eq!(max_months, 120);
                assert_eq!(remaining_balance, dec!(8800));
            }
            other => panic!("expected MonthLimitExceeded, got {other:?}"),
        }
    }

    // ---------------------------------------------------------------
    // 11. Oversized amounts are rejected instead of overflowing
    // ---------------------------------------------------------------
    #[test]
    fn test_huge_balance_is_an_error_not_a_panic() {
        let huge = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let debts = vec![debt("a", huge, dec!(100), huge)];
        let err = simulate(
            &debts,
            Decimal::ZERO,
            OrderingPolicy::Avalanche,
            start(),
            &PayoffConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DebtPayoffError::InvalidInput { .. }));
    }

    // ---------------------------------------------------------------
    // 12. Snowball keeps the order set by starting balances
    // ---------------------------------------------------------------
    #[test]
    fn test_snowball_order_fixed_by_starting_balance() {
        // After month 1, b owes 600 and a owes 985, but a stays the focus.
        let debts = vec![
            debt("a", dec!(1000), Decimal::ZERO, dec!(10)),
            debt("b", dec!(1200), Decimal::ZERO, dec!(600)),
        ];
        let result = run(&debts, dec!(5), OrderingPolicy::Snowball);
        let month_2 = &result.schedule[1];

        assert_eq!(month_2.debts[0].debt_id, "a");
        assert!(month_2.debts[0].is_focus);
        assert_eq!(month_2.debts[0].payment, dec!(15));
        assert_eq!(month_2.debts[1].balance_before, dec!(600));
        assert!(!month_2.debts[1].is_focus);
    }

    // ---------------------------------------------------------------
    // 13. Month limit blames the debt with the least progress
    // ---------------------------------------------------------------
    #[test]
    fn test_month_limit_names_slowest_debt() {
        // a is the Snowball focus but is almost gone; b has barely moved.
        let debts = vec![
            debt("a", dec!(1000), Decimal::ZERO, dec!(8)),
            debt("b", dec!(10_000), Decimal::ZERO, dec!(1)),
        ];
        let config = PayoffConfig {
            max_months: 120,
            ..PayoffConfig::default()
        };
        let err = simulate(
            &debts,
            Decimal::ZERO,
            OrderingPolicy::Snowball,
            start(),
            &config,
        )
        .unwrap_err();

        match err {
            DebtPayoffError::MonthLimitExceeded {
                debt_id,
                remaining_balance,
                ..
            } => {
                assert_eq!(debt_id, "b");
                assert_eq!(remaining_balance, dec!(9880));
            }
            other => panic!("expected MonthLimitExceeded, got {other:?}"),
        }
    }

    // ---------------------------------------------------------------
    // 14. Caller's accounts are not mutated
    // ---------------------------------------------------------------
    #[test]
    fn test_input_untouched() {
        let debts = vec![debt("a", dec!(750), dec!(12), dec!(60))];
        let before = debts.clone();
        let _ = run(&debts, dec!(25), OrderingPolicy::Avalanche);
        assert_eq!(debts, before);
    }

    // ---------------------------------------------------------------
    // 15. Envelope warnings
    // ---------------------------------------------------------------
    #[test]
    fn test_calculate_payoff_envelope() {
        let input = PayoffInput {
            debts: vec![
                debt("a", dec!(750), dec!(12), dec!(60)),
                debt("z", Decimal::ZERO, dec!(12), Decimal::ZERO),
            ],
            monthly_extra: dec!(40),
            start_date: start(),
            config: None,
        };
        let out = calculate_payoff(&input, OrderingPolicy::MinimumOnly).unwrap();

        assert!(out.methodology.contains("Minimum payments only"));
        assert_eq!(out.warnings.len(), 2);
        assert_eq!(out.result.strategy, OrderingPolicy::MinimumOnly);
    }
}
