use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DebtPayoffError;
use crate::types::{Money, Percent};
use crate::DebtPayoffResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A debt as stored for the user. Field names match the persisted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtAccount {
    /// Opaque identifier. Integer ids from the store are kept as strings.
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub debt_name: String,
    pub current_balance: Money,
    /// APR as a percentage (18.99 = 18.99%).
    pub interest_rate: Percent,
    /// Missing minimums deserialize to zero and are rejected by validation.
    #[serde(default)]
    pub minimum_payment: Money,
}

impl DebtAccount {
    pub fn new(
        id: impl Into<String>,
        debt_name: impl Into<String>,
        current_balance: Money,
        interest_rate: Percent,
        minimum_payment: Money,
    ) -> Self {
        Self {
            id: id.into(),
            debt_name: debt_name.into(),
            current_balance,
            interest_rate,
            minimum_payment,
        }
    }

    pub fn is_paid_off(&self) -> bool {
        self.current_balance.is_zero()
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Largest balance, minimum or extra accepted. Keeps running totals well
/// inside `Decimal`'s range.
pub const MAX_AMOUNT: Money = dec!(1000000000000);

/// Reject inputs the simulator cannot give a meaningful answer for.
pub fn validate_debts(debts: &[DebtAccount]) -> DebtPayoffResult<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(debts.len());

    for (i, debt) in debts.iter().enumerate() {
        if debt.id.trim().is_empty() {
            return Err(invalid(i, "id", "must not be empty"));
        }
        if !seen.insert(debt.id.as_str()) {
            return Err(DebtPayoffError::InvalidInput {
                field: format!("debts[{i}].id"),
                reason: format!("duplicate debt id '{}'", debt.id),
            });
        }
        if debt.current_balance < Decimal::ZERO {
            return Err(invalid(i, "current_balance", "must be >= 0"));
        }
        if debt.current_balance > MAX_AMOUNT {
            return Err(invalid(i, "current_balance", "exceeds the supported maximum"));
        }
        if debt.interest_rate < Decimal::ZERO {
            return Err(invalid(i, "interest_rate", "must be >= 0"));
        }
        if debt.minimum_payment < Decimal::ZERO {
            return Err(invalid(i, "minimum_payment", "must be >= 0"));
        }
        if debt.minimum_payment > MAX_AMOUNT {
            return Err(invalid(i, "minimum_payment", "exceeds the supported maximum"));
        }
        if debt.current_balance > Decimal::ZERO && debt.minimum_payment.is_zero() {
            return Err(invalid(
                i,
                "minimum_payment",
                "must be > 0 for a debt with an outstanding balance",
            ));
        }
    }

    Ok(())
}

pub fn validate_monthly_extra(monthly_extra: Money) -> DebtPayoffResult<()> {
    if monthly_extra < Decimal::ZERO {
        return Err(DebtPayoffError::InvalidInput {
            field: "monthly_extra".into(),
            reason: "must be >= 0".into(),
        });
    }
    if monthly_extra > MAX_AMOUNT {
        return Err(DebtPayoffError::InvalidInput {
            field: "monthly_extra".into(),
            reason: "exceeds the supported maximum".into(),
        });
    }
    Ok(())
}

fn invalid(index: usize, field: &str, reason: &str) -> DebtPayoffError {
    DebtPayoffError::InvalidInput {
        field: format!("debts[{index}].{field}"),
        reason: reason.into(),
    }
}
