use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DebtPayoffError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error(
        "Payment insufficient to amortize debt {debt_name} ({debt_id}): month {month} accrues \
         {monthly_interest} interest but at most {max_payment} can ever be applied"
    )]
    PaymentInsufficient {
        debt_id: String,
        debt_name: String,
        month: u32,
        monthly_interest: Decimal,
        max_payment: Decimal,
    },

    #[error(
        "Month limit exceeded: debt {debt_name} ({debt_id}) still owes {remaining_balance} \
         after {max_months} months"
    )]
    MonthLimitExceeded {
        debt_id: String,
        debt_name: String,
        max_months: u32,
        remaining_balance: Decimal,
    },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DebtPayoffError {
    /// True when the simulation stopped because some debt never reaches zero.
    pub fn is_non_convergent(&self) -> bool {
        matches!(
            self,
            DebtPayoffError::PaymentInsufficient { .. } | DebtPayoffError::MonthLimitExceeded { .. }
        )
    }

    /// Message suitable for showing to the debt holder.
    pub fn user_message(&self) -> String {
        match self {
            DebtPayoffError::PaymentInsufficient { debt_name, .. } => format!(
                "Your minimum payment is too low to pay off {debt_name} — \
                 it will never be paid off at this rate"
            ),
            DebtPayoffError::MonthLimitExceeded {
                debt_name,
                max_months,
                ..
            } => format!(
                "Your payments are too low to pay off all of your debts within {max_months} \
                 months; {debt_name} has made the least progress"
            ),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for DebtPayoffError {
    fn from(e: serde_json::Error) -> Self {
        DebtPayoffError::SerializationError(e.to_string())
    }
}
