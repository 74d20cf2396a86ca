pub mod config;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "payoff")]
pub mod payoff;

pub use config::{PayoffConfig, RecommendationThresholds};
pub use error::DebtPayoffError;
pub use types::*;

/// Standard result type for all debt-payoff operations
pub type DebtPayoffResult<T> = Result<T, DebtPayoffError>;
