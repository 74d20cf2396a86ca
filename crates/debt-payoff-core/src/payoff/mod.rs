//! Debt payoff planning: Snowball and Avalanche amortization simulation,
//! strategy comparison, and the strategy selection payload.

pub mod account;
pub mod comparison;
pub mod policy;
#[cfg(feature = "selection")]
pub mod selection;
pub mod simulator;

pub use account::DebtAccount;
pub use comparison::{compare, compare_strategies, ComparisonResult, Recommendation};
pub use policy::OrderingPolicy;
pub use simulator::{calculate_payoff, simulate, PayoffInput, PayoffResult};
