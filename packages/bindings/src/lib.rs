use napi::Result as NapiResult;
use napi_derive::napi;

use debt_payoff_core::payoff::selection::{self, SelectionInput};
use debt_payoff_core::payoff::{self, OrderingPolicy, PayoffInput};
use debt_payoff_core::DebtPayoffError;

/// Convert an engine error into a napi::Error. Non-convergence carries the
/// user-facing message and a distinct status so the web layer can tell it
/// apart from a server fault.
fn to_napi_error(e: DebtPayoffError) -> napi::Error {
    if e.is_non_convergent() {
        napi::Error::new(napi::Status::InvalidArg, e.user_message())
    } else {
        napi::Error::from_reason(e.to_string())
    }
}

fn parse_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn project(input_json: &str, policy: OrderingPolicy) -> NapiResult<String> {
    let input: PayoffInput = serde_json::from_str(input_json).map_err(parse_error)?;
    let output = payoff::calculate_payoff(&input, policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(parse_error)
}

// ---------------------------------------------------------------------------
// POST /debts/calculate/*
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_snowball(input_json: String) -> NapiResult<String> {
    project(&input_json, OrderingPolicy::Snowball)
}

#[napi]
pub fn calculate_avalanche(input_json: String) -> NapiResult<String> {
    project(&input_json, OrderingPolicy::Avalanche)
}

#[napi]
pub fn calculate_minimum_only(input_json: String) -> NapiResult<String> {
    project(&input_json, OrderingPolicy::MinimumOnly)
}

#[napi]
pub fn compare_strategies(input_json: String) -> NapiResult<String> {
    let input: PayoffInput = serde_json::from_str(&input_json).map_err(parse_error)?;
    let output = payoff::compare_strategies(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(parse_error)
}

// ---------------------------------------------------------------------------
// POST /debts/strategy
// ---------------------------------------------------------------------------

#[napi]
pub fn select_strategy(input_json: String) -> NapiResult<String> {
    let input: SelectionInput = serde_json::from_str(&input_json).map_err(parse_error)?;
    let output = selection::select_strategy(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(parse_error)
}
