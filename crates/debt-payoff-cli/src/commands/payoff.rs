use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use debt_payoff_core::payoff::selection::{self, SelectionInput};
use debt_payoff_core::payoff::{self, OrderingPolicy, PayoffInput};
use debt_payoff_core::{DebtPayoffError, PayoffConfig};

use crate::input;

/// Arguments shared by every projection command
#[derive(Args)]
pub struct PayoffArgs {
    /// Path to JSON input file with `debts` (and optionally `monthly_extra`, `start_date`)
    #[arg(long)]
    pub input: Option<String>,

    /// Extra amount available each month on top of the minimums
    #[arg(long)]
    pub monthly_extra: Option<Decimal>,

    /// Projection start date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

/// Arguments for building a strategy selection payload
#[derive(Args)]
pub struct SelectArgs {
    #[command(flatten)]
    pub payoff: PayoffArgs,

    /// Strategy the user picked
    #[arg(long, value_parser = ["snowball", "avalanche"])]
    pub strategy: Option<String>,
}

pub fn run_snowball(
    args: PayoffArgs,
    settings: &PayoffConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    run_projection(args, settings, OrderingPolicy::Snowball)
}

pub fn run_avalanche(
    args: PayoffArgs,
    settings: &PayoffConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    run_projection(args, settings, OrderingPolicy::Avalanche)
}

pub fn run_minimum_only(
    args: PayoffArgs,
    settings: &PayoffConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    run_projection(args, settings, OrderingPolicy::MinimumOnly)
}

pub fn run_compare(
    args: PayoffArgs,
    settings: &PayoffConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let payoff_input: PayoffInput = serde_json::from_value(read_payoff_value(&args, settings)?)?;
    let result = payoff::compare_strategies(&payoff_input).map_err(explain)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_select(
    args: SelectArgs,
    settings: &PayoffConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut data = read_payoff_value(&args.payoff, settings)?;
    if let Some(strategy) = args.strategy {
        data["strategy"] = Value::String(strategy);
    }
    if data.get("strategy").is_none() {
        return Err(
            "--strategy <snowball|avalanche> is required (or set \"strategy\" in the input)".into(),
        );
    }
    let selection_input: SelectionInput = serde_json::from_value(data)?;
    let result = selection::select_strategy(&selection_input).map_err(explain)?;
    Ok(serde_json::to_value(result)?)
}

fn run_projection(
    args: PayoffArgs,
    settings: &PayoffConfig,
    policy: OrderingPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let payoff_input: PayoffInput = serde_json::from_value(read_payoff_value(&args, settings)?)?;
    let result = payoff::calculate_payoff(&payoff_input, policy).map_err(explain)?;
    Ok(serde_json::to_value(result)?)
}

/// Read the raw input and apply flag overrides. Settings fill `config` only
/// when the input does not carry its own.
fn read_payoff_value(
    args: &PayoffArgs,
    settings: &PayoffConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut data: Value = if let Some(ref path) = args.input {
        input::file::read_json_value(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err(
            "--input <file.json> or stdin required (a JSON object with a \"debts\" array)".into(),
        );
    };

    let obj = data
        .as_object_mut()
        .ok_or("input must be a JSON object with a \"debts\" array")?;

    if let Some(extra) = args.monthly_extra {
        obj.insert("monthly_extra".into(), Value::String(extra.to_string()));
    }
    obj.entry("monthly_extra")
        .or_insert_with(|| Value::String("0".into()));

    if let Some(date) = args.start_date {
        obj.insert("start_date".into(), Value::String(date.to_string()));
    }
    obj.entry("start_date")
        .or_insert_with(|| Value::String(Local::now().date_naive().to_string()));

    if !obj.contains_key("config") {
        obj.insert("config".into(), serde_json::to_value(settings)?);
    }

    Ok(data)
}

/// Swap non-convergence errors for the message shown to debt holders.
fn explain(e: DebtPayoffError) -> Box<dyn std::error::Error> {
    if e.is_non_convergent() {
        tracing::warn!(error = %e, "projection did not converge");
        e.user_message().into()
    } else {
        Box::new(e)
    }
}
