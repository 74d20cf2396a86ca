use debt_payoff_core::PayoffConfig;

/// Prefix for environment overrides, e.g. `PAYOFF__MAX_MONTHS=600` or
/// `PAYOFF__RECOMMENDATION__MAX_INTEREST_DIFFERENCE=5`.
const ENV_PREFIX: &str = "PAYOFF";

/// Layer engine settings: built-in defaults, then the optional file, then
/// environment variables.
pub fn load(path: Option<&str>) -> Result<PayoffConfig, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::with_name(path).required(true));
    }
    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let loaded: PayoffConfig = settings.try_deserialize()?;
    tracing::debug!(?loaded, "engine settings loaded");
    Ok(loaded)
}
