use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}': unable to build EnvFilter")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("telemetry error: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub fn build_filter(log_filter: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(log_filter).map_err(|source| TelemetryError::EnvFilter {
        value: log_filter.to_string(),
        source,
    })
}

/// Installs the global subscriber. Logs go to stderr so stdout stays
/// parseable under `--json`.
pub fn init(log_filter: &str) -> Result<(), TelemetryError> {
    let env_filter = build_filter(log_filter)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
