use std::env;

use chrono::FixedOffset;

use crate::scoring::ScoreOptions;
use crate::scoring::timestamp::parse_utc_offset;
use crate::{ClientError, ClientResult};

pub const TARGET_INFLOW_ENV: &str = "NOTENETRA_TARGET_AVG_MONTHLY_INFLOW";
pub const UTC_OFFSET_ENV: &str = "NOTENETRA_UTC_OFFSET";
pub const LOG_FILTER_ENV: &str = "NOTENETRA_LOG";
const FALLBACK_LOG_FILTER_ENV: &str = "RUST_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Environment-driven defaults for scoring and logging.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub score_options: ScoreOptions,
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            score_options: ScoreOptions::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn load() -> ClientResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any name-to-value lookup. Unset and blank
    /// values fall back to defaults; anything else must be valid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut score_options = ScoreOptions::default();

        if let Some(raw) = read(TARGET_INFLOW_ENV) {
            let target = parse_target(TARGET_INFLOW_ENV, &raw)?;
            score_options = score_options
                .with_target_avg_monthly_inflow(target)
                .map_err(|_| invalid_target(TARGET_INFLOW_ENV, &raw))?;
        }

        if let Some(raw) = read(UTC_OFFSET_ENV) {
            score_options = score_options.with_timezone(parse_offset(UTC_OFFSET_ENV, &raw)?);
        }

        let log_filter = read(LOG_FILTER_ENV)
            .or_else(|| read(FALLBACK_LOG_FILTER_ENV))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            score_options,
            log_filter,
        })
    }
}

/// Parses a target inflow value from a named setting.
pub fn parse_target(setting: &str, raw: &str) -> ClientResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .ok_or_else(|| invalid_target(setting, raw))
}

/// Parses a UTC offset from a named setting.
pub fn parse_offset(setting: &str, raw: &str) -> ClientResult<FixedOffset> {
    parse_utc_offset(raw).ok_or_else(|| {
        ClientError::invalid_config(setting, raw, "`Z`, `UTC`, `+HH:MM`, `-HH:MM` or `+HHMM`")
    })
}

fn invalid_target(setting: &str, raw: &str) -> ClientError {
    ClientError::invalid_config(setting, raw, "a positive number")
}
