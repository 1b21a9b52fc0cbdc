use tracing::info;

use crate::ClientResult;
use crate::config::{self, EngineConfig};
use crate::contracts::envelope::{CommandName, SuccessEnvelope, success};
use crate::contracts::types::{DiagnosticsData, ScoreData, SourceData};
use crate::feed::{ResolvedSource, parse_feed, resolve_source};
use crate::scoring::timestamp::format_offset;
use crate::scoring::{ScoreOptions, compute_score_with_diagnostics};

#[derive(Debug, Default)]
pub struct ScoreRunOptions {
    pub path: Option<String>,
    pub stdin_override: Option<String>,
    pub target_avg_monthly_inflow: Option<f64>,
    pub utc_offset: Option<String>,
    /// Replaces the environment-derived config when set.
    pub config: Option<EngineConfig>,
}

pub fn run(path: Option<String>) -> ClientResult<SuccessEnvelope> {
    run_with_options(ScoreRunOptions {
        path,
        ..ScoreRunOptions::default()
    })
}

pub fn run_with_options(options: ScoreRunOptions) -> ClientResult<SuccessEnvelope> {
    let config = match options.config {
        Some(config) => config,
        None => EngineConfig::load()?,
    };
    let score_options = apply_overrides(
        config.score_options,
        options.target_avg_monthly_inflow,
        options.utc_offset.as_deref(),
    )?;

    let source = resolve_source(options.path, options.stdin_override)?;
    let data = score_source(source, &score_options)?;
    success(CommandName::Score, data)
}

/// Flag values win over the environment.
fn apply_overrides(
    mut score_options: ScoreOptions,
    target: Option<f64>,
    utc_offset: Option<&str>,
) -> ClientResult<ScoreOptions> {
    if let Some(target) = target {
        score_options = score_options.with_target_avg_monthly_inflow(target)?;
    }
    if let Some(raw) = utc_offset {
        score_options = score_options.with_timezone(config::parse_offset("--utc-offset", raw)?);
    }
    Ok(score_options)
}

pub(crate) fn score_source(
    source: ResolvedSource,
    score_options: &ScoreOptions,
) -> ClientResult<ScoreData> {
    let snapshot = parse_feed(&source.content)?;
    let (result, diagnostics) =
        compute_score_with_diagnostics(&snapshot.transactions, score_options);

    info!(
        source = source.source_kind.as_str(),
        score_0_to_100 = result.score_0_to_100,
        score_300_to_900 = result.score_300_to_900,
        band = result.band.label(),
        scored = diagnostics.scored_records,
        skipped = diagnostics.skipped_records,
        dropped = snapshot.dropped,
        "scored transaction feed"
    );

    Ok(ScoreData {
        result,
        diagnostics: DiagnosticsData {
            scored_records: diagnostics.scored_records,
            skipped_records: diagnostics.skipped_records,
            dropped_records: snapshot.dropped,
        },
        source: SourceData {
            kind: source.source_kind.as_str().to_string(),
            path: source.source_ref,
            format: snapshot.format,
            timezone: format_offset(&score_options.timezone()),
            target_avg_monthly_inflow: score_options.target_avg_monthly_inflow(),
        },
    })
}
