use notenetra_score::commands;
use notenetra_score::commands::score::ScoreRunOptions;
use notenetra_score::{ClientResult, EngineConfig, SuccessEnvelope};

use crate::cli::{Cli, Commands};

pub fn dispatch(cli: &Cli, config: &EngineConfig) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Score {
            path,
            target,
            utc_offset,
            json: _,
        } => commands::score::run_with_options(ScoreRunOptions {
            path: path.clone(),
            stdin_override: None,
            target_avg_monthly_inflow: *target,
            utc_offset: utc_offset.clone(),
            config: Some(config.clone()),
        }),
        Commands::Simulate {
            transactions,
            income,
            age,
            ..
        } => commands::simulate::run(*transactions, *income, *age),
        Commands::Demo { .. } => commands::demo::run(),
    }
}
