mod cli;
mod dispatch;
mod output;
mod stdout_io;
mod telemetry;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use notenetra_score::config::LOG_FILTER_ENV;
use notenetra_score::{ClientError, EngineConfig};
use output::OutputMode;
use stdout_io::write_stdout_text;
use telemetry::TelemetryError;
use tracing::debug;

const ROOT_HELP: &str = "Notenetra - cash-flow credit scoring for small merchants

Usage:
  notenetra <command>

Start here:
  notenetra demo
  notenetra score --help
  notenetra simulate --help
";

const TOP_LEVEL_HELP: &str = "Notenetra - cash-flow credit scoring for small merchants

USAGE: notenetra <command>

Try it:
  notenetra demo                                  Score the bundled sample feed

Score a recorded transaction feed:
  1. notenetra score --help                       Read feed formats and record fields
  2. notenetra score <path>                       Score a JSON or CSV feed
  3. notenetra score <path> --json                Same, as a machine-readable envelope

Estimate from self-reported figures:
  notenetra simulate --transactions <n> --income <amount> --age <years>

Settings (flags override these):
  NOTENETRA_TARGET_AVG_MONTHLY_INFLOW             Monthly inflow for a full inflow score
  NOTENETRA_UTC_OFFSET                            Offset used for day and month boundaries
  NOTENETRA_LOG                                   Log filter for stderr (default warn)

Having issues with a feed?
  Run `notenetra score --help` and read the Feed Troubleshooting section.
";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => return handle_parse_error(&err, &raw_args),
    };
    let mode = output::mode_for_command(&cli.command);

    let config = match EngineConfig::load() {
        Ok(config) => config,
        Err(error) => return fail(&error, mode),
    };
    match telemetry::init(&config.log_filter) {
        Ok(()) => {}
        Err(TelemetryError::EnvFilter { value, .. }) => {
            let error = ClientError::invalid_config(
                LOG_FILTER_ENV,
                &value,
                "a tracing filter such as `warn` or `notenetra_score=debug`",
            );
            return fail(&error, mode);
        }
        // A subscriber that is already installed keeps receiving events.
        Err(TelemetryError::Subscriber(_)) => {}
    }

    debug!(command = cli.command.name(), "dispatching command");
    match dispatch::dispatch(&cli, &config) {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => fail(&error, mode),
    }
}

fn handle_parse_error(err: &clap::Error, raw_args: &[String]) -> Result<ExitCode, ExitCode> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let text = if is_top_level_help_request(raw_args) {
                TOP_LEVEL_HELP.to_string()
            } else {
                err.to_string()
            };
            if write_stdout_text(&text).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        ErrorKind::DisplayVersion => {
            if write_stdout_text(&err.to_string()).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        kind => {
            let command_hint = if matches!(
                kind,
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::ArgumentConflict
            ) {
                command_from_args(raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                ClientError::invalid_argument_for_command(&clean_message, command_hint);
            fail(&parse_error, output::infer_requested_output_mode(raw_args))
        }
    }
}

fn fail(error: &ClientError, mode: OutputMode) -> Result<ExitCode, ExitCode> {
    if output::print_failure(error, mode).is_err() {
        return Err(ExitCode::from(2));
    }
    Err(exit_code_for_error(error))
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Strips clap's trailing Usage line and "For more information" hint so the
/// recovery steps are the only guidance printed.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// The first non-flag argument, when it names a known subcommand.
fn command_from_args(raw_args: &[String]) -> Option<&'static str> {
    let first = raw_args
        .iter()
        .skip(1)
        .find(|value| !value.starts_with('-'))?;
    match first.as_str() {
        "score" => Some("score"),
        "simulate" => Some("simulate"),
        "demo" => Some("demo"),
        _ => None,
    }
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if error.code.starts_with("internal_") {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}
