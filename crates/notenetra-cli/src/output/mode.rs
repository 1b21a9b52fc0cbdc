use crate::cli::Commands;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    if command.wants_json() {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}

/// Output mode for failures that happen before clap has produced a command.
pub fn infer_requested_output_mode(raw_args: &[String]) -> OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return OutputMode::Json;
    }
    OutputMode::Text
}
