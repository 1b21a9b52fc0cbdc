use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const FEED_HELP_COMMAND: &str = "notenetra score --help";
pub(crate) const FEED_HELP_SECTION_TITLE: &str = "Feed Troubleshooting";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_feed_help(self) -> Self {
        self.with_feed_help_data(json!({}))
    }

    pub fn with_feed_help_data(self, data: Value) -> Self {
        self.with_data(merge_feed_help_data(data))
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `notenetra {cmd} --help` for usage."),
            None => "Run `notenetra --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_config(setting: &str, value: &str, expected: &str) -> Self {
        Self::new(
            "invalid_config",
            &format!("`{setting}` has invalid value `{value}`: expected {expected}."),
            vec![
                format!("Set `{setting}` to {expected}, or unset it to use the default."),
                "Command-line flags override environment settings.".to_string(),
            ],
        )
        .with_data(json!({
            "setting": setting,
            "value": value,
        }))
    }

    pub fn invalid_feed(message: &str) -> Self {
        Self::new(
            "invalid_feed",
            message,
            vec![
                "Provide a JSON array, a JSON object of records, or CSV with headers.".to_string(),
                format!("Run `{FEED_HELP_COMMAND}` to review the record fields."),
            ],
        )
        .with_feed_help()
    }

    pub fn invalid_feed_format(message: &str, received_format: &str) -> Self {
        Self::invalid_feed(message).with_feed_help_data(json!({
            "received_format": received_format,
            "supported_formats": ["json_array", "json_object", "csv"],
        }))
    }

    pub fn feed_schema_mismatch(
        required_headers: Vec<String>,
        actual_headers: Vec<String>,
    ) -> Self {
        Self::new(
            "feed_schema_mismatch",
            "CSV headers do not satisfy the feed schema.",
            vec![
                "Include a timestamp column (`time` or `timestamp`) and an `amount` column."
                    .to_string(),
                "Include a direction column (`type` or `direction`) so credits are recognised."
                    .to_string(),
                format!("Run `{FEED_HELP_COMMAND}` to review the record fields."),
            ],
        )
        .with_feed_help_data(json!({
            "required_headers": required_headers,
            "actual_headers": actual_headers,
        }))
    }

    pub fn feed_unreadable(source: &str, detail: &str) -> Self {
        Self::invalid_argument_with_recovery(
            &format!("Could not read feed `{source}`: {detail}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                "Rerun notenetra score <path>.".to_string(),
            ],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

fn merge_feed_help_data(mut data: Value) -> Value {
    if !data.is_object() {
        data = json!({});
    }

    if let Some(object) = data.as_object_mut() {
        object.insert(
            "help_command".to_string(),
            Value::String(FEED_HELP_COMMAND.to_string()),
        );
        object.insert(
            "help_section_title".to_string(),
            Value::String(FEED_HELP_SECTION_TITLE.to_string()),
        );
    }

    data
}

pub type ClientResult<T> = Result<T, ClientError>;
