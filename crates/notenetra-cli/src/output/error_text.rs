use notenetra_score::ClientError;
use serde_json::Value;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "Something went wrong, but it's easy to fix.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
        String::new(),
        "What to do next:".to_string(),
    ];

    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    if let Some(section) = help_section(error) {
        lines.push(String::new());
        lines.push(format!("See the \"{section}\" section of `notenetra score --help`."));
    }

    lines.join("\n")
}

fn help_section(error: &ClientError) -> Option<&str> {
    error
        .data
        .as_ref()
        .and_then(|data| data.get("help_section_title"))
        .and_then(Value::as_str)
}
