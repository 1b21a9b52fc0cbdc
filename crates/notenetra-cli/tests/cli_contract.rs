use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

const DEVICE_CSV: &str = "time,amount,type\n\
10-01-2026 10:00:00,50000,credit\n\
11-01-2026 10:00:00,50000,credit\n\
12-01-2026 10:00:00,50000,credit\n\
10-02-2026 10:00:00,60000,credit\n\
11-02-2026 10:00:00,60000,credit\n\
12-02-2026 10:00:00,60000,credit\n";

const SETTINGS: [&str; 4] = [
    "NOTENETRA_TARGET_AVG_MONTHLY_INFLOW",
    "NOTENETRA_UTC_OFFSET",
    "NOTENETRA_LOG",
    "RUST_LOG",
];

static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

struct CliRun {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

fn unique_test_dir() -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(value) => value.as_nanos(),
        Err(_) => 0,
    };
    let sequence = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!(
        "notenetra-cli-test-{}-{stamp}-{sequence}",
        std::process::id()
    ));
    path
}

fn base_command(args: &[&str], env: &[(&str, &str)]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_notenetra"));
    command.args(args);
    for name in SETTINGS {
        command.env_remove(name);
    }
    for (name, value) in env {
        command.env(name, value);
    }
    command
}

fn run_cli_with(args: &[&str], input: Option<&str>, env: &[(&str, &str)]) -> CliRun {
    let mut command = base_command(args, env);
    if input.is_some() {
        command.stdin(Stdio::piped());
    } else {
        command.stdin(Stdio::null());
    }
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let child_spawn = command.spawn();
    assert!(child_spawn.is_ok());
    if let Ok(mut child) = child_spawn {
        if let Some(body) = input {
            let stdin = child.stdin.take();
            assert!(stdin.is_some());
            if let Some(mut pipe) = stdin {
                let write_result = pipe.write_all(body.as_bytes());
                assert!(write_result.is_ok());
            }
        }

        let output = child.wait_with_output();
        assert!(output.is_ok());
        if let Ok(result) = output {
            return CliRun {
                code: result.status.code(),
                stdout: String::from_utf8_lossy(&result.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            };
        }
    }

    CliRun {
        code: None,
        stdout: String::new(),
        stderr: String::new(),
    }
}

fn run_cli(args: &[&str]) -> CliRun {
    run_cli_with(args, None, &[])
}

fn write_feed_file(name: &str, body: &str) -> std::path::PathBuf {
    let dir = unique_test_dir();
    let create_dir = fs::create_dir_all(&dir);
    assert!(create_dir.is_ok());

    let path = dir.join(name);
    let write = fs::write(&path, body);
    assert!(write.is_ok());
    path
}

fn parse_json(body: &str) -> Value {
    let parsed = serde_json::from_str::<Value>(body);
    assert!(parsed.is_ok(), "not json: {body}");
    if let Ok(value) = parsed {
        return value;
    }
    Value::Null
}

fn assert_pipe_close_does_not_panic(args: &[&str], expect_success: bool) {
    let mut producer = base_command(args, &[]);
    producer.stdin(Stdio::null());
    producer.stdout(Stdio::piped());
    producer.stderr(Stdio::piped());

    let producer_spawn = producer.spawn();
    assert!(producer_spawn.is_ok());
    if let Ok(mut producer_child) = producer_spawn {
        let producer_stdout = producer_child.stdout.take();
        let producer_stderr = producer_child.stderr.take();
        assert!(producer_stdout.is_some());
        assert!(producer_stderr.is_some());

        if let Some(stdout_pipe) = producer_stdout {
            let mut reader = BufReader::new(stdout_pipe);
            let mut first_line = String::new();
            let read_result = reader.read_line(&mut first_line);
            assert!(read_result.is_ok());
            assert!(!first_line.is_empty());
            drop(reader);
        }

        let status = producer_child.wait();
        assert!(status.is_ok());
        if let Ok(exit_status) = status {
            assert_eq!(exit_status.success(), expect_success);
        }

        if let Some(mut stderr_pipe) = producer_stderr {
            let mut stderr_bytes = Vec::new();
            let stderr_read = stderr_pipe.read_to_end(&mut stderr_bytes);
            assert!(stderr_read.is_ok());
            let stderr_text = String::from_utf8_lossy(&stderr_bytes);
            assert!(!stderr_text.contains("Broken pipe"));
            assert!(!stderr_text.contains("panicked"));
        }
    }
}

fn assert_text_error_contract(body: &str, code: &str) {
    assert!(body.contains("Something went wrong, but it's easy to fix."));
    assert!(body.contains(&format!("  Error:    {code}")));
    assert!(body.contains("  Details:"));
    assert!(body.contains("What to do next:"));
}

fn assert_json_error_contract(body: &str, code: &str) -> Value {
    let payload = parse_json(body);
    assert_eq!(payload["ok"], false);
    assert_eq!(payload["error"]["code"], Value::String(code.to_string()));
    assert!(payload["error"]["message"].is_string());
    assert!(payload["error"]["recovery_steps"].is_array());
    payload
}

#[test]
fn root_command_uses_short_plaintext_help() {
    let run = run_cli(&[]);
    assert_eq!(run.code, Some(0));
    assert!(run.stdout.starts_with("Notenetra - cash-flow credit scoring"));
    assert!(run.stdout.contains("notenetra demo"));
}

#[test]
fn help_and_version_return_success_output() {
    let help = run_cli(&["--help"]);
    assert_eq!(help.code, Some(0));
    assert!(help.stdout.contains("USAGE: notenetra <command>"));
    assert!(help.stdout.contains("NOTENETRA_TARGET_AVG_MONTHLY_INFLOW"));

    let version = run_cli(&["--version"]);
    assert_eq!(version.code, Some(0));
    assert!(version.stdout.starts_with("notenetra "));
}

#[test]
fn score_help_documents_feed_formats() {
    let run = run_cli(&["score", "--help"]);
    assert_eq!(run.code, Some(0));
    assert!(run.stdout.contains("Feed formats:"));
    assert!(run.stdout.contains("Feed Troubleshooting:"));
}

#[test]
fn demo_text_and_json_contracts_are_supported() {
    let text = run_cli(&["demo"]);
    assert_eq!(text.code, Some(0));
    assert!(text.stdout.starts_with("Demo: scoring the bundled sample feed"));
    assert!(text.stdout.contains("Metric breakdown:"));

    let json = run_cli(&["demo", "--json"]);
    assert_eq!(json.code, Some(0));
    let payload = parse_json(&json.stdout);
    assert_eq!(payload["ok"], true);
    assert_eq!(payload["command"], "demo");
    assert!(payload["version"].is_string());
    assert_eq!(payload["data"]["source"]["kind"], "bundled");
    let bureau = payload["data"]["result"]["score_300_to_900"].as_u64();
    assert!(matches!(bureau, Some(300..=900)));
}

#[test]
fn simulate_reports_both_formulas() {
    let args = [
        "simulate",
        "--transactions",
        "120",
        "--income",
        "100000",
        "--age",
        "10",
    ];
    let text = run_cli(&args);
    assert_eq!(text.code, Some(0));
    assert!(text.stdout.contains("Credit score  595 / 900 (Poor, <650)"));

    let mut json_args = args.to_vec();
    json_args.push("--json");
    let json = run_cli(&json_args);
    assert_eq!(json.code, Some(0));
    let payload = parse_json(&json.stdout);
    assert_eq!(payload["command"], "simulate");
    assert_eq!(payload["data"]["credit_score"], 595);
    assert_eq!(payload["data"]["quick_score"], 19);
    assert_eq!(payload["data"]["band"], "poor");
}

#[test]
fn simulate_rejects_negative_inputs() {
    let run = run_cli(&[
        "simulate",
        "--transactions",
        "-5",
        "--income",
        "100",
        "--age",
        "1",
        "--json",
    ]);
    assert_eq!(run.code, Some(1));
    let payload = assert_json_error_contract(&run.stdout, "invalid_argument");
    assert_eq!(payload["data"]["command_hint"], "simulate");
}

#[test]
fn score_file_text_and_json_contracts_are_supported() {
    let path = write_feed_file("till.csv", DEVICE_CSV);
    let path_text = path.display().to_string();

    let text = run_cli(&["score", &path_text]);
    assert_eq!(text.code, Some(0));
    assert!(text.stdout.starts_with("Cash-flow credit score"));
    assert!(text.stdout.contains("660 / 900 (Fair, 650-699)"));

    let json = run_cli(&["score", &path_text, "--json"]);
    assert_eq!(json.code, Some(0));
    let payload = parse_json(&json.stdout);
    assert_eq!(payload["command"], "score");
    assert_eq!(payload["data"]["result"]["score_300_to_900"], 660);
    assert_eq!(payload["data"]["source"]["kind"], "file");
    assert_eq!(payload["data"]["source"]["format"], "csv");
    assert_eq!(payload["data"]["diagnostics"]["scored_records"], 6);
}

#[test]
fn score_reads_stdin_for_dash_path() {
    let run = run_cli_with(&["score", "-", "--json"], Some(DEVICE_CSV), &[]);
    assert_eq!(run.code, Some(0));
    let payload = parse_json(&run.stdout);
    assert_eq!(payload["data"]["source"]["kind"], "stdin");
    assert_eq!(payload["data"]["result"]["band"], "fair");
}

#[test]
fn target_flag_overrides_environment() {
    let env = [("NOTENETRA_TARGET_AVG_MONTHLY_INFLOW", "1000")];
    let from_env = run_cli_with(&["score", "-", "--json"], Some(DEVICE_CSV), &env);
    assert_eq!(from_env.code, Some(0));
    let payload = parse_json(&from_env.stdout);
    assert_eq!(payload["data"]["source"]["target_avg_monthly_inflow"], 1000.0);

    let from_flag = run_cli_with(
        &["score", "-", "--target", "200000", "--json"],
        Some(DEVICE_CSV),
        &env,
    );
    assert_eq!(from_flag.code, Some(0));
    let payload = parse_json(&from_flag.stdout);
    assert_eq!(payload["data"]["result"]["score_300_to_900"], 660);
}

#[test]
fn invalid_environment_setting_is_a_config_error() {
    let run = run_cli_with(
        &["demo", "--json"],
        None,
        &[("NOTENETRA_UTC_OFFSET", "IST")],
    );
    assert_eq!(run.code, Some(1));
    let payload = assert_json_error_contract(&run.stdout, "invalid_config");
    assert_eq!(payload["data"]["setting"], "NOTENETRA_UTC_OFFSET");
}

#[test]
fn logs_go_to_stderr_and_keep_stdout_parseable() {
    let run = run_cli_with(
        &["demo", "--json"],
        None,
        &[("NOTENETRA_LOG", "notenetra_score=info")],
    );
    assert_eq!(run.code, Some(0));
    assert!(run.stderr.contains("scored transaction feed"));
    let payload = parse_json(&run.stdout);
    assert_eq!(payload["ok"], true);
}

#[test]
fn feed_errors_use_text_and_json_contracts() {
    let text = run_cli_with(&["score", "-"], Some("{\"a\":1}\n{\"b\":2}\n"), &[]);
    assert_eq!(text.code, Some(1));
    assert_text_error_contract(&text.stdout, "invalid_feed");
    assert!(text.stdout.contains("Feed Troubleshooting"));

    let json = run_cli_with(
        &["score", "-", "--json"],
        Some("when,how much\n2026-01-01,5\n"),
        &[],
    );
    assert_eq!(json.code, Some(1));
    let payload = assert_json_error_contract(&json.stdout, "feed_schema_mismatch");
    assert!(payload["data"]["required_headers"].is_array());
}

#[test]
fn missing_file_is_an_invalid_argument() {
    let path = unique_test_dir().join("absent.json");
    let path_text = path.display().to_string();
    let run = run_cli(&["score", &path_text, "--json"]);
    assert_eq!(run.code, Some(1));
    assert_json_error_contract(&run.stdout, "invalid_argument");
}

#[test]
fn parse_errors_follow_requested_output_mode() {
    let json = run_cli(&["score", "feed.csv", "--target", "lots", "--json"]);
    assert_eq!(json.code, Some(1));
    let payload = assert_json_error_contract(&json.stdout, "invalid_argument");
    assert_eq!(payload["data"]["command_hint"], "score");
    let message = payload["error"]["message"].as_str().unwrap_or_default();
    assert!(!message.contains("Usage:"));

    let text = run_cli(&["simulate", "--income", "5"]);
    assert_eq!(text.code, Some(1));
    assert_text_error_contract(&text.stdout, "invalid_argument");
    assert!(text.stdout.contains("notenetra simulate --help"));

    let unknown = run_cli(&["import"]);
    assert_eq!(unknown.code, Some(1));
    assert_text_error_contract(&unknown.stdout, "invalid_argument");
}

#[test]
fn help_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["--help"], true);
}

#[test]
fn success_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["demo", "--json"], true);
}

#[test]
fn error_output_pipe_close_does_not_panic() {
    assert_pipe_close_does_not_panic(&["score", "--json"], false);
}
