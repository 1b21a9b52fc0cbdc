use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::feed::{FeedFormat, FeedSnapshot, invalid_feed_error};
use crate::scoring::{Direction, Transaction};
use crate::{ClientError, ClientResult};

const TIME_FIELDS: [&str; 2] = ["time", "timestamp"];
const AMOUNT_FIELD: &str = "amount";
const DIRECTION_FIELDS: [&str; 2] = ["type", "direction"];

/// A record before it is known whether it carries a timestamp.
struct FeedRecord {
    time: Option<String>,
    amount: f64,
    direction: Direction,
}

pub fn parse_feed(content: &str) -> ClientResult<FeedSnapshot> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(invalid_feed_error("Feed source is empty."));
    }

    if looks_like_ndjson(trimmed) {
        return Err(ClientError::invalid_feed_format(
            "NDJSON is not supported. Provide a JSON array, a JSON object of records, or CSV.",
            "ndjson",
        ));
    }

    if trimmed.starts_with('[') {
        return parse_json_array(trimmed);
    }

    if trimmed.starts_with('{') {
        return parse_json_object(trimmed);
    }

    if looks_like_csv(trimmed) {
        return parse_csv(trimmed);
    }

    if serde_json::from_str::<Value>(trimmed).is_ok() {
        return Err(ClientError::invalid_feed_format(
            "JSON feed must be an array or an object of transaction records.",
            "json_scalar",
        ));
    }

    Err(ClientError::invalid_feed_format(
        "Unsupported feed format. Provide a JSON array, a JSON object of records, or CSV with headers.",
        "unknown",
    ))
}

fn parse_json_array(content: &str) -> ClientResult<FeedSnapshot> {
    let parsed = serde_json::from_str::<Value>(content)
        .map_err(|_| invalid_feed_error("Invalid JSON input. Provide a valid JSON array."))?;

    let Some(items) = parsed.as_array() else {
        return Err(invalid_feed_error(
            "JSON input must be a top-level array of transaction objects.",
        ));
    };

    collect_json_records(FeedFormat::JsonArray, items.iter())
}

/// Realtime database snapshots arrive as `{ "<push id>": { ... } }`. Push ids
/// sort chronologically, so key order doubles as insertion order.
fn parse_json_object(content: &str) -> ClientResult<FeedSnapshot> {
    let parsed = serde_json::from_str::<Value>(content)
        .map_err(|_| invalid_feed_error("Invalid JSON input. Provide a valid JSON object."))?;

    let Some(entries) = parsed.as_object() else {
        return Err(invalid_feed_error(
            "JSON input must be an object keyed by record id.",
        ));
    };

    let mut keys = entries.keys().collect::<Vec<&String>>();
    keys.sort();
    collect_json_records(
        FeedFormat::JsonObject,
        keys.into_iter().filter_map(|key| entries.get(key)),
    )
}

fn collect_json_records<'a>(
    format: FeedFormat,
    items: impl Iterator<Item = &'a Value>,
) -> ClientResult<FeedSnapshot> {
    let mut records = Vec::new();
    let mut dropped = 0usize;
    for item in items {
        if item.is_null() {
            dropped += 1;
            continue;
        }
        let Some(object) = item.as_object() else {
            return Err(invalid_feed_error(
                "Feed entries must all be objects with transaction fields.",
            ));
        };
        records.push(record_from_object(object));
    }

    Ok(snapshot_from_records(format, records, dropped))
}

fn record_from_object(object: &Map<String, Value>) -> FeedRecord {
    let time = first_present(object, &TIME_FIELDS).and_then(read_time);
    let amount = object.get(AMOUNT_FIELD).map_or(0.0, read_amount);
    let direction = first_present(object, &DIRECTION_FIELDS)
        .and_then(Value::as_str)
        .map_or(Direction::Unclassified, Direction::from_label);

    FeedRecord {
        time,
        amount,
        direction,
    }
}

fn parse_csv(content: &str) -> ClientResult<FeedSnapshot> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| invalid_feed_error("CSV header row is missing or unreadable."))?
        .iter()
        .map(|value| value.trim().to_ascii_lowercase())
        .collect::<Vec<String>>();

    let index_by_name = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.as_str(), index))
        .collect::<HashMap<&str, usize>>();

    let column = |candidates: &[&str]| {
        candidates
            .iter()
            .find_map(|name| index_by_name.get(name).copied())
    };
    let (Some(time_index), Some(amount_index), Some(direction_index)) = (
        column(&TIME_FIELDS),
        column(&[AMOUNT_FIELD]),
        column(&DIRECTION_FIELDS),
    ) else {
        return Err(ClientError::feed_schema_mismatch(
            required_headers(),
            headers.clone(),
        ));
    };

    let mut records = Vec::new();
    for result_row in reader.records() {
        let record =
            result_row.map_err(|_| invalid_feed_error("CSV rows are malformed or not UTF-8."))?;

        let time = record
            .get(time_index)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let amount = record.get(amount_index).map_or(0.0, parse_amount_text);
        let direction = record
            .get(direction_index)
            .map_or(Direction::Unclassified, |value| {
                Direction::from_label(value.trim())
            });

        records.push(FeedRecord {
            time,
            amount,
            direction,
        });
    }

    Ok(snapshot_from_records(FeedFormat::Csv, records, 0))
}

fn snapshot_from_records(
    format: FeedFormat,
    records: Vec<FeedRecord>,
    mut dropped: usize,
) -> FeedSnapshot {
    let mut transactions = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let Some(time) = record.time else {
            debug!(
                record = index + 1,
                format = format.as_str(),
                "dropping feed record without a timestamp"
            );
            dropped += 1;
            continue;
        };
        transactions.push(Transaction {
            timestamp: time,
            amount: record.amount,
            direction: record.direction,
        });
    }

    FeedSnapshot {
        format,
        transactions,
        dropped,
    }
}

fn first_present<'a>(object: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .find_map(|name| object.get(*name).filter(|value| !value.is_null()))
}

fn read_time(value: &Value) -> Option<String> {
    if let Some(text) = value.as_str() {
        if text.is_empty() {
            return None;
        }
        return Some(text.to_string());
    }
    if let Some(integer) = value.as_i64() {
        return Some(integer.to_string());
    }
    Some(value.to_string())
}

fn read_amount(value: &Value) -> f64 {
    if let Some(number) = value.as_f64() {
        return number;
    }
    value.as_str().map_or(0.0, parse_amount_text)
}

fn parse_amount_text(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn required_headers() -> Vec<String> {
    vec![
        "time|timestamp".to_string(),
        AMOUNT_FIELD.to_string(),
        "type|direction".to_string(),
    ]
}

fn looks_like_ndjson(content: &str) -> bool {
    let lines = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<&str>>();
    if lines.len() < 2 {
        return false;
    }

    lines.iter().all(|line| {
        serde_json::from_str::<Value>(line.trim())
            .map(|value| value.is_object())
            .unwrap_or(false)
    })
}

fn looks_like_csv(content: &str) -> bool {
    let Some(first_line) = content.lines().find(|line| !line.trim().is_empty()) else {
        return false;
    };
    first_line.contains(',')
}
