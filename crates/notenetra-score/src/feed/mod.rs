//! Reading transaction feeds exported by the till device or the realtime
//! database into scoring input.

pub mod input;
pub mod parse;

use serde::Serialize;

use crate::ClientError;
use crate::scoring::Transaction;

pub use input::{ResolvedSource, SourceKind, resolve_source};
pub use parse::parse_feed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedFormat {
    JsonArray,
    JsonObject,
    Csv,
}

impl FeedFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JsonArray => "json_array",
            Self::JsonObject => "json_object",
            Self::Csv => "csv",
        }
    }
}

/// Transactions read from one feed, in feed order.
///
/// `dropped` counts records that carried no timestamp at all; those never
/// reach the engine. Records whose timestamp is present but unparseable are
/// kept and left for the engine to skip.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub format: FeedFormat,
    pub transactions: Vec<Transaction>,
    pub dropped: usize,
}

pub(crate) fn invalid_feed_error(message: &str) -> ClientError {
    ClientError::invalid_feed(message)
}
