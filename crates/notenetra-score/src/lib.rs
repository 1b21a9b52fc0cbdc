pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod feed;
pub mod scoring;
pub mod simulator;

pub use config::EngineConfig;
pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};
pub use feed::{FeedSnapshot, parse_feed};
pub use scoring::{
    Direction, ScoreBand, ScoreOptions, ScoreResult, ScoringDiagnostics, Transaction,
    compute_score, compute_score_with_diagnostics,
};
pub use simulator::{calculate_credit_score, quick_score};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
