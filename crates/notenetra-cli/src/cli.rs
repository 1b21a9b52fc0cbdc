use clap::{Parser, Subcommand};

/// Extended help shown after `notenetra score --help`.
pub const SCORE_AFTER_HELP: &str = "\
How scoring works:
  Notenetra reads the transaction feed recorded by the till device and
  scores the shop's cash flow on six signals: average monthly inflow,
  month-to-month consistency, inflow/outflow ratio, trading frequency,
  the trend over the last three months and low-cash events.

  <path> is a local file path.
  To read stdin explicitly, use `-` as the path.
  Example: cat feed.json | notenetra score -

Feed formats:
  JSON array:
  [
    {\"time\": \"15-06-2024 14:32:10\", \"amount\": 500, \"type\": \"credit\"}
  ]

  JSON object keyed by record id (realtime database export):
  {
    \"-Nx01\": {\"time\": \"2024-06-15T14:32:10\", \"amount\": 120, \"type\": \"debit\"}
  }

  CSV with a header row:
  time,amount,type
  15-06-2024 14:32:10,500,credit

Record fields:
  time (or timestamp):
    DD-MM-YYYY HH:MM:SS, YYYY-MM-DD[THH:MM[:SS]], RFC 3339 with offset,
    or epoch milliseconds. Records without a time are dropped; records
    with a time that cannot be read are skipped and counted.
  amount:
    Number or numeric text. Anything else counts as 0.
  type (or direction):
    credit or debit, any case. Other labels count as outflow.

Feed Troubleshooting:
  - Scores are computed in UTC unless --utc-offset or NOTENETRA_UTC_OFFSET is set.
  - --target or NOTENETRA_TARGET_AVG_MONTHLY_INFLOW sets the monthly inflow
    that earns a full average-inflow score (default 200000).
  - Run with --json to see scored, skipped and dropped record counts.
";

#[derive(Debug, Parser)]
#[command(
    name = "notenetra",
    version,
    about = "cash-flow credit scoring for small merchants",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score a transaction feed on the 0-100 and 300-900 scales
    #[command(after_long_help = SCORE_AFTER_HELP)]
    Score {
        /// Path to a JSON or CSV feed (use `-` for stdin)
        path: Option<String>,
        /// Monthly inflow that earns a full average-inflow score
        #[arg(long, allow_negative_numbers = true)]
        target: Option<f64>,
        /// Fixed UTC offset for day and month boundaries (e.g. +05:30)
        #[arg(long, allow_hyphen_values = true)]
        utc_offset: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Estimate a score from self-reported business figures
    Simulate {
        /// Cash transactions in a typical month
        #[arg(long, allow_negative_numbers = true)]
        transactions: f64,
        /// Monthly income
        #[arg(long, allow_negative_numbers = true)]
        income: f64,
        /// Years the business has been running
        #[arg(long, allow_negative_numbers = true)]
        age: f64,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Score the bundled sample feed
    Demo {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Score { .. } => "score",
            Self::Simulate { .. } => "simulate",
            Self::Demo { .. } => "demo",
        }
    }

    pub fn wants_json(&self) -> bool {
        match self {
            Self::Score { json, .. } | Self::Simulate { json, .. } | Self::Demo { json } => *json,
        }
    }
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
