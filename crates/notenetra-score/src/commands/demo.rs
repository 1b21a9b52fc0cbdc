use crate::ClientResult;
use crate::contracts::envelope::{CommandName, SuccessEnvelope, success};
use crate::feed::{ResolvedSource, SourceKind};
use crate::scoring::ScoreOptions;

use super::score::score_source;

/// Three months of a kirana till, as exported from the realtime database.
const DEMO_FEED: &str = include_str!("demo_feed.json");
const DEMO_SOURCE_REF: &str = "demo_feed.json";

pub fn run() -> ClientResult<SuccessEnvelope> {
    let source = ResolvedSource {
        source_kind: SourceKind::Bundled,
        source_ref: Some(DEMO_SOURCE_REF.to_string()),
        content: DEMO_FEED.to_string(),
    };
    let data = score_source(source, &ScoreOptions::default())?;
    success(CommandName::Demo, data)
}
