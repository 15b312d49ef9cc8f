use std::time::Duration;

use clap::Args;

use crate::core::MatchStatus;
use crate::matching::{MatchingConfig, MatchingEngine};
use crate::registry::{DuvClient, RateLimit, DEFAULT_TIMEOUT_SECS, DUV_API_BASE};
use crate::review::{review_runner, ConsolePrompt, ReviewResult};
use crate::store::{RunnerStore, WorkOrder};

#[derive(Args)]
pub struct ReviewArgs {
    /// Seconds to wait between registry requests (edits re-query)
    #[arg(long, default_value = "1.0")]
    pub delay: f64,

    /// Registry request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Base URL of the DUV JSON API
    #[arg(long, default_value = DUV_API_BASE)]
    pub api_base: String,
}

/// Execute review subcommand. Runners are presented grouped by nationality
/// and gender so an operator sees each team in one block.
///
/// # Errors
///
/// Returns an error if the database is missing, a write fails, or the
/// input stream closes mid-session.
pub fn run(args: ReviewArgs, db_path: &std::path::Path) -> anyhow::Result<()> {
    let mut store = RunnerStore::open(db_path)?;
    let client = DuvClient::new(&args.api_base, Duration::from_secs(args.timeout))?;
    let config = MatchingConfig {
        rate_limit: RateLimit {
            delay: Duration::from_secs_f64(args.delay),
        },
        ..MatchingConfig::default()
    };
    let engine = MatchingEngine::new(&client, config);

    let queue = store.runners_with_status(MatchStatus::Unmatched, WorkOrder::Review)?;
    if queue.is_empty() {
        println!("Nothing to review");
        return Ok(());
    }
    println!("{} runners to review", queue.len());

    let mut prompt = ConsolePrompt;
    let mut matched = 0usize;
    let mut none = 0usize;

    for runner in &queue {
        match review_runner(&mut store, &engine, &mut prompt, runner.id)? {
            ReviewResult::Matched { duv_id, .. } => {
                println!("  {} -> DUV {duv_id}", runner.display_name());
                matched += 1;
            }
            ReviewResult::NoMatch => none += 1,
            ReviewResult::Skipped | ReviewResult::Pending => {}
            ReviewResult::Quit => break,
        }
    }
    let left = queue.len() - matched - none;

    println!();
    println!("Review done: {matched} matched, {none} no-match, {left} left in queue");

    Ok(())
}
