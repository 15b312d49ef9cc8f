use std::time::Duration;

use clap::Args;
use tracing::info;

use crate::core::{MatchDisposition, MatchStatus};
use crate::matching::{MatchOutcome, MatchingConfig, MatchingEngine};
use crate::registry::{DuvClient, RateLimit, DEFAULT_TIMEOUT_SECS, DUV_API_BASE};
use crate::review::{review_runner, ConsolePrompt, ReviewResult};
use crate::store::{RunnerStore, WorkOrder};

#[derive(Args)]
pub struct MatchArgs {
    /// Minimum top-candidate confidence for an automatic match
    #[arg(long, default_value = "0.95")]
    pub threshold: f64,

    /// Seconds to wait between registry requests
    #[arg(long, default_value = "1.0")]
    pub delay: f64,

    /// Registry request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Base URL of the DUV JSON API
    #[arg(long, default_value = DUV_API_BASE)]
    pub api_base: String,

    /// Prompt on below-threshold candidates instead of leaving them queued
    #[arg(short, long)]
    pub interactive: bool,
}

/// Execute match subcommand.
///
/// # Errors
///
/// Returns an error if the database is missing or a write fails. Registry
/// failures do not abort the pass; they degrade to empty results per query.
pub fn run(args: MatchArgs, db_path: &std::path::Path) -> anyhow::Result<()> {
    let mut store = RunnerStore::open(db_path)?;
    let client = DuvClient::new(&args.api_base, Duration::from_secs(args.timeout))?;
    let config = MatchingConfig {
        auto_match_threshold: args.threshold,
        rate_limit: RateLimit {
            delay: Duration::from_secs_f64(args.delay),
        },
        ..MatchingConfig::default()
    };
    let engine = MatchingEngine::new(&client, config);

    let queue = store.runners_with_status(MatchStatus::Unmatched, WorkOrder::Entry)?;
    println!("Matching {} unmatched runners", queue.len());

    let mut auto = 0usize;
    let mut manual = 0usize;
    let mut none = 0usize;
    let mut queued = 0usize;

    'runners: for runner in &queue {
        info!(runner = %runner.display_name(), "matching");
        match engine.evaluate(runner) {
            MatchOutcome::NoCandidates => {
                store.apply_outcome(runner.id, &[], &MatchDisposition::NoMatch)?;
                println!("  {}: no candidates", runner.display_name());
                none += 1;
            }
            MatchOutcome::AutoMatched { scored } => {
                let best = &scored[0];
                store.apply_outcome(
                    runner.id,
                    &scored,
                    &MatchDisposition::AutoMatched {
                        duv_id: best.candidate.person_id,
                        confidence: best.confidence,
                    },
                )?;
                println!(
                    "  {}: auto-matched to DUV {} ({:.3})",
                    runner.display_name(),
                    best.candidate.person_id,
                    best.confidence
                );
                auto += 1;
            }
            MatchOutcome::NeedsReview { scored } => {
                store.apply_outcome(runner.id, &scored, &MatchDisposition::NeedsReview)?;
                if args.interactive {
                    let mut prompt = ConsolePrompt;
                    match review_runner(&mut store, &engine, &mut prompt, runner.id)? {
                        ReviewResult::Matched { .. } => manual += 1,
                        ReviewResult::NoMatch => none += 1,
                        ReviewResult::Skipped | ReviewResult::Pending => queued += 1,
                        ReviewResult::Quit => {
                            queued += 1;
                            println!("Stopping; remaining runners left unmatched");
                            break 'runners;
                        }
                    }
                } else {
                    println!(
                        "  {}: {} candidates, best {:.3}, queued for review",
                        runner.display_name(),
                        scored.len(),
                        scored[0].confidence
                    );
                    queued += 1;
                }
            }
        }
    }

    println!();
    println!(
        "Done: {auto} auto-matched, {manual} manually matched, {none} no-match, {queued} queued for review"
    );

    Ok(())
}
