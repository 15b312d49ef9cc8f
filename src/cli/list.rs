use clap::Args;

use crate::core::MatchStatus;
use crate::store::{RunnerStore, WorkOrder};

#[derive(Args)]
pub struct ListArgs {
    /// Status to filter by (unmatched, auto-matched, manually-matched,
    /// no-match, or "all")
    #[arg(long, default_value = "unmatched")]
    pub status: String,
}

/// Execute list subcommand.
///
/// # Errors
///
/// Returns an error if the database is missing or the status filter is not
/// a known status name.
pub fn run(args: ListArgs, db_path: &std::path::Path) -> anyhow::Result<()> {
    let store = RunnerStore::open(db_path)?;

    let statuses: Vec<MatchStatus> = if args.status == "all" {
        vec![
            MatchStatus::Unmatched,
            MatchStatus::AutoMatched,
            MatchStatus::ManuallyMatched,
            MatchStatus::NoMatch,
        ]
    } else {
        let status = MatchStatus::parse(&args.status)
            .ok_or_else(|| anyhow::anyhow!("unknown status '{}'", args.status))?;
        vec![status]
    };

    println!(
        "{:<6} {:<25} {:<4} {:<2} {:<18} {:<8} {}",
        "entry", "name", "nat", "g", "status", "duv_id", "confidence"
    );
    for status in statuses {
        for runner in store.runners_with_status(status, WorkOrder::Entry)? {
            println!(
                "{:<6} {:<25} {:<4} {:<2} {:<18} {:<8} {}",
                runner.entry_id,
                runner.display_name(),
                runner.nationality,
                runner.gender,
                runner.match_status.as_str(),
                runner
                    .duv_id
                    .map_or_else(|| "-".to_string(), |id| id.to_string()),
                runner
                    .match_confidence
                    .map_or_else(|| "-".to_string(), |c| format!("{c:.3}")),
            );
        }
    }

    println!();
    for (status, count) in store.status_counts()? {
        println!("{status}: {count}");
    }

    Ok(())
}
