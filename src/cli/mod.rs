//! Command-line interface for duv-resolver.
//!
//! Available commands:
//!
//! - **import**: Load an entry list (JSON) into the local database
//! - **match**: Run the automatic matching pass against the DUV registry
//! - **review**: Interactively reconcile runners the automatic pass left
//! - **list**: Show runners and their match status
//!
//! ## Usage
//!
//! ```text
//! # Load entrants exported from the entry-list parser
//! duv-resolver import entrants.json
//!
//! # Match everyone still unmatched, prompting on ambiguous cases
//! duv-resolver match --interactive
//!
//! # Work through the leftovers team by team
//! duv-resolver review
//!
//! # What's left?
//! duv-resolver list --status unmatched
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod import;
pub mod list;
pub mod match_cmd;
pub mod review;

#[derive(Parser)]
#[command(name = "duv-resolver")]
#[command(version)]
#[command(about = "Match race entrants against the DUV ultramarathon registry")]
#[command(
    long_about = "duv-resolver links an event's entry list to DUV person records.\n\nIt searches the DUV runner API with a ladder of query strategies, scores each candidate against the entrant, auto-matches high-confidence hits, and keeps a shortlist of the rest for manual review."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the SQLite database
    #[arg(long, global = true, default_value = "data/runners.db")]
    pub db_path: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import an entry list, replacing any existing runners
    Import(import::ImportArgs),

    /// Match unmatched runners against the DUV registry
    Match(match_cmd::MatchArgs),

    /// Interactively review runners with unresolved candidates
    Review(review::ReviewArgs),

    /// List runners and their match status
    List(list::ListArgs),
}
