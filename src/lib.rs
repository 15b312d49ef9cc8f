//! # duv-resolver
//!
//! A library for matching race entrants against the DUV ultramarathon
//! registry (DUV assigns every runner a stable `PersonID`).
//!
//! Entry lists arrive as free-form names with a nationality and a gender
//! field; DUV holds the canonical person records. The two rarely agree on
//! spelling: diacritics get dropped by PDF extraction, compound names get
//! truncated, and name order flips between cultures. `duv-resolver` bridges
//! the gap with normalization, a ladder of search strategies, and a weighted
//! confidence score over name, nationality, and gender agreement.
//!
//! ## Pipeline
//!
//! 1. **Import** an entry list into a local SQLite database.
//! 2. **Match**: for each unmatched runner, query the DUV runner search
//!    with progressively looser strategies, score every hit, and
//!    auto-match when the top candidate clears the confidence threshold.
//! 3. **Review**: an operator walks the persisted candidate shortlists for
//!    whatever the automatic pass could not settle.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use duv_resolver::matching::{MatchOutcome, MatchingConfig, MatchingEngine};
//! use duv_resolver::registry::{DuvClient, DUV_API_BASE};
//! use duv_resolver::core::{Gender, MatchStatus, Runner};
//!
//! let client = DuvClient::new(DUV_API_BASE, Duration::from_secs(10)).unwrap();
//! let engine = MatchingEngine::new(&client, MatchingConfig::default());
//!
//! let runner = Runner {
//!     id: 1,
//!     entry_id: "12".to_string(),
//!     firstname: "Camille".to_string(),
//!     lastname: "Herron".to_string(),
//!     nationality: "USA".to_string(),
//!     gender: Gender::Women,
//!     duv_id: None,
//!     match_status: MatchStatus::Unmatched,
//!     match_confidence: None,
//! };
//!
//! match engine.evaluate(&runner) {
//!     MatchOutcome::AutoMatched { scored } => {
//!         println!("DUV {}", scored[0].candidate.person_id);
//!     }
//!     MatchOutcome::NeedsReview { scored } => {
//!         println!("{} candidates need a human", scored.len());
//!     }
//!     MatchOutcome::NoCandidates => println!("nobody found"),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Runner and candidate data types
//! - [`matching`]: Normalization, similarity, confidence, decision policy
//! - [`registry`]: DUV API client, query strategies, rate-limited retrieval
//! - [`store`]: SQLite persistence for runners and candidate shortlists
//! - [`review`]: Interactive manual reconciliation
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod registry;
pub mod review;
pub mod store;

// Re-export commonly used types
pub use crate::core::{Gender, MatchStatus, Runner};
pub use crate::matching::{MatchOutcome, MatchingConfig, MatchingEngine};
pub use crate::registry::{DuvClient, RegistrySearch};
pub use crate::store::RunnerStore;
