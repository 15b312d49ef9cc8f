//! Core data types for runners, registry candidates, and match state.
//!
//! - [`Runner`]: one entrant from the entry list, owned by the store
//! - [`RegistryCandidate`]: a raw identity record returned by the registry
//! - [`ScoredCandidate`]: a candidate plus its computed confidence
//! - [`MatchCandidate`]: a persisted shortlist row keyed by (runner, rank)
//! - [`MatchDisposition`]: the decision applied to a runner in one step

pub mod candidate;
pub mod runner;

pub use candidate::{MatchCandidate, RegistryCandidate, ScoredCandidate};
pub use runner::{Gender, MatchDisposition, MatchStatus, Runner};
