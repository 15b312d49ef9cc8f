//! Name matching engine and scoring.
//!
//! This module provides the core matching functionality:
//!
//! - [`normalize`]: canonicalization of names, nationality codes, and gender
//! - [`similarity`]: bounded edit-distance similarity between two names
//! - [`confidence`]: the multi-factor confidence model
//! - [`MatchingEngine`]: retrieval + scoring + auto-match decision per runner
//!
//! ## Scoring
//!
//! The confidence score combines four factors:
//!
//! - **Lastname similarity** (50%) and **firstname similarity** (30%),
//!   computed for both the direct and the swapped name pairing, keeping
//!   whichever pairing scores higher
//! - **Nationality** exact match (15%)
//! - **Gender** exact match (5%)
//!
//! Compound names (an internal space in first or last name) that are not an
//! exact match after normalization take a 30% penalty on the whole score,
//! once per compound component. Edit distance alone over-rewards compound
//! names that share tokens but belong to different people.

pub mod confidence;
pub mod engine;
pub mod normalize;
pub mod similarity;

pub use confidence::{confidence, ScoringWeights};
pub use engine::{MatchOutcome, MatchingConfig, MatchingEngine};
pub use similarity::similarity;
