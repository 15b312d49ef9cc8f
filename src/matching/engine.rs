//! Matching decision policy: retrieval, scoring, and the auto-match gate.

use tracing::{debug, info};

use crate::core::{Runner, ScoredCandidate};
use crate::matching::confidence::{confidence, ScoringWeights};
use crate::registry::client::RegistrySearch;
use crate::registry::retriever::{CandidateRetriever, RateLimit};

/// Default auto-match threshold. Intentionally conservative: a wrong
/// auto-match is worse than a manual review, so precision wins over recall.
pub const DEFAULT_AUTO_MATCH_THRESHOLD: f64 = 0.95;

/// How many candidate rows are persisted per runner.
pub const MAX_PERSISTED_CANDIDATES: usize = 10;

/// Configuration for the matching engine.
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Minimum top-candidate confidence for an automatic match.
    pub auto_match_threshold: f64,
    pub weights: ScoringWeights,
    pub rate_limit: RateLimit,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            auto_match_threshold: DEFAULT_AUTO_MATCH_THRESHOLD,
            weights: ScoringWeights::default(),
            rate_limit: RateLimit::default(),
        }
    }
}

/// Outcome of evaluating one runner against the registry.
///
/// The caller (automatic pass or review session) applies the outcome to the
/// store; evaluation itself has no side effects beyond registry traffic.
#[derive(Debug)]
pub enum MatchOutcome {
    /// Retrieval produced nothing; the runner transitions to `no-match`.
    NoCandidates,
    /// Top candidate met the threshold; candidates sorted by confidence.
    AutoMatched { scored: Vec<ScoredCandidate> },
    /// Candidates found but none met the threshold; sorted by confidence.
    NeedsReview { scored: Vec<ScoredCandidate> },
}

/// The matching engine: candidate retrieval plus the decision policy.
pub struct MatchingEngine<'a> {
    registry: &'a dyn RegistrySearch,
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    pub fn new(registry: &'a dyn RegistrySearch, config: MatchingConfig) -> Self {
        Self { registry, config }
    }

    #[must_use]
    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Retrieve, score, and rank candidates for a runner, then apply the
    /// auto-match gate.
    ///
    /// Sorting is stable: ties keep retrieval order. A top score exactly at
    /// the threshold auto-matches.
    #[must_use]
    pub fn evaluate(&self, runner: &Runner) -> MatchOutcome {
        let retriever = CandidateRetriever::new(self.registry, self.config.rate_limit);
        let candidates = retriever.retrieve(runner);

        if candidates.is_empty() {
            info!(entry_id = %runner.entry_id, "no candidates found");
            return MatchOutcome::NoCandidates;
        }

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|candidate| {
                let confidence = confidence(runner, &candidate, &self.config.weights);
                ScoredCandidate {
                    candidate,
                    confidence,
                }
            })
            .collect();

        // Stable sort, descending by confidence.
        scored.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let best = scored[0].confidence;
        debug!(
            entry_id = %runner.entry_id,
            candidates = scored.len(),
            best_confidence = best,
            "scored candidates"
        );

        if best >= self.config.auto_match_threshold {
            MatchOutcome::AutoMatched { scored }
        } else {
            MatchOutcome::NeedsReview { scored }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::time::Duration;

    use super::*;
    use crate::core::{Gender, MatchStatus, RegistryCandidate};
    use crate::registry::client::RegistryError;
    use crate::registry::query::SearchQuery;

    struct FixedRegistry {
        responses: RefCell<Vec<Vec<RegistryCandidate>>>,
    }

    impl FixedRegistry {
        fn new(responses: Vec<Vec<RegistryCandidate>>) -> Self {
            Self {
                responses: RefCell::new(responses),
            }
        }
    }

    impl RegistrySearch for FixedRegistry {
        fn search(&self, _query: &SearchQuery) -> Result<Vec<RegistryCandidate>, RegistryError> {
            let mut responses = self.responses.borrow_mut();
            if responses.is_empty() {
                Ok(Vec::new())
            } else {
                Ok(responses.remove(0))
            }
        }
    }

    fn runner(firstname: &str, lastname: &str, nationality: &str) -> Runner {
        Runner {
            id: 1,
            entry_id: "3".to_string(),
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            nationality: nationality.to_string(),
            gender: Gender::Men,
            duv_id: None,
            match_status: MatchStatus::Unmatched,
            match_confidence: None,
        }
    }

    fn candidate(person_id: i64, firstname: &str, lastname: &str, nationality: &str) -> RegistryCandidate {
        RegistryCandidate {
            person_id,
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            nationality: nationality.to_string(),
            gender: "M".to_string(),
            year_of_birth: None,
            personal_best: None,
        }
    }

    fn config() -> MatchingConfig {
        MatchingConfig {
            rate_limit: RateLimit {
                delay: Duration::ZERO,
            },
            ..MatchingConfig::default()
        }
    }

    #[test]
    fn test_empty_retrieval_is_no_candidates() {
        let registry = FixedRegistry::new(vec![]);
        let engine = MatchingEngine::new(&registry, config());

        let outcome = engine.evaluate(&runner("John", "Smith", "USA"));
        assert!(matches!(outcome, MatchOutcome::NoCandidates));
    }

    #[test]
    fn test_perfect_candidate_auto_matches() {
        let registry =
            FixedRegistry::new(vec![vec![candidate(42, "John", "Smith", "USA")]]);
        let engine = MatchingEngine::new(&registry, config());

        match engine.evaluate(&runner("John", "Smith", "USA")) {
            MatchOutcome::AutoMatched { scored } => {
                assert_eq!(scored[0].candidate.person_id, 42);
                assert!((scored[0].confidence - 1.0).abs() < 1e-9);
            }
            other => panic!("expected auto-match, got {other:?}"),
        }
    }

    #[test]
    fn test_score_exactly_at_threshold_auto_matches() {
        // Names and gender match, nationality doesn't: 0.5 + 0.3 + 0.05 = 0.85
        let registry =
            FixedRegistry::new(vec![vec![candidate(7, "John", "Smith", "CAN")]]);
        let mut cfg = config();
        cfg.auto_match_threshold = 0.85;
        let engine = MatchingEngine::new(&registry, cfg);

        match engine.evaluate(&runner("John", "Smith", "USA")) {
            MatchOutcome::AutoMatched { scored } => {
                assert!((scored[0].confidence - 0.85).abs() < 1e-9);
            }
            other => panic!("expected auto-match, got {other:?}"),
        }
    }

    #[test]
    fn test_score_below_threshold_needs_review() {
        let registry =
            FixedRegistry::new(vec![vec![candidate(7, "John", "Smith", "CAN")]]);
        let mut cfg = config();
        cfg.auto_match_threshold = 0.85 + 1e-6;
        let engine = MatchingEngine::new(&registry, cfg);

        match engine.evaluate(&runner("John", "Smith", "USA")) {
            MatchOutcome::NeedsReview { scored } => {
                assert!((scored[0].confidence - 0.85).abs() < 1e-9);
            }
            other => panic!("expected review, got {other:?}"),
        }
    }

    #[test]
    fn test_candidates_ranked_by_confidence() {
        let registry = FixedRegistry::new(vec![vec![
            candidate(1, "Jon", "Smith", "CAN"),
            candidate(2, "John", "Smith", "USA"),
            candidate(3, "Johan", "Smit", "CAN"),
        ]]);
        let engine = MatchingEngine::new(&registry, config());

        match engine.evaluate(&runner("John", "Smith", "USA")) {
            MatchOutcome::AutoMatched { scored } => {
                assert_eq!(scored[0].candidate.person_id, 2);
                let confidences: Vec<f64> = scored.iter().map(|s| s.confidence).collect();
                let mut sorted = confidences.clone();
                sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
                assert_eq!(confidences, sorted);
            }
            other => panic!("expected auto-match, got {other:?}"),
        }
    }

    #[test]
    fn test_ties_keep_retrieval_order() {
        let registry = FixedRegistry::new(vec![vec![
            candidate(10, "John", "Smith", "USA"),
            candidate(20, "John", "Smith", "USA"),
        ]]);
        let engine = MatchingEngine::new(&registry, config());

        match engine.evaluate(&runner("John", "Smith", "USA")) {
            MatchOutcome::AutoMatched { scored } => {
                assert_eq!(scored[0].candidate.person_id, 10);
                assert_eq!(scored[1].candidate.person_id, 20);
            }
            other => panic!("expected auto-match, got {other:?}"),
        }
    }
}
