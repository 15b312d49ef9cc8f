//! Sequential, rate-limited candidate retrieval for one runner.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, warn};

use crate::core::{RegistryCandidate, Runner};
use crate::matching::normalize::normalize_gender;
use crate::registry::client::RegistrySearch;
use crate::registry::query::query_plan;

/// Minimum spacing between consecutive registry requests.
#[derive(Debug, Clone, Copy)]
pub struct RateLimit {
    pub delay: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
        }
    }
}

/// Executes the query plan for a runner against the registry: strictly one
/// request at a time, spaced by the rate limit, with per-query failures
/// degraded to empty results.
pub struct CandidateRetriever<'a> {
    registry: &'a dyn RegistrySearch,
    rate_limit: RateLimit,
}

impl<'a> CandidateRetriever<'a> {
    pub fn new(registry: &'a dyn RegistrySearch, rate_limit: RateLimit) -> Self {
        Self {
            registry,
            rate_limit,
        }
    }

    /// Retrieve candidates for a runner across all applicable strategies,
    /// deduplicated by person id (first occurrence wins).
    ///
    /// Fallback strategies are skipped once any earlier strategy has
    /// produced results; unconditional strategies always run. Results keep
    /// retrieval order, which downstream sorting preserves on score ties.
    #[must_use]
    pub fn retrieve(&self, runner: &Runner) -> Vec<RegistryCandidate> {
        let mut merged: Vec<RegistryCandidate> = Vec::new();
        let mut seen: HashSet<i64> = HashSet::new();
        let mut first_request = true;

        for planned in query_plan(runner) {
            if !planned.unconditional && !merged.is_empty() {
                continue;
            }

            if !first_request {
                std::thread::sleep(self.rate_limit.delay);
            }
            first_request = false;

            let hits = match self.registry.search(&planned.query) {
                Ok(hits) => hits,
                Err(e) => {
                    warn!(
                        entry_id = %runner.entry_id,
                        strategy = planned.label,
                        error = %e,
                        "registry query failed, treating as empty"
                    );
                    continue;
                }
            };

            debug!(
                entry_id = %runner.entry_id,
                strategy = planned.label,
                hits = hits.len(),
                "registry query done"
            );

            for candidate in hits {
                // The API has no gender parameter, so filter here.
                if normalize_gender(&candidate.gender) != Some(runner.gender) {
                    continue;
                }
                if seen.insert(candidate.person_id) {
                    merged.push(candidate);
                }
            }
        }

        merged
    }
}
