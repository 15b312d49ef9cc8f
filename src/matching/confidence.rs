//! Multi-factor confidence model for runner/candidate pairs.

use crate::core::{RegistryCandidate, Runner};
use crate::matching::normalize::{normalize_for_comparison, normalize_gender, normalize_nationality};
use crate::matching::similarity::similarity;

/// Penalty multiplier for a compound name that is not an exact match.
pub const COMPOUND_MISMATCH_PENALTY: f64 = 0.7;

/// Weights for the confidence components. They sum to 1.0, so a candidate
/// agreeing on every component scores exactly 1.0.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScoringWeights {
    pub lastname: f64,
    pub firstname: f64,
    pub nationality: f64,
    pub gender: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            lastname: 0.5,    // 50%
            firstname: 0.3,   // 30%
            nationality: 0.15, // 15%
            gender: 0.05,     // 5%
        }
    }
}

/// Confidence in [0,1] that `candidate` is the same person as `runner`.
///
/// Deterministic, pure function of its inputs. Name components use the
/// better of the direct (last↔last, first↔first) and swapped
/// (last↔first, first↔last) pairing; nationality and gender contribute
/// exact-match bonuses on top. Compound names that differ take the
/// [`COMPOUND_MISMATCH_PENALTY`] on the entire accumulated score, once per
/// compound component, so shared-token compounds ("Brian Brink" vs
/// "Brian Arreborg") don't ride an inflated edit-distance similarity into
/// an auto-match.
#[must_use]
pub fn confidence(runner: &Runner, candidate: &RegistryCandidate, weights: &ScoringWeights) -> f64 {
    let runner_last = normalize_for_comparison(&runner.lastname);
    let runner_first = normalize_for_comparison(&runner.firstname);
    let cand_last = normalize_for_comparison(&candidate.lastname);
    let cand_first = normalize_for_comparison(&candidate.firstname);

    let direct = similarity(&runner.lastname, &candidate.lastname) * weights.lastname
        + similarity(&runner.firstname, &candidate.firstname) * weights.firstname;
    let swapped = similarity(&runner.lastname, &candidate.firstname) * weights.lastname
        + similarity(&runner.firstname, &candidate.lastname) * weights.firstname;

    let mut score = direct.max(swapped);

    if normalize_nationality(&runner.nationality) == normalize_nationality(&candidate.nationality) {
        score += weights.nationality;
    }

    if normalize_gender(&candidate.gender) == Some(runner.gender) {
        score += weights.gender;
    }

    // The penalty checks the direct pairing even when the swapped pairing
    // won the name score: a compound on either side of either component is
    // suspect unless it matched verbatim.
    if (runner_first.contains(' ') || cand_first.contains(' ')) && runner_first != cand_first {
        score *= COMPOUND_MISMATCH_PENALTY;
    }
    if (runner_last.contains(' ') || cand_last.contains(' ')) && runner_last != cand_last {
        score *= COMPOUND_MISMATCH_PENALTY;
    }

    score
}
