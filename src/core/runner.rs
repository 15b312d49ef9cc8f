use serde::{Deserialize, Serialize};

/// Runner gender as recorded by the registry (`M` or `W`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Men,
    #[serde(rename = "W")]
    Women,
}

impl Gender {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Men => "M",
            Self::Women => "W",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolution state of a runner.
///
/// Transitions happen only through the decision policy or the review loop:
///
/// - `Unmatched` → `AutoMatched` (top score at or above threshold)
/// - `Unmatched` → `NoMatch` (empty retrieval, or skipped during review)
/// - `Unmatched` → `ManuallyMatched` (operator selection)
///
/// A below-threshold automatic pass leaves the runner `Unmatched` so a later
/// interactive pass still finds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Unmatched,
    AutoMatched,
    ManuallyMatched,
    NoMatch,
}

impl MatchStatus {
    /// Wire/database representation, unchanged from the original schema.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unmatched => "unmatched",
            Self::AutoMatched => "auto-matched",
            Self::ManuallyMatched => "manually-matched",
            Self::NoMatch => "no-match",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unmatched" => Some(Self::Unmatched),
            "auto-matched" => Some(Self::AutoMatched),
            "manually-matched" => Some(Self::ManuallyMatched),
            "no-match" => Some(Self::NoMatch),
            _ => None,
        }
    }

    /// Whether this status carries a registry identity (`duv_id`).
    #[must_use]
    pub fn is_matched(self) -> bool {
        matches!(self, Self::AutoMatched | Self::ManuallyMatched)
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entrant whose identity is to be resolved.
#[derive(Debug, Clone)]
pub struct Runner {
    /// Surrogate key assigned by the store.
    pub id: i64,
    /// Source-document identifier (bib/entry number); not globally unique.
    pub entry_id: String,
    pub firstname: String,
    pub lastname: String,
    /// 3-letter code, possibly non-canonical; treated as opaque when unmapped.
    pub nationality: String,
    pub gender: Gender,
    /// Registry identity; set iff `match_status.is_matched()`.
    pub duv_id: Option<i64>,
    pub match_status: MatchStatus,
    pub match_confidence: Option<f64>,
}

impl Runner {
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// The decision applied to a runner at the end of one processing step.
///
/// The identity key and its justifying confidence live only in the matched
/// variants, so a status update can never set `duv_id` without them (or vice
/// versa). The store applies a disposition together with the candidate
/// shortlist in a single transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchDisposition {
    AutoMatched { duv_id: i64, confidence: f64 },
    ManuallyMatched { duv_id: i64, confidence: f64 },
    NoMatch,
    /// Candidates refreshed, status left unchanged for a later pass.
    NeedsReview,
}

impl MatchDisposition {
    #[must_use]
    pub fn status(&self) -> Option<MatchStatus> {
        match self {
            Self::AutoMatched { .. } => Some(MatchStatus::AutoMatched),
            Self::ManuallyMatched { .. } => Some(MatchStatus::ManuallyMatched),
            Self::NoMatch => Some(MatchStatus::NoMatch),
            Self::NeedsReview => None,
        }
    }
}
