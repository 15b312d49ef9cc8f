use serde::{Deserialize, Deserializer};

/// An identity record returned by the registry search API.
///
/// The DUV JSON payload is loosely typed: numeric fields arrive as strings or
/// numbers depending on endpoint version, and `YOB` uses `"0"` for unknown.
/// Deserialization tolerates both shapes.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryCandidate {
    #[serde(rename = "PersonID", deserialize_with = "de_flexible_i64")]
    pub person_id: i64,

    #[serde(rename = "FirstName", alias = "Firstname", default)]
    pub firstname: String,

    #[serde(rename = "LastName", alias = "Lastname", default)]
    pub lastname: String,

    #[serde(rename = "Nationality", alias = "Nation", default)]
    pub nationality: String,

    /// Raw gender string from the registry (`M`/`W` expected).
    #[serde(rename = "Gender", alias = "Sex", default)]
    pub gender: String,

    #[serde(rename = "YOB", default, deserialize_with = "de_year")]
    pub year_of_birth: Option<i32>,

    /// Best performance as reported by the registry (e.g. km for 24h events).
    #[serde(rename = "PersonalBest", default)]
    pub personal_best: Option<String>,
}

impl RegistryCandidate {
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// A registry candidate with its computed match confidence. Ephemeral;
/// the top ranks are persisted as [`MatchCandidate`] rows.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: RegistryCandidate,
    /// Bounded [0,1] heuristic score estimating match correctness.
    pub confidence: f64,
}

/// A persisted shortlist row, keyed by `(runner_id, rank)`.
///
/// These rows are a cache/audit trail for review, not the source of truth
/// for the match itself; they are replaced wholesale on every re-match.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub runner_id: i64,
    /// 0-based rank by descending confidence.
    pub rank: usize,
    pub person_id: i64,
    pub firstname: String,
    pub lastname: String,
    pub nationality: String,
    pub gender: String,
    pub year_of_birth: Option<i32>,
    pub personal_best: Option<String>,
    pub confidence: f64,
}

/// Accept an integer that may be encoded as a JSON number or string.
fn de_flexible_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Year of birth: number or string, with `0`, negatives, and unparseable
/// values all treated as unknown.
fn de_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
        None,
    }

    let year = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(n)) => n,
        Some(Raw::Text(s)) => s.trim().parse().unwrap_or(0),
        Some(Raw::None) | None => 0,
    };

    Ok(i32::try_from(year).ok().filter(|&y| y > 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_string_fields() {
        let json = r#"{
            "PersonID": "12345",
            "LastName": "Hansen",
            "FirstName": "Brian",
            "Nationality": "DEN",
            "Gender": "M",
            "YOB": "1978",
            "PersonalBest": "245.113"
        }"#;

        let c: RegistryCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(c.person_id, 12345);
        assert_eq!(c.lastname, "Hansen");
        assert_eq!(c.year_of_birth, Some(1978));
        assert_eq!(c.personal_best.as_deref(), Some("245.113"));
    }

    #[test]
    fn test_deserialize_numeric_fields() {
        let json = r#"{"PersonID": 42, "Lastname": "Smith", "Firstname": "John", "Nation": "USA", "Sex": "M", "YOB": 1980}"#;
        let c: RegistryCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(c.person_id, 42);
        assert_eq!(c.lastname, "Smith");
        assert_eq!(c.nationality, "USA");
        assert_eq!(c.gender, "M");
        assert_eq!(c.year_of_birth, Some(1980));
    }

    #[test]
    fn test_zero_yob_is_unknown() {
        let json = r#"{"PersonID": 7, "LastName": "Doe", "FirstName": "Jane", "YOB": "0"}"#;
        let c: RegistryCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(c.year_of_birth, None);
        assert!(c.personal_best.is_none());
    }

    #[test]
    fn test_garbage_yob_is_unknown() {
        let json = r#"{"PersonID": 7, "LastName": "Doe", "FirstName": "Jane", "YOB": "n/a"}"#;
        let c: RegistryCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(c.year_of_birth, None);
    }

    #[test]
    fn test_out_of_range_yob_is_unknown() {
        let json = r#"{"PersonID": 7, "LastName": "Doe", "FirstName": "Jane", "YOB": 92233720368547758}"#;
        let c: RegistryCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(c.year_of_birth, None);
    }
}
