//! Blocking HTTP client for the DUV registry search API.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::core::RegistryCandidate;
use crate::registry::query::SearchQuery;

/// Base URL of the registry's JSON API.
pub const DUV_API_BASE: &str = "https://statistik.d-u-v.org/json";

/// Default per-request timeout. A timed-out query is a failed query, not a
/// fatal error.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("registry request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed registry response: {0}")]
    Malformed(String),
}

/// The registry search operation, behind a trait so the engine and tests
/// are independent of HTTP.
pub trait RegistrySearch {
    /// Execute one search query, returning the raw candidate list.
    ///
    /// # Errors
    ///
    /// Transport failures and malformed payloads; callers treat either as
    /// "zero results for this strategy".
    fn search(&self, query: &SearchQuery) -> Result<Vec<RegistryCandidate>, RegistryError>;
}

/// Search response envelope: `{"Hitlist": [...]}`. An absent or null
/// hitlist is an empty result, which the API uses interchangeably.
#[derive(Deserialize)]
struct SearchResponse {
    #[serde(rename = "Hitlist", default)]
    hitlist: Vec<RegistryCandidate>,
}

/// Blocking client for the live registry (no async runtime required).
pub struct DuvClient {
    http: reqwest::blocking::Client,
    api_base: String,
}

impl DuvClient {
    /// Create a client against `api_base` with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend fails to initialize.
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self, RegistryError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("duv-resolver/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.into(),
        })
    }
}

impl RegistrySearch for DuvClient {
    fn search(&self, query: &SearchQuery) -> Result<Vec<RegistryCandidate>, RegistryError> {
        let url = format!("{}/msearchrunner.php", self.api_base);

        let mut params: Vec<(&str, &str)> = vec![("sname", &query.lastname)];
        if let Some(fname) = &query.firstname {
            params.push(("fname", fname));
        }
        if query.exact {
            params.push(("exact", "1"));
        }
        if let Some(nat) = &query.nationality {
            params.push(("nat", nat));
        }

        debug!(url, ?params, "registry query");

        let response = self.http.get(&url).query(&params).send()?.error_for_status()?;

        let body: SearchResponse = response
            .json()
            .map_err(|e| RegistryError::Malformed(e.to_string()))?;

        Ok(body.hitlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_envelope_with_hitlist() {
        let json = r#"{"Hitlist": [{"PersonID": 1, "LastName": "Smith", "FirstName": "John"}]}"#;
        let resp: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.hitlist.len(), 1);
        assert_eq!(resp.hitlist[0].person_id, 1);
    }

    #[test]
    fn test_response_envelope_missing_hitlist() {
        let resp: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.hitlist.is_empty());
    }
}
