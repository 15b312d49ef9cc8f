//! Registry search: query planning, the HTTP client, and candidate retrieval.
//!
//! The DUV registry exposes a name/nationality-keyed search with an optional
//! exact-match mode and no server-side ranking we can rely on. Retrieval
//! therefore issues an ordered sequence of query strategies per runner
//! (exact, fuzzy lastname, name-order swaps, compound-surname
//! decompositions), merges the results, and deduplicates by person id.
//!
//! Requests are strictly sequential with a fixed inter-request delay; the
//! registry is a shared community resource and politeness is part of the
//! contract. Individual query failures degrade to empty results and never
//! abort a runner's matching attempt.

pub mod client;
pub mod query;
pub mod retriever;

pub use client::{DuvClient, RegistryError, RegistrySearch, DEFAULT_TIMEOUT_SECS, DUV_API_BASE};
pub use query::{query_plan, PlannedQuery, SearchQuery};
pub use retriever::{CandidateRetriever, RateLimit};
