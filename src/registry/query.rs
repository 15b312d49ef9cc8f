//! Query strategy generation for one runner.

use crate::core::Runner;
use crate::matching::normalize::{normalize_for_query, normalize_nationality};

/// One search request against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Firstname search field (`fname`); omitted for fuzzy lastname queries.
    pub firstname: Option<String>,
    /// Lastname search field (`sname`).
    pub lastname: String,
    /// Request exact-match mode (`exact=1`).
    pub exact: bool,
    /// Nationality filter (`nat`), when the runner has one.
    pub nationality: Option<String>,
}

/// A query plus its place in the strategy ladder.
#[derive(Debug, Clone)]
pub struct PlannedQuery {
    pub query: SearchQuery,
    /// Fallback strategies run only while no earlier strategy has produced
    /// results; unconditional strategies (compound-surname decompositions)
    /// always run.
    pub unconditional: bool,
    /// Short label for logging.
    pub label: &'static str,
}

impl PlannedQuery {
    fn fallback(query: SearchQuery, label: &'static str) -> Self {
        Self {
            query,
            unconditional: false,
            label,
        }
    }

    fn always(query: SearchQuery, label: &'static str) -> Self {
        Self {
            query,
            unconditional: true,
            label,
        }
    }
}

/// Build the ordered query sequence for a runner.
///
/// 1. Exact firstname+lastname
/// 2. Fuzzy lastname only
/// 3. Firstname in the lastname field (reversed name order, fuzzy)
/// 4. Reversed exact (fields swapped)
/// 5. Each token of a multi-word lastname, fuzzy (unconditional)
/// 6. Each token of a multi-word lastname with the full firstname, exact
///    (unconditional)
#[must_use]
pub fn query_plan(runner: &Runner) -> Vec<PlannedQuery> {
    let firstname = normalize_for_query(&runner.firstname);
    let lastname = normalize_for_query(&runner.lastname);
    let nationality = match runner.nationality.trim() {
        "" => None,
        nat => Some(normalize_nationality(nat)),
    };

    let mut plan = vec![
        PlannedQuery::fallback(
            SearchQuery {
                firstname: Some(firstname.clone()),
                lastname: lastname.clone(),
                exact: true,
                nationality: nationality.clone(),
            },
            "exact",
        ),
        PlannedQuery::fallback(
            SearchQuery {
                firstname: None,
                lastname: lastname.clone(),
                exact: false,
                nationality: nationality.clone(),
            },
            "fuzzy-lastname",
        ),
        PlannedQuery::fallback(
            SearchQuery {
                firstname: None,
                lastname: firstname.clone(),
                exact: false,
                nationality: nationality.clone(),
            },
            "firstname-as-lastname",
        ),
        PlannedQuery::fallback(
            SearchQuery {
                firstname: Some(lastname.clone()),
                lastname: firstname.clone(),
                exact: true,
                nationality: nationality.clone(),
            },
            "reversed-exact",
        ),
    ];

    // Compound surnames: "Brink Hansen" is searched as both "Brink" and
    // "Hansen", fuzzy and exact, regardless of what the ladder found.
    if lastname.contains(' ') {
        for token in lastname.split_whitespace() {
            plan.push(PlannedQuery::always(
                SearchQuery {
                    firstname: None,
                    lastname: token.to_string(),
                    exact: false,
                    nationality: nationality.clone(),
                },
                "lastname-token",
            ));
        }
        for token in lastname.split_whitespace() {
            plan.push(PlannedQuery::always(
                SearchQuery {
                    firstname: Some(firstname.clone()),
                    lastname: token.to_string(),
                    exact: true,
                    nationality: nationality.clone(),
                },
                "exact-lastname-token",
            ));
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Gender, MatchStatus};

    fn runner(firstname: &str, lastname: &str, nationality: &str) -> Runner {
        Runner {
            id: 1,
            entry_id: "7".to_string(),
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            nationality: nationality.to_string(),
            gender: Gender::Men,
            duv_id: None,
            match_status: MatchStatus::Unmatched,
            match_confidence: None,
        }
    }

    #[test]
    fn test_simple_name_yields_four_fallbacks() {
        let plan = query_plan(&runner("John", "Smith", "USA"));
        assert_eq!(plan.len(), 4);
        assert!(plan.iter().all(|p| !p.unconditional));

        assert_eq!(plan[0].query.firstname.as_deref(), Some("John"));
        assert_eq!(plan[0].query.lastname, "Smith");
        assert!(plan[0].query.exact);

        assert_eq!(plan[1].query.firstname, None);
        assert_eq!(plan[1].query.lastname, "Smith");
        assert!(!plan[1].query.exact);

        assert_eq!(plan[2].query.lastname, "John");

        assert_eq!(plan[3].query.firstname.as_deref(), Some("Smith"));
        assert_eq!(plan[3].query.lastname, "John");
        assert!(plan[3].query.exact);
    }

    #[test]
    fn test_compound_lastname_adds_unconditional_token_queries() {
        let plan = query_plan(&runner("Brian", "Brink Hansen", "DEN"));
        assert_eq!(plan.len(), 8);

        let unconditional: Vec<_> = plan.iter().filter(|p| p.unconditional).collect();
        assert_eq!(unconditional.len(), 4);

        assert_eq!(unconditional[0].query.lastname, "Brink");
        assert!(!unconditional[0].query.exact);
        assert_eq!(unconditional[1].query.lastname, "Hansen");

        assert_eq!(unconditional[2].query.firstname.as_deref(), Some("Brian"));
        assert_eq!(unconditional[2].query.lastname, "Brink");
        assert!(unconditional[2].query.exact);
        assert_eq!(unconditional[3].query.lastname, "Hansen");
    }

    #[test]
    fn test_names_are_query_normalized() {
        let plan = query_plan(&runner("José", "García", "ESP"));
        assert_eq!(plan[0].query.firstname.as_deref(), Some("Jose"));
        assert_eq!(plan[0].query.lastname, "Garcia");
    }

    #[test]
    fn test_nationality_filter_and_alias() {
        let plan = query_plan(&runner("John", "Smith", "uk"));
        assert_eq!(plan[0].query.nationality.as_deref(), Some("GBR"));

        let plan = query_plan(&runner("John", "Smith", ""));
        assert_eq!(plan[0].query.nationality, None);
    }
}
