use std::fs;
use std::path::PathBuf;

use clap::Args;
use serde::Deserialize;
use tracing::warn;

use crate::core::Gender;
use crate::matching::normalize::{normalize_gender, normalize_nationality};
use crate::store::{NewRunner, RunnerStore};

#[derive(Args)]
pub struct ImportArgs {
    /// Entry list: a JSON array of entrant objects
    /// (firstname, lastname, nationality, gender, optional entry_id)
    #[arg(required = true)]
    pub input: PathBuf,
}

/// One entrant as exported by the entry-list parser. Field spellings vary
/// across sources, hence the aliases.
#[derive(Deserialize)]
struct Entrant {
    #[serde(default, alias = "bib", alias = "entryId")]
    entry_id: Option<String>,
    #[serde(alias = "first_name", alias = "firstName")]
    firstname: String,
    #[serde(alias = "last_name", alias = "lastName")]
    lastname: String,
    #[serde(default, alias = "nation", alias = "country")]
    nationality: Option<String>,
    #[serde(default, alias = "sex")]
    gender: Option<String>,
}

/// Execute import subcommand.
///
/// # Errors
///
/// Returns an error if the input file cannot be read or parsed, or the
/// database cannot be written.
pub fn run(args: ImportArgs, db_path: &std::path::Path) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&args.input)?;
    let entrants: Vec<Entrant> = serde_json::from_str(&raw)?;

    let mut rows = Vec::with_capacity(entrants.len());
    for entrant in &entrants {
        let gender = match entrant.gender.as_deref().and_then(normalize_gender) {
            Some(g) => g,
            None => {
                warn!(
                    entrant = %format!("{} {}", entrant.firstname, entrant.lastname),
                    raw = entrant.gender.as_deref().unwrap_or(""),
                    "no usable gender, defaulting to men's field"
                );
                Gender::Men
            }
        };
        let nationality = entrant
            .nationality
            .as_deref()
            .map(normalize_nationality)
            .unwrap_or_default();

        rows.push((
            NewRunner {
                entry_id: entrant.entry_id.clone(),
                firstname: entrant.firstname.trim().to_string(),
                lastname: entrant.lastname.trim().to_string(),
                nationality,
                gender: gender.as_str().to_string(),
            },
            gender,
        ));
    }

    let mut store = RunnerStore::create(db_path)?;
    let inserted = store.replace_runners(&rows)?;
    println!("Imported {inserted} runners into {}", db_path.display());

    Ok(())
}
