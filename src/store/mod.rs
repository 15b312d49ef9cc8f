//! SQLite persistence for runners and their candidate shortlists.
//!
//! All writes for one runner-processing step go through
//! [`RunnerStore::apply_outcome`], which runs the candidate delete+insert
//! and the runner update in a single transaction: an interruption can never
//! leave `duv_id` set without its justifying candidate rows, or vice versa.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use tracing::debug;

use crate::core::{
    Gender, MatchCandidate, MatchDisposition, MatchStatus, Runner, ScoredCandidate,
};
use crate::matching::engine::MAX_PERSISTED_CANDIDATES;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS runners (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    entry_id TEXT NOT NULL,
    firstname TEXT NOT NULL,
    lastname TEXT NOT NULL,
    nationality TEXT NOT NULL,
    gender TEXT NOT NULL,
    duv_id INTEGER,
    match_status TEXT NOT NULL DEFAULT 'unmatched',
    match_confidence REAL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS match_candidates (
    runner_id INTEGER NOT NULL REFERENCES runners(id),
    rank INTEGER NOT NULL,
    duv_person_id INTEGER NOT NULL,
    firstname TEXT NOT NULL,
    lastname TEXT NOT NULL,
    nation TEXT,
    sex TEXT,
    year_of_birth INTEGER,
    personal_best TEXT,
    confidence REAL NOT NULL,
    PRIMARY KEY (runner_id, rank)
);

CREATE INDEX IF NOT EXISTS idx_runners_status ON runners(match_status);
";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database not found: {0} (run `duv-resolver import` first)")]
    MissingDatabase(String),

    #[error("runner id {0} not found")]
    RunnerNotFound(i64),

    #[error("cannot create database directory for {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt runner row {id}: bad {field} value '{value}'")]
    CorruptRow {
        id: i64,
        field: &'static str,
        value: String,
    },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Iteration order for a status-filtered work queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkOrder {
    /// Entry-list order; used by the automatic pass.
    Entry,
    /// Nationality, then gender, then entry order; used by review so an
    /// operator sees each team together.
    Review,
}

/// A runner not yet persisted (no surrogate key).
#[derive(Debug, Clone)]
pub struct NewRunner {
    pub entry_id: Option<String>,
    pub firstname: String,
    pub lastname: String,
    pub nationality: String,
    pub gender: String,
}

/// Handle on the SQLite store. One connection, no sharing; callers own the
/// sequencing (the whole pipeline is single-threaded).
#[derive(Debug)]
pub struct RunnerStore {
    conn: Connection,
}

impl RunnerStore {
    /// Open an existing database. Missing files are a startup error: the
    /// engine never operates without its store.
    ///
    /// # Errors
    ///
    /// [`StoreError::MissingDatabase`] if `path` does not exist.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::MissingDatabase(path.display().to_string()));
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open or create a database at `path`, creating the schema. Used by
    /// the import command.
    ///
    /// # Errors
    ///
    /// Propagates SQLite errors (unwritable path, corrupt file).
    pub fn create(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: path.display().to_string(),
                    source,
                })?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// In-memory store with schema, for tests.
    ///
    /// # Errors
    ///
    /// Propagates SQLite errors.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Delete all runners and candidates, then insert a fresh entry list.
    /// Returns the number of runners inserted.
    ///
    /// # Errors
    ///
    /// Propagates SQLite errors; the replacement is transactional.
    pub fn replace_runners(&mut self, entrants: &[(NewRunner, Gender)]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM match_candidates", [])?;
        tx.execute("DELETE FROM runners", [])?;

        let now = Utc::now().to_rfc3339();
        let mut inserted = 0usize;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO runners (entry_id, firstname, lastname, nationality, gender, match_status, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 'unmatched', ?6)",
            )?;
            for (entrant, gender) in entrants {
                let entry_id = entrant
                    .entry_id
                    .clone()
                    .unwrap_or_else(|| (inserted + 1).to_string());
                stmt.execute(params![
                    entry_id,
                    entrant.firstname,
                    entrant.lastname,
                    entrant.nationality,
                    gender.as_str(),
                    now,
                ])?;
                inserted += 1;
            }
        }

        tx.commit()?;
        debug!(inserted, "replaced entry list");
        Ok(inserted)
    }

    /// Fetch one runner by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::RunnerNotFound`] if the id does not exist.
    pub fn runner(&self, id: i64) -> Result<Runner, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, entry_id, firstname, lastname, nationality, gender,
                        duv_id, match_status, match_confidence
                 FROM runners WHERE id = ?1",
                [id],
                row_to_runner,
            )
            .optional()?;

        row.ok_or(StoreError::RunnerNotFound(id))?
    }

    /// Runners with the given status, in the given order.
    ///
    /// # Errors
    ///
    /// Propagates SQLite errors and corrupt-row decoding failures.
    pub fn runners_with_status(
        &self,
        status: MatchStatus,
        order: WorkOrder,
    ) -> Result<Vec<Runner>, StoreError> {
        let sql = match order {
            WorkOrder::Entry => {
                "SELECT id, entry_id, firstname, lastname, nationality, gender,
                        duv_id, match_status, match_confidence
                 FROM runners WHERE match_status = ?1
                 ORDER BY entry_id"
            }
            WorkOrder::Review => {
                "SELECT id, entry_id, firstname, lastname, nationality, gender,
                        duv_id, match_status, match_confidence
                 FROM runners WHERE match_status = ?1
                 ORDER BY nationality, gender, entry_id"
            }
        };

        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([status.as_str()], row_to_runner)?;

        let mut runners = Vec::new();
        for row in rows {
            runners.push(row??);
        }
        Ok(runners)
    }

    /// Counts per match status, for summaries.
    ///
    /// # Errors
    ///
    /// Propagates SQLite errors.
    pub fn status_counts(&self) -> Result<Vec<(String, usize)>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT match_status, COUNT(*) FROM runners GROUP BY match_status ORDER BY match_status",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
        })?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }

    /// Replace a runner's names (review edit command).
    ///
    /// # Errors
    ///
    /// [`StoreError::RunnerNotFound`] if the id does not exist.
    pub fn update_names(
        &mut self,
        id: i64,
        firstname: &str,
        lastname: &str,
    ) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE runners SET firstname = ?1, lastname = ?2, updated_at = ?3 WHERE id = ?4",
            params![firstname, lastname, Utc::now().to_rfc3339(), id],
        )?;
        if changed == 0 {
            return Err(StoreError::RunnerNotFound(id));
        }
        Ok(())
    }

    /// Persisted candidate shortlist for a runner, confidence-descending.
    ///
    /// # Errors
    ///
    /// Propagates SQLite errors.
    pub fn candidates_for(&self, runner_id: i64) -> Result<Vec<MatchCandidate>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT runner_id, rank, duv_person_id, firstname, lastname,
                    nation, sex, year_of_birth, personal_best, confidence
             FROM match_candidates WHERE runner_id = ?1 ORDER BY rank",
        )?;
        let rows = stmt.query_map([runner_id], |row| {
            Ok(MatchCandidate {
                runner_id: row.get(0)?,
                rank: row.get::<_, i64>(1)? as usize,
                person_id: row.get(2)?,
                firstname: row.get(3)?,
                lastname: row.get(4)?,
                nationality: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                gender: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                year_of_birth: row.get(7)?,
                personal_best: row.get(8)?,
                confidence: row.get(9)?,
            })
        })?;

        let mut candidates = Vec::new();
        for row in rows {
            candidates.push(row?);
        }
        Ok(candidates)
    }

    /// Apply one processing step's outcome atomically: replace the
    /// candidate shortlist (top [`MAX_PERSISTED_CANDIDATES`] of `scored`)
    /// and update the runner per `disposition`.
    ///
    /// `NoMatch` also clears any shortlist left by a previous pass, so a
    /// runner in `no-match` never carries stale candidate rows.
    ///
    /// # Errors
    ///
    /// [`StoreError::RunnerNotFound`] if the id does not exist; the store
    /// is left unchanged on any failure.
    pub fn apply_outcome(
        &mut self,
        runner_id: i64,
        scored: &[ScoredCandidate],
        disposition: &MatchDisposition,
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        let exists: Option<i64> = tx
            .query_row("SELECT id FROM runners WHERE id = ?1", [runner_id], |row| {
                row.get(0)
            })
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::RunnerNotFound(runner_id));
        }

        tx.execute(
            "DELETE FROM match_candidates WHERE runner_id = ?1",
            [runner_id],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO match_candidates (
                     runner_id, rank, duv_person_id, firstname, lastname,
                     nation, sex, year_of_birth, personal_best, confidence
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for (rank, sc) in scored.iter().take(MAX_PERSISTED_CANDIDATES).enumerate() {
                stmt.execute(params![
                    runner_id,
                    rank as i64,
                    sc.candidate.person_id,
                    sc.candidate.firstname,
                    sc.candidate.lastname,
                    sc.candidate.nationality,
                    sc.candidate.gender,
                    sc.candidate.year_of_birth,
                    sc.candidate.personal_best,
                    sc.confidence,
                ])?;
            }
        }

        let now = Utc::now().to_rfc3339();
        match disposition {
            MatchDisposition::AutoMatched { duv_id, confidence }
            | MatchDisposition::ManuallyMatched { duv_id, confidence } => {
                let status = disposition
                    .status()
                    .unwrap_or(MatchStatus::AutoMatched)
                    .as_str();
                tx.execute(
                    "UPDATE runners
                     SET duv_id = ?1, match_status = ?2, match_confidence = ?3, updated_at = ?4
                     WHERE id = ?5",
                    params![duv_id, status, confidence, now, runner_id],
                )?;
            }
            MatchDisposition::NoMatch => {
                tx.execute(
                    "UPDATE runners
                     SET duv_id = NULL, match_status = 'no-match', match_confidence = NULL,
                         updated_at = ?1
                     WHERE id = ?2",
                    params![now, runner_id],
                )?;
            }
            MatchDisposition::NeedsReview => {
                // Candidates refreshed, status untouched.
            }
        }

        tx.commit()?;
        Ok(())
    }
}

fn row_to_runner(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<Runner, StoreError>> {
    let id: i64 = row.get(0)?;
    let gender_raw: String = row.get(5)?;
    let status_raw: String = row.get(7)?;

    let gender = match gender_raw.as_str() {
        "M" => Gender::Men,
        "W" => Gender::Women,
        _ => {
            return Ok(Err(StoreError::CorruptRow {
                id,
                field: "gender",
                value: gender_raw,
            }))
        }
    };
    let Some(match_status) = MatchStatus::parse(&status_raw) else {
        return Ok(Err(StoreError::CorruptRow {
            id,
            field: "match_status",
            value: status_raw,
        }));
    };

    Ok(Ok(Runner {
        id,
        entry_id: row.get(1)?,
        firstname: row.get(2)?,
        lastname: row.get(3)?,
        nationality: row.get(4)?,
        gender,
        duv_id: row.get(6)?,
        match_status,
        match_confidence: row.get(8)?,
    }))
}
