//! Manual reconciliation of runners the automatic pass left unresolved.
//!
//! An operator walks the persisted candidate shortlist for each runner and
//! either selects a registry person, declares no match, skips, or edits the
//! runner's names and retries the search once. The prompt side is behind
//! [`ReviewPrompt`] so the session logic is testable without a terminal.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, info};

use crate::core::{MatchCandidate, MatchDisposition, Runner, ScoredCandidate};
use crate::matching::{MatchOutcome, MatchingEngine};
use crate::registry::RegistryError;
use crate::store::{RunnerStore, StoreError};

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("input stream closed")]
    InputClosed,

    #[error("i/o error reading operator input: {0}")]
    Io(#[from] io::Error),
}

/// One operator command against a shortlist of `n` candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 1-based selection of a listed candidate.
    Select(usize),
    /// Match to a DUV person id the operator looked up themselves, for
    /// runners the search strategies never find.
    Direct(i64),
    /// No listed candidate is this runner; mark no-match.
    Reject,
    /// Leave the runner for later.
    Skip,
    /// Edit the runner's names and search again.
    Edit,
    /// Stop the session.
    Quit,
}

impl Command {
    /// Parse an operator line. Returns `None` for anything malformed,
    /// including selections outside `1..=shortlist_len`.
    #[must_use]
    pub fn parse(line: &str, shortlist_len: usize) -> Option<Self> {
        let line = line.trim().to_ascii_lowercase();
        match line.as_str() {
            "0" | "n" => return Some(Self::Reject),
            "s" => return Some(Self::Skip),
            "e" => return Some(Self::Edit),
            "q" => return Some(Self::Quit),
            _ => {}
        }
        if let Some(rest) = line.strip_prefix("d ") {
            let id: i64 = rest.trim().parse().ok()?;
            return (id > 0).then_some(Self::Direct(id));
        }
        let k: usize = line.parse().ok()?;
        (1..=shortlist_len).contains(&k).then_some(Self::Select(k))
    }
}

/// Replacement names from an edit. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct NameEdit {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl NameEdit {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.firstname.is_none() && self.lastname.is_none()
    }
}

/// How one runner's review ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewResult {
    Matched { duv_id: i64, confidence: f64 },
    NoMatch,
    Skipped,
    /// Edited but still unresolved; stays in the queue for a later session.
    Pending,
    Quit,
}

/// Operator interaction surface. The console implementation prompts on
/// stderr and reads stdin; tests script it.
pub trait ReviewPrompt {
    /// Show the runner and shortlist, return a command.
    ///
    /// # Errors
    ///
    /// Fails if the input stream closes or cannot be read.
    fn choose(&mut self, runner: &Runner, shortlist: &[MatchCandidate])
        -> Result<Command, ReviewError>;

    /// Ask for replacement names.
    ///
    /// # Errors
    ///
    /// Fails if the input stream closes or cannot be read.
    fn edit_names(&mut self, runner: &Runner) -> Result<NameEdit, ReviewError>;
}

/// Terminal prompt. Output goes to stderr so stdout stays clean for
/// redirection.
pub struct ConsolePrompt;

impl ConsolePrompt {
    fn read_line(&self) -> Result<String, ReviewError> {
        let mut line = String::new();
        let n = io::stdin().lock().read_line(&mut line)?;
        if n == 0 {
            return Err(ReviewError::InputClosed);
        }
        Ok(line)
    }
}

impl ReviewPrompt for ConsolePrompt {
    fn choose(
        &mut self,
        runner: &Runner,
        shortlist: &[MatchCandidate],
    ) -> Result<Command, ReviewError> {
        let mut err = io::stderr().lock();
        writeln!(err)?;
        writeln!(
            err,
            "=== #{} {} ({}, {})",
            runner.entry_id,
            runner.display_name(),
            runner.nationality,
            runner.gender
        )?;
        if shortlist.is_empty() {
            writeln!(err, "  (no candidates found)")?;
        }
        for (i, c) in shortlist.iter().enumerate() {
            writeln!(
                err,
                "  [{}] {} {} ({}, {}) YOB {} PB {}  confidence {:.3}",
                i + 1,
                c.firstname,
                c.lastname,
                c.nationality,
                c.gender,
                c.year_of_birth.map_or_else(|| "?".to_string(), |y| y.to_string()),
                c.personal_best.as_deref().unwrap_or("-"),
                c.confidence
            )?;
        }
        drop(err);

        loop {
            if shortlist.is_empty() {
                eprint!("[d <duv_id>] direct match, [0/n] no match, [s]kip, [e]dit, [q]uit: ");
            } else {
                eprint!(
                    "[1-{}] select, [d <duv_id>] direct match, [0/n] no match, [s]kip, [e]dit, [q]uit: ",
                    shortlist.len()
                );
            }
            io::stderr().flush()?;
            let line = self.read_line()?;
            if let Some(cmd) = Command::parse(&line, shortlist.len()) {
                return Ok(cmd);
            }
            eprintln!("unrecognized input '{}'", line.trim());
        }
    }

    fn edit_names(&mut self, runner: &Runner) -> Result<NameEdit, ReviewError> {
        eprint!("firstname [{}]: ", runner.firstname);
        io::stderr().flush()?;
        let first = self.read_line()?;
        eprint!("lastname [{}]: ", runner.lastname);
        io::stderr().flush()?;
        let last = self.read_line()?;

        let keep_or = |s: String| {
            let s = s.trim().to_string();
            (!s.is_empty()).then_some(s)
        };
        Ok(NameEdit {
            firstname: keep_or(first),
            lastname: keep_or(last),
        })
    }
}

/// Drives the review of a single runner.
///
/// At most one edit-and-retry cycle per runner per session: an edit
/// re-queries the registry, persists the refreshed shortlist, and
/// re-prompts; a second edit request falls through to [`ReviewResult::Pending`].
pub fn review_runner(
    store: &mut RunnerStore,
    engine: &MatchingEngine<'_>,
    prompt: &mut dyn ReviewPrompt,
    runner_id: i64,
) -> Result<ReviewResult, ReviewError> {
    let mut runner = store.runner(runner_id)?;
    let mut edits_remaining = 1u32;

    loop {
        let mut shortlist = store.candidates_for(runner.id)?;
        if shortlist.is_empty() {
            // Nothing on file (review ran before the automatic pass, or the
            // shortlist was cleared); search now so the operator sees
            // whatever the registry has before deciding.
            debug!(runner = %runner.display_name(), "no candidates on file, querying registry");
            match engine.evaluate(&runner) {
                MatchOutcome::NoCandidates => {}
                MatchOutcome::AutoMatched { scored }
                | MatchOutcome::NeedsReview { scored } => {
                    store.apply_outcome(runner.id, &scored, &MatchDisposition::NeedsReview)?;
                    shortlist = store.candidates_for(runner.id)?;
                }
            }
        }

        match prompt.choose(&runner, &shortlist)? {
            Command::Select(k) => {
                let chosen = &shortlist[k - 1];
                store.apply_outcome(
                    runner.id,
                    &to_scored(&shortlist),
                    &MatchDisposition::ManuallyMatched {
                        duv_id: chosen.person_id,
                        confidence: chosen.confidence,
                    },
                )?;
                info!(
                    runner = %runner.display_name(),
                    duv_id = chosen.person_id,
                    "manually matched"
                );
                return Ok(ReviewResult::Matched {
                    duv_id: chosen.person_id,
                    confidence: chosen.confidence,
                });
            }
            Command::Direct(duv_id) => {
                store.apply_outcome(
                    runner.id,
                    &to_scored(&shortlist),
                    &MatchDisposition::ManuallyMatched {
                        duv_id,
                        confidence: 1.0,
                    },
                )?;
                info!(
                    runner = %runner.display_name(),
                    duv_id,
                    "manually matched by direct id"
                );
                return Ok(ReviewResult::Matched {
                    duv_id,
                    confidence: 1.0,
                });
            }
            Command::Reject => {
                store.apply_outcome(runner.id, &[], &MatchDisposition::NoMatch)?;
                return Ok(ReviewResult::NoMatch);
            }
            Command::Skip => return Ok(ReviewResult::Skipped),
            Command::Quit => return Ok(ReviewResult::Quit),
            Command::Edit => {
                if edits_remaining == 0 {
                    return Ok(ReviewResult::Pending);
                }
                edits_remaining -= 1;

                let edit = prompt.edit_names(&runner)?;
                if edit.is_empty() {
                    return Ok(ReviewResult::Pending);
                }
                let firstname = edit.firstname.unwrap_or_else(|| runner.firstname.clone());
                let lastname = edit.lastname.unwrap_or_else(|| runner.lastname.clone());
                store.update_names(runner.id, &firstname, &lastname)?;
                runner = store.runner(runner.id)?;

                match engine.evaluate(&runner) {
                    MatchOutcome::NoCandidates => return Ok(ReviewResult::Pending),
                    MatchOutcome::AutoMatched { scored }
                    | MatchOutcome::NeedsReview { scored } => {
                        // Persist the refreshed shortlist, then loop back to
                        // the prompt; even an above-threshold hit goes past
                        // the operator here.
                        store.apply_outcome(
                            runner.id,
                            &scored,
                            &MatchDisposition::NeedsReview,
                        )?;
                    }
                }
            }
        }
    }
}

fn to_scored(shortlist: &[MatchCandidate]) -> Vec<ScoredCandidate> {
    shortlist
        .iter()
        .map(|c| ScoredCandidate {
            candidate: crate::core::RegistryCandidate {
                person_id: c.person_id,
                firstname: c.firstname.clone(),
                lastname: c.lastname.clone(),
                nationality: c.nationality.clone(),
                gender: c.gender.clone(),
                year_of_birth: c.year_of_birth,
                personal_best: c.personal_best.clone(),
            },
            confidence: c.confidence,
        })
        .collect()
}
