//! Devotion workflow stage machine and orchestration.
//!
//! One run moves through five transitions in strict forward order:
//! `Init -> SummaryReady -> ReflectionCollected -> ContentReady ->
//! SongsReady -> Complete`. Each transition stores its artifact in the run's
//! session and reports to an observer; nothing advances past a halted lookup
//! or a failed collaborator call, and no stage retries automatically.

use crate::catalog::format_passage_list;
use crate::lm::TextGenerator;
use crate::lookup::{self, DevotionLookup};
use crate::reflect::ReflectionSource;
use crate::session::WorkflowSession;
use crate::songs::{SongSearch, SongSearchOutcome};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// Prompt templates loaded at compile time
const SUMMARY_PROMPT: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/summary.md"));
const AFFIRMATION_PRAYER_PROMPT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/affirmation_prayer.md"
));
const WORSHIP_SONGS_PROMPT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/worship_songs.md"
));

const SONG_SEARCH_QUERY: &str = "Christian worship songs";

/// Workflow stages in strict forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    SummaryReady,
    ReflectionCollected,
    ContentReady,
    SongsReady,
    Complete,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::SummaryReady => "summary_ready",
            Stage::ReflectionCollected => "reflection_collected",
            Stage::ContentReady => "content_ready",
            Stage::SongsReady => "songs_ready",
            Stage::Complete => "complete",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured workflow failures. None of these panic or retry.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("workflow is at stage '{actual}', expected '{expected}'")]
    OutOfOrder { expected: Stage, actual: Stage },
    #[error("reflection must be collected before content generation")]
    MissingReflection,
    #[error("devotion lookup halted the workflow: {message}")]
    LookupHalted { message: String },
    #[error("stage '{stage}' failed: {reason}")]
    External { stage: Stage, reason: anyhow::Error },
}

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    Error,
}

/// Externally observable output of a completed (or aborted) run.
#[derive(Debug, Clone, Serialize)]
pub struct DevotionWorkflowResult {
    pub status: RunStatus,
    pub devotion_summary: Option<String>,
    pub user_input: Option<String>,
    pub prayer_response: Option<String>,
    pub worship_songs: Option<String>,
    pub error_message: Option<String>,
    pub timestamp: String,
}

/// Observability hook invoked at each transition.
///
/// The console transcript is one implementation; tests and `--json` runs use
/// the silent default.
pub trait WorkflowObserver {
    fn stage_started(&mut self, _stage: Stage) {}
    fn stage_completed(&mut self, _stage: Stage, _artifact: &str) {}
}

/// Observer that reports nothing.
#[derive(Debug, Default)]
pub struct SilentObserver;

impl WorkflowObserver for SilentObserver {}

/// Drives one devotion run through the stage machine.
///
/// The orchestrator owns its session and the captured artifacts; nothing is
/// shared process-wide, so concurrent runs stay independent.
pub struct WorkflowOrchestrator<'a> {
    catalog_path: PathBuf,
    date: NaiveDate,
    generator: &'a dyn TextGenerator,
    stage: Stage,
    session: WorkflowSession,
    worship_songs: Option<String>,
}

impl<'a> WorkflowOrchestrator<'a> {
    pub fn new(catalog_path: PathBuf, date: NaiveDate, generator: &'a dyn TextGenerator) -> Self {
        Self {
            catalog_path,
            date,
            generator,
            stage: Stage::Init,
            session: WorkflowSession::new(),
            worship_songs: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn session(&self) -> &WorkflowSession {
        &self.session
    }

    fn expect_stage(&self, expected: Stage) -> Result<(), WorkflowError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(WorkflowError::OutOfOrder {
                expected,
                actual: self.stage,
            })
        }
    }

    /// Init -> SummaryReady: look up the day's passages and summarize them.
    ///
    /// A halted lookup (no devotion scheduled, or a catalog error) stops the
    /// run before any generation call is made.
    pub fn summarize_devotion(
        &mut self,
        observer: &mut dyn WorkflowObserver,
    ) -> Result<(), WorkflowError> {
        self.expect_stage(Stage::Init)?;
        observer.stage_started(Stage::SummaryReady);

        let lookup = lookup::retrieve_for_date(&self.catalog_path, self.date);
        let passages = match lookup {
            DevotionLookup::Success { passages, .. } => passages,
            DevotionLookup::NoDevotionScheduled { message, .. }
            | DevotionLookup::Error { message, .. } => {
                return Err(WorkflowError::LookupHalted { message });
            }
        };

        let prompt = SUMMARY_PROMPT.replace("{passages}", &format_passage_list(&passages));
        let summary = self
            .generator
            .generate(&prompt)
            .map_err(|reason| WorkflowError::External {
                stage: Stage::SummaryReady,
                reason,
            })?;
        self.session.save_devotion_summary(&summary);
        self.stage = Stage::SummaryReady;
        observer.stage_completed(Stage::SummaryReady, &summary);
        Ok(())
    }

    /// SummaryReady -> ReflectionCollected: blocking human input.
    pub fn collect_reflection(
        &mut self,
        source: &mut dyn ReflectionSource,
        observer: &mut dyn WorkflowObserver,
    ) -> Result<(), WorkflowError> {
        self.expect_stage(Stage::SummaryReady)?;
        observer.stage_started(Stage::ReflectionCollected);

        let reflection = source
            .capture()
            .map_err(|reason| WorkflowError::External {
                stage: Stage::ReflectionCollected,
                reason,
            })?;
        self.session.save_user_reflection(&reflection);
        self.stage = Stage::ReflectionCollected;
        observer.stage_completed(Stage::ReflectionCollected, &reflection);
        Ok(())
    }

    /// ReflectionCollected -> ContentReady: affirmation plus prayer.
    ///
    /// Precondition: a reflection must be present. On violation this returns
    /// a failure signal and makes zero generation calls.
    pub fn process_reflection(
        &mut self,
        observer: &mut dyn WorkflowObserver,
    ) -> Result<(), WorkflowError> {
        self.expect_stage(Stage::ReflectionCollected)?;
        let Some(reflection) = self.session.user_reflection().map(str::to_string) else {
            return Err(WorkflowError::MissingReflection);
        };
        let summary = self.session.devotion_summary().unwrap_or_default().to_string();
        observer.stage_started(Stage::ContentReady);

        let prompt = AFFIRMATION_PRAYER_PROMPT
            .replace("{summary}", &summary)
            .replace("{reflection}", &reflection);
        let processed = self
            .generator
            .generate(&prompt)
            .map_err(|reason| WorkflowError::External {
                stage: Stage::ContentReady,
                reason,
            })?;
        self.session.save_processed_reflection(&processed);
        self.stage = Stage::ContentReady;
        observer.stage_completed(Stage::ContentReady, &processed);
        Ok(())
    }

    /// ContentReady -> SongsReady: generated recommendations, optionally
    /// embellished with live search hits.
    pub fn recommend_songs(
        &mut self,
        search: &dyn SongSearch,
        max_results: usize,
        observer: &mut dyn WorkflowObserver,
    ) -> Result<(), WorkflowError> {
        self.expect_stage(Stage::ContentReady)?;
        observer.stage_started(Stage::SongsReady);

        let prompt = WORSHIP_SONGS_PROMPT.replace("{context}", &self.session.render_context());
        let mut songs = self
            .generator
            .generate(&prompt)
            .map_err(|reason| WorkflowError::External {
                stage: Stage::SongsReady,
                reason,
            })?;

        match search.search(SONG_SEARCH_QUERY, max_results) {
            SongSearchOutcome::Hits(hits) if !hits.is_empty() => {
                songs.push_str("\n\nVerified links:\n");
                for hit in hits {
                    songs.push_str(&format!(
                        "- {} by {}: {}\n",
                        hit.title, hit.channel, hit.url
                    ));
                }
            }
            SongSearchOutcome::Hits(_) => {}
            SongSearchOutcome::Unavailable { error } => {
                tracing::warn!(error = %error, "song search unavailable, keeping generated list");
            }
        }

        self.worship_songs = Some(songs.clone());
        self.stage = Stage::SongsReady;
        observer.stage_completed(Stage::SongsReady, &songs);
        Ok(())
    }

    /// SongsReady -> Complete: assemble the final result.
    pub fn complete(
        &mut self,
        observer: &mut dyn WorkflowObserver,
    ) -> Result<DevotionWorkflowResult, WorkflowError> {
        self.expect_stage(Stage::SongsReady)?;
        observer.stage_started(Stage::Complete);
        self.stage = Stage::Complete;
        let result = DevotionWorkflowResult {
            status: RunStatus::Success,
            devotion_summary: self.session.devotion_summary().map(str::to_string),
            user_input: self.session.user_reflection().map(str::to_string),
            prayer_response: self.session.processed_reflection().map(str::to_string),
            worship_songs: self.worship_songs.clone(),
            error_message: None,
            timestamp: Local::now().to_rfc3339(),
        };
        observer.stage_completed(Stage::Complete, "workflow complete");
        Ok(result)
    }

    /// Drive all five transitions in order, converting any failure into an
    /// error result naming the failing stage.
    pub fn run(
        &mut self,
        source: &mut dyn ReflectionSource,
        search: &dyn SongSearch,
        max_results: usize,
        observer: &mut dyn WorkflowObserver,
    ) -> DevotionWorkflowResult {
        match self.run_stages(source, search, max_results, observer) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(stage = self.stage.as_str(), error = %err, "workflow aborted");
                self.failure_result(&err)
            }
        }
    }

    fn run_stages(
        &mut self,
        source: &mut dyn ReflectionSource,
        search: &dyn SongSearch,
        max_results: usize,
        observer: &mut dyn WorkflowObserver,
    ) -> Result<DevotionWorkflowResult, WorkflowError> {
        self.summarize_devotion(observer)?;
        self.collect_reflection(source, observer)?;
        self.process_reflection(observer)?;
        self.recommend_songs(search, max_results, observer)?;
        self.complete(observer)
    }

    fn failure_result(&self, err: &WorkflowError) -> DevotionWorkflowResult {
        DevotionWorkflowResult {
            status: RunStatus::Error,
            devotion_summary: self.session.devotion_summary().map(str::to_string),
            user_input: self.session.user_reflection().map(str::to_string),
            prayer_response: self.session.processed_reflection().map(str::to_string),
            worship_songs: self.worship_songs.clone(),
            error_message: Some(err.to_string()),
            timestamp: Local::now().to_rfc3339(),
        }
    }
}
