//! Per-run workflow session state.
//!
//! One session is owned by exactly one workflow run. Every mutation goes
//! through a named save operation that also appends one action-log entry;
//! the log is append-only history, never rewritten (re-saving a field
//! appends a second entry).

use chrono::Local;
use serde::Serialize;

pub const ACTOR_DEVOTION_STAGE: &str = "devotion-stage";
pub const ACTOR_USER: &str = "user";
pub const ACTOR_REFLECTION_STAGE: &str = "reflection-stage";
pub const ACTOR_PRAYER_STAGE: &str = "prayer-stage";

/// One audit entry in a session's action log.
#[derive(Debug, Clone, Serialize)]
pub struct ActionLogEntry {
    pub timestamp: String,
    pub actor: String,
    pub action: String,
}

/// Accumulated state for one devotion run.
#[derive(Debug, Serialize)]
pub struct WorkflowSession {
    created_at: String,
    devotion_summary: Option<String>,
    user_reflection: Option<String>,
    processed_reflection: Option<String>,
    prayer: Option<String>,
    action_log: Vec<ActionLogEntry>,
}

/// Stage completion flags derived from field nullability and log length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub devotion_retrieved: bool,
    pub user_reflected: bool,
    pub reflection_processed: bool,
    pub prayer_generated: bool,
    pub action_count: usize,
}

impl WorkflowSession {
    pub fn new() -> Self {
        Self {
            created_at: Local::now().to_rfc3339(),
            devotion_summary: None,
            user_reflection: None,
            processed_reflection: None,
            prayer: None,
            action_log: Vec::new(),
        }
    }

    pub fn save_devotion_summary(&mut self, summary: &str) {
        self.devotion_summary = Some(summary.to_string());
        self.log_action(
            ACTOR_DEVOTION_STAGE,
            "Retrieved and summarized devotion passages",
        );
    }

    pub fn save_user_reflection(&mut self, reflection: &str) {
        self.user_reflection = Some(reflection.to_string());
        self.log_action(ACTOR_USER, "Submitted personal reflection");
    }

    pub fn save_processed_reflection(&mut self, processed: &str) {
        self.processed_reflection = Some(processed.to_string());
        self.log_action(
            ACTOR_REFLECTION_STAGE,
            "Processed and acknowledged user reflection",
        );
    }

    #[allow(dead_code)]
    pub fn save_prayer(&mut self, prayer: &str) {
        self.prayer = Some(prayer.to_string());
        self.log_action(ACTOR_PRAYER_STAGE, "Generated personalized prayer");
    }

    pub fn devotion_summary(&self) -> Option<&str> {
        self.devotion_summary.as_deref()
    }

    pub fn user_reflection(&self) -> Option<&str> {
        self.user_reflection.as_deref()
    }

    pub fn processed_reflection(&self) -> Option<&str> {
        self.processed_reflection.as_deref()
    }

    #[allow(dead_code)]
    pub fn prayer(&self) -> Option<&str> {
        self.prayer.as_deref()
    }

    pub fn action_log(&self) -> &[ActionLogEntry] {
        &self.action_log
    }

    /// Render the full session as one document for prompt grounding.
    ///
    /// Section order and placeholder text are part of the contract with the
    /// generation prompts; do not reorder.
    pub fn render_context(&self) -> String {
        format!(
            "SESSION CONTEXT:\n\
             ================\n\
             \n\
             Devotion Summary:\n{}\n\
             \n\
             User's Personal Reflection:\n{}\n\
             \n\
             Processing Summary:\n{}\n\
             \n\
             Generated Prayer:\n{}\n",
            self.devotion_summary.as_deref().unwrap_or("Not yet retrieved"),
            self.user_reflection.as_deref().unwrap_or("Not yet submitted"),
            self.processed_reflection
                .as_deref()
                .unwrap_or("Not yet processed"),
            self.prayer.as_deref().unwrap_or("Not yet generated"),
        )
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            devotion_retrieved: self.devotion_summary.is_some(),
            user_reflected: self.user_reflection.is_some(),
            reflection_processed: self.processed_reflection.is_some(),
            prayer_generated: self.prayer.is_some(),
            action_count: self.action_log.len(),
        }
    }

    fn log_action(&mut self, actor: &str, action: &str) {
        self.action_log.push(ActionLogEntry {
            timestamp: Local::now().to_rfc3339(),
            actor: actor.to_string(),
            action: action.to_string(),
        });
    }
}

impl Default for WorkflowSession {
    fn default() -> Self {
        Self::new()
    }
}
