//! Generation collaborator: prompt in, generated text out.
//!
//! Rather than embedding API keys or a provider SDK, generation delegates to
//! a user-configured external command that reads the prompt on stdin and
//! writes the response to stdout (e.g. `claude --print`, `llm`, `ollama
//! run`, custom scripts). The workflow treats it as a blocking, potentially
//! failing call and never inspects the provider behind it.

use anyhow::{anyhow, Context, Result};
use std::env;
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Instant;

/// Default command when none is configured.
pub const DEFAULT_LM_COMMAND: &str = "claude --print";

/// Environment variable overriding the LM command.
pub const LM_COMMAND_ENV: &str = "DEVOTION_LM_COMMAND";

/// A capability that turns a prompt into generated text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// External LM command invoked with the prompt on stdin.
#[derive(Debug, Clone)]
pub struct LmCommand {
    command: String,
}

impl LmCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Resolve the command from flag, environment, or default, in that
    /// order.
    pub fn resolve(flag: Option<&str>) -> Self {
        if let Some(command) = flag {
            return Self::new(command);
        }
        if let Ok(command) = env::var(LM_COMMAND_ENV) {
            if !command.trim().is_empty() {
                return Self::new(command);
            }
        }
        Self::new(DEFAULT_LM_COMMAND)
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl TextGenerator for LmCommand {
    fn generate(&self, prompt: &str) -> Result<String> {
        let args = shell_words::split(&self.command)
            .with_context(|| format!("parse LM command: {}", self.command))?;
        if args.is_empty() {
            return Err(anyhow!("LM command is empty"));
        }

        let start = Instant::now();
        let mut child = Command::new(&args[0])
            .args(&args[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawn LM command: {}", args[0]))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .context("write prompt to LM stdin")?;
        }

        let output = child.wait_with_output().context("wait for LM command")?;
        let elapsed_ms = start.elapsed().as_millis();
        tracing::info!(
            elapsed_ms,
            prompt_bytes = prompt.len(),
            response_bytes = output.stdout.len(),
            "lm invoke complete"
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "LM command failed with status {}: {}",
                output.status,
                stderr.trim()
            ));
        }

        let text = String::from_utf8(output.stdout).context("decode LM stdout as UTF-8")?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("LM command produced no output"));
        }
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_flag() {
        let command = LmCommand::resolve(Some("my-lm --fast"));
        assert_eq!(command.command(), "my-lm --fast");
    }

    #[test]
    fn resolve_falls_back_to_default() {
        std::env::remove_var(LM_COMMAND_ENV);
        let command = LmCommand::resolve(None);
        assert_eq!(command.command(), DEFAULT_LM_COMMAND);
    }

    #[test]
    fn generate_pipes_prompt_through_command() {
        let generator = LmCommand::new("cat");
        let response = generator.generate("hello world").expect("run cat");
        assert_eq!(response, "hello world");
    }

    #[test]
    fn generate_reports_command_failure() {
        let generator = LmCommand::new("false");
        assert!(generator.generate("hello").is_err());
    }

    #[test]
    fn generate_rejects_empty_command() {
        let generator = LmCommand::new("");
        assert!(generator.generate("hello").is_err());
    }
}
