//! Reflection capture collaborator: blocking free-text input.
//!
//! The workflow blocks here until the human signals completion; input ends
//! at the first empty line.

use anyhow::{Context, Result};
use std::io::{self, BufRead};

/// A capability that collects the user's personal reflection.
pub trait ReflectionSource {
    fn capture(&mut self) -> Result<String>;
}

/// Reads reflection text from stdin.
#[derive(Debug, Default)]
pub struct StdinReflection;

impl ReflectionSource for StdinReflection {
    fn capture(&mut self) -> Result<String> {
        eprintln!("Share your thoughts and reflections about today's devotion.");
        eprintln!("(Press Enter on an empty line to finish)\n");
        let stdin = io::stdin();
        read_reflection(&mut stdin.lock())
    }
}

/// Collect lines until the first empty line (or end of input).
fn read_reflection(reader: &mut impl BufRead) -> Result<String> {
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        let read = reader.read_line(&mut line).context("read reflection line")?;
        if read == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }
        lines.push(line.to_string());
    }
    Ok(lines.join("\n"))
}
