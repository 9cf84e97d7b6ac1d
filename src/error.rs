//! Unified error and diagnostic types used across all phases.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Parse,
    Config,
    Build,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Parse => write!(f, "Parse"),
            Phase::Config => write!(f, "Config"),
            Phase::Build => write!(f, "Build"),
        }
    }
}

/// A failure that prevents a run form from being produced at all.
#[derive(Debug, Clone, Error)]
#[error("[{phase}:{code}] {message}{}", at_step(.step_index))]
pub struct ResolverError {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    pub step_index: Option<usize>,
}

fn at_step(step_index: &Option<usize>) -> String {
    match step_index {
        Some(index) => format!(" (step {})", index + 1),
        None => String::new(),
    }
}

impl ResolverError {
    pub fn parse(code: &str, message: impl Into<String>) -> Self {
        ResolverError {
            code: code.into(),
            phase: Phase::Parse,
            message: message.into(),
            step_index: None,
        }
    }

    pub fn config(code: &str, message: impl Into<String>) -> Self {
        ResolverError {
            code: code.into(),
            phase: Phase::Config,
            message: message.into(),
            step_index: None,
        }
    }
}

/// A non-fatal finding recorded while building the run model.
///
/// The fragment it points at was skipped; the rest of the form is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: &'static str,
    pub message: String,
    pub step_index: Option<usize>,
    pub input: Option<String>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.step_index, &self.input) {
            (Some(step), Some(input)) => write!(
                f,
                "[{}] {} (step {}, input '{}')",
                self.code,
                self.message,
                step + 1,
                input
            ),
            (Some(step), None) => write!(f, "[{}] {} (step {})", self.code, self.message, step + 1),
            _ => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl From<Diagnostic> for ResolverError {
    fn from(d: Diagnostic) -> Self {
        ResolverError {
            code: d.code.to_string(),
            phase: Phase::Build,
            message: d.message,
            step_index: d.step_index,
        }
    }
}
