//! Error taxonomy of the behaviour layer.
//!
//! Nothing here ends the session: validation problems are shown inline,
//! submission failures fall back to e-mail, missing browser features are
//! skipped, and script errors reported by the shell are only logged.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    Submission,
    CapabilityUnavailable,
    Storage,
    Configuration,
    Script,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Submission => "SUBMISSION_ERROR",
            Self::CapabilityUnavailable => "CAPABILITY_UNAVAILABLE",
            Self::Storage => "STORAGE_ERROR",
            Self::Configuration => "CONFIG_ERROR",
            Self::Script => "SCRIPT_ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unavailable(feature: &str) -> Self {
        Self::new(
            ErrorKind::CapabilityUnavailable,
            format!("{feature} is not supported by this browser"),
        )
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

impl From<crate::form::SubmissionError> for AppError {
    fn from(e: crate::form::SubmissionError) -> Self {
        Self::new(ErrorKind::Submission, e.to_string())
    }
}

impl From<crate::capabilities::StorageError> for AppError {
    fn from(e: crate::capabilities::StorageError) -> Self {
        Self::new(ErrorKind::Storage, e.to_string())
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(e: crate::config::ConfigError) -> Self {
        Self::new(ErrorKind::Configuration, e.to_string())
    }
}

/// Top-level sink: every error that escapes a handler ends up here.
pub fn report(error: &AppError) {
    match error.kind {
        ErrorKind::Submission | ErrorKind::Script => {
            tracing::error!(code = error.code(), "{}", error.message);
        }
        ErrorKind::Storage | ErrorKind::Configuration => {
            tracing::warn!(code = error.code(), "{}", error.message);
        }
        ErrorKind::CapabilityUnavailable => {
            tracing::info!(code = error.code(), "{}", error.message);
        }
        ErrorKind::Validation => {
            tracing::debug!(code = error.code(), "{}", error.message);
        }
    }
}
