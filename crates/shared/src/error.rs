use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad classification of a failure, as surfaced to the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    FailedPrecondition,
    NotImplemented,
    Storage,
    Validation,
}

/// A user-facing message paired with its classification. `Info` notices
/// carry no code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub code: Option<ErrorCode>,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.code.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("step {0} is outside 1..=6")]
pub struct StepOutOfRange(pub i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDomainError {
    #[error("unknown sector '{0}' (expected afolu, energy, waste or ipuu)")]
    UnknownSector(String),
    #[error("unknown section '{0}' (expected dashboard, btr-process, data or reports)")]
    UnknownSection(String),
    #[error("unknown report '{0}' (expected draft, progress or roadmap)")]
    UnknownReport(String),
    #[error("'{0}' is not a step number")]
    NotAStep(String),
    #[error(transparent)]
    StepOutOfRange(#[from] StepOutOfRange),
}

impl From<StepOutOfRange> for Notice {
    fn from(value: StepOutOfRange) -> Self {
        Notice::error(ErrorCode::Validation, value.to_string())
    }
}
