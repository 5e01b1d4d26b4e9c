use shared::{
    domain::Step,
    error::{ErrorCode, Notice},
};
use thiserror::Error;

pub const MISSING_FIELDS_MESSAGE: &str = "Please complete all required fields before proceeding.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("required field '{field}' of step {step} is empty")]
    MissingRequiredField { step: Step, field: String },
}

impl WorkflowError {
    pub fn code(&self) -> ErrorCode {
        match self {
            WorkflowError::MissingRequiredField { .. } => ErrorCode::FailedPrecondition,
        }
    }

    /// Identifier of the field the view should direct attention to.
    pub fn field(&self) -> &str {
        match self {
            WorkflowError::MissingRequiredField { field, .. } => field,
        }
    }

    pub fn notice(&self) -> Notice {
        match self {
            WorkflowError::MissingRequiredField { .. } => {
                Notice::error(self.code(), MISSING_FIELDS_MESSAGE)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("spreadsheet export is not implemented yet; all your data is saved and ready for export")]
    NotImplemented,
    #[error("spreadsheet export failed: {0:#}")]
    Failed(#[from] anyhow::Error),
}

impl ExportError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ExportError::NotImplemented => ErrorCode::NotImplemented,
            ExportError::Failed(_) => ErrorCode::Storage,
        }
    }

    pub fn notice(&self) -> Notice {
        Notice::error(self.code(), self.to_string())
    }
}
