//! Error types for the cl-app service layer.

use std::path::PathBuf;

/// Application error type wrapping the backend crates' errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Document error: {0}")]
    Document(String),

    #[error("Failed to read document: {path}")]
    DocumentRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write document: {path}")]
    DocumentWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Report not found: {0}")]
    ReportNotFound(String),

    #[error("Work order not found: {0}")]
    WorkOrderNotFound(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<cl_plan::PlanError> for AppError {
    fn from(err: cl_plan::PlanError) -> Self {
        match err {
            cl_plan::PlanError::Validation(e) => AppError::Settings(e.to_string()),
            cl_plan::PlanError::Io(e) => AppError::Io(e),
            other => AppError::Document(other.to_string()),
        }
    }
}

impl From<cl_plan::ValidationError> for AppError {
    fn from(err: cl_plan::ValidationError) -> Self {
        AppError::Settings(err.to_string())
    }
}

impl From<cl_results::ResultsError> for AppError {
    fn from(err: cl_results::ResultsError) -> Self {
        match err {
            cl_results::ResultsError::ReportNotFound { report_id } => {
                AppError::ReportNotFound(report_id)
            }
            other => AppError::Results(other.to_string()),
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Export(err.to_string())
    }
}
