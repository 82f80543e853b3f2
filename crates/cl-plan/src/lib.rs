//! cl-plan: cut-plan document format, analysis settings, and validation.

mod lenient;
pub mod schema;
pub mod settings;
pub mod validate;

pub use schema::*;
pub use settings::{AnalysisSettings, PoolEfficiencyMode};
pub use validate::{DocumentIssue, ValidationError, inspect_document, validate_settings};

use std::path::Path;

pub type PlanResult<T> = Result<T, PlanError>;

#[derive(thiserror::Error, Debug)]
pub enum PlanError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported settings format: {path}")]
    UnsupportedFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_result_json(content: &str) -> PlanResult<OptimizationResult> {
    Ok(serde_json::from_str(content)?)
}

pub fn load_result_json(path: &Path) -> PlanResult<OptimizationResult> {
    let content = std::fs::read_to_string(path)?;
    parse_result_json(&content)
}

/// Load settings from YAML (`.yaml`/`.yml`) or JSON (`.json`).
pub fn load_settings(path: &Path) -> PlanResult<AnalysisSettings> {
    let content = std::fs::read_to_string(path)?;
    let settings: AnalysisSettings = match extension(path).as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        Some("json") => serde_json::from_str(&content)?,
        _ => {
            return Err(PlanError::UnsupportedFormat {
                path: path.display().to_string(),
            });
        }
    };
    validate_settings(&settings)?;
    Ok(settings)
}

pub fn save_settings_yaml(path: &Path, settings: &AnalysisSettings) -> PlanResult<()> {
    validate_settings(settings)?;
    let content = serde_yaml::to_string(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
