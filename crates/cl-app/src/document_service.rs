//! Document loading, saving, checks, and introspection.

use std::path::Path;

use cl_analysis::{pool_work_orders, reported_efficiency};
use cl_plan::{AnalysisSettings, DocumentIssue, OptimizationResult};

use crate::error::{AppError, AppResult};

/// Summary of a document for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    pub cut_count: usize,
    pub segment_count: usize,
    pub piece_count: u64,
    pub pooled: bool,
    pub algorithm: Option<String>,
    pub reported_efficiency: Option<f64>,
    /// Distinct work orders named anywhere in the document.
    pub work_order_count: usize,
    pub issues: Vec<DocumentIssue>,
}

/// Load an optimizer result from a JSON file.
pub fn load_result(path: &Path) -> AppResult<OptimizationResult> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::DocumentRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let result = cl_plan::parse_result_json(&content)
        .map_err(|e| AppError::Document(format!("Failed to parse {}: {}", path.display(), e)))?;

    Ok(result)
}

/// Save an optimizer result as pretty JSON.
pub fn save_result(path: &Path, result: &OptimizationResult) -> AppResult<()> {
    let content = serde_json::to_string_pretty(result)
        .map_err(|e| AppError::Document(format!("Failed to serialize result: {}", e)))?;

    std::fs::write(path, content).map_err(|e| AppError::DocumentWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Load settings from a file, or fall back to defaults.
pub fn load_settings(path: Option<&Path>) -> AppResult<AnalysisSettings> {
    match path {
        Some(path) => cl_plan::load_settings(path)
            .map_err(|e| AppError::Settings(format!("{}: {}", path.display(), e))),
        None => Ok(AnalysisSettings::default()),
    }
}

pub fn check_settings(settings: &AnalysisSettings) -> AppResult<()> {
    cl_plan::validate_settings(settings)?;
    Ok(())
}

pub fn inspect(result: &OptimizationResult) -> Vec<DocumentIssue> {
    cl_plan::inspect_document(result)
}

pub fn summarize_document(result: &OptimizationResult) -> DocumentSummary {
    let segment_work_orders = result.cuts.iter().flat_map(|cut| {
        cut.segments
            .iter()
            .filter_map(|s| s.work_order())
            .chain(cut.work_order_id.iter())
    });
    let mut keys: Vec<_> = segment_work_orders
        .chain(pool_work_orders(&result.cuts).iter())
        .filter(|id| !id.is_mixed_sentinel())
        .map(|id| id.key())
        .collect();
    keys.sort();
    keys.dedup();

    DocumentSummary {
        cut_count: result.cuts.len(),
        segment_count: result.cuts.iter().map(|c| c.segments.len()).sum(),
        piece_count: result.cuts.iter().map(|c| c.piece_count()).sum(),
        pooled: result.is_pooled(),
        algorithm: result.algorithm.clone(),
        reported_efficiency: result
            .efficiency
            .filter(|v| v.is_finite())
            .map(|_| reported_efficiency(result)),
        work_order_count: keys.len(),
        issues: inspect(result),
    }
}
