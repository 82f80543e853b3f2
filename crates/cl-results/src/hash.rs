//! Content-based hashing for report IDs.

use cl_plan::{AnalysisSettings, OptimizationResult};
use sha2::{Digest, Sha256};

/// Same document, same settings and same analyzer version give the same id.
pub fn compute_report_id(
    result: &OptimizationResult,
    settings: &AnalysisSettings,
    analyzer_version: &str,
) -> String {
    let mut hasher = Sha256::new();

    let result_json = serde_json::to_string(result).unwrap_or_default();
    hasher.update(result_json.as_bytes());

    let settings_json = serde_json::to_string(settings).unwrap_or_default();
    hasher.update(settings_json.as_bytes());

    hasher.update(analyzer_version.as_bytes());

    let digest = hasher.finalize();
    format!("{:x}", digest)
}
