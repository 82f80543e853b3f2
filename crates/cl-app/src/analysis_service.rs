//! Analysis execution and report caching service.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

use cl_plan::{AnalysisSettings, OptimizationResult};
use cl_results::{AnalysisReport, ReportId, ReportManifest, ReportStore, compute_report_id};
use tracing::{debug, info};

use crate::document_service;
use crate::error::AppResult;

/// Version stamped into report ids and manifests.
pub const ANALYZER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options for running an analysis.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub use_cache: bool,
    pub analyzer_version: String,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            analyzer_version: ANALYZER_VERSION.to_string(),
        }
    }
}

/// Request to analyze one document.
pub struct AnalysisRequest<'a> {
    pub document_path: &'a Path,
    pub settings_path: Option<&'a Path>,
    pub options: AnalysisOptions,
}

#[derive(Debug, Clone)]
pub struct AnalysisResponse {
    pub report_id: ReportId,
    pub manifest: ReportManifest,
    pub report: AnalysisReport,
    pub loaded_from_cache: bool,
}

/// Analyze a document in memory. Pure and deterministic.
pub fn analyze(result: &OptimizationResult, settings: &AnalysisSettings) -> AnalysisReport {
    let analysis = cl_analysis::analyze(result, settings);
    AnalysisReport::from_analysis(
        &analysis,
        result.cuts.len(),
        document_service::inspect(result),
        settings.length_unit,
    )
}

/// In-memory reports keyed by report id.
///
/// Identical document, settings and version map to the same id, so a hit
/// returns exactly the report a fresh analysis would produce.
#[derive(Debug, Default)]
pub struct ReportMemo {
    reports: HashMap<ReportId, AnalysisReport>,
    hits: usize,
}

impl ReportMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the report and whether it came from the memo.
    pub fn get_or_analyze(
        &mut self,
        result: &OptimizationResult,
        settings: &AnalysisSettings,
        analyzer_version: &str,
    ) -> (ReportId, &AnalysisReport, bool) {
        let report_id = compute_report_id(result, settings, analyzer_version);
        match self.reports.entry(report_id.clone()) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                debug!(report_id = %report_id, "report memo hit");
                (report_id, entry.into_mut(), true)
            }
            Entry::Vacant(entry) => (report_id, entry.insert(analyze(result, settings)), false),
        }
    }

    pub fn get(&self, report_id: &str) -> Option<&AnalysisReport> {
        self.reports.get(report_id)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn clear(&mut self) {
        self.reports.clear();
        self.hits = 0;
    }
}

/// Analyze a document, reusing a stored report when one exists.
pub fn ensure_report(request: &AnalysisRequest) -> AppResult<AnalysisResponse> {
    ensure_report_with_memo(request, None)
}

/// Like [`ensure_report`], consulting an in-memory memo before analyzing.
pub fn ensure_report_with_memo(
    request: &AnalysisRequest,
    memo: Option<&mut ReportMemo>,
) -> AppResult<AnalysisResponse> {
    let result = document_service::load_result(request.document_path)?;
    let settings = document_service::load_settings(request.settings_path)?;

    let report_id = compute_report_id(&result, &settings, &request.options.analyzer_version);
    let store = ReportStore::for_source(request.document_path)?;

    if request.options.use_cache && store.has_report(&report_id) {
        let manifest = store.load_manifest(&report_id)?;
        let report = store.load_report(&report_id)?;
        info!(report_id = %report_id, "loaded cached report");
        return Ok(AnalysisResponse {
            report_id,
            manifest,
            report,
            loaded_from_cache: true,
        });
    }

    let report = match memo {
        Some(memo) => {
            let (_, report, _) =
                memo.get_or_analyze(&result, &settings, &request.options.analyzer_version);
            report.clone()
        }
        None => analyze(&result, &settings),
    };

    let manifest = ReportManifest {
        report_id: report_id.clone(),
        source: request.document_path.display().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        analyzer_version: request.options.analyzer_version.clone(),
        cut_count: report.cut_count,
        efficiency: report.overall.efficiency,
        is_valid: report.overall.is_valid,
    };
    store.save_report(&manifest, &report)?;
    info!(
        report_id = %report_id,
        efficiency = report.overall.efficiency,
        valid = report.overall.is_valid,
        "saved report"
    );

    Ok(AnalysisResponse {
        report_id,
        manifest,
        report,
        loaded_from_cache: false,
    })
}

/// Saved reports for a document, most recent first.
pub fn list_reports(document_path: &Path) -> AppResult<Vec<ReportManifest>> {
    let store = ReportStore::for_source(document_path)?;

    let mut reports = store.list_reports(&document_path.display().to_string())?;
    reports.reverse();
    Ok(reports)
}

/// Load a specific report.
pub fn load_report(
    document_path: &Path,
    report_id: &str,
) -> AppResult<(ReportManifest, AnalysisReport)> {
    let store = ReportStore::for_source(document_path)?;

    let manifest = store.load_manifest(report_id)?;
    let report = store.load_report(report_id)?;

    Ok((manifest, report))
}
