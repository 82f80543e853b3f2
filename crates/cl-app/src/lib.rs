//! Shared application service layer for cutlist.
//!
//! Both the CLI and any other front-end go through this crate for
//! loading documents, running and caching analyses, and querying reports.

pub mod analysis_service;
pub mod document_service;
pub mod error;
pub mod query;

pub use analysis_service::{
    ANALYZER_VERSION, AnalysisOptions, AnalysisRequest, AnalysisResponse, ReportMemo, analyze,
    ensure_report, ensure_report_with_memo, list_reports, load_report,
};
pub use document_service::{
    DocumentSummary, check_settings, inspect, load_result, load_settings, save_result,
    summarize_document,
};
pub use error::{AppError, AppResult};
pub use cl_results::{AnalysisReport, ReportManifest};
pub use query::{
    ReportSummary, find_work_order, low_efficiency_rows, summarize_report, work_order_rows_csv,
};
