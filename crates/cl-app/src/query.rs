//! Query helpers over analysis reports.

use cl_core::WorkOrderId;
use cl_results::{AnalysisReport, WorkOrderRow};

use crate::error::{AppError, AppResult};

/// Headline figures of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub cut_count: usize,
    pub accepted_cuts: usize,
    pub skipped_cuts: usize,
    pub work_order_count: usize,
    pub pool_count: usize,
    pub efficiency: f64,
    pub reported_efficiency: Option<f64>,
    pub efficiency_delta: Option<f64>,
    pub is_valid: bool,
    pub error_count: usize,
    pub issue_count: usize,
}

pub fn summarize_report(report: &AnalysisReport) -> ReportSummary {
    ReportSummary {
        cut_count: report.cut_count,
        accepted_cuts: report.overall.accepted_cuts,
        skipped_cuts: report.skipped.len(),
        work_order_count: report.work_orders.len(),
        pool_count: report.pools.as_ref().map_or(0, Vec::len),
        efficiency: report.overall.efficiency,
        reported_efficiency: report.reported_efficiency,
        efficiency_delta: report.efficiency_delta,
        is_valid: report.overall.is_valid,
        error_count: report.overall.errors.len(),
        issue_count: report.issues.len(),
    }
}

/// Look up a work-order row by id as typed by a user (`"101"` finds `101`).
pub fn find_work_order<'a>(report: &'a AnalysisReport, id: &str) -> AppResult<&'a WorkOrderRow> {
    let key = WorkOrderId::from_text(id)
        .ok_or_else(|| AppError::InvalidInput("Work order id is blank".to_string()))?
        .key();
    report
        .work_order(key.as_str())
        .ok_or_else(|| AppError::WorkOrderNotFound(id.trim().to_string()))
}

/// Validated rows whose efficiency is below `threshold`, worst first.
pub fn low_efficiency_rows(report: &AnalysisReport, threshold: f64) -> Vec<&WorkOrderRow> {
    let mut rows: Vec<&WorkOrderRow> = report
        .work_orders
        .iter()
        .filter(|row| row.efficiency_report.is_valid && row.efficiency < threshold)
        .collect();
    rows.sort_by(|a, b| a.efficiency.total_cmp(&b.efficiency));
    rows
}

/// Work-order rows as CSV, one line per row.
pub fn work_order_rows_csv(report: &AnalysisReport) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "work_order_id",
        "stock_count",
        "total_segments",
        "efficiency",
        "is_valid",
        "defaulted",
        "cut_ids",
    ])?;

    for row in &report.work_orders {
        writer.write_record([
            row.work_order_id.to_string(),
            row.stock_count.to_string(),
            row.total_segments.to_string(),
            format!("{:.2}", row.efficiency),
            row.efficiency_report.is_valid.to_string(),
            row.defaulted.to_string(),
            row.cut_ids.join(" "),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AppError::Export(e.to_string()))
}
