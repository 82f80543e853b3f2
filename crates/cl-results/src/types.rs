//! Report data types.

use cl_analysis::{
    Analysis, DuplicateProfileReport, EfficiencyReport, EfficiencySource, ProfilePoolAggregate,
    SkippedCut, StockLengthSummary, WasteBreakdown, WorkOrderAggregate,
};
use cl_core::{LengthUnit, Real, WorkOrderId, WorkOrderKey, round2};
use cl_plan::DocumentIssue;
use serde::{Deserialize, Serialize};

pub type ReportId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportManifest {
    pub report_id: ReportId,
    /// Path of the analyzed document, as given.
    pub source: String,
    pub timestamp: String,
    pub analyzer_version: String,
    pub cut_count: usize,
    pub efficiency: Real,
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderRow {
    pub work_order_id: WorkOrderId,
    pub key: WorkOrderKey,
    pub defaulted: bool,
    pub stock_count: usize,
    pub total_segments: u64,
    pub efficiency: Real,
    pub efficiency_report: EfficiencyReport,
    pub cut_ids: Vec<String>,
}

impl From<&WorkOrderAggregate<'_>> for WorkOrderRow {
    fn from(row: &WorkOrderAggregate<'_>) -> Self {
        Self {
            work_order_id: row.work_order_id.clone(),
            key: row.key.clone(),
            defaulted: row.defaulted,
            stock_count: row.stock_count,
            total_segments: row.total_segments,
            efficiency: row.efficiency,
            efficiency_report: row.efficiency_report.clone(),
            cut_ids: row.cut_ids().map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolRow {
    pub pool_key: String,
    pub profile_type: String,
    pub work_order_count: usize,
    pub work_order_ids: Vec<WorkOrderId>,
    pub mixed_cuts: usize,
    pub stock_count: usize,
    pub total_segments: u64,
    pub efficiency: Real,
    pub efficiency_source: EfficiencySource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency_report: Option<EfficiencyReport>,
    pub cut_ids: Vec<String>,
}

impl From<&ProfilePoolAggregate<'_>> for PoolRow {
    fn from(row: &ProfilePoolAggregate<'_>) -> Self {
        Self {
            pool_key: row.pool_key.clone(),
            profile_type: row.profile_type.clone(),
            work_order_count: row.work_order_count,
            work_order_ids: row.work_order_ids.clone(),
            mixed_cuts: row.mixed_cuts,
            stock_count: row.stock_count,
            total_segments: row.total_segments,
            efficiency: row.efficiency,
            efficiency_source: row.efficiency_source,
            efficiency_report: row.efficiency_report.clone(),
            cut_ids: row.cuts.iter().map(|c| c.id.clone()).collect(),
        }
    }
}

/// Overall totals converted to metres for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricTotals {
    pub stock_m: Real,
    pub used_m: Real,
    pub waste_m: Real,
}

impl MetricTotals {
    pub fn from_report(report: &EfficiencyReport, unit: LengthUnit) -> Self {
        let metres = |v: Real| round2(unit.to_meters(v));
        Self {
            stock_m: metres(report.total_stock_length),
            used_m: metres(report.total_used_length),
            waste_m: metres(report.total_waste),
        }
    }
}

/// Owned snapshot of one analysis, suitable for storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub length_unit: LengthUnit,
    pub cut_count: usize,
    pub overall: EfficiencyReport,
    pub totals_m: MetricTotals,
    /// What the optimizer claimed, when it claimed anything usable.
    pub reported_efficiency: Option<Real>,
    /// Recomputed minus reported, in percentage points.
    pub efficiency_delta: Option<Real>,
    pub work_orders: Vec<WorkOrderRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pools: Option<Vec<PoolRow>>,
    pub duplicates: DuplicateProfileReport,
    pub stock_lengths: Vec<StockLengthSummary>,
    pub waste: WasteBreakdown,
    pub skipped: Vec<SkippedCut>,
    pub issues: Vec<DocumentIssue>,
}

impl AnalysisReport {
    pub fn from_analysis(
        analysis: &Analysis<'_>,
        cut_count: usize,
        issues: Vec<DocumentIssue>,
        unit: LengthUnit,
    ) -> Self {
        let efficiency_delta = analysis
            .reported_efficiency
            .map(|reported| round2(analysis.overall.efficiency - reported));

        Self {
            length_unit: unit,
            cut_count,
            overall: analysis.overall.clone(),
            totals_m: MetricTotals::from_report(&analysis.overall, unit),
            reported_efficiency: analysis.reported_efficiency,
            efficiency_delta,
            work_orders: analysis.work_orders.iter().map(WorkOrderRow::from).collect(),
            pools: analysis
                .pools
                .as_ref()
                .map(|rows| rows.iter().map(PoolRow::from).collect()),
            duplicates: analysis.duplicates.clone(),
            stock_lengths: analysis.stock_lengths.clone(),
            waste: analysis.waste.clone(),
            skipped: analysis.skipped.clone(),
            issues,
        }
    }

    pub fn is_pooled(&self) -> bool {
        self.pools.is_some()
    }

    pub fn work_order(&self, key: &str) -> Option<&WorkOrderRow> {
        self.work_orders.iter().find(|row| row.key.as_str() == key)
    }
}
