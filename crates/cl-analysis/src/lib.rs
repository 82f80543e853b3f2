//! cl-analysis: client-side normalization of cut-plan results.
//!
//! Takes an optimizer document as untrusted input and derives:
//! - a validated efficiency (`efficiency`)
//! - per-work-order rows (`resolve`, `work_order`)
//! - per-pool rows for pooled results (`pool`)
//! - repeated profile types (`duplicates`)
//! - stock-length and leftover summaries (`stock`, `waste`)
//!
//! Everything here is pure and deterministic. Nothing returns `Err`;
//! problems are carried in the returned values.

pub mod duplicates;
pub mod efficiency;
pub mod pool;
pub mod resolve;
pub mod stock;
pub mod waste;
pub mod work_order;

pub use duplicates::{DuplicateProfileReport, ProfileTally, detect_duplicate_profile_types};
pub use efficiency::{
    EfficiencyError, EfficiencyLimits, EfficiencyReport, LengthField, calculate_efficiency,
    check_cut,
};
pub use pool::{
    EfficiencySource, ProfilePoolAggregate, build_pool_rows, pool_work_orders,
    reported_efficiency,
};
pub use resolve::{ResolutionSource, WorkOrderResolution, resolve_work_order};
pub use stock::{StockLengthSummary, summarize_stock_lengths};
pub use waste::{WasteBreakdown, WasteBucket, WasteCategory, categorize_remnant, categorize_waste};
pub use work_order::{
    SkipReason, SkippedCut, WorkOrderAggregate, WorkOrderGroup, build_work_order_rows,
    group_by_work_order, partition_cuts, result_default_work_order,
};

use cl_plan::{AnalysisSettings, OptimizationResult};

/// Everything derived from one document, borrowing its cuts.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis<'a> {
    /// Recomputed over all cuts that pass the structural prefilter.
    pub overall: EfficiencyReport,
    pub reported_efficiency: Option<f64>,
    pub work_orders: Vec<WorkOrderAggregate<'a>>,
    /// Present only for pooled results.
    pub pools: Option<Vec<ProfilePoolAggregate<'a>>>,
    pub duplicates: DuplicateProfileReport,
    pub stock_lengths: Vec<StockLengthSummary>,
    pub waste: WasteBreakdown,
    pub skipped: Vec<SkippedCut>,
}

pub fn analyze<'a>(result: &'a OptimizationResult, settings: &AnalysisSettings) -> Analysis<'a> {
    let limits = EfficiencyLimits::from(settings);
    let (kept, skipped) = partition_cuts(&result.cuts);
    let default = result_default_work_order(result, settings);

    let overall = calculate_efficiency(kept.iter().copied(), &limits);
    let work_orders = group_by_work_order(kept.iter().copied(), default)
        .into_iter()
        .map(|group| WorkOrderAggregate::from_group(group, &limits))
        .collect();
    let pools = result
        .is_pooled()
        .then(|| build_pool_rows(result, settings));

    tracing::debug!(
        cuts = result.cuts.len(),
        skipped = skipped.len(),
        efficiency = overall.efficiency,
        "analysis complete"
    );

    Analysis {
        overall,
        reported_efficiency: result.efficiency.filter(|v| v.is_finite()),
        work_orders,
        pools,
        duplicates: detect_duplicate_profile_types(&result.cuts),
        stock_lengths: summarize_stock_lengths(kept.iter().copied(), &limits),
        waste: categorize_waste(kept.iter().copied(), settings),
        skipped,
    }
}
