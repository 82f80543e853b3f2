//! Per-work-order aggregation of an optimization result.

use std::collections::HashMap;

use cl_core::{Real, WorkOrderId, WorkOrderKey};
use cl_plan::{AnalysisSettings, CutRecord, OptimizationResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::efficiency::{EfficiencyLimits, EfficiencyReport, calculate_efficiency};
use crate::resolve::resolve_work_order;

/// Why a cut was left out before grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    StockLengthNotFinite,
    UsedLengthNotFinite,
    RemainingLengthNotFinite,
    SegmentCountNotFinite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCut {
    pub cut_id: String,
    pub reason: SkipReason,
}

fn skip_reason(cut: &CutRecord) -> SkipReason {
    if !cut.stock_length.is_finite() {
        SkipReason::StockLengthNotFinite
    } else if !cut.used_length.is_finite() {
        SkipReason::UsedLengthNotFinite
    } else if !cut.remaining_length.is_finite() {
        SkipReason::RemainingLengthNotFinite
    } else {
        SkipReason::SegmentCountNotFinite
    }
}

/// Structural prefilter: split cuts into groupable ones and skipped ones.
pub fn partition_cuts(cuts: &[CutRecord]) -> (Vec<&CutRecord>, Vec<SkippedCut>) {
    let mut kept = Vec::with_capacity(cuts.len());
    let mut skipped = Vec::new();
    for cut in cuts {
        if cut.is_structurally_sound() {
            kept.push(cut);
            continue;
        }
        let reason = skip_reason(cut);
        debug!(cut_id = %cut.id, ?reason, "cut skipped before grouping");
        skipped.push(SkippedCut {
            cut_id: cut.id.clone(),
            reason,
        });
    }
    (kept, skipped)
}

/// Segment count of one cut as a whole number. Non-finite or negative
/// metadata counts as zero.
pub(crate) fn segments_of(cut: &CutRecord) -> u64 {
    let count = cut.segment_count();
    if count.is_finite() && count > 0.0 {
        count.round() as u64
    } else {
        0
    }
}

/// Segment total over a set of cuts, saturating at `u64::MAX`.
pub(crate) fn total_segments(cuts: &[&CutRecord]) -> u64 {
    cuts.iter()
        .fold(0_u64, |total, cut| total.saturating_add(segments_of(cut)))
}

/// Cuts sharing one resolved work order.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkOrderGroup<'a> {
    /// Id of the first cut that produced this key.
    pub work_order_id: WorkOrderId,
    pub key: WorkOrderKey,
    /// Nothing named a work order; grouped under the sentinel.
    pub defaulted: bool,
    pub cuts: Vec<&'a CutRecord>,
}

/// Group cuts by resolved work order, in order of first appearance.
pub fn group_by_work_order<'a, I>(
    cuts: I,
    result_default: Option<&WorkOrderId>,
) -> Vec<WorkOrderGroup<'a>>
where
    I: IntoIterator<Item = &'a CutRecord>,
{
    let mut index: HashMap<WorkOrderKey, usize> = HashMap::new();
    let mut groups: Vec<WorkOrderGroup<'a>> = Vec::new();

    for cut in cuts {
        let resolution = resolve_work_order(cut, result_default);
        let defaulted = resolution.is_defaulted();
        let id = resolution.into_id();
        let key = id.key();
        match index.get(&key) {
            Some(&slot) => groups[slot].cuts.push(cut),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(WorkOrderGroup {
                    work_order_id: id,
                    key,
                    defaulted,
                    cuts: vec![cut],
                });
            }
        }
    }

    groups
}

/// One display row per work order.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkOrderAggregate<'a> {
    pub work_order_id: WorkOrderId,
    pub key: WorkOrderKey,
    pub defaulted: bool,
    pub stock_count: usize,
    pub total_segments: u64,
    /// Validated efficiency; 0 when the group's report is invalid.
    pub efficiency: Real,
    pub efficiency_report: EfficiencyReport,
    pub cuts: Vec<&'a CutRecord>,
}

impl<'a> WorkOrderAggregate<'a> {
    pub fn from_group(group: WorkOrderGroup<'a>, limits: &EfficiencyLimits) -> Self {
        let efficiency_report = calculate_efficiency(group.cuts.iter().copied(), limits);
        let efficiency = if efficiency_report.is_valid {
            efficiency_report.efficiency
        } else {
            0.0
        };
        Self {
            work_order_id: group.work_order_id,
            key: group.key,
            defaulted: group.defaulted,
            stock_count: group.cuts.len(),
            total_segments: total_segments(&group.cuts),
            efficiency,
            efficiency_report,
            cuts: group.cuts,
        }
    }

    pub fn cut_ids(&self) -> impl Iterator<Item = &str> {
        self.cuts.iter().map(|c| c.id.as_str())
    }
}

/// Result-level default: the document's own, else the configured one.
pub fn result_default_work_order<'a>(
    result: &'a OptimizationResult,
    settings: &'a AnalysisSettings,
) -> Option<&'a WorkOrderId> {
    result
        .work_order_id
        .as_ref()
        .or(settings.default_work_order.as_ref())
}

/// Build the per-work-order rows of a result. Every group is emitted,
/// including groups whose efficiency could not be validated.
pub fn build_work_order_rows<'a>(
    result: &'a OptimizationResult,
    settings: &AnalysisSettings,
) -> Vec<WorkOrderAggregate<'a>> {
    let limits = EfficiencyLimits::from(settings);
    let (kept, _skipped) = partition_cuts(&result.cuts);
    let default = result_default_work_order(result, settings);

    group_by_work_order(kept, default)
        .into_iter()
        .map(|group| WorkOrderAggregate::from_group(group, &limits))
        .collect()
}
