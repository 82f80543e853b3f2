//! Profile-pool aggregation for pooled optimization results.
//!
//! When the optimizer mixes work orders onto shared bars, each cut carries
//! a pool key and the per-work-order view no longer tells the whole story.
//! Pools are grouped as-is: no structural prefilter is applied here.

use std::collections::{HashMap, HashSet};

use cl_core::{DEFAULT_POOL_KEY, Real, UNKNOWN_PROFILE, WorkOrderId, WorkOrderKey, clamp_percent, round2};
use cl_plan::{AnalysisSettings, CutRecord, OptimizationResult, PoolEfficiencyMode};
use serde::{Deserialize, Serialize};

use crate::efficiency::{EfficiencyLimits, EfficiencyReport, calculate_efficiency};
use crate::work_order::total_segments;

/// Where a pool row's efficiency figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencySource {
    Reported,
    Recomputed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePoolAggregate<'a> {
    pub pool_key: String,
    pub profile_type: String,
    pub work_order_count: usize,
    /// Distinct contributing work orders, in order of first appearance.
    pub work_order_ids: Vec<WorkOrderId>,
    pub mixed_cuts: usize,
    pub stock_count: usize,
    pub total_segments: u64,
    pub efficiency: Real,
    pub efficiency_source: EfficiencySource,
    /// Present only when the figure was recomputed.
    pub efficiency_report: Option<EfficiencyReport>,
    pub cuts: Vec<&'a CutRecord>,
}

/// The optimizer's own efficiency, rounded and clamped; 0 when unusable.
pub fn reported_efficiency(result: &OptimizationResult) -> Real {
    match result.efficiency {
        Some(v) if v.is_finite() => clamp_percent(round2(v)),
        _ => 0.0,
    }
}

/// Distinct work orders contributing to a set of pooled cuts.
///
/// Cuts with a breakdown contribute every entry; other cuts contribute
/// their own id unless it is the `MIXED` marker.
pub fn pool_work_orders<'a, I>(cuts: I) -> Vec<WorkOrderId>
where
    I: IntoIterator<Item = &'a CutRecord>,
{
    let mut seen: HashSet<WorkOrderKey> = HashSet::new();
    let mut ordered = Vec::new();
    let mut note = |id: &WorkOrderId| {
        if seen.insert(id.key()) {
            ordered.push(id.clone());
        }
    };

    for cut in cuts {
        match &cut.work_order_breakdown {
            Some(shares) => shares
                .iter()
                .filter_map(|share| share.work_order_id.as_ref())
                .for_each(&mut note),
            None => {
                if let Some(id) = cut.work_order_id.as_ref().filter(|id| !id.is_mixed_sentinel()) {
                    note(id);
                }
            }
        }
    }

    ordered
}

fn group_by_pool(cuts: &[CutRecord]) -> Vec<(String, Vec<&CutRecord>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut pools: Vec<(String, Vec<&CutRecord>)> = Vec::new();
    for cut in cuts {
        let key = cut.pool_key.as_deref().unwrap_or(DEFAULT_POOL_KEY);
        match index.get(key) {
            Some(&slot) => pools[slot].1.push(cut),
            None => {
                index.insert(key, pools.len());
                pools.push((key.to_string(), vec![cut]));
            }
        }
    }
    pools
}

/// Build one row per pool key, in order of first appearance.
pub fn build_pool_rows<'a>(
    result: &'a OptimizationResult,
    settings: &AnalysisSettings,
) -> Vec<ProfilePoolAggregate<'a>> {
    let limits = EfficiencyLimits::from(settings);
    let reported = reported_efficiency(result);

    group_by_pool(&result.cuts)
        .into_iter()
        .map(|(pool_key, cuts)| {
            let profile_type = cuts
                .first()
                .and_then(|c| c.segments.first())
                .and_then(|s| s.profile_type.clone())
                .unwrap_or_else(|| UNKNOWN_PROFILE.to_string());
            let work_order_ids = pool_work_orders(cuts.iter().copied());

            let (efficiency, efficiency_source, efficiency_report) = match settings.pool_efficiency
            {
                PoolEfficiencyMode::Reported => (reported, EfficiencySource::Reported, None),
                PoolEfficiencyMode::Recomputed => {
                    let report = calculate_efficiency(cuts.iter().copied(), &limits);
                    let value = if report.is_valid { report.efficiency } else { 0.0 };
                    (value, EfficiencySource::Recomputed, Some(report))
                }
            };

            ProfilePoolAggregate {
                pool_key,
                profile_type,
                work_order_count: work_order_ids.len(),
                work_order_ids,
                mixed_cuts: cuts.iter().filter(|c| c.is_mixed()).count(),
                stock_count: cuts.len(),
                total_segments: total_segments(&cuts),
                efficiency,
                efficiency_source,
                efficiency_report,
                cuts,
            }
        })
        .collect()
}
