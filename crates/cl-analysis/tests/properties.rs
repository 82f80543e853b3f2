use std::collections::{HashMap, HashSet};

use cl_analysis::*;
use cl_core::{WorkOrderId, within_abs};
use cl_plan::{AnalysisSettings, CutRecord, OptimizationResult, Segment, WorkOrderShare};
use proptest::prelude::*;

fn work_order() -> impl Strategy<Value = WorkOrderId> {
    prop_oneof![
        (1_i64..6).prop_map(WorkOrderId::Number),
        prop::sample::select(vec!["A", "B", "C", "5", "MIXED"]).prop_map(WorkOrderId::from),
    ]
}

/// A bar whose lengths balance exactly (integer millimetres).
fn sound_cut() -> impl Strategy<Value = (u32, u32, Option<WorkOrderId>, Option<WorkOrderId>, u8)> {
    (1_u32..=12_000)
        .prop_flat_map(|stock| (Just(stock), 0..=stock))
        .prop_flat_map(|(stock, used)| {
            (
                Just(stock),
                Just(used),
                prop::option::of(work_order()),
                prop::option::of(work_order()),
                0_u8..3,
            )
        })
}

fn build_cut(
    index: usize,
    (stock, used, seg_wo, cut_wo, pool): (u32, u32, Option<WorkOrderId>, Option<WorkOrderId>, u8),
) -> CutRecord {
    let stock = f64::from(stock);
    let used = f64::from(used);
    let mut segment = Segment::new(used.max(1.0), 1).of_profile(["L", "U", "Kutu"][index % 3]);
    segment.work_order_id = seg_wo;
    let mut cut = CutRecord::new(format!("cut-{index}"), stock, used, stock - used).with_segment(segment);
    cut.work_order_id = cut_wo;
    if pool > 0 {
        cut.pool_key = Some(format!("P{pool}"));
    }
    cut
}

fn sound_cuts(max: usize) -> impl Strategy<Value = Vec<CutRecord>> {
    prop::collection::vec(sound_cut(), 0..max).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, r)| build_cut(i, r))
            .collect()
    })
}

/// Any lengths at all, including NaN, infinities, negatives, and overflow.
fn wild_cut() -> impl Strategy<Value = CutRecord> {
    let length = prop_oneof![
        prop::num::f64::ANY,
        -10.0_f64..2.0e6,
        (0_u32..7000).prop_map(f64::from),
    ];
    (length.clone(), length.clone(), length)
        .prop_map(|(s, u, r)| CutRecord::new("wild", s, u, r))
}

proptest! {
    #[test]
    fn efficiency_is_always_bounded(cuts in prop::collection::vec(wild_cut(), 0..20)) {
        let report = calculate_efficiency(&cuts, &EfficiencyLimits::default());
        prop_assert!((0.0..=100.0).contains(&report.efficiency));
        prop_assert!(report.efficiency.is_finite());
    }

    #[test]
    fn valid_reports_imply_conservation(
        sound in sound_cuts(10),
        wild in prop::collection::vec(wild_cut(), 0..4),
    ) {
        let cuts: Vec<CutRecord> = sound.into_iter().chain(wild).collect();
        let limits = EfficiencyLimits::default();
        let report = calculate_efficiency(&cuts, &limits);
        if report.is_valid {
            for cut in &cuts {
                prop_assert!(within_abs(
                    cut.used_length + cut.remaining_length,
                    cut.stock_length,
                    limits.tolerance
                ));
            }
        }
    }

    #[test]
    fn sound_cuts_are_always_valid(cuts in sound_cuts(30)) {
        let report = calculate_efficiency(&cuts, &EfficiencyLimits::default());
        prop_assert!(report.is_valid, "errors: {:?}", report.errors);
        prop_assert_eq!(report.accepted_cuts, cuts.len());
    }

    #[test]
    fn work_order_rows_are_deterministic(cuts in sound_cuts(25)) {
        let result = OptimizationResult { cuts, ..Default::default() };
        let settings = AnalysisSettings::default();
        let first = build_work_order_rows(&result, &settings);
        let second = build_work_order_rows(&result, &settings);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_cut_lands_in_exactly_one_group(cuts in sound_cuts(40)) {
        let result = OptimizationResult { cuts, ..Default::default() };
        let rows = build_work_order_rows(&result, &AnalysisSettings::default());

        let mut seen: HashMap<&str, usize> = HashMap::new();
        for row in &rows {
            prop_assert_eq!(row.stock_count, row.cuts.len());
            for id in row.cut_ids() {
                *seen.entry(id).or_default() += 1;
            }
        }
        prop_assert_eq!(seen.len(), result.cuts.len());
        prop_assert!(seen.values().all(|&n| n == 1));

        let keys: HashSet<_> = rows.iter().map(|r| r.key.clone()).collect();
        prop_assert_eq!(keys.len(), rows.len());
    }

    #[test]
    fn pool_work_orders_never_double_count(
        cuts in sound_cuts(20),
        shares in prop::collection::vec(prop::collection::vec((work_order(), 1_u32..5), 0..4), 0..20),
    ) {
        let cuts: Vec<CutRecord> = cuts
            .into_iter()
            .zip(shares.into_iter().chain(std::iter::repeat(Vec::new())))
            .map(|(cut, entries)| {
                if entries.is_empty() {
                    cut
                } else {
                    cut.with_breakdown(
                        entries.into_iter().map(|(id, n)| WorkOrderShare::new(id, n)).collect(),
                    )
                }
            })
            .collect();
        let result = OptimizationResult { cuts, ..Default::default() };

        for row in build_pool_rows(&result, &AnalysisSettings::default()) {
            let distinct: HashSet<_> = row.work_order_ids.iter().map(|id| id.key()).collect();
            prop_assert_eq!(distinct.len(), row.work_order_ids.len());
            prop_assert_eq!(row.work_order_count, distinct.len());
        }
    }
}
