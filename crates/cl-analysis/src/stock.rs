//! Per-stock-length summary.

use std::collections::BTreeMap;

use cl_core::Real;
use cl_plan::CutRecord;
use serde::{Deserialize, Serialize};

use crate::efficiency::{EfficiencyLimits, calculate_efficiency};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLengthSummary {
    pub stock_length: Real,
    pub bar_count: usize,
    pub piece_count: u64,
    /// Validated totals; rejected bars count in `bar_count` only.
    pub total_used: Real,
    pub total_waste: Real,
    pub efficiency: Real,
    pub is_valid: bool,
}

/// Bucket key: stock length in hundredths.
fn bucket(stock_length: Real) -> i64 {
    (stock_length * 100.0).round() as i64
}

/// Group cuts by stock length, shortest first. Only finite, positive
/// lengths within the overflow guard are summarized.
pub fn summarize_stock_lengths<'a, I>(
    cuts: I,
    limits: &EfficiencyLimits,
) -> Vec<StockLengthSummary>
where
    I: IntoIterator<Item = &'a CutRecord>,
{
    let mut buckets: BTreeMap<i64, Vec<&CutRecord>> = BTreeMap::new();
    for cut in cuts {
        let length = cut.stock_length;
        if length.is_finite() && length > 0.0 && length <= limits.overflow_guard {
            buckets.entry(bucket(length)).or_default().push(cut);
        }
    }

    buckets
        .into_iter()
        .map(|(key, bars)| {
            let report = calculate_efficiency(bars.iter().copied(), limits);
            StockLengthSummary {
                stock_length: key as Real / 100.0,
                bar_count: bars.len(),
                piece_count: bars.iter().map(|c| c.piece_count()).sum(),
                total_used: report.total_used_length,
                total_waste: report.total_waste,
                efficiency: report.efficiency,
                is_valid: report.is_valid,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cl_plan::Segment;

    #[test]
    fn groups_by_length_ascending() {
        let cuts = vec![
            CutRecord::new("a", 6500.0, 6000.0, 500.0).with_segment(Segment::new(2000.0, 3)),
            CutRecord::new("b", 6000.0, 5500.0, 500.0).with_segment(Segment::new(1100.0, 5)),
            CutRecord::new("c", 6000.0, 6000.0, 0.0).with_segment(Segment::new(3000.0, 2)),
            CutRecord::new("d", Real::NAN, 0.0, 0.0),
        ];
        let summary = summarize_stock_lengths(&cuts, &EfficiencyLimits::default());
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].stock_length, 6000.0);
        assert_eq!(summary[0].bar_count, 2);
        assert_eq!(summary[0].piece_count, 7);
        assert_eq!(summary[0].total_waste, 500.0);
        assert_eq!(summary[0].efficiency, 95.83);
        assert_eq!(summary[1].stock_length, 6500.0);
        assert_eq!(summary[1].piece_count, 3);
    }

    #[test]
    fn lengths_beyond_guard_are_left_out() {
        let cuts = vec![
            CutRecord::new("a", 6000.0, 6000.0, 0.0),
            CutRecord::new("huge", 1e300, 1e300, 0.0),
            CutRecord::new("larger", 1e308, 1e308, 0.0),
            CutRecord::new("edge", 1e6, 1e6, 0.0),
        ];
        let summary = summarize_stock_lengths(&cuts, &EfficiencyLimits::default());
        let lengths: Vec<Real> = summary.iter().map(|s| s.stock_length).collect();
        assert_eq!(lengths, vec![6000.0, 1e6]);
        assert!(summary.iter().all(|s| s.bar_count == 1 && s.is_valid));
    }
}
