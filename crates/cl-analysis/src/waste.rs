//! Leftover classification.
//!
//! A bar's remaining length is either nothing, scrap, or a remnant long
//! enough to go back on the rack. Only cuts that pass [`check_cut`] are
//! classified.

use cl_core::{Real, clamp_percent, percent_of, round2};
use cl_plan::{AnalysisSettings, CutRecord};
use serde::{Deserialize, Serialize};

use crate::efficiency::{EfficiencyLimits, check_cut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WasteCategory {
    None,
    Scrap,
    Reusable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WasteBucket {
    pub count: usize,
    pub total_length: Real,
}

impl WasteBucket {
    fn add(&mut self, length: Real) {
        self.count += 1;
        self.total_length += length;
    }

    fn rounded(self) -> Self {
        Self {
            total_length: round2(self.total_length),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WasteBreakdown {
    pub none: WasteBucket,
    pub scrap: WasteBucket,
    pub reusable: WasteBucket,
    pub total_waste: Real,
    /// Waste over classified stock, in percent.
    pub waste_percentage: Real,
}

impl WasteBreakdown {
    pub fn bucket(&self, category: WasteCategory) -> &WasteBucket {
        match category {
            WasteCategory::None => &self.none,
            WasteCategory::Scrap => &self.scrap,
            WasteCategory::Reusable => &self.reusable,
        }
    }
}

pub fn categorize_remnant(remaining: Real, settings: &AnalysisSettings) -> WasteCategory {
    if remaining <= settings.conservation_tolerance {
        WasteCategory::None
    } else if remaining < settings.reusable_remnant_min {
        WasteCategory::Scrap
    } else {
        WasteCategory::Reusable
    }
}

pub fn categorize_waste<'a, I>(cuts: I, settings: &AnalysisSettings) -> WasteBreakdown
where
    I: IntoIterator<Item = &'a CutRecord>,
{
    let limits = EfficiencyLimits::from(settings);
    let mut breakdown = WasteBreakdown::default();
    let mut stock = 0.0;

    for cut in cuts {
        if check_cut(cut, &limits).is_err() {
            continue;
        }
        let remaining = cut.remaining_length;
        stock += cut.stock_length;
        breakdown.total_waste += remaining;
        match categorize_remnant(remaining, settings) {
            WasteCategory::None => breakdown.none.add(remaining),
            WasteCategory::Scrap => breakdown.scrap.add(remaining),
            WasteCategory::Reusable => breakdown.reusable.add(remaining),
        }
    }

    breakdown.waste_percentage = percent_of(breakdown.total_waste, stock)
        .map(|pct| clamp_percent(round2(pct)))
        .unwrap_or(0.0);
    breakdown.total_waste = round2(breakdown.total_waste);
    breakdown.none = breakdown.none.rounded();
    breakdown.scrap = breakdown.scrap.rounded();
    breakdown.reusable = breakdown.reusable.rounded();
    breakdown
}
