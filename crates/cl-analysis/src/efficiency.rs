//! Efficiency validation and recomputation.
//!
//! The optimizer reports its own efficiency, but that figure is not trusted
//! for display. This module recomputes utilization from the raw cut lengths:
//!
//! 1. each cut is checked for finite, in-range lengths,
//! 2. each structurally valid cut must conserve length
//!    (`used + remaining == stock` within tolerance),
//! 3. accepted cuts are summed and the ratio is taken,
//! 4. the totals are cross-checked and everything is rounded to 2 decimals.
//!
//! Problems never abort the computation. A rejected cut is recorded as an
//! [`EfficiencyError`] and left out of the totals.

use core::fmt;

use cl_core::{
    DEFAULT_CONSERVATION_TOL, DEFAULT_OVERFLOW_GUARD, Real, Tolerances, clamp_percent,
    nearly_equal, round2, within_abs,
};
use cl_plan::{AnalysisSettings, CutRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Numeric limits applied to every cut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EfficiencyLimits {
    /// Absolute slack allowed in `used + remaining == stock`.
    pub tolerance: Real,
    /// Any length above this is treated as corrupt.
    pub overflow_guard: Real,
}

impl Default for EfficiencyLimits {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_CONSERVATION_TOL,
            overflow_guard: DEFAULT_OVERFLOW_GUARD,
        }
    }
}

impl From<&AnalysisSettings> for EfficiencyLimits {
    fn from(settings: &AnalysisSettings) -> Self {
        Self {
            tolerance: settings.conservation_tolerance,
            overflow_guard: settings.overflow_guard,
        }
    }
}

/// Which length of a cut a problem refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthField {
    StockLength,
    UsedLength,
    RemainingLength,
}

impl fmt::Display for LengthField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StockLength => "stock length",
            Self::UsedLength => "used length",
            Self::RemainingLength => "remaining length",
        })
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EfficiencyError {
    #[error("Cut '{cut_id}': {field} is not a finite number")]
    NonFinite { cut_id: String, field: LengthField },

    #[error("Cut '{cut_id}': stock length {value} must be positive")]
    NonPositiveStock { cut_id: String, value: Real },

    #[error("Cut '{cut_id}': {field} {value} is negative")]
    Negative {
        cut_id: String,
        field: LengthField,
        value: Real,
    },

    #[error("Cut '{cut_id}': {field} {value} exceeds overflow guard {guard}")]
    Overflow {
        cut_id: String,
        field: LengthField,
        value: Real,
        guard: Real,
    },

    #[error(
        "Cut '{cut_id}': used {used} + remaining {remaining} does not equal stock {stock} (off by {difference})"
    )]
    ConservationViolated {
        cut_id: String,
        stock: Real,
        used: Real,
        remaining: Real,
        difference: Real,
    },

    #[error("No valid stock length left to compute efficiency from")]
    NoValidStock,

    #[error("Computed efficiency {value} is outside [0, 100]")]
    OutOfRange { value: Real },

    #[error("Totals do not balance: used {used} + waste {waste} does not equal stock {stock}")]
    TotalsMismatch { stock: Real, used: Real, waste: Real },
}

impl EfficiencyError {
    /// Cut the error refers to, if it is a per-cut error.
    pub fn cut_id(&self) -> Option<&str> {
        match self {
            Self::NonFinite { cut_id, .. }
            | Self::NonPositiveStock { cut_id, .. }
            | Self::Negative { cut_id, .. }
            | Self::Overflow { cut_id, .. }
            | Self::ConservationViolated { cut_id, .. } => Some(cut_id),
            Self::NoValidStock | Self::OutOfRange { .. } | Self::TotalsMismatch { .. } => None,
        }
    }
}

/// Outcome of an efficiency recomputation. All figures are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyReport {
    /// Used over stock, in percent, always within [0, 100].
    pub efficiency: Real,
    pub total_stock_length: Real,
    pub total_used_length: Real,
    pub total_waste: Real,
    /// Cuts that entered the totals.
    pub accepted_cuts: usize,
    /// True exactly when no error was recorded.
    pub is_valid: bool,
    pub errors: Vec<EfficiencyError>,
}

impl EfficiencyReport {
    /// An empty set of cuts is not an error.
    pub fn empty() -> Self {
        Self {
            efficiency: 0.0,
            total_stock_length: 0.0,
            total_used_length: 0.0,
            total_waste: 0.0,
            accepted_cuts: 0,
            is_valid: true,
            errors: Vec::new(),
        }
    }

    fn invalid(errors: Vec<EfficiencyError>) -> Self {
        Self {
            is_valid: false,
            errors,
            ..Self::empty()
        }
    }

    /// Errors that name a cut.
    pub fn rejected_cut_ids(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().filter_map(EfficiencyError::cut_id)
    }
}

/// Check one cut against the structural rules and the conservation law.
pub fn check_cut(cut: &CutRecord, limits: &EfficiencyLimits) -> Result<(), EfficiencyError> {
    let lengths = [
        (LengthField::StockLength, cut.stock_length),
        (LengthField::UsedLength, cut.used_length),
        (LengthField::RemainingLength, cut.remaining_length),
    ];

    for (field, value) in lengths {
        if !value.is_finite() {
            return Err(EfficiencyError::NonFinite {
                cut_id: cut.id.clone(),
                field,
            });
        }
    }

    if cut.stock_length <= 0.0 {
        return Err(EfficiencyError::NonPositiveStock {
            cut_id: cut.id.clone(),
            value: cut.stock_length,
        });
    }

    for (field, value) in &lengths[1..] {
        if *value < 0.0 {
            return Err(EfficiencyError::Negative {
                cut_id: cut.id.clone(),
                field: *field,
                value: *value,
            });
        }
    }

    for (field, value) in lengths {
        if value > limits.overflow_guard {
            return Err(EfficiencyError::Overflow {
                cut_id: cut.id.clone(),
                field,
                value,
                guard: limits.overflow_guard,
            });
        }
    }

    let sum = cut.used_length + cut.remaining_length;
    if !within_abs(sum, cut.stock_length, limits.tolerance) {
        return Err(EfficiencyError::ConservationViolated {
            cut_id: cut.id.clone(),
            stock: cut.stock_length,
            used: cut.used_length,
            remaining: cut.remaining_length,
            difference: sum - cut.stock_length,
        });
    }

    Ok(())
}

/// Running totals over accepted cuts plus every error seen so far.
#[derive(Debug, Default)]
struct Tally {
    stock: Real,
    used: Real,
    waste: Real,
    accepted: usize,
    errors: Vec<EfficiencyError>,
}

impl Tally {
    fn absorb(mut self, cut: &CutRecord, limits: &EfficiencyLimits) -> Self {
        match check_cut(cut, limits) {
            Ok(()) => {
                self.stock += cut.stock_length;
                self.used += cut.used_length;
                self.waste += cut.remaining_length;
                self.accepted += 1;
            }
            Err(err) => {
                debug!(cut_id = %cut.id, error = %err, "cut excluded from efficiency");
                self.errors.push(err);
            }
        }
        self
    }

    fn finish(self, limits: &EfficiencyLimits) -> EfficiencyReport {
        let Tally {
            stock,
            used,
            waste,
            accepted,
            mut errors,
        } = self;

        if !errors.is_empty() {
            warn!(
                rejected = errors.len(),
                accepted, "efficiency computed over partial data"
            );
        }

        if !(stock > 0.0) {
            errors.push(EfficiencyError::NoValidStock);
            return EfficiencyReport::invalid(errors);
        }

        let efficiency = used / stock * 100.0;
        if !efficiency.is_finite() || !(0.0..=100.0).contains(&efficiency) {
            warn!(efficiency, "recomputed efficiency out of range");
            errors.push(EfficiencyError::OutOfRange { value: efficiency });
            return EfficiencyReport::invalid(errors);
        }

        // Each accepted cut may be off by up to `tolerance`, and long sums
        // pick up rounding, hence the relative term.
        let totals_tol = Tolerances {
            abs: limits.tolerance * accepted.max(1) as Real,
            rel: 1e-9,
        };
        if !nearly_equal(used + waste, stock, totals_tol) {
            errors.push(EfficiencyError::TotalsMismatch { stock, used, waste });
        }

        EfficiencyReport {
            efficiency: clamp_percent(round2(efficiency)),
            total_stock_length: round2(stock),
            total_used_length: round2(used),
            total_waste: round2(waste),
            accepted_cuts: accepted,
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Recompute a bounds-checked efficiency from a set of cuts.
///
/// Never fails: corrupt cuts are excluded and reported in `errors`, and a
/// degenerate input yields a zeroed, invalid report.
pub fn calculate_efficiency<'a, I>(cuts: I, limits: &EfficiencyLimits) -> EfficiencyReport
where
    I: IntoIterator<Item = &'a CutRecord>,
{
    let mut cuts = cuts.into_iter().peekable();
    if cuts.peek().is_none() {
        return EfficiencyReport::empty();
    }

    cuts.fold(Tally::default(), |tally, cut| tally.absorb(cut, limits))
        .finish(limits)
}
