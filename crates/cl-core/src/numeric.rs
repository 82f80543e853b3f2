/// Floating point type used throughout system
pub type Real = f64;

/// Absolute tolerance for the per-cut conservation check.
pub const DEFAULT_CONSERVATION_TOL: Real = 1e-9;

/// Largest length accepted from an upstream document, in its own unit.
pub const DEFAULT_OVERFLOW_GUARD: Real = 1e6;

/// One tolerance for everything
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: DEFAULT_CONSERVATION_TOL,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Strict absolute comparison, no relative slack.
pub fn within_abs(a: Real, b: Real, abs: Real) -> bool {
    (a - b).abs() <= abs
}

/// Round half away from zero to `decimals` places.
pub fn round_to(v: Real, decimals: u32) -> Real {
    let scale = 10_f64.powi(decimals as i32);
    (v * scale).round() / scale
}

/// Display rounding used by every aggregate (2 decimals).
#[inline]
pub fn round2(v: Real) -> Real {
    round_to(v, 2)
}

/// Clamp into [0, 100]; NaN collapses to 0.
pub fn clamp_percent(v: Real) -> Real {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

/// `part / whole * 100`, or `None` when the ratio is not meaningful.
pub fn percent_of(part: Real, whole: Real) -> Option<Real> {
    if !(whole > 0.0) {
        return None;
    }
    let pct = part / whole * 100.0;
    pct.is_finite().then_some(pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn within_abs_has_no_relative_slack() {
        assert!(within_abs(6000.0, 6000.0, 1e-9));
        assert!(!within_abs(6100.0, 6000.0, 1e-9));
        assert!(!within_abs(1e9, 1e9 + 1.0, 1e-9));
    }

    #[test]
    fn round2_matches_display_rounding() {
        assert_eq!(round2(5800.0 / 6000.0 * 100.0), 96.67);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(12.345_000_1), 12.35);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn clamp_percent_bounds() {
        assert_eq!(clamp_percent(-3.0), 0.0);
        assert_eq!(clamp_percent(140.0), 100.0);
        assert_eq!(clamp_percent(Real::NAN), 0.0);
        assert_eq!(clamp_percent(55.5), 55.5);
    }

    #[test]
    fn percent_of_rejects_empty_whole() {
        assert_eq!(percent_of(1.0, 0.0), None);
        assert_eq!(percent_of(1.0, Real::NAN), None);
        assert_eq!(percent_of(50.0, 200.0), Some(25.0));
    }
}
