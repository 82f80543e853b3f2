//! Analysis settings file.

use cl_core::{
    DEFAULT_CONSERVATION_TOL, DEFAULT_OVERFLOW_GUARD, LengthUnit, Real, WorkOrderId,
};
use serde::{Deserialize, Serialize};

/// Default shortest leftover worth putting back on the rack.
pub const DEFAULT_REUSABLE_REMNANT_MIN: Real = 500.0;

/// Where a pool row's efficiency figure comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolEfficiencyMode {
    /// The optimizer's result-level figure, shared by every pool.
    #[default]
    Reported,
    /// Recomputed from the pool's own cuts.
    Recomputed,
}

/// Tunables for the analysis pipeline. Lengths are in `length_unit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub length_unit: LengthUnit,
    pub conservation_tolerance: Real,
    pub overflow_guard: Real,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_work_order: Option<WorkOrderId>,
    pub pool_efficiency: PoolEfficiencyMode,
    pub reusable_remnant_min: Real,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            length_unit: LengthUnit::Millimeter,
            conservation_tolerance: DEFAULT_CONSERVATION_TOL,
            overflow_guard: DEFAULT_OVERFLOW_GUARD,
            default_work_order: None,
            pool_efficiency: PoolEfficiencyMode::Reported,
            reusable_remnant_min: DEFAULT_REUSABLE_REMNANT_MIN,
        }
    }
}

impl AnalysisSettings {
    pub fn with_pool_efficiency(mut self, mode: PoolEfficiencyMode) -> Self {
        self.pool_efficiency = mode;
        self
    }

    pub fn with_default_work_order(mut self, id: impl Into<WorkOrderId>) -> Self {
        self.default_work_order = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "length_unit: cm\npool_efficiency: recomputed\n";
        let settings: AnalysisSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.length_unit, LengthUnit::Centimeter);
        assert_eq!(settings.pool_efficiency, PoolEfficiencyMode::Recomputed);
        assert_eq!(settings.conservation_tolerance, 1e-9);
        assert_eq!(settings.overflow_guard, 1e6);
        assert_eq!(settings.reusable_remnant_min, 500.0);
    }

    #[test]
    fn default_work_order_may_be_numeric() {
        let yaml = "default_work_order: 4411\n";
        let settings: AnalysisSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.default_work_order, Some(WorkOrderId::Number(4411)));
    }
}
