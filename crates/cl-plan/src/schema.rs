//! Cut-plan document schema.
//!
//! Mirrors what the optimization service returns. Field names follow the
//! service's camelCase JSON; every field decodes permissively (see
//! [`crate::lenient`]).

use cl_core::{Real, WorkOrderId};
use serde::{Deserialize, Serialize};

use crate::lenient;

/// One optimization result as returned by the cutting-stock service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    #[serde(default, deserialize_with = "lenient::list")]
    pub cuts: Vec<CutRecord>,
    /// Efficiency reported by the optimizer, in percent.
    #[serde(
        default,
        deserialize_with = "lenient::opt_real",
        skip_serializing_if = "Option::is_none"
    )]
    pub efficiency: Option<Real>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_real",
        skip_serializing_if = "Option::is_none"
    )]
    pub waste_percentage: Option<Real>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_real",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_cost: Option<Real>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_real",
        skip_serializing_if = "Option::is_none"
    )]
    pub stock_count: Option<Real>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_real",
        skip_serializing_if = "Option::is_none"
    )]
    pub confidence: Option<Real>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub algorithm: Option<String>,
    /// Result-level default work order.
    #[serde(
        default,
        deserialize_with = "lenient::opt_work_order",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_order_id: Option<WorkOrderId>,
}

impl OptimizationResult {
    /// True when the optimizer pooled several work orders onto shared bars.
    pub fn is_pooled(&self) -> bool {
        self.cuts.iter().any(CutRecord::is_pooled)
    }
}

/// One stock bar cut according to the plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CutRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::real")]
    pub stock_length: Real,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::real")]
    pub used_length: Real,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::real")]
    pub remaining_length: Real,
    #[serde(default, deserialize_with = "lenient::list")]
    pub segments: Vec<Segment>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_real",
        skip_serializing_if = "Option::is_none"
    )]
    pub segment_count: Option<Real>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_work_order",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_order_id: Option<WorkOrderId>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub pool_key: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_order_breakdown: Option<Vec<WorkOrderShare>>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_mixed: Option<bool>,
}

impl CutRecord {
    /// Bare cut with the three lengths set and nothing else.
    pub fn new(id: impl Into<String>, stock: Real, used: Real, remaining: Real) -> Self {
        Self {
            id: id.into(),
            stock_length: stock,
            used_length: used,
            remaining_length: remaining,
            segments: Vec::new(),
            segment_count: None,
            work_order_id: None,
            profile_type: None,
            pool_key: None,
            work_order_breakdown: None,
            is_mixed: None,
        }
    }

    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn with_work_order(mut self, id: impl Into<WorkOrderId>) -> Self {
        self.work_order_id = Some(id.into());
        self
    }

    pub fn with_pool(mut self, key: impl Into<String>) -> Self {
        self.pool_key = Some(key.into());
        self
    }

    pub fn with_breakdown(mut self, shares: Vec<WorkOrderShare>) -> Self {
        self.work_order_breakdown = Some(shares);
        self
    }

    /// Segment count from metadata, else the number of listed segments.
    pub fn segment_count(&self) -> Real {
        self.segment_count.unwrap_or(self.segments.len() as Real)
    }

    /// All three lengths and the segment count are finite numbers.
    pub fn is_structurally_sound(&self) -> bool {
        self.stock_length.is_finite()
            && self.used_length.is_finite()
            && self.remaining_length.is_finite()
            && self.segment_count().is_finite()
    }

    pub fn is_pooled(&self) -> bool {
        self.pool_key.is_some()
    }

    pub fn is_mixed(&self) -> bool {
        self.is_mixed.unwrap_or(false)
    }

    /// Total pieces cut from this bar (sum of segment quantities).
    pub fn piece_count(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.quantity)).sum()
    }
}

/// One cut piece position within a bar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default = "lenient::nan", deserialize_with = "lenient::real")]
    pub length: Real,
    #[serde(default = "lenient::one", deserialize_with = "lenient::quantity")]
    pub quantity: u32,
    #[serde(
        default,
        deserialize_with = "lenient::opt_work_order",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_order_id: Option<WorkOrderId>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_work_order",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_order_item_id: Option<WorkOrderId>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_type: Option<String>,
}

impl Segment {
    pub fn new(length: Real, quantity: u32) -> Self {
        Self {
            length,
            quantity,
            work_order_id: None,
            work_order_item_id: None,
            profile_type: None,
        }
    }

    pub fn for_work_order(mut self, id: impl Into<WorkOrderId>) -> Self {
        self.work_order_id = Some(id.into());
        self
    }

    pub fn for_work_order_item(mut self, id: impl Into<WorkOrderId>) -> Self {
        self.work_order_item_id = Some(id.into());
        self
    }

    pub fn of_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile_type = Some(profile.into());
        self
    }

    /// Owning work order; the item id is the fallback alias.
    pub fn work_order(&self) -> Option<&WorkOrderId> {
        self.work_order_id
            .as_ref()
            .or(self.work_order_item_id.as_ref())
    }
}

/// How many segments of a pooled bar belong to one work order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderShare {
    #[serde(
        default,
        deserialize_with = "lenient::opt_work_order",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_order_id: Option<WorkOrderId>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub count: u32,
}

impl WorkOrderShare {
    pub fn new(id: impl Into<WorkOrderId>, count: u32) -> Self {
        Self {
            work_order_id: Some(id.into()),
            count,
        }
    }
}
