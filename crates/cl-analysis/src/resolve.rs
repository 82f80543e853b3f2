//! Work-order identity resolution.
//!
//! A cut does not carry one authoritative work-order id. The id is taken
//! from the first source in [`ResolutionSource::ORDER`] that has one.

use cl_core::WorkOrderId;
use cl_plan::CutRecord;
use serde::{Deserialize, Serialize};

/// Where a resolved work-order id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// `workOrderId` of the first segment that names a work order.
    Segment,
    /// `workOrderItemId` of that segment (no `workOrderId` present).
    SegmentItem,
    /// The cut's own `workOrderId`.
    Cut,
    /// The document-level or configured default.
    ResultDefault,
}

impl ResolutionSource {
    /// Probing order. Segment and item ids are probed together, per segment.
    pub const ORDER: [ResolutionSource; 3] = [Self::Segment, Self::Cut, Self::ResultDefault];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkOrderResolution {
    Found {
        id: WorkOrderId,
        source: ResolutionSource,
    },
    /// Nothing found; the cut belongs to `DEFAULT_WORK_ORDER`.
    Defaulted,
}

impl WorkOrderResolution {
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted)
    }

    pub fn source(&self) -> Option<ResolutionSource> {
        match self {
            Self::Found { source, .. } => Some(*source),
            Self::Defaulted => None,
        }
    }

    /// The id to group under; the sentinel when defaulted.
    pub fn into_id(self) -> WorkOrderId {
        match self {
            Self::Found { id, .. } => id,
            Self::Defaulted => WorkOrderId::default_sentinel(),
        }
    }
}

fn probe(
    source: ResolutionSource,
    cut: &CutRecord,
    result_default: Option<&WorkOrderId>,
) -> Option<(WorkOrderId, ResolutionSource)> {
    match source {
        ResolutionSource::Segment | ResolutionSource::SegmentItem => {
            cut.segments.iter().find_map(|seg| match (&seg.work_order_id, &seg.work_order_item_id) {
                (Some(id), _) => Some((id.clone(), ResolutionSource::Segment)),
                (None, Some(id)) => Some((id.clone(), ResolutionSource::SegmentItem)),
                (None, None) => None,
            })
        }
        ResolutionSource::Cut => cut
            .work_order_id
            .clone()
            .map(|id| (id, ResolutionSource::Cut)),
        ResolutionSource::ResultDefault => {
            result_default.map(|id| (id.clone(), ResolutionSource::ResultDefault))
        }
    }
}

/// Resolve the work order a cut belongs to.
pub fn resolve_work_order(
    cut: &CutRecord,
    result_default: Option<&WorkOrderId>,
) -> WorkOrderResolution {
    ResolutionSource::ORDER
        .iter()
        .find_map(|source| probe(*source, cut, result_default))
        .map_or(WorkOrderResolution::Defaulted, |(id, source)| {
            WorkOrderResolution::Found { id, source }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cl_plan::Segment;

    fn bar() -> CutRecord {
        CutRecord::new("c", 6000.0, 6000.0, 0.0)
    }

    #[test]
    fn first_segment_with_an_id_wins() {
        let cut = bar()
            .with_segment(Segment::new(1000.0, 1))
            .with_segment(Segment::new(1000.0, 1).for_work_order("WO-2"))
            .with_segment(Segment::new(1000.0, 1).for_work_order("WO-3"))
            .with_work_order("WO-CUT");
        assert_eq!(
            resolve_work_order(&cut, None),
            WorkOrderResolution::Found {
                id: WorkOrderId::from("WO-2"),
                source: ResolutionSource::Segment,
            }
        );
    }

    #[test]
    fn item_id_is_used_when_segment_has_no_work_order() {
        let cut = bar().with_segment(Segment::new(1000.0, 1).for_work_order_item(77));
        assert_eq!(
            resolve_work_order(&cut, None),
            WorkOrderResolution::Found {
                id: WorkOrderId::Number(77),
                source: ResolutionSource::SegmentItem,
            }
        );
    }

    #[test]
    fn falls_back_to_cut_then_result_default() {
        let default = WorkOrderId::from("WEEK-12");

        let cut = bar().with_segment(Segment::new(1000.0, 1)).with_work_order(5);
        let resolved = resolve_work_order(&cut, Some(&default));
        assert_eq!(resolved.source(), Some(ResolutionSource::Cut));
        assert_eq!(resolved.into_id(), WorkOrderId::Number(5));

        let cut = bar().with_segment(Segment::new(1000.0, 1));
        let resolved = resolve_work_order(&cut, Some(&default));
        assert_eq!(resolved.source(), Some(ResolutionSource::ResultDefault));
        assert_eq!(resolved.into_id(), default);
    }

    #[test]
    fn defaulted_when_nothing_found() {
        let resolved = resolve_work_order(&bar(), None);
        assert!(resolved.is_defaulted());
        assert_eq!(resolved.into_id().to_string(), cl_core::DEFAULT_WORK_ORDER);
    }
}
