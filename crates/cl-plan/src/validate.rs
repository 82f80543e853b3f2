//! Settings validation and document inspection.

use crate::schema::OptimizationResult;
use crate::settings::AnalysisSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

fn invalid(field: &str, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_settings(settings: &AnalysisSettings) -> Result<(), ValidationError> {
    let tol = settings.conservation_tolerance;
    if !tol.is_finite() || tol <= 0.0 {
        return Err(invalid(
            "conservation_tolerance",
            tol,
            "must be a positive finite number",
        ));
    }

    let guard = settings.overflow_guard;
    if !guard.is_finite() || guard <= 0.0 {
        return Err(invalid(
            "overflow_guard",
            guard,
            "must be a positive finite number",
        ));
    }

    let remnant = settings.reusable_remnant_min;
    if !remnant.is_finite() || remnant < 0.0 {
        return Err(invalid(
            "reusable_remnant_min",
            remnant,
            "must be a non-negative finite number",
        ));
    }
    if remnant > guard {
        return Err(invalid(
            "reusable_remnant_min",
            remnant,
            "exceeds overflow_guard",
        ));
    }

    Ok(())
}

/// Non-fatal observation about an optimizer document.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentIssue {
    #[error("Document contains no cuts")]
    NoCuts,

    #[error("Cut at position {index} has no id")]
    BlankCutId { index: usize },

    #[error("Cut id '{id}' appears {occurrences} times")]
    DuplicateCutId { id: String, occurrences: usize },

    #[error("Cut '{cut_id}' segment {position} names no work order")]
    SegmentWithoutWorkOrder { cut_id: String, position: usize },

    #[error("{unpooled} of {total} cuts carry no pool key in a pooled result")]
    PartiallyPooled { unpooled: usize, total: usize },
}

/// Inspect a document for suspicious but survivable content. Never fails.
pub fn inspect_document(result: &OptimizationResult) -> Vec<DocumentIssue> {
    let mut issues = Vec::new();

    if result.cuts.is_empty() {
        issues.push(DocumentIssue::NoCuts);
        return issues;
    }

    let mut id_counts: HashMap<&str, usize> = HashMap::new();
    let mut id_order: Vec<&str> = Vec::new();
    for (index, cut) in result.cuts.iter().enumerate() {
        if cut.id.is_empty() {
            issues.push(DocumentIssue::BlankCutId { index });
            continue;
        }
        let count = id_counts.entry(cut.id.as_str()).or_insert(0);
        if *count == 0 {
            id_order.push(cut.id.as_str());
        }
        *count += 1;
    }
    for id in id_order {
        let occurrences = id_counts[id];
        if occurrences > 1 {
            issues.push(DocumentIssue::DuplicateCutId {
                id: id.to_string(),
                occurrences,
            });
        }
    }

    // A result-level work order covers every segment.
    if result.work_order_id.is_none() {
        for cut in &result.cuts {
            if cut.work_order_id.is_some() || cut.is_pooled() {
                continue;
            }
            for (position, segment) in cut.segments.iter().enumerate() {
                if segment.work_order().is_none() {
                    issues.push(DocumentIssue::SegmentWithoutWorkOrder {
                        cut_id: cut.id.clone(),
                        position,
                    });
                }
            }
        }
    }

    if result.is_pooled() {
        let unpooled = result.cuts.iter().filter(|c| !c.is_pooled()).count();
        if unpooled > 0 {
            issues.push(DocumentIssue::PartiallyPooled {
                unpooled,
                total: result.cuts.len(),
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CutRecord, Segment};

    #[test]
    fn default_settings_are_valid() {
        validate_settings(&AnalysisSettings::default()).unwrap();
    }

    #[test]
    fn rejects_non_positive_tolerance() {
        let settings = AnalysisSettings {
            conservation_tolerance: 0.0,
            ..Default::default()
        };
        let err = validate_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("conservation_tolerance"));
    }

    #[test]
    fn rejects_nan_guard() {
        let settings = AnalysisSettings {
            overflow_guard: f64::NAN,
            ..Default::default()
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn empty_document_reports_no_cuts() {
        let issues = inspect_document(&OptimizationResult::default());
        assert_eq!(issues, vec![DocumentIssue::NoCuts]);
    }

    #[test]
    fn duplicate_ids_and_orphan_segments() {
        let result = OptimizationResult {
            cuts: vec![
                CutRecord::new("a", 6000.0, 6000.0, 0.0)
                    .with_segment(Segment::new(3000.0, 2).for_work_order("WO-1")),
                CutRecord::new("a", 6000.0, 3000.0, 3000.0)
                    .with_segment(Segment::new(3000.0, 1)),
            ],
            ..Default::default()
        };
        let issues = inspect_document(&result);
        assert!(issues.contains(&DocumentIssue::DuplicateCutId {
            id: "a".to_string(),
            occurrences: 2,
        }));
        assert!(issues.contains(&DocumentIssue::SegmentWithoutWorkOrder {
            cut_id: "a".to_string(),
            position: 0,
        }));
    }

    #[test]
    fn result_default_covers_segments() {
        let result = OptimizationResult {
            cuts: vec![
                CutRecord::new("a", 6000.0, 3000.0, 3000.0).with_segment(Segment::new(3000.0, 1)),
            ],
            work_order_id: Some(cl_core::WorkOrderId::Number(7)),
            ..Default::default()
        };
        assert!(inspect_document(&result).is_empty());
    }

    #[test]
    fn partially_pooled_is_flagged() {
        let result = OptimizationResult {
            cuts: vec![
                CutRecord::new("p1", 6000.0, 6000.0, 0.0).with_pool("P1"),
                CutRecord::new("x", 6000.0, 6000.0, 0.0).with_work_order("A"),
            ],
            ..Default::default()
        };
        assert_eq!(
            inspect_document(&result),
            vec![DocumentIssue::PartiallyPooled {
                unpooled: 1,
                total: 2
            }]
        );
    }
}
