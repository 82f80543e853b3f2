//! Permissive field decoders for optimizer documents.
//!
//! The optimizer is not trusted to send well-typed fields. Numbers may
//! arrive as strings, ids as numbers, and anything may be `null`. These
//! decoders never fail on a bad value; they map it to NaN or `None` and
//! leave judgement to the analysis layer.

use cl_core::{Real, WorkOrderId};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(Real),
    Text(String),
    #[allow(dead_code)]
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(Real),
    Text(String),
    #[allow(dead_code)]
    Other(IgnoredAny),
}

fn raw_to_real(raw: Option<RawNumber>) -> Option<Real> {
    match raw? {
        RawNumber::Number(v) => Some(v),
        RawNumber::Text(s) => s.trim().parse::<Real>().ok(),
        RawNumber::Other(_) => None,
    }
}

pub(crate) fn nan() -> Real {
    Real::NAN
}

pub(crate) fn one() -> u32 {
    1
}

/// Number, numeric string, or NaN.
pub(crate) fn real<'de, D: Deserializer<'de>>(d: D) -> Result<Real, D::Error> {
    let raw = Option::<RawNumber>::deserialize(d)?;
    Ok(raw_to_real(raw).unwrap_or(Real::NAN))
}

pub(crate) fn opt_real<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Real>, D::Error> {
    let raw = Option::<RawNumber>::deserialize(d)?;
    Ok(raw_to_real(raw))
}

/// Positive piece count; anything unusable counts as a single piece.
pub(crate) fn quantity<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let raw = Option::<RawNumber>::deserialize(d)?;
    Ok(match raw_to_real(raw) {
        Some(v) if v.is_finite() && v >= 1.0 => v.round().min(u32::MAX as Real) as u32,
        _ => 1,
    })
}

/// Non-negative count; anything unusable counts as zero.
pub(crate) fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let raw = Option::<RawNumber>::deserialize(d)?;
    Ok(match raw_to_real(raw) {
        Some(v) if v.is_finite() && v >= 0.0 => v.round().min(u32::MAX as Real) as u32,
        _ => 0,
    })
}

pub(crate) fn opt_work_order<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<WorkOrderId>, D::Error> {
    let raw = Option::<RawId>::deserialize(d)?;
    Ok(match raw {
        Some(RawId::Int(n)) => Some(WorkOrderId::Number(n)),
        Some(RawId::Float(v)) if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 => {
            Some(WorkOrderId::Number(v as i64))
        }
        Some(RawId::Float(v)) if v.is_finite() => Some(WorkOrderId::Text(v.to_string())),
        Some(RawId::Text(s)) => WorkOrderId::from_text(&s),
        _ => None,
    })
}

/// Free text, or a number rendered as text. Blank means absent.
pub(crate) fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<RawId>::deserialize(d)?;
    Ok(match raw {
        Some(RawId::Int(n)) => Some(n.to_string()),
        Some(RawId::Float(v)) if v.is_finite() => Some(v.to_string()),
        Some(RawId::Text(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    })
}

pub(crate) fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(opt_text(d)?.unwrap_or_default())
}

pub(crate) fn opt_flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        #[allow(dead_code)]
        Other(IgnoredAny),
    }
    Ok(match Option::<RawFlag>::deserialize(d)? {
        Some(RawFlag::Bool(b)) => Some(b),
        _ => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry<T> {
    Item(T),
    #[allow(dead_code)]
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawList<T> {
    Items(Vec<RawEntry<T>>),
    #[allow(dead_code)]
    Other(IgnoredAny),
}

fn raw_to_list<T>(raw: Option<RawList<T>>) -> Option<Vec<T>> {
    match raw? {
        RawList::Items(entries) => Some(
            entries
                .into_iter()
                .filter_map(|entry| match entry {
                    RawEntry::Item(item) => Some(item),
                    RawEntry::Other(_) => None,
                })
                .collect(),
        ),
        RawList::Other(_) => None,
    }
}

/// Entries that do not decode are dropped; `null` or a non-list reads as empty.
pub(crate) fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw = Option::<RawList<T>>::deserialize(d)?;
    Ok(raw_to_list(raw).unwrap_or_default())
}

/// Like [`list`], but a missing or non-list value stays absent.
pub(crate) fn opt_list<'de, D, T>(d: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw = Option::<RawList<T>>::deserialize(d)?;
    Ok(raw_to_list(raw))
}
