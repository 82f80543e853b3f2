use core::fmt;

/// Group name used when no work order can be determined for a cut.
pub const DEFAULT_WORK_ORDER: &str = "DEFAULT_WORK_ORDER";

/// Cut-level work order marker written by the optimizer on pooled bars.
pub const MIXED_WORK_ORDER: &str = "MIXED";

/// Pool key for cuts that carry none.
pub const DEFAULT_POOL_KEY: &str = "default";

/// Profile label when a pool has no segment to take it from.
pub const UNKNOWN_PROFILE: &str = "Unknown";

/// Work-order identifier as it arrives from the optimizer.
///
/// Integral ids stay numeric so they display as numbers; everything else
/// is text. Two ids that stringify the same share a [`WorkOrderKey`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum WorkOrderId {
    Number(i64),
    Text(String),
}

impl WorkOrderId {
    /// Text id, or `None` when blank.
    pub fn from_text(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::Text(trimmed.to_string()))
        }
    }

    /// The `DEFAULT_WORK_ORDER` sentinel.
    pub fn default_sentinel() -> Self {
        Self::Text(DEFAULT_WORK_ORDER.to_string())
    }

    pub fn is_mixed_sentinel(&self) -> bool {
        matches!(self, Self::Text(t) if t == MIXED_WORK_ORDER)
    }

    /// Canonical grouping key (numbers stringified).
    pub fn key(&self) -> WorkOrderKey {
        WorkOrderKey(self.to_string())
    }
}

impl fmt::Display for WorkOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(t) => f.write_str(t),
        }
    }
}

impl From<i64> for WorkOrderId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for WorkOrderId {
    fn from(n: i32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<u32> for WorkOrderId {
    fn from(n: u32) -> Self {
        Self::Number(i64::from(n))
    }
}

impl From<&str> for WorkOrderId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// String key used for grouping cuts by work order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct WorkOrderKey(String);

impl WorkOrderKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkOrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
