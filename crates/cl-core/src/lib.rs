//! cl-core: stable foundation for cutlist.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - ids (work-order identifiers and their canonical grouping keys)
//! - units (uom length types + document length units)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
