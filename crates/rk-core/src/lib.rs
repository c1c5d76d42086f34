//! rk-core: stable foundation for the rocket component model.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for tree nodes and listeners)
//! - modid (process-wide modification-ID sequence)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod modid;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{RkError, RkResult};
pub use ids::*;
pub use modid::{ModId, ModIdSequence};
pub use numeric::*;
pub use units::*;
