//! rk-geometry: axisymmetric geometry and mass-property integration.
//!
//! Provides:
//! - The `AxisymmetricShape` contract (outer/inner radius as a function of x)
//! - Solid-of-revolution profiles (cylinder, cone/frustum, ellipsoid)
//! - A fixed-discretization frustum integrator producing volume, areas,
//!   CG and unit inertias in a single pass
//! - Closed-form properties for thin tubes (launch lugs, inner tubes)
//!
//! # Example
//!
//! ```
//! use rk_geometry::{integrate, Profile, SolidOfRevolution};
//!
//! let tube = SolidOfRevolution::new(0.3, Profile::Cylinder { radius: 0.025 }, 0.002, false);
//! let props = integrate(&tube, 680.0);
//!
//! assert!(props.volume > 0.0);
//! assert!((props.cg.x - 0.15).abs() < 1e-9);
//! ```

pub mod coordinate;
pub mod integrator;
pub mod shape;
pub mod solid;
pub mod tube;

// Re-exports
pub use coordinate::Coordinate;
pub use integrator::{AxisymmetricProperties, DIVISIONS, NEGLIGIBLE_VOLUME, integrate};
pub use shape::AxisymmetricShape;
pub use solid::{Profile, SolidOfRevolution};
pub use tube::tube_properties;
