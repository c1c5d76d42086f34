//! Solids of revolution defined by a radius profile.

use crate::shape::AxisymmetricShape;
use rk_core::numeric::pow2;

/// Radius law `r(x)` of a body of revolution, in the body's own frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Profile {
    /// Constant radius.
    Cylinder { radius: f64 },
    /// Straight taper from `fore` to `aft` (a cone when `fore == 0`).
    Conical { fore: f64, aft: f64 },
    /// Quarter-ellipse taper, tangent to the axis direction at the aft end.
    Ellipsoid { fore: f64, aft: f64 },
}

impl Profile {
    pub fn fore(&self) -> f64 {
        match *self {
            Profile::Cylinder { radius } => radius,
            Profile::Conical { fore, .. } | Profile::Ellipsoid { fore, .. } => fore,
        }
    }

    pub fn aft(&self) -> f64 {
        match *self {
            Profile::Cylinder { radius } => radius,
            Profile::Conical { aft, .. } | Profile::Ellipsoid { aft, .. } => aft,
        }
    }

    /// Radius at `x` for a body of the given `length`; `x` is assumed in range.
    fn radius_at(&self, x: f64, length: f64) -> f64 {
        if length <= 0.0 {
            return self.fore();
        }
        let t = x / length;
        match *self {
            Profile::Cylinder { radius } => radius,
            Profile::Conical { fore, aft } => fore + (aft - fore) * t,
            Profile::Ellipsoid { fore, aft } => {
                fore + (aft - fore) * (1.0 - pow2(1.0 - t)).max(0.0).sqrt()
            }
        }
    }

    /// Same profile with every radius replaced by its non-negative value.
    pub fn sanitized(self) -> Self {
        match self {
            Profile::Cylinder { radius } => Profile::Cylinder {
                radius: radius.max(0.0),
            },
            Profile::Conical { fore, aft } => Profile::Conical {
                fore: fore.max(0.0),
                aft: aft.max(0.0),
            },
            Profile::Ellipsoid { fore, aft } => Profile::Ellipsoid {
                fore: fore.max(0.0),
                aft: aft.max(0.0),
            },
        }
    }
}

/// A (possibly hollow) solid of revolution.
///
/// The stored wall thickness is a request; [`AxisymmetricShape::thickness`]
/// reports the effective value, which never exceeds the largest end radius.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolidOfRevolution {
    length: f64,
    profile: Profile,
    thickness: f64,
    filled: bool,
}

impl SolidOfRevolution {
    pub fn new(length: f64, profile: Profile, thickness: f64, filled: bool) -> Self {
        Self {
            length: length.max(0.0),
            profile: profile.sanitized(),
            thickness: thickness.max(0.0),
            filled,
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }
}

impl AxisymmetricShape for SolidOfRevolution {
    fn length(&self) -> f64 {
        self.length
    }

    fn outer_radius(&self, x: f64) -> f64 {
        if x < 0.0 || x > self.length {
            return 0.0;
        }
        self.profile.radius_at(x, self.length)
    }

    fn inner_radius(&self, x: f64) -> f64 {
        if self.filled {
            return 0.0;
        }
        (self.outer_radius(x) - self.thickness()).max(0.0)
    }

    fn thickness(&self) -> f64 {
        let max_radius = self.profile.fore().max(self.profile.aft());
        if self.filled {
            max_radius
        } else {
            self.thickness.min(max_radius)
        }
    }

    fn is_filled(&self) -> bool {
        self.filled
    }

    fn fore_radius(&self) -> f64 {
        self.profile.fore()
    }

    fn aft_radius(&self) -> f64 {
        self.profile.aft()
    }
}
