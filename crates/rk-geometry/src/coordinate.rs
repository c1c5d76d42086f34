//! Weighted 3D coordinate.

use core::ops::Add;

/// A point in space carrying a weight.
///
/// For CG queries `weight` is the mass (kg) that acts at the point.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub weight: f64,
}

impl Coordinate {
    /// Origin with zero weight.
    pub const NUL: Coordinate = Coordinate {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        weight: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64, weight: f64) -> Self {
        Self { x, y, z, weight }
    }

    /// Unweighted point.
    pub fn point(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 0.0)
    }

    /// Translate, keeping the weight.
    pub fn translate(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz, self.weight)
    }

    pub fn with_weight(self, weight: f64) -> Self {
        Self { weight, ..self }
    }

    /// Weighted average of two coordinates; the result carries the summed weight.
    ///
    /// When both weights are zero the plain midpoint is returned with zero weight.
    pub fn average(self, other: Coordinate) -> Self {
        let w = self.weight + other.weight;
        if w.abs() < f64::EPSILON {
            return Self::new(
                (self.x + other.x) / 2.0,
                (self.y + other.y) / 2.0,
                (self.z + other.z) / 2.0,
                0.0,
            );
        }
        Self::new(
            (self.x * self.weight + other.x * other.weight) / w,
            (self.y * self.weight + other.y * other.weight) / w,
            (self.z * self.weight + other.z * other.weight) / w,
            w,
        )
    }

    /// Squared distance from the x-axis.
    pub fn radial_distance_sq(self) -> f64 {
        self.y * self.y + self.z * self.z
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    /// Component-wise sum of positions; weights add.
    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.weight + rhs.weight,
        )
    }
}
