//! The geometry-provider contract consumed by the integrator and the mounting resolver.

/// A solid generated by rotating `y = r(x) >= 0` around the x-axis.
///
/// Coordinates are local to the shape: `x = 0` is the fore end and
/// `x = length()` the aft end. Positions outside that range have no material
/// and report a radius of 0, so sampling loops never need bounds checks.
pub trait AxisymmetricShape {
    /// Axial length (m).
    fn length(&self) -> f64;

    /// Outer radius at axial position `x` (m), or 0 outside `[0, length]`.
    fn outer_radius(&self, x: f64) -> f64;

    /// Inner radius at axial position `x` (m), or 0 outside `[0, length]`.
    fn inner_radius(&self, x: f64) -> f64;

    /// Effective wall thickness (m).
    fn thickness(&self) -> f64;

    /// Whether the shape is solid throughout.
    fn is_filled(&self) -> bool;

    fn fore_radius(&self) -> f64 {
        self.outer_radius(0.0)
    }

    fn aft_radius(&self) -> f64 {
        self.outer_radius(self.length())
    }

    fn max_radius(&self) -> f64 {
        self.fore_radius().max(self.aft_radius())
    }

    /// Six (x, r) samples along the body, used for extent queries.
    fn bounds(&self) -> Vec<(f64, f64)> {
        let length = self.length();
        (0..=5)
            .map(|n| {
                let x = n as f64 * length / 5.0;
                (x, self.outer_radius(x))
            })
            .collect()
    }
}
