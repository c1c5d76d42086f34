//! Closed-form properties of a straight thick-walled tube.

use crate::coordinate::Coordinate;
use crate::integrator::AxisymmetricProperties;
use rk_core::numeric::pow2;
use std::f64::consts::PI;

/// Properties of a tube of `length`, outer `radius` and wall `thickness`.
///
/// Thickness is clamped into `[0, radius]`. The result has the same layout as
/// [`crate::integrate`] so callers can cache both kinds uniformly.
pub fn tube_properties(length: f64, radius: f64, thickness: f64, density: f64) -> AxisymmetricProperties {
    let length = length.max(0.0);
    let radius = radius.max(0.0);
    let thickness = thickness.clamp(0.0, radius);
    let inner = radius - thickness;

    if length <= 0.0 {
        return AxisymmetricProperties::ZERO;
    }

    let volume = length * PI * (pow2(radius) - pow2(inner));
    AxisymmetricProperties {
        volume,
        full_volume: length * PI * pow2(radius),
        // Outside and bore surfaces.
        wetted_area: 2.0 * PI * (radius + inner) * length,
        planform_area: 2.0 * radius * length,
        planform_center: length / 2.0,
        cg: Coordinate::new(length / 2.0, 0.0, 0.0, volume * density),
        longitudinal_unit_inertia: (3.0 * (pow2(inner) + pow2(radius)) + pow2(length)) / 12.0,
        rotational_unit_inertia: (pow2(inner) + pow2(radius)) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_lug_defaults() {
        let p = tube_properties(0.03, 0.005, 0.001, 680.0);
        let expected = 0.03 * PI * (0.005_f64.powi(2) - 0.004_f64.powi(2));
        assert!((p.volume - expected).abs() < 1e-15);
        assert!((p.cg.x - 0.015).abs() < 1e-15);
        assert!((p.mass() - expected * 680.0).abs() < 1e-12);
        assert!((p.rotational_unit_inertia - (0.004_f64.powi(2) + 0.005_f64.powi(2)) / 2.0).abs() < 1e-15);
    }

    #[test]
    fn thickness_is_clamped_to_radius() {
        let p = tube_properties(0.1, 0.01, 1.0, 1000.0);
        assert!((p.volume - p.full_volume).abs() < 1e-15);
    }

    #[test]
    fn zero_length_tube_is_empty() {
        assert_eq!(tube_properties(0.0, 0.01, 0.001, 1000.0), AxisymmetricProperties::ZERO);
    }
}
