//! Frustum integration of axisymmetric shapes.
//!
//! The shape is cut into [`DIVISIONS`] equal slices along x and every slice is
//! treated as a conical frustum between the radii at its two ends. All derived
//! properties share the same loop, so they are produced together and cached
//! together by callers.

use crate::coordinate::Coordinate;
use crate::shape::AxisymmetricShape;
use rk_core::numeric::{approx_eq, hypot, pow2};
use rk_core::units::{self, Area, Mass, Volume};
use std::f64::consts::PI;
use tracing::trace;

/// Number of slices used when integrating.
pub const DIVISIONS: usize = 100;

/// Volumes at or below this (m³, i.e. 0.1 cm³) are too small to normalize
/// inertia by; a thin-shell surface integral is used instead.
pub const NEGLIGIBLE_VOLUME: f64 = 1e-7;

/// Everything the integrator derives from one shape.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisymmetricProperties {
    /// Material volume (m³).
    pub volume: f64,
    /// Volume as if the shape were solid (m³).
    pub full_volume: f64,
    /// External surface area (m²).
    pub wetted_area: f64,
    /// Side-silhouette area (m²).
    pub planform_area: f64,
    /// Axial centroid of the silhouette (m, local frame).
    pub planform_center: f64,
    /// Centre of gravity in the local frame, weighted by mass (kg).
    pub cg: Coordinate,
    /// Moment of inertia per unit mass about a transverse axis through the CG (m²).
    pub longitudinal_unit_inertia: f64,
    /// Moment of inertia per unit mass about the symmetry axis (m²).
    pub rotational_unit_inertia: f64,
}

impl AxisymmetricProperties {
    /// All-zero result for shapes without extent.
    pub const ZERO: AxisymmetricProperties = AxisymmetricProperties {
        volume: 0.0,
        full_volume: 0.0,
        wetted_area: 0.0,
        planform_area: 0.0,
        planform_center: 0.0,
        cg: Coordinate::NUL,
        longitudinal_unit_inertia: 0.0,
        rotational_unit_inertia: 0.0,
    };

    pub fn mass(&self) -> f64 {
        self.cg.weight
    }

    pub fn volume_si(&self) -> Volume {
        units::m3(self.volume)
    }

    pub fn wetted_area_si(&self) -> Area {
        units::m2(self.wetted_area)
    }

    pub fn planform_area_si(&self) -> Area {
        units::m2(self.planform_area)
    }

    pub fn mass_si(&self) -> Mass {
        units::kg(self.cg.weight)
    }
}

/// Integrate `shape` with material `density` (kg/m³).
///
/// A shape of zero length has no volume, area or inertia and its CG is the
/// origin with zero mass.
pub fn integrate<S: AxisymmetricShape + ?Sized>(shape: &S, density: f64) -> AxisymmetricProperties {
    let length = shape.length();
    if length <= 0.0 {
        return AxisymmetricProperties::ZERO;
    }

    let thickness = shape.thickness();
    let filled = shape.is_filled();
    let l = length / DIVISIONS as f64;
    let pil = PI * l;
    let pil3 = PI * l / 3.0;

    let mut volume = 0.0;
    let mut full_volume = 0.0;
    let mut wet_area = 0.0;
    let mut plan_area = 0.0;
    let mut plan_moment = 0.0;
    let mut cg_moment = 0.0;

    // Volumetric inertia sums (per unit volume once normalized).
    let mut rot_v = 0.0;
    let mut long_v = 0.0;
    // Thin-shell inertia sums (per unit surface once normalized).
    let mut surface = 0.0;
    let mut rot_s = 0.0;
    let mut long_s = 0.0;

    let mut r1 = shape.outer_radius(0.0);
    for n in 1..=DIVISIONS {
        let x = (n - 1) as f64 * l;
        let x_end = if n == DIVISIONS { length } else { n as f64 * l };
        let r2 = shape.outer_radius(x_end);
        let mid = x + l / 2.0;
        let hyp = hypot(r2 - r1, l);
        let outer = (r1 + r2) / 2.0;

        let d_full = pil3 * (r1 * r1 + r1 * r2 + r2 * r2);
        let (dv, inner) = if filled || r1 < thickness || r2 < thickness {
            (d_full, 0.0)
        } else {
            // Wall measured normal to the slant, projected onto the radius.
            // On very steep slices the projection can swallow the whole slice.
            let height = thickness * hyp / l;
            let dv = (pil * height * (r1 + r2 - height)).clamp(0.0, d_full);
            (dv, (outer - height).max(0.0))
        };

        volume += dv;
        full_volume += d_full;
        cg_moment += mid * dv;

        wet_area += hyp * (r1 + r2);

        let p = l * (r1 + r2);
        plan_area += p;
        plan_moment += mid * p;

        rot_v += dv * (pow2(outer) + pow2(inner)) / 2.0;
        long_v += dv * ((3.0 * (pow2(outer) + pow2(inner)) + pow2(l)) / 12.0 + pow2(mid));

        let ds = hyp * (r1 + r2) * PI;
        surface += ds;
        rot_s += ds * pow2(outer);
        long_s += ds * ((6.0 * pow2(outer) + pow2(l)) / 12.0 + pow2(mid));

        r1 = r2;
    }

    let wetted_area = wet_area * PI;
    let planform_center = if plan_area > 0.0 {
        plan_moment / plan_area
    } else {
        0.0
    };

    let cg = if volume == 0.0 {
        Coordinate::NUL
    } else {
        Coordinate::new(cg_moment / volume, 0.0, 0.0, volume * density)
    };

    let (longitudinal, rotational) = if volume > NEGLIGIBLE_VOLUME {
        (long_v / volume, rot_v / volume)
    } else if approx_eq(surface, 0.0) {
        (0.0, 0.0)
    } else {
        trace!(volume, surface, "inertia from thin-shell surface integral");
        (long_s / surface, rot_s / surface)
    };

    AxisymmetricProperties {
        volume,
        full_volume,
        wetted_area,
        planform_area: plan_area,
        planform_center,
        cg,
        // Shift to the component's own CG.
        longitudinal_unit_inertia: (longitudinal - pow2(cg.x)).max(0.0),
        rotational_unit_inertia: rotational,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solid::{Profile, SolidOfRevolution};
    use rk_core::{Tolerances, nearly_equal};

    fn tol(rel: f64) -> Tolerances {
        Tolerances { abs: 1e-15, rel }
    }

    fn tube(length: f64, radius: f64, thickness: f64, filled: bool) -> SolidOfRevolution {
        SolidOfRevolution::new(length, Profile::Cylinder { radius }, thickness, filled)
    }

    #[test]
    fn zero_length_is_all_zero() {
        let p = integrate(&tube(0.0, 0.05, 0.002, false), 1000.0);
        assert_eq!(p, AxisymmetricProperties::ZERO);
        assert_eq!(p.cg, Coordinate::NUL);
    }

    #[test]
    fn hollow_cylinder_volume_and_area() {
        let (l, r, t) = (0.5, 0.04, 0.003);
        let p = integrate(&tube(l, r, t, false), 1000.0);
        let expected_v = PI * l * (r * r - (r - t) * (r - t));
        assert!(nearly_equal(p.volume, expected_v, tol(1e-2)));
        assert!(nearly_equal(p.wetted_area, 2.0 * PI * r * l, tol(1e-2)));
        assert!(nearly_equal(p.full_volume, PI * r * r * l, tol(1e-9)));
        assert!(nearly_equal(p.planform_area, 2.0 * r * l, tol(1e-9)));
        assert!(nearly_equal(p.planform_center, l / 2.0, tol(1e-9)));
        assert!(nearly_equal(p.cg.x, l / 2.0, tol(1e-9)));
        assert!(nearly_equal(p.mass(), expected_v * 1000.0, tol(1e-2)));
    }

    #[test]
    fn solid_cylinder_inertia_matches_closed_form() {
        let (l, r) = (0.3, 0.02);
        let p = integrate(&tube(l, r, 0.0, true), 1200.0);
        assert!(nearly_equal(p.rotational_unit_inertia, r * r / 2.0, tol(1e-9)));
        assert!(nearly_equal(
            p.longitudinal_unit_inertia,
            r * r / 4.0 + l * l / 12.0,
            tol(1e-6)
        ));
    }

    #[test]
    fn hollow_cylinder_rotational_inertia() {
        let (l, r, t) = (0.3, 0.02, 0.002);
        let p = integrate(&tube(l, r, t, false), 1200.0);
        let ri = r - t;
        assert!(nearly_equal(
            p.rotational_unit_inertia,
            (r * r + ri * ri) / 2.0,
            tol(1e-9)
        ));
    }

    #[test]
    fn solid_cone_volume_and_cg() {
        let (l, r) = (0.2, 0.05);
        let cone = SolidOfRevolution::new(l, Profile::Conical { fore: 0.0, aft: r }, 0.0, true);
        let p = integrate(&cone, 500.0);
        assert!(nearly_equal(p.volume, PI * r * r * l / 3.0, tol(1e-9)));
        // Centroid of a cone is a quarter of the height from its base.
        assert!(nearly_equal(p.cg.x, 0.75 * l, tol(1e-3)));
        let slant = (r * r + l * l).sqrt();
        assert!(nearly_equal(p.wetted_area, PI * r * slant, tol(1e-9)));
        assert!(nearly_equal(p.planform_center, 2.0 * l / 3.0, tol(1e-3)));
    }

    #[test]
    fn thin_cone_wall_near_tip_is_treated_as_solid() {
        let cone = SolidOfRevolution::new(
            0.2,
            Profile::Conical {
                fore: 0.0,
                aft: 0.05,
            },
            0.002,
            false,
        );
        let hollow = integrate(&cone, 500.0);
        let solid = integrate(
            &SolidOfRevolution::new(0.2, cone.profile(), 0.0, true),
            500.0,
        );
        assert!(hollow.volume > 0.0);
        assert!(hollow.volume < solid.volume);
        assert_eq!(hollow.full_volume, solid.full_volume);
    }

    #[test]
    fn negligible_volume_falls_back_to_surface() {
        // Zero wall thickness: no material volume, but a real surface.
        let (l, r) = (0.1, 0.01);
        let p = integrate(&tube(l, r, 0.0, false), 1000.0);
        assert_eq!(p.volume, 0.0);
        assert_eq!(p.cg, Coordinate::NUL);
        assert!(nearly_equal(p.rotational_unit_inertia, r * r, tol(1e-9)));
        // CG is the origin, so the unshifted value is retained.
        assert!(p.longitudinal_unit_inertia > 0.0);
    }

    #[test]
    fn zero_radius_has_no_inertia() {
        let p = integrate(&tube(0.1, 0.0, 0.0, false), 1000.0);
        assert_eq!(p.rotational_unit_inertia, 0.0);
        assert_eq!(p.longitudinal_unit_inertia, 0.0);
        assert_eq!(p.wetted_area, 0.0);
        assert_eq!(p.planform_center, 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::solid::{Profile, SolidOfRevolution};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn outputs_are_finite_and_non_negative(
            length in 0.0_f64..2.0,
            fore in 0.0_f64..0.2,
            aft in 0.0_f64..0.2,
            thickness in 0.0_f64..0.05,
            filled in any::<bool>(),
        ) {
            let s = SolidOfRevolution::new(length, Profile::Conical { fore, aft }, thickness, filled);
            let p = integrate(&s, 680.0);
            for v in [
                p.volume,
                p.full_volume,
                p.wetted_area,
                p.planform_area,
                p.longitudinal_unit_inertia,
                p.rotational_unit_inertia,
                p.cg.weight,
            ] {
                prop_assert!(v.is_finite());
                prop_assert!(v >= 0.0);
            }
            prop_assert!(p.volume <= p.full_volume * (1.0 + 1e-9));
            if p.volume > 0.0 {
                prop_assert!(p.cg.x >= 0.0 && p.cg.x <= length * (1.0 + 1e-9));
            }
        }

        #[test]
        fn cylinder_within_one_percent(
            length in 0.01_f64..3.0,
            radius in 0.005_f64..0.2,
            wall in 0.01_f64..0.99,
        ) {
            let t = radius * wall;
            let s = SolidOfRevolution::new(length, Profile::Cylinder { radius }, t, false);
            let p = integrate(&s, 680.0);
            let expected = PI * length * (radius * radius - (radius - t) * (radius - t));
            prop_assert!((p.volume - expected).abs() <= 1e-2 * expected);
            let area = 2.0 * PI * radius * length;
            prop_assert!((p.wetted_area - area).abs() <= 1e-2 * area);
        }
    }
}
