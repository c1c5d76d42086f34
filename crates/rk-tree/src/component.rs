//! Component nodes and their per-kind data.
//!
//! Setters never fire events themselves. They validate/clamp, apply the value
//! and report the category of change they caused (`None` when the value did
//! not actually change); [`crate::Rocket::modify`] turns that into a
//! notification.

use crate::event::ChangeKind;
use crate::motor::{MotorConfigId, MotorMount, MotorMountData, MotorSlot};
use crate::mount::MountShift;
use core::fmt;
use rk_core::numeric::{approx_eq, clamp, reduce_180};
use rk_geometry::{
    AxisymmetricProperties, Coordinate, Profile, SolidOfRevolution, integrate, tube_properties,
};
use std::cell::OnceCell;

pub const DEFAULT_RADIUS: f64 = 0.025;
pub const DEFAULT_THICKNESS: f64 = 0.002;
/// Cardboard (kg/m³).
pub const DEFAULT_DENSITY: f64 = 680.0;

pub const LAUNCH_LUG_RADIUS: f64 = 0.01 / 2.0;
pub const LAUNCH_LUG_THICKNESS: f64 = 0.001;
pub const LAUNCH_LUG_LENGTH: f64 = 0.03;

pub const INNER_TUBE_RADIUS: f64 = 0.019 / 2.0;
pub const INNER_TUBE_THICKNESS: f64 = 0.0005;
pub const INNER_TUBE_LENGTH: f64 = 0.07;

/// Node type, used for attachment compatibility and display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComponentType {
    Rocket,
    Stage,
    NoseCone,
    BodyTube,
    Transition,
    InnerTube,
    LaunchLug,
}

impl ComponentType {
    /// Whether a node of this type may own a child of type `child`.
    pub fn accepts(self, child: ComponentType) -> bool {
        use ComponentType::*;
        match self {
            Rocket => child == Stage,
            Stage => matches!(child, NoseCone | BodyTube | Transition),
            BodyTube => matches!(child, InnerTube | LaunchLug),
            NoseCone | Transition => child == LaunchLug,
            InnerTube | LaunchLug => false,
        }
    }

    /// Rocket and stages: containers whose length comes from their children.
    pub fn is_assembly(self) -> bool {
        matches!(self, ComponentType::Rocket | ComponentType::Stage)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentType::Rocket => "Rocket",
            ComponentType::Stage => "Stage",
            ComponentType::NoseCone => "Nose cone",
            ComponentType::BodyTube => "Body tube",
            ComponentType::Transition => "Transition",
            ComponentType::InnerTube => "Inner tube",
            ComponentType::LaunchLug => "Launch lug",
        };
        f.write_str(name)
    }
}

/// How a node's axial position is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelativePosition {
    /// Fore ends aligned, plus offset.
    Top,
    /// Centres aligned, plus offset.
    Middle,
    /// Aft ends aligned, plus offset.
    Bottom,
    /// Directly behind the previous sibling, plus offset.
    After,
    /// Offset measured from the tip of the rocket.
    Absolute,
}

/// Wall, fill and material of a body of revolution.
#[derive(Clone, Debug, PartialEq)]
pub struct SymmetricBody {
    profile: Profile,
    thickness: f64,
    filled: bool,
    density: f64,
}

impl SymmetricBody {
    pub fn new(profile: Profile) -> Self {
        let profile = profile.sanitized();
        let max_radius = profile.fore().max(profile.aft());
        Self {
            profile,
            thickness: DEFAULT_THICKNESS.min(max_radius),
            filled: false,
            density: DEFAULT_DENSITY,
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn fore_radius(&self) -> f64 {
        self.profile.fore()
    }

    pub fn aft_radius(&self) -> f64 {
        self.profile.aft()
    }

    fn max_radius(&self) -> f64 {
        self.profile.fore().max(self.profile.aft())
    }

    /// Effective wall thickness: the full radius when filled.
    pub fn thickness(&self) -> f64 {
        if self.filled {
            self.max_radius()
        } else {
            self.thickness.min(self.max_radius())
        }
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Geometry provider view for a body of the given length.
    pub fn shape(&self, length: f64) -> SolidOfRevolution {
        SolidOfRevolution::new(length, self.profile, self.thickness, self.filled)
    }

    /// Set the wall thickness, clamped into `[0, max radius]`. Clears the
    /// filled flag.
    pub fn set_thickness(&mut self, thickness: f64) -> Option<ChangeKind> {
        let thickness = clamp(thickness, 0.0, self.max_radius());
        if approx_eq(self.thickness, thickness) && !self.filled {
            return None;
        }
        self.thickness = thickness;
        self.filled = false;
        Some(ChangeKind::MASS)
    }

    pub fn set_filled(&mut self, filled: bool) -> Option<ChangeKind> {
        if self.filled == filled {
            return None;
        }
        self.filled = filled;
        Some(ChangeKind::MASS)
    }

    /// Material density (kg/m³), floored at zero.
    pub fn set_density(&mut self, density: f64) -> Option<ChangeKind> {
        let density = density.max(0.0);
        if approx_eq(self.density, density) {
            return None;
        }
        self.density = density;
        Some(ChangeKind::MASS)
    }

    pub fn set_profile(&mut self, profile: Profile) -> Option<ChangeKind> {
        let profile = profile.sanitized();
        if profile == self.profile {
            return None;
        }
        self.profile = profile;
        self.thickness = self.thickness.min(self.max_radius());
        Some(ChangeKind::BOTH)
    }

    /// Radius of a cylindrical body; on tapered bodies sets both ends.
    pub fn set_radius(&mut self, radius: f64) -> Option<ChangeKind> {
        let radius = radius.max(0.0);
        let profile = match self.profile {
            Profile::Cylinder { .. } => Profile::Cylinder { radius },
            Profile::Conical { .. } => Profile::Conical {
                fore: radius,
                aft: radius,
            },
            Profile::Ellipsoid { .. } => Profile::Ellipsoid {
                fore: radius,
                aft: radius,
            },
        };
        if approx_eq(self.fore_radius(), radius) && approx_eq(self.aft_radius(), radius) {
            return None;
        }
        self.set_profile(profile)
    }

    pub fn set_fore_radius(&mut self, fore: f64) -> Option<ChangeKind> {
        if approx_eq(self.fore_radius(), fore) {
            return None;
        }
        let profile = match self.profile {
            Profile::Cylinder { .. } => Profile::Cylinder { radius: fore },
            Profile::Conical { aft, .. } => Profile::Conical { fore, aft },
            Profile::Ellipsoid { aft, .. } => Profile::Ellipsoid { fore, aft },
        };
        self.set_profile(profile)
    }

    pub fn set_aft_radius(&mut self, aft: f64) -> Option<ChangeKind> {
        if approx_eq(self.aft_radius(), aft) {
            return None;
        }
        let profile = match self.profile {
            Profile::Cylinder { .. } => Profile::Cylinder { radius: aft },
            Profile::Conical { fore, .. } => Profile::Conical { fore, aft },
            Profile::Ellipsoid { fore, .. } => Profile::Ellipsoid { fore, aft },
        };
        self.set_profile(profile)
    }
}

/// A short external tube guiding the rocket along the launch rod.
#[derive(Clone, Debug, PartialEq)]
pub struct LaunchLug {
    radius: f64,
    thickness: f64,
    /// Clock angle around the body, in (-π, π].
    radial_direction: f64,
    density: f64,
}

impl Default for LaunchLug {
    fn default() -> Self {
        Self {
            radius: LAUNCH_LUG_RADIUS,
            thickness: LAUNCH_LUG_THICKNESS,
            radial_direction: 0.0,
            density: DEFAULT_DENSITY,
        }
    }
}

impl LaunchLug {
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn inner_radius(&self) -> f64 {
        self.radius - self.thickness
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn radial_direction(&self) -> f64 {
        self.radial_direction
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn set_radius(&mut self, radius: f64) -> Option<ChangeKind> {
        let radius = radius.max(0.0);
        if approx_eq(self.radius, radius) {
            return None;
        }
        self.radius = radius;
        self.thickness = self.thickness.min(self.radius);
        Some(ChangeKind::BOTH)
    }

    pub fn set_inner_radius(&mut self, inner: f64) -> Option<ChangeKind> {
        self.set_radius(inner + self.thickness)
    }

    pub fn set_thickness(&mut self, thickness: f64) -> Option<ChangeKind> {
        let thickness = clamp(thickness, 0.0, self.radius);
        if approx_eq(self.thickness, thickness) {
            return None;
        }
        self.thickness = thickness;
        Some(ChangeKind::BOTH)
    }

    /// Clock angle in radians; reduced into (-π, π].
    pub fn set_radial_direction(&mut self, direction: f64) -> Option<ChangeKind> {
        let direction = reduce_180(direction);
        if approx_eq(self.radial_direction, direction) {
            return None;
        }
        self.radial_direction = direction;
        Some(ChangeKind::BOTH)
    }

    pub fn set_density(&mut self, density: f64) -> Option<ChangeKind> {
        let density = density.max(0.0);
        if approx_eq(self.density, density) {
            return None;
        }
        self.density = density;
        Some(ChangeKind::MASS)
    }
}

/// A tube inside a body tube, typically holding motors.
#[derive(Clone, Debug, PartialEq)]
pub struct InnerTube {
    outer_radius: f64,
    thickness: f64,
    density: f64,
    mount: MotorMountData,
}

impl Default for InnerTube {
    fn default() -> Self {
        let mut mount = MotorMountData::default();
        mount.set_active(true);
        Self {
            outer_radius: INNER_TUBE_RADIUS,
            thickness: INNER_TUBE_THICKNESS,
            density: DEFAULT_DENSITY,
            mount,
        }
    }
}

impl InnerTube {
    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn set_outer_radius(&mut self, radius: f64) -> Option<ChangeKind> {
        let radius = radius.max(0.0);
        if approx_eq(self.outer_radius, radius) {
            return None;
        }
        self.outer_radius = radius;
        self.thickness = self.thickness.min(radius);
        Some(ChangeKind::MASS)
    }

    pub fn set_thickness(&mut self, thickness: f64) -> Option<ChangeKind> {
        let thickness = clamp(thickness, 0.0, self.outer_radius);
        if approx_eq(self.thickness, thickness) {
            return None;
        }
        self.thickness = thickness;
        Some(ChangeKind::MASS)
    }
}

/// Per-type payload of a node.
#[derive(Clone, Debug, PartialEq)]
pub enum ComponentKind {
    Rocket,
    Stage,
    NoseCone(SymmetricBody),
    BodyTube {
        body: SymmetricBody,
        mount: MotorMountData,
    },
    Transition(SymmetricBody),
    InnerTube(InnerTube),
    LaunchLug(LaunchLug),
}

impl ComponentKind {
    pub fn component_type(&self) -> ComponentType {
        match self {
            ComponentKind::Rocket => ComponentType::Rocket,
            ComponentKind::Stage => ComponentType::Stage,
            ComponentKind::NoseCone(_) => ComponentType::NoseCone,
            ComponentKind::BodyTube { .. } => ComponentType::BodyTube,
            ComponentKind::Transition(_) => ComponentType::Transition,
            ComponentKind::InnerTube(_) => ComponentType::InnerTube,
            ComponentKind::LaunchLug(_) => ComponentType::LaunchLug,
        }
    }
}

/// A node of the rocket tree.
///
/// Parent and children are handles into the owning tree; the parent link is
/// for lookup only.
#[derive(Clone, Debug)]
pub struct Component {
    name: String,
    length: f64,
    position: RelativePosition,
    position_value: f64,
    kind: ComponentKind,
    pub(crate) parent: Option<rk_core::ComponentId>,
    pub(crate) children: Vec<rk_core::ComponentId>,
    derived: OnceCell<AxisymmetricProperties>,
    mount_shift: MountShift,
}

impl Component {
    fn with_kind(kind: ComponentKind, length: f64, position: RelativePosition) -> Self {
        Self {
            name: kind.component_type().to_string(),
            length: length.max(0.0),
            position,
            position_value: 0.0,
            kind,
            parent: None,
            children: Vec::new(),
            derived: OnceCell::new(),
            mount_shift: MountShift::default(),
        }
    }

    pub(crate) fn rocket() -> Self {
        Self::with_kind(ComponentKind::Rocket, 0.0, RelativePosition::After)
    }

    pub fn stage() -> Self {
        Self::with_kind(ComponentKind::Stage, 0.0, RelativePosition::After)
    }

    /// Conical nose cone with the default radius.
    pub fn nose_cone() -> Self {
        Self::with_kind(
            ComponentKind::NoseCone(SymmetricBody::new(Profile::Conical {
                fore: 0.0,
                aft: DEFAULT_RADIUS,
            })),
            4.0 * DEFAULT_RADIUS,
            RelativePosition::After,
        )
    }

    pub fn body_tube() -> Self {
        Self::with_kind(
            ComponentKind::BodyTube {
                body: SymmetricBody::new(Profile::Cylinder {
                    radius: DEFAULT_RADIUS,
                }),
                mount: MotorMountData::default(),
            },
            8.0 * DEFAULT_RADIUS,
            RelativePosition::After,
        )
    }

    pub fn transition() -> Self {
        Self::with_kind(
            ComponentKind::Transition(SymmetricBody::new(Profile::Conical {
                fore: DEFAULT_RADIUS,
                aft: DEFAULT_RADIUS,
            })),
            3.0 * DEFAULT_RADIUS,
            RelativePosition::After,
        )
    }

    pub fn inner_tube() -> Self {
        Self::with_kind(
            ComponentKind::InnerTube(InnerTube::default()),
            INNER_TUBE_LENGTH,
            RelativePosition::Bottom,
        )
    }

    pub fn launch_lug() -> Self {
        Self::with_kind(
            ComponentKind::LaunchLug(LaunchLug::default()),
            LAUNCH_LUG_LENGTH,
            RelativePosition::Middle,
        )
    }

    // --- builders, for assembling nodes before they are attached ---

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_length(mut self, length: f64) -> Self {
        if !self.component_type().is_assembly() {
            self.length = length.max(0.0);
        }
        self
    }

    pub fn with_position(mut self, position: RelativePosition, value: f64) -> Self {
        self.position = position;
        self.position_value = value;
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        if let Some(body) = self.body_mut() {
            body.set_profile(profile);
        }
        self
    }

    // --- read access ---

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn component_type(&self) -> ComponentType {
        self.kind.component_type()
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// Own length. Assemblies report 0 here; use [`crate::ComponentTree::length`].
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn relative_position(&self) -> RelativePosition {
        self.position
    }

    pub fn position_value(&self) -> f64 {
        self.position_value
    }

    pub fn parent(&self) -> Option<rk_core::ComponentId> {
        self.parent
    }

    pub fn children(&self) -> &[rk_core::ComponentId] {
        &self.children
    }

    pub fn body(&self) -> Option<&SymmetricBody> {
        match &self.kind {
            ComponentKind::NoseCone(body)
            | ComponentKind::Transition(body)
            | ComponentKind::BodyTube { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn as_launch_lug(&self) -> Option<&LaunchLug> {
        match &self.kind {
            ComponentKind::LaunchLug(lug) => Some(lug),
            _ => None,
        }
    }

    pub fn as_inner_tube(&self) -> Option<&InnerTube> {
        match &self.kind {
            ComponentKind::InnerTube(tube) => Some(tube),
            _ => None,
        }
    }

    /// Geometry provider for axisymmetric body components.
    pub fn shape(&self) -> Option<SolidOfRevolution> {
        self.body().map(|body| body.shape(self.length))
    }

    pub fn motor_mount(&self) -> Option<&dyn MotorMount> {
        match &self.kind {
            ComponentKind::BodyTube { mount, .. } => Some(mount),
            ComponentKind::InnerTube(tube) => Some(&tube.mount),
            _ => None,
        }
    }

    /// `(own radius, clock angle)` for nodes mounted on a parent's outer surface.
    pub(crate) fn surface_mounting(&self) -> Option<(f64, f64)> {
        match &self.kind {
            ComponentKind::LaunchLug(lug) => Some((lug.radius, lug.radial_direction)),
            _ => None,
        }
    }

    pub fn is_massive(&self) -> bool {
        !self.component_type().is_assembly()
    }

    pub fn is_aerodynamic(&self) -> bool {
        matches!(
            self.component_type(),
            ComponentType::NoseCone
                | ComponentType::BodyTube
                | ComponentType::Transition
                | ComponentType::LaunchLug
        )
    }

    // --- derived properties ---

    /// Derived geometry, computed on first read after invalidation.
    pub fn properties(&self) -> &AxisymmetricProperties {
        self.derived.get_or_init(|| self.compute_properties())
    }

    fn compute_properties(&self) -> AxisymmetricProperties {
        match &self.kind {
            ComponentKind::Rocket | ComponentKind::Stage => AxisymmetricProperties::ZERO,
            ComponentKind::NoseCone(body)
            | ComponentKind::Transition(body)
            | ComponentKind::BodyTube { body, .. } => {
                integrate(&body.shape(self.length), body.density)
            }
            ComponentKind::InnerTube(tube) => {
                tube_properties(self.length, tube.outer_radius, tube.thickness, tube.density)
            }
            ComponentKind::LaunchLug(lug) => {
                tube_properties(self.length, lug.radius, lug.thickness, lug.density)
            }
        }
    }

    /// Whether derived properties are currently cached.
    pub fn has_cached_properties(&self) -> bool {
        self.derived.get().is_some()
    }

    pub fn volume(&self) -> f64 {
        self.properties().volume
    }

    pub fn full_volume(&self) -> f64 {
        self.properties().full_volume
    }

    pub fn wetted_area(&self) -> f64 {
        self.properties().wetted_area
    }

    pub fn planform_area(&self) -> f64 {
        self.properties().planform_area
    }

    pub fn planform_center(&self) -> f64 {
        self.properties().planform_center
    }

    /// CG in the component's own frame, weighted by mass.
    pub fn cg(&self) -> Coordinate {
        self.properties().cg
    }

    pub fn mass(&self) -> f64 {
        self.properties().mass()
    }

    pub fn longitudinal_unit_inertia(&self) -> f64 {
        self.properties().longitudinal_unit_inertia
    }

    pub fn rotational_unit_inertia(&self) -> f64 {
        self.properties().rotational_unit_inertia
    }

    /// Cached lateral offset from the central axis (zero for coaxial nodes).
    pub fn mount_shift(&self) -> MountShift {
        self.mount_shift
    }

    pub(crate) fn set_mount_shift(&mut self, shift: MountShift) {
        self.mount_shift = shift;
    }

    /// React to a tree-wide notification.
    pub(crate) fn component_changed(&mut self, kind: ChangeKind) {
        if !kind.is_other_change() {
            self.derived.take();
        }
    }

    // --- setters ---

    pub fn set_name(&mut self, name: impl Into<String>) -> Option<ChangeKind> {
        let name = name.into();
        if self.name == name {
            return None;
        }
        self.name = name;
        Some(ChangeKind::NONFUNCTIONAL)
    }

    /// Own length, floored at zero. Assembly lengths are derived and cannot be set.
    pub fn set_length(&mut self, length: f64) -> Option<ChangeKind> {
        if self.component_type().is_assembly() {
            return None;
        }
        let length = length.max(0.0);
        if approx_eq(self.length, length) {
            return None;
        }
        self.length = length;
        Some(ChangeKind::BOTH)
    }

    pub fn set_relative_position(&mut self, position: RelativePosition) -> Option<ChangeKind> {
        if self.position == position {
            return None;
        }
        self.position = position;
        Some(ChangeKind::BOTH)
    }

    pub fn set_position_value(&mut self, value: f64) -> Option<ChangeKind> {
        if approx_eq(self.position_value, value) {
            return None;
        }
        self.position_value = value;
        Some(ChangeKind::BOTH)
    }

    pub fn body_mut(&mut self) -> Option<&mut SymmetricBody> {
        match &mut self.kind {
            ComponentKind::NoseCone(body)
            | ComponentKind::Transition(body)
            | ComponentKind::BodyTube { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn launch_lug_mut(&mut self) -> Option<&mut LaunchLug> {
        match &mut self.kind {
            ComponentKind::LaunchLug(lug) => Some(lug),
            _ => None,
        }
    }

    pub fn inner_tube_mut(&mut self) -> Option<&mut InnerTube> {
        match &mut self.kind {
            ComponentKind::InnerTube(tube) => Some(tube),
            _ => None,
        }
    }

    pub fn motor_mount_mut(&mut self) -> Option<&mut MotorMountData> {
        match &mut self.kind {
            ComponentKind::BodyTube { mount, .. } => Some(mount),
            ComponentKind::InnerTube(tube) => Some(&mut tube.mount),
            _ => None,
        }
    }

    pub fn set_motor_mount(&mut self, active: bool) -> Option<ChangeKind> {
        self.motor_mount_mut()?
            .set_active(active)
            .then_some(ChangeKind::MOTOR)
    }

    pub fn set_motor(&mut self, config: MotorConfigId, slot: Option<MotorSlot>) -> Option<ChangeKind> {
        self.motor_mount_mut()?
            .set_motor(config, slot)
            .then_some(ChangeKind::MOTOR)
    }

    pub fn set_motor_count(&mut self, count: u32) -> Option<ChangeKind> {
        self.motor_mount_mut()?
            .set_cluster_count(count)
            .then_some(ChangeKind::MOTOR | ChangeKind::MASS)
    }
}
