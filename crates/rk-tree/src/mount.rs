//! Lateral placement of components mounted on a body's outer surface.

use crate::error::TreeResult;
use crate::tree::ComponentTree;
use rk_core::ComponentId;
use rk_core::numeric::clamp;
use rk_geometry::AxisymmetricShape;
use tracing::trace;

/// Offset of a component's axis from the rocket's central axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MountShift {
    pub y: f64,
    pub z: f64,
}

impl MountShift {
    pub fn radial_distance(&self) -> f64 {
        rk_core::numeric::hypot(self.y, self.z)
    }
}

/// Compute where a surface-mounted component sits.
///
/// The component is pushed out to the largest outer radius of its nearest
/// body ancestor found at its two ends (both clamped onto that body), plus
/// its own radius, along its clock angle. With no body ancestor the parent
/// radius counts as zero. Returns `None` for coaxial components.
pub fn resolve_mount_shift(tree: &ComponentTree, id: ComponentId) -> TreeResult<Option<MountShift>> {
    let node = tree.get(id)?;
    let Some((own_radius, direction)) = node.surface_mounting() else {
        return Ok(None);
    };

    let body = tree
        .ancestors(id)
        .find_map(|a| tree.get(a).ok().and_then(|c| c.shape()).map(|s| (a, s)));

    let parent_radius = match body {
        None => 0.0,
        Some((body_id, shape)) => {
            let len = shape.length();
            let x1 = clamp(tree.to_relative(id, 0.0, body_id)?, 0.0, len);
            let x2 = clamp(tree.to_relative(id, node.length(), body_id)?, 0.0, len);
            shape.outer_radius(x1).max(shape.outer_radius(x2))
        }
    };

    let distance = parent_radius + own_radius;
    Ok(Some(MountShift {
        y: direction.cos() * distance,
        z: direction.sin() * distance,
    }))
}

/// Recompute and store the shift of every surface-mounted component.
pub(crate) fn refresh_mount_shifts(tree: &mut ComponentTree) -> TreeResult<()> {
    let mut shifts = Vec::new();
    for id in tree.iter_subtree(tree.root()) {
        if let Some(shift) = resolve_mount_shift(tree, id)? {
            shifts.push((id, shift));
        }
    }
    for (id, shift) in shifts {
        trace!(component = %id, y = shift.y, z = shift.z, "mount shift");
        tree.get_mut(id)?.set_mount_shift(shift);
    }
    Ok(())
}
