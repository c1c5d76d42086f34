//! Mass and inertia totals over a subtree.

use crate::error::TreeResult;
use crate::tree::ComponentTree;
use rk_core::ComponentId;
use rk_core::numeric::pow2;
use rk_geometry::Coordinate;

/// Totals for a component and all of its descendants, in the rocket frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubtreeSummary {
    pub volume: f64,
    pub wetted_area: f64,
    pub planform_area: f64,
    /// Absolute CG; `weight` is the total mass.
    pub cg: Coordinate,
    /// About a transverse axis through `cg` (kg·m²).
    pub longitudinal_inertia: f64,
    /// About the longitudinal axis through `cg` (kg·m²).
    pub rotational_inertia: f64,
}

impl SubtreeSummary {
    pub fn mass(&self) -> f64 {
        self.cg.weight
    }
}

/// Absolute CG of a single node, mount shift applied.
pub fn absolute_cg(tree: &ComponentTree, id: ComponentId) -> TreeResult<Coordinate> {
    let node = tree.get(id)?;
    let shift = node.mount_shift();
    let cg = node.cg();
    Ok(cg.translate(tree.absolute_x(id)?, shift.y, shift.z))
}

pub fn subtree_summary(tree: &ComponentTree, id: ComponentId) -> TreeResult<SubtreeSummary> {
    let mut parts = Vec::new();
    let mut summary = SubtreeSummary::default();
    for node_id in tree.iter_subtree(id) {
        let node = tree.get(node_id)?;
        if !node.is_massive() {
            continue;
        }
        let props = *node.properties();
        let cg = absolute_cg(tree, node_id)?;
        summary.volume += props.volume;
        summary.wetted_area += props.wetted_area;
        summary.planform_area += props.planform_area;
        if cg.weight > 0.0 {
            summary.cg = summary.cg.average(cg);
        }
        parts.push((cg, props));
    }

    let total = summary.cg;
    for (cg, props) in parts {
        let m = cg.weight;
        summary.longitudinal_inertia += m * (props.longitudinal_unit_inertia + pow2(cg.x - total.x));
        summary.rotational_inertia +=
            m * (props.rotational_unit_inertia + pow2(cg.y - total.y) + pow2(cg.z - total.z));
    }
    Ok(summary)
}
