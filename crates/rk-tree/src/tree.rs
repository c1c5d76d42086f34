//! Arena storage for the component tree and axial positioning.

use crate::component::{Component, ComponentType, RelativePosition};
use crate::error::{TreeError, TreeResult};
use rk_core::ComponentId;

/// Owns every node of one rocket.
///
/// Nodes live in slots addressed by [`ComponentId`]. Removing a node empties
/// its slot for good, so stale handles fail lookups instead of aliasing a
/// newer node.
#[derive(Clone, Debug)]
pub struct ComponentTree {
    slots: Vec<Option<Component>>,
    root: ComponentId,
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentTree {
    /// A tree holding only the rocket root.
    pub fn new() -> Self {
        Self {
            slots: vec![Some(Component::rocket())],
            root: ComponentId::from_index(0),
        }
    }

    pub fn root(&self) -> ComponentId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.slots
            .get(id.index() as usize)
            .is_some_and(|slot| slot.is_some())
    }

    pub fn get(&self, id: ComponentId) -> TreeResult<&Component> {
        self.slots
            .get(id.index() as usize)
            .and_then(Option::as_ref)
            .ok_or(TreeError::UnknownComponent { id })
    }

    pub(crate) fn get_mut(&mut self, id: ComponentId) -> TreeResult<&mut Component> {
        self.slots
            .get_mut(id.index() as usize)
            .and_then(Option::as_mut)
            .ok_or(TreeError::UnknownComponent { id })
    }

    pub(crate) fn components_mut(&mut self) -> impl Iterator<Item = &mut Component> {
        self.slots.iter_mut().flatten()
    }

    pub fn parent(&self, id: ComponentId) -> TreeResult<Option<ComponentId>> {
        Ok(self.get(id)?.parent)
    }

    pub fn children(&self, id: ComponentId) -> TreeResult<&[ComponentId]> {
        Ok(&self.get(id)?.children)
    }

    /// Index of `id` among its parent's children.
    pub fn child_index(&self, id: ComponentId) -> TreeResult<Option<usize>> {
        let Some(parent) = self.get(id)?.parent else {
            return Ok(None);
        };
        Ok(self.get(parent)?.children.iter().position(|&c| c == id))
    }

    pub fn previous_sibling(&self, id: ComponentId) -> TreeResult<Option<ComponentId>> {
        let Some(parent) = self.get(id)?.parent else {
            return Ok(None);
        };
        let siblings = &self.get(parent)?.children;
        Ok(siblings
            .iter()
            .position(|&c| c == id)
            .and_then(|i| i.checked_sub(1))
            .map(|i| siblings[i]))
    }

    pub fn next_sibling(&self, id: ComponentId) -> TreeResult<Option<ComponentId>> {
        let Some(parent) = self.get(id)?.parent else {
            return Ok(None);
        };
        let siblings = &self.get(parent)?.children;
        Ok(siblings
            .iter()
            .position(|&c| c == id)
            .and_then(|i| siblings.get(i + 1).copied()))
    }

    /// Whether `parent` exists and may own a child of `child` type.
    pub fn is_compatible(&self, parent: ComponentId, child: ComponentType) -> bool {
        self.get(parent)
            .is_ok_and(|p| p.component_type().accepts(child))
    }

    /// Pre-order walk of the subtree rooted at `id` (inclusive).
    pub fn iter_subtree(&self, id: ComponentId) -> Subtree<'_> {
        let stack = if self.contains(id) { vec![id] } else { Vec::new() };
        Subtree { tree: self, stack }
    }

    /// Proper ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: ComponentId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(id).ok().and_then(|c| c.parent),
        }
    }

    /// Stages in order (the root's children).
    pub fn stages(&self) -> &[ComponentId] {
        self.get(self.root)
            .map(|root| root.children.as_slice())
            .unwrap_or(&[])
    }

    /// Stage number containing `id`, counted from the top.
    pub fn stage_number(&self, id: ComponentId) -> TreeResult<Option<usize>> {
        self.get(id)?;
        let stage = std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&a| self.get(a).is_ok_and(|c| c.component_type() == ComponentType::Stage));
        Ok(stage.and_then(|s| self.stages().iter().position(|&x| x == s)))
    }

    // --- structural edits (no notification; see Rocket) ---

    pub(crate) fn insert(
        &mut self,
        parent: ComponentId,
        index: Option<usize>,
        mut component: Component,
    ) -> TreeResult<ComponentId> {
        let parent_node = self.get(parent)?;
        let child_type = component.component_type();
        if !parent_node.component_type().accepts(child_type) {
            return Err(TreeError::Incompatible {
                parent: parent_node.component_type(),
                child: child_type,
            });
        }
        let len = parent_node.children.len();
        let index = index.unwrap_or(len);
        if index > len {
            return Err(TreeError::IndexOob { index, len });
        }

        let id = ComponentId::from_index(self.slots.len() as u32);
        component.parent = Some(parent);
        component.children.clear();
        self.slots.push(Some(component));
        self.get_mut(parent)?.children.insert(index, id);
        Ok(id)
    }

    /// Detach and destroy the subtree rooted at `id`; returns the destroyed nodes.
    pub(crate) fn remove(&mut self, id: ComponentId) -> TreeResult<Vec<Component>> {
        if id == self.root {
            return Err(TreeError::RootRemoval);
        }
        let parent = self.get(id)?.parent;
        let doomed: Vec<ComponentId> = self.iter_subtree(id).collect();
        if let Some(parent) = parent {
            self.get_mut(parent)?.children.retain(|&c| c != id);
        }
        Ok(doomed
            .into_iter()
            .filter_map(|d| self.slots.get_mut(d.index() as usize).and_then(Option::take))
            .collect())
    }

    /// Move `id` to `index` among its current siblings.
    pub(crate) fn move_child(&mut self, id: ComponentId, index: usize) -> TreeResult<()> {
        let parent = self.get(id)?.parent.ok_or(TreeError::RootRemoval)?;
        let siblings = &mut self.get_mut(parent)?.children;
        let len = siblings.len();
        if index >= len {
            return Err(TreeError::IndexOob { index, len });
        }
        siblings.retain(|&c| c != id);
        siblings.insert(index, id);
        Ok(())
    }

    // --- axial positioning ---

    /// Length of a node. Assemblies span their `After`-positioned children.
    pub fn length(&self, id: ComponentId) -> TreeResult<f64> {
        let node = self.get(id)?;
        if !node.component_type().is_assembly() {
            return Ok(node.length());
        }
        let mut total = 0.0;
        for &child in &node.children {
            if self.get(child)?.relative_position() == RelativePosition::After {
                total += self.length(child)?;
            }
        }
        Ok(total)
    }

    /// Fore-end position of `id` in its parent's frame.
    pub fn position_in_parent(&self, id: ComponentId) -> TreeResult<f64> {
        let node = self.get(id)?;
        let Some(parent) = node.parent else {
            return Ok(0.0);
        };
        let value = node.position_value();
        let pos = match node.relative_position() {
            RelativePosition::Top => value,
            RelativePosition::Middle => (self.length(parent)? - self.length(id)?) / 2.0 + value,
            RelativePosition::Bottom => self.length(parent)? - self.length(id)? + value,
            RelativePosition::After => match self.previous_sibling(id)? {
                Some(prev) => self.position_in_parent(prev)? + self.length(prev)? + value,
                None => value,
            },
            RelativePosition::Absolute => value - self.absolute_x(parent)?,
        };
        Ok(pos)
    }

    /// Fore-end position of `id` measured from the rocket tip.
    pub fn absolute_x(&self, id: ComponentId) -> TreeResult<f64> {
        let mut x = self.position_in_parent(id)?;
        for ancestor in self.ancestors(id) {
            x += self.position_in_parent(ancestor)?;
        }
        Ok(x)
    }

    /// Map the axial coordinate `x` of `id`'s frame into the frame of `target`.
    pub fn to_relative(&self, id: ComponentId, x: f64, target: ComponentId) -> TreeResult<f64> {
        Ok(self.absolute_x(id)? + x - self.absolute_x(target)?)
    }
}

/// Pre-order iterator over a subtree.
pub struct Subtree<'a> {
    tree: &'a ComponentTree,
    stack: Vec<ComponentId>,
}

impl Iterator for Subtree<'_> {
    type Item = ComponentId;

    fn next(&mut self) -> Option<ComponentId> {
        let id = self.stack.pop()?;
        if let Ok(node) = self.tree.get(id) {
            self.stack.extend(node.children.iter().rev());
        }
        Some(id)
    }
}

/// Walks parent links upward.
pub struct Ancestors<'a> {
    tree: &'a ComponentTree,
    next: Option<ComponentId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ComponentId;

    fn next(&mut self) -> Option<ComponentId> {
        let id = self.next?;
        self.next = self.tree.get(id).ok().and_then(|c| c.parent);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn two_body_stage() -> (ComponentTree, ComponentId, ComponentId, ComponentId) {
        let mut tree = ComponentTree::new();
        let stage = tree.insert(tree.root(), None, Component::stage()).unwrap();
        let nose = tree
            .insert(stage, None, Component::nose_cone().with_length(0.1))
            .unwrap();
        let body = tree
            .insert(stage, None, Component::body_tube().with_length(0.3))
            .unwrap();
        (tree, stage, nose, body)
    }

    #[test]
    fn after_positions_stack() {
        let (tree, stage, nose, body) = two_body_stage();
        assert!(approx(tree.length(stage).unwrap(), 0.4));
        assert!(approx(tree.length(tree.root()).unwrap(), 0.4));
        assert!(approx(tree.position_in_parent(nose).unwrap(), 0.0));
        assert!(approx(tree.position_in_parent(body).unwrap(), 0.1));
        assert!(approx(tree.absolute_x(body).unwrap(), 0.1));
    }

    #[test]
    fn positioning_modes() {
        let (mut tree, _, _, body) = two_body_stage();
        let lug = |pos, v| Component::launch_lug().with_length(0.05).with_position(pos, v);

        let top = tree.insert(body, None, lug(RelativePosition::Top, 0.01)).unwrap();
        let mid = tree.insert(body, None, lug(RelativePosition::Middle, 0.0)).unwrap();
        let bottom = tree.insert(body, None, lug(RelativePosition::Bottom, -0.02)).unwrap();
        let abs = tree.insert(body, None, lug(RelativePosition::Absolute, 0.2)).unwrap();

        assert!(approx(tree.position_in_parent(top).unwrap(), 0.01));
        assert!(approx(tree.position_in_parent(mid).unwrap(), 0.125));
        assert!(approx(tree.position_in_parent(bottom).unwrap(), 0.23));
        assert!(approx(tree.position_in_parent(abs).unwrap(), 0.1));
        assert!(approx(tree.absolute_x(abs).unwrap(), 0.2));
    }

    #[test]
    fn to_relative_maps_between_frames() {
        let (mut tree, _, nose, body) = two_body_stage();
        let lug = tree
            .insert(
                body,
                None,
                Component::launch_lug().with_position(RelativePosition::Top, 0.05),
            )
            .unwrap();
        assert!(approx(tree.to_relative(lug, 0.0, body).unwrap(), 0.05));
        assert!(approx(tree.to_relative(lug, 0.01, nose).unwrap(), 0.16));
    }

    #[test]
    fn insertion_checks() {
        let (mut tree, stage, nose, _) = two_body_stage();
        let err = tree.insert(tree.root(), None, Component::body_tube()).unwrap_err();
        assert!(matches!(err, TreeError::Incompatible { .. }));
        let err = tree.insert(stage, Some(5), Component::body_tube()).unwrap_err();
        assert_eq!(err, TreeError::IndexOob { index: 5, len: 2 });

        let first = tree.insert(stage, Some(0), Component::transition()).unwrap();
        assert_eq!(tree.children(stage).unwrap()[0], first);
        assert_eq!(tree.previous_sibling(nose).unwrap(), Some(first));
        assert_eq!(tree.next_sibling(first).unwrap(), Some(nose));
        assert_eq!(tree.previous_sibling(first).unwrap(), None);
    }

    #[test]
    fn removal_destroys_subtree_and_handles_stay_dead() {
        let (mut tree, stage, _, body) = two_body_stage();
        let lug = tree.insert(body, None, Component::launch_lug()).unwrap();
        let removed = tree.remove(body).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(!tree.contains(body));
        assert!(!tree.contains(lug));
        assert_eq!(tree.children(stage).unwrap().len(), 1);

        let fresh = tree.insert(stage, None, Component::body_tube()).unwrap();
        assert_ne!(fresh, body);
        assert_ne!(fresh, lug);
        assert!(matches!(tree.remove(tree.root()), Err(TreeError::RootRemoval)));
    }

    #[test]
    fn subtree_is_preorder() {
        let (mut tree, stage, nose, body) = two_body_stage();
        let lug = tree.insert(body, None, Component::launch_lug()).unwrap();
        let order: Vec<_> = tree.iter_subtree(tree.root()).collect();
        assert_eq!(order, vec![tree.root(), stage, nose, body, lug]);
        let up: Vec<_> = tree.ancestors(lug).collect();
        assert_eq!(up, vec![body, stage, tree.root()]);
    }

    #[test]
    fn move_within_parent() {
        let (mut tree, stage, nose, body) = two_body_stage();
        tree.move_child(body, 0).unwrap();
        assert_eq!(tree.children(stage).unwrap(), &[body, nose]);
        assert!(approx(tree.position_in_parent(nose).unwrap(), 0.3));
        assert!(tree.move_child(body, 2).is_err());
    }

    #[test]
    fn stage_numbers() {
        let (mut tree, stage, _, body) = two_body_stage();
        let booster = tree.insert(tree.root(), None, Component::stage()).unwrap();
        let tube = tree.insert(booster, None, Component::body_tube()).unwrap();
        assert_eq!(tree.stage_number(body).unwrap(), Some(0));
        assert_eq!(tree.stage_number(stage).unwrap(), Some(0));
        assert_eq!(tree.stage_number(tube).unwrap(), Some(1));
        assert_eq!(tree.stage_number(tree.root()).unwrap(), None);
    }
}
