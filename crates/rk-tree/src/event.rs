//! Change events fired by the rocket tree.

use rk_core::ComponentId;

bitflags::bitflags! {
    /// Categories of change carried by a [`ChangeEvent`].
    ///
    /// Combine with bitwise OR: `ChangeKind::MASS | ChangeKind::AERODYNAMIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChangeKind: u32 {
        /// Cosmetic or descriptive edits (names, designer, ...).
        const NONFUNCTIONAL = 1 << 0;
        const MASS = 1 << 1;
        const AERODYNAMIC = 1 << 2;
        /// Nodes were added, removed or reordered.
        const TREE = 1 << 3;
        /// State restored from undo/redo history.
        const UNDO = 1 << 4;
        const MOTOR = 1 << 5;
        const OTHER = 1 << 6;

        const BOTH = Self::MASS.bits() | Self::AERODYNAMIC.bits();
    }
}

impl ChangeKind {
    pub fn is_mass_change(self) -> bool {
        self.contains(ChangeKind::MASS)
    }

    pub fn is_aerodynamic_change(self) -> bool {
        self.contains(ChangeKind::AERODYNAMIC)
    }

    pub fn is_tree_change(self) -> bool {
        self.contains(ChangeKind::TREE)
    }

    pub fn is_undo_change(self) -> bool {
        self.contains(ChangeKind::UNDO)
    }

    pub fn is_motor_change(self) -> bool {
        self.contains(ChangeKind::MOTOR)
    }

    /// Exactly NONFUNCTIONAL and nothing else.
    pub fn is_nonfunctional_only(self) -> bool {
        self == ChangeKind::NONFUNCTIONAL
    }

    /// Touches neither mass nor aerodynamics, so derived geometry stays valid.
    pub fn is_other_change(self) -> bool {
        !self.intersects(ChangeKind::BOTH)
    }
}

/// Immutable record of one (possibly coalesced) change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Node that caused the change; the root for rocket-wide edits.
    pub source: ComponentId,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(source: ComponentId, kind: ChangeKind) -> Self {
        Self { source, kind }
    }
}
