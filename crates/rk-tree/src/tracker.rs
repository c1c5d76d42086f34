//! Modification counters of one rocket.

use crate::event::ChangeKind;
use rk_core::{ModId, ModIdSequence};

/// The five counters a rocket keeps.
///
/// `overall` moves on every recorded change. The others move only when the
/// change carries their category; `functional` moves unless the change is
/// purely nonfunctional.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModIds {
    pub overall: ModId,
    pub mass: ModId,
    pub aerodynamic: ModId,
    pub tree: ModId,
    pub functional: ModId,
}

impl ModIds {
    fn all(id: ModId) -> Self {
        Self {
            overall: id,
            mass: id,
            aerodynamic: id,
            tree: id,
            functional: id,
        }
    }

    /// Largest of the five.
    pub fn max(&self) -> ModId {
        [self.mass, self.aerodynamic, self.tree, self.functional]
            .into_iter()
            .fold(self.overall, ModId::max)
    }
}

#[derive(Clone, Debug)]
pub struct ModificationTracker {
    seq: ModIdSequence,
    ids: ModIds,
}

impl ModificationTracker {
    /// Start with every counter at one fresh ID.
    pub fn new(seq: ModIdSequence) -> Self {
        let ids = ModIds::all(seq.next_id());
        Self { seq, ids }
    }

    pub fn ids(&self) -> ModIds {
        self.ids
    }

    pub fn sequence(&self) -> &ModIdSequence {
        &self.seq
    }

    /// Stamp the counters touched by `kind`. Undo changes carry restored
    /// counters and are not stamped; returns whether anything moved.
    pub fn record(&mut self, kind: ChangeKind) -> bool {
        if kind.is_undo_change() {
            return false;
        }
        let id = self.seq.next_id();
        self.ids.overall = id;
        if kind.is_mass_change() {
            self.ids.mass = id;
        }
        if kind.is_aerodynamic_change() {
            self.ids.aerodynamic = id;
        }
        if kind.is_tree_change() {
            self.ids.tree = id;
        }
        if !kind.is_nonfunctional_only() {
            self.ids.functional = id;
        }
        true
    }

    /// Adopt counters from a snapshot. The sequence is advanced past them so
    /// later edits still get strictly larger IDs.
    pub fn restore(&mut self, ids: ModIds) {
        self.seq.observe(ids.max());
        self.ids = ids;
    }
}
