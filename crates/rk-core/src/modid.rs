//! Modification-ID allocation.
//!
//! Every edit of a rocket tree stamps one or more counters with a fresh
//! [`ModId`]. Values come from a [`ModIdSequence`], which is the only piece of
//! the model that may be touched from several threads at once: a simulation
//! running elsewhere can poll the IDs while an editor keeps mutating the tree.

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// A point in a tree's edit history.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModId(u64);

impl ModId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ModId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static GLOBAL: OnceLock<ModIdSequence> = OnceLock::new();

/// Atomic, monotonically increasing source of [`ModId`] values.
///
/// Clones share the same underlying counter.
#[derive(Clone, Debug)]
pub struct ModIdSequence {
    next: Arc<AtomicU64>,
}

impl Default for ModIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl ModIdSequence {
    /// Create an independent sequence starting at 1.
    pub fn new() -> Self {
        Self {
            next: Arc::new(AtomicU64::new(1)),
        }
    }

    /// The process-wide sequence shared by every tree that does not inject its own.
    pub fn global() -> Self {
        GLOBAL.get_or_init(Self::new).clone()
    }

    /// Allocate a fresh ID, never returned before by this sequence.
    pub fn next_id(&self) -> ModId {
        ModId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Make sure every later allocation is strictly greater than `id`.
    pub fn observe(&self, id: ModId) {
        self.next.fetch_max(id.0 + 1, Ordering::Relaxed);
    }

    /// Peek at the value the next allocation would return.
    pub fn peek(&self) -> ModId {
        ModId(self.next.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn ids_are_strictly_increasing() {
        let seq = ModIdSequence::new();
        let a = seq.next_id();
        let b = seq.next_id();
        assert!(b > a);
        assert_eq!(a.get(), 1);
    }

    #[test]
    fn observe_skips_past_restored_ids() {
        let seq = ModIdSequence::new();
        seq.observe(ModId(41));
        assert_eq!(seq.next_id().get(), 42);

        // Observing an older value never rewinds.
        seq.observe(ModId(3));
        assert_eq!(seq.next_id().get(), 43);
    }

    #[test]
    fn clones_share_the_counter() {
        let seq = ModIdSequence::new();
        let other = seq.clone();
        let a = seq.next_id();
        let b = other.next_id();
        assert_ne!(a, b);
    }

    #[test]
    fn concurrent_allocation_never_collides() {
        let seq = ModIdSequence::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let seq = seq.clone();
                thread::spawn(move || (0..250).map(|_| seq.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<ModId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 1000);
    }

    #[test]
    fn global_sequence_is_shared() {
        let a = ModIdSequence::global().next_id();
        let b = ModIdSequence::global().next_id();
        assert!(b > a);
    }
}
