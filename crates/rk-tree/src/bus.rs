//! Listener registry and event batching.

use crate::event::{ChangeEvent, ChangeKind};
use core::fmt;
use rk_core::ListenerId;
use tracing::trace;

/// Which listener family a registration belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Component listeners: told which node changed and how.
    Component,
    /// State listeners: told only that something changed.
    State,
}

struct Registration {
    id: ListenerId,
    channel: Channel,
    callback: Box<dyn FnMut(&ChangeEvent)>,
}

/// Delivers change events to registered listeners.
///
/// Listeners are called in reverse registration order across both channels
/// (most recent first). While frozen, events are held back and coalesced.
#[derive(Default)]
pub struct NotificationBus {
    listeners: Vec<Registration>,
    next_listener: u32,
    pending: Option<Vec<ChangeEvent>>,
}

impl fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationBus")
            .field("listeners", &self.listeners.len())
            .field("pending", &self.pending.as_ref().map(Vec::len))
            .finish()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, channel: Channel, callback: F) -> ListenerId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        let id = ListenerId::from_index(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Registration {
            id,
            channel,
            callback: Box::new(callback),
        });
        id
    }

    /// Unregister; returns false when `id` was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|r| r.id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self, channel: Channel) -> usize {
        self.listeners.iter().filter(|r| r.channel == channel).count()
    }

    pub fn is_frozen(&self) -> bool {
        self.pending.is_some()
    }

    /// Start buffering. Returns false if already frozen (freezing does not nest).
    pub fn freeze(&mut self) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(Vec::new());
        true
    }

    /// Hold `event` back until thaw. Returns it unchanged if not frozen.
    pub fn buffer(&mut self, event: ChangeEvent) -> Option<ChangeEvent> {
        match self.pending.as_mut() {
            Some(pending) => {
                pending.push(event);
                None
            }
            None => Some(event),
        }
    }

    /// Stop buffering and coalesce the batch into one event: the union of
    /// all kinds, attributed to the last source. `None` when not frozen or
    /// nothing was buffered.
    pub fn take_batch(&mut self) -> Option<ChangeEvent> {
        let pending = self.pending.take()?;
        let source = pending.last()?.source;
        let kind = pending
            .iter()
            .fold(ChangeKind::empty(), |acc, e| acc | e.kind);
        trace!(events = pending.len(), ?kind, "coalesced batch");
        Some(ChangeEvent { source, kind })
    }

    /// Call every listener with `event`, newest registration first.
    pub fn dispatch(&mut self, event: &ChangeEvent) {
        for registration in self.listeners.iter_mut().rev() {
            (registration.callback)(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rk_core::ComponentId;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn event(index: u32, kind: ChangeKind) -> ChangeEvent {
        ChangeEvent {
            source: ComponentId::from_index(index),
            kind,
        }
    }

    #[test]
    fn reverse_registration_order_across_channels() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = NotificationBus::new();
        for (name, channel) in [
            ("a", Channel::Component),
            ("b", Channel::State),
            ("c", Channel::Component),
        ] {
            let log = Rc::clone(&log);
            bus.add(channel, move |_| log.borrow_mut().push(name));
        }
        bus.dispatch(&event(0, ChangeKind::MASS));
        assert_eq!(*log.borrow(), vec!["c", "b", "a"]);
        assert_eq!(bus.listener_count(Channel::Component), 2);
        assert_eq!(bus.listener_count(Channel::State), 1);
    }

    #[test]
    fn removed_listeners_are_silent() {
        let hits = Rc::new(RefCell::new(0));
        let mut bus = NotificationBus::new();
        let h = Rc::clone(&hits);
        let id = bus.add(Channel::State, move |_| *h.borrow_mut() += 1);
        assert!(bus.remove(id));
        assert!(!bus.remove(id));
        bus.dispatch(&event(0, ChangeKind::OTHER));
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn batch_coalesces_kinds_and_keeps_last_source() {
        let mut bus = NotificationBus::new();
        assert!(bus.freeze());
        assert!(!bus.freeze());
        assert!(bus.buffer(event(1, ChangeKind::MASS)).is_none());
        assert!(bus.buffer(event(2, ChangeKind::AERODYNAMIC)).is_none());
        let batch = bus.take_batch().unwrap();
        assert_eq!(batch.source, ComponentId::from_index(2));
        assert_eq!(batch.kind, ChangeKind::BOTH);
        assert!(!bus.is_frozen());
        assert!(bus.take_batch().is_none());
    }

    #[test]
    fn empty_batch_yields_nothing() {
        let mut bus = NotificationBus::new();
        bus.freeze();
        assert!(bus.take_batch().is_none());
        assert!(!bus.is_frozen());
        assert_eq!(
            bus.buffer(event(0, ChangeKind::TREE)),
            Some(event(0, ChangeKind::TREE))
        );
    }
}
