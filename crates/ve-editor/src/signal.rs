//! Multi-subscriber signals for the drag lifecycle.
//!
//! Delivery is synchronous and in subscription order. Unsubscribing is by
//! the `SubscriptionId` returned from `on`, not by closure identity.
//! Subscribers may subscribe or unsubscribe while an emit is in progress;
//! the change takes effect from the next emit.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by `Signal::on`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Rc<dyn Fn()>;

pub struct Signal {
    name: &'static str,
    subscribers: RefCell<Vec<(SubscriptionId, Callback)>>,
    next_id: Cell<u64>,
}

impl Signal {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn on(&self, callback: impl Fn() + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was not subscribed.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers.borrow_mut();
        match subs.iter().position(|(sid, _)| *sid == id) {
            Some(pos) => {
                subs.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn emit(&self) {
        // Snapshot so callbacks can re-enter `on`/`off`.
        let subs: Vec<Callback> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        log::trace!("emit {} -> {} subscriber(s)", self.name, subs.len());
        for cb in subs {
            cb();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// The drag-start / drag-end pair shared by the editor surface (which
/// emits) and the command table (which listens).
#[derive(Debug, Clone)]
pub struct DragSignals {
    pub start: Rc<Signal>,
    pub end: Rc<Signal>,
}

impl Default for DragSignals {
    fn default() -> Self {
        Self {
            start: Rc::new(Signal::new("dragstart")),
            end: Rc::new(Signal::new("dragend")),
        }
    }
}
