//! In-process change notification bus.
//!
//! # Invariants
//! - Handlers run synchronously, in subscription order, on the publishing
//!   call stack.
//! - A dropped/cancelled [`Subscription`] is never invoked again, even for an
//!   event already being delivered.
//! - A handler re-entered by its own nested publish is skipped for the
//!   nested event.

use crate::model::entity::EntityKind;
use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// What caused a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    Created,
    Updated,
    Deleted,
    /// Synthetic refresh from a polling timer.
    Poll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: EntityKind,
    pub origin: ChangeOrigin,
}

type Handler = Rc<RefCell<dyn FnMut(&ChangeEvent)>>;

struct Listener {
    id: u64,
    filter: Option<EntityKind>,
    active: Rc<Cell<bool>>,
    handler: Handler,
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    listeners: Vec<Listener>,
}

/// Cheaply clonable handle; clones share one listener registry.
#[derive(Clone, Default)]
pub struct ChangeBus {
    state: Rc<RefCell<BusState>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listens for changes to one entity kind.
    pub fn subscribe(
        &self,
        kind: EntityKind,
        handler: impl FnMut(&ChangeEvent) + 'static,
    ) -> Subscription {
        self.add_listener(Some(kind), Rc::new(RefCell::new(handler)))
    }

    /// Listens for changes to every kind.
    pub fn subscribe_all(&self, handler: impl FnMut(&ChangeEvent) + 'static) -> Subscription {
        self.add_listener(None, Rc::new(RefCell::new(handler)))
    }

    pub fn publish(&self, kind: EntityKind, origin: ChangeOrigin) -> usize {
        self.publish_event(ChangeEvent { kind, origin })
    }

    /// Delivers `event` and returns how many handlers ran.
    pub fn publish_event(&self, event: ChangeEvent) -> usize {
        let targets: Vec<(Rc<Cell<bool>>, Handler)> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.filter.map_or(true, |kind| kind == event.kind))
            .map(|listener| (Rc::clone(&listener.active), Rc::clone(&listener.handler)))
            .collect();

        let mut delivered = 0;
        for (active, handler) in targets {
            if !active.get() {
                continue;
            }
            match handler.try_borrow_mut() {
                Ok(mut handler) => {
                    (&mut *handler)(&event);
                    delivered += 1;
                }
                Err(_) => debug!(
                    "event=bus_skip module=sync status=reentrant kind={} origin={:?}",
                    event.kind, event.origin
                ),
            }
        }
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    fn add_listener(&self, filter: Option<EntityKind>, handler: Handler) -> Subscription {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let active = Rc::new(Cell::new(true));
        state.listeners.push(Listener {
            id,
            filter,
            active: Rc::clone(&active),
            handler,
        });

        Subscription {
            id,
            active,
            state: Rc::downgrade(&self.state),
        }
    }
}

/// Guard returned by `subscribe`; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    active: Rc<Cell<bool>>,
    state: Weak<RefCell<BusState>>,
}

impl Subscription {
    pub fn cancel(self) {}

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.active.set(false);
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let Ok(mut bus_state) = state.try_borrow_mut() else {
            return;
        };
        bus_state.listeners.retain(|listener| listener.id != self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<ChangeEvent>>>, impl FnMut(&ChangeEvent) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |event: &ChangeEvent| sink.borrow_mut().push(*event))
    }

    #[test]
    fn kind_filter_limits_delivery() {
        let bus = ChangeBus::new();
        let (tasks_seen, on_task) = recorder();
        let (all_seen, on_any) = recorder();
        let _tasks = bus.subscribe(EntityKind::Task, on_task);
        let _all = bus.subscribe_all(on_any);

        bus.publish(EntityKind::Note, ChangeOrigin::Created);
        bus.publish(EntityKind::Task, ChangeOrigin::Deleted);

        assert_eq!(tasks_seen.borrow().len(), 1);
        assert_eq!(tasks_seen.borrow()[0].origin, ChangeOrigin::Deleted);
        assert_eq!(all_seen.borrow().len(), 2);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let bus = ChangeBus::new();
        let (seen, handler) = recorder();
        let subscription = bus.subscribe(EntityKind::Tag, handler);
        assert_eq!(bus.listener_count(), 1);

        subscription.cancel();
        assert_eq!(bus.listener_count(), 0);
        assert_eq!(bus.publish(EntityKind::Tag, ChangeOrigin::Poll), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn subscription_outliving_its_bus_drops_cleanly() {
        let bus = ChangeBus::new();
        let subscription = bus.subscribe_all(|_| {});
        drop(bus);
        assert!(subscription.is_active());
        drop(subscription);
    }

    #[test]
    fn nested_publish_skips_the_running_handler() {
        let bus = ChangeBus::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let inner_bus = bus.clone();
        let _sub = bus.subscribe(EntityKind::List, move |_| {
            counter.set(counter.get() + 1);
            inner_bus.publish(EntityKind::List, ChangeOrigin::Updated);
        });

        assert_eq!(bus.publish(EntityKind::List, ChangeOrigin::Created), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn handler_cancelled_mid_delivery_is_not_called() {
        let bus = ChangeBus::new();
        let later: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&later);
        let _first = bus.subscribe(EntityKind::Task, move |_| {
            slot.borrow_mut().take();
        });
        let (seen, handler) = recorder();
        *later.borrow_mut() = Some(bus.subscribe(EntityKind::Task, handler));

        bus.publish(EntityKind::Task, ChangeOrigin::Updated);
        assert!(seen.borrow().is_empty());
        assert_eq!(bus.listener_count(), 1);
    }
}
