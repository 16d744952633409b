//! Keeps today/upcoming badge counts current.
//!
//! Recomputes on every `Task` change notification, which includes the
//! synthetic `Poll` events a view's [`Poller`](super::poller::Poller) emits.
//! It has no timer of its own: changes made by other processes show up only
//! while some view on the same bus polls [`EntityKind::Task`].

use super::bus::Subscription;
use super::counters::{Clock, TaskCounts};
use crate::facade::{DataFacade, Transport};
use crate::model::entity::EntityKind;
use crate::model::task::Task;
use log::debug;
use std::cell::Cell;
use std::rc::Rc;

pub struct CounterSync {
    counts: Rc<Cell<TaskCounts>>,
    subscription: Subscription,
}

impl CounterSync {
    /// Computes the counts once, then again after every task change.
    ///
    /// Holds the façade weakly; once it is dropped, events are ignored.
    pub fn attach<T, F>(facade: &Rc<DataFacade<T>>, clock: Rc<dyn Clock>, mut on_change: F) -> Self
    where
        T: Transport + 'static,
        F: FnMut(TaskCounts) + 'static,
    {
        let counts = Rc::new(Cell::new(TaskCounts::default()));
        let weak = Rc::downgrade(facade);
        let latest = Rc::clone(&counts);
        let mut recompute = move || {
            let Some(facade) = weak.upgrade() else {
                return;
            };
            let tasks = facade.get_entities::<Task>();
            let next = TaskCounts::compute(&tasks, clock.today());
            debug!(
                "event=counters_recompute module=sync status=ok today={} upcoming={}",
                next.today, next.upcoming
            );
            latest.set(next);
            on_change(next);
        };

        recompute();
        let subscription = facade
            .bus()
            .subscribe(EntityKind::Task, move |_event| recompute());

        Self {
            counts,
            subscription,
        }
    }

    pub fn counts(&self) -> TaskCounts {
        self.counts.get()
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_active()
    }

    pub fn detach(self) {}
}
