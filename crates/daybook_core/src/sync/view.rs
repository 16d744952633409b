//! Per-view lifecycle and explicit editor state.
//!
//! # Invariants
//! - A mounted view re-renders synchronously for every event of a kind it
//!   renders, and on each poll tick.
//! - After `unmount` (or drop) the render callback is never called again
//!   and ticks are no-ops.

use super::bus::{ChangeBus, ChangeEvent, Subscription};
use super::poller::Poller;
use crate::config::AppConfig;
use crate::facade::{CachedEntity, DataFacade, Transport};
use crate::model::entity::EntityKind;
use log::info;
use std::time::{Duration, Instant};

pub struct ViewSession {
    name: String,
    bus: ChangeBus,
    subscriptions: Vec<Subscription>,
    poller: Option<Poller>,
}

impl ViewSession {
    /// Subscribes `render` to `kinds` and, when `poll_interval` is set,
    /// starts a poller that refreshes the same kinds.
    pub fn mount(
        name: impl Into<String>,
        bus: &ChangeBus,
        kinds: &[EntityKind],
        poll_interval: Option<Duration>,
        now: Instant,
        mut render: impl FnMut(&ChangeEvent) + 'static,
    ) -> Self {
        let name = name.into();
        let watched = kinds.to_vec();
        let subscription = bus.subscribe_all(move |event| {
            if watched.contains(&event.kind) {
                render(event);
            }
        });
        info!(
            "event=view_mount module=sync status=ok view={} kinds={} polling={}",
            name,
            kinds.len(),
            poll_interval.is_some()
        );

        Self {
            name,
            bus: bus.clone(),
            subscriptions: vec![subscription],
            poller: poll_interval.map(|interval| Poller::new(interval, kinds, now)),
        }
    }

    /// Mounts a view that polls at the configured `poll_interval`.
    pub fn mount_polling(
        name: impl Into<String>,
        bus: &ChangeBus,
        kinds: &[EntityKind],
        config: &AppConfig,
        now: Instant,
        render: impl FnMut(&ChangeEvent) + 'static,
    ) -> Self {
        Self::mount(name, bus, kinds, Some(config.poll_interval), now, render)
    }

    /// Ties another subscription (e.g. a counter sync) to this view.
    pub fn retain(&mut self, subscription: Subscription) {
        if self.is_mounted() {
            self.subscriptions.push(subscription);
        }
    }

    /// Drives the view's poller; returns whether a refresh was published.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.poller.as_mut() {
            Some(poller) => poller.tick(now, &self.bus),
            None => false,
        }
    }

    pub fn next_poll(&self) -> Option<Instant> {
        self.poller.as_ref().and_then(Poller::next_due)
    }

    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.subscriptions.clear();
        if let Some(poller) = self.poller.as_mut() {
            poller.stop();
        }
        info!("event=view_unmount module=sync status=ok view={}", self.name);
    }

    pub fn is_mounted(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Which record an editor modal currently has open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    editing: Option<String>,
}

impl EditorState {
    pub fn open(&mut self, id: impl Into<String>) {
        self.editing = Some(id.into());
    }

    pub fn close(&mut self) {
        self.editing = None;
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.editing.is_some()
    }

    /// Resolves the open record from the façade's latest fetch.
    ///
    /// Closes the editor when the record has vanished.
    pub fn current<E, T>(&mut self, facade: &DataFacade<T>) -> Option<E>
    where
        E: CachedEntity,
        T: Transport,
    {
        let id = self.editing.as_deref()?;
        let found = facade.get_entity_by_id::<E>(id);
        if found.is_none() {
            self.close();
        }
        found
    }
}
