//! Client Data Façade: the only entity access path for views.
//!
//! # Responsibility
//! - Turn typed calls into Resource API requests over a [`Transport`].
//! - Keep the most recently fetched collection per kind for id lookups.
//! - Announce every mutation on the [`ChangeBus`] so other views refresh.
//! - Convert failures into [`Notice`]s instead of errors in view code.
//!
//! # Invariants
//! - Successful create/update publish exactly one event for the kind.
//! - Delete publishes whether or not the server call succeeded.
//! - Transport and server-side failures degrade to empty results plus a
//!   persistent warning; the previous cache is left untouched.
//! - No cache borrow is held while handlers run.

use crate::api::{ApiRequest, ApiResponse};
use crate::model::entity::{Entity, EntityKind};
use crate::model::list::List;
use crate::model::note::Note;
use crate::model::task::Task;
use crate::sync::bus::{ChangeBus, ChangeOrigin};
use log::{info, warn};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::time::Instant;

pub mod cache;
pub mod notice;
pub mod selectors;
pub mod transport;

pub use cache::{CachedEntity, EntityCache};
pub use notice::{Notice, NoticeBoard, NoticeLevel};
pub use transport::{LocalTransport, Transport, TransportError};

/// Tasks and notes carrying one tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedItems {
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
}

impl TaggedItems {
    pub fn total(&self) -> usize {
        self.tasks.len() + self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

pub struct DataFacade<T: Transport> {
    transport: T,
    bus: ChangeBus,
    cache: RefCell<EntityCache>,
    notices: RefCell<NoticeBoard>,
}

impl<T: Transport> DataFacade<T> {
    pub fn new(transport: T) -> Self {
        Self::with_bus(transport, ChangeBus::new())
    }

    /// Builds a façade that publishes on an existing bus, so several
    /// façades in one view tree share listeners.
    pub fn with_bus(transport: T, bus: ChangeBus) -> Self {
        Self {
            transport,
            bus,
            cache: RefCell::new(EntityCache::default()),
            notices: RefCell::new(NoticeBoard::new()),
        }
    }

    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches the full collection for `E`.
    ///
    /// Returns an empty `Vec` on transport or server failure.
    pub fn get_entities<E: CachedEntity>(&self) -> Vec<E> {
        let request = ApiRequest::get(E::KIND.collection_path());
        let Some(response) = self.exchange(E::KIND, request) else {
            return Vec::new();
        };
        if !response.is_success() {
            self.reject(E::KIND, &response);
            return Vec::new();
        }

        match decode::<Vec<E>>(response) {
            Ok(items) => {
                self.cache.borrow_mut().replace(items.clone());
                items
            }
            Err(err) => {
                self.unreachable(E::KIND, &err);
                Vec::new()
            }
        }
    }

    /// Builds the record locally via the entity factory, then submits it.
    ///
    /// Returns the stored record on success.
    pub fn create_entity<E: CachedEntity>(&self, draft: E::Draft) -> Option<E> {
        let record = match E::from_draft(draft) {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    "event=facade_create module=facade status=rejected kind={} error={}",
                    E::KIND,
                    err
                );
                self.notices.borrow_mut().error(err.to_string(), Instant::now());
                return None;
            }
        };

        let body = match serde_json::to_value(&record) {
            Ok(body) => body,
            Err(err) => {
                self.unreachable(E::KIND, &TransportError::Decode(err.to_string()));
                return None;
            }
        };
        let created: E = self.mutate(
            E::KIND,
            ApiRequest::post(E::KIND.collection_path(), body),
        )?;

        self.cache.borrow_mut().upsert(created.clone());
        self.notices
            .borrow_mut()
            .success(format!("{} created", E::KIND.label()), Instant::now());
        info!(
            "event=facade_create module=facade status=ok kind={} id={}",
            E::KIND,
            created.id()
        );
        self.bus.publish(E::KIND, ChangeOrigin::Created);
        Some(created)
    }

    /// Submits a partial update; absent patch fields keep their values.
    ///
    /// A missing id raises a "<Kind> not found" notice and returns `None`.
    pub fn update_entity<E: CachedEntity>(&self, id: &str, patch: &E::Patch) -> Option<E> {
        let body = match serde_json::to_value(patch) {
            Ok(body) => body,
            Err(err) => {
                self.unreachable(E::KIND, &TransportError::Decode(err.to_string()));
                return None;
            }
        };
        let updated: E = self.mutate(E::KIND, ApiRequest::put(E::KIND.item_path(id), body))?;

        self.cache.borrow_mut().upsert(updated.clone());
        info!(
            "event=facade_update module=facade status=ok kind={} id={}",
            E::KIND,
            id
        );
        self.bus.publish(E::KIND, ChangeOrigin::Updated);
        Some(updated)
    }

    /// Submits a delete and always announces the attempted change.
    pub fn delete_entity<E: CachedEntity>(&self, id: &str) -> bool {
        let deleted = match self.exchange(E::KIND, ApiRequest::delete(E::KIND.item_path(id))) {
            Some(response) if response.is_success() => {
                self.cache.borrow_mut().remove::<E>(id);
                true
            }
            Some(response) => {
                self.reject(E::KIND, &response);
                false
            }
            None => false,
        };

        info!(
            "event=facade_delete module=facade status={} kind={} id={}",
            if deleted { "ok" } else { "error" },
            E::KIND,
            id
        );
        self.bus.publish(E::KIND, ChangeOrigin::Deleted);
        deleted
    }

    /// Looks `id` up in the most recently fetched collection.
    pub fn get_entity_by_id<E: CachedEntity>(&self, id: &str) -> Option<E> {
        self.cache.borrow().find::<E>(id).cloned()
    }

    /// Tasks whose ids the list reports in its `taskIds`.
    pub fn get_tasks_in_list(&self, list_id: &str) -> Vec<Task> {
        let lists = self.get_entities::<List>();
        let Some(list) = lists.iter().find(|list| list.id == list_id) else {
            return Vec::new();
        };
        self.get_entities::<Task>()
            .into_iter()
            .filter(|task| list.contains_task(&task.id))
            .collect()
    }

    pub fn get_items_with_tag(&self, tag_id: &str) -> TaggedItems {
        TaggedItems {
            tasks: self
                .get_entities::<Task>()
                .into_iter()
                .filter(|task| task.has_tag(tag_id))
                .collect(),
            notes: self
                .get_entities::<Note>()
                .into_iter()
                .filter(|note| note.has_tag(tag_id))
                .collect(),
        }
    }

    pub fn count_items_with_tag(&self, tag_id: &str) -> usize {
        self.get_items_with_tag(tag_id).total()
    }

    /// Unexpired notices, oldest first.
    pub fn active_notices(&self, now: Instant) -> Vec<Notice> {
        self.notices.borrow_mut().active(now).to_vec()
    }

    pub fn latest_notice(&self) -> Option<Notice> {
        self.notices.borrow().latest().cloned()
    }

    pub fn dismiss_notice(&self, id: u64) -> bool {
        self.notices.borrow_mut().dismiss(id)
    }

    fn mutate<E: Entity>(&self, kind: EntityKind, request: ApiRequest) -> Option<E> {
        let response = self.exchange(kind, request)?;
        if !response.is_success() {
            self.reject(kind, &response);
            return None;
        }
        match decode::<E>(response) {
            Ok(record) => Some(record),
            Err(err) => {
                self.unreachable(kind, &err);
                None
            }
        }
    }

    /// Sends one request. Transport failures and 5xx answers are reported
    /// here and yield `None`; 4xx answers are returned to the caller.
    fn exchange(&self, kind: EntityKind, request: ApiRequest) -> Option<ApiResponse> {
        match self.transport.send(request) {
            Ok(response) if response.status >= 500 => {
                let details = response
                    .error_message()
                    .unwrap_or("internal server error")
                    .to_string();
                self.unreachable(kind, &TransportError::Unavailable(details));
                None
            }
            Ok(response) => Some(response),
            Err(err) => {
                self.unreachable(kind, &err);
                None
            }
        }
    }

    fn reject(&self, kind: EntityKind, response: &ApiResponse) {
        let message = response
            .error_message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} request failed", kind.label()));
        warn!(
            "event=facade_request module=facade status=rejected kind={} http_status={}",
            kind, response.status
        );
        self.notices.borrow_mut().error(message, Instant::now());
    }

    fn unreachable(&self, kind: EntityKind, err: &TransportError) {
        warn!(
            "event=facade_request module=facade status=unavailable kind={} error={}",
            kind, err
        );
        self.notices.borrow_mut().warning(
            format!("{} request failed: {err}", kind.label()),
            Instant::now(),
        );
    }
}

fn decode<D: DeserializeOwned>(response: ApiResponse) -> Result<D, TransportError> {
    let body = response
        .body
        .ok_or_else(|| TransportError::Decode("empty response body".to_string()))?;
    serde_json::from_value(body).map_err(|err| TransportError::Decode(err.to_string()))
}
