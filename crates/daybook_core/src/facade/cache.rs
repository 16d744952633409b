//! Most recently fetched collection per entity kind.

use crate::model::entity::Entity;
use crate::model::list::List;
use crate::model::note::Note;
use crate::model::tag::Tag;
use crate::model::task::Task;

#[derive(Debug, Default, Clone)]
pub struct EntityCache {
    tasks: Vec<Task>,
    notes: Vec<Note>,
    lists: Vec<List>,
    tags: Vec<Tag>,
}

/// Entity types with a slot in [`EntityCache`].
pub trait CachedEntity: Entity {
    fn slot(cache: &EntityCache) -> &Vec<Self>;

    fn slot_mut(cache: &mut EntityCache) -> &mut Vec<Self>;
}

macro_rules! cached_entity {
    ($entity:ty, $field:ident) => {
        impl CachedEntity for $entity {
            fn slot(cache: &EntityCache) -> &Vec<Self> {
                &cache.$field
            }

            fn slot_mut(cache: &mut EntityCache) -> &mut Vec<Self> {
                &mut cache.$field
            }
        }
    };
}

cached_entity!(Task, tasks);
cached_entity!(Note, notes);
cached_entity!(List, lists);
cached_entity!(Tag, tags);

impl EntityCache {
    pub fn items<E: CachedEntity>(&self) -> &[E] {
        E::slot(self)
    }

    pub fn replace<E: CachedEntity>(&mut self, items: Vec<E>) {
        *E::slot_mut(self) = items;
    }

    pub fn find<E: CachedEntity>(&self, id: &str) -> Option<&E> {
        E::slot(self).iter().find(|item| item.id() == id)
    }

    /// Replaces the cached copy in place, or appends a new record.
    pub fn upsert<E: CachedEntity>(&mut self, item: E) {
        let slot = E::slot_mut(self);
        match slot.iter_mut().find(|cached| cached.id() == item.id()) {
            Some(cached) => *cached = item,
            None => slot.push(item),
        }
    }

    pub fn remove<E: CachedEntity>(&mut self, id: &str) -> bool {
        let slot = E::slot_mut(self);
        let before = slot.len();
        slot.retain(|item| item.id() != id);
        slot.len() != before
    }
}
