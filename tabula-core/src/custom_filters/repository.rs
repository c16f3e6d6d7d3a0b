use async_trait::async_trait;
use parking_lot::Mutex;
use tabula_model::{CustomFilterDraft, CustomFilterSet};

use crate::error::{CustomFilterError, CustomFilterResult};

/// Remote CRUD for custom filter sets, keyed by numeric id.
#[async_trait]
pub trait CustomFilterRepository: Send + Sync {
    async fn list(&self) -> CustomFilterResult<Vec<CustomFilterSet>>;

    /// Persist a new set; the repository assigns its id.
    async fn create(
        &self,
        draft: &CustomFilterDraft,
    ) -> CustomFilterResult<CustomFilterSet>;

    async fn update(
        &self,
        set: &CustomFilterSet,
    ) -> CustomFilterResult<CustomFilterSet>;

    async fn delete(&self, id: u32) -> CustomFilterResult<()>;
}

#[derive(Debug, Default)]
struct Collection {
    sets: Vec<CustomFilterSet>,
    last_id: u32,
}

/// Repository that keeps sets in process memory. Ids start at 1.
#[derive(Debug, Default)]
pub struct InMemoryCustomFilterRepository {
    collection: Mutex<Collection>,
}

impl InMemoryCustomFilterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with existing sets.
    pub fn with_sets(sets: Vec<CustomFilterSet>) -> Self {
        let last_id = sets.iter().map(|set| set.id).max().unwrap_or(0);
        Self {
            collection: Mutex::new(Collection { sets, last_id }),
        }
    }
}

#[async_trait]
impl CustomFilterRepository for InMemoryCustomFilterRepository {
    async fn list(&self) -> CustomFilterResult<Vec<CustomFilterSet>> {
        Ok(self.collection.lock().sets.clone())
    }

    async fn create(
        &self,
        draft: &CustomFilterDraft,
    ) -> CustomFilterResult<CustomFilterSet> {
        let mut collection = self.collection.lock();
        let id = collection.last_id.checked_add(1).ok_or_else(|| {
            CustomFilterError::Repository("id space exhausted".into())
        })?;
        collection.last_id = id;

        let set = draft.clone().into_set(id);
        collection.sets.push(set.clone());
        Ok(set)
    }

    async fn update(
        &self,
        set: &CustomFilterSet,
    ) -> CustomFilterResult<CustomFilterSet> {
        let mut collection = self.collection.lock();
        let existing = collection
            .sets
            .iter_mut()
            .find(|existing| existing.id == set.id)
            .ok_or(CustomFilterError::NotFound(set.id))?;
        *existing = set.clone();
        Ok(set.clone())
    }

    async fn delete(&self, id: u32) -> CustomFilterResult<()> {
        let mut collection = self.collection.lock();
        let before = collection.sets.len();
        collection.sets.retain(|set| set.id != id);
        if collection.sets.len() == before {
            return Err(CustomFilterError::NotFound(id));
        }
        Ok(())
    }
}
