use std::fmt;
use std::sync::Arc;

use tabula_model::{CustomFilterDraft, CustomFilterSet};
use tracing::{debug, warn};

use super::repository::CustomFilterRepository;
use crate::error::{CustomFilterError, CustomFilterResult};

/// Local copy of the custom filter collection.
///
/// Updates and deletes are applied locally before the repository call and
/// are not rolled back when it fails. Creates wait for the repository,
/// since the new set has no id until it answers.
pub struct CustomFilterStore {
    repository: Arc<dyn CustomFilterRepository>,
    sets: Vec<CustomFilterSet>,
}

impl fmt::Debug for CustomFilterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomFilterStore")
            .field("sets", &self.sets)
            .finish_non_exhaustive()
    }
}

impl CustomFilterStore {
    pub fn new(repository: Arc<dyn CustomFilterRepository>) -> Self {
        Self {
            repository,
            sets: Vec::new(),
        }
    }

    /// Replace the local collection with the repository's.
    pub async fn load(&mut self) -> CustomFilterResult<()> {
        let sets = self.repository.list().await.inspect_err(|error| {
            warn!(error = %error, "failed to load custom filters");
        })?;
        debug!(count = sets.len(), "custom filters loaded");
        self.sets = sets;
        Ok(())
    }

    pub fn sets(&self) -> &[CustomFilterSet] {
        &self.sets
    }

    pub fn get(&self, id: u32) -> Option<&CustomFilterSet> {
        self.sets.iter().find(|set| set.id == id)
    }

    /// Sets scoped to one view type, in collection order.
    pub fn for_type(&self, view_type: &str) -> Vec<CustomFilterSet> {
        self.sets
            .iter()
            .filter(|set| set.view_type == view_type)
            .cloned()
            .collect()
    }

    /// Create the draft when it has no id, otherwise update the set with
    /// that id. Returns the set as stored.
    pub async fn save(
        &mut self,
        draft: CustomFilterDraft,
    ) -> CustomFilterResult<CustomFilterSet> {
        match draft.id {
            Some(id) => self.update(draft.into_set(id)).await,
            None => self.create(draft).await,
        }
    }

    async fn create(
        &mut self,
        draft: CustomFilterDraft,
    ) -> CustomFilterResult<CustomFilterSet> {
        let created =
            self.repository.create(&draft).await.inspect_err(|error| {
                warn!(
                    label = %draft.label,
                    error = %error,
                    "failed to create custom filter"
                );
            })?;
        debug!(id = created.id, "custom filter created");
        self.sets.push(created.clone());
        Ok(created)
    }

    async fn update(
        &mut self,
        set: CustomFilterSet,
    ) -> CustomFilterResult<CustomFilterSet> {
        let Some(position) =
            self.sets.iter().position(|existing| existing.id == set.id)
        else {
            return Err(CustomFilterError::NotFound(set.id));
        };
        self.sets[position] = set.clone();

        let stored =
            self.repository.update(&set).await.inspect_err(|error| {
                warn!(
                    id = set.id,
                    error = %error,
                    "failed to update custom filter"
                );
            })?;
        if let Some(existing) =
            self.sets.iter_mut().find(|existing| existing.id == stored.id)
        {
            *existing = stored.clone();
        }
        Ok(stored)
    }

    /// Remove a set locally, then in the repository.
    pub async fn delete(&mut self, id: u32) -> CustomFilterResult<()> {
        let before = self.sets.len();
        self.sets.retain(|set| set.id != id);
        if self.sets.len() == before {
            return Err(CustomFilterError::NotFound(id));
        }

        self.repository.delete(id).await.inspect_err(|error| {
            warn!(id, error = %error, "failed to delete custom filter");
        })?;
        debug!(id, "custom filter deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom_filters::InMemoryCustomFilterRepository;
    use tabula_model::{FilterOperator, PropertyFilter};

    fn seeded() -> Arc<InMemoryCustomFilterRepository> {
        Arc::new(InMemoryCustomFilterRepository::with_sets(vec![
            CustomFilterDraft::new("series", "Ended").into_set(1),
            CustomFilterDraft::new("queue", "Stalled").into_set(2),
            CustomFilterDraft::new("series", "Anime").into_set(3),
        ]))
    }

    #[tokio::test]
    async fn load_and_scope_by_type() {
        let mut store = CustomFilterStore::new(seeded());
        assert!(store.sets().is_empty());

        store.load().await.unwrap();
        let labels: Vec<_> = store
            .for_type("series")
            .into_iter()
            .map(|set| set.label)
            .collect();
        assert_eq!(labels, vec!["Ended", "Anime"]);
        assert!(store.for_type("history").is_empty());
    }

    #[tokio::test]
    async fn save_creates_then_updates() {
        let repository = seeded();
        let mut store = CustomFilterStore::new(repository.clone());
        store.load().await.unwrap();

        let draft = CustomFilterDraft::new("series", "Long").with_filter(
            PropertyFilter::new(
                "episodeCount",
                100,
                FilterOperator::GreaterThan,
            ),
        );
        let created = store.save(draft).await.unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(store.get(4), Some(&created));

        let mut edit = CustomFilterDraft::from(created);
        edit.label = "Very long".into();
        store.save(edit).await.unwrap();

        assert_eq!(store.get(4).unwrap().label, "Very long");
        let remote = repository.list().await.unwrap();
        assert_eq!(remote.last().unwrap().label, "Very long");
    }

    #[tokio::test]
    async fn delete_removes_locally_and_remotely() {
        let repository = seeded();
        let mut store = CustomFilterStore::new(repository.clone());
        store.load().await.unwrap();

        store.delete(2).await.unwrap();
        assert!(store.get(2).is_none());
        assert_eq!(repository.list().await.unwrap().len(), 2);

        assert_eq!(store.delete(2).await, Err(CustomFilterError::NotFound(2)));
    }
}
