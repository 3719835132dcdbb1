//! In-memory implementation of EntityStore for testing and development

use crate::core::entity::Entity;
use crate::core::error::StorageError;
use crate::core::store::{EntityStore, RelationLoad, StoreQuery};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Closure that attaches one relation to a fetched entity
pub type RelationHydrator<T> =
    Arc<dyn Fn(&mut T, &RelationLoad) -> Result<(), StorageError> + Send + Sync>;

/// In-memory entity store.
///
/// Rows live in a `RwLock`-guarded map shared between clones, so a clone is
/// a second handle onto the same data. Relation loading is pluggable: a
/// hydrator closure per relation name, typically capturing a handle to the
/// related store. Relations named in a query without a registered hydrator
/// are ignored, matching the store contract.
#[derive(Clone)]
pub struct InMemoryStore<T: Entity> {
    rows: Arc<RwLock<HashMap<Uuid, T>>>,
    hydrators: HashMap<String, RelationHydrator<T>>,
}

impl<T: Entity> InMemoryStore<T> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
            hydrators: HashMap::new(),
        }
    }

    /// Register a hydrator for a relation name
    pub fn with_relation<F>(mut self, relation: &str, hydrate: F) -> Self
    where
        F: Fn(&mut T, &RelationLoad) -> Result<(), StorageError> + Send + Sync + 'static,
    {
        self.hydrators.insert(relation.to_string(), Arc::new(hydrate));
        self
    }

    /// Insert or replace an entity by its id
    pub fn insert(&self, entity: T) -> Result<(), StorageError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|e| StorageError::in_memory(format!("failed to acquire write lock: {}", e)))?;

        rows.insert(entity.id(), entity);
        Ok(())
    }

    /// All rows, unhydrated, in unspecified order
    pub fn all(&self) -> Result<Vec<T>, StorageError> {
        let rows = self
            .rows
            .read()
            .map_err(|e| StorageError::in_memory(format!("failed to acquire read lock: {}", e)))?;

        Ok(rows.values().cloned().collect())
    }

    /// One row by id, unhydrated
    pub fn get(&self, id: &Uuid) -> Result<Option<T>, StorageError> {
        let rows = self
            .rows
            .read()
            .map_err(|e| StorageError::in_memory(format!("failed to acquire read lock: {}", e)))?;

        Ok(rows.get(id).cloned())
    }

    fn hydrate(&self, entity: &mut T, query: &StoreQuery) -> Result<(), StorageError> {
        for (relation, load) in &query.relations {
            if let Some(hydrator) = self.hydrators.get(relation) {
                hydrator(entity, load)?;
            }
        }
        Ok(())
    }
}

impl<T: Entity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for InMemoryStore<T> {
    async fn find_many(&self, query: &StoreQuery) -> Result<Vec<T>, StorageError> {
        let mut matched: Vec<T> = self
            .all()?
            .into_iter()
            .filter(|row| {
                query
                    .filters
                    .iter()
                    .all(|(field, expected)| row.field_value(field).as_ref() == Some(expected))
            })
            .collect();

        // HashMap iteration order is arbitrary; pagination needs a stable one.
        matched.sort_by_key(|row| (row.created_at(), row.id()));

        let mut page: Vec<T> = matched
            .into_iter()
            .skip(query.skip)
            .take(query.take)
            .collect();

        for row in &mut page {
            self.hydrate(row, query)?;
        }

        Ok(page)
    }

    async fn find_one(&self, id: &Uuid, query: &StoreQuery) -> Result<Option<T>, StorageError> {
        let Some(mut entity) = self.get(id)? else {
            return Ok(None);
        };

        self.hydrate(&mut entity, query)?;
        Ok(Some(entity))
    }
}
