//! Generic read service over any entity type
//!
//! One [`EntityService`] instance per entity type exposes list/get with
//! consistent pagination and not-found semantics, regardless of the backing
//! store. The service is read-only and holds no state besides the store
//! handle, so calls may run concurrently without coordination.

use crate::core::entity::Entity;
use crate::core::error::{ApiResult, EntityError};
use crate::core::query::{Page, QueryDescriptor};
use crate::core::store::{EntityStore, StoreQuery};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Read operations parameterized by entity type
pub struct EntityService<T: Entity> {
    store: Arc<dyn EntityStore<T>>,
}

impl<T: Entity> EntityService<T> {
    pub fn new(store: Arc<dyn EntityStore<T>>) -> Self {
        Self { store }
    }

    /// List entities matching the descriptor.
    ///
    /// An empty result is not an error; the response echoes the pagination
    /// parameters that were applied.
    pub async fn list(&self, descriptor: &QueryDescriptor) -> ApiResult<Page<T>> {
        let query = StoreQuery::from(descriptor);
        let items = self.store.find_many(&query).await?;

        Ok(Page {
            items,
            page: descriptor.pagination.page,
            per_page: descriptor.pagination.per_page,
        })
    }

    /// Fetch one entity by identifier, attaching the descriptor's relations.
    ///
    /// Filters on a single-item fetch act as a post-fetch consistency check:
    /// an entity that exists but does not satisfy them is reported as not
    /// found, indistinguishable from an absent identifier.
    pub async fn get(&self, id: &Uuid, descriptor: &QueryDescriptor) -> ApiResult<T> {
        let mut query = StoreQuery::from(descriptor);
        // Filters are checked below against the fetched entity, not pushed
        // down to the store.
        query.filters.clear();

        let entity = self
            .store
            .find_one(id, &query)
            .await?
            .ok_or_else(|| Self::not_found(id))?;

        if !matches_filters(&entity, &descriptor.filters) {
            return Err(Self::not_found(id).into());
        }

        Ok(entity)
    }

    fn not_found(id: &Uuid) -> EntityError {
        EntityError::NotFound {
            entity_type: T::resource_name_singular().to_string(),
            id: *id,
        }
    }
}

/// Whether the entity satisfies every filter.
///
/// A filter naming a field the entity does not expose is unsatisfied.
fn matches_filters<T: Entity>(entity: &T, filters: &IndexMap<String, Value>) -> bool {
    filters
        .iter()
        .all(|(field, expected)| entity.field_value(field).as_ref() == Some(expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{ApiError, StorageError};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use serde::Serialize;

    #[derive(Clone, Debug, Serialize)]
    struct Note {
        id: Uuid,
        entity_type: String,
        body: String,
        pinned: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    impl Note {
        fn new(body: &str, pinned: bool) -> Self {
            let now = Utc::now();
            Self {
                id: Uuid::new_v4(),
                entity_type: "note".to_string(),
                body: body.to_string(),
                pinned,
                created_at: now,
                updated_at: now,
            }
        }
    }

    impl Entity for Note {
        fn resource_name() -> &'static str {
            "notes"
        }

        fn resource_name_singular() -> &'static str {
            "note"
        }

        fn response_fields() -> &'static [&'static str] {
            &["body", "pinned"]
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn entity_type(&self) -> &str {
            &self.entity_type
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }

        fn updated_at(&self) -> DateTime<Utc> {
            self.updated_at
        }

        fn field_value(&self, field: &str) -> Option<Value> {
            match field {
                "body" => Some(Value::String(self.body.clone())),
                "pinned" => Some(Value::Bool(self.pinned)),
                _ => None,
            }
        }
    }

    /// Minimal store stub: filters and pagination applied in order, no
    /// relation support.
    struct StubStore {
        rows: Vec<Note>,
    }

    #[async_trait]
    impl EntityStore<Note> for StubStore {
        async fn find_many(&self, query: &StoreQuery) -> Result<Vec<Note>, StorageError> {
            Ok(self
                .rows
                .iter()
                .filter(|row| {
                    query
                        .filters
                        .iter()
                        .all(|(f, v)| row.field_value(f).as_ref() == Some(v))
                })
                .skip(query.skip)
                .take(query.take)
                .cloned()
                .collect())
        }

        async fn find_one(
            &self,
            id: &Uuid,
            _query: &StoreQuery,
        ) -> Result<Option<Note>, StorageError> {
            Ok(self.rows.iter().find(|row| row.id == *id).cloned())
        }
    }

    fn service(rows: Vec<Note>) -> EntityService<Note> {
        EntityService::new(Arc::new(StubStore { rows }))
    }

    fn descriptor(raw: &[(&str, &str)]) -> QueryDescriptor {
        let pairs: Vec<(String, String)> = raw
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        QueryDescriptor::parse(&pairs)
    }

    #[tokio::test]
    async fn test_list_echoes_pagination() {
        let svc = service(vec![Note::new("a", false), Note::new("b", true)]);
        let page = svc
            .list(&descriptor(&[("page", "1"), ("perPage", "1")]))
            .await
            .expect("list should succeed");

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 1);
    }

    #[tokio::test]
    async fn test_list_empty_result_is_ok() {
        let svc = service(vec![Note::new("a", false)]);
        let page = svc
            .list(&descriptor(&[("filter[pinned]", "true")]))
            .await
            .expect("list should succeed");

        assert!(page.items.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 15);
    }

    #[tokio::test]
    async fn test_get_existing() {
        let note = Note::new("hello", true);
        let svc = service(vec![note.clone()]);

        let found = svc
            .get(&note.id, &descriptor(&[]))
            .await
            .expect("get should succeed");
        assert_eq!(found.id, note.id);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let svc = service(vec![Note::new("hello", true)]);
        let err = svc
            .get(&Uuid::new_v4(), &descriptor(&[]))
            .await
            .expect_err("get should fail");

        assert!(matches!(
            err,
            ApiError::Entity(EntityError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_filter_mismatch_is_not_found() {
        let note = Note::new("hello", false);
        let svc = service(vec![note.clone()]);

        let err = svc
            .get(&note.id, &descriptor(&[("filter[pinned]", "true")]))
            .await
            .expect_err("get should fail");

        assert!(matches!(
            err,
            ApiError::Entity(EntityError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_filter_match_succeeds() {
        let note = Note::new("hello", true);
        let svc = service(vec![note.clone()]);

        let found = svc
            .get(&note.id, &descriptor(&[("filter[pinned]", "true")]))
            .await
            .expect("get should succeed");
        assert_eq!(found.id, note.id);
    }

    #[tokio::test]
    async fn test_get_filter_on_unknown_field_is_not_found() {
        let note = Note::new("hello", true);
        let svc = service(vec![note.clone()]);

        let err = svc
            .get(&note.id, &descriptor(&[("filter[ghost]", "1")]))
            .await
            .expect_err("get should fail");

        assert!(matches!(
            err,
            ApiError::Entity(EntityError::NotFound { .. })
        ));
    }
}
