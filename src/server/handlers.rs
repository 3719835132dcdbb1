//! Generic REST handlers for registered entity types
//!
//! One pair of handlers serves every entity: the query string is parsed
//! into a descriptor, the service resolves it against the store, and the
//! projector filters the serialized result before it leaves the process.

use crate::core::entity::Entity;
use crate::core::error::{ApiError, ApiResult};
use crate::core::projection::Projector;
use crate::core::query::QueryDescriptor;
use crate::core::service::EntityService;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

/// Handler state for one entity type
pub struct EntityState<T: Entity> {
    pub service: Arc<EntityService<T>>,
    pub projector: Arc<Projector>,
}

impl<T: Entity> Clone for EntityState<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            projector: self.projector.clone(),
        }
    }
}

/// Build the read routes for an entity type:
/// `GET /{plural}` and `GET /{plural}/{id}`
pub fn entity_routes<T: Entity + Serialize>(state: EntityState<T>) -> Router {
    Router::new()
        .route(&format!("/{}", T::resource_name()), get(list_entities::<T>))
        .route(
            &format!("/{}/{{id}}", T::resource_name()),
            get(get_entity::<T>),
        )
        .with_state(state)
}

/// GET /{plural}
///
/// Query pairs arrive in raw order so repeated keys (several `include`s)
/// survive; the descriptor parser owns their interpretation.
async fn list_entities<T: Entity + Serialize>(
    State(state): State<EntityState<T>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Value>> {
    let descriptor = QueryDescriptor::parse(&params);
    let page = state.service.list(&descriptor).await?;

    let items = serde_json::to_value(&page.items).map_err(|e| {
        ApiError::Internal(format!("failed to serialize {}: {}", T::resource_name(), e))
    })?;

    // The page wrapper itself is not an entity; only the items get
    // projected.
    Ok(Json(json!({
        "items": state.projector.project(&items),
        "page": page.page,
        "perPage": page.per_page,
    })))
}

/// GET /{plural}/{id}
async fn get_entity<T: Entity + Serialize>(
    State(state): State<EntityState<T>>,
    Path(id): Path<Uuid>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Value>> {
    let descriptor = QueryDescriptor::parse(&params);
    let entity = state.service.get(&id, &descriptor).await?;

    let raw = serde_json::to_value(&entity).map_err(|e| {
        ApiError::Internal(format!(
            "failed to serialize {}: {}",
            T::resource_name_singular(),
            e
        ))
    })?;

    Ok(Json(state.projector.project(&raw)))
}
