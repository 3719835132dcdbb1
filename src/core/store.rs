//! Store query translation and the store trait
//!
//! [`StoreQuery`] is the shape every storage backend understands: equality
//! filters, relations to eagerly load, and skip/take pagination. The
//! translation from a [`QueryDescriptor`] never fails; a filter naming a
//! field the backend does not know is forwarded as-is and becomes the
//! backend's responsibility to reject or ignore.

use crate::core::entity::Entity;
use crate::core::error::StorageError;
use crate::core::query::QueryDescriptor;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

/// How a single relation should be loaded
#[derive(Debug, Clone, PartialEq)]
pub enum RelationLoad {
    /// Load the relation itself
    Flat,
    /// Load the relation plus the named nested relations (opaque segments
    /// beyond one level are kept verbatim)
    Nested(Vec<String>),
}

/// The find/filter/pagination arguments a storage layer understands
#[derive(Debug, Clone, PartialEq)]
pub struct StoreQuery {
    /// Field → value equality conditions, last-write-wins per field
    pub filters: IndexMap<String, Value>,

    /// Relation name → load specification
    pub relations: IndexMap<String, RelationLoad>,

    /// Rows to skip
    pub skip: usize,

    /// Rows to return after skipping
    pub take: usize,
}

impl Default for StoreQuery {
    /// An unconstrained query: no filters, no relations, no pagination
    fn default() -> Self {
        Self {
            filters: IndexMap::new(),
            relations: IndexMap::new(),
            skip: 0,
            take: usize::MAX,
        }
    }
}

impl From<&QueryDescriptor> for StoreQuery {
    fn from(descriptor: &QueryDescriptor) -> Self {
        let relations = descriptor
            .includes
            .iter()
            .map(|(relation, nested)| {
                let load = if nested.is_empty() {
                    RelationLoad::Flat
                } else {
                    RelationLoad::Nested(nested.clone())
                };
                (relation.clone(), load)
            })
            .collect();

        Self {
            filters: descriptor.filters.clone(),
            relations,
            skip: descriptor.pagination.skip(),
            take: descriptor.pagination.take(),
        }
    }
}

/// Read contract every storage backend implements for an entity type.
///
/// `relations` must be honored exactly as shaped by the translator; unknown
/// relation names are ignored rather than rejected.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Find entities matching the query's filters, with `skip`/`take`
    /// applied and the requested relations attached
    async fn find_many(&self, query: &StoreQuery) -> Result<Vec<T>, StorageError>;

    /// Find one entity by identifier with the requested relations attached.
    ///
    /// Only the `relations` part of the query is honored here; filters on a
    /// single-item fetch are the caller's concern.
    async fn find_one(&self, id: &Uuid, query: &StoreQuery) -> Result<Option<T>, StorageError>;
}
