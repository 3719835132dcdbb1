//! Core module: the generic query and projection machinery

pub mod entity;
pub mod error;
pub mod fields;
pub mod projection;
pub mod query;
pub mod service;
pub mod store;

pub use entity::Entity;
pub use error::{ApiError, ApiResult, AuthError, EntityError, StorageError};
pub use fields::FieldRegistry;
pub use projection::Projector;
pub use query::{Page, Pagination, QueryDescriptor};
pub use service::EntityService;
pub use store::{EntityStore, RelationLoad, StoreQuery};
