//! # Veneer
//!
//! A read-side entity framework for building RESTful APIs in Rust.
//!
//! ## Features
//!
//! - **Annotated Output Fields**: Each entity declares which fields may
//!   leave the server; everything else (password hashes, internal notes)
//!   is stripped from every response
//! - **Cycle-Safe Projection**: Hydrated relation graphs with cycles
//!   collapse to `{"id": ...}` instead of recursing forever
//! - **Uniform Query Strings**: `filter[field]=value`, repeatable
//!   `include=relation`, `page`/`perPage` pagination on every resource
//! - **Store-Agnostic Services**: One generic read service per entity
//!   type over any [`core::EntityStore`] implementation
//! - **Session Auth**: Cookie sessions with Argon2id password hashing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use veneer::prelude::*;
//!
//! let (users, posts) = veneer::api::build_stores();
//!
//! ServerBuilder::new()
//!     .register_resource::<User>(Arc::new(users))
//!     .register_resource::<Post>(Arc::new(posts))
//!     .serve("127.0.0.1:3000")
//!     .await?;
//! ```

pub mod api;
pub mod config;
pub mod core;
pub mod server;
pub mod session;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ApiError, ApiResult, Entity, EntityService, EntityStore, FieldRegistry, Page, Pagination,
        Projector, QueryDescriptor, RelationLoad, StoreQuery,
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;

    // === Session ===
    pub use crate::session::{InMemorySessionStore, Session, SessionStore};

    // === Config ===
    pub use crate::config::{AppConfig, SessionConfig};

    // === Server ===
    pub use crate::server::{EntityState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
    pub use uuid::Uuid;

    // === Axum ===
    pub use axum::{
        Router,
        extract::{Path, Query, State},
        routing::{get, post},
    };
}
