//! HTTP server assembly
//!
//! The builder collects entity resources and extra routers, finalizes the
//! field registry into a shared projector, and produces one axum router.

pub mod builder;
pub mod handlers;

pub use builder::ServerBuilder;
pub use handlers::{EntityState, entity_routes};
