//! Entity trait defining the capability surface the generic service relies on

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Base trait for all persisted entities.
///
/// The generic service, store, and projector are written against this trait
/// plus a type parameter for the concrete shape. An implementation provides:
/// - resource names used to derive routes and error messages
/// - the unique identifier
/// - a type discriminator that also appears in the serialized form
/// - dynamic field access for filter matching
/// - the static list of fields eligible for client-facing output
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "users", "posts")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "user", "post"); also the key the
    /// field registry and projector dispatch on
    fn resource_name_singular() -> &'static str;

    /// Fields eligible for client-facing output, in wire (camelCase) form.
    ///
    /// Everything not listed here is stripped by the response projector.
    /// The `id` field is always emitted and does not need to be listed.
    fn response_fields() -> &'static [&'static str];

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Get the entity type discriminator (matches `resource_name_singular`)
    fn entity_type(&self) -> &str;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last update timestamp
    fn updated_at(&self) -> DateTime<Utc>;

    /// Get the value of a field by its wire name, for filter matching.
    ///
    /// Returns `None` for fields the entity does not expose to filtering;
    /// a filter naming such a field matches nothing.
    fn field_value(&self, field: &str) -> Option<Value>;
}
