//! Field annotation registry
//!
//! Records, per entity type, which fields are eligible for client-facing
//! output. The registry is populated once at startup (entity registration)
//! and only read afterwards, so request handling shares it through an `Arc`
//! without locking.
//!
//! The distinction between "never registered" (empty list) and "registered
//! with fields" is load-bearing for the projector: an empty list means the
//! value passes through unfiltered (plain DTOs), a non-empty list means the
//! value is always filtered down to the listed fields.

use crate::core::entity::Entity;
use indexmap::IndexMap;

/// Per-type ordered lists of fields eligible for output
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: IndexMap<String, Vec<String>>,
}

impl FieldRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `field` as eligible for output on `type_name`.
    ///
    /// First-registration order is preserved; repeats are silently
    /// deduplicated. Idempotent, so re-registering a type is harmless.
    pub fn register(&mut self, type_name: &str, field: &str) {
        let list = self.fields.entry(type_name.to_string()).or_default();
        if !list.iter().any(|f| f == field) {
            list.push(field.to_string());
        }
    }

    /// Register every annotated field of an entity type
    pub fn register_entity<T: Entity>(&mut self) {
        for field in T::response_fields() {
            self.register(T::resource_name_singular(), field);
        }
    }

    /// The ordered eligible-field list for `type_name`.
    ///
    /// Returns an empty slice for types that never registered any field;
    /// callers must treat that as "emit the raw value unfiltered".
    pub fn fields_of(&self, type_name: &str) -> &[String] {
        self.fields
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
