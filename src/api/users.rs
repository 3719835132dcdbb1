//! User entity

use crate::api::posts::Post;
use crate::core::entity::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// An account holder.
///
/// `password` holds the Argon2id hash and is intentionally absent from
/// [`User::response_fields`]; the response projector strips it from every
/// outgoing body.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub entity_type: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Authored posts, attached when the query includes the `posts` relation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<Post>>,
}

impl User {
    /// Create a new active user; `password` must already be hashed
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            entity_type: "user".to_string(),
            name: name.into(),
            email: email.into(),
            password: password.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
            posts: None,
        }
    }
}

impl Entity for User {
    fn resource_name() -> &'static str {
        "users"
    }

    fn resource_name_singular() -> &'static str {
        "user"
    }

    fn response_fields() -> &'static [&'static str] {
        &["name", "email", "isActive", "createdAt", "updatedAt", "posts"]
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
            "id" => Some(Value::String(self.id.to_string())),
            "name" => Some(Value::String(self.name.clone())),
            "email" => Some(Value::String(self.email.clone())),
            "isActive" => Some(Value::Bool(self.is_active)),
            "createdAt" => serde_json::to_value(self.created_at).ok(),
            "updatedAt" => serde_json::to_value(self.updated_at).ok(),
            _ => None,
        }
    }
}
