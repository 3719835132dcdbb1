//! Post entity

use crate::api::users::User;
use crate::core::entity::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A piece of authored content
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub entity_type: String,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Uuid,

    /// The author, attached when the query includes the `author` relation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Box<User>>,
}

impl Post {
    /// Create an unpublished post unless `published` says otherwise
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        published: bool,
        author_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            entity_type: "post".to_string(),
            title: title.into(),
            content: content.into(),
            published,
            created_at: now,
            updated_at: now,
            author_id,
            author: None,
        }
    }
}

impl Entity for Post {
    fn resource_name() -> &'static str {
        "posts"
    }

    fn resource_name_singular() -> &'static str {
        "post"
    }

    fn response_fields() -> &'static [&'static str] {
        &[
            "title",
            "content",
            "published",
            "createdAt",
            "updatedAt",
            "author",
            "authorId",
        ]
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
            "title" => Some(Value::String(self.title.clone())),
            "content" => Some(Value::String(self.content.clone())),
            "published" => Some(Value::Bool(self.published)),
            "authorId" => Some(Value::String(self.author_id.to_string())),
            "createdAt" => serde_json::to_value(self.created_at).ok(),
            "updatedAt" => serde_json::to_value(self.updated_at).ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_post_defaults() {
        let author_id = Uuid::new_v4();
        let post = Post::new("Title", "Body", false, author_id);
        assert_eq!(post.entity_type, "post");
        assert_eq!(post.author_id, author_id);
        assert!(post.author.is_none());
    }

    #[test]
    fn test_field_value_for_filters() {
        let author_id = Uuid::new_v4();
        let post = Post::new("Title", "Body", true, author_id);

        assert_eq!(post.field_value("published"), Some(json!(true)));
        assert_eq!(
            post.field_value("authorId"),
            Some(Value::String(author_id.to_string()))
        );
        assert_eq!(post.field_value("ghost"), None);
    }

    #[test]
    fn test_serializes_author_when_loaded() {
        let mut post = Post::new("Title", "Body", true, Uuid::new_v4());
        post.author = Some(Box::new(User::new("Ada", "ada@example.com", "hash")));

        let value = serde_json::to_value(&post).expect("serialize should succeed");
        assert_eq!(value["author"]["entityType"], "user");
        assert_eq!(value["authorId"], post.author_id.to_string());
    }
}
