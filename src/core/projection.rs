//! Metadata-driven, cycle-safe response projection
//!
//! Walks a serialized result (scalar, entity document, or array of entity
//! documents) and produces an output tree containing only the fields the
//! [`FieldRegistry`] marks eligible, with bounded relation recursion and
//! cycle suppression.
//!
//! Entity documents are recognized by their `entityType` discriminator. The
//! branch identity set keys on the (`entityType`, `id`) pair: an entity
//! re-occurring along the current branch (the shape a hydrated graph takes
//! for a cycle like author/posts) collapses to `{"id": ...}`.
//! The set is copied, not shared, at every branch point, so a cycle through
//! one sibling never suppresses an unrelated sibling.
//!
//! The projector is total: it never fails, and shapes it does not recognize
//! pass through unchanged.

use crate::core::fields::FieldRegistry;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// Key of the type discriminator in serialized entity documents
pub const TYPE_FIELD: &str = "entityType";

/// Relation expansion allowed beyond the root entity: one hop.
///
/// Bounds relation-of-relation output (author → posts → author) without
/// requiring callers to specify an expansion depth.
const MAX_RELATION_DEPTH: usize = 1;

/// Identity of an entity document on the current branch
type BranchKey = (String, String);

/// Projects raw result trees into whitelisted-field output
pub struct Projector {
    registry: Arc<FieldRegistry>,
}

impl Projector {
    pub fn new(registry: Arc<FieldRegistry>) -> Self {
        Self { registry }
    }

    /// Project a value, starting a fresh context.
    ///
    /// Invoked once per outgoing response. Top-level array elements each
    /// start an independent branch.
    pub fn project(&self, value: &Value) -> Value {
        match value {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.project_branch(item, HashSet::new(), 0))
                    .collect(),
            ),
            other => self.project_branch(other, HashSet::new(), 0),
        }
    }

    /// Project one branch. `seen` is owned: every branch works on its own
    /// copy of the identity set.
    fn project_branch(&self, value: &Value, mut seen: HashSet<BranchKey>, depth: usize) -> Value {
        let entity = match value {
            Value::Object(entity) => entity,
            Value::Array(items) => {
                return Value::Array(
                    items
                        .iter()
                        .map(|item| self.project_branch(item, seen.clone(), depth))
                        .collect(),
                );
            }
            // null and scalars pass through unchanged
            other => return other.clone(),
        };

        // Cycle / over-depth guard: collapse to the identifier alone.
        let key = branch_key(entity);
        let revisited = key.as_ref().is_some_and(|k| seen.contains(k));
        if revisited || depth > MAX_RELATION_DEPTH {
            return match entity.get("id") {
                Some(id) => {
                    Value::Object(Map::from_iter([("id".to_string(), id.clone())]))
                }
                None => value.clone(),
            };
        }
        if let Some(key) = key {
            seen.insert(key);
        }

        let fields = match entity.get(TYPE_FIELD).and_then(Value::as_str) {
            Some(entity_type) => self.registry.fields_of(entity_type),
            None => &[],
        };

        // Unannotated passthrough: types with no registered fields (plain
        // DTOs) are emitted as-is.
        if fields.is_empty() {
            return value.clone();
        }

        let mut out = Map::new();
        if let Some(id) = entity.get("id") {
            out.insert("id".to_string(), id.clone());
        }

        for field in fields {
            let Some(raw) = entity.get(field) else {
                continue;
            };
            let projected = match raw {
                Value::Array(items) => Value::Array(
                    items
                        .iter()
                        .map(|item| self.project_branch(item, seen.clone(), depth + 1))
                        .collect(),
                ),
                Value::Object(_) => self.project_branch(raw, seen.clone(), depth + 1),
                scalar => scalar.clone(),
            };
            out.insert(field.clone(), projected);
        }

        Value::Object(out)
    }
}

/// Branch identity of an entity document, when it carries both the type
/// discriminator and an id. Documents without an id cannot re-occur in a
/// tree-shaped graph and are governed by the depth bound alone.
fn branch_key(entity: &Map<String, Value>) -> Option<BranchKey> {
    let entity_type = entity.get(TYPE_FIELD)?.as_str()?.to_string();
    let id = entity.get("id")?;
    Some((entity_type, id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn projector() -> Projector {
        let mut registry = FieldRegistry::new();
        for field in ["name", "email", "isActive", "posts"] {
            registry.register("user", field);
        }
        for field in ["title", "published", "author", "authorId"] {
            registry.register("post", field);
        }
        Projector::new(Arc::new(registry))
    }

    fn user(id: &str) -> Value {
        json!({
            "id": id,
            "entityType": "user",
            "name": "Ada",
            "email": "ada@example.com",
            "password": "$argon2id$secret",
            "isActive": true,
        })
    }

    fn post(id: &str, author_id: &str) -> Value {
        json!({
            "id": id,
            "entityType": "post",
            "title": "Hello",
            "published": true,
            "draftNotes": "do not leak",
            "authorId": author_id,
        })
    }

    #[test]
    fn test_scalars_and_null_pass_through() {
        let p = projector();
        assert_eq!(p.project(&json!(null)), json!(null));
        assert_eq!(p.project(&json!(42)), json!(42));
        assert_eq!(p.project(&json!("text")), json!("text"));
        assert_eq!(p.project(&json!(true)), json!(true));
    }

    #[test]
    fn test_unannotated_object_passes_through_unchanged() {
        let p = projector();
        let dto = json!({"token": "abc", "ttl": 30});
        assert_eq!(p.project(&dto), dto);
    }

    #[test]
    fn test_annotated_entity_is_filtered() {
        let p = projector();
        let projected = p.project(&user("u1"));

        assert_eq!(
            projected,
            json!({
                "id": "u1",
                "name": "Ada",
                "email": "ada@example.com",
                "isActive": true,
            })
        );
    }

    #[test]
    fn test_password_never_appears() {
        let p = projector();
        let mut root = user("u1");
        root["posts"] = json!([post("p1", "u1")]);
        root["posts"][0]["author"] = user("u1");

        let rendered = serde_json::to_string(&p.project(&root)).expect("serialize");
        assert!(!rendered.contains("password"));
        assert!(!rendered.contains("argon2id"));
        assert!(!rendered.contains("draftNotes"));
    }

    #[test]
    fn test_annotated_field_absent_on_source_is_skipped() {
        let p = projector();
        // No "posts" key on the document: the projector emits only what is
        // both annotated and present.
        let projected = p.project(&user("u1"));
        assert!(projected.get("posts").is_none());
    }

    #[test]
    fn test_null_relation_field_passes_through() {
        let p = projector();
        let mut root = post("p1", "u1");
        root["author"] = json!(null);

        let projected = p.project(&root);
        assert_eq!(projected["author"], json!(null));
    }

    #[test]
    fn test_top_level_array_projects_element_wise() {
        let p = projector();
        let projected = p.project(&json!([user("u1"), user("u2")]));

        let items = projected.as_array().expect("array");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], "u1");
        assert_eq!(items[1]["id"], "u2");
        assert!(items[0].get("password").is_none());
    }

    #[test]
    fn test_cycle_collapses_to_id_only() {
        // author -> posts -> author: the hydrated shape of a circular graph.
        let p = projector();
        let mut root = user("u1");
        let mut first = post("p1", "u1");
        first["author"] = user("u1");
        root["posts"] = json!([first]);

        let projected = p.project(&root);
        assert_eq!(projected["posts"][0]["author"], json!({"id": "u1"}));
        // The rest of the post survives.
        assert_eq!(projected["posts"][0]["title"], "Hello");
    }

    #[test]
    fn test_two_node_cycle_terminates() {
        // a.ref = b; b.ref = a, materialized one repetition deep.
        let mut registry = FieldRegistry::new();
        registry.register("node", "ref");
        let p = Projector::new(Arc::new(registry));

        let graph = json!({
            "id": 1,
            "entityType": "node",
            "ref": {
                "id": 2,
                "entityType": "node",
                "ref": {"id": 1, "entityType": "node"},
            },
        });

        let projected = p.project(&graph);
        assert_eq!(projected["ref"]["ref"], json!({"id": 1}));
    }

    #[test]
    fn test_depth_beyond_one_hop_collapses() {
        // user -> posts (hop 1) -> author (hop 2): distinct entities, no
        // cycle, still collapsed by the depth bound.
        let p = projector();
        let mut root = user("u1");
        let mut first = post("p1", "u2");
        first["author"] = user("u2");
        root["posts"] = json!([first]);

        let projected = p.project(&root);
        assert_eq!(projected["posts"][0]["author"], json!({"id": "u2"}));
    }

    #[test]
    fn test_over_depth_object_without_id_passes_through_raw() {
        let mut registry = FieldRegistry::new();
        registry.register("wrap", "inner");
        registry.register("leaf", "meta");
        let p = Projector::new(Arc::new(registry));

        let graph = json!({
            "id": 1,
            "entityType": "wrap",
            "inner": {
                "id": 2,
                "entityType": "leaf",
                "meta": {"shade": "teal"},
            },
        });

        // meta sits at depth 2 and has no id: the raw value comes back.
        let projected = p.project(&graph);
        assert_eq!(projected["inner"]["meta"], json!({"shade": "teal"}));
    }

    #[test]
    fn test_sibling_branches_do_not_share_identity_sets() {
        // Two sibling posts each reference the same author: both must carry
        // the author's full projection, since each element starts its own
        // branch with a copy of the identity set.
        let p = projector();
        let mut first = post("p1", "u1");
        first["author"] = user("u1");
        let mut second = post("p2", "u1");
        second["author"] = user("u1");

        let projected = p.project(&json!([first, second]));
        for item in projected.as_array().expect("array") {
            assert_eq!(item["author"]["name"], "Ada");
            assert_eq!(item["author"]["email"], "ada@example.com");
        }
    }

    #[test]
    fn test_sibling_independence_inside_entity_array_field() {
        // The same, one level down: a user's two posts each embed the user.
        // Each array element gets a copy of the branch set, so both embed
        // the collapsed author consistently without interfering.
        let p = projector();
        let mut root = user("u1");
        let mut first = post("p1", "u1");
        first["author"] = user("u1");
        let mut second = post("p2", "u1");
        second["author"] = user("u1");
        root["posts"] = json!([first, second]);

        let projected = p.project(&root);
        let posts = projected["posts"].as_array().expect("array");
        assert_eq!(posts.len(), 2);
        for item in posts {
            assert_eq!(item["author"], json!({"id": "u1"}));
            assert_eq!(item["title"], "Hello");
        }
    }

    #[test]
    fn test_same_type_different_ids_are_distinct_identities() {
        let p = projector();
        let mut root = post("p1", "u1");
        root["author"] = user("u2");

        let projected = p.project(&root);
        // Different id, same type: not a revisit, full projection.
        assert_eq!(projected["author"]["name"], "Ada");
    }

    #[test]
    fn test_entity_type_discriminator_is_not_emitted() {
        let p = projector();
        let projected = p.project(&user("u1"));
        assert!(projected.get(TYPE_FIELD).is_none());
    }
}
