//! Demo API: users who write posts
//!
//! Two entities wired onto in-memory stores. Each store carries a relation
//! hydrator for the other side, so `include=posts` and `include=author` work
//! in both directions and `include=author.posts` style nesting resolves one
//! level deep.

pub mod auth;
pub mod posts;
pub mod users;

pub use auth::{AuthState, auth_routes};
pub use posts::Post;
pub use users::User;

use crate::core::store::RelationLoad;
use crate::storage::InMemoryStore;

/// Build the user and post stores with their mutual relation hydrators.
///
/// The returned stores share row maps with each other's hydrators, so rows
/// inserted after this call are still visible to relation loading.
pub fn build_stores() -> (InMemoryStore<User>, InMemoryStore<Post>) {
    let user_rows: InMemoryStore<User> = InMemoryStore::new();
    let post_rows: InMemoryStore<Post> = InMemoryStore::new();

    let users = {
        let posts = post_rows.clone();
        user_rows.clone().with_relation("posts", move |user, load| {
            let mut related: Vec<Post> = posts
                .all()?
                .into_iter()
                .filter(|post| post.author_id == user.id)
                .collect();
            related.sort_by_key(|post| (post.created_at, post.id));

            if let RelationLoad::Nested(children) = load {
                if children.iter().any(|c| c == "author") {
                    for post in &mut related {
                        post.author = Some(Box::new(user.clone()));
                    }
                }
            }

            user.posts = Some(related);
            Ok(())
        })
    };

    let posts = {
        let users = user_rows;
        let posts_of_author = post_rows.clone();
        post_rows.with_relation("author", move |post, load| {
            let Some(mut author) = users.get(&post.author_id)? else {
                return Ok(());
            };

            if let RelationLoad::Nested(children) = load {
                if children.iter().any(|c| c == "posts") {
                    let mut authored: Vec<Post> = posts_of_author
                        .all()?
                        .into_iter()
                        .filter(|p| p.author_id == author.id)
                        .collect();
                    authored.sort_by_key(|p| (p.created_at, p.id));
                    author.posts = Some(authored);
                }
            }

            post.author = Some(Box::new(author));
            Ok(())
        })
    };

    (users, posts)
}
