//! Veneer demo server: users and posts over in-memory stores

use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use veneer::api::{AuthState, Post, User, auth_routes, build_stores};
use veneer::config::AppConfig;
use veneer::server::ServerBuilder;
use veneer::session::InMemorySessionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::from_yaml_file(&path)?,
        None => AppConfig::default(),
    };

    let (users, posts) = build_stores();
    seed_demo_data(&users, &posts)?;

    let sessions = Arc::new(InMemorySessionStore::new(config.session.max_age_secs));
    let auth_users = users.clone();

    ServerBuilder::new()
        .register_resource::<User>(Arc::new(users))
        .register_resource::<Post>(Arc::new(posts))
        .with_projected_routes(move |projector| {
            auth_routes(AuthState {
                users: auth_users,
                sessions,
                projector,
                session_max_age: config.session.max_age_secs,
            })
        })
        .serve(&config.bind_addr())
        .await
}

/// A couple of rows so the API answers with something out of the box
fn seed_demo_data(
    users: &veneer::storage::InMemoryStore<User>,
    posts: &veneer::storage::InMemoryStore<Post>,
) -> anyhow::Result<()> {
    let ada = User::new("Ada", "ada@example.com", "$argon2id$demo-placeholder");
    users.insert(ada.clone())?;

    posts.insert(Post::new(
        "Hello, world",
        "The first post.",
        true,
        ada.id,
    ))?;
    posts.insert(Post::new("Draft thoughts", "Not ready yet.", false, ada.id))?;

    tracing::info!(user_id = %ada.id, "seeded demo data");
    Ok(())
}
