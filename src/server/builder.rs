//! ServerBuilder for fluent API to build HTTP servers

use super::handlers::{EntityState, entity_routes};
use crate::core::entity::Entity;
use crate::core::fields::FieldRegistry;
use crate::core::projection::Projector;
use crate::core::service::EntityService;
use crate::core::store::EntityStore;
use anyhow::Result;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Route factory deferred until the projector exists.
///
/// Entity routes and auth routes both need the projector, which is only
/// final once every resource has registered its fields. Registration
/// therefore stores factories and `build` runs them.
type RouteFactory = Box<dyn FnOnce(Arc<Projector>) -> Router + Send>;

/// Builder for creating HTTP servers with auto-registered entity routes
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .register_resource::<User>(user_store)
///     .register_resource::<Post>(post_store)
///     .build();
/// ```
pub struct ServerBuilder {
    registry: FieldRegistry,
    routes: Vec<RouteFactory>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            registry: FieldRegistry::new(),
            routes: Vec::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Register an entity resource.
    ///
    /// This will:
    /// 1. Register the entity's annotated fields with the projector
    /// 2. Add `GET /{plural}` and `GET /{plural}/{id}` routes backed by
    ///    the given store
    pub fn register_resource<T: Entity + Serialize>(
        mut self,
        store: Arc<dyn EntityStore<T>>,
    ) -> Self {
        self.registry.register_entity::<T>();

        self.routes.push(Box::new(move |projector| {
            entity_routes(EntityState {
                service: Arc::new(EntityService::new(store)),
                projector,
            })
        }));

        self
    }

    /// Add routes that need the shared projector, such as the auth
    /// endpoints returning projected user bodies
    pub fn with_projected_routes(
        mut self,
        factory: impl FnOnce(Arc<Projector>) -> Router + Send + 'static,
    ) -> Self {
        self.routes.push(Box::new(factory));
        self
    }

    /// Add custom routes to the server
    ///
    /// Use this for routes outside the entity pattern: webhooks, status
    /// pages, custom business endpoints.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the final router.
    ///
    /// Entity and projected routes land under `/api/v1`; health stays at
    /// the root for probes.
    pub fn build(self) -> Router {
        let projector = Arc::new(Projector::new(Arc::new(self.registry)));

        let mut api = Router::new();
        for factory in self.routes {
            api = api.merge(factory(projector.clone()));
        }
        for custom in self.custom_routes {
            api = api.merge(custom);
        }

        Router::new()
            .route("/health", get(health_check))
            .nest("/api/v1", api)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build();
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "veneer"
    }))
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
