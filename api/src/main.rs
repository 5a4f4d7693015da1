//! Shop API Server
//!
//! A session-based shopping cart service: browse products, fill a cart as an
//! anonymous visitor, keep it after logging in with an API key.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;
mod render;

#[cfg(test)]
mod test_utils;


use adapters::{
    apply_schema, PostgresCartRepository, PostgresProductRepository, PostgresUserRepository,
};
use app::{CartService, CatalogService, UserService};
use config::Config;
use domain::ports::{CartRepository, ProductRepository, UserRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub cart_service: Arc<CartService<dyn CartRepository, dyn ProductRepository>>,
    pub catalog_service: Arc<CatalogService<dyn ProductRepository>>,
    pub user_service: Arc<UserService<dyn UserRepository>>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        carts: Arc<dyn CartRepository>,
        products: Arc<dyn ProductRepository>,
        users: Arc<dyn UserRepository>,
        config: Config,
    ) -> Self {
        Self {
            cart_service: Arc::new(CartService::new(carts, products.clone())),
            catalog_service: Arc::new(CatalogService::new(products)),
            user_service: Arc::new(UserService::new(users)),
            config,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // Shop routes carry a session and, optionally, a logged-in user
    let shop_routes = Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products/:id", get(handlers::get_product))
        .route(
            "/cart",
            get(handlers::get_cart)
                .post(handlers::add_item)
                .put(handlers::update_cart)
                .delete(handlers::empty_cart),
        )
        .route("/cart/item", post(handlers::add_item))
        .route("/cart/delete", post(handlers::empty_cart))
        .route("/cart/update", post(handlers::update_cart))
        .route(
            "/cart/item/:id",
            put(handlers::update_item).delete(handlers::delete_item),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::optional_auth_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::session_middleware,
        ));

    let admin_routes = Router::new()
        .route("/products", post(handlers::create_product))
        .route("/users", post(handlers::create_user))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::admin_middleware,
        ));

    Router::new()
        // Health check (no auth, no session)
        .route("/health", get(health))
        .merge(shop_routes)
        .nest("/admin", admin_routes)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,shop_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Shop API...");

    // Load configuration
    let config = Config::from_env()?;
    if !config.admin_enabled() {
        tracing::warn!("ADMIN_TOKEN is not set, admin endpoints are disabled");
    }

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    if config.run_migrations {
        apply_schema(&db).await.context("Failed to apply schema")?;
    }

    // Create adapters
    let cart_repo: Arc<dyn CartRepository> = Arc::new(PostgresCartRepository::new(db.clone()));
    let product_repo: Arc<dyn ProductRepository> =
        Arc::new(PostgresProductRepository::new(db.clone()));
    let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(db));

    let state = AppState::new(cart_repo, product_repo, user_repo, config.clone());
    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
