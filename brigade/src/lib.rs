//! Brigade is a recipe costing service for professional kitchens.
//!
//! It computes the cost of a recipe from its priced ingredients and nested
//! sub-recipes, and can persist the resulting cost-per-portion back onto the
//! recipe as a cached snapshot.
//!
//! # Architecture
//!
//! The service is a small axum application over PostgreSQL:
//!
//! - **[`api`]**: HTTP handlers and request/response models
//! - **[`costing`]**: the costing engine, unit conversion, and line-cost rules
//! - **[`db`]**: database repositories and row models
//! - **[`config`]**: layered configuration (YAML file + environment)
//! - **[`errors`]**: the application error type and HTTP mapping
//!
//! Costing walks the sub-recipe graph recursively with cycle and depth guards,
//! so a mis-linked recipe tree degrades to a partial result instead of hanging
//! the request. Components that cannot be priced are reported in
//! `missing_costs` rather than silently treated as free.

pub mod api;
pub mod config;
pub mod costing;
pub mod db;
pub mod errors;
pub mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use crate::openapi::ApiDoc;
use axum::{
    Router,
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;

pub use types::{IngredientId, RecipeId, SubRecipeLinkId};

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the brigade database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Build the application router.
///
/// Routes are nested under `/api/v1`; the OpenAPI document is served at
/// `/api-docs/openapi.json` and a liveness probe at `/healthz`.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/recipes/{id}/costing", get(api::handlers::costing::get_recipe_costing))
        .route("/recipes/{id}/costing/snapshot", post(api::handlers::costing::snapshot_recipe_cost))
        .with_state(state);

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { axum::Json(ApiDoc::openapi()) }))
        .nest("/api/v1", api_routes);

    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

/// The application: router, configuration, and database pool.
///
/// Lifecycle:
/// 1. [`Application::new`] connects to the database, runs migrations, and
///    builds the router
/// 2. [`Application::serve`] binds a TCP port and handles requests until the
///    shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting brigade with configuration: {:#?}", config);

        let pool = PgPool::connect(&config.database_url).await?;

        info!("Running database migrations...");
        migrator().run(&pool).await?;

        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(state);

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("Brigade listening on http://{}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
