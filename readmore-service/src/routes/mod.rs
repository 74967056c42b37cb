pub mod error;
pub mod health;
pub mod recommend;
pub mod search;

use crate::services::catalog::CatalogClient;
use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub type Catalog = Arc<dyn CatalogClient + Send + Sync>;

pub fn router(catalog: Catalog, static_dir: &Path) -> Router {
    Router::new()
        .route("/status", get(health::health_check))
        .route("/api/search", get(search::search_books))
        .route("/api/work/:work_id", get(search::get_work))
        .route("/api/recommend", post(recommend::recommend_books))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(catalog)
}
