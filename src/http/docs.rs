//! Static documentation assets.
//!
//! - `GET /swagger.json` → the OpenAPI document
//! - `GET /swagger-ui/*` → the Swagger UI bundle

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::DocsConfig;

/// Routes serving the documentation files. Missing files answer 404.
pub fn routes<S>(config: &DocsConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route_service("/swagger.json", ServeFile::new(&config.swagger_json))
        .nest_service("/swagger-ui", ServeDir::new(&config.swagger_ui_dir))
}
