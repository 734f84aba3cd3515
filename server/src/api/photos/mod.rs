pub mod get;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/photos endpoints (mounted at /api/photos)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get::get_photo))
        .route("/{id}/thumbnail", get(get::get_photo_thumbnail))
}

#[derive(OpenApi)]
#[openapi(paths(get::get_photo, get::get_photo_thumbnail))]
pub struct ApiDoc;
