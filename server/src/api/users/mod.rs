pub mod delete;
pub mod get;
pub mod update;

use crate::AppState;
use axum::routing::{get, patch};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/users endpoints (mounted at /api/users)
pub fn router() -> Router<AppState> {
    Router::new()
        // Static segment wins over the `{username}` capture.
        .route(
            "/user",
            patch(update::update_profile).delete(delete::delete_profile),
        )
        .route("/{username}", get(get::get_profile))
}

#[derive(OpenApi)]
#[openapi(
    paths(get::get_profile, update::update_profile, delete::delete_profile),
    components(schemas(
        recipi_core::ProfileResponse,
        recipi_core::ProfileUpdateResponse,
        recipi_core::AuthenticatedUser,
        update::ProfileForm,
    ))
)]
pub struct ApiDoc;
