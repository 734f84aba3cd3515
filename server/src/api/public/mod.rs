pub mod auth;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public auth endpoints (mounted at /api/auth)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup::signup))
        .route("/login", post(auth::login::login))
}

#[derive(OpenApi)]
#[openapi(
    paths(auth::login::login, auth::signup::signup),
    components(schemas(
        recipi_core::LoginRequest,
        recipi_core::SignupRequest,
        recipi_core::TokenResponse,
    ))
)]
pub struct ApiDoc;
