mod api;
mod auth;
mod config;
mod db;
mod error;
mod models;
mod photos;
mod schema;
mod state;
mod telemetry;

use axum::extract::{DefaultBodyLimit, MatchedPath};
use axum::http::Request;
use axum::Router;
use std::env;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

pub use state::AppState;

/// Room for the text fields around a maximum-size image.
const FORM_OVERHEAD_BYTES: usize = 256 * 1024;

fn app(state: AppState) -> Router {
    let body_limit = state.limits.max_image_bytes + FORM_OVERHEAD_BYTES;
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .nest("/api/auth", api::public::router())
        .nest("/api/recipes", api::recipes::router())
        .nest("/api/users", api::users::router())
        .nest("/api/photos", api::photos::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .merge(swagger_ui)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &Span| {
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        println!("{}", api::openapi().to_pretty_json()?);
        return Ok(());
    }

    telemetry::init_telemetry();

    let config = config::Config::from_env()?;

    let pool = db::create_pool(&config.database_url)?;
    let jwt = auth::JwtManager::new(auth::JwtConfig::new(
        config.jwt_secret.clone(),
        config.jwt_expiration_hours,
    ));

    let state = AppState {
        pool: Arc::new(pool),
        jwt: Arc::new(jwt),
        limits: state::UploadLimits {
            max_image_bytes: config.max_upload_bytes,
        },
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!("Server listening on {}", local_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", local_addr);
    tracing::info!(
        "OpenAPI spec available at http://{}/api-docs/openapi.json",
        local_addr
    );

    axum::serve(listener, app(state)).await?;

    Ok(())
}
