use axum::extract::FromRef;
use std::sync::Arc;

use crate::auth::JwtManager;
use crate::db::DbPool;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub jwt: Arc<JwtManager>,
    pub limits: UploadLimits,
}

#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_image_bytes: usize,
}

impl FromRef<AppState> for Arc<DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<JwtManager> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

impl FromRef<AppState> for UploadLimits {
    fn from_ref(state: &AppState) -> Self {
        state.limits
    }
}
