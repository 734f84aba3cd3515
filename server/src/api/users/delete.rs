use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiResult;
use crate::schema::users;
use axum::{extract::State, http::StatusCode};
use diesel::prelude::*;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/users/user",
    tag = "users",
    responses(
        (status = 204, description = "Account, recipes and photos deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_profile(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> ApiResult<StatusCode> {
    let mut conn = pool.get()?;

    // Recipes and photos go with the user via ON DELETE CASCADE.
    diesel::delete(users::table.find(user.id)).execute(&mut conn)?;

    tracing::info!(user_id = %user.id, username = %user.username, "account deleted");

    Ok(StatusCode::NO_CONTENT)
}
