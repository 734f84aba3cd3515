use diesel::prelude::*;
use uuid::Uuid;

use super::jwt::JwtManager;
use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::schema::users;

pub fn find_user_by_id(conn: &mut PgConnection, id: Uuid) -> QueryResult<Option<User>> {
    users::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .optional()
}

/// Case-insensitive lookup by username.
pub fn find_user_by_username(
    conn: &mut PgConnection,
    username: &str,
) -> QueryResult<Option<User>> {
    users::table
        .filter(
            diesel::dsl::sql::<diesel::sql_types::Bool>("LOWER(username) = LOWER(")
                .bind::<diesel::sql_types::Text, _>(username)
                .sql(")"),
        )
        .select(User::as_select())
        .first(conn)
        .optional()
}

/// Whether another account already uses this username, ignoring case.
pub fn username_taken(
    conn: &mut PgConnection,
    username: &str,
    except: Option<Uuid>,
) -> QueryResult<bool> {
    Ok(find_user_by_username(conn, username)?.is_some_and(|u| Some(u.id) != except))
}

pub fn issue_token(jwt: &JwtManager, user: &User) -> ApiResult<String> {
    jwt.generate_token(user.id, &user.username)
        .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
}
