use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub photo_id: Option<Uuid>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UserChangeset<'a> {
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub photo_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::photos)]
pub struct NewPhoto<'a> {
    pub user_id: Uuid,
    pub content_type: &'a str,
    pub data: &'a [u8],
    pub thumbnail: &'a [u8],
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub prep_time: i32,
    pub cook_time: i32,
    pub difficulty: String,
    pub servings: Option<i32>,
    pub notes: Option<String>,
    pub ingredients: String,
    pub steps: Vec<Option<String>>,
    pub tags: Vec<Option<String>>,
    pub photo_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub user_id: Uuid,
    pub slug: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub prep_time: i32,
    pub cook_time: i32,
    pub difficulty: &'a str,
    pub servings: Option<i32>,
    pub notes: Option<&'a str>,
    pub ingredients: &'a str,
    pub steps: &'a [Option<String>],
    pub tags: &'a [Option<String>],
    pub photo_id: Option<Uuid>,
}

/// Field-by-field overwrite of a recipe; `None` fields are left untouched.
#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipeChangeset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub difficulty: Option<String>,
    pub servings: Option<i32>,
    pub notes: Option<String>,
    pub ingredients: Option<String>,
    pub steps: Option<Vec<Option<String>>>,
    pub tags: Option<Vec<Option<String>>>,
    pub photo_id: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
}
