pub mod processing;

use diesel::prelude::*;
use recipi_core::ImageFile;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::NewPhoto;
use crate::schema::photos;

/// Validate an uploaded image and store it, returning the new photo id.
pub fn store_image(
    conn: &mut PgConnection,
    user_id: Uuid,
    image: &ImageFile,
) -> ApiResult<Uuid> {
    let processed = processing::process_image(&image.bytes).map_err(ApiError::BadRequest)?;

    let new_photo = NewPhoto {
        user_id,
        content_type: &processed.content_type,
        data: &image.bytes,
        thumbnail: &processed.thumbnail,
    };

    let photo_id = diesel::insert_into(photos::table)
        .values(&new_photo)
        .returning(photos::id)
        .get_result(conn)?;

    Ok(photo_id)
}
