//! Reading `multipart/form-data` write requests.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use recipi_core::multipart::FILE;
use recipi_core::ImageFile;

use crate::error::{ApiError, ApiResult};

/// A multipart body split into its text fields and the optional image.
#[derive(Debug, Default)]
pub struct FormParts {
    pub fields: Vec<(String, String)>,
    pub image: Option<ImageFile>,
}

impl FormParts {
    /// Drain a multipart stream. An empty `file` part counts as no image.
    pub async fn read(mut multipart: Multipart, max_image_bytes: usize) -> ApiResult<Self> {
        let mut parts = FormParts::default();

        while let Some(field) = multipart.next_field().await.map_err(read_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == FILE {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await.map_err(read_error)?;
                if data.is_empty() {
                    continue;
                }
                if data.len() > max_image_bytes {
                    return Err(ApiError::PayloadTooLarge(format!(
                        "File too large. Maximum size is {} bytes",
                        max_image_bytes
                    )));
                }
                parts.image = Some(ImageFile::new(file_name, data.to_vec()));
            } else {
                let value = field.text().await.map_err(read_error)?;
                parts.fields.push((name, value));
            }
        }

        Ok(parts)
    }
}

fn read_error(e: MultipartError) -> ApiError {
    tracing::warn!("Multipart read error: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Request body too large".to_string())
    } else {
        ApiError::BadRequest(format!("Failed to read multipart data: {}", e.body_text()))
    }
}
