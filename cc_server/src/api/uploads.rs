//! Image upload handler.
//!
//! Accepts a single multipart `file` field, validates its content type
//! and size, and writes it under the configured upload directory with a
//! UUID filename. Serving the stored files is the front-end's concern;
//! this endpoint only returns the public path.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use super::{AppState, ErrorResponse};

/// Content types accepted for uploaded images.
const ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// Upload an image (`POST /api/upload`, bearer token required).
///
/// # Response
///
/// ```json
/// { "url": "/uploads/3f1c….png", "filename": "3f1c….png", "original_filename": "photo.png" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: no `file` field, unsupported content type, or
///   file larger than the configured limit (5 MB by default)
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => break field,
            Ok(Some(_)) => continue,
            Ok(None) => return Err(bad_request("Missing file field")),
            Err(_) => return Err(bad_request("Malformed multipart body")),
        }
    };

    let content_type = field.content_type().unwrap_or_default().to_string();
    if !ALLOWED_TYPES.contains(&content_type.as_str()) {
        return Err(bad_request(
            "Unsupported file type. Use JPG, PNG, WEBP, or GIF",
        ));
    }

    let original_filename = field.file_name().unwrap_or("upload").to_string();

    let bytes = field
        .bytes()
        .await
        .map_err(|_| bad_request("File too large. Maximum 5MB"))?;
    if bytes.len() > state.upload_max_bytes {
        return Err(bad_request("File too large. Maximum 5MB"));
    }

    let extension = original_filename.rsplit('.').next().unwrap_or("bin");
    let stored_filename = format!("{}.{}", Uuid::new_v4(), extension);
    let path = state.upload_dir.join(&stored_filename);

    tokio::fs::write(&path, &bytes).await.map_err(|e| {
        tracing::error!(error = %e, path = %path.display(), "failed to store upload");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Internal server error".to_string(),
            }),
        )
    })?;

    tracing::info!(filename = %stored_filename, size = bytes.len(), "image uploaded");

    Ok(Json(json!({
        "url": format!("/uploads/{stored_filename}"),
        "filename": stored_filename,
        "original_filename": original_filename,
    })))
}
