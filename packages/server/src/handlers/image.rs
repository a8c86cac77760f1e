use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use common::storage::{IMAGE_EXTENSION, validate_flat_name};
use tokio_util::io::ReaderStream;
use tracing::{debug, info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Reject names that don't carry the image extension or that step outside the
/// image directory.
fn validate_image_name(name: &str) -> Result<&str, AppError> {
    // Checked on the raw segment, before any other validation.
    if !name.ends_with(&format!(".{IMAGE_EXTENSION}")) {
        return Err(AppError::Validation(format!(
            "Image path does not end with .{IMAGE_EXTENSION}"
        )));
    }
    Ok(validate_flat_name(name)?)
}

#[utoipa::path(
    get,
    path = "/images/{name}",
    tag = "Images",
    operation_id = "getImage",
    summary = "Download an item image",
    description = "Streams the stored image. When no image exists under `name`, the placeholder \
        `default.jpg` is returned instead.",
    params(("name" = String, Path, description = "Image file name, must end with .jpg")),
    responses(
        (status = 200, description = "JPEG image bytes (`Content-Type: image/jpeg`)"),
        (status = 400, description = "Invalid image name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Neither the image nor the placeholder exist (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_image(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let name = validate_image_name(&name)?;

    let (served, reader) = state.images.get_stream_or_default(name).await?;
    if served != name {
        debug!(requested = name, served = %served, "image not found");
    }
    let size = state.images.size(&served).await?;
    info!(image = %served, size, "returned image");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/jpeg")
        .header(header::CONTENT_LENGTH, size.to_string())
        .body(Body::from_stream(ReaderStream::new(reader)))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
