use axum::Json;
use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use common::storage::{BoxReader, ContentHash, ImageStore};
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::query::AppQuery;
use crate::models::item::{ItemListResponse, MessageResponse, SearchQuery};
use crate::repository::NewItem;
use crate::state::AppState;

/// Multipart overhead allowed on top of the image itself.
const FORM_OVERHEAD: usize = 64 * 1024;

pub fn add_item_body_limit(max_image_size: u64) -> DefaultBodyLimit {
    let limit = usize::try_from(max_image_size)
        .unwrap_or(usize::MAX)
        .saturating_add(FORM_OVERHEAD);
    DefaultBodyLimit::max(limit)
}

#[derive(Default)]
struct AddItemForm {
    name: Option<String>,
    category: Option<String>,
    image: Option<ContentHash>,
}

impl AddItemForm {
    /// Read every part of the form, storing the image as soon as it arrives.
    async fn read(
        mut multipart: Multipart,
        images: &dyn ImageStore,
        max_image_size: u64,
    ) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            match field.name() {
                Some("name") => form.name = Some(read_text(field, "name").await?),
                Some("category") => form.category = Some(read_text(field, "category").await?),
                Some("image") => {
                    form.image = Some(stream_field_to_store(field, images, max_image_size).await?);
                }
                _ => {} // Ignore unknown fields.
            }
        }

        Ok(form)
    }

    /// Check required fields, returning `(name, category, image)`.
    fn validate(self) -> Result<(String, String, ContentHash), AppError> {
        let name = required_text(self.name, "name")?;
        let category = required_text(self.category, "category")?;
        let image = self
            .image
            .ok_or_else(|| AppError::Validation("image is required".into()))?;
        Ok((name, category, image))
    }
}

async fn read_text(field: Field<'_>, label: &str) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read {label}: {e}")))
}

/// Blank values count as missing; anything else is kept exactly as sent.
fn required_text(value: Option<String>, label: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{label} is required")))
}

/// Stream a multipart field to the image store via a temp file.
async fn stream_field_to_store(
    mut field: Field<'_>,
    images: &dyn ImageStore,
    max_size: u64,
) -> Result<ContentHash, AppError> {
    let temp_path = std::env::temp_dir().join(format!("listing-upload-{}", Uuid::new_v4()));

    let result = async {
        let mut temp_file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

        let mut total_size: u64 = 0;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            total_size += chunk.len() as u64;
            if total_size > max_size {
                return Err(AppError::Validation(format!(
                    "Image exceeds maximum size of {max_size} bytes"
                )));
            }
            temp_file
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
        }

        temp_file
            .flush()
            .await
            .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;
        drop(temp_file);

        let file = tokio::fs::File::open(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reopen temp file: {e}")))?;
        let reader: BoxReader = Box::new(file);
        Ok(images.put_stream(reader).await?)
    }
    .await;

    let _ = tokio::fs::remove_file(&temp_path).await;

    result
}

#[utoipa::path(
    post,
    path = "/items",
    tag = "Items",
    operation_id = "addItem",
    summary = "Add a new item",
    description = "Creates an item from a multipart form with `name`, `category` and `image` fields. \
        The image is stored under the SHA-256 digest of its bytes, so identical uploads share one file.",
    request_body(content_type = "multipart/form-data", description = "Item fields and image file"),
    responses(
        (status = 200, description = "Item stored", body = MessageResponse),
        (status = 400, description = "Missing or invalid field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn add_item(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    let (name, category, hash) = AddItemForm::read(
        multipart,
        state.images.as_ref(),
        state.config.storage.max_image_size,
    )
    .await?
    .validate()?;

    let image_name = hash.file_name();

    let id = state
        .items
        .insert(NewItem {
            name: name.clone(),
            category,
            image_name: image_name.clone(),
        })
        .await?;

    let message = format!("item received: {name}");
    info!(id, image = %image_name, "{message}");

    Ok(Json(MessageResponse::new(message)))
}

#[utoipa::path(
    get,
    path = "/items",
    tag = "Items",
    operation_id = "listItems",
    summary = "List all items",
    responses(
        (status = 200, description = "All items", body = ItemListResponse),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_items(State(state): State<AppState>) -> Result<Json<ItemListResponse>, AppError> {
    let items = state.items.list_all().await?;
    Ok(Json(items.into()))
}

#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "Items",
    operation_id = "getItem",
    summary = "Get an item by ID",
    description = "Returns the matching item wrapped in the usual list envelope. \
        An unknown ID yields an empty list rather than an error.",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Zero or one items", body = ItemListResponse),
        (status = 400, description = "ID is not an integer (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ItemListResponse>, AppError> {
    let id: i32 = id
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid item id '{id}'")))?;

    let items = state.items.get_by_id(id).await?;
    Ok(Json(items.into()))
}

#[utoipa::path(
    get,
    path = "/search",
    tag = "Items",
    operation_id = "searchItems",
    summary = "Search items by name",
    description = "Returns items whose name contains `keyword`. Wildcard characters in the \
        keyword are matched literally.",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching items", body = ItemListResponse),
        (status = 400, description = "Missing keyword (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(keyword = %query.keyword))]
pub async fn search_items(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<ItemListResponse>, AppError> {
    let items = state.items.search(&query.keyword).await?;
    Ok(Json(items.into()))
}
