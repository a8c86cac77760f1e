use axum::Json;

use crate::models::item::MessageResponse;

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    operation_id = "hello",
    summary = "Greeting / liveness check",
    responses((status = 200, description = "Greeting", body = MessageResponse)),
)]
pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello, world!"))
}
