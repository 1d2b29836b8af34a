// src/web/handlers/system_handlers.rs
use crate::web::types::MessageResponse;
use rocket::serde::json::Json;
use tracing::info;

pub async fn test_handler() -> Json<MessageResponse> {
    info!("API test endpoint called");
    Json(MessageResponse {
        message: "API is working".to_string(),
    })
}
