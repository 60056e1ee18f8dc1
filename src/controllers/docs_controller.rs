// Start of file: /src/controllers/docs_controller.rs

use axum::Json;
use serde_json::Value;

use crate::docs::openapi;

pub async fn api_docs() -> Json<Value> {
    Json(openapi::document().clone())
}

// End of file: /src/controllers/docs_controller.rs
