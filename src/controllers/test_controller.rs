// Start of file: /src/controllers/test_controller.rs

use axum::{http::StatusCode, Json};

use crate::models::item::Item;

pub async fn get_test_item() -> (StatusCode, Json<Item>) {
    (StatusCode::OK, Json(Item::default()))
}

// End of file: /src/controllers/test_controller.rs
