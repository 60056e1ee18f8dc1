// Start of file: /src/routes/test_route.rs

/*
    * This file defines the route(s) for the "test" endpoint.
    * We register one GET route at `/test` that returns the fixed item.
*/

use axum::{routing::get, Router};

use crate::config::state::AppState;
use crate::controllers::test_controller::get_test_item;

pub fn test_routes() -> Router<AppState> {
    Router::new().route("/test", get(get_test_item))
}

// End of file: /src/routes/test_route.rs
