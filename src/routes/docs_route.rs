// Start of file: /src/routes/docs_route.rs

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::state::AppState;
use crate::controllers::docs_controller::api_docs;

// * The documentation route carries its own CORS rule: GET from any
// * origin with credentials, headers Origin/Content-Type/Accept.
// * Mirroring the request origin is the credential-compatible form of
// * an allow-all rule; a literal `*` cannot be combined with
// * credentials.
pub fn docs_routes() -> Router<AppState> {
    let cors: CorsLayer = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/v2/api-docs", get(api_docs))
        .layer(cors)
}

// End of file: /src/routes/docs_route.rs
