//! tests/mod.rs
//! A shared test helper to spawn the Axum app on an ephemeral port.

use std::{net::SocketAddr, time::Duration};

use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    serve,
    Router,
};
use tokio::net::TcpListener as TokioTcpListener;
use tower::{timeout::TimeoutLayer, ServiceBuilder};

use demo_api::config::state::AppState;
use demo_api::middlewares::{error_handler, request_logging};
use demo_api::routes::{docs_route, test_route};

/// Spawns the app on a random unused port and returns its base URL.
pub fn spawn_app() -> String {
    spawn_app_with(Router::new())
}

/// Same, with extra test-only routes merged in (e.g. a slow handler).
pub fn spawn_app_with(extra: Router<AppState>) -> String {
    let state: AppState = AppState::from_env().expect("Failed to load app state");

    // * Build the application using the same layers as main().
    let app: Router = Router::<AppState>::new()
        .merge(test_route::test_routes())
        .merge(docs_route::docs_routes())
        .merge(extra)
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(state.env.max_request_body_size))
                .layer(from_fn_with_state(
                    state.clone(),
                    request_logging::log_request_response,
                ))
                .layer(HandleErrorLayer::new(error_handler::handle_global_error))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    state.env.default_timeout_seconds,
                ))),
        )
        .with_state(state);

    // * Bind an ephemeral port using std::net::TcpListener.
    let std_listener: std::net::TcpListener =
        std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    std_listener.set_nonblocking(true).unwrap();

    // * Convert std::net::TcpListener to tokio::net::TcpListener.
    let tokio_listener: TokioTcpListener =
        TokioTcpListener::from_std(std_listener).expect("Failed to convert to tokio listener");

    let addr: SocketAddr = tokio_listener.local_addr().unwrap();

    // * Spawn the server in a background task.
    tokio::spawn(async move {
        serve(
            tokio_listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    // * Return the base URL, e.g. "http://127.0.0.1:12345".
    format!("http://{}", addr)
}
