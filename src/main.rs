// Start of file: src/main.rs

use std::{net::SocketAddr, time::Duration};

use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    serve,
    Router,
};
use listenfd::ListenFd;
use tokio::net::TcpListener;
use tokio::signal;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;

use demo_api::config::state::AppState;
use demo_api::middlewares::{error_handler, request_logging};
use demo_api::routes::{docs_route, test_route};

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate: std::future::Pending<()> = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down gracefully");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // set up logging; the request logging middleware emits at debug
    let env_filter: tracing_subscriber::EnvFilter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "demo_api=debug,tower_http=debug,axum=trace".parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    let state: AppState = AppState::from_env()?;

    // build our router; the logging middleware sits outside the error
    // mapping layer so the responses it synthesizes are logged and
    // flushed like any other
    let app: Router = Router::<AppState>::new()
        .merge(test_route::test_routes())
        .merge(docs_route::docs_routes())
        .layer(
            ServiceBuilder::new()
                // Add Axum's default body limit
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
        .with_state(state.clone());

    // Listenfd integration
    let mut listenfd: ListenFd = ListenFd::from_env();

    let listener: TcpListener = match listenfd.take_tcp_listener(0)? {
        Some(std_listener) => {
            std_listener.set_nonblocking(true)?;
            TcpListener::from_std(std_listener)?
        }
        None => {
            let addr: String = format!("{}:{}", state.env.host, state.env.port);
            TcpListener::bind(&addr).await?
        }
    };

    println!("Server listening on: {}", listener.local_addr()?);

    // connect info gives the logging middleware the peer address
    serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

// End of file: src/main.rs
