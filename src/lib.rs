// Library root for the Axum demo service with request/response logging

pub mod config;
pub mod controllers;
pub mod docs;
pub mod middlewares;
pub mod models;
pub mod routes;

pub use crate::config::environment::EnvironmentVariables;
pub use crate::config::state::AppState;
