// Start of file: /src/config/environment.rs

// * Environment configuration with a singleton pattern.
// * Every knob the service understands lives here; the logging
// * middleware derives its own config struct from this at startup.

use std::{borrow::Cow, collections::HashMap};
// * anyhow for convenient error handling
use anyhow::{Context, Result};
// * once_cell for lazy static initialization
use once_cell::sync::Lazy;
use tracing::warn;

// ! Default values for environment variables (used if variables aren't set):
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_BODY_SIZE: usize = 2_097_152; // 2MB
const DEFAULT_TIMEOUT: u64 = 3; // 3 seconds
const DEFAULT_MAX_PAYLOAD_LENGTH: usize = 10_000; // bytes kept per logged body

// * A struct containing all environment variables used by the app
#[derive(Clone, Debug)]
pub struct EnvironmentVariables {
    pub environment: Cow<'static, str>,
    pub host: Cow<'static, str>,
    pub port: u16,
    pub max_request_body_size: usize,
    pub default_timeout_seconds: u64,
    // * Request/response logging knobs
    pub include_client_info: bool,
    pub include_query_string: bool,
    pub include_headers: bool,
    pub include_payload: bool,
    pub max_payload_length: usize,
    pub log_exclude_paths: Vec<String>,
}

impl EnvironmentVariables {
    // * Loads environment variables once.
    // * Only reads .env if ENVIRONMENT != "production".
    fn load() -> Result<Self> {
        // ? In non-production environments, attempt to load .env
        if std::env::var("ENVIRONMENT").unwrap_or_default() != "production" {
            dotenv::dotenv().ok();
        }

        // * Collect all environment vars from the system and .env
        let vars: HashMap<String, String> = std::env::vars()
            .chain(dotenv::vars())
            .collect();

        // * A small helper closure to fetch a variable by key
        let get_var = |key: &str| vars.get(key).map(String::as_str);

        // * Build our EnvironmentVariables, providing defaults if missing
        Ok(Self {
            environment: get_var("ENVIRONMENT")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or_else(|| {
                    warn!("Missing ENVIRONMENT, defaulting to '{DEFAULT_ENVIRONMENT}'");
                    Cow::Borrowed(DEFAULT_ENVIRONMENT)
                }),

            host: get_var("HOST")
                .map(|s| Cow::Owned(s.into()))
                .unwrap_or(Cow::Borrowed(DEFAULT_HOST)),

            port: get_var("PORT")
                .map(|s| s.parse().context("Invalid PORT value"))
                .transpose()?
                .unwrap_or(DEFAULT_PORT),

            max_request_body_size: get_var("MAX_REQUEST_BODY_SIZE")
                .map(|s| s.parse().context("Invalid MAX_REQUEST_BODY_SIZE"))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_BODY_SIZE),

            default_timeout_seconds: get_var("DEFAULT_TIMEOUT_SECONDS")
                .map(|s| s.parse().context("Invalid DEFAULT_TIMEOUT_SECONDS"))
                .transpose()?
                .unwrap_or(DEFAULT_TIMEOUT),

            include_client_info: get_var("INCLUDE_CLIENT_INFO")
                .map(|s| s.parse().context("Invalid INCLUDE_CLIENT_INFO"))
                .transpose()?
                .unwrap_or(true),

            include_query_string: get_var("INCLUDE_QUERY_STRING")
                .map(|s| s.parse().context("Invalid INCLUDE_QUERY_STRING"))
                .transpose()?
                .unwrap_or(true),

            include_headers: get_var("INCLUDE_HEADERS")
                .map(|s| s.parse().context("Invalid INCLUDE_HEADERS"))
                .transpose()?
                .unwrap_or(true),

            include_payload: get_var("INCLUDE_PAYLOAD")
                .map(|s| s.parse().context("Invalid INCLUDE_PAYLOAD"))
                .transpose()?
                .unwrap_or(true),

            max_payload_length: get_var("MAX_PAYLOAD_LENGTH")
                .map(|s| s.parse().context("Invalid MAX_PAYLOAD_LENGTH"))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_PAYLOAD_LENGTH),

            log_exclude_paths: get_var("LOG_EXCLUDE_PATHS")
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    // * Returns a reference to the lazily-initialized environment configuration
    pub fn instance() -> &'static Self {
        static INSTANCE: Lazy<Result<EnvironmentVariables, anyhow::Error>> = Lazy::new(|| {
            let config: EnvironmentVariables = EnvironmentVariables::load()?;

            if cfg!(debug_assertions) {
                tracing::debug!("Loaded environment configuration: {:#?}", config);
            }

            Ok(config)
        });

        // ! Panics if loading fails
        INSTANCE.as_ref().expect("Failed to load environment configuration")
    }
}

// End of file: /src/config/environment.rs
