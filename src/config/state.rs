// Start of file: /src/config/state.rs

use std::sync::Arc;

use crate::config::environment::EnvironmentVariables;
use crate::middlewares::request_logging::RequestLoggingConfig;

// * Shared application state, cloned into every handler/middleware.
// * The logging config is derived from the environment exactly once,
// * at startup, and handed to the middleware through this state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub env: Arc<EnvironmentVariables>,
    pub logging: Arc<RequestLoggingConfig>,
}

impl AppState {
    pub fn from_env() -> anyhow::Result<Self> {
        let env: &'static EnvironmentVariables = EnvironmentVariables::instance();

        Ok(Self {
            env: Arc::new(env.clone()),
            logging: Arc::new(RequestLoggingConfig::from_env(env)),
        })
    }
}

// End of file: /src/config/state.rs
