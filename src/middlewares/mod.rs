// Start of file: /src/middlewares/mod.rs

/*
    * Middleware module entry file. Re-exports our custom middlewares:
    * - request_logging (before/after log entries with body capture)
    * - body_capture (bounded tee decorator over request bodies)
    * - error_handler (maps layer errors onto HTTP responses)
*/

pub mod body_capture;
pub mod error_handler;
pub mod request_logging;

// End of file: /src/middlewares/mod.rs
