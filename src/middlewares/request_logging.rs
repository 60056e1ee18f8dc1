// Start of file: /src/middlewares/request_logging.rs

use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, Request, State},
    http::{header, response::Parts, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;
use tracing::{debug, error, Level};

use crate::config::state::AppState;
use crate::middlewares::body_capture::{self, CaptureHandle};

const DEFAULT_MAX_PAYLOAD_LENGTH: usize = 10_000;
const DEFAULT_BEFORE_MESSAGE_PREFIX: &str = "Before request [";
const DEFAULT_BEFORE_MESSAGE_SUFFIX: &str = "]";
const DEFAULT_AFTER_MESSAGE_PREFIX: &str = "After request [";
const DEFAULT_AFTER_MESSAGE_SUFFIX: &str = "]";

// * Response media types whose bodies may appear in the log. Anything
// * else is never rendered, even when capture succeeded.
fn is_visible_media_type(content_type: &str) -> bool {
    let essence: String = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    let Some((kind, subtype)) = essence.split_once('/') else {
        return false;
    };

    match kind {
        "text" => true,
        "multipart" => subtype == "form-data",
        "application" => {
            matches!(subtype, "x-www-form-urlencoded" | "json" | "xml")
                || subtype.ends_with("+json")
                || subtype.ends_with("+xml")
        }
        _ => false,
    }
}

/// Configuration for the request/response logging middleware.
///
/// Built from the environment once at startup and carried in
/// [`AppState`]; none of it is runtime-reloadable.
#[derive(Clone, Debug)]
pub struct RequestLoggingConfig {
    pub include_client_info: bool,
    pub include_query_string: bool,
    pub include_headers: bool,
    pub include_payload: bool,
    pub max_payload_length: usize,
    /// Path prefixes that are never logged.
    pub exclude_paths: Vec<String>,
    pub before_message_prefix: String,
    pub before_message_suffix: String,
    pub after_message_prefix: String,
    pub after_message_suffix: String,
}

impl Default for RequestLoggingConfig {
    fn default() -> Self {
        Self {
            include_client_info: true,
            include_query_string: true,
            include_headers: true,
            include_payload: true,
            max_payload_length: DEFAULT_MAX_PAYLOAD_LENGTH,
            exclude_paths: Vec::new(),
            before_message_prefix: DEFAULT_BEFORE_MESSAGE_PREFIX.into(),
            before_message_suffix: DEFAULT_BEFORE_MESSAGE_SUFFIX.into(),
            after_message_prefix: DEFAULT_AFTER_MESSAGE_PREFIX.into(),
            after_message_suffix: DEFAULT_AFTER_MESSAGE_SUFFIX.into(),
        }
    }
}

impl RequestLoggingConfig {
    pub fn from_env(env: &crate::config::environment::EnvironmentVariables) -> Self {
        Self {
            include_client_info: env.include_client_info,
            include_query_string: env.include_query_string,
            include_headers: env.include_headers,
            include_payload: env.include_payload,
            max_payload_length: env.max_payload_length,
            exclude_paths: env.log_exclude_paths.clone(),
            ..Self::default()
        }
    }

    fn should_log(&self, path: &str) -> bool {
        !self.exclude_paths.iter().any(|p| path.starts_with(p))
    }
}

/// Request extension that marks an exchange as not loggable. An outer
/// layer can insert it to keep the middleware from touching the bodies.
#[derive(Clone, Copy, Debug)]
pub struct SkipLogging;

/// Session identifier supplied by an outer layer, rendered as `session=`.
#[derive(Clone, Debug)]
pub struct SessionId(pub String);

/// Authenticated user supplied by an outer layer, rendered as `user=`.
#[derive(Clone, Debug)]
pub struct RemoteUser(pub String);

// * Snapshot of the request taken before it is handed downstream; the
// * after-message is assembled from the same snapshot.
#[derive(Clone, Debug)]
struct RequestMeta {
    method: String,
    path: String,
    query: Option<String>,
    headers: Vec<(String, String)>,
    client: Option<String>,
    session: Option<String>,
    user: Option<String>,
}

impl RequestMeta {
    fn from_request(req: &Request, cfg: &RequestLoggingConfig) -> Self {
        let headers: Vec<(String, String)> = if cfg.include_headers {
            req.headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_owned(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            method: req.method().as_str().to_owned(),
            path: req.uri().path().to_owned(),
            query: req.uri().query().map(String::from),
            headers,
            client: req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip().to_string()),
            session: req.extensions().get::<SessionId>().map(|s| s.0.clone()),
            user: req.extensions().get::<RemoteUser>().map(|u| u.0.clone()),
        }
    }
}

// Fixed assembly order: prefix, request line, headers, client info,
// payload, suffix. Both the before- and after-message use it; only the
// markers and the payload source differ.
fn create_message(
    meta: &RequestMeta,
    cfg: &RequestLoggingConfig,
    payload: Option<&[u8]>,
    prefix: &str,
    suffix: &str,
) -> String {
    let mut msg = String::new();

    msg.push_str(prefix);
    msg.push(' ');
    msg.push_str(&meta.method);
    msg.push(' ');
    msg.push_str(&meta.path);
    if cfg.include_query_string {
        if let Some(query) = &meta.query {
            msg.push('?');
            msg.push_str(query);
        }
    }
    msg.push('\n');

    if cfg.include_headers {
        for (name, value) in &meta.headers {
            msg.push_str(name);
            msg.push_str(": ");
            msg.push_str(value);
            msg.push('\n');
        }
    }

    if cfg.include_client_info {
        let mut wrote: bool = false;
        if let Some(client) = meta.client.as_deref().filter(|c| !c.is_empty()) {
            msg.push_str("client=");
            msg.push_str(client);
            wrote = true;
        }
        if let Some(session) = &meta.session {
            msg.push_str(";session=");
            msg.push_str(session);
            wrote = true;
        }
        if let Some(user) = &meta.user {
            msg.push_str(";user=");
            msg.push_str(user);
            wrote = true;
        }
        if wrote {
            msg.push('\n');
        }
    }

    if cfg.include_payload {
        if let Some(payload) = payload.filter(|p| !p.is_empty()) {
            let end: usize = payload.len().min(cfg.max_payload_length);
            msg.push_str("payload=\n");
            // A fragment that does not decode is dropped; the message
            // keeps whatever was already appended.
            if let Ok(fragment) = std::str::from_utf8(&payload[..end]) {
                msg.push_str(fragment);
            }
            msg.push('\n');
        }
    }

    msg.push_str(suffix);
    msg
}

// The after-message payload comes from the response, and only when its
// declared media type is in the visible list.
fn response_payload<'a>(parts: &Parts, bytes: &'a [u8]) -> Option<&'a [u8]> {
    let content_type: &str = parts.headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    is_visible_media_type(content_type).then_some(bytes)
}

/// Logs a before/after message pair around every exchange without
/// changing what the handler or the client sees.
///
/// The response body is buffered after the handler completes, inspected
/// for the after-message, and copied back onto a fresh response exactly
/// once, so the client response is unaffected. Error responses
/// synthesized by the inner layers take the same path.
pub async fn log_request_response(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let cfg: Arc<RequestLoggingConfig> = state.logging.clone();

    let loggable: bool = tracing::enabled!(Level::DEBUG)
        && req.extensions().get::<SkipLogging>().is_none()
        && cfg.should_log(req.uri().path());

    if !loggable {
        return next.run(req).await;
    }

    // Without payload capture there is nothing to buffer: log around the
    // exchange and let the response stream through untouched.
    if !cfg.include_payload {
        let meta: RequestMeta = RequestMeta::from_request(&req, &cfg);
        debug!(
            "{}",
            create_message(&meta, &cfg, None, &cfg.before_message_prefix, &cfg.before_message_suffix)
        );

        let response: Response = next.run(req).await;

        debug!(
            "{}",
            create_message(&meta, &cfg, None, &cfg.after_message_prefix, &cfg.after_message_suffix)
        );
        return response;
    }

    // Idempotent wrap: an already-wrapped request keeps its handle.
    let (req, capture): (Request, CaptureHandle) =
        body_capture::wrap_request(req, cfg.max_payload_length);

    let meta: RequestMeta = RequestMeta::from_request(&req, &cfg);

    // Pre-handling entry; the capture is still empty at this point, so
    // the payload block is normally absent.
    let pre_payload: Vec<u8> = capture.captured();
    debug!(
        "{}",
        create_message(
            &meta,
            &cfg,
            Some(&pre_payload),
            &cfg.before_message_prefix,
            &cfg.before_message_suffix,
        )
    );

    let response: Response = next.run(req).await;

    // Post-log and flush-back run for every response that comes back.
    let (mut parts, body) = response.into_parts();
    match body.collect().await {
        Ok(collected) => {
            let bytes: Bytes = collected.to_bytes();
            debug!(
                "{}",
                create_message(
                    &meta,
                    &cfg,
                    response_payload(&parts, &bytes),
                    &cfg.after_message_prefix,
                    &cfg.after_message_suffix,
                )
            );
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(err) => {
            error!("Failed to collect response body: {err}");
            debug!(
                "{}",
                create_message(
                    &meta,
                    &cfg,
                    None,
                    &cfg.after_message_prefix,
                    &cfg.after_message_suffix,
                )
            );
            parts.status = StatusCode::INTERNAL_SERVER_ERROR;
            parts.headers.remove(header::CONTENT_LENGTH);
            parts.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            Response::from_parts(parts, Body::from(r#"{"error": "Failed to read body"}"#))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> RequestMeta {
        RequestMeta {
            method: "GET".into(),
            path: "/test".into(),
            query: None,
            headers: Vec::new(),
            client: None,
            session: None,
            user: None,
        }
    }

    #[test]
    fn message_starts_with_prefix_method_and_path() {
        let cfg = RequestLoggingConfig::default();

        let msg = create_message(&meta(), &cfg, None, "Before request [", "]");

        assert!(msg.starts_with("Before request [ GET /test\n"));
        assert!(msg.ends_with("]"));
    }

    #[test]
    fn query_string_is_appended_only_when_enabled() {
        let mut m = meta();
        m.query = Some("a=1&b=2".into());

        let on = RequestLoggingConfig::default();
        assert!(create_message(&m, &on, None, "[", "]").contains("/test?a=1&b=2"));

        let off = RequestLoggingConfig {
            include_query_string: false,
            ..RequestLoggingConfig::default()
        };
        assert!(!create_message(&m, &off, None, "[", "]").contains("a=1"));
    }

    #[test]
    fn header_lines_preserve_order_and_multiple_values() {
        let req = Request::builder()
            .uri("/test")
            .header("x-multi", "one")
            .header("x-multi", "two")
            .header("x-single", "s")
            .body(Body::empty())
            .unwrap();

        let cfg = RequestLoggingConfig::default();
        let m = RequestMeta::from_request(&req, &cfg);
        let msg = create_message(&m, &cfg, None, "[", "]");

        let one = msg.find("x-multi: one").expect("first value present");
        let two = msg.find("x-multi: two").expect("second value present");
        assert!(one < two);
        assert!(msg.contains("x-single: s"));
    }

    #[test]
    fn headers_are_omitted_when_disabled() {
        let req = Request::builder()
            .uri("/test")
            .header("x-test", "a")
            .body(Body::empty())
            .unwrap();

        let cfg = RequestLoggingConfig {
            include_headers: false,
            ..RequestLoggingConfig::default()
        };
        let m = RequestMeta::from_request(&req, &cfg);

        assert!(!create_message(&m, &cfg, None, "[", "]").contains("x-test"));
    }

    #[test]
    fn client_info_fields_are_semicolon_separated() {
        let mut m = meta();
        m.client = Some("10.0.0.7".into());
        m.session = Some("abc123".into());
        m.user = Some("alice".into());

        let cfg = RequestLoggingConfig::default();
        let msg = create_message(&m, &cfg, None, "[", "]");

        assert!(msg.contains("client=10.0.0.7;session=abc123;user=alice\n"));
    }

    #[test]
    fn client_info_is_omitted_when_disabled_or_absent() {
        let mut m = meta();
        m.client = Some("10.0.0.7".into());

        let off = RequestLoggingConfig {
            include_client_info: false,
            ..RequestLoggingConfig::default()
        };
        assert!(!create_message(&m, &off, None, "[", "]").contains("client="));

        let on = RequestLoggingConfig::default();
        assert!(!create_message(&meta(), &on, None, "[", "]").contains("client="));
    }

    #[test]
    fn no_payload_line_when_payload_logging_is_disabled() {
        let cfg = RequestLoggingConfig {
            include_payload: false,
            ..RequestLoggingConfig::default()
        };

        let msg = create_message(&meta(), &cfg, Some(b"some body"), "[", "]");

        assert!(!msg.contains("payload="));
    }

    #[test]
    fn no_payload_line_for_an_empty_body() {
        let cfg = RequestLoggingConfig::default();

        let msg = create_message(&meta(), &cfg, Some(b""), "[", "]");

        assert!(!msg.contains("payload="));
    }

    #[test]
    fn payload_fragment_is_truncated_to_the_configured_maximum() {
        let cfg = RequestLoggingConfig {
            max_payload_length: 8,
            ..RequestLoggingConfig::default()
        };
        let body = vec![b'a'; 50];

        let msg = create_message(&meta(), &cfg, Some(&body), "[", "]");

        assert!(msg.contains("payload=\naaaaaaaa\n"));
        assert!(!msg.contains(&"a".repeat(9)));
    }

    #[test]
    fn undecodable_payload_is_swallowed() {
        let cfg = RequestLoggingConfig::default();

        let msg = create_message(&meta(), &cfg, Some(&[0xff, 0xfe, 0xfd]), "[", "]");

        // The payload marker is there, the fragment is not, and the
        // suffix still closes the message.
        assert!(msg.contains("payload=\n"));
        assert!(msg.ends_with("\n]"));
    }

    #[test]
    fn visible_media_types_match_the_allow_list() {
        assert!(is_visible_media_type("text/plain"));
        assert!(is_visible_media_type("text/html; charset=utf-8"));
        assert!(is_visible_media_type("application/json"));
        assert!(is_visible_media_type("application/xml"));
        assert!(is_visible_media_type("application/vnd.api+json"));
        assert!(is_visible_media_type("application/soap+xml"));
        assert!(is_visible_media_type("application/x-www-form-urlencoded"));
        assert!(is_visible_media_type("multipart/form-data; boundary=x"));

        assert!(!is_visible_media_type("application/octet-stream"));
        assert!(!is_visible_media_type("image/png"));
        assert!(!is_visible_media_type("video/mp4"));
        assert!(!is_visible_media_type("not-a-media-type"));
        assert!(!is_visible_media_type(""));
    }

    #[test]
    fn excluded_path_prefixes_are_not_logged() {
        let cfg = RequestLoggingConfig {
            exclude_paths: vec!["/health".into(), "/metrics".into()],
            ..RequestLoggingConfig::default()
        };

        assert!(!cfg.should_log("/health"));
        assert!(!cfg.should_log("/health/live"));
        assert!(!cfg.should_log("/metrics"));
        assert!(cfg.should_log("/test"));
    }
}

// End of file: /src/middlewares/request_logging.rs
