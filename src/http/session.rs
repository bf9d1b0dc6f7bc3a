//! Cookie-based session identity.
//!
//! The upload tracker needs the ingest request and its status polls to
//! resolve to the same per-client state. A middleware reads the session
//! cookie, minting a fresh UUID (and setting the cookie) when the client
//! has none, and exposes the id to handlers through request extensions.

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "FIXTURE_SESSION";

/// Opaque per-client session id, available as a request extension.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

/// Middleware attaching a [`SessionId`] to every request.
pub async fn session_layer(mut request: Request, next: Next) -> Response {
    let existing = cookie_value(request.headers(), SESSION_COOKIE);
    let fresh = existing.is_none();
    let id = existing.unwrap_or_else(|| Uuid::new_v4().to_string());

    request.extensions_mut().insert(SessionId(id.clone()));
    let mut response = next.run(request).await;

    if fresh {
        if let Ok(value) =
            HeaderValue::from_str(&format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly"))
        {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

fn cookie_value(headers: &header::HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in cookies.split(';') {
        if let Some((key, value)) = pair.trim().split_once('=') {
            if key == name {
                return Some(value.to_string());
            }
        }
    }
    None
}
