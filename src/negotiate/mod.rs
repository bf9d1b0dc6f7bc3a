//! Content negotiation and request precondition checks.
//!
//! # Responsibilities
//! - Compare a declared Content-Type against a scenario's expected type
//! - Prefix matching for multipart bodies (boundary varies per request)
//! - Validate the XHR header triple on programmatic requests
//!
//! # Design Decisions
//! - An absent Content-Type header passes negotiation. Clients of the
//!   legacy fixture depend on this asymmetry, so it is kept on purpose
//!   even though a present-but-wrong header is rejected.
//! - Comparison is case-insensitive and exact, parameters included; the
//!   only prefix match is `multipart/form-data`.

use axum::http::HeaderMap;
use thiserror::Error;

/// Prefix accepted for multipart bodies; the boundary parameter differs
/// per request, so only the media type itself is checked.
pub const MULTIPART_PREFIX: &str = "multipart/form-data";

/// Negotiation failures, surfaced to clients as 400 responses.
///
/// The `Display` output is the diagnostic the response body quotes.
#[derive(Debug, Error, PartialEq)]
pub enum NegotiationError {
    #[error("{scenario}: bad content type [{actual}].")]
    ContentType {
        scenario: &'static str,
        actual: String,
    },

    #[error("Bad X-Requested-With header.")]
    RequestedWith,

    #[error("Bad cache control.")]
    CacheControl,

    #[error("Bad accept header.")]
    Accept,
}

/// Check a declared content type against an expected one.
///
/// Absence is valid; when present the comparison is case-insensitive and
/// exact, parameters included.
pub fn content_type_matches(declared: Option<&str>, expected: &str) -> bool {
    match declared {
        None => true,
        Some(declared) => declared.eq_ignore_ascii_case(expected),
    }
}

/// Check for a multipart body.
///
/// Unlike [`content_type_matches`], an absent header is not multipart.
pub fn is_multipart(declared: Option<&str>) -> bool {
    declared.is_some_and(|d| {
        d.get(..MULTIPART_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(MULTIPART_PREFIX))
    })
}

/// Validate the header triple a programmatic client must send.
///
/// Browser form submits omit `X-Requested-With` and skip all checks.
/// When it is present it must be `XMLHttpRequest`, `Cache-Control` must
/// be present, and `Accept` must lead with `application/json`.
pub fn check_preconditions(headers: &HeaderMap) -> Result<(), NegotiationError> {
    let Some(requested_with) = header_str(headers, "x-requested-with") else {
        return Ok(());
    };
    if requested_with != "XMLHttpRequest" {
        return Err(NegotiationError::RequestedWith);
    }
    if header_str(headers, "cache-control").is_none() {
        return Err(NegotiationError::CacheControl);
    }
    match header_str(headers, "accept") {
        Some(accept) if accept.starts_with("application/json") => Ok(()),
        _ => Err(NegotiationError::Accept),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn absent_content_type_is_accepted() {
        // Intentional legacy asymmetry: clients that omit the header are
        // let through, while a present wrong header is rejected.
        assert!(content_type_matches(None, "text/plain; charset=UTF-8"));
        assert!(content_type_matches(None, "application/json; charset=UTF-8"));
    }

    #[test]
    fn exact_match_ignores_case_but_not_parameters() {
        assert!(content_type_matches(
            Some("text/plain; charset=UTF-8"),
            "text/plain; charset=UTF-8"
        ));
        assert!(content_type_matches(
            Some("TEXT/PLAIN; CHARSET=utf-8"),
            "text/plain; charset=UTF-8"
        ));
        assert!(!content_type_matches(
            Some("text/plain"),
            "text/plain; charset=UTF-8"
        ));
    }

    #[test]
    fn multipart_is_prefix_matched() {
        assert!(is_multipart(Some(
            "multipart/form-data; boundary=----WebKitFormBoundaryX"
        )));
        assert!(is_multipart(Some("MULTIPART/FORM-DATA; boundary=b")));
        assert!(!is_multipart(Some("application/json; charset=UTF-8")));
        assert!(!is_multipart(None));
    }

    fn xhr_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
        headers.insert("cache-control", HeaderValue::from_static("no-cache"));
        headers.insert(
            "accept",
            HeaderValue::from_static("application/json, text/javascript"),
        );
        headers
    }

    #[test]
    fn browser_requests_skip_precondition_checks() {
        assert_eq!(check_preconditions(&HeaderMap::new()), Ok(()));
    }

    #[test]
    fn full_xhr_triple_passes() {
        assert_eq!(check_preconditions(&xhr_headers()), Ok(()));
    }

    #[test]
    fn wrong_requested_with_is_rejected() {
        let mut headers = xhr_headers();
        headers.insert("x-requested-with", HeaderValue::from_static("Fetch"));
        assert_eq!(
            check_preconditions(&headers),
            Err(NegotiationError::RequestedWith)
        );
    }

    #[test]
    fn missing_cache_control_is_rejected() {
        let mut headers = xhr_headers();
        headers.remove("cache-control");
        assert_eq!(
            check_preconditions(&headers),
            Err(NegotiationError::CacheControl)
        );
    }

    #[test]
    fn accept_must_lead_with_json() {
        let mut headers = xhr_headers();
        headers.insert("accept", HeaderValue::from_static("text/html"));
        assert_eq!(check_preconditions(&headers), Err(NegotiationError::Accept));

        headers.remove("accept");
        assert_eq!(check_preconditions(&headers), Err(NegotiationError::Accept));
    }

    #[test]
    fn diagnostic_names_the_scenario_and_actual_type() {
        let err = NegotiationError::ContentType {
            scenario: "send-string",
            actual: "application/json".into(),
        };
        assert_eq!(
            err.to_string(),
            "send-string: bad content type [application/json]."
        );
    }
}
