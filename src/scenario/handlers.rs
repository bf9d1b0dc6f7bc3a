//! The per-scenario request handlers.
//!
//! Each handler validates the declared content type for its scenario,
//! produces a deterministic body, and tags the response with the
//! fixture's identification header. Handlers never retry; negotiation
//! failures are 400s with a quoted diagnostic and serialization faults
//! are 500s that fail loudly.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use std::sync::Arc;
use std::time::Duration;

use crate::http::server::AppState;
use crate::http::session::SessionId;
use crate::multipart;
use crate::negotiate::{self, NegotiationError};
use crate::record::{json, quote, xml, Record, SerializeError};
use crate::scenario::{envelope, person, Scenario, FIXTURE_VERSION, VERSION_HEADER};
use crate::upload::UploadSession;

const JSON_UTF8: &str = "application/json; charset=UTF-8";
const TEXT_UTF8: &str = "text/plain; charset=UTF-8";
const XML_UTF8: &str = "text/xml; charset=UTF-8";
const HTML_UTF8: &str = "text/html; charset=UTF-8";

/// Entry point behind the catch-all POST routes.
pub async fn dispatch(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    request: Request,
) -> Response {
    let (parts, body) = request.into_parts();

    if let Err(err) = negotiate::check_preconditions(&parts.headers) {
        return bad_request(err);
    }

    let path = parts.uri.path().to_string();
    let Some(scenario) = Scenario::from_path(&path) else {
        tracing::warn!(path = %path, "unknown scenario");
        return fixture_response(StatusCode::NOT_FOUND, TEXT_UTF8, "not found".into());
    };

    let declared = content_type(&parts.headers);
    tracing::debug!(
        scenario = scenario.name(),
        path = %path,
        session_id = %session_id,
        "dispatching scenario"
    );

    match scenario {
        Scenario::GetString => match expect(scenario, declared, JSON_UTF8) {
            Ok(()) => fixture_response(StatusCode::OK, TEXT_UTF8, "this is a string".into()),
            Err(err) => bad_request(err),
        },
        Scenario::SendString => match expect(scenario, declared, TEXT_UTF8) {
            Ok(()) => echo(body, TEXT_UTF8, &state).await,
            Err(err) => bad_request(err),
        },
        Scenario::GetObject => match expect(scenario, declared, JSON_UTF8) {
            Ok(()) => json_response(StatusCode::OK, &person()),
            Err(err) => bad_request(err),
        },
        Scenario::SendObject => match expect(scenario, declared, JSON_UTF8) {
            Ok(()) => echo(body, JSON_UTF8, &state).await,
            Err(err) => bad_request(err),
        },
        Scenario::GetXml => match expect(scenario, declared, JSON_UTF8) {
            Ok(()) => xml_response(&envelope(person())),
            Err(err) => bad_request(err),
        },
        Scenario::SendXml => match expect(scenario, declared, XML_UTF8) {
            Ok(()) => echo(body, XML_UTF8, &state).await,
            Err(err) => bad_request(err),
        },
        Scenario::SendForm => {
            if !negotiate::is_multipart(declared) {
                return bad_request(mismatch(scenario, declared));
            }
            // A form submit outside an upload scenario only feeds an
            // upload tracker that already exists for this session.
            let session = state
                .sessions
                .get(&session_id)
                .unwrap_or_else(|| Arc::new(UploadSession::detached()));
            let record = ingest_form(body, declared, &state, &session).await;
            form_reply(&parts.headers, &record, false)
        }
        Scenario::AsyncUpload => {
            if negotiate::content_type_matches(declared, JSON_UTF8) {
                // Poll path: snapshot only, never mutates progress.
                let snapshot = state.sessions.status(&session_id).snapshot();
                let record = Record::new().field("opcode", "STATUS").field(
                    "value",
                    Record::new()
                        .field("total", snapshot.total)
                        .field("loaded", snapshot.loaded as i64),
                );
                return json_response(StatusCode::OK, &record);
            }

            // Ingest path: the session record is created before the
            // content-type check, as the legacy fixture does.
            let total = content_length(&parts.headers);
            let session = state.sessions.start_upload(&session_id, total);
            if !negotiate::is_multipart(declared) {
                return bad_request(mismatch(scenario, declared));
            }
            let record = ingest_form(body, declared, &state, &session).await;
            form_reply(&parts.headers, &record, true)
        }
        Scenario::BadXhrStatus => json_response(StatusCode::NOT_FOUND, &envelope("bad status")),
        Scenario::XhrTimeout => {
            tokio::time::sleep(Duration::from_millis(state.config.scenario.slow_delay_ms)).await;
            json_response(StatusCode::OK, &envelope("xhr timeout"))
        }
    }
}

fn content_type(headers: &header::HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}

/// Declared body length, `-1` when the transport gave none.
fn content_length(headers: &header::HeaderMap) -> i64 {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(-1)
}

fn expect(
    scenario: Scenario,
    declared: Option<&str>,
    expected: &'static str,
) -> Result<(), NegotiationError> {
    if negotiate::content_type_matches(declared, expected) {
        Ok(())
    } else {
        Err(mismatch(scenario, declared))
    }
}

fn mismatch(scenario: Scenario, declared: Option<&str>) -> NegotiationError {
    NegotiationError::ContentType {
        scenario: scenario.name(),
        actual: declared.unwrap_or_default().to_string(),
    }
}

/// Stream a multipart body into the stock person record.
async fn ingest_form(
    body: Body,
    declared: Option<&str>,
    state: &AppState,
    session: &UploadSession,
) -> Record {
    let Some(boundary) = declared.and_then(multipart::parse_boundary) else {
        tracing::debug!("multipart body without a boundary parameter");
        return person();
    };
    multipart::ingest(
        body.into_data_stream(),
        &boundary,
        state.config.upload.chunk_bytes,
        session,
        person(),
    )
    .await
}

/// JSON reply for programmatic clients, HTML wrapper for browser form
/// submits (no `X-Requested-With` header).
fn form_reply(headers: &header::HeaderMap, record: &Record, upload: bool) -> Response {
    let json = match json::to_json(record) {
        Ok(json) => json,
        Err(err) => return internal_error(err),
    };
    if headers.contains_key("x-requested-with") {
        return fixture_response(StatusCode::OK, JSON_UTF8, json);
    }
    let html = if upload {
        format!(
            "<html><head>\
             <meta http-equiv=\"{VERSION_HEADER}\" content=\"{FIXTURE_VERSION}\" />\
             <meta http-equiv=\"Content-Type\" content=\"application/json;charset=UTF-8\" />\
             </head><body>{json}</body></html>"
        )
    } else {
        format!(
            "<!DOCTYPE html>\r\n<html>\r\n<head>\r\n\
             <meta http-equiv=\"Content-Type\" content=\"application/json;charset=UTF-8\" />\r\n\
             </head>\r\n<body>{json}</body>\r\n</html>"
        )
    };
    fixture_response(StatusCode::OK, HTML_UTF8, html)
}

/// Echo the request body back with the given content type.
async fn echo(body: Body, content_type: &'static str, state: &AppState) -> Response {
    match axum::body::to_bytes(body, state.config.upload.echo_body_limit).await {
        Ok(bytes) => fixture_response(
            StatusCode::OK,
            content_type,
            String::from_utf8_lossy(&bytes).into_owned(),
        ),
        Err(err) => {
            tracing::error!(error = %err, "failed to buffer echo body");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal fixture error").into_response()
        }
    }
}

fn json_response(status: StatusCode, record: &Record) -> Response {
    match json::to_json(record) {
        Ok(body) => fixture_response(status, JSON_UTF8, body),
        Err(err) => internal_error(err),
    }
}

fn xml_response(record: &Record) -> Response {
    match xml::to_xml(record) {
        Ok(body) => fixture_response(StatusCode::OK, XML_UTF8, body),
        Err(err) => internal_error(err),
    }
}

fn bad_request(err: NegotiationError) -> Response {
    tracing::warn!(diagnostic = %err, "rejecting request");
    fixture_response(StatusCode::BAD_REQUEST, TEXT_UTF8, quote(&err.to_string()))
}

/// Mis-specified scenarios fail loudly instead of degrading to empty
/// output.
fn internal_error(err: SerializeError) -> Response {
    tracing::error!(error = %err, "scenario could not serialize its payload");
    (StatusCode::INTERNAL_SERVER_ERROR, "internal fixture error").into_response()
}

fn fixture_response(status: StatusCode, content_type: &'static str, body: String) -> Response {
    (
        status,
        [
            ("content-type", content_type),
            (VERSION_HEADER, FIXTURE_VERSION),
        ],
        body,
    )
        .into_response()
}
