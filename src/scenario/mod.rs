//! Scenario catalog and dispatch.
//!
//! # Data Flow
//! ```text
//! POST request
//!     → precondition check (XHR header triple)
//!     → Scenario::from_path (substring containment, legacy order)
//!     → per-scenario handler
//!         → { record serializer | multipart ingestor (+ upload tracker) }
//!     → response body
//! ```

pub mod handlers;

pub use handlers::dispatch;

use crate::record::{Record, Value};

/// Identification string carried in every response's version header and
/// in JSON envelopes.
pub const FIXTURE_VERSION: &str = "xhr-fixture 1.0.0";

/// Identification header added to responses once preconditions pass.
pub const VERSION_HEADER: &str = "x-fixture-version";

/// The fixed request/response behaviors the fixture implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    GetString,
    SendString,
    GetObject,
    SendObject,
    GetXml,
    SendXml,
    SendForm,
    AsyncUpload,
    BadXhrStatus,
    XhrTimeout,
}

impl Scenario {
    /// All scenarios in legacy dispatch order.
    const ALL: [Scenario; 10] = [
        Scenario::GetString,
        Scenario::SendString,
        Scenario::GetObject,
        Scenario::SendObject,
        Scenario::GetXml,
        Scenario::SendXml,
        Scenario::SendForm,
        Scenario::AsyncUpload,
        Scenario::BadXhrStatus,
        Scenario::XhrTimeout,
    ];

    /// Scenario token used for path matching and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::GetString => "get-string",
            Scenario::SendString => "send-string",
            Scenario::GetObject => "get-object",
            Scenario::SendObject => "send-object",
            Scenario::GetXml => "get-xml",
            Scenario::SendXml => "send-xml",
            Scenario::SendForm => "send-form",
            Scenario::AsyncUpload => "async-upload",
            Scenario::BadXhrStatus => "bad-xhr-status",
            Scenario::XhrTimeout => "xhr-timeout",
        }
    }

    /// Resolve a request path by substring containment.
    pub fn from_path(path: &str) -> Option<Scenario> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| path.contains(scenario.name()))
    }
}

/// The stock record echoed by object and form scenarios.
pub fn person() -> Record {
    Record::new()
        .field("name", "Maximus Decimus Deridius")
        .field("profession", "gladiator")
        .field("origin", "Spanish")
}

/// Wrap a value in the fixture's standard response envelope.
pub fn envelope(value: impl Into<Value>) -> Record {
    Record::new()
        .field("version", FIXTURE_VERSION)
        .field("code", "SUCCESS")
        .field("value", value)
}
