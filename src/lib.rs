//! HTTP test fixture for exercising client request libraries.
//!
//! Serves a fixed set of deterministic POST scenarios (string/object/XML
//! echo, multipart form echo, a deliberate 404, a slow response) plus a
//! stateful asynchronous upload whose byte-level progress a second,
//! concurrent request on the same session can poll.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod multipart;
pub mod negotiate;
pub mod record;
pub mod scenario;
pub mod upload;

pub use config::FixtureConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
