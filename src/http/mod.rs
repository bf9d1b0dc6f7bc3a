//! HTTP server wiring.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all POST routes)
//!     → session.rs (cookie session identity)
//!     → scenario dispatch
//!     → response
//! ```

pub mod server;
pub mod session;

pub use server::{AppState, HttpServer};
pub use session::SessionId;
