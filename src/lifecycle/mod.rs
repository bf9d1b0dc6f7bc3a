//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Ctrl+C / test teardown
//!     → Shutdown::trigger
//!     → broadcast to the server task
//!     → axum drains in-flight requests and exits
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
