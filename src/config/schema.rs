//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files,
//! and every field has a default so a minimal (or absent) config works.

use serde::{Deserialize, Serialize};

/// Root configuration for the fixture server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FixtureConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upload ingestion settings.
    pub upload: UploadConfig,

    /// Scenario behavior knobs.
    pub scenario: ScenarioConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Upload ingestion configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Size of the chunks file content is consumed in; each consumed
    /// chunk advances the upload tracker.
    pub chunk_bytes: usize,

    /// Cap on bodies buffered whole by the echo scenarios.
    pub echo_body_limit: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_bytes: 512,
            echo_body_limit: 1024 * 1024,
        }
    }
}

/// Scenario behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Artificial delay of the slow-response scenario, in milliseconds.
    pub slow_delay_ms: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self { slow_delay_ms: 2000 }
    }
}
