/// Error types for settings and the entitlement check.
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced outside the simulation tick: configuration files and
/// external services.  The tick itself has no error path.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("entitlement check failed: {0}")]
    Entitlement(String),
}
