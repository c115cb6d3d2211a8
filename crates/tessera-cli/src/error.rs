//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while running a demo.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input or output JSON was malformed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catalog or config operation failed.
    #[error(transparent)]
    Core(#[from] tessera::Error),

    /// Handler construction failed.
    #[error(transparent)]
    PubSub(#[from] tessera::pubsub::Error),
}
