//! Definition error types.

use thiserror::Error;

/// An error raised by a definition operation.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The text is not valid definition JSON.
    #[error("invalid definition JSON: {0}")]
    Json(#[from] serde_json::Error),
}
