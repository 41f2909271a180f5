//! Dataset loading errors.

use std::path::PathBuf;

/// Errors that can occur when loading a metro dataset.
///
/// Malformed rows never fail a load; they are defaulted and logged.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The file could not be read
    #[error("failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text contains no `[LINE]` sections
    #[error("dataset contains no line sections")]
    Empty,
}
