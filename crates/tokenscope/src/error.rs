//! Error types for the inspector.

use std::path::PathBuf;

/// Result type alias for inspector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the inspector session.
///
/// Visualization and search never produce these: they degrade to "no
/// highlight" or "no results" and log instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Sheet, rule or token model error.
    #[error(transparent)]
    Style(#[from] tokenscope_style::Error),

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be serialized.
    #[error("Cannot serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The search index could not be built.
    #[error("Search index error: {0}")]
    Search(#[from] tantivy::TantivyError),

    /// File I/O error.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for missing sheet/rule lookups.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Style(err) if err.is_not_found())
    }
}
