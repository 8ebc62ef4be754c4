//! Error types for the stylesheet and token model.

use std::path::PathBuf;

/// Result type alias for style operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading sheets or resolving tokens.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// CSS parsing error.
    #[error("CSS parse error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: u32,
        column: u32,
    },

    /// Selector parsing error.
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// A sheet naming pattern failed to compile.
    #[error("Invalid sheet pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A sheet or rule looked up directly does not exist.
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// A shorthand value could not be split into edges.
    #[error("Cannot expand '{value}': {message}")]
    Shorthand { value: String, message: String },

    /// File I/O error.
    #[error("Failed to read stylesheet '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Hot-reload error.
    #[cfg(feature = "hot-reload")]
    #[error("Hot-reload error: {0}")]
    HotReload(String),
}

impl Error {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a selector error.
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Create a pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a missing-sheet error.
    pub fn sheet_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Sheet",
            name: name.into(),
        }
    }

    /// Create a missing-rule error.
    pub fn rule_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Rule",
            name: name.into(),
        }
    }

    /// Create a shorthand expansion error.
    pub fn shorthand(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Shorthand {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for missing sheet/rule lookups.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
