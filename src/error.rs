//! Error types for gj-portfolio
//!
//! Only a failed fetch aborts a catalog load. Row-level decode problems are
//! collected as [`RowDecodeError`] values next to the decoded rows.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Site configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// The project catalog source could not be retrieved
    #[error("Failed to fetch project catalog: {0}")]
    Fetch(#[from] FetchError),

    /// A Handlebars template failed to compile
    #[error("Template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    /// A Handlebars template failed to render
    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No visible project carries the requested name
    #[error("Project not found: {0}")]
    ProjectNotFound(String),
}

impl From<handlebars::TemplateError> for Error {
    fn from(err: handlebars::TemplateError) -> Self {
        Error::Template(Box::new(err))
    }
}

/// Retrieval failures for the catalog source
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("response body from {url} could not be read: {message}")]
    Body { url: String, message: String },
}

/// A single data row that could not be turned into a row mapping
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowDecodeError {
    #[error("line {line}: {found} fields but the header declares {expected}")]
    TooManyFields {
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("line {line}: quoted field is never closed")]
    UnterminatedQuote { line: usize },
}

impl RowDecodeError {
    /// 1-based source line the offending row starts on
    pub fn line(&self) -> usize {
        match self {
            RowDecodeError::TooManyFields { line, .. } => *line,
            RowDecodeError::UnterminatedQuote { line } => *line,
        }
    }
}

/// Convenience Result type using the crate Error
pub type Result<T> = std::result::Result<T, Error>;
