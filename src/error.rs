//! Error types for the blockpage library.

use thiserror::Error;

/// Result type alias for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that make a whole page document unreadable.
///
/// Individual malformed blocks never surface here; see [`BlockError`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Page document must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// A fault in a single block. Contained at the block boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("attribute `{attr}` has the wrong shape: expected {expected}")]
    Attribute {
        attr: &'static str,
        expected: &'static str,
    },
}

/// Reasons a page cannot be served to a visitor.
///
/// Never propagated as an [`Error`]; a failed lookup becomes the not-found view.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no page `{slug}` exists for `{owner}`")]
    NotFound { owner: String, slug: String },

    #[error("page `{slug}` of `{owner}` is not published")]
    NotPublished { owner: String, slug: String },

    #[error("page `{slug}` of `{owner}` could not be read: {reason}")]
    Unreadable {
        owner: String,
        slug: String,
        reason: String,
    },
}

/// Errors that occur during HTML serialization.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid class prefix: {0}")]
    ClassPrefix(String),

    #[error("Formatting error")]
    Fmt(#[from] std::fmt::Error),
}

/// Errors loading renderer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
