//! Error types for format operations

use crate::ir::Violation;
use thiserror::Error;

/// Errors that can occur during format operations.
///
/// Markdown and LaTeX parsing is total, any text is accepted. Only the DOCX container path
/// and registry lookups have a genuine failure channel.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    /// Text input was not valid UTF-8
    #[error("Input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The DOCX reader or writer rejected the container. Carries the underlying message.
    #[error("{0}")]
    Container(String),

    /// An untyped tree failed structural validation
    #[error("Invalid document: {}", join_violations(.0))]
    InvalidDocument(Vec<Violation>),
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
