//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! The trait provides a uniform interface for parsing and serializing documents, whatever the
//! format's surface: text (Markdown, LaTeX) or a binary container (DOCX).
//!
//! Parsing and serialization are async because the DOCX container is decoded and encoded off
//! the calling task. Text formats complete immediately.

use crate::error::FormatError;
use crate::ir::IrDocument;
use async_trait::async_trait;

/// Trait for document formats
///
/// Implementors provide bidirectional conversion between bytes and the IR. `parse` must
/// return a normalized tree.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// #[async_trait]
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     async fn parse(&self, input: &[u8]) -> Result<IrDocument, FormatError> {
///         let source = std::str::from_utf8(input)?;
///         todo!()
///     }
///
///     async fn serialize(&self, doc: &IrDocument) -> Result<Vec<u8>, FormatError> {
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "latex", "docx")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions (without the dot) this format claims
    fn file_extensions(&self) -> &[&'static str] {
        &[]
    }

    /// Whether serialized output is binary rather than UTF-8 text
    fn is_binary(&self) -> bool {
        false
    }

    /// Parse raw input into a normalized IR document
    async fn parse(&self, input: &[u8]) -> Result<IrDocument, FormatError>;

    /// Serialize an IR document into raw output
    async fn serialize(&self, doc: &IrDocument) -> Result<Vec<u8>, FormatError>;
}
