//! DOCX format implementation
//!
//! Data Model:
//!
//!     DOCX is a zipped package of WordprocessingML parts. Reading goes through HTML:
//!
//!         bytes → [extract] → HTML string → [html5ever] → DOM → [html] → IR
//!
//!     so the IR mapping is written once against a small, well known tag vocabulary, and a
//!     different extraction backend only has to produce that HTML (see [`ContainerReader`]).
//!     When the HTML carries no structural content at all, the document falls back to the
//!     package's plain text, one paragraph per non-empty line.
//!
//!     Writing goes straight from IR to docx-rs builders (see writer.rs). The two sides
//!     agree on style names, so a written package reads back to the same tree, except for
//!     what WordprocessingML cannot hold in this vocabulary: code block languages, images
//!     (written as text placeholders) and soft line breaks (written as spaces).
//!
//! Concurrency
//!
//!     Unzipping, XML parsing and packing are blocking work and run on
//!     `tokio::task::spawn_blocking`. The futures complete with the whole document; there
//!     is no streaming.
//!
//! Errors
//!
//!     A package that is not a zip, lacks `word/document.xml` or holds malformed XML is a
//!     [`FormatError::Container`] carrying the underlying message. There is no retry and no
//!     silent empty document.

mod extract;
mod html;
mod numbering;
mod styles;
mod writer;
mod xml;

use crate::error::FormatError;
use crate::format::Format;
use crate::ir::{Block, Inline, IrDocument};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

pub use extract::{ContainerReader, DocxReader};
pub use html::{blocks_from, html_to_ir, ElementView};
pub use writer::write_docx;

/// Writer knobs, loaded from the `[docx]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocxOptions {
    /// Font family of code blocks and code spans
    pub code_font: String,
    /// Hex RGB color of hyperlink runs
    pub link_color: String,
}

impl Default for DocxOptions {
    fn default() -> Self {
        DocxOptions {
            code_font: "Courier New".to_string(),
            link_color: "1155CC".to_string(),
        }
    }
}

/// Read a DOCX package into a normalized IR document
pub async fn parse_docx(bytes: Vec<u8>) -> Result<IrDocument, FormatError> {
    parse_docx_with(Arc::new(DocxReader), bytes).await
}

/// Read a package with a specific extraction backend
pub async fn parse_docx_with(
    reader: Arc<dyn ContainerReader>,
    bytes: Vec<u8>,
) -> Result<IrDocument, FormatError> {
    tokio::task::spawn_blocking(move || read_document(reader.as_ref(), &bytes))
        .await
        .map_err(|e| FormatError::Container(format!("extraction task failed: {}", e)))?
}

/// Write an IR document as a DOCX package
pub async fn serialize_docx(
    doc: &IrDocument,
    options: &DocxOptions,
) -> Result<Vec<u8>, FormatError> {
    let doc = doc.clone();
    let options = options.clone();
    tokio::task::spawn_blocking(move || write_docx(&doc, &options))
        .await
        .map_err(|e| FormatError::Container(format!("packing task failed: {}", e)))?
}

/// Synchronous reading pipeline: structural HTML first, plain text as the fallback.
pub fn read_document(
    reader: &dyn ContainerReader,
    bytes: &[u8],
) -> Result<IrDocument, FormatError> {
    let html = reader.to_html(bytes)?;
    let doc = html_to_ir(&html);
    if !doc.is_empty() {
        return Ok(doc);
    }

    tracing::debug!("no structural content in package, falling back to plain text");
    let text = reader.raw_text(bytes)?;
    Ok(plain_text_document(&text))
}

/// One paragraph per non-empty line.
fn plain_text_document(text: &str) -> IrDocument {
    IrDocument::new(
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| Block::paragraph(vec![Inline::text(line)]))
            .collect(),
    )
}

/// Format implementation for DOCX
pub struct DocxFormat {
    options: DocxOptions,
    reader: Arc<dyn ContainerReader>,
}

impl DocxFormat {
    pub fn new(options: DocxOptions) -> Self {
        DocxFormat {
            options,
            reader: Arc::new(DocxReader),
        }
    }

    /// Replace the extraction backend
    pub fn with_reader(mut self, reader: Arc<dyn ContainerReader>) -> Self {
        self.reader = reader;
        self
    }
}

impl Default for DocxFormat {
    fn default() -> Self {
        Self::new(DocxOptions::default())
    }
}

#[async_trait]
impl Format for DocxFormat {
    fn name(&self) -> &str {
        "docx"
    }

    fn description(&self) -> &str {
        "Office Open XML word-processing document"
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["docx"]
    }

    fn is_binary(&self) -> bool {
        true
    }

    async fn parse(&self, input: &[u8]) -> Result<IrDocument, FormatError> {
        parse_docx_with(Arc::clone(&self.reader), input.to_vec()).await
    }

    async fn serialize(&self, doc: &IrDocument) -> Result<Vec<u8>, FormatError> {
        serialize_docx(doc, &self.options).await
    }
}
