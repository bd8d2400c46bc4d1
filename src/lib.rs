//! Document conversion between Markdown, LaTeX and DOCX
//!
//!     Every conversion goes through one intermediate representation (IR), a small typed
//!     document tree. Each format only knows how to map its own surface to and from the IR,
//!     so N formats need N mappers, not N² converters.
//!
//!         Markdown ─┐                ┌─ Markdown
//!         LaTeX    ─┼─ parse → IR → ┼─ LaTeX
//!         DOCX     ─┘   (normalize)  └─ DOCX
//!
//! Architecture
//!
//!     - IR: node types, the normalizer and the structural validator (./ir)
//!     - Format trait: uniform async interface over bytes (./format.rs)
//!     - FormatRegistry: discovery by name or extension, parse / serialize / convert
//!     - Format implementations: ./formats/{markdown, latex, docx}
//!     - Config: embedded defaults layered with user files (./config.rs)
//!
//!     This is a pure lib: no printing, no env vars, no file system. The docmorph binary
//!     (src/bin/docmorph.rs) is the shell that marshals files to and from these entry points.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── config.rs
//!     ├── ir
//!     │   ├── nodes.rs            # Block / Inline families
//!     │   ├── normalize.rs
//!     │   └── validate.rs
//!     ├── formats
//!     │   ├── markdown            # comrak AST adapter
//!     │   ├── latex               # hand written segmenter, tokenizer and printer
//!     │   └── docx                # zip + quick-xml → HTML → IR, IR → docx-rs
//!     └── lib.rs
//!
//! Normal form
//!
//!     Every parse entry point returns a normalized tree: adjacent Text nodes merged, empty
//!     Text dropped, and empty list items and table cells holding one empty paragraph. Trees
//!     coming from different formats can therefore be compared with `==`.
//!
//! Implementation Principles
//!
//!     Offload to specialized crates where one exists (comrak for Markdown, html5ever for
//!     HTML, quick-xml and zip for reading DOCX, docx-rs for writing it). LaTeX has no such
//!     crate for a document model, so its engine is written here, and it never fails: input
//!     it does not understand comes through as literal text.
//!
//! Entry points
//!
//!     The free functions below are the whole conversion surface. Markdown and LaTeX are
//!     synchronous; DOCX is async because the container work runs on the blocking pool.

pub mod config;
pub mod error;
pub mod format;
pub mod formats;
pub mod ir;
pub mod registry;

pub use config::{load_defaults, DocmorphConfig, Loader};
pub use error::FormatError;
pub use format::Format;
pub use formats::docx::{DocxFormat, DocxOptions};
pub use formats::latex::{LatexFormat, LatexOptions};
pub use formats::markdown::{MarkdownFormat, MarkdownOptions};
pub use ir::{normalize, validate_document, IrDocument, Violation};
pub use registry::FormatRegistry;

/// Parse Markdown into a normalized IR document
pub fn parse_markdown_to_ir(source: &str) -> IrDocument {
    formats::markdown::parse_from_markdown(source)
}

/// Serialize an IR document to Markdown with default options
pub fn serialize_ir_to_markdown(doc: &IrDocument) -> Result<String, FormatError> {
    serialize_ir_to_markdown_with(doc, &MarkdownOptions::default())
}

pub fn serialize_ir_to_markdown_with(
    doc: &IrDocument,
    options: &MarkdownOptions,
) -> Result<String, FormatError> {
    formats::markdown::serialize_to_markdown(doc, options)
}

/// Parse LaTeX into a normalized IR document. Never fails.
pub fn parse_latex_to_ir(source: &str) -> IrDocument {
    formats::latex::parse_from_latex(source)
}

/// Serialize an IR document to a LaTeX body
pub fn serialize_ir_to_latex(doc: &IrDocument) -> String {
    serialize_ir_to_latex_with(doc, &LatexOptions::default())
}

pub fn serialize_ir_to_latex_with(doc: &IrDocument, options: &LatexOptions) -> String {
    formats::latex::serialize_to_latex(doc, options)
}

/// Read a DOCX package into a normalized IR document
pub async fn parse_docx_to_ir(bytes: Vec<u8>) -> Result<IrDocument, FormatError> {
    formats::docx::parse_docx(bytes).await
}

/// Read a DOCX package with a specific extraction backend
pub async fn parse_docx_to_ir_with(
    reader: std::sync::Arc<dyn formats::docx::ContainerReader>,
    bytes: Vec<u8>,
) -> Result<IrDocument, FormatError> {
    formats::docx::parse_docx_with(reader, bytes).await
}

/// Write an IR document as a DOCX package with default options
pub async fn serialize_ir_to_docx(doc: &IrDocument) -> Result<Vec<u8>, FormatError> {
    serialize_ir_to_docx_with(doc, &DocxOptions::default()).await
}

pub async fn serialize_ir_to_docx_with(
    doc: &IrDocument,
    options: &DocxOptions,
) -> Result<Vec<u8>, FormatError> {
    formats::docx::serialize_docx(doc, options).await
}
