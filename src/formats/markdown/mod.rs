//! Markdown format implementation
//!
//! Data Model:
//!
//!     The IR was shaped after the CommonMark + GFM vocabulary, so the mapping is a kind for
//!     kind tree translation:
//!     | Markdown              | IR                          | Notes |
//!     | Paragraph             | Paragraph                   | |
//!     | Heading (depth)       | Heading (level)             | ATX on output |
//!     | List (ordered)        | List (ordered)              | items carry full block sequences |
//!     | BlockQuote            | Blockquote                  | |
//!     | CodeBlock (info)      | CodeBlock (language)        | trailing newline is not part of the text |
//!     | ThematicBreak         | HorizontalRule              | |
//!     | Table                 | Table                       | first row ↔ headerRow |
//!     | Strong / Emph         | Strong / Emphasis           | |
//!     | Code                  | CodeSpan                    | |
//!     | LineBreak / SoftBreak | LineBreak / Text("\n")      | |
//!     | Link / Image          | Link / Image                | image alt is the flattened children |
//!     | HtmlInline `<u>`      | Underline                   | see [`underline`] |
//!     | Strikethrough         | (children only)             | no IR counterpart |
//!
//!     Markdown has no underline. The IR's Underline travels as raw inline HTML, `<u>` and
//!     `</u>` around the content; all the sniffing for it sits in [`underline`].
//!
//!     Table alignments pass through when at least one column has one; a table with no
//!     aligned column has no `alignments` at all.
//!
//! Library
//!
//!     We use the comrak crate to handle parsing and serialization. Its choice comes from
//!  being a single crate for both purposes, that is feature-rich, robust and well maintained.
//!  Only the AST shape is adapted here, we never print Markdown by hand.
//!
//! Testing
//!
//!     The mapping logic is unit tested on the trees alone (IR in, IR out); string level
//!  round trips live in tests/markdown_roundtrip.rs.

mod parser;
mod serializer;
pub mod underline;

use crate::error::FormatError;
use crate::format::Format;
use crate::ir::IrDocument;
use async_trait::async_trait;
use comrak::ComrakOptions;
use serde::Deserialize;

pub use parser::parse_from_markdown;
pub use serializer::serialize_to_markdown;

/// Rendering knobs, loaded from the `[markdown]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Hard wrap width for paragraphs, 0 disables wrapping
    pub wrap_width: usize,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        MarkdownOptions { wrap_width: 0 }
    }
}

/// Format implementation for Markdown
#[derive(Debug, Default)]
pub struct MarkdownFormat {
    options: MarkdownOptions,
}

impl MarkdownFormat {
    pub fn new(options: MarkdownOptions) -> Self {
        MarkdownFormat { options }
    }
}

#[async_trait]
impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown with GFM tables and strikethrough"
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["md", "markdown"]
    }

    async fn parse(&self, input: &[u8]) -> Result<IrDocument, FormatError> {
        let source = std::str::from_utf8(input)?;
        Ok(parse_from_markdown(source))
    }

    async fn serialize(&self, doc: &IrDocument) -> Result<Vec<u8>, FormatError> {
        serialize_to_markdown(doc, &self.options).map(String::into_bytes)
    }
}

pub(crate) fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    // Underline travels as raw inline HTML
    options.render.unsafe_ = true;
    options
}
