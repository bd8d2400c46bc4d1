//! LaTeX format implementation
//!
//! Data Model:
//!
//!     LaTeX is a macro language, not a document model. We read a practical subset of it,
//!     line oriented for blocks and a character scanner for inline content:
//!     | LaTeX                                   | IR                    | Notes |
//!     | text lines, blank line separated        | Paragraph             | lines joined with a space |
//!     | \section .. \subparagraph (starred too) | Heading 1..5          | 6 prints as \subparagraph |
//!     | itemize / enumerate, \item              | List                  | nested environments recurse |
//!     | quote / quotation                       | Blockquote            | |
//!     | verbatim, lstlisting, minted            | CodeBlock             | body kept raw |
//!     | \hrule, \hline (outside tabular)        | HorizontalRule        | |
//!     | tabular{spec}                           | Table                 | l/c/r ↔ alignments |
//!     | \textbf \textit \emph \underline        | Strong / Emphasis / Underline | |
//!     | \texttt, \href, \url, \includegraphics  | CodeSpan / Link / Image | |
//!     | \\ and \newline                         | LineBreak             | |
//!
//!     Anything outside that vocabulary is passed through as literal text: unknown
//!     environments are transparent, unknown commands stay in the text. Parsing never fails.
//!
//!     The preamble (\documentclass, \usepackage, \begin{document} ...) and % comments are
//!     dropped.
//!
//! Escaping
//!
//!     Reserved characters (# $ % & _ { } ~ ^ \) are escaped on output by [`escape`] and
//!     read back by the inline tokenizer, so literal text survives a round trip.
//!
//! Testing
//!
//!     Each stage is unit tested in its own file (blocks.rs, inline.rs, escape.rs,
//!     serializer.rs). Whole-document round trips live in tests/latex_roundtrip.rs.

mod blocks;
mod escape;
mod inline;
mod serializer;

use crate::error::FormatError;
use crate::format::Format;
use crate::ir::{normalize, IrDocument};
use async_trait::async_trait;
use serde::Deserialize;

pub use escape::escape;
pub use serializer::serialize_to_latex;

/// Output knobs, loaded from the `[latex]` configuration section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LatexOptions {
    /// Wrap the body in a compilable article (`\documentclass` ... `\end{document}`)
    pub standalone: bool,
}

/// Parse LaTeX source into a normalized IR document
pub fn parse_from_latex(source: &str) -> IrDocument {
    let lines: Vec<&str> = source.lines().collect();
    normalize(&IrDocument::new(blocks::parse_blocks(&lines)))
}

/// Format implementation for LaTeX
#[derive(Debug, Default)]
pub struct LatexFormat {
    options: LatexOptions,
}

impl LatexFormat {
    pub fn new(options: LatexOptions) -> Self {
        LatexFormat { options }
    }
}

#[async_trait]
impl Format for LatexFormat {
    fn name(&self) -> &str {
        "latex"
    }

    fn description(&self) -> &str {
        "LaTeX article body (sectioning, lists, tabular, verbatim)"
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["tex", "latex"]
    }

    async fn parse(&self, input: &[u8]) -> Result<IrDocument, FormatError> {
        let source = std::str::from_utf8(input)?;
        Ok(parse_from_latex(source))
    }

    async fn serialize(&self, doc: &IrDocument) -> Result<Vec<u8>, FormatError> {
        Ok(serialize_to_latex(doc, &self.options).into_bytes())
    }
}
