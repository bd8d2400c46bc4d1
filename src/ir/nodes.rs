//! Core IR data structures.
//!
//! The tree serializes to JSON with a `"type"` tag on every node:
//!
//! ```json
//! {"type": "Document", "blocks": [
//!     {"type": "Heading", "level": 1, "inlines": [{"type": "Text", "text": "Title"}]}
//! ]}
//! ```
//!
//! Equality is the derived structural equality, which is what round-trip assertions use.

use serde::{Deserialize, Serialize};

/// Root of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Document")]
pub struct IrDocument {
    pub blocks: Vec<Block>,
}

impl IrDocument {
    pub fn new(blocks: Vec<Block>) -> Self {
        IrDocument { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Block level nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    Paragraph {
        inlines: Vec<Inline>,
    },
    /// `level` is in `1..=6`.
    Heading {
        level: u8,
        inlines: Vec<Inline>,
    },
    List {
        ordered: bool,
        items: Vec<ListItem>,
    },
    Blockquote {
        blocks: Vec<Block>,
    },
    CodeBlock {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    HorizontalRule,
    /// The header row is never part of `rows`.
    Table {
        #[serde(
            rename = "headerRow",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        header_row: Option<TableRow>,
        rows: Vec<TableRow>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alignments: Option<Vec<TableAlignment>>,
    },
}

/// A list entry. Only legal inside [`Block::List`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "ListItem")]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "TableRow")]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// A cell holds a full block sequence, so lists and several paragraphs are legal inside.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "TableCell")]
pub struct TableCell {
    pub blocks: Vec<Block>,
}

/// Column alignment, index-correlated with column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableAlignment {
    Left,
    Center,
    Right,
}

impl TableAlignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableAlignment::Left => "left",
            TableAlignment::Center => "center",
            TableAlignment::Right => "right",
        }
    }

    /// Accepts the serialized names plus the CSS `start`/`end` spellings.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(TableAlignment::Left),
            "center" | "centre" => Some(TableAlignment::Center),
            "right" | "end" => Some(TableAlignment::Right),
            _ => None,
        }
    }
}

/// Inline (text flow) nodes.
///
/// `Strong`, `Emphasis`, `Underline` and `Link` are the recursive containers; everything
/// else is a leaf. Code that needs to descend into containers should go through
/// [`Inline::children`] and [`Inline::map_children`] instead of matching each variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Inline {
    Text {
        text: String,
    },
    Strong {
        inlines: Vec<Inline>,
    },
    Emphasis {
        inlines: Vec<Inline>,
    },
    Underline {
        inlines: Vec<Inline>,
    },
    CodeSpan {
        text: String,
    },
    LineBreak,
    Link {
        href: String,
        inlines: Vec<Inline>,
    },
    Image {
        src: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text { text: text.into() }
    }

    pub fn is_container(&self) -> bool {
        self.children().is_some()
    }

    /// Children of a recursive container, `None` for leaves.
    pub fn children(&self) -> Option<&[Inline]> {
        match self {
            Inline::Strong { inlines }
            | Inline::Emphasis { inlines }
            | Inline::Underline { inlines }
            | Inline::Link { inlines, .. } => Some(inlines),
            _ => None,
        }
    }

    /// Rebuild a container with `f` applied to its children. Leaves are returned unchanged.
    pub fn map_children<F>(self, f: F) -> Inline
    where
        F: FnOnce(Vec<Inline>) -> Vec<Inline>,
    {
        match self {
            Inline::Strong { inlines } => Inline::Strong { inlines: f(inlines) },
            Inline::Emphasis { inlines } => Inline::Emphasis { inlines: f(inlines) },
            Inline::Underline { inlines } => Inline::Underline { inlines: f(inlines) },
            Inline::Link { href, inlines } => Inline::Link {
                href,
                inlines: f(inlines),
            },
            leaf => leaf,
        }
    }

    /// Flattened text content. Line breaks become `\n`, images contribute their alt text.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_plain_text(&mut out);
        out
    }

    fn push_plain_text(&self, out: &mut String) {
        match self {
            Inline::Text { text } | Inline::CodeSpan { text } => out.push_str(text),
            Inline::LineBreak => out.push('\n'),
            Inline::Image { alt, .. } => out.push_str(alt.as_deref().unwrap_or_default()),
            container => {
                for child in container.children().unwrap_or_default() {
                    child.push_plain_text(out);
                }
            }
        }
    }
}

/// Flattened text of an inline sequence.
pub fn inlines_plain_text(inlines: &[Inline]) -> String {
    inlines.iter().map(Inline::plain_text).collect()
}

impl Block {
    pub fn paragraph(inlines: Vec<Inline>) -> Self {
        Block::Paragraph { inlines }
    }

    pub fn empty_paragraph() -> Self {
        Block::Paragraph {
            inlines: Vec::new(),
        }
    }

    /// Flattened text content, nested blocks separated by newlines.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph { inlines } | Block::Heading { inlines, .. } => {
                inlines_plain_text(inlines)
            }
            Block::CodeBlock { text, .. } => text.clone(),
            Block::HorizontalRule => String::new(),
            Block::Blockquote { blocks } => blocks_plain_text(blocks),
            Block::List { items, .. } => items
                .iter()
                .map(|item| blocks_plain_text(&item.blocks))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Table {
                header_row, rows, ..
            } => header_row
                .iter()
                .chain(rows.iter())
                .map(|row| {
                    row.cells
                        .iter()
                        .map(|cell| blocks_plain_text(&cell.blocks))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

pub fn blocks_plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::plain_text)
        .collect::<Vec<_>>()
        .join("\n")
}

impl ListItem {
    pub fn new(blocks: Vec<Block>) -> Self {
        ListItem { blocks }
    }
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        TableRow { cells }
    }
}

impl TableCell {
    pub fn new(blocks: Vec<Block>) -> Self {
        TableCell { blocks }
    }

    /// A cell holding a single paragraph.
    pub fn from_inlines(inlines: Vec<Inline>) -> Self {
        TableCell {
            blocks: vec![Block::paragraph(inlines)],
        }
    }
}
