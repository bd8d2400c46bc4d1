//! Canonicalization pass.
//!
//! Parsers legally produce adjacent `Text` runs (one per source token) and transient empty
//! runs. [`normalize`] gives every tree a unique shape so that trees produced by different
//! parsers can be compared structurally:
//!
//! - every inline sequence is normalized post-order: containers first, then a left to right
//!   merge pass that concatenates adjacent `Text` nodes and drops empty ones;
//! - every `ListItem` and `TableCell` holds at least one block, an empty one gets a single
//!   empty `Paragraph`.
//!
//! The pass is pure, total, deterministic and idempotent.

use super::nodes::{Block, Inline, IrDocument, ListItem, TableCell, TableRow};

/// Return the normal form of `doc`. The input is left untouched.
pub fn normalize(doc: &IrDocument) -> IrDocument {
    IrDocument {
        blocks: normalize_blocks(doc.blocks.clone()),
    }
}

pub(crate) fn normalize_blocks(blocks: Vec<Block>) -> Vec<Block> {
    blocks.into_iter().map(normalize_block).collect()
}

fn normalize_block(block: Block) -> Block {
    match block {
        Block::Paragraph { inlines } => Block::Paragraph {
            inlines: normalize_inlines(inlines),
        },
        Block::Heading { level, inlines } => Block::Heading {
            level,
            inlines: normalize_inlines(inlines),
        },
        Block::List { ordered, items } => Block::List {
            ordered,
            items: items
                .into_iter()
                .map(|item| ListItem {
                    blocks: normalize_container(item.blocks),
                })
                .collect(),
        },
        Block::Blockquote { blocks } => Block::Blockquote {
            blocks: normalize_blocks(blocks),
        },
        Block::Table {
            header_row,
            rows,
            alignments,
        } => Block::Table {
            header_row: header_row.map(normalize_row),
            rows: rows.into_iter().map(normalize_row).collect(),
            alignments,
        },
        leaf @ (Block::CodeBlock { .. } | Block::HorizontalRule) => leaf,
    }
}

fn normalize_row(row: TableRow) -> TableRow {
    TableRow {
        cells: row
            .cells
            .into_iter()
            .map(|cell| TableCell {
                blocks: normalize_container(cell.blocks),
            })
            .collect(),
    }
}

/// Block sequence of a list item or table cell: never empty.
fn normalize_container(blocks: Vec<Block>) -> Vec<Block> {
    if blocks.is_empty() {
        return vec![Block::empty_paragraph()];
    }
    normalize_blocks(blocks)
}

/// Normalize one inline sequence.
pub fn normalize_inlines(inlines: Vec<Inline>) -> Vec<Inline> {
    let mut out: Vec<Inline> = Vec::with_capacity(inlines.len());

    for inline in inlines {
        match inline.map_children(normalize_inlines) {
            Inline::Text { text } => {
                if text.is_empty() {
                    continue;
                }
                if let Some(Inline::Text { text: previous }) = out.last_mut() {
                    previous.push_str(&text);
                } else {
                    out.push(Inline::Text { text });
                }
            }
            other => out.push(other),
        }
    }

    out
}
