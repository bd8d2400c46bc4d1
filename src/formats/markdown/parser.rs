//! Markdown parsing (Markdown → IR import)
//!
//! Pipeline: Markdown string → Comrak AST → raw IR → normalized IR
//!
//! Inline children are first collected as [`Piece`]s so that raw HTML can be paired into
//! underlines by [`underline::resolve`] before they become IR inlines.

use super::default_comrak_options;
use super::underline::{self, Piece};
use crate::ir::{normalize, Block, Inline, IrDocument, ListItem, TableAlignment, TableCell, TableRow};
use comrak::nodes::{AstNode, ListType, NodeValue, TableAlignment as ComrakAlignment};
use comrak::{parse_document, Arena};

/// Parse a Markdown string into a normalized IR document
pub fn parse_from_markdown(source: &str) -> IrDocument {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);

    let doc = IrDocument::new(convert_blocks(root));
    normalize(&doc)
}

fn convert_blocks<'a>(parent: &'a AstNode<'a>) -> Vec<Block> {
    parent.children().flat_map(convert_block).collect()
}

fn convert_block<'a>(node: &'a AstNode<'a>) -> Vec<Block> {
    let data = node.data.borrow();

    match &data.value {
        NodeValue::Paragraph => vec![Block::Paragraph {
            inlines: convert_inlines(node),
        }],

        NodeValue::Heading(heading) => vec![Block::Heading {
            level: heading.level.clamp(1, 6),
            inlines: convert_inlines(node),
        }],

        NodeValue::List(list) => vec![Block::List {
            ordered: matches!(list.list_type, ListType::Ordered),
            items: node
                .children()
                .map(|item| ListItem::new(convert_blocks(item)))
                .collect(),
        }],

        NodeValue::BlockQuote => vec![Block::Blockquote {
            blocks: convert_blocks(node),
        }],

        NodeValue::CodeBlock(code) => {
            let text = code
                .literal
                .strip_suffix('\n')
                .unwrap_or(&code.literal)
                .to_string();
            let language = code
                .info
                .split_whitespace()
                .next()
                .map(ToString::to_string);
            vec![Block::CodeBlock { text, language }]
        }

        NodeValue::ThematicBreak => vec![Block::HorizontalRule],

        NodeValue::Table(table) => vec![convert_table(node, &table.alignments)],

        NodeValue::HtmlBlock(html) => {
            let literal = html.literal.trim_end();
            // Comments carry no content (comrak separates adjacent lists with one)
            if literal.is_empty() || (literal.starts_with("<!--") && literal.ends_with("-->")) {
                return vec![];
            }
            vec![Block::Paragraph {
                inlines: underline::resolve(vec![Piece::Raw(literal.to_string())]),
            }]
        }

        // Front matter, footnote definitions and other extension blocks
        _ => convert_blocks(node),
    }
}

fn convert_table<'a>(node: &'a AstNode<'a>, alignments: &[ComrakAlignment]) -> Block {
    let mut rows: Vec<TableRow> = node
        .children()
        .map(|row| {
            TableRow::new(
                row.children()
                    .map(|cell| TableCell::from_inlines(convert_inlines(cell)))
                    .collect(),
            )
        })
        .collect();

    let header_row = if rows.is_empty() {
        None
    } else {
        Some(rows.remove(0))
    };

    Block::Table {
        header_row,
        rows,
        alignments: convert_alignments(alignments),
    }
}

/// Recognized alignments pass through; unset columns default to left as long as at least
/// one column is aligned, otherwise the table has no alignments at all.
fn convert_alignments(alignments: &[ComrakAlignment]) -> Option<Vec<TableAlignment>> {
    let mapped: Vec<Option<TableAlignment>> = alignments
        .iter()
        .map(|alignment| match alignment {
            ComrakAlignment::Left => Some(TableAlignment::Left),
            ComrakAlignment::Center => Some(TableAlignment::Center),
            ComrakAlignment::Right => Some(TableAlignment::Right),
            _ => None,
        })
        .collect();

    if mapped.iter().all(Option::is_none) {
        return None;
    }
    Some(
        mapped
            .into_iter()
            .map(|alignment| alignment.unwrap_or(TableAlignment::Left))
            .collect(),
    )
}

fn convert_inlines<'a>(parent: &'a AstNode<'a>) -> Vec<Inline> {
    underline::resolve(collect_pieces(parent))
}

fn collect_pieces<'a>(parent: &'a AstNode<'a>) -> Vec<Piece> {
    parent.children().flat_map(convert_inline).collect()
}

fn convert_inline<'a>(node: &'a AstNode<'a>) -> Vec<Piece> {
    let data = node.data.borrow();

    let inline = match &data.value {
        NodeValue::Text(text) => Inline::text(text.clone()),
        NodeValue::SoftBreak => Inline::text("\n"),
        NodeValue::LineBreak => Inline::LineBreak,
        NodeValue::Code(code) => Inline::CodeSpan {
            text: code.literal.clone(),
        },
        NodeValue::Strong => Inline::Strong {
            inlines: convert_inlines(node),
        },
        NodeValue::Emph => Inline::Emphasis {
            inlines: convert_inlines(node),
        },
        NodeValue::Link(link) => Inline::Link {
            href: link.url.clone(),
            inlines: convert_inlines(node),
        },
        NodeValue::Image(link) => {
            let alt = crate::ir::nodes::inlines_plain_text(&convert_inlines(node));
            Inline::Image {
                src: link.url.clone(),
                alt: (!alt.is_empty()).then_some(alt),
            }
        }
        NodeValue::HtmlInline(raw) => return vec![Piece::Raw(raw.clone())],
        // Strikethrough and anything else without an IR counterpart keeps its children
        _ => return collect_pieces(node),
    };

    vec![Piece::Inline(inline)]
}
