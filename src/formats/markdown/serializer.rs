//! Markdown serialization (IR → Markdown export)
//!
//! Pipeline: IR → Comrak AST → Markdown string (using comrak's serializer)

use super::underline::{CLOSE_TAG, OPEN_TAG};
use super::{default_comrak_options, MarkdownOptions};
use crate::error::FormatError;
use crate::ir::{Block, Inline, IrDocument, ListItem, TableAlignment, TableRow};
use comrak::nodes::{
    Ast, AstNode, ListDelimType, ListType, NodeCode, NodeCodeBlock, NodeHeading, NodeLink,
    NodeList, NodeTable, NodeValue, TableAlignment as ComrakAlignment,
};
use comrak::{format_commonmark, Arena};
use std::cell::RefCell;

/// Serialize an IR document to Markdown
pub fn serialize_to_markdown(
    doc: &IrDocument,
    options: &MarkdownOptions,
) -> Result<String, FormatError> {
    let arena = Arena::new();
    let root = new_node(&arena, NodeValue::Document);
    for block in &doc.blocks {
        append_block(&arena, root, block);
    }

    let mut comrak_options = default_comrak_options();
    comrak_options.render.width = options.wrap_width;

    let mut output = Vec::new();
    format_commonmark(root, &comrak_options, &mut output).map_err(|e| {
        FormatError::SerializationError(format!("Comrak serialization failed: {}", e))
    })?;

    String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {}", e)))
}

fn new_node<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
}

fn append_block<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, block: &Block) {
    match block {
        Block::Paragraph { inlines } => {
            // An empty paragraph has no Markdown spelling
            if inlines.is_empty() {
                return;
            }
            let node = new_node(arena, NodeValue::Paragraph);
            parent.append(node);
            append_inlines(arena, node, inlines);
        }

        Block::Heading { level, inlines } => {
            let node = new_node(
                arena,
                NodeValue::Heading(NodeHeading {
                    level: (*level).clamp(1, 6),
                    setext: false,
                }),
            );
            parent.append(node);
            append_inlines(arena, node, inlines);
        }

        Block::List { ordered, items } => append_list(arena, parent, *ordered, items),

        Block::Blockquote { blocks } => {
            let node = new_node(arena, NodeValue::BlockQuote);
            parent.append(node);
            for child in blocks {
                append_block(arena, node, child);
            }
        }

        Block::CodeBlock { text, language } => {
            let literal = if text.is_empty() {
                String::new()
            } else {
                format!("{}\n", text)
            };
            parent.append(new_node(
                arena,
                NodeValue::CodeBlock(NodeCodeBlock {
                    fenced: true,
                    fence_char: b'`',
                    fence_length: 3,
                    fence_offset: 0,
                    info: language.clone().unwrap_or_default(),
                    literal,
                }),
            ));
        }

        Block::HorizontalRule => parent.append(new_node(arena, NodeValue::ThematicBreak)),

        Block::Table {
            header_row,
            rows,
            alignments,
        } => append_table(arena, parent, header_row.as_ref(), rows, alignments.as_deref()),
    }
}

fn list_value(ordered: bool, tight: bool) -> NodeList {
    NodeList {
        list_type: if ordered {
            ListType::Ordered
        } else {
            ListType::Bullet
        },
        marker_offset: 0,
        padding: 0,
        start: 1,
        delimiter: ListDelimType::Period,
        bullet_char: b'-',
        tight,
    }
}

fn append_list<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    ordered: bool,
    items: &[ListItem],
) {
    // Items with several blocks need blank lines between them to survive a re-parse
    let tight = items.iter().all(|item| item.blocks.len() <= 1);
    let list = new_node(arena, NodeValue::List(list_value(ordered, tight)));
    parent.append(list);

    for item in items {
        let node = new_node(arena, NodeValue::Item(list_value(ordered, tight)));
        list.append(node);
        for block in &item.blocks {
            append_block(arena, node, block);
        }
    }
}

fn append_table<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    header_row: Option<&TableRow>,
    rows: &[TableRow],
    alignments: Option<&[TableAlignment]>,
) {
    // The first emitted row is always the Markdown header
    let all_rows: Vec<&TableRow> = header_row.into_iter().chain(rows.iter()).collect();
    if all_rows.is_empty() {
        return;
    }

    let num_columns = all_rows
        .iter()
        .map(|row| row.cells.len())
        .chain(alignments.map(<[_]>::len))
        .max()
        .unwrap_or(0)
        .max(1);

    let comrak_alignments = (0..num_columns)
        .map(|index| match alignments.and_then(|a| a.get(index)) {
            Some(TableAlignment::Left) => ComrakAlignment::Left,
            Some(TableAlignment::Center) => ComrakAlignment::Center,
            Some(TableAlignment::Right) => ComrakAlignment::Right,
            None => ComrakAlignment::None,
        })
        .collect();

    let table = new_node(
        arena,
        NodeValue::Table(NodeTable {
            alignments: comrak_alignments,
            num_columns,
            num_rows: all_rows.len(),
            num_nonempty_cells: all_rows.iter().map(|row| row.cells.len()).sum(),
        }),
    );
    parent.append(table);

    for (index, row) in all_rows.iter().enumerate() {
        let row_node = new_node(arena, NodeValue::TableRow(index == 0));
        table.append(row_node);
        for column in 0..num_columns {
            let cell_node = new_node(arena, NodeValue::TableCell);
            row_node.append(cell_node);
            if let Some(cell) = row.cells.get(column) {
                append_inlines(arena, cell_node, &cell_inlines(&cell.blocks));
            }
        }
    }
}

/// A Markdown cell only holds inlines: paragraphs are joined with a space, other blocks
/// contribute their text.
fn cell_inlines(blocks: &[Block]) -> Vec<Inline> {
    let mut inlines = Vec::new();
    for (index, block) in blocks.iter().enumerate() {
        if index > 0 {
            inlines.push(Inline::text(" "));
        }
        match block {
            Block::Paragraph { inlines: content } | Block::Heading { inlines: content, .. } => {
                inlines.extend(content.iter().cloned())
            }
            other => inlines.push(Inline::text(other.plain_text().replace('\n', " "))),
        }
    }
    inlines
}

fn append_inlines<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, inlines: &[Inline]) {
    for inline in inlines {
        append_inline(arena, parent, inline);
    }
}

fn append_inline<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, inline: &Inline) {
    match inline {
        Inline::Text { text } => {
            for (index, line) in text.split('\n').enumerate() {
                if index > 0 {
                    parent.append(new_node(arena, NodeValue::SoftBreak));
                }
                if !line.is_empty() {
                    parent.append(new_node(arena, NodeValue::Text(line.to_string())));
                }
            }
        }

        Inline::Strong { inlines } => append_container(arena, parent, NodeValue::Strong, inlines),

        Inline::Emphasis { inlines } => append_container(arena, parent, NodeValue::Emph, inlines),

        Inline::Underline { inlines } => {
            parent.append(new_node(arena, NodeValue::HtmlInline(OPEN_TAG.to_string())));
            append_inlines(arena, parent, inlines);
            parent.append(new_node(arena, NodeValue::HtmlInline(CLOSE_TAG.to_string())));
        }

        Inline::CodeSpan { text } => parent.append(new_node(
            arena,
            NodeValue::Code(NodeCode {
                num_backticks: 1,
                literal: text.clone(),
            }),
        )),

        Inline::LineBreak => parent.append(new_node(arena, NodeValue::LineBreak)),

        Inline::Link { href, inlines } => append_container(
            arena,
            parent,
            NodeValue::Link(NodeLink {
                url: href.clone(),
                title: String::new(),
            }),
            inlines,
        ),

        Inline::Image { src, alt } => {
            let node = new_node(
                arena,
                NodeValue::Image(NodeLink {
                    url: src.clone(),
                    title: String::new(),
                }),
            );
            parent.append(node);
            if let Some(alt) = alt.as_deref().filter(|alt| !alt.is_empty()) {
                node.append(new_node(arena, NodeValue::Text(alt.to_string())));
            }
        }
    }
}

fn append_container<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    value: NodeValue,
    inlines: &[Inline],
) {
    let node = new_node(arena, value);
    parent.append(node);
    append_inlines(arena, node, inlines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TableCell;

    fn render(blocks: Vec<Block>) -> String {
        serialize_to_markdown(&IrDocument::new(blocks), &MarkdownOptions::default()).unwrap()
    }

    #[test]
    fn test_heading_and_strong() {
        let output = render(vec![
            Block::Heading {
                level: 2,
                inlines: vec![Inline::text("Title")],
            },
            Block::paragraph(vec![
                Inline::text("A "),
                Inline::Strong {
                    inlines: vec![Inline::text("bold")],
                },
                Inline::text(" word."),
            ]),
        ]);
        assert!(output.contains("## Title"));
        assert!(output.contains("A **bold** word."));
    }

    #[test]
    fn test_underline_is_raw_html() {
        let output = render(vec![Block::paragraph(vec![Inline::Underline {
            inlines: vec![Inline::text("key")],
        }])]);
        assert_eq!(output.trim(), "<u>key</u>");
    }

    #[test]
    fn test_code_block_is_fenced() {
        let output = render(vec![Block::CodeBlock {
            text: "let x = 1;".into(),
            language: Some("rust".into()),
        }]);
        assert_eq!(output, "``` rust\nlet x = 1;\n```\n");
    }

    #[test]
    fn test_table_alignment_row() {
        let output = render(vec![Block::Table {
            header_row: Some(TableRow::new(vec![
                TableCell::from_inlines(vec![Inline::text("a")]),
                TableCell::from_inlines(vec![Inline::text("b")]),
            ])),
            rows: vec![TableRow::new(vec![
                TableCell::from_inlines(vec![Inline::text("1")]),
                TableCell::from_inlines(vec![Inline::text("2")]),
            ])],
            alignments: Some(vec![TableAlignment::Left, TableAlignment::Right]),
        }]);
        assert!(output.contains("| a | b |"));
        assert!(output.contains(":--"));
        assert!(output.contains("--:"));
        assert!(output.contains("| 1 | 2 |"));
    }

    #[test]
    fn test_newline_text_becomes_soft_break() {
        let output = render(vec![Block::paragraph(vec![Inline::text("one\ntwo")])]);
        assert_eq!(output.trim(), "one\ntwo");
    }
}
