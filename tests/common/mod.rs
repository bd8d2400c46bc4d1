//! Documents shared by the integration tests

#![allow(dead_code)]

use docmorph::ir::{Block, Inline, IrDocument, ListItem, TableAlignment, TableCell, TableRow};

pub fn text(s: &str) -> Inline {
    Inline::text(s)
}

pub fn para(inlines: Vec<Inline>) -> Block {
    Block::paragraph(inlines)
}

pub fn item(blocks: Vec<Block>) -> ListItem {
    ListItem::new(blocks)
}

pub fn row(cells: &[&str]) -> TableRow {
    TableRow::new(
        cells
            .iter()
            .map(|cell| TableCell::from_inlines(vec![text(cell)]))
            .collect(),
    )
}

/// A paragraph using every inline kind the three formats share
pub fn rich_paragraph() -> Block {
    para(vec![
        text("Plain "),
        Inline::Strong {
            inlines: vec![text("bold")],
        },
        text(" and "),
        Inline::Emphasis {
            inlines: vec![text("italic")],
        },
        text(" and "),
        Inline::Underline {
            inlines: vec![text("under")],
        },
        text(" with "),
        Inline::CodeSpan {
            text: "code".to_string(),
        },
        text(" and "),
        Inline::Link {
            href: "https://example.com".to_string(),
            inlines: vec![text("a link")],
        },
        text("."),
    ])
}

/// Every block kind, in normal form
pub fn sample_document(code_language: Option<&str>) -> IrDocument {
    IrDocument::new(vec![
        Block::Heading {
            level: 1,
            inlines: vec![text("Title")],
        },
        rich_paragraph(),
        Block::Heading {
            level: 2,
            inlines: vec![text("Lists")],
        },
        Block::List {
            ordered: false,
            items: vec![
                item(vec![para(vec![text("one")])]),
                item(vec![
                    para(vec![text("two")]),
                    Block::List {
                        ordered: true,
                        items: vec![
                            item(vec![para(vec![text("inner first")])]),
                            item(vec![para(vec![text("inner second")])]),
                        ],
                    },
                ]),
                item(vec![para(vec![text("three")])]),
            ],
        },
        Block::Blockquote {
            blocks: vec![para(vec![text("Quoted words")])],
        },
        Block::CodeBlock {
            text: "fn main() {}\nlet x = 1;".to_string(),
            language: code_language.map(str::to_string),
        },
        Block::HorizontalRule,
        Block::Table {
            header_row: Some(row(&["Name", "Score", "Notes"])),
            rows: vec![row(&["alpha", "1", "first"]), row(&["beta", "2", "second"])],
            alignments: Some(vec![
                TableAlignment::Left,
                TableAlignment::Center,
                TableAlignment::Right,
            ]),
        },
    ])
}
