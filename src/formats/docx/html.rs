//! HTML → IR mapping.
//!
//! Recursive descent over tag names. Block tags (`p`, `h1`-`h6`, `ul`/`ol`/`li`,
//! `blockquote`, `pre`, `hr`, `table`) build blocks; inline tags (`strong`/`b`, `em`/`i`,
//! `u`, `code`, `br`, `a`, `img`, and a `span` styled `text-decoration:underline`) build
//! inlines. Any other tag is transparent: its children are mapped in its place, so unknown
//! markup never loses its text. Inline content found between blocks is gathered into an
//! implicit paragraph.
//!
//! The mapper only sees the DOM through [`ElementView`].

use crate::ir::{
    normalize, Block, Inline, IrDocument, ListItem, TableAlignment, TableCell, TableRow,
};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Read-only view of an HTML node.
pub trait ElementView: Sized {
    /// Lowercase tag name, `None` for anything that is not an element
    fn tag(&self) -> Option<String>;

    fn attribute(&self, name: &str) -> Option<String>;

    fn children(&self) -> Vec<Self>;

    /// Content of a text node
    fn text(&self) -> Option<String>;
}

impl ElementView for Handle {
    fn tag(&self) -> Option<String> {
        match &self.data {
            NodeData::Element { name, .. } => Some(name.local.to_ascii_lowercase().to_string()),
            _ => None,
        }
    }

    fn attribute(&self, attribute: &str) -> Option<String> {
        match &self.data {
            NodeData::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|attr| attr.name.local.as_ref().eq_ignore_ascii_case(attribute))
                .map(|attr| attr.value.to_string()),
            _ => None,
        }
    }

    fn children(&self) -> Vec<Self> {
        self.children.borrow().clone()
    }

    fn text(&self) -> Option<String> {
        match &self.data {
            NodeData::Text { contents } => Some(contents.borrow().to_string()),
            _ => None,
        }
    }
}

/// Parse an HTML string and map its body to a normalized IR document
pub fn html_to_ir(html: &str) -> IrDocument {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let blocks = match find_element(&dom.document, "body") {
        Some(body) => blocks_from(&body.children()),
        None => Vec::new(),
    };
    normalize(&IrDocument::new(blocks))
}

fn find_element<V: ElementView>(node: &V, tag: &str) -> Option<V> {
    for child in node.children() {
        if child.tag().as_deref() == Some(tag) {
            return Some(child);
        }
        if let Some(found) = find_element(&child, tag) {
            return Some(found);
        }
    }
    None
}

const BLOCK_TAGS: [&str; 18] = [
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "blockquote", "pre", "hr",
    "table", "div", "section", "article", "body",
];

fn is_block<V: ElementView>(node: &V) -> bool {
    node.tag()
        .is_some_and(|tag| BLOCK_TAGS.contains(&tag.as_str()))
}

/// Map a sequence of sibling nodes to blocks.
pub fn blocks_from<V: ElementView>(nodes: &[V]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut pending: Vec<Inline> = Vec::new();

    for node in nodes {
        if is_block(node) {
            flush_implicit_paragraph(&mut pending, &mut blocks);
            blocks.extend(block_from(node));
        } else {
            inlines_into(node, &mut pending);
        }
    }
    flush_implicit_paragraph(&mut pending, &mut blocks);
    blocks
}

/// Inline content between blocks becomes a paragraph, unless it is only whitespace.
fn flush_implicit_paragraph(pending: &mut Vec<Inline>, blocks: &mut Vec<Block>) {
    let inlines = std::mem::take(pending);
    let blank = inlines.iter().all(|inline| match inline {
        Inline::Text { text } => text.trim().is_empty(),
        _ => false,
    });
    if !blank {
        blocks.push(Block::Paragraph { inlines });
    }
}

fn block_from<V: ElementView>(node: &V) -> Vec<Block> {
    let tag = node.tag().unwrap_or_default();
    match tag.as_str() {
        "p" => vec![Block::Paragraph {
            inlines: inlines_from(&node.children()),
        }],
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => vec![Block::Heading {
            level: tag[1..].parse().unwrap_or(1),
            inlines: inlines_from(&node.children()),
        }],
        "ul" | "ol" => vec![Block::List {
            ordered: tag == "ol",
            items: list_items(node),
        }],
        "blockquote" => vec![Block::Blockquote {
            blocks: blocks_from(&node.children()),
        }],
        "pre" => vec![code_block(node)],
        "hr" => vec![Block::HorizontalRule],
        "table" => vec![table(node)],
        // li outside a list, div, section ...
        _ => blocks_from(&node.children()),
    }
}

fn list_items<V: ElementView>(list: &V) -> Vec<ListItem> {
    let mut items = Vec::new();
    let mut stray = Vec::new();
    for child in list.children() {
        if child.tag().as_deref() == Some("li") {
            push_stray_item(&mut stray, &mut items);
            items.push(ListItem::new(blocks_from(&child.children())));
        } else {
            stray.push(child);
        }
    }
    push_stray_item(&mut stray, &mut items);
    items
}

/// Content outside any `li` forms an item of its own, unless it is only whitespace.
fn push_stray_item<V: ElementView>(stray: &mut Vec<V>, items: &mut Vec<ListItem>) {
    let blocks = blocks_from(&std::mem::take(stray));
    if !blocks.is_empty() {
        items.push(ListItem::new(blocks));
    }
}

fn code_block<V: ElementView>(pre: &V) -> Block {
    let code = pre
        .children()
        .into_iter()
        .find(|child| child.tag().as_deref() == Some("code"));
    let language = code
        .as_ref()
        .and_then(|code| code.attribute("class"))
        .and_then(|class| {
            class
                .split_whitespace()
                .find_map(|name| name.strip_prefix("language-").map(str::to_string))
        });
    let mut text = text_content(pre);
    if text.ends_with('\n') {
        text.pop();
    }
    Block::CodeBlock { text, language }
}

fn table<V: ElementView>(node: &V) -> Block {
    let mut rows: Vec<(bool, Vec<(TableCell, Option<TableAlignment>)>)> = Vec::new();
    collect_rows(node, &mut rows);

    let alignments: Option<Vec<TableAlignment>> = rows.first().and_then(|(_, cells)| {
        if cells.iter().all(|(_, alignment)| alignment.is_none()) {
            return None;
        }
        Some(
            cells
                .iter()
                .map(|(_, alignment)| alignment.unwrap_or(TableAlignment::Left))
                .collect(),
        )
    });

    let mut rows = rows.into_iter();
    let header_row = match rows.as_slice().first() {
        Some((true, _)) => rows.next().map(|(_, cells)| into_row(cells)),
        _ => None,
    };
    let rows = rows.map(|(_, cells)| into_row(cells)).collect();

    Block::Table {
        header_row,
        rows,
        alignments,
    }
}

fn into_row(cells: Vec<(TableCell, Option<TableAlignment>)>) -> TableRow {
    TableRow::new(cells.into_iter().map(|(cell, _)| cell).collect())
}

/// Rows in document order, through thead/tbody/tfoot. The flag marks an all-`th` row.
#[allow(clippy::type_complexity)]
fn collect_rows<V: ElementView>(
    node: &V,
    rows: &mut Vec<(bool, Vec<(TableCell, Option<TableAlignment>)>)>,
) {
    for child in node.children() {
        match child.tag().as_deref() {
            Some("tr") => {
                let cells: Vec<V> = child
                    .children()
                    .into_iter()
                    .filter(|cell| matches!(cell.tag().as_deref(), Some("td" | "th")))
                    .collect();
                let header =
                    !cells.is_empty() && cells.iter().all(|cell| cell.tag().as_deref() == Some("th"));
                let cells = cells
                    .iter()
                    .map(|cell| {
                        (
                            TableCell::new(blocks_from(&cell.children())),
                            cell_alignment(cell),
                        )
                    })
                    .collect();
                rows.push((header, cells));
            }
            Some("thead" | "tbody" | "tfoot") => collect_rows(&child, rows),
            _ => {}
        }
    }
}

fn cell_alignment<V: ElementView>(cell: &V) -> Option<TableAlignment> {
    if let Some(align) = cell.attribute("align") {
        return TableAlignment::parse(&align);
    }
    style_property(&cell.attribute("style")?, "text-align").and_then(|value| TableAlignment::parse(&value))
}

/// Value of one property in an inline `style` attribute.
fn style_property(style: &str, property: &str) -> Option<String> {
    style.split(';').find_map(|declaration| {
        let (name, value) = declaration.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case(property)
            .then(|| value.trim().to_ascii_lowercase())
    })
}

fn inlines_from<V: ElementView>(nodes: &[V]) -> Vec<Inline> {
    let mut inlines = Vec::new();
    for node in nodes {
        inlines_into(node, &mut inlines);
    }
    inlines
}

fn inlines_into<V: ElementView>(node: &V, out: &mut Vec<Inline>) {
    if let Some(text) = node.text() {
        out.push(Inline::text(text));
        return;
    }
    let Some(tag) = node.tag() else {
        return;
    };
    let children = node.children();
    match tag.as_str() {
        "strong" | "b" => out.push(Inline::Strong {
            inlines: inlines_from(&children),
        }),
        "em" | "i" => out.push(Inline::Emphasis {
            inlines: inlines_from(&children),
        }),
        "u" => out.push(Inline::Underline {
            inlines: inlines_from(&children),
        }),
        "span" if is_underline_span(node) => out.push(Inline::Underline {
            inlines: inlines_from(&children),
        }),
        "code" | "tt" | "kbd" => out.push(Inline::CodeSpan {
            text: text_content(node),
        }),
        "br" => out.push(Inline::LineBreak),
        "a" => out.push(Inline::Link {
            href: node.attribute("href").unwrap_or_default(),
            inlines: inlines_from(&children),
        }),
        "img" => out.push(Inline::Image {
            src: node.attribute("src").unwrap_or_default(),
            alt: node.attribute("alt").filter(|alt| !alt.is_empty()),
        }),
        _ => {
            for child in &children {
                inlines_into(child, out);
            }
        }
    }
}

fn is_underline_span<V: ElementView>(node: &V) -> bool {
    node.attribute("style")
        .and_then(|style| style_property(&style, "text-decoration"))
        .is_some_and(|value| value.contains("underline"))
}

/// Flattened text, `br` as a newline.
fn text_content<V: ElementView>(node: &V) -> String {
    if let Some(text) = node.text() {
        return text;
    }
    if node.tag().as_deref() == Some("br") {
        return "\n".to_string();
    }
    node.children().iter().map(text_content).collect()
}
