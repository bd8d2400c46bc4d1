//! IR → DOCX writer
//!
//! One fixed construct per node, built with docx-rs:
//!
//! - paragraphs and headings are paragraphs, headings styled `HeadingN`;
//! - a list item is a numbered paragraph at its nesting depth, further paragraphs of the
//!   item are `ListParagraph` paragraphs, nested lists recurse one level deeper;
//! - blockquote paragraphs are styled `Blockquote`;
//! - a code block is one `CodeBlock` paragraph per line, in the monospace font;
//! - tables carry per-column paragraph alignment, header cells are styled `TableHeader`;
//! - links are hyperlink runs, colored and underlined. Images have no file to embed and
//!   become a bracketed text placeholder.

use super::numbering::ListNumbering;
use super::styles::{self, heading_style, monospace_fonts};
use super::DocxOptions;
use crate::error::FormatError;
use crate::ir::{self, Block, Inline, IrDocument, ListItem, TableAlignment};
use docx_rs::{
    AlignmentType, BreakType, Docx, Hyperlink, HyperlinkType, IndentLevel, NumberingId,
    Paragraph, Run, Table, TableCell, TableRow,
};
use std::io::Cursor;

/// Deepest list level a numbering definition describes
const MAX_LEVEL: usize = 8;

/// Write an IR document as a packed DOCX file
pub fn write_docx(doc: &IrDocument, options: &DocxOptions) -> Result<Vec<u8>, FormatError> {
    DocxWriter::new(options).generate(doc)
}

#[derive(Debug, Clone, Copy, Default)]
struct RunFormat {
    bold: bool,
    italic: bool,
    underline: bool,
    code: bool,
    link: bool,
}

struct DocxWriter<'a> {
    options: &'a DocxOptions,
    numbering: ListNumbering,
    list_level: usize,
}

impl<'a> DocxWriter<'a> {
    fn new(options: &'a DocxOptions) -> Self {
        DocxWriter {
            options,
            numbering: ListNumbering::new(),
            list_level: 0,
        }
    }

    fn generate(&mut self, doc: &IrDocument) -> Result<Vec<u8>, FormatError> {
        let mut docx = styles::add_styles(Docx::new(), self.options);
        for block in &doc.blocks {
            docx = self.block(docx, block);
        }

        let mut buffer = Vec::new();
        docx.build()
            .pack(&mut Cursor::new(&mut buffer))
            .map_err(|e| FormatError::Container(format!("failed to pack DOCX: {}", e)))?;
        Ok(buffer)
    }

    fn block(&mut self, docx: Docx, block: &Block) -> Docx {
        match block {
            Block::Paragraph { inlines } => docx.add_paragraph(self.paragraph(Paragraph::new(), inlines)),

            Block::Heading { level, inlines } => docx.add_paragraph(
                self.paragraph(Paragraph::new().style(heading_style(*level)), inlines),
            ),

            Block::List { ordered, items } => self.list(docx, *ordered, items),

            Block::Blockquote { blocks } => blocks.iter().fold(docx, |docx, child| match child {
                Block::Paragraph { inlines } => docx.add_paragraph(
                    self.paragraph(Paragraph::new().style(styles::BLOCKQUOTE), inlines),
                ),
                other => self.block(docx, other),
            }),

            Block::CodeBlock { text, .. } => text.split('\n').fold(docx, |docx, line| {
                docx.add_paragraph(
                    Paragraph::new().style(styles::CODE_BLOCK).add_run(
                        Run::new()
                            .fonts(monospace_fonts(&self.options.code_font))
                            .add_text(line),
                    ),
                )
            }),

            Block::HorizontalRule => docx.add_paragraph(
                Paragraph::new()
                    .style(styles::HORIZONTAL_LINE)
                    .add_run(Run::new().add_text("")),
            ),

            Block::Table {
                header_row,
                rows,
                alignments,
            } => docx.add_table(self.table(header_row.as_ref(), rows, alignments.as_deref())),
        }
    }

    fn list(&mut self, docx: Docx, ordered: bool, items: &[ListItem]) -> Docx {
        let (mut docx, num_id) = self.numbering.create(docx, ordered);
        let level = self.list_level.min(MAX_LEVEL);

        self.list_level += 1;
        for item in items {
            docx = self.list_item(docx, &item.blocks, num_id, level);
        }
        self.list_level -= 1;

        docx
    }

    fn list_item(&mut self, mut docx: Docx, blocks: &[Block], num_id: usize, level: usize) -> Docx {
        let numbered = Paragraph::new().numbering(NumberingId::new(num_id), IndentLevel::new(level));

        // The numbered paragraph carries the first paragraph of the item, or nothing
        let rest = match blocks.split_first() {
            Some((Block::Paragraph { inlines }, rest)) => {
                docx = docx.add_paragraph(self.paragraph(numbered, inlines));
                rest
            }
            _ => {
                docx = docx.add_paragraph(numbered);
                blocks
            }
        };

        for block in rest {
            docx = match block {
                Block::Paragraph { inlines } => docx.add_paragraph(
                    self.paragraph(Paragraph::new().style(styles::LIST_PARAGRAPH), inlines),
                ),
                other => self.block(docx, other),
            };
        }
        docx
    }

    fn table(
        &self,
        header_row: Option<&ir::TableRow>,
        rows: &[ir::TableRow],
        alignments: Option<&[TableAlignment]>,
    ) -> Table {
        let columns = header_row
            .into_iter()
            .chain(rows.iter())
            .map(|row| row.cells.len())
            .max()
            .unwrap_or(0);

        let mut table_rows = Vec::with_capacity(rows.len() + 1);
        if let Some(header) = header_row {
            table_rows.push(self.table_row(header, columns, alignments, true));
        }
        for row in rows {
            table_rows.push(self.table_row(row, columns, alignments, false));
        }
        Table::new(table_rows)
    }

    fn table_row(
        &self,
        row: &ir::TableRow,
        columns: usize,
        alignments: Option<&[TableAlignment]>,
        header: bool,
    ) -> TableRow {
        let cells = (0..columns)
            .map(|column| {
                let alignment = alignments.and_then(|a| a.get(column)).map(|a| match a {
                    TableAlignment::Left => AlignmentType::Left,
                    TableAlignment::Center => AlignmentType::Center,
                    TableAlignment::Right => AlignmentType::Right,
                });
                let base = || {
                    let mut paragraph = Paragraph::new();
                    if header {
                        paragraph = paragraph.style(styles::TABLE_HEADER);
                    }
                    if let Some(alignment) = alignment {
                        paragraph = paragraph.align(alignment);
                    }
                    paragraph
                };

                let blocks = row.cells.get(column).map(|cell| cell.blocks.as_slice());
                let paragraphs: Vec<Paragraph> = match blocks {
                    Some(blocks) if !blocks.is_empty() => blocks
                        .iter()
                        .map(|block| match block {
                            Block::Paragraph { inlines } | Block::Heading { inlines, .. } => {
                                self.paragraph(base(), inlines)
                            }
                            other => base().add_run(Run::new().add_text(other.plain_text())),
                        })
                        .collect(),
                    // Every cell needs a paragraph
                    _ => vec![base()],
                };

                paragraphs
                    .into_iter()
                    .fold(TableCell::new(), |cell, paragraph| cell.add_paragraph(paragraph))
            })
            .collect();
        TableRow::new(cells)
    }

    fn paragraph(&self, paragraph: Paragraph, inlines: &[Inline]) -> Paragraph {
        inlines.iter().fold(paragraph, |paragraph, inline| {
            self.inline(paragraph, inline, RunFormat::default())
        })
    }

    fn inline(&self, paragraph: Paragraph, inline: &Inline, format: RunFormat) -> Paragraph {
        match inline {
            Inline::Strong { inlines } => self.nested(paragraph, inlines, RunFormat { bold: true, ..format }),
            Inline::Emphasis { inlines } => {
                self.nested(paragraph, inlines, RunFormat { italic: true, ..format })
            }
            Inline::Underline { inlines } => {
                self.nested(paragraph, inlines, RunFormat { underline: true, ..format })
            }
            Inline::Link { href, inlines } => {
                let mut runs = Vec::new();
                self.runs(inlines, RunFormat { link: true, ..format }, &mut runs);
                let hyperlink = runs
                    .into_iter()
                    .fold(Hyperlink::new(href, HyperlinkType::External), |link, run| {
                        link.add_run(run)
                    });
                paragraph.add_hyperlink(hyperlink)
            }
            leaf => paragraph.add_run(self.leaf(leaf, format)),
        }
    }

    fn nested(&self, paragraph: Paragraph, inlines: &[Inline], format: RunFormat) -> Paragraph {
        inlines
            .iter()
            .fold(paragraph, |paragraph, inline| self.inline(paragraph, inline, format))
    }

    /// Runs of hyperlink content. A link inside a link has no construct of its own.
    fn runs(&self, inlines: &[Inline], format: RunFormat, out: &mut Vec<Run>) {
        for inline in inlines {
            match inline {
                Inline::Strong { inlines } => self.runs(inlines, RunFormat { bold: true, ..format }, out),
                Inline::Emphasis { inlines } => {
                    self.runs(inlines, RunFormat { italic: true, ..format }, out)
                }
                Inline::Underline { inlines } => {
                    self.runs(inlines, RunFormat { underline: true, ..format }, out)
                }
                Inline::Link { inlines, .. } => self.runs(inlines, format, out),
                leaf => out.push(self.leaf(leaf, format)),
            }
        }
    }

    fn leaf(&self, inline: &Inline, format: RunFormat) -> Run {
        match inline {
            // Soft line breaks read as spaces
            Inline::Text { text } => self.run(format).add_text(text.replace('\n', " ")),
            Inline::CodeSpan { text } => self.run(RunFormat { code: true, ..format }).add_text(text),
            Inline::LineBreak => self.run(format).add_break(BreakType::TextWrapping),
            Inline::Image { src, alt } => self.run(format).add_text(format!(
                "[{}]({})",
                alt.as_deref().unwrap_or("image"),
                src
            )),
            container => self.run(format).add_text(container.plain_text()),
        }
    }

    fn run(&self, format: RunFormat) -> Run {
        let mut run = Run::new();
        if format.bold {
            run = run.bold();
        }
        if format.italic {
            run = run.italic();
        }
        if format.underline {
            run = run.underline("single");
        }
        if format.code {
            run = run
                .style(styles::CODE_INLINE)
                .fonts(monospace_fonts(&self.options.code_font));
        }
        if format.link {
            run = run
                .style(styles::HYPERLINK)
                .color(&self.options.link_color)
                .underline("single");
        }
        run
    }
}
