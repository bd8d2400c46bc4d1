//! Style sheet of written documents.
//!
//! Style ids double as the reader's vocabulary: a package written here is classified back
//! by the same names (`Heading1`, `CodeBlock`, `Blockquote`, `HorizontalLine`,
//! `TableHeader`, `ListParagraph`, `CodeInline`, `Hyperlink`).

use super::DocxOptions;
use docx_rs::*;

pub const CODE_BLOCK: &str = "CodeBlock";
pub const BLOCKQUOTE: &str = "Blockquote";
pub const HORIZONTAL_LINE: &str = "HorizontalLine";
pub const TABLE_HEADER: &str = "TableHeader";
pub const LIST_PARAGRAPH: &str = "ListParagraph";
pub const CODE_INLINE: &str = "CodeInline";
pub const HYPERLINK: &str = "Hyperlink";

/// Paragraph style id of a heading level (levels beyond 6 are clamped)
pub fn heading_style(level: u8) -> &'static str {
    match level {
        0 | 1 => "Heading1",
        2 => "Heading2",
        3 => "Heading3",
        4 => "Heading4",
        5 => "Heading5",
        _ => "Heading6",
    }
}

pub fn monospace_fonts(font: &str) -> RunFonts {
    RunFonts::new()
        .ascii(font)
        .hi_ansi(font)
        .east_asia(font)
        .cs(font)
}

fn heading(id: &str, display_name: &str, size: usize) -> Style {
    Style::new(id, StyleType::Paragraph)
        .name(display_name)
        .size(size)
        .bold()
}

/// Register every style the writer refers to.
pub fn add_styles(docx: Docx, options: &DocxOptions) -> Docx {
    let code_fonts = monospace_fonts(&options.code_font);

    docx.add_style(heading("Heading1", "Heading 1", 32))
        .add_style(heading("Heading2", "Heading 2", 28))
        .add_style(heading("Heading3", "Heading 3", 26))
        .add_style(heading("Heading4", "Heading 4", 24))
        .add_style(heading("Heading5", "Heading 5", 22))
        .add_style(heading("Heading6", "Heading 6", 20))
        .add_style(
            Style::new(CODE_BLOCK, StyleType::Paragraph)
                .name("Code Block")
                .fonts(code_fonts.clone())
                .size(18),
        )
        .add_style(
            Style::new(BLOCKQUOTE, StyleType::Paragraph)
                .name("Block Quote")
                .indent(Some(720), None, None, None)
                .italic(),
        )
        .add_style(Style::new(HORIZONTAL_LINE, StyleType::Paragraph).name("Horizontal Line"))
        .add_style(
            Style::new(TABLE_HEADER, StyleType::Paragraph)
                .name("Table Header")
                .bold(),
        )
        .add_style(
            Style::new(LIST_PARAGRAPH, StyleType::Paragraph)
                .name("List Paragraph")
                .indent(Some(720), None, None, None),
        )
        .add_style(
            Style::new(CODE_INLINE, StyleType::Character)
                .name("Code Inline")
                .fonts(code_fonts)
                .size(18),
        )
        .add_style(
            Style::new(HYPERLINK, StyleType::Character)
                .name("Hyperlink")
                .color(&options.link_color)
                .underline("single"),
        )
}
