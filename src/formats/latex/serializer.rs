//! LaTeX serialization (IR → LaTeX export)
//!
//! One fixed template per node, blocks separated by a blank line. All literal text goes
//! through [`escape`].

use super::escape::escape;
use super::LatexOptions;
use crate::ir::{Block, Inline, IrDocument, ListItem, TableAlignment, TableRow};

const PREAMBLE: &str = "\\documentclass{article}\n\
\\usepackage{hyperref}\n\
\\usepackage{graphicx}\n\
\\usepackage{listings}\n\
\\begin{document}\n\n";

/// Heading level → sectioning command. LaTeX has five levels, 6 folds into 5.
fn heading_command(level: u8) -> &'static str {
    match level {
        0 | 1 => "section",
        2 => "subsection",
        3 => "subsubsection",
        4 => "paragraph",
        _ => "subparagraph",
    }
}

/// Serialize an IR document to LaTeX
pub fn serialize_to_latex(doc: &IrDocument, options: &LatexOptions) -> String {
    let body = blocks_to_latex(&doc.blocks);
    if options.standalone {
        format!("{}{}\n\n\\end{{document}}\n", PREAMBLE, body)
    } else {
        body
    }
}

fn blocks_to_latex(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(block_to_latex)
        .filter(|rendered| !rendered.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn block_to_latex(block: &Block) -> String {
    match block {
        Block::Paragraph { inlines } => inlines_to_latex(inlines),
        Block::Heading { level, inlines } => {
            format!("\\{}{{{}}}", heading_command(*level), inlines_to_latex(inlines))
        }
        Block::List { ordered, items } => {
            let environment = if *ordered { "enumerate" } else { "itemize" };
            let items: Vec<String> = items.iter().map(item_to_latex).collect();
            format!(
                "\\begin{{{env}}}\n{}\n\\end{{{env}}}",
                items.join("\n"),
                env = environment
            )
        }
        Block::Blockquote { blocks } => {
            format!("\\begin{{quote}}\n{}\n\\end{{quote}}", blocks_to_latex(blocks))
        }
        Block::CodeBlock { text, language } => match language {
            Some(language) => format!(
                "\\begin{{lstlisting}}[language={}]\n{}\n\\end{{lstlisting}}",
                language, text
            ),
            None => format!("\\begin{{verbatim}}\n{}\n\\end{{verbatim}}", text),
        },
        Block::HorizontalRule => "\\hrule".to_string(),
        Block::Table {
            header_row,
            rows,
            alignments,
        } => table_to_latex(header_row.as_ref(), rows, alignments.as_deref()),
    }
}

/// `\item first-block`, further blocks separated by blank lines.
fn item_to_latex(item: &ListItem) -> String {
    let rendered: Vec<String> = item.blocks.iter().map(block_to_latex).collect();
    let mut out = match rendered.first() {
        Some(first) if !first.is_empty() => format!("\\item {}", first),
        _ => "\\item".to_string(),
    };
    for block in rendered.iter().skip(1).filter(|block| !block.is_empty()) {
        out.push_str("\n\n");
        out.push_str(block);
    }
    out
}

fn table_to_latex(
    header_row: Option<&TableRow>,
    rows: &[TableRow],
    alignments: Option<&[TableAlignment]>,
) -> String {
    let columns = header_row
        .into_iter()
        .chain(rows.iter())
        .map(|row| row.cells.len())
        .max()
        .unwrap_or(0)
        .max(1);

    let mut spec: String = alignments
        .unwrap_or_default()
        .iter()
        .map(|alignment| match alignment {
            TableAlignment::Left => 'l',
            TableAlignment::Center => 'c',
            TableAlignment::Right => 'r',
        })
        .collect();
    while spec.len() < columns {
        spec.push('l');
    }

    let mut lines = vec![format!("\\begin{{tabular}}{{{}}}", spec)];
    if let Some(header) = header_row {
        lines.push("\\hline".to_string());
        lines.push(row_to_latex(header));
        lines.push("\\hline".to_string());
    }
    lines.extend(rows.iter().map(row_to_latex));
    lines.push("\\end{tabular}".to_string());
    lines.join("\n")
}

fn row_to_latex(row: &TableRow) -> String {
    let cells: Vec<String> = row.cells.iter().map(|cell| cell_to_latex(&cell.blocks)).collect();
    format!("{}\\\\", cells.join(" & "))
}

/// A tabular cell is a single line: paragraphs inline, other blocks as escaped text.
fn cell_to_latex(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|block| match block {
            Block::Paragraph { inlines } | Block::Heading { inlines, .. } => {
                inlines_to_latex(inlines)
            }
            other => escape(&other.plain_text()),
        })
        .filter(|rendered| !rendered.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn inlines_to_latex(inlines: &[Inline]) -> String {
    inlines.iter().map(inline_to_latex).collect()
}

fn inline_to_latex(inline: &Inline) -> String {
    match inline {
        Inline::Text { text } => escape(text),
        Inline::Strong { inlines } => format!("\\textbf{{{}}}", inlines_to_latex(inlines)),
        Inline::Emphasis { inlines } => format!("\\textit{{{}}}", inlines_to_latex(inlines)),
        Inline::Underline { inlines } => format!("\\underline{{{}}}", inlines_to_latex(inlines)),
        Inline::CodeSpan { text } => format!("\\texttt{{{}}}", escape(text)),
        Inline::LineBreak => "\\newline ".to_string(),
        Inline::Link { href, inlines } => {
            format!("\\href{{{}}}{{{}}}", escape(href), inlines_to_latex(inlines))
        }
        Inline::Image { src, alt } => match alt {
            Some(alt) => format!(
                "\\includegraphics[alt={{{}}}]{{{}}}",
                escape(alt),
                escape(src)
            ),
            None => format!("\\includegraphics{{{}}}", escape(src)),
        },
    }
}
