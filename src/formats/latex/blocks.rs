//! Block segmentation.
//!
//! A line oriented state machine with a pending paragraph buffer:
//!
//! - a blank line flushes the paragraph;
//! - a sectioning command (`\section` … `\subparagraph`, starred or not) becomes a heading;
//! - `\hrule` / `\hline` becomes a horizontal rule;
//! - `\begin{name}` collects lines up to its matching `\end{name}`, then dispatches on the
//!   environment name. Bodies of quote, list and unknown environments are segmented again
//!   from scratch, verbatim-like bodies are kept raw;
//! - anything else is tokenized and joined to the pending paragraph with a space.
//!
//! An environment that never closes swallows the rest of the input as its body.

use super::inline::{bracketed, braced, split_top_level, tokenize};
use crate::ir::{Block, Inline, ListItem, TableAlignment, TableCell, TableRow};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\\(section|subsection|subsubsection|paragraph|subparagraph)\*?\{(.*)\}$")
        .expect("heading pattern is valid")
});

static BEGIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\\begin\{([^}]+)\}").expect("begin pattern is valid"));

/// Sectioning command → heading level.
const HEADING_LEVELS: [(&str, u8); 5] = [
    ("section", 1),
    ("subsection", 2),
    ("subsubsection", 3),
    ("paragraph", 4),
    ("subparagraph", 5),
];

/// Lines that carry no content of their own.
const PREAMBLE: [&str; 4] = [
    "\\documentclass",
    "\\usepackage",
    "\\maketitle",
    "\\tableofcontents",
];

const VERBATIM_LIKE: [&str; 4] = ["verbatim", "Verbatim", "lstlisting", "minted"];

/// Rule commands inside a tabular body.
const TABLE_RULES: [&str; 5] = ["hline", "toprule", "midrule", "bottomrule", "cline"];

/// Segment a sequence of lines into blocks.
pub fn parse_blocks(lines: &[&str]) -> Vec<Block> {
    let mut segmenter = Segmenter::default();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index].trim();
        index += 1;

        // A comment line does not end the paragraph
        if line.starts_with('%') {
            continue;
        }
        let trimmed = strip_comment(line).trim();
        if trimmed.is_empty() {
            segmenter.flush();
            continue;
        }
        if PREAMBLE.iter().any(|command| starts_with_command(trimmed, command)) {
            segmenter.flush();
            continue;
        }
        if let Some(heading) = heading(trimmed) {
            segmenter.flush();
            segmenter.blocks.push(heading);
            continue;
        }
        if trimmed == "\\hrule" || trimmed == "\\hline" {
            segmenter.flush();
            segmenter.blocks.push(Block::HorizontalRule);
            continue;
        }
        if let Some(captures) = BEGIN.captures(trimmed) {
            segmenter.flush();
            let name = captures.get(1).map_or("", |m| m.as_str());
            let after = captures.get(0).map_or(trimmed.len(), |m| m.end());
            let environment = collect_environment(lines, index, name, &trimmed[after..]);
            index = environment.next;
            segmenter.blocks.extend(environment.into_blocks());
            continue;
        }

        segmenter.push_line(trimmed);
    }

    segmenter.flush();
    segmenter.blocks
}

#[derive(Default)]
struct Segmenter {
    blocks: Vec<Block>,
    paragraph: Vec<Inline>,
}

impl Segmenter {
    fn push_line(&mut self, line: &str) {
        if !self.paragraph.is_empty() && self.paragraph.last() != Some(&Inline::LineBreak) {
            self.paragraph.push(Inline::text(" "));
        }
        self.paragraph.extend(tokenize(line));
    }

    fn flush(&mut self) {
        if !self.paragraph.is_empty() {
            let inlines = std::mem::take(&mut self.paragraph);
            self.blocks.push(Block::Paragraph { inlines });
        }
    }
}

/// Cut an unescaped `%` comment off a line.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'%' => return &line[..pos],
            _ => pos += 1,
        }
    }
    line
}

fn starts_with_command(line: &str, command: &str) -> bool {
    line.strip_prefix(command)
        .map(|rest| !rest.starts_with(|c: char| c.is_ascii_alphabetic()))
        .unwrap_or(false)
}

fn heading(line: &str) -> Option<Block> {
    let captures = HEADING.captures(line)?;
    let command = captures.get(1)?.as_str();
    let level = HEADING_LEVELS
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, level)| *level)?;
    Some(Block::Heading {
        level,
        inlines: tokenize(captures.get(2)?.as_str().trim()),
    })
}

/// A collected environment: its name, what followed `\begin{name}` on the opening line,
/// the body lines and the index of the first line after `\end{name}`.
struct Environment<'a> {
    name: &'a str,
    opening_rest: &'a str,
    body: Vec<&'a str>,
    /// Text after `\end{name}` on the closing line
    trailing: &'a str,
    next: usize,
}

/// Collect the body of `name` starting at line `start`.
///
/// Bodies of verbatim-like environments end at the first closing marker. Others count
/// nested openings of the same name, so `itemize` inside `itemize` closes correctly.
fn collect_environment<'a>(
    lines: &[&'a str],
    start: usize,
    name: &'a str,
    opening_rest: &'a str,
) -> Environment<'a> {
    let open = format!("\\begin{{{}}}", name);
    let close = format!("\\end{{{}}}", name);
    let raw = VERBATIM_LIKE.contains(&name);
    let mut depth = 0usize;

    // Closed on the opening line: \begin{quote}x\end{quote}
    if let Some(at) = matching_close(opening_rest, &open, &close, raw, &mut depth) {
        return Environment {
            name,
            opening_rest: &opening_rest[..at],
            body: Vec::new(),
            trailing: opening_rest[at + close.len()..].trim(),
            next: start,
        };
    }

    for (offset, &line) in lines[start..].iter().enumerate() {
        if let Some(at) = matching_close(line, &open, &close, raw, &mut depth) {
            let mut body = lines[start..start + offset].to_vec();
            let before = &line[..at];
            if !before.trim().is_empty() {
                body.push(before);
            }
            return Environment {
                name,
                opening_rest,
                body,
                trailing: line[at + close.len()..].trim(),
                next: start + offset + 1,
            };
        }
    }

    tracing::warn!(environment = name, "unclosed environment, consuming to end of input");
    Environment {
        name,
        opening_rest,
        body: lines[start..].to_vec(),
        trailing: "",
        next: lines.len(),
    }
}

/// Byte offset of the `close` marker that ends the environment within `text`.
///
/// `depth` counts nested openings of the same name and carries over between lines.
/// Verbatim-like bodies do not nest.
fn matching_close(
    text: &str,
    open: &str,
    close: &str,
    raw: bool,
    depth: &mut usize,
) -> Option<usize> {
    let mut pos = 0;
    loop {
        let next_close = text[pos..].find(close).map(|at| pos + at);
        let next_open = if raw {
            None
        } else {
            text[pos..].find(open).map(|at| pos + at)
        };
        match (next_open, next_close) {
            (Some(opening), closing) if closing.map_or(true, |closing| opening < closing) => {
                *depth += 1;
                pos = opening + open.len();
            }
            (_, Some(closing)) if *depth == 0 => return Some(closing),
            (_, Some(closing)) => {
                *depth -= 1;
                pos = closing + close.len();
            }
            (_, None) => return None,
        }
    }
}

impl<'a> Environment<'a> {
    fn into_blocks(self) -> Vec<Block> {
        let mut blocks = match self.name {
            "quote" | "quotation" => vec![Block::Blockquote {
                blocks: parse_blocks(&self.body_with_opening_rest()),
            }],
            "itemize" | "enumerate" => vec![Block::List {
                ordered: self.name == "enumerate",
                items: split_items(&self.body_with_opening_rest()),
            }],
            "tabular" => vec![self.table()],
            name if VERBATIM_LIKE.contains(&name) => vec![self.code_block()],
            name => {
                tracing::debug!(environment = name, "transparent environment");
                parse_blocks(&self.body_with_opening_rest())
            }
        };
        if !self.trailing.is_empty() {
            blocks.extend(parse_blocks(&[self.trailing]));
        }
        blocks
    }

    fn body_with_opening_rest(&self) -> Vec<&'a str> {
        let rest = self.opening_rest.trim();
        let mut lines = Vec::with_capacity(self.body.len() + 1);
        if !rest.is_empty() {
            lines.push(rest);
        }
        lines.extend(self.body.iter().copied());
        lines
    }

    fn code_block(&self) -> Block {
        let rest = self.opening_rest.trim_start();
        let language = match self.name {
            "lstlisting" => bracketed(rest, 0).and_then(|(options, _)| listing_language(options)),
            "minted" => {
                let after_options = bracketed(rest, 0).map_or(0, |(_, next)| next);
                braced(rest, after_options).map(|(language, _)| language.trim().to_string())
            }
            _ => None,
        };
        // Verbatim text may start right after the opening marker and its arguments
        let inline_start = match self.name {
            "lstlisting" => bracketed(rest, 0).map_or(0, |(_, next)| next),
            "minted" => {
                let after_options = bracketed(rest, 0).map_or(0, |(_, next)| next);
                braced(rest, after_options).map_or(after_options, |(_, next)| next)
            }
            _ => 0,
        };
        let mut lines = Vec::with_capacity(self.body.len() + 1);
        if !rest[inline_start..].trim().is_empty() {
            lines.push(&rest[inline_start..]);
        }
        lines.extend(self.body.iter().copied());
        Block::CodeBlock {
            text: lines.join("\n"),
            language: language.filter(|language| !language.is_empty()),
        }
    }

    fn table(&self) -> Block {
        let rest = self.opening_rest.trim_start();
        // Optional vertical position argument: \begin{tabular}[t]{lcr}
        let spec_start = bracketed(rest, 0).map_or(0, |(_, next)| next);
        let (spec, body_start) = braced(rest, spec_start).unwrap_or(("", spec_start));

        let mut body = String::from(&rest[body_start..]);
        for line in &self.body {
            let line = line.trim();
            if line.starts_with('%') {
                continue;
            }
            body.push(' ');
            body.push_str(strip_comment(line));
        }

        parse_table(spec, &body)
    }
}

fn listing_language(options: &str) -> Option<String> {
    split_top_level(options, ',').into_iter().find_map(|entry| {
        let (key, value) = entry.split_once('=')?;
        let language = value.trim().trim_matches(|c| c == '{' || c == '}');
        (key.trim() == "language").then(|| language.to_string())
    })
}

/// Split a list body on `\item` markers at nesting depth 0.
fn split_items(body: &[&str]) -> Vec<ListItem> {
    let mut items: Vec<Vec<&str>> = Vec::new();
    let mut leading: Vec<&str> = Vec::new();
    let mut depth = 0usize;

    for line in body {
        let trimmed = line.trim();
        if depth == 0 {
            if let Some(rest) = item_marker(trimmed) {
                items.push(vec![rest]);
                depth = apply_environment_delta(depth, trimmed);
                continue;
            }
        }
        depth = apply_environment_delta(depth, trimmed);
        match items.last_mut() {
            Some(item) => item.push(line),
            None => leading.push(line),
        }
    }

    // Content before the first \item forms an item of its own
    if leading.iter().any(|line| !line.trim().is_empty()) {
        items.insert(0, leading);
    }

    items
        .into_iter()
        .map(|lines| ListItem::new(parse_blocks(&lines)))
        .collect()
}

fn apply_environment_delta(depth: usize, line: &str) -> usize {
    let opens = line.matches("\\begin{").count();
    let closes = line.matches("\\end{").count();
    (depth + opens).saturating_sub(closes)
}

/// Text after an `\item` marker, dropping an optional `[label]`.
fn item_marker(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("\\item")?;
    if rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let rest = match bracketed(rest, 0) {
        Some((_, next)) => &rest[next..],
        None => rest,
    };
    Some(rest.trim_start())
}

/// Alignment characters of a column specifier. Braced groups (`p{3cm}`, `@{}`) are skipped.
pub(crate) fn parse_column_spec(spec: &str) -> Vec<TableAlignment> {
    let mut depth = 0usize;
    let mut alignments = Vec::new();
    for c in spec.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            'l' if depth == 0 => alignments.push(TableAlignment::Left),
            'c' if depth == 0 => alignments.push(TableAlignment::Center),
            'r' if depth == 0 => alignments.push(TableAlignment::Right),
            _ => {}
        }
    }
    alignments
}

#[derive(Debug, PartialEq)]
enum TablePiece {
    Rule,
    Row(String),
}

fn parse_table(spec: &str, body: &str) -> Block {
    let alignments = parse_column_spec(spec);
    let pieces = table_pieces(body);

    // A first row enclosed in rules is the header (the printer's shape)
    let first_row = pieces
        .iter()
        .position(|piece| matches!(piece, TablePiece::Row(_)));
    let has_header = match first_row {
        Some(index) => {
            index > 0
                && pieces[index - 1] == TablePiece::Rule
                && pieces.get(index + 1) == Some(&TablePiece::Rule)
        }
        None => false,
    };

    let mut rows = pieces.into_iter().filter_map(|piece| match piece {
        TablePiece::Row(text) => Some(parse_row(&text)),
        TablePiece::Rule => None,
    });
    let header_row = if has_header { rows.next() } else { None };
    let rows: Vec<TableRow> = rows.collect();

    if has_header {
        tracing::debug!(rows = rows.len(), "tabular with header row");
    }

    Block::Table {
        header_row,
        rows,
        alignments: (!alignments.is_empty()).then_some(alignments),
    }
}

/// Flattened tabular body → rule markers and row texts. `\\` ends a row; a rule or the end
/// of the body also ends a non-blank pending row.
fn table_pieces(body: &str) -> Vec<TablePiece> {
    let bytes = body.as_bytes();
    let mut pieces = Vec::new();
    let mut row_start = 0;
    let mut pos = 0;

    let end_row = |pieces: &mut Vec<TablePiece>, text: &str, terminated: bool| {
        if terminated || !text.trim().is_empty() {
            pieces.push(TablePiece::Row(text.to_string()));
        }
    };

    while pos < bytes.len() {
        if bytes[pos] != b'\\' {
            pos += 1;
            continue;
        }
        if bytes.get(pos + 1) == Some(&b'\\') {
            end_row(&mut pieces, &body[row_start..pos], true);
            pos = skip_row_spacing(body, pos + 2);
            row_start = pos;
            continue;
        }
        let name_len = body[pos + 1..]
            .bytes()
            .take_while(u8::is_ascii_alphabetic)
            .count();
        let name = &body[pos + 1..pos + 1 + name_len];
        if TABLE_RULES.contains(&name) {
            end_row(&mut pieces, &body[row_start..pos], false);
            let mut next = pos + 1 + name_len;
            if let Some((_, after)) = braced(body, next) {
                next = after;
            }
            pieces.push(TablePiece::Rule);
            pos = next;
            row_start = pos;
            continue;
        }
        // Any other escape or command: skip the marker and the next character
        pos += 2;
    }
    end_row(&mut pieces, &body[row_start.min(body.len())..], false);

    pieces
}

/// `\\[2pt]` carries an optional spacing argument. Only a bracket right after the marker
/// counts, so a following row may start with `[`.
fn skip_row_spacing(body: &str, pos: usize) -> usize {
    match bracketed(body, pos) {
        Some((_, next)) => next,
        None => pos,
    }
}

fn parse_row(text: &str) -> TableRow {
    TableRow::new(
        split_top_level(text, '&')
            .into_iter()
            .map(|cell| TableCell::from_inlines(tokenize(cell.trim())))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::normalize::normalize_blocks;
    use rstest::rstest;

    fn parse(source: &str) -> Vec<Block> {
        let lines: Vec<&str> = source.lines().collect();
        normalize_blocks(parse_blocks(&lines))
    }

    fn para(text: &str) -> Block {
        Block::paragraph(vec![Inline::text(text)])
    }

    #[rstest]
    #[case("\\section{A}", 1)]
    #[case("\\subsection{A}", 2)]
    #[case("\\subsubsection{A}", 3)]
    #[case("\\paragraph{A}", 4)]
    #[case("\\subparagraph{A}", 5)]
    #[case("\\section*{A}", 1)]
    fn test_heading_levels(#[case] source: &str, #[case] level: u8) {
        assert_eq!(
            parse(source),
            vec![Block::Heading {
                level,
                inlines: vec![Inline::text("A")]
            }]
        );
    }

    #[test]
    fn test_paragraph_lines_join_with_space() {
        assert_eq!(parse("one\ntwo\n\nthree"), vec![para("one two"), para("three")]);
    }

    #[test]
    fn test_comments_and_preamble_are_skipped() {
        let source = "\\documentclass{article}\n\\usepackage{hyperref}\n\\begin{document}\n% note\nbody\n\\end{document}";
        assert_eq!(parse(source), vec![para("body")]);
    }

    #[test]
    fn test_trailing_comment_is_stripped() {
        assert_eq!(parse("keep % drop\n50\\% kept"), vec![para("keep 50% kept")]);
    }

    #[test]
    fn test_rules() {
        assert_eq!(
            parse("\\hrule\n\\hline"),
            vec![Block::HorizontalRule, Block::HorizontalRule]
        );
    }

    #[test]
    fn test_quote_is_segmented_recursively() {
        assert_eq!(
            parse("\\begin{quote}\n\\section{In}\ntext\n\\end{quote}"),
            vec![Block::Blockquote {
                blocks: vec![
                    Block::Heading {
                        level: 1,
                        inlines: vec![Inline::text("In")]
                    },
                    para("text")
                ]
            }]
        );
    }

    #[test]
    fn test_nested_itemize() {
        let source = "\\begin{itemize}\n\\item outer\n\\begin{itemize}\n\\item inner\n\\end{itemize}\n\\item second\n\\end{itemize}";
        assert_eq!(
            parse(source),
            vec![Block::List {
                ordered: false,
                items: vec![
                    ListItem::new(vec![
                        para("outer"),
                        Block::List {
                            ordered: false,
                            items: vec![ListItem::new(vec![para("inner")])]
                        }
                    ]),
                    ListItem::new(vec![para("second")]),
                ]
            }]
        );
    }

    #[test]
    fn test_enumerate_with_empty_item() {
        assert_eq!(
            parse("\\begin{enumerate}\n\\item\n\\item b\n\\end{enumerate}"),
            vec![Block::List {
                ordered: true,
                items: vec![
                    ListItem::new(vec![Block::empty_paragraph()]),
                    ListItem::new(vec![para("b")]),
                ]
            }]
        );
    }

    #[test]
    fn test_item_label_is_dropped() {
        assert_eq!(
            parse("\\begin{itemize}\n\\item[--] dash\n\\end{itemize}"),
            vec![Block::List {
                ordered: false,
                items: vec![ListItem::new(vec![para("dash")])]
            }]
        );
    }

    #[test]
    fn test_verbatim_is_raw() {
        assert_eq!(
            parse("\\begin{verbatim}\n  \\textbf{x}\n\n%y\n\\end{verbatim}"),
            vec![Block::CodeBlock {
                text: "  \\textbf{x}\n\n%y".into(),
                language: None
            }]
        );
    }

    #[test]
    fn test_listing_languages() {
        assert_eq!(
            parse("\\begin{lstlisting}[language=Rust]\nfn f() {}\n\\end{lstlisting}"),
            vec![Block::CodeBlock {
                text: "fn f() {}".into(),
                language: Some("Rust".into())
            }]
        );
        assert_eq!(
            parse("\\begin{minted}{python}\npass\n\\end{minted}"),
            vec![Block::CodeBlock {
                text: "pass".into(),
                language: Some("python".into())
            }]
        );
    }

    #[test]
    fn test_unclosed_environment_consumes_rest() {
        assert_eq!(
            parse("\\begin{quote}\na\n\nb"),
            vec![Block::Blockquote {
                blocks: vec![para("a"), para("b")]
            }]
        );
    }

    #[test]
    fn test_environment_closed_on_opening_line() {
        assert_eq!(
            parse("\\begin{quote}Quoted\\end{quote}\n\nAfter the quote."),
            vec![
                Block::Blockquote {
                    blocks: vec![para("Quoted")]
                },
                para("After the quote.")
            ]
        );
    }

    #[test]
    fn test_environment_closed_at_end_of_content_line() {
        assert_eq!(
            parse("\\begin{quote}\nQuoted text.\\end{quote}\n\nAfter."),
            vec![
                Block::Blockquote {
                    blocks: vec![para("Quoted text.")]
                },
                para("After.")
            ]
        );
    }

    #[test]
    fn test_inline_close_respects_nesting() {
        assert_eq!(
            parse("\\begin{quote}\n\\begin{quote}b\\end{quote}\nc\\end{quote} tail"),
            vec![
                Block::Blockquote {
                    blocks: vec![
                        Block::Blockquote {
                            blocks: vec![para("b")]
                        },
                        para("c")
                    ]
                },
                para("tail")
            ]
        );
    }

    #[test]
    fn test_one_line_verbatim_keeps_its_text() {
        assert_eq!(
            parse("\\begin{verbatim}x = 1\\end{verbatim}"),
            vec![Block::CodeBlock {
                text: "x = 1".into(),
                language: None
            }]
        );
    }

    #[test]
    fn test_unknown_environment_is_transparent() {
        assert_eq!(
            parse("\\begin{center}\nmiddle\n\\end{center}"),
            vec![para("middle")]
        );
    }

    #[test]
    fn test_tabular_alignments_and_cells() {
        let source = "\\begin{tabular}{|l|c|r|}\na & b & c\\\\\n1 & 2 & 3\\\\\n\\end{tabular}";
        match &parse(source)[0] {
            Block::Table {
                header_row,
                rows,
                alignments,
            } => {
                assert!(header_row.is_none());
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[1].cells[2].blocks, vec![para("3")]);
                assert_eq!(
                    alignments.as_deref(),
                    Some(
                        &[
                            TableAlignment::Left,
                            TableAlignment::Center,
                            TableAlignment::Right
                        ][..]
                    )
                );
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_tabular_header_between_rules() {
        let source = "\\begin{tabular}{ll}\n\\hline\nName & Qty\\\\\n\\hline\napple & 3\\\\\n\\hline\n\\end{tabular}";
        match &parse(source)[0] {
            Block::Table {
                header_row, rows, ..
            } => {
                let header = header_row.as_ref().expect("header row");
                assert_eq!(header.cells[0].blocks, vec![para("Name")]);
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].cells[0].blocks, vec![para("apple")]);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_tabular_escaped_ampersand_stays_in_cell() {
        match &parse("\\begin{tabular}{ll}\nA \\& B & C\\\\\n\\end{tabular}")[0] {
            Block::Table { rows, .. } => {
                assert_eq!(rows[0].cells.len(), 2);
                assert_eq!(rows[0].cells[0].blocks, vec![para("A & B")]);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_row_starting_with_bracket_is_not_spacing() {
        match &parse("\\begin{tabular}{l}\na\\\\\n[x] done\\\\\nb\\\\[2pt]\nc\\\\\n\\end{tabular}")[0] {
            Block::Table { rows, .. } => {
                let cells: Vec<String> = rows
                    .iter()
                    .map(|row| row.cells[0].blocks.iter().map(Block::plain_text).collect())
                    .collect();
                assert_eq!(cells, vec!["a", "[x] done", "b", "c"]);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_column_spec_skips_braced_groups() {
        assert_eq!(
            parse_column_spec("p{3cm}@{}c"),
            vec![TableAlignment::Center]
        );
    }
}
