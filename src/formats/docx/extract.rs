//! DOCX container → HTML extraction.
//!
//! The package is unzipped and three parts are read: `word/document.xml` (content),
//! `word/_rels/document.xml.rels` (hyperlink and image targets) and `word/numbering.xml`
//! (whether a numbered paragraph is bulleted or ordered). The body is rendered to a small
//! HTML vocabulary that the HTML mapper turns into IR:
//!
//!     | WordprocessingML                        | HTML                         |
//!     | paragraph styled HeadingN               | <hN>                         |
//!     | consecutive CodeBlock/SourceCode        | <pre><code>                  |
//!     | consecutive Quote/Blockquote            | <blockquote><p>              |
//!     | paragraph styled HorizontalLine         | <hr>                         |
//!     | paragraph with numPr                    | nested <ul>/<ol><li><p>      |
//!     | run b / i / u / code style or font      | <strong> <em> <u> <code>     |
//!     | w:br, w:hyperlink, w:drawing            | <br> <a href> <img>          |
//!     | w:tbl, tblHeader or TableHeader style   | <table><tr><th>/<td>         |
//!
//! Whatever is not recognized contributes its text only.

use super::xml::{self, XmlElement, XmlNode};
use crate::error::FormatError;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";
const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";
const NUMBERING_PART: &str = "word/numbering.xml";

/// Extraction backend for binary containers.
///
/// `to_html` yields the structural rendering, `raw_text` the plain text used when the
/// structural rendering carries no content.
pub trait ContainerReader: Send + Sync {
    fn to_html(&self, bytes: &[u8]) -> Result<String, FormatError>;

    fn raw_text(&self, bytes: &[u8]) -> Result<String, FormatError>;
}

/// Reader for Office Open XML word-processing packages
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxReader;

impl ContainerReader for DocxReader {
    fn to_html(&self, bytes: &[u8]) -> Result<String, FormatError> {
        let package = Package::open(bytes)?;
        let mut renderer = HtmlRenderer::new(&package);
        if let Some(body) = package.document.child("body") {
            renderer.body(body);
        }
        Ok(renderer.finish())
    }

    fn raw_text(&self, bytes: &[u8]) -> Result<String, FormatError> {
        let package = Package::open(bytes)?;
        let lines: Vec<String> = package
            .document
            .descendants("p")
            .into_iter()
            .map(|paragraph| {
                paragraph
                    .descendants("t")
                    .into_iter()
                    .map(element_text)
                    .collect::<String>()
            })
            .collect();
        Ok(lines.join("\n"))
    }
}

struct Package {
    document: XmlElement,
    relationships: HashMap<String, String>,
    /// numId → ilvl → ordered
    numbering: HashMap<String, HashMap<String, bool>>,
}

impl Package {
    fn open(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| FormatError::Container(format!("not a DOCX package: {}", e)))?;

        let document = read_part(&mut archive, DOCUMENT_PART)?.ok_or_else(|| {
            FormatError::Container(format!("missing {} in package", DOCUMENT_PART))
        })?;
        let document = xml::parse(&document)?;

        let relationships = match read_part(&mut archive, RELATIONSHIPS_PART)? {
            Some(content) => parse_relationships(&xml::parse(&content)?),
            None => HashMap::new(),
        };
        let numbering = match read_part(&mut archive, NUMBERING_PART)? {
            Some(content) => parse_numbering(&xml::parse(&content)?),
            None => HashMap::new(),
        };

        Ok(Package {
            document,
            relationships,
            numbering,
        })
    }

    fn is_ordered(&self, num_id: &str, level: &str) -> bool {
        self.numbering
            .get(num_id)
            .and_then(|levels| levels.get(level))
            .copied()
            .unwrap_or(false)
    }
}

fn read_part(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Option<String>, FormatError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(FormatError::Container(format!("cannot read {}: {}", name, e))),
    };
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| FormatError::Container(format!("cannot read {}: {}", name, e)))?;
    Ok(Some(content))
}

fn parse_relationships(root: &XmlElement) -> HashMap<String, String> {
    root.children_named("Relationship")
        .filter_map(|rel| Some((rel.attr("Id")?.to_string(), rel.attr("Target")?.to_string())))
        .collect()
}

fn parse_numbering(root: &XmlElement) -> HashMap<String, HashMap<String, bool>> {
    let abstracts: HashMap<&str, HashMap<String, bool>> = root
        .children_named("abstractNum")
        .filter_map(|abstract_num| {
            let id = abstract_num.attr("abstractNumId")?;
            let levels = abstract_num
                .children_named("lvl")
                .filter_map(|level| {
                    let index = level.attr("ilvl")?.to_string();
                    let format = level.path_val(&["numFmt"]).unwrap_or("bullet");
                    Some((index, format != "bullet" && format != "none"))
                })
                .collect();
            Some((id, levels))
        })
        .collect();

    root.children_named("num")
        .filter_map(|num| {
            let id = num.attr("numId")?.to_string();
            let abstract_id = num.path_val(&["abstractNumId"])?;
            Some((id, abstracts.get(abstract_id)?.clone()))
        })
        .collect()
}

/// Concatenated text children of an element.
fn element_text(element: &XmlElement) -> String {
    element
        .children
        .iter()
        .filter_map(|child| match child {
            XmlNode::Text(text) => Some(text.as_str()),
            XmlNode::Element(_) => None,
        })
        .collect()
}

fn is_on(property: Option<&XmlElement>) -> bool {
    match property {
        Some(element) => !matches!(element.attr("val"), Some("0" | "false" | "off" | "none")),
        None => false,
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParagraphKind {
    Normal,
    Heading(u8),
    Code,
    Quote,
    Rule,
    /// Further paragraph of the current list item
    ListContinuation,
}

fn paragraph_kind(paragraph: &XmlElement) -> ParagraphKind {
    let style = paragraph.path_val(&["pPr", "pStyle"]).unwrap_or("");
    let lower = style.to_ascii_lowercase();
    if let Some(level) = lower.strip_prefix("heading").and_then(|rest| rest.trim().parse::<u8>().ok()) {
        return ParagraphKind::Heading(level.clamp(1, 6));
    }
    match lower.as_str() {
        "codeblock" | "sourcecode" => ParagraphKind::Code,
        "quote" | "blockquote" => ParagraphKind::Quote,
        "horizontalline" => ParagraphKind::Rule,
        "listparagraph" => ParagraphKind::ListContinuation,
        _ => ParagraphKind::Normal,
    }
}

/// `(numId, ilvl)` of a numbered paragraph. `numId` 0 removes numbering.
fn numbering_of(paragraph: &XmlElement) -> Option<(String, String)> {
    let num_pr = paragraph.path(&["pPr", "numPr"])?;
    let num_id = num_pr.path_val(&["numId"])?;
    if num_id == "0" {
        return None;
    }
    let level = num_pr.path_val(&["ilvl"]).unwrap_or("0");
    Some((num_id.to_string(), level.to_string()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RunFormat {
    bold: bool,
    italic: bool,
    underline: bool,
    code: bool,
}

impl RunFormat {
    /// Tags from outermost to innermost
    fn tags(self) -> Vec<&'static str> {
        [
            (self.bold, "strong"),
            (self.italic, "em"),
            (self.underline, "u"),
            (self.code, "code"),
        ]
        .into_iter()
        .filter_map(|(on, tag)| on.then_some(tag))
        .collect()
    }
}

fn run_format(run: &XmlElement, in_hyperlink: bool) -> RunFormat {
    let properties = run.child("rPr");
    let property = |name: &str| properties.and_then(|p| p.child(name));
    let style = properties
        .and_then(|p| p.path_val(&["rStyle"]))
        .unwrap_or("")
        .to_ascii_lowercase();
    let font = properties
        .and_then(|p| p.path(&["rFonts"]))
        .and_then(|fonts| fonts.attr("ascii"))
        .unwrap_or("")
        .to_ascii_lowercase();
    let monospace = ["courier", "consolas", "mono", "menlo"]
        .iter()
        .any(|needle| font.contains(needle));

    RunFormat {
        bold: is_on(property("b")) || style == "strong",
        italic: is_on(property("i")) || style == "emphasis",
        // Link runs are underlined for display only
        underline: is_on(property("u")) && !in_hyperlink,
        code: matches!(style.as_str(), "codeinline" | "verbatimchar" | "sourcecode") || monospace,
    }
}

/// One formatted piece of paragraph content, already HTML-escaped.
struct Segment {
    format: RunFormat,
    html: String,
}

struct ListFrame {
    num_id: String,
    level: usize,
    ordered: bool,
}

struct HtmlRenderer<'a> {
    package: &'a Package,
    out: String,
    code_lines: Vec<String>,
    quote_paragraphs: Vec<String>,
    lists: Vec<ListFrame>,
}

impl<'a> HtmlRenderer<'a> {
    fn new(package: &'a Package) -> Self {
        HtmlRenderer {
            package,
            out: String::new(),
            code_lines: Vec::new(),
            quote_paragraphs: Vec::new(),
            lists: Vec::new(),
        }
    }

    fn finish(mut self) -> String {
        self.flush_groups();
        self.close_lists();
        self.out
    }

    fn body(&mut self, body: &XmlElement) {
        for element in body.elements() {
            match element.name.as_str() {
                "p" => self.paragraph(element),
                "tbl" => {
                    self.flush_groups();
                    self.close_lists();
                    self.table(element);
                }
                // Content controls and tracked insertions wrap ordinary body content
                "sdt" => {
                    if let Some(content) = element.child("sdtContent") {
                        self.body(content);
                    }
                }
                "ins" | "customXml" => self.body(element),
                _ => {}
            }
        }
    }

    fn paragraph(&mut self, paragraph: &XmlElement) {
        let kind = paragraph_kind(paragraph);
        let content = self.runs_html(paragraph);

        if let Some((num_id, level)) = numbering_of(paragraph) {
            self.flush_groups();
            self.list_item(&num_id, &level, &content);
            return;
        }
        if kind == ParagraphKind::ListContinuation && !self.lists.is_empty() {
            self.flush_groups();
            self.out.push_str(&format!("<p>{}</p>", content));
            return;
        }

        match kind {
            ParagraphKind::Code => {
                if !self.quote_paragraphs.is_empty() {
                    self.flush_groups();
                }
                self.close_lists();
                let line = self.plain_runs(paragraph);
                self.code_lines.push(line);
            }
            ParagraphKind::Quote => {
                if !self.code_lines.is_empty() {
                    self.flush_groups();
                }
                self.close_lists();
                self.quote_paragraphs.push(content);
            }
            _ => {
                self.flush_groups();
                self.close_lists();
                match kind {
                    ParagraphKind::Heading(level) => {
                        self.out
                            .push_str(&format!("<h{level}>{}</h{level}>", content, level = level));
                    }
                    ParagraphKind::Rule => self.out.push_str("<hr>"),
                    _ => self.out.push_str(&format!("<p>{}</p>", content)),
                }
            }
        }
    }

    fn flush_groups(&mut self) {
        if !self.code_lines.is_empty() {
            let code = std::mem::take(&mut self.code_lines).join("\n");
            self.out
                .push_str(&format!("<pre><code>{}</code></pre>", escape_html(&code)));
        }
        if !self.quote_paragraphs.is_empty() {
            self.out.push_str("<blockquote>");
            for paragraph in std::mem::take(&mut self.quote_paragraphs) {
                self.out.push_str(&format!("<p>{}</p>", paragraph));
            }
            self.out.push_str("</blockquote>");
        }
    }

    fn list_item(&mut self, num_id: &str, level: &str, content: &str) {
        let depth = level.parse::<usize>().unwrap_or(0);

        // Close deeper lists, and a sibling list at the same depth
        while let Some(top) = self.lists.last() {
            if top.level > depth || (top.level == depth && top.num_id != num_id) {
                self.close_top_list();
            } else {
                break;
            }
        }

        let sibling = matches!(self.lists.last(), Some(top) if top.level == depth);
        if sibling {
            self.out.push_str("</li><li>");
        } else {
            let ordered = self.package.is_ordered(num_id, level);
            self.out.push_str(if ordered { "<ol><li>" } else { "<ul><li>" });
            self.lists.push(ListFrame {
                num_id: num_id.to_string(),
                level: depth,
                ordered,
            });
        }
        self.out.push_str(&format!("<p>{}</p>", content));
    }

    fn close_top_list(&mut self) {
        if let Some(frame) = self.lists.pop() {
            self.out
                .push_str(if frame.ordered { "</li></ol>" } else { "</li></ul>" });
        }
    }

    fn close_lists(&mut self) {
        while !self.lists.is_empty() {
            self.close_top_list();
        }
    }

    fn table(&mut self, table: &XmlElement) {
        self.out.push_str("<table>");
        for row in table.children_named("tr") {
            let header = row.path(&["trPr", "tblHeader"]).is_some()
                || row.descendants("p").iter().any(|p| {
                    p.path_val(&["pPr", "pStyle"])
                        .is_some_and(|style| style.eq_ignore_ascii_case("TableHeader"))
                });
            let tag = if header { "th" } else { "td" };

            self.out.push_str("<tr>");
            for cell in row.children_named("tc") {
                let paragraphs: Vec<&XmlElement> = cell.children_named("p").collect();
                let alignment = paragraphs
                    .first()
                    .and_then(|p| p.path_val(&["pPr", "jc"]))
                    .and_then(|jc| match jc {
                        "left" | "start" => Some("left"),
                        "center" => Some("center"),
                        "right" | "end" => Some("right"),
                        _ => None,
                    });
                match alignment {
                    Some(alignment) => self.out.push_str(&format!(
                        "<{} style=\"text-align:{}\">",
                        tag, alignment
                    )),
                    None => self.out.push_str(&format!("<{}>", tag)),
                }
                for paragraph in paragraphs {
                    let content = self.runs_html(paragraph);
                    self.out.push_str(&format!("<p>{}</p>", content));
                }
                self.out.push_str(&format!("</{}>", tag));
            }
            self.out.push_str("</tr>");
        }
        self.out.push_str("</table>");
    }

    /// Text of a code paragraph, formatting ignored.
    fn plain_runs(&self, paragraph: &XmlElement) -> String {
        let mut segments = Vec::new();
        self.collect_segments(paragraph, false, &mut segments);
        let mut text = String::new();
        for segment in segments {
            text.push_str(&segment.html);
        }
        // Segments are escaped; the code block is escaped again as a whole
        unescape_html(&text)
    }

    /// Paragraph content as inline HTML.
    fn runs_html(&self, paragraph: &XmlElement) -> String {
        let mut out = String::new();
        let mut pending = Vec::new();

        for child in paragraph.elements() {
            if child.name == "hyperlink" {
                out.push_str(&render_segments(&std::mem::take(&mut pending)));
                let mut link_segments = Vec::new();
                self.collect_segments(child, true, &mut link_segments);
                let href = self.hyperlink_target(child);
                out.push_str(&format!(
                    "<a href=\"{}\">{}</a>",
                    escape_html(&href),
                    render_segments(&link_segments)
                ));
            } else {
                self.collect_child_segments(child, false, &mut pending);
            }
        }
        out.push_str(&render_segments(&pending));
        out
    }

    fn collect_segments(&self, parent: &XmlElement, in_hyperlink: bool, out: &mut Vec<Segment>) {
        for child in parent.elements() {
            self.collect_child_segments(child, in_hyperlink, out);
        }
    }

    fn collect_child_segments(
        &self,
        child: &XmlElement,
        in_hyperlink: bool,
        out: &mut Vec<Segment>,
    ) {
        match child.name.as_str() {
            "r" => self.run_segments(child, in_hyperlink, out),
            "pPr" | "rPr" => {}
            // smartTag, ins, fldSimple, hyperlink inside another wrapper ...
            _ => self.collect_segments(child, in_hyperlink, out),
        }
    }

    fn run_segments(&self, run: &XmlElement, in_hyperlink: bool, out: &mut Vec<Segment>) {
        let format = run_format(run, in_hyperlink);
        for part in run.elements() {
            let html = match part.name.as_str() {
                "t" => escape_html(&element_text(part)),
                "tab" => "\t".to_string(),
                "br" | "cr" => {
                    if part.attr("type").is_some_and(|kind| kind != "textWrapping") {
                        continue;
                    }
                    "<br>".to_string()
                }
                "drawing" | "pict" => match self.image(part) {
                    Some(html) => html,
                    None => continue,
                },
                _ => continue,
            };
            out.push(Segment { format, html });
        }
    }

    fn image(&self, drawing: &XmlElement) -> Option<String> {
        let alt = drawing
            .descendants("docPr")
            .first()
            .and_then(|doc_pr| doc_pr.attr("descr"))
            .unwrap_or("")
            .to_string();
        let embed = drawing
            .descendants("blip")
            .first()
            .and_then(|blip| blip.attr("embed"))
            .map(str::to_string);
        let src = match embed {
            Some(id) => self.resolve(&id)?,
            None => return None,
        };
        Some(format!(
            "<img src=\"{}\" alt=\"{}\">",
            escape_html(&src),
            escape_html(&alt)
        ))
    }

    fn hyperlink_target(&self, hyperlink: &XmlElement) -> String {
        if let Some(target) = hyperlink.attr("id").and_then(|id| self.resolve(id)) {
            return target;
        }
        match hyperlink.attr("anchor") {
            Some(anchor) => format!("#{}", anchor),
            None => String::new(),
        }
    }

    fn resolve(&self, id: &str) -> Option<String> {
        let target = self.package.relationships.get(id).cloned();
        if target.is_none() {
            tracing::warn!(relationship = id, "unresolved relationship");
        }
        target
    }
}

/// Render segments, opening and closing format tags only where they change.
fn render_segments(segments: &[Segment]) -> String {
    let mut out = String::new();
    let mut open: Vec<&'static str> = Vec::new();

    for segment in segments {
        let tags = segment.format.tags();
        let common = open
            .iter()
            .zip(tags.iter())
            .take_while(|(a, b)| a == b)
            .count();
        while open.len() > common {
            if let Some(tag) = open.pop() {
                out.push_str(&format!("</{}>", tag));
            }
        }
        for tag in &tags[common..] {
            out.push_str(&format!("<{}>", tag));
            open.push(*tag);
        }
        out.push_str(&segment.html);
    }
    while let Some(tag) = open.pop() {
        out.push_str(&format!("</{}>", tag));
    }
    out
}

fn unescape_html(text: &str) -> String {
    text.replace("<br>", "\n")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(document_body: &str) -> Package {
        let document = xml::parse(&format!(
            "<w:document xmlns:w=\"w\" xmlns:r=\"r\"><w:body>{}</w:body></w:document>",
            document_body
        ))
        .unwrap();
        let numbering = xml::parse(
            "<w:numbering xmlns:w=\"w\">\
             <w:abstractNum w:abstractNumId=\"10\"><w:lvl w:ilvl=\"0\"><w:numFmt w:val=\"decimal\"/></w:lvl></w:abstractNum>\
             <w:abstractNum w:abstractNumId=\"11\"><w:lvl w:ilvl=\"0\"><w:numFmt w:val=\"bullet\"/></w:lvl><w:lvl w:ilvl=\"1\"><w:numFmt w:val=\"bullet\"/></w:lvl></w:abstractNum>\
             <w:num w:numId=\"2\"><w:abstractNumId w:val=\"10\"/></w:num>\
             <w:num w:numId=\"3\"><w:abstractNumId w:val=\"11\"/></w:num>\
             </w:numbering>",
        )
        .unwrap();
        let relationships = xml::parse(
            "<Relationships><Relationship Id=\"rId5\" Target=\"https://example.com\"/>\
             <Relationship Id=\"rId6\" Target=\"media/cat.png\"/></Relationships>",
        )
        .unwrap();
        Package {
            document,
            relationships: parse_relationships(&relationships),
            numbering: parse_numbering(&numbering),
        }
    }

    fn render(body: &str) -> String {
        let package = package(body);
        let mut renderer = HtmlRenderer::new(&package);
        if let Some(body) = package.document.child("body") {
            renderer.body(body);
        }
        renderer.finish()
    }

    fn para(style: &str, text: &str) -> String {
        format!(
            "<w:p><w:pPr><w:pStyle w:val=\"{}\"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>",
            style, text
        )
    }

    fn item(num_id: u32, level: u32, text: &str) -> String {
        format!(
            "<w:p><w:pPr><w:numPr><w:ilvl w:val=\"{}\"/><w:numId w:val=\"{}\"/></w:numPr></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>",
            level, num_id, text
        )
    }

    #[test]
    fn test_headings_rules_and_groups() {
        let html = render(&[
            para("Heading2", "Title"),
            para("CodeBlock", "a &lt; b"),
            para("CodeBlock", "c"),
            para("Quote", "q1"),
            para("Quote", "q2"),
            para("HorizontalLine", ""),
        ]
        .concat());
        assert_eq!(
            html,
            "<h2>Title</h2><pre><code>a &lt; b\nc</code></pre>\
             <blockquote><p>q1</p><p>q2</p></blockquote><hr>"
        );
    }

    #[test]
    fn test_nested_lists_follow_numbering() {
        let html = render(&[
            item(3, 0, "a"),
            item(3, 1, "nested"),
            item(3, 0, "b"),
            item(2, 0, "one"),
            para("Normal", "after"),
        ]
        .concat());
        assert_eq!(
            html,
            "<ul><li><p>a</p><ul><li><p>nested</p></li></ul></li><li><p>b</p></li></ul>\
             <ol><li><p>one</p></li></ol><p>after</p>"
        );
    }

    #[test]
    fn test_list_continuation_paragraph_stays_in_item() {
        let html = render(&[item(2, 0, "first"), para("ListParagraph", "more")].concat());
        assert_eq!(html, "<ol><li><p>first</p><p>more</p></li></ol>");
    }

    #[test]
    fn test_run_formatting_is_nested_by_prefix() {
        let html = render(
            "<w:p>\
             <w:r><w:rPr><w:b/></w:rPr><w:t>a</w:t></w:r>\
             <w:r><w:rPr><w:b/><w:i/></w:rPr><w:t>b</w:t></w:r>\
             <w:r><w:rPr><w:b w:val=\"0\"/><w:rStyle w:val=\"CodeInline\"/></w:rPr><w:t>c</w:t></w:r>\
             <w:r><w:t xml:space=\"preserve\"> d</w:t><w:br/></w:r>\
             </w:p>",
        );
        assert_eq!(
            html,
            "<p><strong>a<em>b</em></strong><code>c</code> d<br></p>"
        );
    }

    #[test]
    fn test_hyperlink_and_image() {
        let html = render(
            "<w:p><w:hyperlink r:id=\"rId5\"><w:r><w:rPr><w:rStyle w:val=\"Hyperlink\"/><w:u w:val=\"single\"/></w:rPr><w:t>site</w:t></w:r></w:hyperlink>\
             <w:r><w:drawing><wp:inline xmlns:wp=\"wp\"><wp:docPr id=\"1\" descr=\"A cat\"/><a:graphic xmlns:a=\"a\"><a:blip r:embed=\"rId6\"/></a:graphic></wp:inline></w:drawing></w:r></w:p>",
        );
        assert_eq!(
            html,
            "<p><a href=\"https://example.com\">site</a><img src=\"media/cat.png\" alt=\"A cat\"></p>"
        );
    }

    #[test]
    fn test_table_header_and_alignment() {
        let html = render(
            "<w:tbl><w:tr><w:tc><w:p><w:pPr><w:pStyle w:val=\"TableHeader\"/><w:jc w:val=\"center\"/></w:pPr><w:r><w:t>h</w:t></w:r></w:p></w:tc></w:tr>\
             <w:tr><w:tc><w:p><w:r><w:t>v</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
        );
        assert_eq!(
            html,
            "<table><tr><th style=\"text-align:center\"><p>h</p></th></tr><tr><td><p>v</p></td></tr></table>"
        );
    }

    #[test]
    fn test_not_a_zip_is_a_container_error() {
        let result = DocxReader.to_html(b"plain text, not a package");
        assert!(matches!(result, Err(FormatError::Container(message)) if message.contains("not a DOCX package")));
    }
}
