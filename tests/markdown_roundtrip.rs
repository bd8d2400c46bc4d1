//! Markdown round trips at the string level (Markdown → IR → Markdown → IR)

mod common;

use common::{para, sample_document, text};
use docmorph::ir::{Block, Inline};
use docmorph::{
    normalize, parse_markdown_to_ir, serialize_ir_to_markdown, serialize_ir_to_markdown_with,
    MarkdownOptions,
};
use rstest::rstest;

#[test]
fn test_sample_document_round_trips() {
    let doc = normalize(&sample_document(Some("rust")));
    let markdown = serialize_ir_to_markdown(&doc).expect("serializes");

    println!("Generated Markdown:\n{}", markdown);

    assert!(markdown.contains("# Title"));
    assert!(markdown.contains("**bold**"));
    assert!(markdown.contains("<u>under</u>"));
    assert!(markdown.contains("``` rust\n"));
    assert_eq!(parse_markdown_to_ir(&markdown), doc);
}

#[rstest]
#[case::heading_levels("# One\n\n## Two\n\n###### Six\n")]
#[case::emphasis("Some *soft* and **strong** and `code`.\n")]
#[case::soft_break("first line\nsecond line\n")]
#[case::hard_break("first line\\\nsecond line\n")]
#[case::underline("An <u>underlined *phrase*</u> here.\n")]
#[case::link_and_image("See [the site](https://example.com) and ![logo](logo.png).\n")]
#[case::ordered_list("1. first\n2. second\n")]
#[case::nested_lists("- outer\n  - inner\n    1. deepest\n")]
#[case::blockquote("> quoted\n>\n> - with a list\n")]
#[case::fenced_code("```python\nprint(1)\n\nprint(2)\n```\n")]
#[case::rule("above\n\n---\n\nbelow\n")]
#[case::table("| a | b |\n| :-- | --: |\n| 1 | 2 |\n")]
#[case::table_without_alignment("| a | b |\n| --- | --- |\n| 1 | 2 |\n")]
fn test_string_round_trip(#[case] source: &str) {
    let first = parse_markdown_to_ir(source);
    let markdown = serialize_ir_to_markdown(&first).expect("serializes");
    let second = parse_markdown_to_ir(&markdown);
    assert_eq!(first, second, "markdown was:\n{}", markdown);
}

#[test]
fn test_underline_survives_as_raw_html() {
    let doc = parse_markdown_to_ir("An <u>underlined</u> word.\n");
    assert_eq!(
        doc.blocks,
        vec![para(vec![
            text("An "),
            Inline::Underline {
                inlines: vec![text("underlined")]
            },
            text(" word."),
        ])]
    );
}

#[test]
fn test_unrelated_html_is_text() {
    let doc = parse_markdown_to_ir("A <span>span</span> here.\n");
    assert_eq!(
        doc.blocks,
        vec![para(vec![text("A <span>span</span> here.")])]
    );
}

#[test]
fn test_table_alignment_row() {
    let doc = parse_markdown_to_ir("| l | c | r |\n| :-- | :-: | --: |\n| 1 | 2 | 3 |\n");
    let markdown = serialize_ir_to_markdown(&doc).expect("serializes");
    assert!(markdown.contains(":-:"));
    assert!(markdown.contains("--:"));
}

#[test]
fn test_wrap_width_is_forwarded() {
    let doc = parse_markdown_to_ir(&"word ".repeat(40));
    let options = MarkdownOptions { wrap_width: 20 };
    let markdown = serialize_ir_to_markdown_with(&doc, &options).expect("serializes");

    assert!(markdown.lines().count() > 1);
    assert!(markdown.lines().all(|line| line.len() <= 20));
}

#[test]
fn test_empty_paragraphs_are_not_printed() {
    let doc = docmorph::IrDocument::new(vec![Block::empty_paragraph(), para(vec![text("kept")])]);
    let markdown = serialize_ir_to_markdown(&doc).expect("serializes");
    assert_eq!(markdown.trim(), "kept");
}
