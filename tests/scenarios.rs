//! End to end scenarios across formats

mod common;

use common::{para, text};
use docmorph::ir::{Block, Inline, IrDocument, TableAlignment};
use docmorph::{
    normalize, parse_latex_to_ir, parse_markdown_to_ir, serialize_ir_to_latex, FormatError,
};
use insta::assert_snapshot;
use serde_json::json;

#[test]
fn test_markdown_heading_and_bold_to_latex() {
    let doc = parse_markdown_to_ir("# Title\n\nA **bold** word.");

    assert_eq!(
        doc.blocks,
        vec![
            Block::Heading {
                level: 1,
                inlines: vec![text("Title")],
            },
            para(vec![
                text("A "),
                Inline::Strong {
                    inlines: vec![text("bold")],
                },
                text(" word."),
            ]),
        ]
    );

    let latex = serialize_ir_to_latex(&doc);
    assert!(latex.contains("\\section{Title}"));
    assert!(latex.contains("\\textbf{bold}"));
}

#[test]
fn test_empty_markdown_list_item_holds_one_empty_paragraph() {
    let doc = parse_markdown_to_ir("- \n- second\n");

    match &doc.blocks[..] {
        [Block::List { items, .. }] => {
            assert_eq!(items.len(), 2);
            assert_eq!(items[0].blocks, vec![Block::empty_paragraph()]);
        }
        other => panic!("expected a list, got {:?}", other),
    }
}

#[test]
fn test_latex_brace_balanced_argument() {
    let doc = parse_latex_to_ir("\\textbf{a{b}c}");
    assert_eq!(
        doc.blocks,
        vec![para(vec![Inline::Strong {
            inlines: vec![text("a{b}c")],
        }])]
    );
}

#[test]
fn test_latex_lcr_alignments() {
    let doc = parse_latex_to_ir("\\begin{tabular}{lcr}\n1 & 2 & 3 \\\\\n\\end{tabular}");
    let Some(Block::Table { alignments, .. }) = doc.blocks.first() else {
        panic!("expected a table, got {:?}", doc.blocks);
    };
    assert_eq!(
        alignments.as_deref(),
        Some(&[TableAlignment::Left, TableAlignment::Center, TableAlignment::Right][..])
    );
    assert!(serialize_ir_to_latex(&doc).contains("{lcr}"));
}

#[test]
fn test_markdown_and_latex_agree_on_structure() {
    let from_markdown = parse_markdown_to_ir(
        "## Notes\n\nSee [docs](https://example.com) and `code`.\n\n1. one\n2. two\n\n> quoted\n",
    );
    let from_latex = parse_latex_to_ir(
        "\\subsection{Notes}\n\nSee \\href{https://example.com}{docs} and \\texttt{code}.\n\n\
         \\begin{enumerate}\n\\item one\n\\item two\n\\end{enumerate}\n\n\
         \\begin{quote}\nquoted\n\\end{quote}\n",
    );
    assert_eq!(from_markdown, from_latex);
}

#[test]
fn test_markdown_table_to_latex() {
    let doc = parse_markdown_to_ir("| Name | Qty |\n| :-- | --: |\n| pen | 2 |\n| ink_pot | 10 |\n");
    assert_snapshot!(serialize_ir_to_latex(&doc), @r"
    \begin{tabular}{lr}
    \hline
    Name & Qty\\
    \hline
    pen & 2\\
    ink\_pot & 10\\
    \end{tabular}
    ");
}

#[test]
fn test_json_boundary_rejects_malformed_trees() {
    let value = json!({
        "type": "Document",
        "blocks": [
            {"type": "Heading", "level": 9, "inlines": []},
            {"type": "Paragraph", "inlines": [{"type": "Bold", "inlines": []}]},
            {"type": "List", "ordered": "yes", "items": []},
        ]
    });

    match IrDocument::from_json(&value) {
        Err(FormatError::InvalidDocument(violations)) => {
            let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
            assert!(paths.contains(&"/blocks/0"));
            assert!(paths.contains(&"/blocks/1/inlines/0"));
            assert!(paths.contains(&"/blocks/2"));
        }
        other => panic!("expected violations, got {:?}", other),
    }
}

#[test]
fn test_json_boundary_accepts_serialized_trees() {
    let doc = normalize(&parse_markdown_to_ir("# A\n\n- b\n\n| c |\n| :-: |\n| d |\n"));
    let value = serde_json::to_value(&doc).expect("serializes");
    assert_eq!(IrDocument::from_json(&value).expect("valid"), doc);
}
