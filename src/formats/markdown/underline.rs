//! Underline over raw inline HTML.
//!
//! Markdown has no underline node, so the IR's `Underline` is written as a `<u>` raw inline,
//! the content, and a `</u>` raw inline. On the way back comrak hands us those tags as
//! sibling `HtmlInline` nodes, or, for HTML blocks, as one literal holding the whole
//! `<u>…</u>` span. Both shapes are recognized here, case-insensitively. Any other raw HTML
//! stays in the document as opaque text.

use crate::ir::Inline;

pub const OPEN_TAG: &str = "<u>";
pub const CLOSE_TAG: &str = "</u>";

/// An inline as seen by the Markdown parser before underline pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Inline(Inline),
    Raw(String),
}

#[derive(Debug, PartialEq, Eq)]
enum RawKind<'a> {
    Open,
    Close,
    /// `<u>inner</u>` in a single literal
    Wrapped(&'a str),
    Opaque,
}

fn classify(raw: &str) -> RawKind<'_> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(OPEN_TAG) {
        return RawKind::Open;
    }
    if trimmed.eq_ignore_ascii_case(CLOSE_TAG) {
        return RawKind::Close;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with(OPEN_TAG) && lower.ends_with(CLOSE_TAG) {
        let inner = &trimmed[OPEN_TAG.len()..trimmed.len() - CLOSE_TAG.len()];
        if !inner.to_ascii_lowercase().contains(OPEN_TAG) {
            return RawKind::Wrapped(inner);
        }
    }
    RawKind::Opaque
}

/// Pair `<u>`/`</u>` markers into `Underline` nodes.
///
/// Unmatched markers are kept as literal text, so nothing is dropped.
pub fn resolve(pieces: Vec<Piece>) -> Vec<Inline> {
    // Each frame is an open <u> and the inlines collected since.
    let mut frames: Vec<Vec<Inline>> = vec![Vec::new()];

    for piece in pieces {
        match piece {
            Piece::Inline(inline) => push(&mut frames, inline),
            Piece::Raw(raw) => match classify(&raw) {
                RawKind::Open => frames.push(Vec::new()),
                RawKind::Close if frames.len() > 1 => {
                    let inlines = frames.pop().unwrap_or_default();
                    push(&mut frames, Inline::Underline { inlines });
                }
                RawKind::Wrapped(inner) => push(
                    &mut frames,
                    Inline::Underline {
                        inlines: vec![Inline::text(inner)],
                    },
                ),
                RawKind::Close | RawKind::Opaque => push(&mut frames, Inline::text(raw)),
            },
        }
    }

    // Unclosed <u>: give the marker back as text and splice the content in.
    while frames.len() > 1 {
        let inlines = frames.pop().unwrap_or_default();
        push(&mut frames, Inline::text(OPEN_TAG));
        for inline in inlines {
            push(&mut frames, inline);
        }
    }

    frames.pop().unwrap_or_default()
}

fn push(frames: &mut [Vec<Inline>], inline: Inline) {
    if let Some(top) = frames.last_mut() {
        top.push(inline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(s: &str) -> Piece {
        Piece::Raw(s.to_string())
    }

    fn text(s: &str) -> Piece {
        Piece::Inline(Inline::text(s))
    }

    #[test]
    fn test_pairs_sibling_markers() {
        let inlines = resolve(vec![text("a "), raw("<u>"), text("b"), raw("</u>"), text(" c")]);
        assert_eq!(
            inlines,
            vec![
                Inline::text("a "),
                Inline::Underline {
                    inlines: vec![Inline::text("b")]
                },
                Inline::text(" c"),
            ]
        );
    }

    #[test]
    fn test_markers_are_case_insensitive() {
        let inlines = resolve(vec![raw("<U>"), text("b"), raw("</U>")]);
        assert!(matches!(inlines.as_slice(), [Inline::Underline { .. }]));
    }

    #[test]
    fn test_nested_underline() {
        let inlines = resolve(vec![raw("<u>"), raw("<u>"), text("x"), raw("</u>"), raw("</u>")]);
        assert_eq!(
            inlines,
            vec![Inline::Underline {
                inlines: vec![Inline::Underline {
                    inlines: vec![Inline::text("x")]
                }]
            }]
        );
    }

    #[test]
    fn test_wrapped_literal() {
        let inlines = resolve(vec![raw("<u>under</u>")]);
        assert_eq!(
            inlines,
            vec![Inline::Underline {
                inlines: vec![Inline::text("under")]
            }]
        );
    }

    #[test]
    fn test_other_html_is_opaque_text() {
        let inlines = resolve(vec![raw("<span>"), text("x"), raw("</span>")]);
        assert_eq!(
            inlines,
            vec![Inline::text("<span>"), Inline::text("x"), Inline::text("</span>")]
        );
    }

    #[test]
    fn test_unbalanced_markers_become_text() {
        let inlines = resolve(vec![raw("</u>"), text("a"), raw("<u>"), text("b")]);
        assert_eq!(
            inlines,
            vec![
                Inline::text("</u>"),
                Inline::text("a"),
                Inline::text("<u>"),
                Inline::text("b"),
            ]
        );
    }
}
