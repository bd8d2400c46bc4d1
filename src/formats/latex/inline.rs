//! Inline tokenizer.
//!
//! A single left to right scan. At every `\` a small command vocabulary is tried:
//!
//!     \textbf{..}  \textit{..} \emph{..}  \underline{..}   recursive containers
//!     \href{url}{label}  \url{url}                          links
//!     \texttt{..}  \includegraphics[opts]{src}              leaves
//!     \\  \newline                                          line breaks
//!     \# \$ \% \& \_ \{ \} \^ \~  \textbackslash{} ...      escaped literals
//!
//! Arguments are brace-balanced: nested `{`/`}` pairs are counted, escaped braces are
//! skipped. A command missing a required group does not match, and the text up to the next
//! `\` is emitted as literal text. Tokenization never fails.

use crate::ir::nodes::inlines_plain_text;
use crate::ir::Inline;

/// Tokenize one span of LaTeX text into raw (not yet normalized) inlines.
pub fn tokenize(input: &str) -> Vec<Inline> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        if bytes[pos] == b'\\' {
            if let Some((inline, next)) = command_at(input, pos) {
                out.push(inline);
                pos = next;
                continue;
            }
            // Not a command we know: literal up to the next marker
            let next = next_marker(input, pos + 1);
            out.push(Inline::text(&input[pos..next]));
            pos = next;
        } else {
            let next = next_marker(input, pos);
            out.push(Inline::text(&input[pos..next]));
            pos = next;
        }
    }

    out
}

/// Flattened text of a command argument, with escapes resolved.
pub fn unescape(input: &str) -> String {
    inlines_plain_text(&tokenize(input))
}

fn next_marker(input: &str, from: usize) -> usize {
    input[from..]
        .find('\\')
        .map(|offset| from + offset)
        .unwrap_or(input.len())
}

/// Try to read a command starting at the backslash at `pos`.
fn command_at(input: &str, pos: usize) -> Option<(Inline, usize)> {
    let rest = &input[pos + 1..];
    let first = rest.chars().next()?;

    match first {
        '\\' => Some((Inline::LineBreak, pos + 2)),
        '#' | '$' | '%' | '&' | '_' | '{' | '}' => Some((Inline::text(first.to_string()), pos + 2)),
        '^' | '~' => Some((
            Inline::text(first.to_string()),
            skip_empty_group(input, pos + 2),
        )),
        c if c.is_ascii_alphabetic() => {
            let name_len = rest.bytes().take_while(u8::is_ascii_alphabetic).count();
            let name = &rest[..name_len];
            control_word(input, name, pos + 1 + name_len)
        }
        _ => None,
    }
}

/// Dispatch a control word whose name ends right before `after`.
fn control_word(input: &str, name: &str, after: usize) -> Option<(Inline, usize)> {
    match name {
        "textbf" => container(input, after, |inlines| Inline::Strong { inlines }),
        "textit" | "emph" => container(input, after, |inlines| Inline::Emphasis { inlines }),
        "underline" | "uline" => container(input, after, |inlines| Inline::Underline { inlines }),
        "texttt" => {
            let (content, next) = braced(input, after)?;
            Some((
                Inline::CodeSpan {
                    text: unescape(content),
                },
                next,
            ))
        }
        "href" => {
            let (url, next) = braced(input, after)?;
            let (label, next) = braced(input, next)?;
            Some((
                Inline::Link {
                    href: unescape(url),
                    inlines: tokenize(label),
                },
                next,
            ))
        }
        "url" => {
            let (url, next) = braced(input, after)?;
            let href = unescape(url);
            Some((
                Inline::Link {
                    inlines: vec![Inline::text(href.clone())],
                    href,
                },
                next,
            ))
        }
        "includegraphics" => {
            let (options, next) = match bracketed(input, after) {
                Some((options, next)) => (Some(options), next),
                None => (None, after),
            };
            let (src, next) = braced(input, next)?;
            Some((
                Inline::Image {
                    src: unescape(src),
                    alt: options.and_then(alt_option),
                },
                next,
            ))
        }
        "newline" => Some((Inline::LineBreak, skip_one_space(input, after))),
        "textbackslash" => Some((Inline::text("\\"), skip_word_terminator(input, after))),
        "textasciitilde" => Some((Inline::text("~"), skip_word_terminator(input, after))),
        "textasciicircum" => Some((Inline::text("^"), skip_word_terminator(input, after))),
        _ => None,
    }
}

fn container<F>(input: &str, after: usize, wrap: F) -> Option<(Inline, usize)>
where
    F: FnOnce(Vec<Inline>) -> Inline,
{
    let (content, next) = braced(input, after)?;
    Some((wrap(tokenize(content)), next))
}

/// Brace-balanced group starting exactly at `start`. Returns the content and the index
/// just past the closing brace, or `None` when there is no group or it never closes.
pub(crate) fn braced(input: &str, start: usize) -> Option<(&str, usize)> {
    delimited(input, start, b'{', b'}')
}

/// Optional `[...]` argument starting exactly at `start`.
pub(crate) fn bracketed(input: &str, start: usize) -> Option<(&str, usize)> {
    delimited(input, start, b'[', b']')
}

fn delimited(input: &str, start: usize, open: u8, close: u8) -> Option<(&str, usize)> {
    let bytes = input.as_bytes();
    if bytes.get(start) != Some(&open) {
        return None;
    }

    let mut depth = 0usize;
    // Braces nested inside a bracket group hide its delimiters
    let mut braces = 0usize;
    let mut pos = start;
    while pos < bytes.len() {
        let byte = bytes[pos];
        if byte == b'\\' {
            // Escaped character, never a delimiter
            pos += 2;
            continue;
        }
        if open == b'{' {
            if byte == b'{' {
                depth += 1;
            } else if byte == b'}' {
                depth -= 1;
                if depth == 0 {
                    return Some((&input[start + 1..pos], pos + 1));
                }
            }
        } else if byte == b'{' {
            braces += 1;
        } else if byte == b'}' {
            braces = braces.saturating_sub(1);
        } else if braces == 0 && byte == open {
            depth += 1;
        } else if braces == 0 && byte == close {
            depth -= 1;
            if depth == 0 {
                return Some((&input[start + 1..pos], pos + 1));
            }
        }
        pos += 1;
    }

    None
}

/// The `alt=` key of an `\includegraphics` option list.
fn alt_option(options: &str) -> Option<String> {
    split_top_level(options, ',').into_iter().find_map(|entry| {
        let (key, value) = entry.split_once('=')?;
        if key.trim() != "alt" {
            return None;
        }
        let value = value.trim();
        let value = braced(value, 0)
            .filter(|(_, end)| *end == value.len())
            .map(|(inner, _)| inner)
            .unwrap_or(value);
        Some(unescape(value))
    })
}

/// Split on `separator` outside braces, skipping escaped characters.
pub(crate) fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut chars = input.char_indices();

    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&input[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn skip_empty_group(input: &str, pos: usize) -> usize {
    if input[pos..].starts_with("{}") {
        pos + 2
    } else {
        pos
    }
}

fn skip_one_space(input: &str, pos: usize) -> usize {
    if input[pos..].starts_with(' ') {
        pos + 1
    } else {
        pos
    }
}

/// After a control word used as a character: `{}` or a single space ends it.
fn skip_word_terminator(input: &str, pos: usize) -> usize {
    let skipped = skip_empty_group(input, pos);
    if skipped != pos {
        skipped
    } else {
        skip_one_space(input, pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::normalize::normalize_inlines;

    fn tokens(input: &str) -> Vec<Inline> {
        normalize_inlines(tokenize(input))
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(tokens("hello world"), vec![Inline::text("hello world")]);
    }

    #[test]
    fn test_nested_braces_do_not_end_argument() {
        assert_eq!(
            tokens("\\textbf{a{b}c}"),
            vec![Inline::Strong {
                inlines: vec![Inline::text("a{b}c")]
            }]
        );
    }

    #[test]
    fn test_recursive_containers() {
        assert_eq!(
            tokens("x \\textit{y \\underline{z}}"),
            vec![
                Inline::text("x "),
                Inline::Emphasis {
                    inlines: vec![
                        Inline::text("y "),
                        Inline::Underline {
                            inlines: vec![Inline::text("z")]
                        }
                    ]
                }
            ]
        );
    }

    #[test]
    fn test_href() {
        assert_eq!(
            tokens("\\href{https://example.com/a\\_b}{the \\textbf{site}}"),
            vec![Inline::Link {
                href: "https://example.com/a_b".into(),
                inlines: vec![
                    Inline::text("the "),
                    Inline::Strong {
                        inlines: vec![Inline::text("site")]
                    }
                ]
            }]
        );
    }

    #[test]
    fn test_href_without_label_is_literal() {
        assert_eq!(
            tokens("\\href{https://example.com} text"),
            vec![Inline::text("\\href{https://example.com} text")]
        );
    }

    #[test]
    fn test_unclosed_argument_is_literal() {
        assert_eq!(tokens("\\textbf{oops"), vec![Inline::text("\\textbf{oops")]);
    }

    #[test]
    fn test_unknown_command_is_literal() {
        assert_eq!(
            tokens("see \\cite{knuth} now"),
            vec![Inline::text("see \\cite{knuth} now")]
        );
    }

    #[test]
    fn test_lone_trailing_backslash() {
        assert_eq!(tokenize("a\\"), vec![Inline::text("a"), Inline::text("\\")]);
    }

    #[test]
    fn test_escaped_characters_are_literal() {
        assert_eq!(
            tokens("\\#1 \\& 50\\% \\{x\\} \\textbackslash{}n \\textasciitilde{}"),
            vec![Inline::text("#1 & 50% {x} \\n ~")]
        );
    }

    #[test]
    fn test_escaped_brace_inside_argument() {
        assert_eq!(
            tokens("\\textbf{a\\}b}"),
            vec![Inline::Strong {
                inlines: vec![Inline::text("a}b")]
            }]
        );
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(
            tokens("a\\\\b\\newline c"),
            vec![
                Inline::text("a"),
                Inline::LineBreak,
                Inline::text("b"),
                Inline::LineBreak,
                Inline::text("c")
            ]
        );
    }

    #[test]
    fn test_texttt_and_url() {
        assert_eq!(
            tokens("\\texttt{a\\_b} \\url{http://x.org}"),
            vec![
                Inline::CodeSpan { text: "a_b".into() },
                Inline::text(" "),
                Inline::Link {
                    href: "http://x.org".into(),
                    inlines: vec![Inline::text("http://x.org")]
                }
            ]
        );
    }

    #[test]
    fn test_includegraphics_with_alt() {
        assert_eq!(
            tokens("\\includegraphics[width=3cm, alt={A cat, asleep}]{cat.png}"),
            vec![Inline::Image {
                src: "cat.png".into(),
                alt: Some("A cat, asleep".into())
            }]
        );
        assert_eq!(
            tokens("\\includegraphics{dog.png}"),
            vec![Inline::Image {
                src: "dog.png".into(),
                alt: None
            }]
        );
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(split_top_level("a & \\& & {x & y}", '&'), vec!["a ", " \\& ", " {x & y}"]);
    }
}
