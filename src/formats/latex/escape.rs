//! Reserved character escaping.
//!
//! [`escape`] is the printer side. The tokenizer reads every escaped form back as the
//! literal character (see `inline::tokenize`), so `tokenize(escape(s))` flattens back to
//! `s` with newlines turned into spaces.

/// Escape literal text for inclusion in LaTeX source.
///
/// Single pass, so the braces of `\textbackslash{}` are never escaped again.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '#' | '$' | '%' | '&' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            // A raw newline could end the paragraph
            '\n' | '\r' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_reserved_characters() {
        assert_eq!(escape("50% of $5 & #1_a"), "50\\% of \\$5 \\& \\#1\\_a");
    }

    #[test]
    fn test_backslash_braces_are_not_escaped_twice() {
        assert_eq!(escape("a\\b"), "a\\textbackslash{}b");
        assert_eq!(escape("{x}"), "\\{x\\}");
    }

    #[test]
    fn test_tilde_and_caret() {
        assert_eq!(escape("~^"), "\\textasciitilde{}\\textasciicircum{}");
    }

    #[test]
    fn test_newline_becomes_space() {
        assert_eq!(escape("a\nb"), "a b");
    }
}
