//! Answer markup formatter.
//!
//! Generated answers use a constrained inline markup: doubled emphasis
//! markers (`**bold**`), single markers (`*italic*`), and blank lines as
//! paragraph breaks. The formatter parses that into a typed node tree that
//! the rendering layer walks explicitly; raw markup strings are never
//! concatenated, and the HTML renderer escapes every text node, so untrusted
//! answer text cannot inject markup.
//!
//! Formatting is deterministic but not idempotent; callers format the raw
//! answer text exactly once.

#![allow(dead_code)]

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
    Italic(String),
}

/// One paragraph of the formatted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph(pub Vec<Inline>);

/// Parses answer text into paragraphs of inline nodes.
///
/// A blank line ends a paragraph, and every remaining line becomes its own
/// paragraph. Emphasis capture is non-greedy and non-nesting: a marker pair
/// encloses the shortest non-empty run, and unmatched markers stay literal.
pub fn format(text: &str) -> Vec<Paragraph> {
    text.split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| Paragraph(parse_inline(line)))
        .collect()
}

fn parse_inline(line: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut plain = String::new();
    let mut i = 0;

    while i < line.len() {
        if line.as_bytes()[i] == b'*' {
            let doubled = line[i..].starts_with("**");
            let marker = if doubled { "**" } else { "*" };
            let body_start = i + marker.len();
            if let Some(close) = find_closer(&line[body_start..], marker) {
                flush(&mut out, &mut plain);
                let body = line[body_start..body_start + close].to_string();
                out.push(if doubled {
                    Inline::Bold(body)
                } else {
                    Inline::Italic(body)
                });
                i = body_start + close + marker.len();
            } else {
                plain.push_str(marker);
                i = body_start;
            }
            continue;
        }
        let ch = line[i..].chars().next().unwrap();
        plain.push(ch);
        i += ch.len_utf8();
    }

    flush(&mut out, &mut plain);
    out
}

/// Position of the closing marker, requiring at least one enclosed character.
fn find_closer(s: &str, marker: &str) -> Option<usize> {
    s.find(marker).filter(|&pos| pos > 0)
}

fn flush(out: &mut Vec<Inline>, plain: &mut String) {
    if !plain.is_empty() {
        out.push(Inline::Text(std::mem::take(plain)));
    }
}

/// Renders the node tree as HTML with every text node escaped.
pub fn to_html(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .map(|Paragraph(inlines)| {
            let body: String = inlines
                .iter()
                .map(|node| match node {
                    Inline::Text(t) => escape_html(t),
                    Inline::Bold(t) => format!("<strong>{}</strong>", escape_html(t)),
                    Inline::Italic(t) => format!("<em>{}</em>", escape_html(t)),
                })
                .collect();
            format!("<p>{body}</p>")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_bold_and_italic_are_distinct() {
        let paragraphs = format("**bold** and *italic*");
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(
            paragraphs[0].0,
            vec![
                Inline::Bold("bold".to_string()),
                text(" and "),
                Inline::Italic("italic".to_string()),
            ]
        );
    }

    #[test]
    fn test_plain_text_is_single_paragraph() {
        let paragraphs = format("no markers here");
        assert_eq!(paragraphs, vec![Paragraph(vec![text("no markers here")])]);
    }

    #[test]
    fn test_blank_line_splits_paragraphs() {
        let paragraphs = format("first\n\nsecond");
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].0, vec![text("first")]);
        assert_eq!(paragraphs[1].0, vec![text("second")]);
    }

    #[test]
    fn test_each_line_is_its_own_paragraph() {
        let paragraphs = format("one\ntwo\nthree");
        assert_eq!(paragraphs.len(), 3);
    }

    #[test]
    fn test_capture_is_non_greedy() {
        // Shortest enclosed run wins: "**a** b **c**" is two bold spans.
        let paragraphs = format("**a** b **c**");
        assert_eq!(
            paragraphs[0].0,
            vec![
                Inline::Bold("a".to_string()),
                text(" b "),
                Inline::Bold("c".to_string()),
            ]
        );
    }

    #[test]
    fn test_unmatched_marker_stays_literal() {
        let paragraphs = format("5 * 3 equals 15");
        assert_eq!(paragraphs[0].0, vec![text("5 * 3 equals 15")]);
    }

    #[test]
    fn test_empty_pair_is_not_emphasis() {
        let paragraphs = format("a ** b");
        assert_eq!(paragraphs[0].0, vec![text("a ** b")]);
    }

    #[test]
    fn test_html_escapes_text_nodes() {
        let html = to_html(&format("**<b>** & <script>"));
        assert_eq!(
            html,
            "<p><strong>&lt;b&gt;</strong> &amp; &lt;script&gt;</p>"
        );
    }

    #[test]
    fn test_html_paragraphs_joined_by_newline() {
        let html = to_html(&format("a\n\nb"));
        assert_eq!(html, "<p>a</p>\n<p>b</p>");
    }

    #[test]
    fn test_multibyte_text_survives() {
        let paragraphs = format("café **crème**");
        assert_eq!(
            paragraphs[0].0,
            vec![text("café "), Inline::Bold("crème".to_string())]
        );
    }
}
