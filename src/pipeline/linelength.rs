//! Longest preformatted line of a document.

use super::sniff::HtmlDialect;
use crate::dom::{inner_html, parse_html, Element};
use crate::output::MaxPreformattedLineLength;

/// Scan every `<pre>` under `body` and return the document-wide maxima,
/// never below the dialect's floor.
///
/// The anchor-suffix variant re-parses each serialised line so inline
/// markup that spans a line is counted once per line, and adds
/// [`HtmlDialect::anchor_suffix_width`] per link on the line.
pub fn max_line_length(body: &Element, dialect: HtmlDialect) -> MaxPreformattedLineLength {
    let mut result = MaxPreformattedLineLength::floor(dialect.line_length_floor());
    let suffix = dialect.anchor_suffix_width();

    for pre in body.find_all(|e| e.is("pre")) {
        let text = pre.inner_text();
        if let Some(longest) = text.split('\n').map(|l| l.chars().count()).max() {
            result.max = result.max.max(longest);
        }

        for line in inner_html(pre).split('\n') {
            let (chars, anchors) = line_metrics(line);
            result.max_with_anchor_suffix = result.max_with_anchor_suffix.max(chars + anchors * suffix);
        }
    }
    result
}

/// Visible characters and link count of one serialised line.
fn line_metrics(line_html: &str) -> (usize, usize) {
    let doc = parse_html(&format!("<div>{line_html}</div>"));
    match doc.body() {
        Some(body) => (
            body.inner_text().chars().count(),
            body.find_all(|e| e.is("a")).len(),
        ),
        None => (0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(html: &str) -> Element {
        parse_html(html).take_body()
    }

    #[test]
    fn no_pre_yields_floor() {
        let b = body("<body><p>x</p></body>");
        assert_eq!(max_line_length(&b, HtmlDialect::Plaintext), MaxPreformattedLineLength::floor(80));
        assert_eq!(max_line_length(&b, HtmlDialect::Xml2rfc), MaxPreformattedLineLength::floor(40));
    }

    #[test]
    fn longest_line_across_all_blocks() {
        let long = "x".repeat(50);
        let b = body(&format!("<body><pre>short\n{long}</pre><div><pre>{}</pre></div></body>", "y".repeat(45)));
        let m = max_line_length(&b, HtmlDialect::Xml2rfc);
        assert_eq!(m.max, 50);
        assert_eq!(m.max_with_anchor_suffix, 50);
    }

    #[test]
    fn anchors_add_suffix_budget() {
        let line = format!("{} <a href=\"#a\">1</a> <a href=\"#b\">2</a>", "z".repeat(40));
        let b = body(&format!("<body><pre>{line}</pre></body>"));
        let m = max_line_length(&b, HtmlDialect::Xml2rfc);
        assert_eq!(m.max, 44);
        assert_eq!(m.max_with_anchor_suffix, 44 + 2 * 3);
    }

    #[test]
    fn markup_spanning_lines_counts_per_line() {
        let b = body(
            "<body><pre><span class=\"h2\"><a href=\"#s\">1</a>. Heading\nsecond line of heading that is long enough</span></pre></body>",
        );
        let m = max_line_length(&b, HtmlDialect::Plaintext);
        assert_eq!(m.max, 80);
        assert_eq!(m.max_with_anchor_suffix, 80);
    }

    #[test]
    fn multibyte_chars_count_once() {
        let b = body(&format!("<body><pre>{}</pre></body>", "é".repeat(41)));
        assert_eq!(max_line_length(&b, HtmlDialect::Xml2rfc).max, 41);
    }
}
