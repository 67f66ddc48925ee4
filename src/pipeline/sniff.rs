//! Dialect sniffing: which generator produced this RFC HTML?

use crate::dom::{Document, Element};
use crate::error::RfcHtmlError;
use crate::output::DocumentHtmlType;
use std::fmt;
use tracing::debug;

/// Content prefix of the generator meta tag written by xml2rfc.
const XML2RFC_GENERATOR: &str = "xml2rfc";

/// The HTML dialects the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HtmlDialect {
    /// HTML wrapped around the legacy plain-text rendition, mostly one `<pre>`.
    Plaintext,
    /// HTML written by the xml2rfc v3 toolchain.
    Xml2rfc,
}

impl HtmlDialect {
    /// Lower bound for the longest preformatted line.
    ///
    /// Plaintext RFCs are laid out for 80 columns. xml2rfc `<pre>` blocks
    /// are often ASCII art without any width convention.
    pub fn line_length_floor(self) -> usize {
        match self {
            HtmlDialect::Plaintext => 80,
            HtmlDialect::Xml2rfc => 40,
        }
    }

    /// Characters budgeted per link in a preformatted line.
    pub fn anchor_suffix_width(self) -> usize {
        match self {
            HtmlDialect::Plaintext => 1,
            HtmlDialect::Xml2rfc => 3,
        }
    }
}

impl From<HtmlDialect> for DocumentHtmlType {
    fn from(dialect: HtmlDialect) -> Self {
        match dialect {
            HtmlDialect::Plaintext => DocumentHtmlType::Plaintext,
            HtmlDialect::Xml2rfc => DocumentHtmlType::Xml2rfc,
        }
    }
}

impl fmt::Display for HtmlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(DocumentHtmlType::from(*self).as_str())
    }
}

fn is_generator_meta(el: &Element) -> bool {
    el.is("meta") && el.attr("name") == Some("generator")
}

/// Classify a parsed document.
///
/// An xml2rfc generator tag wins over any plaintext marker. The plaintext
/// marker is a `<pre>` directly under `<body>`, or a `<pre class="newpage">`
/// anywhere (older renditions nest pages in a wrapper).
pub fn sniff(doc: &Document) -> Result<HtmlDialect, RfcHtmlError> {
    if let Some(generator) = doc.find_first(is_generator_meta) {
        let content = generator.attr("content").unwrap_or_default();
        debug!("generator meta: {:?}", content);
        if content.starts_with(XML2RFC_GENERATOR) {
            return Ok(HtmlDialect::Xml2rfc);
        }
    }

    if let Some(body) = doc.body() {
        let direct_pre = body.child_elements().any(|e| e.is("pre"));
        let newpage_pre = body
            .find_first(|e| e.is("pre") && e.has_class("newpage"))
            .is_some();
        if direct_pre || newpage_pre {
            return Ok(HtmlDialect::Plaintext);
        }
    }

    Err(RfcHtmlError::DialectDetection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn generator_meta_is_xml2rfc() {
        let doc = parse_html(
            r#"<html><head><meta name="generator" content="xml2rfc 3.18.0"></head><body><pre>x</pre></body></html>"#,
        );
        assert_eq!(sniff(&doc).unwrap(), HtmlDialect::Xml2rfc);
    }

    #[test]
    fn body_pre_is_plaintext() {
        let doc = parse_html("<html><head></head><body><pre>RFC text</pre></body></html>");
        assert_eq!(sniff(&doc).unwrap(), HtmlDialect::Plaintext);
    }

    #[test]
    fn nested_newpage_pre_is_plaintext() {
        let doc = parse_html(r#"<body><div class="content"><pre class="newpage">page 1</pre></div></body>"#);
        assert_eq!(sniff(&doc).unwrap(), HtmlDialect::Plaintext);
    }

    #[test]
    fn other_generator_with_pre_is_plaintext() {
        let doc = parse_html(
            r#"<html><head><meta name="generator" content="rfcmarkup"></head><body><pre>x</pre></body></html>"#,
        );
        assert_eq!(sniff(&doc).unwrap(), HtmlDialect::Plaintext);
    }

    #[test]
    fn unknown_shape_fails() {
        let doc = parse_html("<html><body><div><pre>nested, no marker</pre></div></body></html>");
        assert!(matches!(sniff(&doc), Err(RfcHtmlError::DialectDetection)));
    }

    #[test]
    fn dialect_floors() {
        assert_eq!(HtmlDialect::Plaintext.line_length_floor(), 80);
        assert_eq!(HtmlDialect::Xml2rfc.line_length_floor(), 40);
        assert_eq!(HtmlDialect::Xml2rfc.to_string(), "xml2rfc");
    }
}
