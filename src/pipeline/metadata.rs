//! Bibliographic metadata from `<head>` and `<body>`.
//!
//! Both dialects use the same `<head>` conventions. In `<body>` the record
//! number and title live in elements with well-known ids, and xml2rfc
//! renditions carry their ToC in `#toc`; plaintext renditions get a ToC
//! built from their headings instead.

use super::sniff::HtmlDialect;
use super::toc::{headings_toc, list_toc};
use crate::dom::Element;
use crate::error::RfcHtmlError;
use crate::model::{Author, Identifier, RecordAndToc};
use tracing::{debug, warn};

/// Body ids that hold metadata.
pub const RFC_NUMBER_ID: &str = "rfcnum";
pub const TITLE_ID: &str = "title";
pub const TOC_ID: &str = "toc";

/// Fill the record from `<meta>` and `<link>` children of `<head>`.
///
/// `<title>` is ignored: it mixes the number and the title and is not
/// reliably split.
pub fn parse_head(head: &Element, acc: &mut RecordAndToc) {
    let record = &mut acc.record;
    for el in head.child_elements() {
        if el.is("meta") {
            let content = match el.attr("content") {
                Some(c) if !c.is_empty() => c,
                _ => continue,
            };
            match el.attr("name") {
                Some("author") => record.authors.push(Author::named(content)),
                Some("description") => record.abstract_text = Some(content.to_string()),
                Some("rfc.number") => match leading_number(content) {
                    Some(n) => {
                        record.set_number_once(n);
                    }
                    None => warn!("ignoring rfc.number meta {:?}", content),
                },
                Some("keyword") => record.push_keyword(content),
                _ => {}
            }
        } else if el.is("link") {
            let (Some(rel), Some(href)) = (el.attr("rel"), el.attr("href")) else {
                continue;
            };
            if rel == "alternate" && !href.is_empty() {
                match Identifier::from_alternate_href(href) {
                    Some(identifier) => record.push_identifier(identifier),
                    None => debug!("alternate link is not an identifier: {href}"),
                }
            }
        }
    }
}

/// The run of digits at the start of `value`, after leading whitespace and
/// an optional `+`. Trailing text is ignored, so `"42abc"` is 42.
fn leading_number(value: &str) -> Option<u32> {
    let value = value.trim_start();
    let value = value.strip_prefix('+').unwrap_or(value);
    let end = value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len());
    value[..end].parse().ok()
}

/// Fill the record (and ToC) from `<body>`.
///
/// Plaintext headings without an id are given one, so `body` is mutable.
pub fn parse_body(
    body: &mut Element,
    dialect: HtmlDialect,
    acc: &mut RecordAndToc,
) -> Result<(), RfcHtmlError> {
    if dialect == HtmlDialect::Plaintext {
        acc.table_of_contents = Some(headings_toc(body)?);
    }

    for el in body.child_elements() {
        match el.id() {
            Some(RFC_NUMBER_ID) if !acc.record.has_number() => {
                let digits: String = el.inner_text().chars().filter(char::is_ascii_digit).collect();
                match digits.parse::<u32>() {
                    Ok(n) => {
                        acc.record.set_number_once(n);
                    }
                    Err(_) => warn!("#{RFC_NUMBER_ID} has no usable number: {:?}", el.inner_text()),
                }
            }
            Some(TITLE_ID) => acc.record.title = el.inner_text(),
            Some(TOC_ID) if dialect == HtmlDialect::Xml2rfc => {
                acc.table_of_contents = Some(list_toc(el)?);
            }
            _ => {}
        }
    }
    Ok(())
}
