//! Which top-level body children end up in the output document.

use super::metadata::{RFC_NUMBER_ID, TITLE_ID, TOC_ID};
use super::sniff::HtmlDialect;
use crate::dom::{Element, Node};

/// Ids dropped in every dialect.
const REMOVED_IDS: &[&str] = &[TOC_ID, "external-metadata", "internal-metadata"];

/// Ids dropped from xml2rfc bodies only; their content already went into
/// the record.
const XML2RFC_REMOVED_IDS: &[&str] = &[TITLE_ID, RFC_NUMBER_ID];

fn is_dropped(el: &Element, dialect: HtmlDialect) -> bool {
    if el.is("script") {
        return true;
    }
    if dialect == HtmlDialect::Xml2rfc && el.is("table") && el.has_class("ears") {
        return true;
    }
    match el.id() {
        Some(id) if REMOVED_IDS.contains(&id) => true,
        Some(id) => dialect == HtmlDialect::Xml2rfc && XML2RFC_REMOVED_IDS.contains(&id),
        None => false,
    }
}

/// Consume `body`, keeping its children in order minus boilerplate.
pub fn select_body(body: Element, dialect: HtmlDialect) -> Vec<Node> {
    body.children
        .into_iter()
        .filter(|node| !node.as_element().is_some_and(|el| is_dropped(el, dialect)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    const BODY: &str = r#"<body><table class="ears"><tr><td>RFC 9000</td></tr></table>
<div id="external-metadata"></div><div id="internal-metadata"></div>
<h1 id="title">QUIC</h1><div id="rfcnum">RFC 9000</div>
<div id="toc"></div><script>x()</script><p>Body</p><pre>code</pre></body>"#;

    fn kept_names(dialect: HtmlDialect) -> Vec<String> {
        select_body(parse_html(BODY).take_body(), dialect)
            .iter()
            .filter_map(Node::as_element)
            .map(|e| e.name.clone())
            .collect()
    }

    #[test]
    fn xml2rfc_drops_consumed_blocks() {
        assert_eq!(kept_names(HtmlDialect::Xml2rfc), ["p", "pre"]);
    }

    #[test]
    fn plaintext_keeps_title_and_ears() {
        assert_eq!(kept_names(HtmlDialect::Plaintext), ["table", "h1", "div", "p", "pre"]);
    }

    #[test]
    fn text_nodes_survive_in_order() {
        let nodes = select_body(parse_html("<body>a<script></script>b</body>").take_body(), HtmlDialect::Xml2rfc);
        assert_eq!(nodes, vec![Node::text("a"), Node::text("b")]);
    }
}
