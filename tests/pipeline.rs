//! Offline integration tests over the HTML fixtures in `tests/fixtures/`.
//!
//! Run with:
//!   cargo test --test pipeline

use rfc_html_extractor::model::IdentifierType;
use rfc_html_extractor::{
    convert_html, CrossDocumentLinks, DocumentHtmlType, ExtractorConfig, PortableNode,
    RfcBucketHtmlDocument, RfcHtmlError,
};
use std::path::PathBuf;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

fn plaintext() -> RfcBucketHtmlDocument {
    convert_html(&fixture("plaintext.html"), 2119, &ExtractorConfig::default()).unwrap()
}

fn xml2rfc() -> RfcBucketHtmlDocument {
    convert_html(&fixture("xml2rfc.html"), 1, &ExtractorConfig::default()).unwrap()
}

/// Every element in document order.
fn elements(nodes: &[PortableNode]) -> Vec<&PortableNode> {
    let mut out = Vec::new();
    for node in nodes {
        if let PortableNode::Element { children, .. } = node {
            out.push(node);
            out.extend(elements(children));
        }
    }
    out
}

fn named<'a>(nodes: &'a [PortableNode], name: &str) -> Vec<&'a PortableNode> {
    elements(nodes)
        .into_iter()
        .filter(|n| n.node_name() == Some(name))
        .collect()
}

fn attr<'a>(node: &'a PortableNode, key: &str) -> Option<&'a str> {
    match node {
        PortableNode::Element { attributes, .. } => attributes.get(key).map(String::as_str),
        PortableNode::Text { .. } => None,
    }
}

fn hrefs(nodes: &[PortableNode]) -> Vec<&str> {
    named(nodes, "a").into_iter().filter_map(|a| attr(a, "href")).collect()
}

fn text_of(nodes: &[PortableNode]) -> String {
    nodes
        .iter()
        .map(|n| match n {
            PortableNode::Text { text_content } => text_content.clone(),
            PortableNode::Element { children, .. } => text_of(children),
        })
        .collect()
}

// ── Plaintext dialect ────────────────────────────────────────────────────────

#[test]
fn plaintext_record_from_head() {
    let doc = plaintext();
    assert_eq!(doc.document_html_type, DocumentHtmlType::Plaintext);
    // No rfc.number in the document: the caller's number is used.
    assert_eq!(doc.rfc.number, 2119);
    assert_eq!(doc.rfc.authors.len(), 1);
    assert_eq!(doc.rfc.authors[0].name, "S. Bradner");
    assert_eq!(
        doc.rfc.keywords.as_deref(),
        Some(&["requirement levels".to_string(), "key words".to_string()][..])
    );
    let identifiers = doc.rfc.identifiers.as_ref().unwrap();
    assert_eq!(identifiers.len(), 1);
    assert_eq!(identifiers[0].kind, IdentifierType::Doi);
    assert!(doc.rfc.abstract_text.as_deref().unwrap().starts_with("In many standards"));
}

#[test]
fn plaintext_toc_from_headings() {
    let doc = plaintext();
    let toc = doc.table_of_contents.as_ref().unwrap();
    assert_eq!(toc.title, "Table of Contents");
    assert_eq!(toc.sections.len(), 2);

    let first = &toc.sections[0];
    assert_eq!(first.links[0].id, "autoid-1");
    assert_eq!(first.links[0].title, "1. MUST");
    let nested = first.sections.as_ref().unwrap();
    assert_eq!(nested[0].links[0].id, "section-1.1");
    assert_eq!(toc.sections[1].links[0].id, "autoid-2");

    // Generated ids are written back so ToC links resolve.
    let spans = named(&doc.document_html_obj, "span");
    assert!(spans.iter().any(|s| attr(s, "id") == Some("autoid-1")));
    assert!(spans.iter().any(|s| attr(s, "id") == Some("autoid-2")));
}

#[test]
fn plaintext_line_length_above_floor() {
    let doc = plaintext();
    assert_eq!(doc.max_preformatted_line_length.max, 123);
    assert_eq!(doc.max_preformatted_line_length.max_with_anchor_suffix, 123);
}

#[test]
fn plaintext_is_not_wrapped_for_layout() {
    let doc = plaintext();
    assert!(named(&doc.document_html_obj, "HorizontalScrollable").is_empty());
    assert_eq!(named(&doc.document_html_obj, "pre").len(), 2);
    assert!(named(&doc.document_html_obj, "wbr").is_empty());
}

#[test]
fn plaintext_links() {
    let doc = plaintext();
    let links = hrefs(&doc.document_html_obj);
    assert!(links.contains(&"/info/rfc2026/"), "got: {links:?}");
    assert!(links.contains(&"https://example.org/ref"));
    assert!(links.contains(&"/rfc/rfc2119.pdf"));
    assert!(links.contains(&"#section-1"));
}

// ── xml2rfc dialect ──────────────────────────────────────────────────────────

#[test]
fn xml2rfc_record() {
    let doc = xml2rfc();
    assert_eq!(doc.document_html_type, DocumentHtmlType::Xml2rfc);
    assert_eq!(doc.rfc.number, 9999);
    assert_eq!(doc.rfc.title, "Example Transport Extensions");
    let authors: Vec<_> = doc.rfc.authors.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(authors, ["Alice Example", "Bob Example"]);
    let kinds: Vec<_> = doc
        .rfc
        .identifiers
        .as_ref()
        .unwrap()
        .iter()
        .map(|i| i.kind)
        .collect();
    assert_eq!(kinds, [IdentifierType::Doi, IdentifierType::Issn]);
}

#[test]
fn xml2rfc_toc_from_nested_list() {
    let doc = xml2rfc();
    let toc = doc.table_of_contents.as_ref().unwrap();
    let ids: Vec<_> = toc.links().iter().map(|l| l.id.as_str()).collect();
    assert_eq!(
        ids,
        [
            "section-1",
            "name-introduction",
            "section-1.1",
            "name-terminology",
            "section-2",
            "name-wire-format"
        ]
    );
    assert_eq!(toc.sections.len(), 2);
    assert_eq!(toc.sections[0].sections.as_ref().unwrap().len(), 1);
    assert!(toc.sections[1].sections.is_none());
}

#[test]
fn xml2rfc_boilerplate_is_removed() {
    let doc = xml2rfc();
    let ids: Vec<_> = elements(&doc.document_html_obj)
        .into_iter()
        .filter_map(|e| attr(e, "id"))
        .collect();
    for removed in ["toc", "title", "external-metadata", "internal-metadata"] {
        assert!(!ids.contains(&removed), "{removed} should be dropped");
    }
    assert!(named(&doc.document_html_obj, "script").is_empty());
    assert!(named(&doc.document_html_obj, "table").is_empty());
    assert!(ids.contains(&"section-abstract"));
}

#[test]
fn xml2rfc_layout_wrappers() {
    let doc = xml2rfc();
    let wrappers = named(&doc.document_html_obj, "HorizontalScrollable");
    // ul, pre and the wide SVG.
    assert_eq!(wrappers.len(), 3);
    let absolute: Vec<_> = wrappers
        .iter()
        .filter(|w| attr(w, "data-component-absolute") == Some("true"))
        .collect();
    assert_eq!(absolute.len(), 1);
    assert_eq!(attr(absolute[0], "data-component-childwidth"), Some("480"));
    assert_eq!(attr(absolute[0], "data-component-childheight"), Some("120"));

    let svgs = named(&doc.document_html_obj, "svg");
    assert_eq!(svgs.len(), 2);
    assert_eq!(attr(svgs[1], "width"), Some("48"));
    assert_eq!(attr(svgs[1], "height"), Some("24"));
}

#[test]
fn xml2rfc_links_canonical() {
    let doc = xml2rfc();
    let links = hrefs(&doc.document_html_obj);
    assert!(links.contains(&"/info/rfc9000/#section-2"), "got: {links:?}");
    assert!(links.contains(&"/info/rfc8999"));
    assert!(links.contains(&"/rfc/rfc2119.pdf"));
    assert!(links.contains(&"https://example.org/spec?x=1"));
}

#[test]
fn xml2rfc_links_preserved() {
    let config = ExtractorConfig::builder()
        .cross_document_links(CrossDocumentLinks::Preserve)
        .build()
        .unwrap();
    let doc = convert_html(&fixture("xml2rfc.html"), 1, &config).unwrap();
    let links = hrefs(&doc.document_html_obj);
    assert!(links.contains(&"/rfc/rfc9000.html#section-2"), "got: {links:?}");
}

#[test]
fn xml2rfc_long_identifiers_get_word_breaks() {
    let doc = xml2rfc();
    assert!(!named(&doc.document_html_obj, "wbr").is_empty());
    // Text content is unchanged apart from the break points.
    assert!(text_of(&doc.document_html_obj).contains("max_idle_timeout_extension_value"));
    // Preformatted art is untouched.
    for pre in named(&doc.document_html_obj, "pre") {
        let PortableNode::Element { children, .. } = pre else {
            unreachable!()
        };
        assert!(named(children, "wbr").is_empty());
    }
}

#[test]
fn xml2rfc_line_length() {
    let doc = xml2rfc();
    assert_eq!(doc.max_preformatted_line_length.max, 74);
    assert_eq!(doc.max_preformatted_line_length.max_with_anchor_suffix, 74);
}

// ── Shared behaviour ─────────────────────────────────────────────────────────

#[test]
fn documents_survive_json_round_trip() {
    for doc in [plaintext(), xml2rfc()] {
        let json = serde_json::to_string(&doc).unwrap();
        let back: RfcBucketHtmlDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["rfc"].get("text").is_some());
        assert!(value.get("documentHtmlObj").is_some());
    }
}

#[test]
fn sanitizer_can_be_disabled() {
    let config = ExtractorConfig::builder().sanitize(false).build().unwrap();
    let doc = convert_html(&fixture("xml2rfc.html"), 1, &config).unwrap();
    // The body script is still dropped by selection.
    assert!(named(&doc.document_html_obj, "script").is_empty());
    let toplinks = elements(&doc.document_html_obj)
        .into_iter()
        .filter(|e| attr(e, "onclick").is_some())
        .count();
    // The only onclick handler lived in the removed ToC.
    assert_eq!(toplinks, 0);
}

#[test]
fn unknown_dialect_is_reported() {
    let err = convert_html(
        "<html><head></head><body><p>no marker</p></body></html>",
        1,
        &ExtractorConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RfcHtmlError::DialectDetection));
    assert!(!err.is_recoverable());
}

#[test]
fn xml2rfc_toc_without_list_fails() {
    let html = r#"<html><head><meta name="generator" content="xml2rfc 3.0"></head>
<body><div id="toc"><p>nothing here</p></div></body></html>"#;
    let err = convert_html(html, 1, &ExtractorConfig::default()).unwrap_err();
    assert!(matches!(err, RfcHtmlError::TocRootNotFound));
}

#[test]
fn head_number_wins_over_body_number() {
    let html = r#"<html><head><meta name="generator" content="xml2rfc 3.18.0">
<meta name="rfc.number" content="42"></head>
<body><p id="rfcnum">RFC 9999</p><h1 id="title">T</h1><p>text</p></body></html>"#;
    let doc = convert_html(html, 7, &ExtractorConfig::default()).unwrap();
    assert_eq!(doc.rfc.number, 42);
    assert!(doc.table_of_contents.is_none());
}
