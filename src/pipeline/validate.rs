//! Validation of the assembled document after a JSON round-trip.
//!
//! Optional fields that serialise to nothing would silently vanish from
//! storage, so the document is written to JSON, checked for the keys
//! consumers rely on, read back and compared with the original.

use crate::dom::PortableNode;
use crate::error::RfcHtmlError;
use crate::model::TocSection;
use crate::output::RfcBucketHtmlDocument;
use serde_json::Value;
use tracing::debug;

const DOCUMENT_KEYS: &[&str] = &[
    "rfc",
    "documentHtmlType",
    "documentHtmlObj",
    "maxPreformattedLineLength",
];

/// `text` must be present even when `null`.
const RECORD_KEYS: &[&str] = &[
    "number",
    "title",
    "published",
    "status",
    "authors",
    "formats",
    "text",
];

const LINE_LENGTH_KEYS: &[&str] = &["max", "maxWithAnchorSuffix"];

/// Validate `doc`, collecting every problem into one
/// [`RfcHtmlError::SchemaValidation`].
pub fn validate_document(doc: &RfcBucketHtmlDocument) -> Result<(), RfcHtmlError> {
    let json = serde_json::to_string(doc)?;
    let value: Value = serde_json::from_str(&json)?;
    let mut issues = Vec::new();

    missing_keys(&value, "", DOCUMENT_KEYS, &mut issues);
    missing_keys(&value["rfc"], "rfc.", RECORD_KEYS, &mut issues);
    missing_keys(
        &value["maxPreformattedLineLength"],
        "maxPreformattedLineLength.",
        LINE_LENGTH_KEYS,
        &mut issues,
    );

    match serde_json::from_value::<RfcBucketHtmlDocument>(value) {
        Ok(back) if back != *doc => issues.push("document changed in JSON round-trip".to_string()),
        Ok(_) => {}
        Err(e) => issues.push(format!("document does not read back: {e}")),
    }

    check_nodes(&doc.document_html_obj, "documentHtmlObj", &mut issues);
    if let Some(toc) = &doc.table_of_contents {
        check_sections(&toc.sections, "tableOfContents.sections", &mut issues);
    }

    if issues.is_empty() {
        debug!("RFC {} passed validation", doc.rfc.number);
        Ok(())
    } else {
        Err(RfcHtmlError::SchemaValidation {
            number: doc.rfc.number,
            issues,
        })
    }
}

fn missing_keys(value: &Value, prefix: &str, keys: &[&str], issues: &mut Vec<String>) {
    let Some(object) = value.as_object() else {
        issues.push(format!("{}: not an object", prefix.trim_end_matches('.')));
        return;
    };
    for key in keys {
        if !object.contains_key(*key) {
            issues.push(format!("{prefix}{key}: missing"));
        }
    }
}

fn check_nodes(nodes: &[PortableNode], path: &str, issues: &mut Vec<String>) {
    for (i, node) in nodes.iter().enumerate() {
        if let PortableNode::Element {
            node_name,
            attributes,
            children,
        } = node
        {
            let here = format!("{path}[{i}]");
            if node_name.is_empty() {
                issues.push(format!("{here}: empty nodeName"));
            }
            if attributes.keys().any(String::is_empty) {
                issues.push(format!("{here}: empty attribute name"));
            }
            check_nodes(children, &format!("{here}.children"), issues);
        }
    }
}

fn check_sections(sections: &[TocSection], path: &str, issues: &mut Vec<String>) {
    for (i, section) in sections.iter().enumerate() {
        let here = format!("{path}[{i}]");
        for (j, link) in section.links.iter().enumerate() {
            if link.id.is_empty() {
                issues.push(format!("{here}.links[{j}]: empty id"));
            }
        }
        if let Some(children) = &section.sections {
            check_sections(children, &format!("{here}.sections"), issues);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BibliographicRecord, TableOfContents, TocLink};
    use crate::output::{DocumentHtmlType, MaxPreformattedLineLength};
    use std::collections::BTreeMap;

    fn document() -> RfcBucketHtmlDocument {
        RfcBucketHtmlDocument {
            rfc: BibliographicRecord::blank(9000),
            table_of_contents: Some(TableOfContents::new(vec![TocSection::with_link(TocLink::new(
                "s-1", "Intro",
            ))])),
            document_html_type: DocumentHtmlType::Xml2rfc,
            document_html_obj: vec![PortableNode::Element {
                node_name: "p".into(),
                attributes: BTreeMap::new(),
                children: vec![PortableNode::Text {
                    text_content: "text".into(),
                }],
            }],
            max_preformatted_line_length: MaxPreformattedLineLength::floor(40),
        }
    }

    #[test]
    fn assembled_document_passes() {
        validate_document(&document()).unwrap();
    }

    #[test]
    fn null_text_is_still_present() {
        let mut doc = document();
        doc.rfc.text = None;
        validate_document(&doc).unwrap();
    }

    #[test]
    fn every_issue_is_reported() {
        let mut doc = document();
        doc.document_html_obj.push(PortableNode::Element {
            node_name: String::new(),
            attributes: BTreeMap::from([(String::new(), "x".to_string())]),
            children: vec![],
        });
        doc.table_of_contents = Some(TableOfContents::new(vec![TocSection::with_link(TocLink::new(
            "", "No id",
        ))]));
        match validate_document(&doc) {
            Err(RfcHtmlError::SchemaValidation { number, issues }) => {
                assert_eq!(number, 9000);
                assert_eq!(
                    issues,
                    [
                        "documentHtmlObj[1]: empty nodeName",
                        "documentHtmlObj[1]: empty attribute name",
                        "tableOfContents.sections[0].links[0]: empty id",
                    ]
                );
            }
            other => panic!("expected SchemaValidation, got {other:?}"),
        }
    }

    #[test]
    fn missing_keys_are_named() {
        let mut issues = Vec::new();
        missing_keys(&serde_json::json!({"number": 1}), "rfc.", &["number", "text"], &mut issues);
        assert_eq!(issues, ["rfc.text: missing"]);
        missing_keys(&Value::Null, "rfc.", &["number"], &mut issues);
        assert_eq!(issues[1], "rfc: not an object");
    }
}
