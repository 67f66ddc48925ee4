//! Output types: the stored document record and batch results.

use crate::dom::PortableNode;
use crate::error::DocumentFailure;
use crate::model::{BibliographicRecord, TableOfContents};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which source rendition a document was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentHtmlType {
    #[serde(rename = "plaintext")]
    Plaintext,
    #[serde(rename = "xml2rfc")]
    Xml2rfc,
    /// Built from the PDF rendition, never produced by HTML sniffing.
    #[serde(rename = "pdf-or-ps")]
    PdfOrPs,
}

impl DocumentHtmlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentHtmlType::Plaintext => "plaintext",
            DocumentHtmlType::Xml2rfc => "xml2rfc",
            DocumentHtmlType::PdfOrPs => "pdf-or-ps",
        }
    }
}

impl fmt::Display for DocumentHtmlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Longest preformatted line, in characters, across the whole document.
///
/// `max_with_anchor_suffix` additionally budgets a few characters per link
/// for the buttons renderers place after links on touch devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxPreformattedLineLength {
    pub max: usize,
    pub max_with_anchor_suffix: usize,
}

impl MaxPreformattedLineLength {
    /// Both maxima at `floor`.
    pub fn floor(floor: usize) -> Self {
        Self {
            max: floor,
            max_with_anchor_suffix: floor,
        }
    }
}

/// The normalised document as stored in the bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RfcBucketHtmlDocument {
    pub rfc: BibliographicRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_of_contents: Option<TableOfContents>,
    pub document_html_type: DocumentHtmlType,
    pub document_html_obj: Vec<PortableNode>,
    pub max_preformatted_line_length: MaxPreformattedLineLength,
}

/// A document that was converted and stored during a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub number: u32,
    pub kind: DocumentHtmlType,
    pub key: String,
}

/// Result of [`crate::convert::convert_range`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub stored: Vec<StoredDocument>,
    pub failures: Vec<DocumentFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.stored.len() + self.failures.len()
    }

    pub fn success_count(&self) -> usize {
        self.stored.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// How many stored documents came from each rendition.
    pub fn count_of(&self, kind: DocumentHtmlType) -> usize {
        self.stored.iter().filter(|d| d.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn html_type_wire_names() {
        assert_eq!(serde_json::to_value(DocumentHtmlType::PdfOrPs).unwrap(), json!("pdf-or-ps"));
        assert_eq!(DocumentHtmlType::Xml2rfc.to_string(), "xml2rfc");
    }

    #[test]
    fn document_uses_camel_case_keys() {
        let doc = RfcBucketHtmlDocument {
            rfc: BibliographicRecord::blank(1),
            table_of_contents: None,
            document_html_type: DocumentHtmlType::Plaintext,
            document_html_obj: vec![],
            max_preformatted_line_length: MaxPreformattedLineLength::floor(80),
        };
        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["documentHtmlType"], "plaintext");
        assert_eq!(v["maxPreformattedLineLength"]["maxWithAnchorSuffix"], 80);
        assert!(v.get("tableOfContents").is_none());
    }

    #[test]
    fn batch_report_counts() {
        let report = BatchReport {
            stored: vec![
                StoredDocument {
                    number: 1,
                    kind: DocumentHtmlType::PdfOrPs,
                    key: "rfc/1.json".into(),
                },
                StoredDocument {
                    number: 2,
                    kind: DocumentHtmlType::Xml2rfc,
                    key: "rfc/2.json".into(),
                },
            ],
            failures: vec![DocumentFailure {
                number: 3,
                message: "boom".into(),
            }],
        };
        assert_eq!(report.total(), 3);
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.count_of(DocumentHtmlType::PdfOrPs), 1);
        assert!(!report.is_success());
    }
}
