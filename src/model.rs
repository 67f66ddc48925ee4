//! Bibliographic record and table-of-contents types.
//!
//! These are the pieces the metadata extractors and ToC builders fill in
//! while walking a document. The serialised field names are the ones
//! downstream renderers read, so most structs keep `snake_case` fields on
//! the wire and only rename where the stored format is camelCase.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Title used for every generated table of contents.
pub const TOC_TITLE: &str = "Table of Contents";

// ── Record ───────────────────────────────────────────────────────────────

/// Publication status of an RFC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RfcStatus {
    #[serde(rename = "Best Current Practice")]
    BestCurrentPractice,
    Experimental,
    Historic,
    Informational,
    #[serde(rename = "Not Issued")]
    NotIssued,
    #[serde(rename = "Internet Standard")]
    InternetStandard,
    #[default]
    Unknown,
    #[serde(rename = "Proposed Standard")]
    ProposedStandard,
    #[serde(rename = "Draft Standard")]
    DraftStandard,
}

/// Renditions an RFC is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RfcFormat {
    Xml,
    Txt,
    Html,
    Htmlized,
    Pdf,
    Ps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubseriesType {
    Bcp,
    Fyi,
    Std,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Area {
    pub acronym: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Group {
    pub acronym: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stream {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subseries {
    #[serde(rename = "type")]
    pub kind: SubseriesType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(rename = "subseriesLength", default, skip_serializing_if = "Option::is_none")]
    pub subseries_length: Option<u32>,
}

/// An author as listed in the document.
///
/// `person` is the datatracker id; documents parsed from HTML only carry a name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<u32>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Author {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierType {
    Doi,
    Issn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub kind: IdentifierType,
    pub value: String,
}

impl Identifier {
    /// Classify an alternate-link href. Anything other than a DOI or ISSN
    /// reference yields `None`.
    pub fn from_alternate_href(href: &str) -> Option<Self> {
        let kind = if href.contains("doi.org") {
            IdentifierType::Doi
        } else if href.contains("urn:issn:") {
            IdentifierType::Issn
        } else {
            return None;
        };
        Some(Self {
            kind,
            value: href.to_string(),
        })
    }
}

/// Another RFC this one obsoletes, updates, or is obsoleted/updated by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedDocument {
    pub id: u32,
    pub number: u32,
    pub title: String,
}

/// The Internet-Draft the RFC was published from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub name: String,
    pub title: String,
}

/// Bibliographic metadata of one RFC.
///
/// `number == 0` means "not yet known". Use [`Self::set_number_once`] so the
/// first source that determines the number wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BibliographicRecord {
    pub number: u32,
    pub title: String,
    pub published: String,
    pub status: RfcStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Area>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subseries: Option<Subseries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<Stream>,
    pub authors: Vec<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifiers: Option<Vec<Identifier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obsoletes: Option<Vec<RelatedDocument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obsoleted_by: Option<Vec<RelatedDocument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updates: Option<Vec<RelatedDocument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<Vec<RelatedDocument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_also: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub see_also: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<DraftReference>,
    pub formats: BTreeSet<RfcFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errata: Option<Vec<String>>,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    /// Always present on the wire, `null` when unknown.
    pub text: Option<String>,
}

impl Default for BibliographicRecord {
    /// The blank record every extraction starts from.
    fn default() -> Self {
        Self {
            number: 0,
            title: String::new(),
            published: "1950-1-1".to_string(),
            status: RfcStatus::Unknown,
            pages: Some(0),
            area: Some(Area::default()),
            subseries: None,
            group: Some(Group::default()),
            stream: Some(Stream {
                desc: Some(String::new()),
                ..Stream::default()
            }),
            authors: Vec::new(),
            identifiers: Some(Vec::new()),
            obsoletes: None,
            obsoleted_by: Some(Vec::new()),
            updates: None,
            updated_by: Some(Vec::new()),
            is_also: None,
            see_also: None,
            draft: None,
            formats: BTreeSet::new(),
            keywords: None,
            errata: None,
            abstract_text: Some(String::new()),
            text: Some(String::new()),
        }
    }
}

impl BibliographicRecord {
    /// A blank record for `number`.
    pub fn blank(number: u32) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    pub fn has_number(&self) -> bool {
        self.number != 0
    }

    /// Set the number unless an earlier source already did. Returns whether
    /// the value was taken.
    pub fn set_number_once(&mut self, number: u32) -> bool {
        if self.has_number() {
            return false;
        }
        self.number = number;
        true
    }

    pub fn push_keyword(&mut self, keyword: impl Into<String>) {
        self.keywords.get_or_insert_with(Vec::new).push(keyword.into());
    }

    pub fn push_identifier(&mut self, identifier: Identifier) {
        self.identifiers.get_or_insert_with(Vec::new).push(identifier);
    }
}

// ── Table of contents ────────────────────────────────────────────────────

/// One navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocLink {
    pub id: String,
    pub title: String,
}

impl TocLink {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A node of the ToC tree. A section without links is still valid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TocSection {
    #[serde(default)]
    pub links: Vec<TocLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<TocSection>>,
}

impl TocSection {
    pub fn with_link(link: TocLink) -> Self {
        Self {
            links: vec![link],
            sections: None,
        }
    }

    /// Child sections, created on first use.
    pub fn sections_mut(&mut self) -> &mut Vec<TocSection> {
        self.sections.get_or_insert_with(Vec::new)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOfContents {
    pub title: String,
    pub sections: Vec<TocSection>,
}

impl TableOfContents {
    pub fn new(sections: Vec<TocSection>) -> Self {
        Self {
            title: TOC_TITLE.to_string(),
            sections,
        }
    }

    /// Every link in document order.
    pub fn links(&self) -> Vec<&TocLink> {
        fn walk<'a>(sections: &'a [TocSection], out: &mut Vec<&'a TocLink>) {
            for section in sections {
                out.extend(section.links.iter());
                if let Some(children) = &section.sections {
                    walk(children, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.sections, &mut out);
        out
    }
}

// ── Accumulator ──────────────────────────────────────────────────────────

/// What the extractors fill in while walking `<head>` and `<body>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordAndToc {
    pub record: BibliographicRecord,
    pub table_of_contents: Option<TableOfContents>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_is_set_once() {
        let mut record = BibliographicRecord::default();
        assert!(record.set_number_once(42));
        assert!(!record.set_number_once(9999));
        assert_eq!(record.number, 42);
    }

    #[test]
    fn blank_record_serialises_text_as_present() {
        let mut record = BibliographicRecord::default();
        record.text = None;
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["text"], serde_json::Value::Null);
        assert_eq!(value["published"], "1950-1-1");
        assert_eq!(value["status"], "Unknown");
        assert_eq!(value["abstract"], "");
        assert!(value.get("keywords").is_none());
    }

    #[test]
    fn status_uses_display_names() {
        let v = serde_json::to_value(RfcStatus::BestCurrentPractice).unwrap();
        assert_eq!(v, json!("Best Current Practice"));
        let s: RfcStatus = serde_json::from_value(json!("Proposed Standard")).unwrap();
        assert_eq!(s, RfcStatus::ProposedStandard);
    }

    #[test]
    fn identifier_classification() {
        let doi = Identifier::from_alternate_href("https://dx.doi.org/10.17487/RFC9000").unwrap();
        assert_eq!(doi.kind, IdentifierType::Doi);
        let issn = Identifier::from_alternate_href("urn:issn:2070-1721").unwrap();
        assert_eq!(issn.kind, IdentifierType::Issn);
        assert!(Identifier::from_alternate_href("https://example.org/other").is_none());
    }

    #[test]
    fn toc_section_without_links_deserialises() {
        let section: TocSection = serde_json::from_value(json!({})).unwrap();
        assert!(section.links.is_empty());
        assert!(section.sections.is_none());
    }

    #[test]
    fn toc_links_are_listed_in_document_order() {
        let toc = TableOfContents::new(vec![
            TocSection {
                links: vec![TocLink::new("a", "A")],
                sections: Some(vec![TocSection::with_link(TocLink::new("a1", "A.1"))]),
            },
            TocSection::with_link(TocLink::new("b", "B")),
        ]);
        let ids: Vec<_> = toc.links().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["a", "a1", "b"]);
    }
}
