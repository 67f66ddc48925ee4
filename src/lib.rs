//! # rfc-html-extractor
//!
//! Normalise the published HTML (or PDF) renditions of RFCs into a
//! schema-checked JSON document that renderers can consume without parsing
//! HTML themselves.
//!
//! RFC HTML comes in two historical dialects: plaintext renditions wrapped
//! in `<pre>`, and the semantic markup written by xml2rfc v3. Both are
//! reduced to the same [`RfcBucketHtmlDocument`]: a bibliographic record, a
//! nested table of contents, the body as portable node objects, and the
//! longest preformatted line length. RFCs with no HTML rendition are
//! rasterised from PDF page by page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! HTML
//!  │
//!  ├─ 1. Sanitize   allowlist tags, attributes and URL schemes
//!  ├─ 2. Sniff      plaintext or xml2rfc
//!  ├─ 3. Metadata   record + ToC from <head> and <body>
//!  ├─ 4. Select     drop scripts and boilerplate
//!  ├─ 5. Layout     scrollable wrappers, SVG sizing (xml2rfc)
//!  ├─ 6. Links      origin-relative, canonical document routes
//!  ├─ 7. Wordbreak  <wbr> in long identifiers
//!  └─ 8. Validate   JSON round-trip of the assembled document
//!
//! PDF ─ render (pdfium) ─ encode (PNG) ─ upload ─ one PdfPage per page ─ validate
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rfc_html_extractor::{convert_html, ExtractorConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let html = std::fs::read_to_string("rfc9000.html")?;
//! let config = ExtractorConfig::default();
//! let doc = convert_html(&html, 9000, &config)?;
//! println!("{}", serde_json::to_string(&doc)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `rfc2json` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! rfc-html-extractor = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod css;
pub mod dom;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CrossDocumentLinks, ExtractorConfig, ExtractorConfigBuilder, PUBLIC_SITE};
pub use convert::{convert_html, convert_pdf, convert_range, default_image_src, process_rfc};
pub use dom::PortableNode;
pub use error::{DocumentFailure, RfcHtmlError};
pub use model::{BibliographicRecord, TableOfContents, TocLink, TocSection};
pub use output::{
    BatchReport, DocumentHtmlType, MaxPreformattedLineLength, RfcBucketHtmlDocument, StoredDocument,
};
pub use pipeline::sniff::HtmlDialect;
pub use progress::{BatchProgressCallback, NoopProgressCallback};
pub use store::{DirectoryStore, DocumentStore, KeyLayout, MemoryStore};
