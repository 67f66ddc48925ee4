//! Error types for the rfc-html-extractor library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`RfcHtmlError`]: **Fatal for one document**: the document cannot be
//!   normalised (unknown HTML dialect, malformed ToC markup, schema
//!   violation). Returned as `Err(RfcHtmlError)` from the `convert*`
//!   functions and never caught inside the pipeline.
//!
//! * [`DocumentFailure`]: **Non-fatal for a batch**: one RFC in a range
//!   failed. Stored inside [`crate::output::BatchReport`] so a run over
//!   thousands of RFCs reports the failures instead of stopping at the first.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the rfc-html-extractor library.
#[derive(Debug, Error)]
pub enum RfcHtmlError {
    // ── Fetch errors ──────────────────────────────────────────────────────
    /// Source download returned a non-2xx status or failed at the network level.
    #[error("Failed to fetch '{url}': {reason}")]
    FetchFailed { url: String, reason: String },

    /// Source download exceeded the configured timeout.
    #[error("Fetch timed out after {secs}s for '{url}'")]
    FetchTimeout { url: String, secs: u64 },

    // ── Document shape errors ─────────────────────────────────────────────
    /// Neither the generator meta tag nor a plaintext marker was found.
    #[error("Unable to sniff RFC HTML type: no xml2rfc generator and no plaintext <pre> marker. Please report this document.")]
    DialectDetection,

    /// A heading matched the ToC selector but no level could be derived.
    #[error("Unable to extract heading level from <{heading}>")]
    HeadingLevel { heading: String },

    /// The ToC container has no `<ul>` to build sections from.
    #[error("Couldn't find the root <ul> of the table of contents")]
    TocRootNotFound,

    /// A node kind outside Element/Text/Comment reached portable conversion.
    #[error("Unsupported node type '{kind}' in document body")]
    UnsupportedNodeType { kind: &'static str },

    /// The assembled document failed validation after a JSON round-trip.
    #[error("RFC {number} failed document validation:\n  {}", issues.join("\n  "))]
    SchemaValidation { number: u32, issues: Vec<String> },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// pdfium could not open the PDF bytes.
    #[error("PDF for RFC {number} is corrupt: {detail}")]
    CorruptPdf { number: u32, detail: String },

    /// pdfium returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// A rendered page could not be PNG encoded.
    #[error("Image encoding failed for page {page}: {detail}")]
    ImageEncodingFailed { page: usize, detail: String },

    // ── Storage errors ────────────────────────────────────────────────────
    /// Could not write an object to the document store.
    #[error("Failed to store '{key}' at '{path}': {source}")]
    StorageWriteFailed {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialisation failed.
    #[error("JSON serialisation failed: {0}")]
    Serialization(#[from] serde_json::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RfcHtmlError {
    /// Whether the caller can reasonably recover, e.g. by trying the PDF
    /// source after the HTML source could not be fetched.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RfcHtmlError::FetchFailed { .. } | RfcHtmlError::FetchTimeout { .. }
        )
    }
}

/// A non-fatal failure of a single RFC within a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
#[error("RFC {number}: {message}")]
pub struct DocumentFailure {
    pub number: u32,
    pub message: String,
}

impl DocumentFailure {
    pub fn new(number: u32, error: &RfcHtmlError) -> Self {
        Self {
            number,
            message: error.to_string(),
        }
    }
}
