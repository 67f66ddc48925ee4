//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::ExtractorConfigBuilder::progress_callback`] to receive
//! events as [`crate::convert::convert_range`] walks a range of RFC numbers.
//!
//! # Example
//!
//! ```rust
//! use rfc_html_extractor::{BatchProgressCallback, ExtractorConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     failed: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_document_error(&self, number: u32, error: &str) {
//!         self.failed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("RFC {number} failed: {error}");
//!     }
//! }
//!
//! let config = ExtractorConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { failed: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::DocumentHtmlType;
use std::sync::Arc;

/// Called by the batch driver as it processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once before the first document.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called before the source of a document is fetched.
    fn on_document_start(&self, number: u32) {
        let _ = number;
    }

    /// Called after a document was converted, validated and stored.
    fn on_document_complete(&self, number: u32, kind: DocumentHtmlType) {
        let _ = (number, kind);
    }

    /// Called when a document failed; the batch continues.
    fn on_document_error(&self, number: u32, error: &str) {
        let _ = (number, error);
    }

    /// Called once after every document in the range was attempted.
    fn on_batch_complete(&self, total_documents: usize, success_count: usize) {
        let _ = (total_documents, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractorConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        succeeded: AtomicUsize,
    }

    impl BatchProgressCallback for TrackingCallback {
        fn on_document_start(&self, _number: u32) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_complete(&self, _number: u32, _kind: DocumentHtmlType) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_document_error(&self, _number: u32, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_batch_complete(&self, _total: usize, success_count: usize) {
            self.succeeded.store(success_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(3);
        cb.on_document_start(1);
        cb.on_document_complete(1, DocumentHtmlType::Xml2rfc);
        cb.on_document_error(2, "boom");
        cb.on_batch_complete(3, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_document_start(1);
        tracker.on_document_complete(1, DocumentHtmlType::Plaintext);
        tracker.on_document_start(2);
        tracker.on_document_error(2, "Unable to sniff RFC HTML type");
        tracker.on_batch_complete(2, 1);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.succeeded.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_batch_start(10);
        cb.on_document_complete(7, DocumentHtmlType::PdfOrPs);
    }
}
