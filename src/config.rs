//! Configuration types for RFC document normalisation.
//!
//! All pipeline behaviour is controlled through [`ExtractorConfig`], built
//! via its [`ExtractorConfigBuilder`]. The defaults reproduce what the
//! public RFC site serves; tests and staging runs override the origin and
//! link policy.

use crate::error::RfcHtmlError;
use crate::pipeline::sanitize::AllowList;
use crate::progress::BatchProgressCallback;
use crate::store::KeyLayout;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Public origin the source documents are published on.
pub const PUBLIC_SITE: &str = "https://www.rfc-editor.org";

/// Configuration for converting RFC renditions.
///
/// # Example
/// ```rust
/// use rfc_html_extractor::{CrossDocumentLinks, ExtractorConfig};
///
/// let config = ExtractorConfig::builder()
///     .public_site("https://staging.rfc-editor.org")
///     .cross_document_links(CrossDocumentLinks::Preserve)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractorConfig {
    /// Origin documents are fetched from and whose absolute links are made
    /// origin-relative. Default: `https://www.rfc-editor.org`.
    pub public_site: String,

    /// Path prefix of the legacy per-document HTML route. Default: `/rfc/`.
    pub legacy_path_prefix: String,

    /// Canonical route for a document, `{id}` is replaced by e.g. `rfc9000`.
    /// Default: `/info/{id}/`.
    pub canonical_path_template: String,

    /// Whether links into the legacy route are migrated to the canonical route.
    /// Default: [`CrossDocumentLinks::Canonical`].
    pub cross_document_links: CrossDocumentLinks,

    /// Words longer than this many characters receive `<wbr>` break points. Default: 16.
    pub word_break_threshold: usize,

    /// SVGs wider than this many pixels are wrapped in a scrollable container. Default: 220.
    ///
    /// Leaves about 100px for indentation on a 320px wide display, so small
    /// inline icons render as-is.
    pub scrollable_svg_threshold_px: f64,

    /// Width and height assumed for an SVG whose size cannot be derived. Default: 320.
    pub svg_fallback_size_px: f64,

    /// Run the allowlist sanitizer right after parsing. Default: true.
    pub sanitize: bool,

    /// Tags, attributes and URL schemes kept by the sanitizer.
    pub allow_list: AllowList,

    /// Source download timeout in seconds. Default: 120.
    pub fetch_timeout_secs: u64,

    /// Pause between documents in a batch run, in milliseconds. Default: 80.
    pub request_delay_ms: u64,

    /// Target width of rasterised PDF pages in pixels. Default: 1000.
    pub pdf_render_width_px: u32,

    /// Number of concurrent page-image uploads for the PDF path. Default: 4.
    pub upload_concurrency: usize,

    /// Keys converted documents are stored under. Default: [`KeyLayout::Bucket`].
    pub key_layout: KeyLayout,

    /// Receives per-document events during batch runs.
    pub progress_callback: Option<Arc<dyn BatchProgressCallback>>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            public_site: PUBLIC_SITE.to_string(),
            legacy_path_prefix: "/rfc/".to_string(),
            canonical_path_template: "/info/{id}/".to_string(),
            cross_document_links: CrossDocumentLinks::default(),
            word_break_threshold: 16,
            scrollable_svg_threshold_px: 220.0,
            svg_fallback_size_px: 320.0,
            sanitize: true,
            allow_list: AllowList::default(),
            fetch_timeout_secs: 120,
            request_delay_ms: 80,
            pdf_render_width_px: 1000,
            upload_concurrency: 4,
            key_layout: KeyLayout::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorConfig")
            .field("public_site", &self.public_site)
            .field("legacy_path_prefix", &self.legacy_path_prefix)
            .field("canonical_path_template", &self.canonical_path_template)
            .field("cross_document_links", &self.cross_document_links)
            .field("word_break_threshold", &self.word_break_threshold)
            .field("scrollable_svg_threshold_px", &self.scrollable_svg_threshold_px)
            .field("svg_fallback_size_px", &self.svg_fallback_size_px)
            .field("sanitize", &self.sanitize)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("request_delay_ms", &self.request_delay_ms)
            .field("pdf_render_width_px", &self.pdf_render_width_px)
            .field("upload_concurrency", &self.upload_concurrency)
            .field("key_layout", &self.key_layout)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractorConfig {
    /// Create a new builder for `ExtractorConfig`.
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder {
            config: Self::default(),
        }
    }

    /// Parsed [`Self::public_site`].
    pub fn public_site_url(&self) -> Result<Url, RfcHtmlError> {
        Url::parse(&self.public_site).map_err(|e| {
            RfcHtmlError::InvalidConfig(format!("public site '{}': {e}", self.public_site))
        })
    }

    /// Canonical path for a document id such as `rfc9000`.
    pub fn canonical_path(&self, id: &str) -> String {
        self.canonical_path_template.replace("{id}", id)
    }
}

/// Builder for [`ExtractorConfig`].
#[derive(Debug)]
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    pub fn public_site(mut self, origin: impl Into<String>) -> Self {
        self.config.public_site = origin.into().trim_end_matches('/').to_string();
        self
    }

    pub fn legacy_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.legacy_path_prefix = prefix.into();
        self
    }

    pub fn canonical_path_template(mut self, template: impl Into<String>) -> Self {
        self.config.canonical_path_template = template.into();
        self
    }

    pub fn cross_document_links(mut self, policy: CrossDocumentLinks) -> Self {
        self.config.cross_document_links = policy;
        self
    }

    pub fn word_break_threshold(mut self, chars: usize) -> Self {
        self.config.word_break_threshold = chars;
        self
    }

    pub fn scrollable_svg_threshold_px(mut self, px: f64) -> Self {
        self.config.scrollable_svg_threshold_px = px;
        self
    }

    pub fn svg_fallback_size_px(mut self, px: f64) -> Self {
        self.config.svg_fallback_size_px = px;
        self
    }

    pub fn sanitize(mut self, v: bool) -> Self {
        self.config.sanitize = v;
        self
    }

    pub fn allow_list(mut self, allow_list: AllowList) -> Self {
        self.config.allow_list = allow_list;
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs;
        self
    }

    pub fn request_delay_ms(mut self, ms: u64) -> Self {
        self.config.request_delay_ms = ms;
        self
    }

    pub fn pdf_render_width_px(mut self, px: u32) -> Self {
        self.config.pdf_render_width_px = px.clamp(100, 4000);
        self
    }

    pub fn upload_concurrency(mut self, n: usize) -> Self {
        self.config.upload_concurrency = n.max(1);
        self
    }

    pub fn key_layout(mut self, layout: KeyLayout) -> Self {
        self.config.key_layout = layout;
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn BatchProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractorConfig, RfcHtmlError> {
        let c = &self.config;
        let origin = c.public_site_url()?;
        if origin.host_str().is_none() {
            return Err(RfcHtmlError::InvalidConfig(format!(
                "public site '{}' has no host",
                c.public_site
            )));
        }
        if !c.canonical_path_template.contains("{id}") {
            return Err(RfcHtmlError::InvalidConfig(format!(
                "canonical path template '{}' must contain {{id}}",
                c.canonical_path_template
            )));
        }
        if c.word_break_threshold == 0 {
            return Err(RfcHtmlError::InvalidConfig(
                "Word-break threshold must be ≥ 1".into(),
            ));
        }
        if c.scrollable_svg_threshold_px <= 0.0 || c.svg_fallback_size_px <= 0.0 {
            return Err(RfcHtmlError::InvalidConfig(
                "SVG sizes must be positive".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// What the link rewriter does with links into the legacy per-document route.
///
/// | Policy | `/rfc/rfc9001.html#section-2` becomes |
/// |--------|----------------------------------------|
/// | `Canonical` | `/info/rfc9001/#section-2` |
/// | `Preserve`  | unchanged |
///
/// Links to PDFs are never migrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrossDocumentLinks {
    /// Keep readers inside the canonical route. (default)
    #[default]
    Canonical,
    /// Leave legacy-route links as they are (origin-relative only).
    Preserve,
}
