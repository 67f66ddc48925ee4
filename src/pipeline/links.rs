//! Link rewriting.
//!
//! Absolute links back to the public site become origin-relative, and with
//! [`CrossDocumentLinks::Canonical`] links into the legacy per-document
//! route (`/rfc/rfc9001.html`) move to the canonical route
//! (`/info/rfc9001/`). Fragment-only links are never touched.

use crate::config::{CrossDocumentLinks, ExtractorConfig};
use crate::dom::{Element, Node};
use crate::error::RfcHtmlError;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::{Position, Url};

static LEGACY_DOCUMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^rfc(\d+)").expect("valid regex"));

/// Rewrites `<a href>` values for one document.
#[derive(Debug)]
pub struct LinkRewriter<'a> {
    config: &'a ExtractorConfig,
    /// The document's own legacy URL, which relative links resolve against.
    base: Url,
    site: Url,
}

impl<'a> LinkRewriter<'a> {
    pub fn new(number: u32, config: &'a ExtractorConfig) -> Result<Self, RfcHtmlError> {
        let site = config.public_site_url()?;
        let path = format!("{}rfc{number}.html", config.legacy_path_prefix);
        let base = site
            .join(&path)
            .map_err(|e| RfcHtmlError::InvalidConfig(format!("document base '{path}': {e}")))?;
        Ok(Self { config, base, site })
    }

    /// The new value for `href`, or `None` when it stays as is.
    pub fn rewrite_href(&self, href: &str) -> Option<String> {
        if href.is_empty() || href.starts_with('#') {
            return None;
        }
        let resolved = match self.base.join(href) {
            Ok(url) => url,
            Err(e) => {
                debug!("leaving unresolvable href {href:?}: {e}");
                return None;
            }
        };

        let mut rewritten = if resolved.origin() == self.site.origin() {
            resolved[Position::BeforePath..].to_string()
        } else {
            href.to_string()
        };

        if self.config.cross_document_links == CrossDocumentLinks::Canonical {
            if let Some(canonical) = self.canonical_form(&rewritten, &resolved) {
                rewritten = canonical;
            }
        }

        (rewritten != href).then_some(rewritten)
    }

    fn canonical_form(&self, href: &str, resolved: &Url) -> Option<String> {
        let rest = href.strip_prefix(self.config.legacy_path_prefix.as_str())?;
        if resolved.path().ends_with(".pdf") {
            return None;
        }
        let digits = LEGACY_DOCUMENT.captures(rest)?.get(1)?.as_str();
        let mut canonical = self.config.canonical_path(&format!("rfc{digits}"));
        if let Some(query) = resolved.query() {
            canonical.push('?');
            canonical.push_str(query);
        }
        if let Some(fragment) = resolved.fragment() {
            canonical.push('#');
            canonical.push_str(fragment);
        }
        Some(canonical)
    }

    /// Rewrite every anchor in `nodes`.
    pub fn rewrite(&self, mut nodes: Vec<Node>) -> Vec<Node> {
        for el in nodes.iter_mut().filter_map(Node::as_element_mut) {
            self.rewrite_element(el);
        }
        nodes
    }

    fn rewrite_element(&self, el: &mut Element) {
        if el.is("a") {
            if let Some(new_href) = el.attr("href").and_then(|h| self.rewrite_href(h)) {
                debug!("href {:?} -> {:?}", el.attr("href"), new_href);
                el.set_attr("href", new_href);
            }
        }
        for child in el.child_elements_mut() {
            self.rewrite_element(child);
        }
    }
}

/// Rewrite the links of document `number`.
pub fn rewrite_links(
    nodes: Vec<Node>,
    number: u32,
    config: &ExtractorConfig,
) -> Result<Vec<Node>, RfcHtmlError> {
    Ok(LinkRewriter::new(number, config)?.rewrite(nodes))
}
