//! Allowlist sanitizer, run on the parsed tree before any extraction.
//!
//! Elements whose tag is not allowed are unwrapped (their children are
//! kept), except for a few tags whose content is never document text.
//! Attributes not allowed for the tag are removed, as are URL attributes
//! with a scheme outside the allowlist. Comments, doctypes and processing
//! instructions are dropped.

use crate::dom::{Document, Element, Node};
use std::collections::{BTreeMap, BTreeSet};

const DEFAULT_TAGS: &[&str] = &[
    // sectioning and blocks
    "address", "article", "aside", "footer", "header", "h1", "h2", "h3", "h4", "h5", "h6",
    "hgroup", "main", "nav", "section", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "hr", "li", "ol", "p", "pre", "ul",
    // inline
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em", "i", "kbd",
    "mark", "q", "rb", "rp", "rt", "rtc", "ruby", "s", "samp", "small", "span", "strong",
    "sub", "sup", "time", "u", "var", "wbr",
    // tables
    "caption", "col", "colgroup", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
    // document
    "html", "head", "body", "meta", "title", "link", "img",
    // svg
    "svg", "g", "defs", "stop", "path", "rect", "circle", "ellipse", "polygon", "polyline",
    "line", "text", "tspan", "tbreak", "textPath", "image", "use", "clipPath", "mask",
    "pattern", "solidColor", "linearGradient", "radialGradient",
];

const SVG_PRESENTATION: &[&str] = &[
    "role",
    "fill",
    "fill-rule",
    "clip-rule",
    "stroke",
    "stroke-width",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "transform",
    "transform-origin",
    "rotate",
    "text-anchor",
    "font-family",
    "font-size",
];

const DEFAULT_SCHEMES: &[&str] = &["data", "http", "https", "tel", "ftp", "mailto", "urn"];

/// Tags removed together with everything inside them.
const DROP_WITH_CONTENT: &[&str] = &["script", "style", "textarea", "option", "noscript"];

/// Attributes holding URLs whose scheme is checked.
const URL_ATTRS: &[&str] = &["href", "src", "cite", "action", "xlink:href"];

/// Tags, attributes and URL schemes that survive sanitisation.
///
/// Names are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    pub tags: BTreeSet<String>,
    /// Allowed on every tag.
    pub global_attrs: BTreeSet<String>,
    pub tag_attrs: BTreeMap<String, BTreeSet<String>>,
    pub schemes: BTreeSet<String>,
}

fn lower_set<'a>(items: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    items.into_iter().map(|s| s.to_ascii_lowercase()).collect()
}

impl Default for AllowList {
    fn default() -> Self {
        let with_svg = |extra: &[&'static str]| {
            lower_set(extra.iter().copied().chain(SVG_PRESENTATION.iter().copied()))
        };
        let mut tag_attrs = BTreeMap::new();
        tag_attrs.insert("a".into(), lower_set(["href", "rel"]));
        tag_attrs.insert("meta".into(), lower_set(["name", "content"]));
        tag_attrs.insert("time".into(), lower_set(["datetime"]));
        tag_attrs.insert("td".into(), lower_set(["colspan", "rowspan"]));
        tag_attrs.insert("th".into(), lower_set(["colspan", "rowspan"]));
        tag_attrs.insert("ol".into(), lower_set(["start", "type", "reversed"]));
        tag_attrs.insert("link".into(), lower_set(["rel", "href"]));
        tag_attrs.insert(
            "img".into(),
            lower_set(["src", "srcset", "alt", "title", "width", "height", "loading"]),
        );
        tag_attrs.insert(
            "svg".into(),
            with_svg(&["xmlns", "version", "width", "height", "viewBox", "preserveAspectRatio"]),
        );
        tag_attrs.insert("desc".into(), with_svg(&[]));
        tag_attrs.insert("use".into(), with_svg(&["x", "y", "width", "height", "href", "xlink:href"]));
        tag_attrs.insert("g".into(), with_svg(&["label"]));
        tag_attrs.insert("path".into(), with_svg(&["d", "pathLength"]));
        tag_attrs.insert("text".into(), with_svg(&["x", "y"]));
        tag_attrs.insert("circle".into(), with_svg(&["cx", "cy", "r"]));
        tag_attrs.insert("ellipse".into(), with_svg(&["cx", "cy", "rx", "ry"]));
        tag_attrs.insert("textpath".into(), with_svg(&["href", "startOffset"]));
        tag_attrs.insert("tspan".into(), with_svg(&["x", "y", "startOffset"]));
        tag_attrs.insert("polygon".into(), with_svg(&["points"]));
        tag_attrs.insert("polyline".into(), with_svg(&["points"]));
        tag_attrs.insert(
            "lineargradient".into(),
            with_svg(&["x1", "x2", "y1", "y2", "gradientUnits", "spreadMethod"]),
        );
        tag_attrs.insert("rect".into(), with_svg(&["x", "y", "width", "height", "rx", "ry"]));
        tag_attrs.insert(
            "radialgradient".into(),
            with_svg(&["cx", "cy", "r", "fx", "fy", "fr", "gradientUnits", "spreadMethod"]),
        );

        Self {
            tags: lower_set(DEFAULT_TAGS.iter().copied()),
            global_attrs: lower_set(["id", "class", "style", "dir"]),
            tag_attrs,
            schemes: lower_set(DEFAULT_SCHEMES.iter().copied()),
        }
    }
}

impl AllowList {
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag.to_ascii_lowercase())
    }

    pub fn allows_attr(&self, tag: &str, attr: &str) -> bool {
        let attr = attr.to_ascii_lowercase();
        self.global_attrs.contains(&attr)
            || self
                .tag_attrs
                .get(&tag.to_ascii_lowercase())
                .is_some_and(|attrs| attrs.contains(&attr))
    }

    /// Relative URLs always pass; absolute ones need an allowed scheme.
    pub fn allows_url(&self, value: &str) -> bool {
        match url_scheme(value) {
            Some(scheme) => self.schemes.contains(&scheme.to_ascii_lowercase()),
            None => true,
        }
    }
}

fn url_scheme(value: &str) -> Option<&str> {
    let value = value.trim_start();
    let (scheme, _) = value.split_once(':')?;
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    (starts_alpha && rest_ok).then_some(scheme)
}

/// Sanitise a whole document.
pub fn sanitize_document(doc: Document, allow: &AllowList) -> Document {
    Document {
        children: sanitize_nodes(doc.children, allow),
    }
}

/// Sanitise a node list.
pub fn sanitize_nodes(nodes: Vec<Node>, allow: &AllowList) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Element(el) => sanitize_element(el, allow, &mut out),
            Node::Text(t) => out.push(Node::Text(t)),
            Node::Comment(_) | Node::Doctype(_) | Node::ProcessingInstruction { .. } => {}
        }
    }
    out
}

fn sanitize_element(mut el: Element, allow: &AllowList, out: &mut Vec<Node>) {
    if DROP_WITH_CONTENT.iter().any(|t| el.is(t)) {
        return;
    }
    let children = sanitize_nodes(std::mem::take(&mut el.children), allow);
    if !allow.allows_tag(&el.name) {
        out.extend(children);
        return;
    }
    let tag = el.name.clone();
    el.attrs.retain(|(k, v)| {
        allow.allows_attr(&tag, k)
            && (!URL_ATTRS.iter().any(|u| k.eq_ignore_ascii_case(u)) || allow.allows_url(v))
    });
    el.children = children;
    out.push(Node::Element(el));
}
