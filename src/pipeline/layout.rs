//! Layout rewriting for narrow viewports.
//!
//! Lists, tables, preformatted blocks and wide SVGs are wrapped in a
//! `HorizontalScrollable` component so the renderer can scroll them
//! sideways instead of overflowing the page. Wrapping is never nested.

use crate::config::ExtractorConfig;
use crate::css;
use crate::dom::{Element, Node, COMPONENT_ATTR};
use tracing::{debug, warn};

/// Component name of the scroll wrapper.
pub const SCROLLABLE_COMPONENT: &str = "HorizontalScrollable";

const SCROLLABLE_CLASS: &str = "w-full max-w-screen overflow-x-auto";

const WIDE_BLOCKS: &[&str] = &["ol", "ul", "pre", "table"];

const BLEED_STYLE: &str =
    "margin-left: var(--layout-bleed-left, 10px); margin-right: var(--layout-bleed-right, 10px);";

/// Rewrite a node list for layout.
pub fn rewrite_for_layout(nodes: Vec<Node>, config: &ExtractorConfig) -> Vec<Node> {
    rewrite_nodes(nodes, false, config)
}

fn rewrite_nodes(nodes: Vec<Node>, inside_scrollable: bool, config: &ExtractorConfig) -> Vec<Node> {
    nodes
        .into_iter()
        .map(|node| match node {
            Node::Element(el) => rewrite_element(el, inside_scrollable, config),
            other => other,
        })
        .collect()
}

fn rewrite_element(mut el: Element, inside_scrollable: bool, config: &ExtractorConfig) -> Node {
    if !inside_scrollable && WIDE_BLOCKS.iter().any(|t| el.is(t)) {
        el.children = rewrite_nodes(std::mem::take(&mut el.children), true, config);
        return scrollable(el).into();
    }

    if !inside_scrollable && el.is("svg") {
        let (width, height) = svg_size(&el, config.svg_fallback_size_px);
        el.set_attr("width", width.to_string());
        el.set_attr("height", height.to_string());

        if width > config.scrollable_svg_threshold_px {
            el.children = rewrite_nodes(std::mem::take(&mut el.children), true, config);
            let style = match el.attr("style").map(str::trim_end) {
                Some(existing) if !existing.is_empty() => {
                    format!("{}; {BLEED_STYLE}", existing.trim_end_matches(';'))
                }
                _ => BLEED_STYLE.to_string(),
            };
            el.set_attr("style", style);
            return scrollable(el)
                .with_attr("data-component-absolute", "true")
                .with_attr("data-component-childwidth", width.to_string())
                .with_attr("data-component-childheight", height.to_string())
                .into();
        }
        debug!("svg {width}x{height} fits without scrolling");
        el.children = rewrite_nodes(std::mem::take(&mut el.children), false, config);
        return el.into();
    }

    el.children = rewrite_nodes(std::mem::take(&mut el.children), inside_scrollable, config);
    el.into()
}

fn scrollable(child: Element) -> Element {
    Element::new("div")
        .with_attr(COMPONENT_ATTR, SCROLLABLE_COMPONENT)
        .with_attr("class", SCROLLABLE_CLASS)
        .with_child(child)
}

/// Pixel size of an SVG: its `width`/`height` attributes, else its
/// `viewBox`, else `fallback` for both.
fn svg_size(svg: &Element, fallback: f64) -> (f64, f64) {
    let width = svg.attr("width").and_then(css::dimension_to_px);
    let height = svg.attr("height").and_then(css::dimension_to_px);
    if let (Some(w), Some(h)) = (width, height) {
        return (w, h);
    }
    if let Some(size) = svg.attr("viewBox").and_then(view_box_size) {
        return size;
    }
    warn!(
        "svg has no usable size (width={:?} height={:?}), assuming {fallback}px",
        svg.attr("width"),
        svg.attr("height")
    );
    (fallback, fallback)
}

/// `x1 y1 x2 y2`, separated by whitespace and/or commas.
fn view_box_size(view_box: &str) -> Option<(f64, f64)> {
    let numbers = view_box
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok().filter(|n| n.is_finite()))
        .collect::<Option<Vec<_>>>()?;
    match numbers[..] {
        [x1, y1, x2, y2] => Some((x2 - x1, y2 - y1)),
        _ => None,
    }
}
