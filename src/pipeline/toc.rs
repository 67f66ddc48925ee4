//! Table-of-contents reconstruction.
//!
//! Plaintext renditions have no ToC markup of their own, so the tree is
//! derived from heading levels ([`headings_toc`]). xml2rfc renditions ship
//! a nested `<ul>` inside `#toc` which is walked directly ([`list_toc`]).

use crate::dom::Element;
use crate::error::RfcHtmlError;
use crate::model::{TableOfContents, TocLink, TocSection};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static HEADING_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^h\d").expect("valid regex"));

const HEADING_TAGS: &[&str] = &["h2", "h3", "h4", "h5", "h6"];

/// Prefix of ids given to headings that have none.
pub const AUTO_ID_PREFIX: &str = "autoid-";

/// `h2, h3, h4, h5, h6, .h2, .h3, .h4, .h5, .h6`
pub fn is_toc_heading(el: &Element) -> bool {
    HEADING_TAGS.iter().any(|t| el.is(t)) || el.classes().any(|c| HEADING_TAGS.contains(&c))
}

/// Level of a heading from its tag name, or from an `hN` class when the
/// tag is not a heading.
pub fn heading_level(el: &Element) -> Result<u32, RfcHtmlError> {
    let source = if HEADING_NAME.is_match(&el.name) {
        Some(el.name.as_str())
    } else {
        el.classes().find(|c| HEADING_NAME.is_match(c))
    };
    source
        .and_then(|h| h.chars().last())
        .and_then(|c| c.to_digit(10))
        .ok_or_else(|| RfcHtmlError::HeadingLevel {
            heading: el.name.clone(),
        })
}

// ── Heading-based ────────────────────────────────────────────────────────

/// Open sections while walking headings. `path` holds the index of each
/// open section within its parent's children; its length is the current
/// depth, an empty path means only the root is open.
#[derive(Default)]
struct HeadingTocBuilder {
    root: Vec<TocSection>,
    path: Vec<usize>,
}

impl HeadingTocBuilder {
    fn children_at<'a>(
        root: &'a mut Vec<TocSection>,
        path: &[usize],
    ) -> Option<&'a mut Vec<TocSection>> {
        path.iter().try_fold(root, |sections, &i| {
            sections.get_mut(i).map(TocSection::sections_mut)
        })
    }

    /// Children of the innermost open section (or the root).
    fn container(&mut self) -> Result<&mut Vec<TocSection>, RfcHtmlError> {
        Self::children_at(&mut self.root, &self.path).ok_or_else(out_of_sync)
    }

    /// The innermost open section, `None` at the root.
    fn open_section(&mut self) -> Result<Option<&mut TocSection>, RfcHtmlError> {
        let Some((&last, parents)) = self.path.split_last() else {
            return Ok(None);
        };
        let siblings = Self::children_at(&mut self.root, parents).ok_or_else(out_of_sync)?;
        siblings.get_mut(last).map(Some).ok_or_else(out_of_sync)
    }

    fn add(&mut self, level: usize, link: TocLink) -> Result<(), RfcHtmlError> {
        self.path.truncate(level);
        while self.path.len() < level {
            let container = self.container()?;
            // Descend into the last section at this depth, creating one if
            // the document skipped a level.
            if container.is_empty() {
                container.push(TocSection::default());
            }
            let idx = container.len() - 1;
            self.path.push(idx);
        }

        if let Some(section) = self.open_section()? {
            if section.links.is_empty() {
                section.links.push(link);
                return Ok(());
            }
        }
        self.container()?.push(TocSection::with_link(link));
        Ok(())
    }
}

fn out_of_sync() -> RfcHtmlError {
    RfcHtmlError::Internal("heading ToC stack points outside the section tree".into())
}

/// Build a ToC from `h2`-`h6` headings (or `.h2`-`.h6` classes) under `body`.
///
/// The shallowest heading level found becomes the top level. Headings
/// without an id get `autoid-N` (counting from 1), written back into the
/// tree so the links resolve.
pub fn headings_toc(body: &mut Element) -> Result<TableOfContents, RfcHtmlError> {
    let levels = body
        .find_all(is_toc_heading)
        .into_iter()
        .map(heading_level)
        .collect::<Result<Vec<_>, _>>()?;
    let Some(&min_level) = levels.iter().min() else {
        debug!("no headings found for the table of contents");
        return Ok(TableOfContents::new(Vec::new()));
    };

    let mut builder = HeadingTocBuilder::default();
    let mut auto_ids = 0usize;
    body.try_for_each_descendant_mut(&mut |el: &mut Element| {
        if !is_toc_heading(el) {
            return Ok(());
        }
        let level = (heading_level(el)? - min_level) as usize;
        let title = el.inner_text();
        let id = match el.id() {
            Some(id) => id.to_string(),
            None => {
                auto_ids += 1;
                let id = format!("{AUTO_ID_PREFIX}{auto_ids}");
                el.set_attr("id", id.clone());
                id
            }
        };
        builder.add(level, TocLink::new(id, title))
    })?;

    Ok(TableOfContents::new(builder.root))
}

// ── List-based ───────────────────────────────────────────────────────────

/// Build a ToC from the nested list inside an xml2rfc `#toc` container.
pub fn list_toc(container: &Element) -> Result<TableOfContents, RfcHtmlError> {
    let root = container
        .find_first(|e| e.is("ul"))
        .ok_or(RfcHtmlError::TocRootNotFound)?;
    Ok(TableOfContents::new(list_sections(root)))
}

fn list_sections(ul: &Element) -> Vec<TocSection> {
    ul.child_elements()
        .filter(|e| e.is("li"))
        .map(list_item_section)
        .collect()
}

fn list_item_section(li: &Element) -> TocSection {
    let mut links = Vec::new();
    for child in li.child_elements().filter(|e| !e.is("ul")) {
        let mut anchors = Vec::new();
        if child.is("a") {
            anchors.push(child);
        }
        anchors.extend(child.find_all(|e| e.is("a")));

        // Pilcrows are self-reference markers, not entries.
        for anchor in anchors.into_iter().filter(|a| !a.has_class("pilcrow")) {
            if let Some(link) = toc_link(anchor) {
                links.push(link);
            }
        }
    }

    let subsections: Vec<TocSection> = li
        .child_elements()
        .filter(|e| e.is("ul"))
        .flat_map(list_sections)
        .collect();

    TocSection {
        links,
        sections: (!subsections.is_empty()).then_some(subsections),
    }
}

fn toc_link(anchor: &Element) -> Option<TocLink> {
    match anchor.attr("href") {
        Some(href) if href.starts_with('#') => {
            let title = anchor.inner_text();
            if title.is_empty() {
                debug!("skipping ToC anchor {href} without text");
                return None;
            }
            Some(TocLink::new(&href[1..], title))
        }
        href => {
            warn!("skipping non-ToC link in ToC: {:?}", href);
            None
        }
    }
}
