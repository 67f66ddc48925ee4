//! Owned document tree.
//!
//! html5ever parses into a reference-counted DOM; we copy that once into a
//! plain recursive tree ([`Node`] / [`Element`]) that the pipeline stages
//! can consume and rebuild by value. Stages take `Vec<Node>` and return a
//! new `Vec<Node>` instead of mutating shared handles.
//!
//! ```text
//! &str ──parse──▶ Document ──stages──▶ Vec<Node> ──portable──▶ Vec<PortableNode>
//! ```

mod parse;
mod portable;
mod serialize;

pub use parse::{parse_html, Document};
pub use portable::{from_portable, to_portable, PortableNode};
pub use serialize::{inner_html, outer_html, serialize_nodes};

/// Attribute whose value replaces the tag name in portable output.
pub const COMPONENT_ATTR: &str = "data-component";

/// A node of the owned tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    Doctype(String),
    ProcessingInstruction { target: String, data: String },
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Flattened text: element children recurse, text contributes its
    /// content, everything else contributes nothing.
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
            Node::Text(t) => out.push_str(t),
            _ => {}
        }
    }

    /// Short name of the node kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Element(_) => "element",
            Node::Text(_) => "text",
            Node::Comment(_) => "comment",
            Node::Doctype(_) => "doctype",
            Node::ProcessingInstruction { .. } => "processing-instruction",
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Local name as parsed; HTML tags are lower-case, SVG tags keep their
    /// camelCase spelling (`clipPath`).
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Case-insensitive tag comparison.
    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the value of `name`, or append it if absent.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(idx).1)
    }

    /// The `id` attribute, ignoring an empty value.
    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// First descendant element (pre-order, excluding `self`) matching `pred`.
    pub fn find_first<P>(&self, pred: P) -> Option<&Element>
    where
        P: Fn(&Element) -> bool + Copy,
    {
        for child in self.child_elements() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_first(pred) {
                return Some(found);
            }
        }
        None
    }

    /// All descendant elements matching `pred`, in document order.
    pub fn find_all<P>(&self, pred: P) -> Vec<&Element>
    where
        P: Fn(&Element) -> bool + Copy,
    {
        fn walk<'a, P: Fn(&Element) -> bool + Copy>(el: &'a Element, pred: P, out: &mut Vec<&'a Element>) {
            for child in el.child_elements() {
                if pred(child) {
                    out.push(child);
                }
                walk(child, pred, out);
            }
        }
        let mut out = Vec::new();
        walk(self, pred, &mut out);
        out
    }

    /// Visit every descendant element in document order, stopping at the
    /// first error.
    pub fn try_for_each_descendant_mut<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&mut Element) -> Result<(), E>,
    {
        for child in self.child_elements_mut() {
            f(child)?;
            child.try_for_each_descendant_mut(f)?;
        }
        Ok(())
    }
}
