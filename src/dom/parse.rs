use super::{Element, Node};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// A parsed HTML document.
///
/// The HTML parser always synthesises `<html>`, `<head>` and `<body>`, so
/// the accessors below only return `None` for hand-built trees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn html(&self) -> Option<&Element> {
        self.children.iter().filter_map(Node::as_element).find(|e| e.is("html"))
    }

    fn html_mut(&mut self) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find(|e| e.is("html"))
    }

    pub fn head(&self) -> Option<&Element> {
        self.html()?.child_elements().find(|e| e.is("head"))
    }

    pub fn body(&self) -> Option<&Element> {
        self.html()?.child_elements().find(|e| e.is("body"))
    }

    pub fn body_mut(&mut self) -> Option<&mut Element> {
        self.html_mut()?.child_elements_mut().find(|e| e.is("body"))
    }

    /// Detach and return `<body>`, or an empty one.
    pub fn take_body(&mut self) -> Element {
        self.body_mut()
            .map(|body| std::mem::replace(body, Element::new("body")))
            .unwrap_or_else(|| Element::new("body"))
    }

    /// First element anywhere in the document matching `pred`.
    pub fn find_first<P>(&self, pred: P) -> Option<&Element>
    where
        P: Fn(&Element) -> bool + Copy,
    {
        self.children.iter().filter_map(Node::as_element).find_map(|el| {
            if pred(el) {
                Some(el)
            } else {
                el.find_first(pred)
            }
        })
    }
}

/// Parse a complete HTML document.
pub fn parse_html(html: &str) -> Document {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    Document {
        children: convert_children(&dom.document),
    }
}

fn convert_children(handle: &Handle) -> Vec<Node> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(convert_node)
        .collect()
}

fn convert_node(handle: &Handle) -> Option<Node> {
    let node = match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|a| {
                    let key = match &a.name.prefix {
                        Some(prefix) => format!("{}:{}", prefix, a.name.local),
                        None => a.name.local.to_string(),
                    };
                    (key, a.value.to_string())
                })
                .collect();
            Node::Element(Element {
                name: name.local.to_string(),
                attrs,
                children: convert_children(handle),
            })
        }
        NodeData::Text { contents } => Node::Text(contents.borrow().to_string()),
        NodeData::Comment { contents } => Node::Comment(contents.to_string()),
        NodeData::Doctype { name, .. } => Node::Doctype(name.to_string()),
        NodeData::ProcessingInstruction { target, contents } => Node::ProcessingInstruction {
            target: target.to_string(),
            data: contents.to_string(),
        },
        NodeData::Document => return None,
    };
    Some(node)
}
