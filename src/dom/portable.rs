//! Portable (storage) form of the tree.

use super::{Element, Node, COMPONENT_ATTR};
use crate::error::RfcHtmlError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialisable node: `{"type":"Element",...}` or `{"type":"Text",...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PortableNode {
    Element {
        #[serde(rename = "nodeName")]
        node_name: String,
        attributes: BTreeMap<String, String>,
        children: Vec<PortableNode>,
    },
    Text {
        #[serde(rename = "textContent")]
        text_content: String,
    },
}

impl PortableNode {
    pub fn node_name(&self) -> Option<&str> {
        match self {
            PortableNode::Element { node_name, .. } => Some(node_name),
            PortableNode::Text { .. } => None,
        }
    }
}

/// Convert a node list to its portable form.
///
/// Comments are dropped. Doctypes and processing instructions are not
/// expected in document content and fail the conversion.
pub fn to_portable(nodes: &[Node]) -> Result<Vec<PortableNode>, RfcHtmlError> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Element(el) => out.push(element_to_portable(el)?),
            Node::Text(t) => out.push(PortableNode::Text {
                text_content: t.clone(),
            }),
            Node::Comment(_) => {}
            Node::Doctype(_) | Node::ProcessingInstruction { .. } => {
                return Err(RfcHtmlError::UnsupportedNodeType { kind: node.kind() });
            }
        }
    }
    Ok(out)
}

fn element_to_portable(el: &Element) -> Result<PortableNode, RfcHtmlError> {
    let node_name = match el.attr(COMPONENT_ATTR) {
        Some(component) if !component.is_empty() => component.to_string(),
        _ => el.name.to_ascii_lowercase(),
    };
    Ok(PortableNode::Element {
        node_name,
        attributes: el.attrs.iter().cloned().collect(),
        children: to_portable(&el.children)?,
    })
}

/// Rebuild an owned tree from portable nodes.
///
/// Component elements come back under their component name; since they
/// keep their `data-component` attribute, converting again gives the same
/// portable nodes.
pub fn from_portable(nodes: &[PortableNode]) -> Vec<Node> {
    nodes
        .iter()
        .map(|node| match node {
            PortableNode::Element {
                node_name,
                attributes,
                children,
            } => Node::Element(Element {
                name: node_name.clone(),
                attrs: attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
                children: from_portable(children),
            }),
            PortableNode::Text { text_content } => Node::Text(text_content.clone()),
        })
        .collect()
}
