//! HTML serialisation of the owned tree, following the HTML fragment
//! serialisation rules closely enough to re-parse line fragments.

use super::{Element, Node};

fn is_void(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_raw_text(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "style" | "script" | "xmp" | "iframe" | "noembed" | "noframes" | "plaintext" | "noscript"
    )
}

fn esc_text(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn esc_attr(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn write_node(node: &Node, parent: Option<&str>, out: &mut String) {
    match node {
        Node::Element(el) => write_element(el, out),
        Node::Text(t) => {
            if parent.is_some_and(is_raw_text) {
                out.push_str(t);
            } else {
                esc_text(t, out);
            }
        }
        Node::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
        Node::Doctype(name) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        Node::ProcessingInstruction { target, data } => {
            out.push_str("<?");
            out.push_str(target);
            out.push(' ');
            out.push_str(data);
            out.push('>');
        }
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for (k, v) in &el.attrs {
        out.push(' ');
        out.push_str(k);
        out.push_str("=\"");
        esc_attr(v, out);
        out.push('"');
    }
    out.push('>');
    if is_void(&el.name) {
        return;
    }
    // A leading newline directly after these start tags is dropped by the
    // parser, so it has to be doubled to survive a round trip.
    if matches!(el.name.as_str(), "pre" | "textarea" | "listing")
        && matches!(el.children.first(), Some(Node::Text(t)) if t.starts_with('\n'))
    {
        out.push('\n');
    }
    write_children(el, out);
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

fn write_children(el: &Element, out: &mut String) {
    for child in &el.children {
        write_node(child, Some(&el.name), out);
    }
}

/// Markup of the element itself and its subtree.
pub fn outer_html(el: &Element) -> String {
    let mut out = String::new();
    write_element(el, &mut out);
    out
}

/// Markup of the element's children only.
pub fn inner_html(el: &Element) -> String {
    let mut out = String::new();
    write_children(el, &mut out);
    out
}

pub fn serialize_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, None, &mut out);
    }
    out
}
