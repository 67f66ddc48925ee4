//! `<wbr>` insertion for long unbroken words (URLs, identifiers).

use crate::dom::{Element, Node};

/// Tags whose text keeps its exact layout.
const PRESERVED: &[&str] = &["pre", "svg"];

/// Split `s` into pieces of at most `size` chars at natural boundaries.
///
/// A leading `scheme://` is kept as one piece. The rest is split before
/// every punctuation character and at lower-to-upper case transitions;
/// pieces still longer than `size` are cut at fixed widths.
pub fn chunk_string(s: &str, size: usize) -> Vec<String> {
    let size = size.max(1);
    let mut pieces = Vec::new();

    let rest = match s.find("://") {
        Some(idx) => {
            let (prefix, rest) = s.split_at(idx + 3);
            pieces.push(prefix.to_string());
            rest
        }
        None => s,
    };

    let mut current = String::new();
    let mut prev: Option<char> = None;
    for c in rest.chars() {
        let punctuation = !c.is_alphanumeric() && !c.is_whitespace();
        let camel_hump = c.is_uppercase() && prev.is_some_and(char::is_lowercase);
        if (punctuation || camel_hump) && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }
        current.push(c);
        prev = Some(c);
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
        .into_iter()
        .flat_map(|piece| split_fixed(&piece, size))
        .collect()
}

fn split_fixed(piece: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = piece.chars().collect();
    if chars.len() <= size {
        return vec![piece.to_string()];
    }
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}

/// Insert `<wbr>` into every text node outside `<pre>` and `<svg>` that
/// holds a word longer than `threshold` chars.
pub fn insert_word_breaks(nodes: Vec<Node>, threshold: usize) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Element(el) => out.push(Node::Element(break_element(el, threshold))),
            Node::Text(text) => out.extend(break_text(text, threshold)),
            other => out.push(other),
        }
    }
    out
}

fn break_element(mut el: Element, threshold: usize) -> Element {
    if PRESERVED.iter().any(|t| el.is(t)) {
        return el;
    }
    el.children = insert_word_breaks(std::mem::take(&mut el.children), threshold);
    el
}

/// Tokens of `text`, each whitespace char starting a new token.
fn tokens(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        if c.is_whitespace() && idx > start {
            out.push(&text[start..idx]);
            start = idx;
        }
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

fn break_text(text: String, threshold: usize) -> Vec<Node> {
    let tokens = tokens(&text);
    if tokens.iter().all(|t| t.chars().count() <= threshold) {
        return vec![Node::Text(text)];
    }

    let mut out: Vec<Node> = Vec::new();
    let push_text = |out: &mut Vec<Node>, s: &str| match out.last_mut() {
        Some(Node::Text(prev)) => prev.push_str(s),
        _ if !s.is_empty() => out.push(Node::text(s)),
        _ => {}
    };
    for token in tokens {
        if token.chars().count() <= threshold {
            push_text(&mut out, token);
            continue;
        }
        for part in chunk_string(token, threshold).iter().filter(|p| !p.is_empty()) {
            push_text(&mut out, part);
            out.push(Element::new("wbr").into());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_html, serialize_nodes};

    #[test]
    fn fixed_width_fallback() {
        assert_eq!(
            chunk_string("abcdefghijklmnopqrstuvwxyz", 10),
            ["abcdefghij", "klmnopqrst", "uvwxyz"]
        );
    }

    #[test]
    fn url_prefix_and_punctuation() {
        assert_eq!(
            chunk_string("https://www.example.com/path1/path2", 16),
            ["https://", "www", ".example", ".com", "/path1", "/path2"]
        );
    }

    #[test]
    fn query_string_url() {
        assert_eq!(
            chunk_string(
                "https://www.rfc-editor.org/search/rfc_search_detail.php?title=test&pubstatus%5B%5D=Any&pub_date_type=any",
                16
            ),
            [
                "https://", "www", ".rfc", "-editor", ".org", "/search", "/rfc", "_search",
                "_detail", ".php", "?title", "=test", "&pubstatus", "%5B", "%5D", "=Any", "&pub",
                "_date", "_type", "=any",
            ]
        );
    }

    #[test]
    fn screaming_snake_case() {
        assert_eq!(
            chunk_string("AROUND_THE_WORLD_AROUND_THE_WORLD", 16),
            ["AROUND", "_THE", "_WORLD", "_AROUND", "_THE", "_WORLD"]
        );
    }

    #[test]
    fn camel_case() {
        let input = format!("aroundTheWorld{}", "AroundTheWorld".repeat(7));
        let chunks = chunk_string(&input, 16);
        assert_eq!(chunks.len(), 24);
        assert_eq!(chunks[..4], ["around", "The", "World", "Around"]);
    }

    #[test]
    fn identifiers_in_code() {
        assert_eq!(
            chunk_string("DecodePacketNumber(largest_pn", 10),
            ["Decode", "Packet", "Number", "(largest", "_pn"]
        );
    }

    #[test]
    fn whitespace_stays_with_following_token() {
        assert_eq!(tokens("a bb  c"), ["a", " bb", " ", " c"]);
        assert_eq!(tokens(" lead"), [" lead"]);
        assert!(tokens("").is_empty());
    }

    #[test]
    fn long_words_get_break_opportunities() {
        let nodes = insert_word_breaks(
            vec![Node::text("see https://www.example.com/path1/path2 now")],
            16,
        );
        assert_eq!(
            serialize_nodes(&nodes),
            "see https://<wbr>www<wbr>.example<wbr>.com<wbr>/path1<wbr>/path2<wbr> now"
        );
        assert!(nodes.iter().all(|n| !matches!(n, Node::Text(t) if t.is_empty())));
        assert!(nodes
            .windows(2)
            .all(|w| !(matches!(&w[0], Node::Element(_)) && matches!(&w[1], Node::Element(_)))));
    }

    #[test]
    fn short_text_is_unchanged() {
        let nodes = insert_word_breaks(vec![Node::text(""), Node::text("short words only")], 16);
        assert_eq!(nodes, vec![Node::text(""), Node::text("short words only")]);
    }

    #[test]
    fn pre_and_svg_are_skipped() {
        let body = parse_html(
            "<body><pre>averyveryverylongidentifier_name</pre><svg><text>averyveryverylongidentifier</text></svg><p>averyveryverylongidentifier</p></body>",
        )
        .take_body();
        let html = serialize_nodes(&insert_word_breaks(body.children, 16));
        assert!(html.starts_with("<pre>averyveryverylongidentifier_name</pre>"));
        assert!(html.contains("<text>averyveryverylongidentifier</text>"));
        assert!(html.ends_with("<p>averyveryverylon<wbr>gidentifier<wbr></p>"));
    }
}
