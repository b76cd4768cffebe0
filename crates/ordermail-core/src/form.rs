//! URL-encoded form decoding with bracket nesting.
//!
//! Turns `clients[0][products][1][quantity]=3` style keys into nested JSON:
//! - `name[]` appends to a sequence
//! - `name[n]` with n <= 20 addresses a sequence position (holes are compacted)
//! - any other segment is an object key
//! - a key submitted several times collects its values into a sequence
//!
//! The last rule is why a field may reach the normalizer either as a bare
//! value or as a sequence.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use url::form_urlencoded;

/// Highest bracket index still treated as a sequence position.
const ARRAY_LIMIT: usize = 20;

/// Bracket segments parsed per key; the rest becomes one literal segment.
const MAX_DEPTH: usize = 5;

/// Pairs beyond this count are dropped.
const PARAMETER_LIMIT: usize = 1000;

static BRACKET_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\[\]]*\]").expect("bracket segment pattern is valid"));

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Append,
    Index(usize),
    Key(String),
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(String),
    Array(Vec<Option<Node>>),
    Object(Vec<(String, Node)>),
}

impl Node {
    fn is_container(&self) -> bool {
        matches!(self, Node::Array(_) | Node::Object(_))
    }

    fn into_value(self) -> Value {
        match self {
            Node::Leaf(s) => Value::String(s),
            Node::Array(items) => Value::Array(items.into_iter().flatten().map(Node::into_value).collect()),
            Node::Object(entries) => {
                let mut map = Map::new();
                for (key, node) in entries {
                    map.insert(key, node.into_value());
                }
                Value::Object(map)
            }
        }
    }
}

/// Decode an `application/x-www-form-urlencoded` body.
pub fn decode_urlencoded(body: &[u8]) -> Value {
    let mut combined: Vec<(String, Node)> = Vec::new();
    let mut count = 0usize;

    for (key, value) in form_urlencoded::parse(body) {
        count += 1;
        if count > PARAMETER_LIMIT {
            tracing::warn!(limit = PARAMETER_LIMIT, "form parameter limit reached, dropping the rest");
            break;
        }
        if key.is_empty() {
            continue;
        }
        let value = value.into_owned();
        match combined.iter_mut().find(|(k, _)| *k == key) {
            Some((_, Node::Array(items))) => items.push(Some(Node::Leaf(value))),
            Some((_, existing)) => {
                let first = std::mem::replace(existing, Node::Array(Vec::new()));
                *existing = Node::Array(vec![Some(first), Some(Node::Leaf(value))]);
            }
            None => combined.push((key.into_owned(), Node::Leaf(value))),
        }
    }

    let mut root = Node::Object(Vec::new());
    for (key, leaf) in combined {
        let segments = parse_key(&key);
        if segments.is_empty() {
            continue;
        }
        root = merge(root, nest(&segments, leaf));
    }
    root.into_value()
}

fn classify(inner: &str) -> Segment {
    if inner.is_empty() {
        return Segment::Append;
    }
    match inner.parse::<usize>() {
        Ok(index) if index <= ARRAY_LIMIT && index.to_string() == inner => Segment::Index(index),
        _ => Segment::Key(inner.to_string()),
    }
}

fn parse_key(key: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut groups = BRACKET_SEGMENT.find_iter(key).peekable();

    let parent_end = groups.peek().map(|m| m.start()).unwrap_or(key.len());
    if parent_end > 0 {
        segments.push(Segment::Key(key[..parent_end].to_string()));
    }

    let mut depth = 0;
    for group in groups {
        if depth == MAX_DEPTH {
            // remainder of the key, brackets included, as one literal key
            segments.push(Segment::Key(key[group.start()..].to_string()));
            break;
        }
        depth += 1;
        let inner = &group.as_str()[1..group.as_str().len() - 1];
        segments.push(classify(inner));
    }

    // The root is always an object key, even when it looks like an index.
    if let Some(first) = segments.first_mut() {
        let root = match std::mem::replace(first, Segment::Append) {
            Segment::Append => Segment::Key(String::new()),
            Segment::Index(i) => Segment::Key(i.to_string()),
            key => key,
        };
        *first = root;
    }
    segments
}

fn nest(segments: &[Segment], leaf: Node) -> Node {
    segments.iter().rev().fold(leaf, |inner, segment| match segment {
        Segment::Append => match inner {
            Node::Array(items) => Node::Array(items),
            other => Node::Array(vec![Some(other)]),
        },
        Segment::Index(index) => {
            let mut items: Vec<Option<Node>> = std::iter::repeat_with(|| None).take(*index).collect();
            items.push(Some(inner));
            Node::Array(items)
        }
        Segment::Key(key) => Node::Object(vec![(key.clone(), inner)]),
    })
}

fn array_to_entries(items: Vec<Option<Node>>) -> Vec<(String, Node)> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| item.map(|node| (i.to_string(), node)))
        .collect()
}

fn merge_entries(mut acc: Vec<(String, Node)>, source: Vec<(String, Node)>) -> Node {
    for (key, value) in source {
        match acc.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                let current = std::mem::replace(existing, Node::Object(Vec::new()));
                *existing = merge(current, value);
            }
            None => acc.push((key, value)),
        }
    }
    Node::Object(acc)
}

fn merge(target: Node, source: Node) -> Node {
    match (target, source) {
        (target, Node::Leaf(s)) if s.is_empty() => target,
        (Node::Leaf(t), Node::Leaf(s)) => Node::Array(vec![Some(Node::Leaf(t)), Some(Node::Leaf(s))]),
        (Node::Array(mut items), Node::Leaf(s)) => {
            items.push(Some(Node::Leaf(s)));
            Node::Array(items)
        }
        (Node::Object(mut entries), Node::Leaf(s)) => {
            if !entries.iter().any(|(k, _)| *k == s) {
                entries.push((s, Node::Leaf("true".to_string())));
            }
            Node::Object(entries)
        }
        (Node::Leaf(t), Node::Array(items)) => {
            let mut joined = vec![Some(Node::Leaf(t))];
            joined.extend(items);
            Node::Array(joined)
        }
        (Node::Leaf(t), object @ Node::Object(_)) => Node::Array(vec![Some(Node::Leaf(t)), Some(object)]),
        (Node::Array(mut target), Node::Array(source)) => {
            for (i, item) in source.into_iter().enumerate() {
                let Some(item) = item else { continue };
                match target.get_mut(i).and_then(Option::take) {
                    Some(existing) if existing.is_container() && item.is_container() => {
                        target[i] = Some(merge(existing, item));
                    }
                    Some(existing) => {
                        target[i] = Some(existing);
                        target.push(Some(item));
                    }
                    None => {
                        if i >= target.len() {
                            target.resize_with(i + 1, || None);
                        }
                        target[i] = Some(item);
                    }
                }
            }
            Node::Array(target)
        }
        (Node::Array(target), Node::Object(source)) => merge_entries(array_to_entries(target), source),
        (Node::Object(target), Node::Array(source)) => merge_entries(target, array_to_entries(source)),
        (Node::Object(target), Node::Object(source)) => merge_entries(target, source),
    }
}
