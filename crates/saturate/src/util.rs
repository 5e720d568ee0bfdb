//! Small helpers shared by the engine, renderer, and codec.

use std::collections::HashSet;
use std::hash::Hash;

use crate::node::{Content, Node, Props};
use crate::reference::{HasIdentity, Identity, LiveRef};

/// Set of live references a subtree must keep.
pub type RefSet = HashSet<LiveRef>;

/// Union of any number of sets.
pub fn union<'a, T, I>(sets: I) -> HashSet<T>
where
    T: Eq + Hash + Clone + 'a,
    I: IntoIterator<Item = &'a HashSet<T>>,
{
    let mut out = HashSet::new();
    for set in sets {
        out.extend(set.iter().cloned());
    }
    out
}

/// Elements of `a` that are not in `b`.
pub fn difference<T: Eq + Hash + Clone>(a: &HashSet<T>, b: &HashSet<T>) -> HashSet<T> {
    a.iter().filter(|x| !b.contains(x)).cloned().collect()
}

/// References whose identity is not in `known`.
pub fn without_known<T: HasIdentity + Eq + Hash + Clone>(
    refs: &HashSet<T>,
    known: &HashSet<Identity>,
) -> HashSet<T> {
    refs.iter()
        .filter(|r| !known.contains(&r.identity()))
        .cloned()
        .collect()
}

/// Copy of `props` without the given keys.
pub fn omit_keys(props: &Props, keys: &[&str]) -> Props {
    props
        .iter()
        .filter(|(k, _)| !keys.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Every live reference reachable inside `node`, including attachment
/// handles and component properties.
pub fn collect_refs(node: &Node, out: &mut RefSet) {
    match node {
        Node::Null | Node::Bool(_) | Node::Number(_) | Node::Text(_) | Node::Symbol(_) => {}
        Node::Ref(r) => {
            out.insert(r.clone());
        }
        Node::List(items) => {
            for item in items {
                collect_refs(item, out);
            }
        }
        Node::Map(map) => {
            for (_, v) in map {
                collect_refs(v, out);
            }
        }
        Node::Element(el) => {
            for (_, v) in &el.props {
                collect_refs(v, out);
            }
            if let Some(handle) = &el.attach {
                out.insert(handle.clone());
            }
            if let Content::Children(children) = &el.content {
                for child in children {
                    collect_refs(child, out);
                }
            }
        }
        Node::Component(el) => {
            for (_, v) in &el.props {
                collect_refs(v, out);
            }
            if let Some(handle) = &el.attach {
                out.insert(handle.clone());
            }
        }
    }
}

/// Format a number the way it reads in markup: integral values without a
/// fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        n.to_string()
    }
}

/// Escape text for use in element content or a quoted attribute value.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
