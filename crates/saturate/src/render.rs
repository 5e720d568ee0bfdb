//! Static markup rendering.
//!
//! The saturation engine treats the renderer as a black box behind the
//! [`MarkupRenderer`] trait: a pure, deterministic function from a
//! reference-free subtree to a markup string. [`HtmlRenderer`] is the
//! default implementation.
//!
//! Elements that already carry pre-rendered markup splice it in verbatim
//! (minus the [`SATURATED_ATTR`] marker), so collapsing can bubble upward
//! through nested elements without escaping the same text twice.

use tracing::{error, trace};

use crate::node::{Content, Element, Node, Props, SATURATED_ATTR};
use crate::reference::Hooks;
use crate::util::{escape_html, format_number};

/// Elements with no closing tag.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Nested component invocations the renderer follows before giving up.
pub const MAX_RENDER_DEPTH: usize = 128;

/// Unitless style properties: numbers are emitted without `px`.
const UNITLESS_STYLES: &[&str] = &[
    "flex",
    "flexGrow",
    "flexShrink",
    "fontWeight",
    "lineHeight",
    "opacity",
    "order",
    "zIndex",
    "zoom",
];

/// Renders fully static siblings into a markup string.
pub trait MarkupRenderer {
    fn render_markup(&self, nodes: &[Node]) -> String;
}

/// Default HTML renderer.
///
/// Live references, symbols, and plain maps have no markup form and are
/// skipped. Component elements (which only reach the renderer when forced
/// static) are invoked with [`Hooks::server`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render a single node.
    pub fn render_node(&self, node: &Node) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out, 0);
        out
    }

    fn write_node(&self, node: &Node, out: &mut String, depth: usize) {
        match node {
            Node::Null | Node::Bool(_) => {}
            Node::Number(n) => out.push_str(&format_number(*n)),
            Node::Text(s) => out.push_str(&escape_html(s)),
            Node::List(items) => {
                for item in items {
                    self.write_node(item, out, depth);
                }
            }
            Node::Element(el) => self.write_element(el, out, depth),
            Node::Component(el) => {
                if depth >= MAX_RENDER_DEPTH {
                    error!(
                        "Render depth limit reached at component {}; emitting nothing",
                        el.component.name()
                    );
                    return;
                }
                match el.component.render(&el.props, &Hooks::server()) {
                    Ok(rendered) => self.write_node(&rendered, out, depth + 1),
                    Err(e) => error!(
                        "Cannot render {} to static markup: {}",
                        el.component.name(),
                        e
                    ),
                }
            }
            Node::Ref(r) => trace!("Skipping live reference {:?} in markup", r),
            Node::Symbol(_) | Node::Map(_) => {}
        }
    }

    fn write_element(&self, el: &Element, out: &mut String, depth: usize) {
        out.push('<');
        out.push_str(&el.tag);
        let saturated = el.is_saturated();
        for (name, value) in &el.props {
            if saturated && name == SATURATED_ATTR {
                continue;
            }
            write_attr(name, value, out);
        }

        if VOID_TAGS.contains(&el.tag.as_str()) {
            out.push_str("/>");
            return;
        }
        out.push('>');
        match &el.content {
            Content::Markup(html) => out.push_str(html),
            Content::Children(children) => {
                for child in children {
                    self.write_node(child, out, depth);
                }
            }
        }
        out.push_str("</");
        out.push_str(&el.tag);
        out.push('>');
    }
}

impl MarkupRenderer for HtmlRenderer {
    fn render_markup(&self, nodes: &[Node]) -> String {
        let mut out = String::new();
        for node in nodes {
            self.write_node(node, &mut out, 0);
        }
        out
    }
}

fn attr_name(name: &str) -> &str {
    match name {
        "className" => "class",
        "htmlFor" => "for",
        other => other,
    }
}

fn write_attr(name: &str, value: &Node, out: &mut String) {
    let name = attr_name(name);
    match value {
        Node::Text(s) => {
            out.push_str(&format!(" {name}=\"{}\"", escape_html(s)));
        }
        Node::Number(n) => {
            out.push_str(&format!(" {name}=\"{}\"", format_number(*n)));
        }
        Node::Bool(b) => {
            if name.starts_with("data-") || name.starts_with("aria-") {
                out.push_str(&format!(" {name}=\"{b}\""));
            } else if *b {
                out.push_str(&format!(" {name}=\"\""));
            }
        }
        Node::Map(style) if name == "style" => {
            let css = style_text(style);
            if !css.is_empty() {
                out.push_str(&format!(" style=\"{}\"", escape_html(&css)));
            }
        }
        _ => {}
    }
}

fn style_text(style: &Props) -> String {
    let mut decls = Vec::with_capacity(style.len());
    for (key, value) in style {
        let value = match value {
            Node::Text(s) => s.clone(),
            Node::Number(n) if *n != 0.0 && !UNITLESS_STYLES.contains(&key.as_str()) => {
                format!("{}px", format_number(*n))
            }
            Node::Number(n) => format_number(*n),
            _ => continue,
        };
        decls.push(format!("{}:{}", hyphenate(key), value));
    }
    decls.join(";")
}

/// `fontSize` → `font-size`.
fn hyphenate(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
