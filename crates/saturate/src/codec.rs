//! Text codec for saturated trees.
//!
//! Trees are encoded as JSON. Live references and components are replaced
//! by `"$s$r<name>"` placeholders looked up in a [`RefTable`]; symbols become
//! `"$s$s<name>"`. Elements are objects tagged with
//! `"$$typeof": "$s$selement"`:
//!
//! ```json
//! {"$$typeof": "$s$selement", "type": "div", "key": null, "ref": null,
//!  "props": {"data-saturated": true, "innerHTML": "Hello <em>dear</em>"}}
//! ```
//!
//! Host children travel as `props.children` (an array); pre-rendered markup
//! as `props.innerHTML`. Component elements use a `"$s$r<name>"` type, or
//! `"$s$sfragment"` for the passthrough.
//!
//! The tagging is lexical: a plain string that happens to start with one of
//! the prefixes is decoded as a placeholder.

use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::trace;

use crate::node::{CHILDREN_PROP, ComponentElement, Content, Element, Node, Props, Symbol};
use crate::reference::{Component, HasIdentity, LiveRef, RefTable, Reference};

pub const SYMBOL_PREFIX: &str = "$s$s";
pub const REF_PREFIX: &str = "$s$r";

const TYPEOF_KEY: &str = "$$typeof";
const ELEMENT_SYMBOL: &str = "element";
const FRAGMENT_SYMBOL: &str = "fragment";
const MARKUP_PROP: &str = "innerHTML";

/// Bookkeeping keys that are never transmitted.
const STRIPPED_KEYS: &[&str] = &["_owner", "_store"];

#[derive(Debug, Error)]
pub enum CodecError {
    /// A live reference with no entry in the table reached the encoder.
    #[error("unknown reference: {key}={label}")]
    UnknownReference { key: String, label: String },
    /// A component with no entry in the table reached the encoder.
    #[error("unknown component: {0}")]
    UnknownComponent(String),
    /// A placeholder names nothing registered in the table.
    #[error("no reference registered under {0:?}")]
    UnknownName(String),
    /// An element type names a registered value that is not a component.
    #[error("{0:?} is not a component")]
    NotAComponent(String),
    #[error("malformed input: {0}")]
    Malformed(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

// ── Encoding ────────────────────────────────────────────────────────

/// Encode a tree to JSON text.
///
/// Fails if the tree contains a live reference or component that is not
/// registered in `table`.
pub fn encode(node: &Node, table: &RefTable) -> Result<String, CodecError> {
    let value = encode_value(node, table)?;
    Ok(serde_json::to_string(&value)?)
}

/// Encode a tree to a JSON value.
pub fn encode_value(node: &Node, table: &RefTable) -> Result<Value, CodecError> {
    Encoder { table }.node("", node)
}

struct Encoder<'a> {
    table: &'a RefTable,
}

impl Encoder<'_> {
    /// `key` is the property the value sits under, for error reporting.
    fn node(&self, key: &str, node: &Node) -> Result<Value, CodecError> {
        Ok(match node {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            // Non-finite numbers have no JSON form.
            Node::Number(n) => Number::from_f64(*n).map_or(Value::Null, Value::Number),
            Node::Text(s) => Value::String(s.clone()),
            Node::List(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.node(key, item))
                    .collect::<Result<_, _>>()?,
            ),
            Node::Symbol(sym) => symbol(sym.name()),
            Node::Ref(r) => self.live_ref(key, r)?,
            Node::Map(map) => Value::Object(self.props(map)?),
            Node::Element(el) => self.element(el)?,
            Node::Component(el) => self.component(el)?,
        })
    }

    fn live_ref(&self, key: &str, r: &LiveRef) -> Result<Value, CodecError> {
        match self.table.name_of(r.identity()) {
            Some(name) => Ok(Value::String(format!("{REF_PREFIX}{name}"))),
            None => Err(CodecError::UnknownReference {
                key: key.to_string(),
                label: r.label().to_string(),
            }),
        }
    }

    fn props(&self, props: &Props) -> Result<Map<String, Value>, CodecError> {
        let mut out = Map::new();
        for (name, value) in props {
            if STRIPPED_KEYS.contains(&name.as_str()) {
                continue;
            }
            out.insert(name.clone(), self.node(name, value)?);
        }
        Ok(out)
    }

    fn attach(&self, attach: Option<&LiveRef>) -> Result<Value, CodecError> {
        attach.map_or(Ok(Value::Null), |r| self.live_ref("ref", r))
    }

    fn element(&self, el: &Element) -> Result<Value, CodecError> {
        let mut props = self.props(&el.props)?;
        match &el.content {
            Content::Markup(html) => {
                props.insert(MARKUP_PROP.to_string(), Value::String(html.clone()));
            }
            Content::Children(children) if children.is_empty() => {}
            Content::Children(children) => {
                let children = children
                    .iter()
                    .map(|child| self.node(CHILDREN_PROP, child))
                    .collect::<Result<_, _>>()?;
                props.insert(CHILDREN_PROP.to_string(), Value::Array(children));
            }
        }
        Ok(envelope(
            Value::String(el.tag.clone()),
            el.key.as_deref(),
            self.attach(el.attach.as_ref())?,
            props,
        ))
    }

    fn component(&self, el: &ComponentElement) -> Result<Value, CodecError> {
        let ty = if el.component.is_passthrough() {
            symbol(FRAGMENT_SYMBOL)
        } else {
            match self.table.name_of(el.component.identity()) {
                Some(name) => Value::String(format!("{REF_PREFIX}{name}")),
                None => return Err(CodecError::UnknownComponent(el.component.name().to_string())),
            }
        };
        Ok(envelope(
            ty,
            el.key.as_deref(),
            self.attach(el.attach.as_ref())?,
            self.props(&el.props)?,
        ))
    }
}

fn symbol(name: &str) -> Value {
    Value::String(format!("{SYMBOL_PREFIX}{name}"))
}

fn envelope(ty: Value, key: Option<&str>, attach: Value, props: Map<String, Value>) -> Value {
    let mut obj = Map::new();
    obj.insert(TYPEOF_KEY.to_string(), symbol(ELEMENT_SYMBOL));
    obj.insert("type".to_string(), ty);
    obj.insert(
        "key".to_string(),
        key.map_or(Value::Null, |k| Value::String(k.to_string())),
    );
    obj.insert("ref".to_string(), attach);
    obj.insert("props".to_string(), Value::Object(props));
    Value::Object(obj)
}

// ── Decoding ────────────────────────────────────────────────────────

/// Decode JSON text produced by [`encode`], resolving placeholders against
/// `table`.
pub fn decode(text: &str, table: &RefTable) -> Result<Node, CodecError> {
    let value: Value = serde_json::from_str(text)?;
    decode_value(value, table)
}

/// Decode a JSON value produced by [`encode_value`].
pub fn decode_value(value: Value, table: &RefTable) -> Result<Node, CodecError> {
    Decoder { table }.node(value)
}

struct Decoder<'a> {
    table: &'a RefTable,
}

impl Decoder<'_> {
    fn node(&self, value: Value) -> Result<Node, CodecError> {
        Ok(match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(
                n.as_f64()
                    .ok_or_else(|| CodecError::Malformed(format!("number {n} out of range")))?,
            ),
            Value::String(s) => self.string(s)?,
            Value::Array(items) => Node::List(
                items
                    .into_iter()
                    .map(|item| self.node(item))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(obj) if is_element(&obj) => self.element(obj)?,
            Value::Object(obj) => Node::Map(self.props(obj)?),
        })
    }

    fn string(&self, s: String) -> Result<Node, CodecError> {
        if let Some(name) = s.strip_prefix(SYMBOL_PREFIX) {
            return Ok(Node::Symbol(Symbol::new(name)));
        }
        if let Some(name) = s.strip_prefix(REF_PREFIX) {
            return match self.lookup(name)? {
                Reference::Value(r) => Ok(Node::Ref(r.clone())),
                Reference::Component(c) => Err(CodecError::Malformed(format!(
                    "component {} used as a value",
                    c.name()
                ))),
            };
        }
        Ok(Node::Text(s))
    }

    fn lookup(&self, name: &str) -> Result<&Reference, CodecError> {
        self.table
            .get(name)
            .ok_or_else(|| CodecError::UnknownName(name.to_string()))
    }

    fn props(&self, obj: Map<String, Value>) -> Result<Props, CodecError> {
        let mut props = Props::with_capacity(obj.len());
        for (name, value) in obj {
            if STRIPPED_KEYS.contains(&name.as_str()) {
                continue;
            }
            let node = self.node(value)?;
            props.insert(name, node);
        }
        Ok(props)
    }

    fn element(&self, mut obj: Map<String, Value>) -> Result<Node, CodecError> {
        let key = match obj.remove("key") {
            None | Some(Value::Null) => None,
            Some(Value::String(k)) => Some(k),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(other) => return Err(CodecError::Malformed(format!("element key {other}"))),
        };
        let attach = match obj.remove("ref") {
            None | Some(Value::Null) => None,
            Some(value) => match self.node(value)? {
                Node::Ref(r) => Some(r),
                other => {
                    return Err(CodecError::Malformed(format!(
                        "element ref is not a live reference: {other:?}"
                    )));
                }
            },
        };
        let props = match obj.remove("props") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(props)) => props,
            Some(other) => return Err(CodecError::Malformed(format!("element props {other}"))),
        };
        let ty = match obj.remove("type") {
            Some(Value::String(ty)) => ty,
            other => return Err(CodecError::Malformed(format!("element type {other:?}"))),
        };

        if let Some(name) = ty.strip_prefix(SYMBOL_PREFIX) {
            if name != FRAGMENT_SYMBOL {
                return Err(CodecError::Malformed(format!("unsupported element type {ty}")));
            }
            return Ok(self.component_element(Component::fragment(), key, attach, props)?.into());
        }
        if let Some(name) = ty.strip_prefix(REF_PREFIX) {
            let component = match self.lookup(name)? {
                Reference::Component(c) => c.clone(),
                Reference::Value(_) => return Err(CodecError::NotAComponent(name.to_string())),
            };
            return Ok(self.component_element(component, key, attach, props)?.into());
        }
        self.host_element(ty, key, attach, props).map(Node::from)
    }

    fn component_element(
        &self,
        component: Component,
        key: Option<String>,
        attach: Option<LiveRef>,
        props: Map<String, Value>,
    ) -> Result<ComponentElement, CodecError> {
        Ok(ComponentElement {
            component,
            key,
            props: self.props(props)?,
            attach,
        })
    }

    fn host_element(
        &self,
        tag: String,
        key: Option<String>,
        attach: Option<LiveRef>,
        mut props: Map<String, Value>,
    ) -> Result<Element, CodecError> {
        let content = match (props.shift_remove(MARKUP_PROP), props.shift_remove(CHILDREN_PROP)) {
            (Some(Value::String(html)), _) => Content::Markup(html),
            (Some(other), _) => {
                return Err(CodecError::Malformed(format!("<{tag}> innerHTML {other}")));
            }
            (None, None | Some(Value::Null)) => Content::Children(Vec::new()),
            (None, Some(Value::Array(items))) => Content::Children(
                items
                    .into_iter()
                    .map(|item| self.node(item))
                    .collect::<Result<_, _>>()?,
            ),
            (None, Some(single)) => Content::Children(vec![self.node(single)?]),
        };
        trace!("Decoded <{}>", tag);
        Ok(Element {
            tag,
            key,
            props: self.props(props)?,
            attach,
            content,
        })
    }
}

fn is_element(obj: &Map<String, Value>) -> bool {
    obj.get(TYPEOF_KEY)
        .and_then(Value::as_str)
        .and_then(|s| s.strip_prefix(SYMBOL_PREFIX))
        == Some(ELEMENT_SYMBOL)
}
