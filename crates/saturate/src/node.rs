//! The UI node tree.
//!
//! [`Node`] is a closed sum type: every pass over the tree (saturation,
//! markup rendering, encoding) matches on it exhaustively.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::reference::{Component, LiveRef};

/// Boolean attribute stamped on host elements whose children were replaced
/// by pre-rendered markup.
pub const SATURATED_ATTR: &str = "data-saturated";

/// Property under which component elements receive nested content.
pub const CHILDREN_PROP: &str = "children";

// ── Node ────────────────────────────────────────────────────────────

/// One value in the UI tree.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Ordered siblings.
    List(Vec<Node>),
    /// A host element: tag, attributes, children.
    Element(Box<Element>),
    /// A deferred computation: component identity plus properties.
    Component(Box<ComponentElement>),
    /// A non-serializable value preserved as-is.
    Ref(LiveRef),
    /// A registered symbolic constant.
    Symbol(Symbol),
    /// Plain structured data (records passed as properties and the like).
    Map(Props),
}

impl Node {
    /// Strings, numbers, booleans and null.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Node::Null | Node::Bool(_) | Node::Number(_) | Node::Text(_)
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Node::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_live_ref(&self) -> Option<&LiveRef> {
        match self {
            Node::Ref(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Props> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentElement> {
        match self {
            Node::Component(el) => Some(el),
            _ => None,
        }
    }

    /// Build a list node from anything convertible.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Node>,
    {
        Node::List(items.into_iter().map(Into::into).collect())
    }

    /// Wrap siblings in the passthrough component.
    pub fn fragment<I, T>(children: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Node>,
    {
        Component::fragment()
            .element()
            .prop(CHILDREN_PROP, Node::list(children))
            .into()
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Text(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Text(s)
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl From<f64> for Node {
    fn from(n: f64) -> Self {
        Node::Number(n)
    }
}

impl From<i32> for Node {
    fn from(n: i32) -> Self {
        Node::Number(f64::from(n))
    }
}

impl From<u32> for Node {
    fn from(n: u32) -> Self {
        Node::Number(f64::from(n))
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(Box::new(el))
    }
}

impl From<ComponentElement> for Node {
    fn from(el: ComponentElement) -> Self {
        Node::Component(Box::new(el))
    }
}

impl From<LiveRef> for Node {
    fn from(r: LiveRef) -> Self {
        Node::Ref(r)
    }
}

impl From<&LiveRef> for Node {
    fn from(r: &LiveRef) -> Self {
        Node::Ref(r.clone())
    }
}

impl From<Symbol> for Node {
    fn from(s: Symbol) -> Self {
        Node::Symbol(s)
    }
}

impl From<Props> for Node {
    fn from(map: Props) -> Self {
        Node::Map(map)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::List(items)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Node::Null, Into::into)
    }
}

// ── Symbol ──────────────────────────────────────────────────────────

/// A symbolic constant identified by its registered name. Two symbols with
/// the same name are the same symbol.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

// ── Props ───────────────────────────────────────────────────────────

/// Insertion-ordered mapping of attribute or property names to values.
///
/// Equality ignores order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props(IndexMap<String, Node>);

impl Props {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn with_capacity(n: usize) -> Self {
        Self(IndexMap::with_capacity(n))
    }

    /// Insert a value, returning the previous one. Re-inserting an existing
    /// key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.0.get(key)
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Node> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `children` property, or [`Node::Null`].
    pub fn children(&self) -> Node {
        self.get(CHILDREN_PROP).cloned().unwrap_or_default()
    }

    /// A property as text, if it is text.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Node::as_text)
    }

    /// A property as a live reference, if it is one.
    pub fn live_ref(&self, key: &str) -> Option<&LiveRef> {
        self.get(key).and_then(Node::as_live_ref)
    }
}

impl FromIterator<(String, Node)> for Props {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<(String, Node)> for Props {
    fn extend<I: IntoIterator<Item = (String, Node)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Props {
    type Item = (String, Node);
    type IntoIter = indexmap::map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Props {
    type Item = (&'a String, &'a Node);
    type IntoIter = indexmap::map::Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ── Host elements ───────────────────────────────────────────────────

/// What a host element holds between its tags.
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Children(Vec<Node>),
    /// Pre-rendered markup, emitted verbatim.
    Markup(String),
}

impl Default for Content {
    fn default() -> Self {
        Content::Children(Vec::new())
    }
}

/// A host element: pure structural content with no evaluation semantics.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub tag: String,
    pub key: Option<String>,
    /// Attributes. Children live in [`Element::content`], never here.
    pub props: Props,
    /// Attachment handle (a DOM ref).
    pub attach: Option<LiveRef>,
    pub content: Content,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            key: None,
            props: Props::new(),
            attach: None,
            content: Content::default(),
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<Node>) -> Self {
        self.props.insert(name, value);
        self
    }

    pub fn attach(mut self, handle: &LiveRef) -> Self {
        self.attach = Some(handle.clone());
        self
    }

    /// Append a child. Replaces pre-rendered markup, if any.
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child.into()),
            Content::Markup(_) => self.content = Content::Children(vec![child.into()]),
        }
        self
    }

    pub fn children<I, T>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Node>,
    {
        for child in children {
            self = self.child(child);
        }
        self
    }

    /// Replace the children with pre-rendered markup and mark the element
    /// as saturated.
    pub fn markup(mut self, html: impl Into<String>) -> Self {
        self.props.insert(SATURATED_ATTR, true);
        self.content = Content::Markup(html.into());
        self
    }

    /// Whether the element already carries pre-rendered markup.
    pub fn is_saturated(&self) -> bool {
        matches!(self.content, Content::Markup(_))
    }

    pub fn markup_str(&self) -> Option<&str> {
        match &self.content {
            Content::Markup(html) => Some(html),
            Content::Children(_) => None,
        }
    }

    pub fn child_nodes(&self) -> &[Node] {
        match &self.content {
            Content::Children(children) => children,
            Content::Markup(_) => &[],
        }
    }
}

// ── Component elements ──────────────────────────────────────────────

/// A component invocation waiting to happen.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentElement {
    pub component: Component,
    pub key: Option<String>,
    /// Properties, including nested content under [`CHILDREN_PROP`].
    pub props: Props,
    /// Attachment handle forwarded to the component.
    pub attach: Option<LiveRef>,
}

impl ComponentElement {
    pub fn new(component: &Component) -> Self {
        Self {
            component: component.clone(),
            key: None,
            props: Props::new(),
            attach: None,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<Node>) -> Self {
        self.props.insert(name, value);
        self
    }

    pub fn attach(mut self, handle: &LiveRef) -> Self {
        self.attach = Some(handle.clone());
        self
    }

    /// Add nested content. A single child is stored as-is; further children
    /// turn the property into a list.
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        let child = child.into();
        let next = match self.props.remove(CHILDREN_PROP) {
            None => child,
            Some(Node::List(mut items)) => {
                items.push(child);
                Node::List(items)
            }
            Some(existing) => Node::List(vec![existing, child]),
        };
        self.props.insert(CHILDREN_PROP, next);
        self
    }
}

impl Component {
    /// Start an element that invokes this component.
    pub fn element(&self) -> ComponentElement {
        ComponentElement::new(self)
    }
}
