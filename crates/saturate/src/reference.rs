//! Opaque identities: live references, components, and the name table that
//! maps them to stable strings.
//!
//! Nothing in this module is compared structurally. Every [`LiveRef`] and
//! [`Component`] is stamped with an [`Identity`] token when it is created;
//! clones share the token, and equality and hashing look at the token only.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use thiserror::Error;

use crate::node::{Node, Props};

// ── Identity ────────────────────────────────────────────────────────

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

/// Unique token assigned to every live reference and component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(u64);

impl Identity {
    fn fresh() -> Self {
        Self(NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw token value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Anything that carries an [`Identity`].
pub trait HasIdentity {
    fn identity(&self) -> Identity;
}

// ── Render errors ───────────────────────────────────────────────────

/// Why a component (or callback) could not be invoked.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The component asked for a facility that only exists inside a live
    /// rendering context.
    #[error("`{facility}` is only available during live rendering")]
    LiveOnly { facility: &'static str },
    /// A live reference without a callable body was invoked.
    #[error("live reference {label:?} is not callable")]
    NotCallable { label: String },
    /// Component code panicked.
    #[error("component panicked: {0}")]
    Panicked(String),
    /// Any other failure reported by component code.
    #[error("{0}")]
    Failed(String),
}

impl RenderError {
    pub fn failed(msg: impl Into<String>) -> Self {
        RenderError::Failed(msg.into())
    }
}

// ── LiveRef ─────────────────────────────────────────────────────────

type Callback = Arc<dyn Fn(&[Node]) -> Node + Send + Sync>;

struct RefInner {
    identity: Identity,
    label: String,
    body: Option<Callback>,
}

/// A value that cannot be serialized: an event callback, an attachment
/// handle, or any other opaque object that must survive as-is.
#[derive(Clone)]
pub struct LiveRef(Arc<RefInner>);

impl LiveRef {
    /// An opaque handle with no behaviour of its own (e.g. a DOM attachment).
    pub fn handle(label: impl Into<String>) -> Self {
        Self(Arc::new(RefInner {
            identity: Identity::fresh(),
            label: label.into(),
            body: None,
        }))
    }

    /// A callable reference. Components may call it while rendering.
    pub fn callback<F>(label: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[Node]) -> Node + Send + Sync + 'static,
    {
        Self(Arc::new(RefInner {
            identity: Identity::fresh(),
            label: label.into(),
            body: Some(Arc::new(body)),
        }))
    }

    pub fn label(&self) -> &str {
        &self.0.label
    }

    pub fn is_callable(&self) -> bool {
        self.0.body.is_some()
    }

    /// Invoke the callback body.
    pub fn call(&self, args: &[Node]) -> Result<Node, RenderError> {
        match &self.0.body {
            Some(body) => Ok(body(args)),
            None => Err(RenderError::NotCallable {
                label: self.0.label.clone(),
            }),
        }
    }
}

impl HasIdentity for LiveRef {
    fn identity(&self) -> Identity {
        self.0.identity
    }
}

impl PartialEq for LiveRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.identity == other.0.identity
    }
}

impl Eq for LiveRef {}

impl std::hash::Hash for LiveRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.identity.hash(state);
    }
}

impl fmt::Debug for LiveRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LiveRef({} {:?})", self.0.identity, self.0.label)
    }
}

// ── Hooks ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HookMode {
    Probe,
    Server,
}

/// Render-phase facilities handed to component code.
///
/// The saturation engine renders components with [`Hooks::probe`]: any
/// facility that needs a live rendering context fails, which marks the
/// component as one that must be preserved. Static markup rendering uses
/// [`Hooks::server`], where state starts at its initial value and effects
/// never run.
#[derive(Clone, Copy, Debug)]
pub struct Hooks {
    mode: HookMode,
}

impl Hooks {
    pub fn probe() -> Self {
        Self {
            mode: HookMode::Probe,
        }
    }

    pub fn server() -> Self {
        Self {
            mode: HookMode::Server,
        }
    }

    pub fn is_probe(&self) -> bool {
        self.mode == HookMode::Probe
    }

    /// Retained state. Returns the current value and its setter.
    pub fn use_state<T>(&self, initial: T) -> Result<(T, LiveRef), RenderError> {
        match self.mode {
            HookMode::Probe => Err(RenderError::LiveOnly {
                facility: "use_state",
            }),
            HookMode::Server => Ok((initial, LiveRef::handle("state setter"))),
        }
    }

    /// A mutable attachment handle that outlives a single render.
    pub fn use_ref(&self) -> Result<LiveRef, RenderError> {
        match self.mode {
            HookMode::Probe => Err(RenderError::LiveOnly {
                facility: "use_ref",
            }),
            HookMode::Server => Ok(LiveRef::handle("ref")),
        }
    }

    /// Schedule a side effect after mount.
    pub fn use_effect<F: FnOnce()>(&self, _effect: F) -> Result<(), RenderError> {
        match self.mode {
            HookMode::Probe => Err(RenderError::LiveOnly {
                facility: "use_effect",
            }),
            HookMode::Server => Ok(()),
        }
    }
}

// ── Component ───────────────────────────────────────────────────────

type RenderFn = Arc<dyn Fn(&Props, &Hooks) -> Result<Node, RenderError> + Send + Sync>;

enum ComponentKind {
    Function(RenderFn),
    Passthrough,
}

struct ComponentInner {
    identity: Identity,
    name: String,
    kind: ComponentKind,
}

/// A component identity: a named, deferred computation from properties to
/// a [`Node`].
#[derive(Clone)]
pub struct Component(Arc<ComponentInner>);

static FRAGMENT: OnceLock<Component> = OnceLock::new();

impl Component {
    /// Create a function component.
    ///
    /// ```
    /// use saturate::{Component, Element, Node};
    ///
    /// let chip = Component::new("Chip", |props, _hooks| {
    ///     Ok(Element::new("span")
    ///         .prop("className", "chip")
    ///         .child(props.get("text").cloned().unwrap_or(Node::Null))
    ///         .into())
    /// });
    /// assert_eq!(chip.name(), "Chip");
    /// ```
    pub fn new<F>(name: impl Into<String>, render: F) -> Self
    where
        F: Fn(&Props, &Hooks) -> Result<Node, RenderError> + Send + Sync + 'static,
    {
        Self(Arc::new(ComponentInner {
            identity: Identity::fresh(),
            name: name.into(),
            kind: ComponentKind::Function(Arc::new(render)),
        }))
    }

    /// The transparent grouping construct. Always the same identity.
    pub fn fragment() -> Self {
        FRAGMENT
            .get_or_init(|| {
                Self(Arc::new(ComponentInner {
                    identity: Identity::fresh(),
                    name: "Fragment".to_string(),
                    kind: ComponentKind::Passthrough,
                }))
            })
            .clone()
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self.0.kind, ComponentKind::Passthrough)
    }

    /// Invoke the component with its properties.
    ///
    /// The passthrough returns its `children` property. Panics in component
    /// code are caught and reported as [`RenderError::Panicked`].
    pub fn render(&self, props: &Props, hooks: &Hooks) -> Result<Node, RenderError> {
        match &self.0.kind {
            ComponentKind::Passthrough => Ok(props.children()),
            ComponentKind::Function(render) => {
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| render(props, hooks)))
                    .unwrap_or_else(|payload| Err(RenderError::Panicked(panic_message(&*payload))))
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl HasIdentity for Component {
    fn identity(&self) -> Identity {
        self.0.identity
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.0.identity == other.0.identity
    }
}

impl Eq for Component {}

impl std::hash::Hash for Component {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.identity.hash(state);
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({} {})", self.0.identity, self.0.name)
    }
}

// ── RefTable ────────────────────────────────────────────────────────

/// Something that can be registered in a [`RefTable`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reference {
    Value(LiveRef),
    Component(Component),
}

impl HasIdentity for Reference {
    fn identity(&self) -> Identity {
        match self {
            Reference::Value(r) => r.identity(),
            Reference::Component(c) => c.identity(),
        }
    }
}

impl From<LiveRef> for Reference {
    fn from(r: LiveRef) -> Self {
        Reference::Value(r)
    }
}

impl From<Component> for Reference {
    fn from(c: Component) -> Self {
        Reference::Component(c)
    }
}

/// Bidirectional table of stable names and the live identities they stand for.
///
/// The same logical table must be used on both ends of a transmission: as
/// the known-reference set when saturating, and as the lookup table when
/// encoding and decoding.
#[derive(Clone, Debug, Default)]
pub struct RefTable {
    by_name: IndexMap<String, Reference>,
    by_identity: HashMap<Identity, String>,
}

impl RefTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `reference` under `name`, replacing any previous entry for
    /// either the name or the identity.
    pub fn insert(&mut self, name: impl Into<String>, reference: impl Into<Reference>) {
        let name = name.into();
        let reference = reference.into();
        if let Some(old) = self.by_name.shift_remove(&name) {
            self.by_identity.remove(&old.identity());
        }
        if let Some(old_name) = self.by_identity.insert(reference.identity(), name.clone()) {
            self.by_name.shift_remove(&old_name);
        }
        self.by_name.insert(name, reference);
    }

    /// Register a live reference (builder pattern).
    pub fn with_ref(mut self, name: impl Into<String>, r: &LiveRef) -> Self {
        self.insert(name, r.clone());
        self
    }

    /// Register a component (builder pattern).
    pub fn with_component(mut self, name: impl Into<String>, c: &Component) -> Self {
        self.insert(name, c.clone());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Reference> {
        self.by_name.get(name)
    }

    /// The registered name of an identity.
    pub fn name_of(&self, identity: Identity) -> Option<&str> {
        self.by_identity.get(&identity).map(String::as_str)
    }

    pub fn contains(&self, identity: Identity) -> bool {
        self.by_identity.contains_key(&identity)
    }

    /// All registered identities, for use as a known-reference set.
    pub fn identities(&self) -> HashSet<Identity> {
        self.by_identity.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Reference)> {
        self.by_name.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
