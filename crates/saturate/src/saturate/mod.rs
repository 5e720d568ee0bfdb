//! The saturation engine: partial static evaluation of a node tree.
//!
//! [`Saturator`] walks the tree once, depth-first, and rewrites it so that
//! every subtree that provably needs no client behaviour is collapsed into
//! pre-rendered markup, while anything that cannot be proven safe is kept
//! as a live node.
//!
//! Each node is classified into a [`Saturation`]: the rewritten node,
//! whether it is static (an ancestor may fold it into markup), and the set
//! of unresolved live references it must keep. Components are invoked with
//! probe [`Hooks`](crate::Hooks) and compiled away when their rendering
//! introduces no references beyond those their properties already carried.
//!
//! The only state shared across the traversal is the
//! [`DetectedComponents`] accumulator.

mod component;
pub mod config;
pub mod detected;
mod host;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::node::Node;
use crate::reference::Component;
use crate::render::{HtmlRenderer, MarkupRenderer};
use crate::util::{RefSet, collect_refs, without_known};

pub use config::{DEFAULT_MAX_RENDER_DEPTH, SELF_CLOSING_TAGS, SaturateConfig, UNSCANNED_ATTRS};
pub use detected::DetectedComponents;

// ── Results ─────────────────────────────────────────────────────────

/// Classification of one subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct Saturation {
    /// The rewritten subtree.
    pub node: Node,
    /// Whether an ancestor may fold this subtree into its markup.
    pub is_static: bool,
    /// Unresolved live references this subtree exposes to its parent.
    pub must_keep: RefSet,
}

impl Saturation {
    fn fixed(node: Node) -> Self {
        Self {
            node,
            is_static: true,
            must_keep: RefSet::new(),
        }
    }
}

/// Counters collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SaturateStats {
    /// Host elements whose children were replaced by markup.
    pub elements_collapsed: usize,
    /// Component elements replaced by their rendering.
    pub components_compiled_away: usize,
    /// Component elements kept in the output.
    pub components_preserved: usize,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct SaturateOutput {
    pub node: Node,
    pub is_static: bool,
    pub must_keep: RefSet,
    pub stats: SaturateStats,
    /// Detected components missing from the known references.
    pub unknown_components: Vec<Component>,
}

// ── Saturator ───────────────────────────────────────────────────────

enum DetectedSlot<'a> {
    Owned(DetectedComponents),
    Borrowed(&'a mut DetectedComponents),
}

/// One saturation run.
///
/// # Example
///
/// ```
/// use saturate::{DetectedComponents, Element, Node, SaturateConfig, Saturator};
///
/// let tree: Node = Element::new("div")
///     .child("Hello ")
///     .child(Element::new("em").child("dear"))
///     .child(" world!")
///     .into();
///
/// let config = SaturateConfig::new();
/// let mut detected = DetectedComponents::new();
/// let out = Saturator::new(&config)
///     .with_detected(&mut detected)
///     .saturate(&tree);
///
/// let el = out.as_element().unwrap();
/// assert_eq!(el.markup_str(), Some("Hello <em>dear</em> world!"));
/// assert!(detected.is_empty());
/// ```
pub struct Saturator<'a> {
    config: &'a SaturateConfig,
    renderer: &'a dyn MarkupRenderer,
    detected: DetectedSlot<'a>,
    stats: SaturateStats,
}

impl<'a> Saturator<'a> {
    pub fn new(config: &'a SaturateConfig) -> Self {
        Self {
            config,
            renderer: &HtmlRenderer,
            detected: DetectedSlot::Owned(DetectedComponents::new()),
            stats: SaturateStats::default(),
        }
    }

    /// Use a different static markup renderer.
    pub fn with_renderer(mut self, renderer: &'a dyn MarkupRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Accumulate detected components into a caller-owned set.
    pub fn with_detected(mut self, detected: &'a mut DetectedComponents) -> Self {
        self.detected = DetectedSlot::Borrowed(detected);
        self
    }

    pub fn detected(&self) -> &DetectedComponents {
        match &self.detected {
            DetectedSlot::Owned(d) => d,
            DetectedSlot::Borrowed(d) => &**d,
        }
    }

    fn detected_mut(&mut self) -> &mut DetectedComponents {
        match &mut self.detected {
            DetectedSlot::Owned(d) => d,
            DetectedSlot::Borrowed(d) => &mut **d,
        }
    }

    pub fn stats(&self) -> &SaturateStats {
        &self.stats
    }

    /// Saturate `node`, returning only the rewritten tree.
    pub fn saturate(self, node: &Node) -> Node {
        self.run(node).node
    }

    /// Saturate `node` and report everything learned along the way.
    ///
    /// Logs a warning when a detected component is missing from the known
    /// references: the tree is still valid, but that component may not be
    /// materializable downstream.
    pub fn run(mut self, node: &Node) -> SaturateOutput {
        let result = self.classify(node);

        let unknown_components: Vec<Component> = self
            .detected()
            .unknown(&self.config.known)
            .cloned()
            .collect();
        if !unknown_components.is_empty() {
            let names: Vec<&str> = unknown_components.iter().map(Component::name).collect();
            warn!(
                "Cannot properly saturate due to missing client components: {}",
                names.join(", ")
            );
        }
        debug!(
            "Saturation done: static={}, must_keep={}, collapsed={}, compiled_away={}, preserved={}",
            result.is_static,
            result.must_keep.len(),
            self.stats.elements_collapsed,
            self.stats.components_compiled_away,
            self.stats.components_preserved,
        );

        SaturateOutput {
            node: result.node,
            is_static: result.is_static,
            must_keep: result.must_keep,
            stats: self.stats,
            unknown_components,
        }
    }

    /// Classify and rewrite one subtree.
    pub fn classify(&mut self, node: &Node) -> Saturation {
        self.classify_at(node, 0)
    }

    /// `depth` counts nested component invocations.
    fn classify_at(&mut self, node: &Node, depth: usize) -> Saturation {
        match node {
            Node::Null | Node::Bool(_) | Node::Number(_) | Node::Text(_) => {
                Saturation::fixed(node.clone())
            }
            Node::List(items) => {
                let (items, is_static, must_keep) = self.classify_siblings(items, depth);
                Saturation {
                    node: Node::List(items),
                    is_static,
                    must_keep,
                }
            }
            Node::Element(el) => self.classify_host(el, depth),
            Node::Component(el) => self.classify_component(el, depth),
            Node::Ref(r) => {
                // Known references pass through with no obligation, but have
                // no markup form either.
                let mut must_keep = RefSet::new();
                if !self.config.is_known(r) {
                    must_keep.insert(r.clone());
                }
                Saturation {
                    node: node.clone(),
                    is_static: false,
                    must_keep,
                }
            }
            Node::Symbol(_) => Saturation {
                node: node.clone(),
                is_static: false,
                must_keep: RefSet::new(),
            },
            Node::Map(_) => {
                let mut refs = RefSet::new();
                collect_refs(node, &mut refs);
                Saturation {
                    node: node.clone(),
                    is_static: false,
                    must_keep: self.unresolved(&refs),
                }
            }
        }
    }

    /// Classify siblings in document order.
    fn classify_siblings(&mut self, nodes: &[Node], depth: usize) -> (Vec<Node>, bool, RefSet) {
        let mut out = Vec::with_capacity(nodes.len());
        let mut is_static = true;
        let mut must_keep = RefSet::new();
        for node in nodes {
            let result = self.classify_at(node, depth);
            is_static &= result.is_static;
            must_keep.extend(result.must_keep);
            out.push(result.node);
        }
        (out, is_static, must_keep)
    }

    fn unresolved(&self, refs: &RefSet) -> RefSet {
        without_known(refs, &self.config.known)
    }

    /// Record a preserved component, logging the first time only.
    fn detect(&mut self, component: &Component, reason: &str) {
        if self.detected_mut().insert(component) {
            info!("{}: {}", reason, component.name());
        }
    }
}

/// Saturate `node` with the default renderer and a throwaway detected set.
pub fn saturate_tree(node: &Node, config: &SaturateConfig) -> Node {
    Saturator::new(config).saturate(node)
}
