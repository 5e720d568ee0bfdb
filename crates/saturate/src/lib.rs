//! Partial static evaluation of UI node trees.
//!
//! `saturate` takes a tree that mixes purely declarative content with pieces
//! that need live, client-side behaviour (event handlers, attachment handles,
//! internal state) and rewrites it so that as much of it as can be proven
//! static is collapsed into pre-rendered markup. Everything that cannot be
//! proven safe is preserved as a live node.
//!
//! The core is the [`Saturator`]: a single depth-first pass that classifies
//! every node, invokes component code with probe [`Hooks`], and compiles away
//! components whose rendering introduces no live references of their own.
//! The rewritten tree can then be shipped with the [`codec`] and rebuilt on
//! the other end against the same [`RefTable`].
//!
//! # Getting started
//!
//! ```
//! use saturate::prelude::*;
//!
//! let on_click = LiveRef::handle("on_click");
//! let link = Component::new("Link", |props, _hooks| {
//!     Ok(Element::new("a").prop("href", "#").child(props.children()).into())
//! });
//!
//! // Everything the client can materialize on its own.
//! let table = RefTable::new()
//!     .with_ref("onClick", &on_click)
//!     .with_component("Link", &link);
//!
//! let tree: Node = Element::new("main")
//!     .child(Element::new("h1").child("Title"))
//!     .child(Element::new("button").prop("onClick", &on_click).child("Go"))
//!     .child(link.element().child("Home"))
//!     .into();
//!
//! let config = SaturateConfig::new().with_known_table(&table);
//! let out = Saturator::new(&config).run(&tree);
//! assert!(out.unknown_components.is_empty());
//!
//! let wire = encode(&out.node, &table)?;
//! assert_eq!(decode(&wire, &table)?, out.node);
//! # Ok::<(), saturate::CodecError>(())
//! ```
//!
//! # Where to find things
//!
//! - **The tree model:** [`Node`], [`Element`], [`ComponentElement`] and
//!   [`Props`] in [`node`].
//! - **Identities:** [`LiveRef`], [`Component`], [`Hooks`] and [`RefTable`]
//!   in [`reference`].
//! - **The engine:** [`Saturator`], [`SaturateConfig`] and
//!   [`DetectedComponents`] in [`mod@saturate`].
//! - **Markup:** the [`MarkupRenderer`] trait and the default
//!   [`HtmlRenderer`] in [`render`].
//! - **Transmission:** [`encode`] and [`decode`] in [`codec`].
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.
//! Collapse decisions are logged at `debug`, first detection of a preserved
//! component at `info`, and detected components missing from the known
//! references at `warn`.

pub mod codec;
pub mod node;
pub mod prelude;
pub mod reference;
pub mod render;
pub mod saturate;
pub mod util;

pub use codec::{CodecError, decode, decode_value, encode, encode_value};
pub use node::{CHILDREN_PROP, ComponentElement, Content, Element, Node, Props, SATURATED_ATTR, Symbol};
pub use reference::{
    Component, HasIdentity, Hooks, Identity, LiveRef, RefTable, Reference, RenderError,
};
pub use render::{HtmlRenderer, MarkupRenderer};
pub use saturate::{
    DetectedComponents, SaturateConfig, SaturateOutput, SaturateStats, Saturation, Saturator,
    saturate_tree,
};
pub use util::RefSet;
