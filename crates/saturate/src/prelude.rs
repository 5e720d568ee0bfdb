//! Convenience re-exports for common `saturate` types.
//!
//! ```
//! use saturate::prelude::*;
//! ```
//!
//! Covers building trees, registering references, running the engine and
//! the codec. Set helpers and renderer internals stay in their modules.

// ── Tree ────────────────────────────────────────────────────────────
pub use crate::node::{ComponentElement, Element, Node, Props, Symbol};

// ── Identities ──────────────────────────────────────────────────────
pub use crate::reference::{Component, Hooks, LiveRef, RefTable, RenderError};

// ── Engine ──────────────────────────────────────────────────────────
pub use crate::saturate::{
    DetectedComponents, SaturateConfig, SaturateOutput, Saturator, saturate_tree,
};

// ── Markup and transmission ─────────────────────────────────────────
pub use crate::codec::{CodecError, decode, encode};
pub use crate::render::{HtmlRenderer, MarkupRenderer};
