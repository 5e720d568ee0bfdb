//! Per-invocation saturation settings.

use std::collections::HashSet;

use crate::reference::{Component, HasIdentity, Identity, RefTable};

/// Default number of nested component invocations followed before a
/// component is preserved instead of rendered.
pub const DEFAULT_MAX_RENDER_DEPTH: usize = 128;

/// Tags whose children are never inspected.
pub const SELF_CLOSING_TAGS: &[&str] = &[
    "img", "input", "textarea", "source", "meta", "embed", "link", "track", "wbr", "hr",
];

/// Host attributes excluded from live-reference scanning.
pub const UNSCANNED_ATTRS: &[&str] = &["style"];

/// Read-only configuration for one saturation run.
///
/// # Example
///
/// ```
/// use saturate::{Component, LiveRef, RefTable, SaturateConfig};
///
/// let on_click = LiveRef::handle("on_click");
/// let link = Component::new("Link", |props, _| Ok(props.children()));
/// let table = RefTable::new()
///     .with_ref("onClick", &on_click)
///     .with_component("Link", &link);
///
/// let config = SaturateConfig::new()
///     .with_known_table(&table)
///     .with_force_static_tag("svg");
/// assert!(config.is_known(&link));
/// ```
#[derive(Debug, Clone)]
pub struct SaturateConfig {
    /// Identities materialized out of band; never blamed as unresolved.
    pub known: HashSet<Identity>,
    /// Host tags that are always collapsible.
    pub force_static_tags: HashSet<String>,
    /// Components that are always collapsible.
    pub force_static_components: HashSet<Identity>,
    /// Nested component invocations followed before preserving.
    /// Default: [`DEFAULT_MAX_RENDER_DEPTH`].
    pub max_render_depth: usize,
}

impl Default for SaturateConfig {
    fn default() -> Self {
        Self {
            known: HashSet::new(),
            force_static_tags: HashSet::new(),
            force_static_components: HashSet::new(),
            max_render_depth: DEFAULT_MAX_RENDER_DEPTH,
        }
    }
}

impl SaturateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one identity as known.
    pub fn with_known(mut self, item: &impl HasIdentity) -> Self {
        self.known.insert(item.identity());
        self
    }

    /// Mark every identity registered in `table` as known.
    pub fn with_known_table(mut self, table: &RefTable) -> Self {
        self.known.extend(table.identities());
        self
    }

    pub fn with_force_static_tag(mut self, tag: impl Into<String>) -> Self {
        self.force_static_tags.insert(tag.into());
        self
    }

    pub fn with_force_static_component(mut self, component: &Component) -> Self {
        self.force_static_components.insert(component.identity());
        self
    }

    pub fn with_max_render_depth(mut self, depth: usize) -> Self {
        self.max_render_depth = depth;
        self
    }

    pub fn is_known(&self, item: &impl HasIdentity) -> bool {
        self.known.contains(&item.identity())
    }

    pub fn is_forced_tag(&self, tag: &str) -> bool {
        self.force_static_tags.contains(tag)
    }

    pub fn is_forced_component(&self, component: &Component) -> bool {
        self.force_static_components.contains(&component.identity())
    }
}
