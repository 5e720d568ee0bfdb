//! The detected-component accumulator shared across a saturation run.

use std::collections::HashSet;

use crate::reference::{Component, HasIdentity, Identity};

/// Every component identity the engine decided to preserve, in the order
/// it was first detected.
///
/// Owned by the caller and threaded through the traversal by `&mut`; use
/// it afterwards to find components that need out-of-band materialization.
#[derive(Debug, Clone, Default)]
pub struct DetectedComponents {
    order: Vec<Component>,
    seen: HashSet<Identity>,
}

impl DetectedComponents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a component. Returns `false` if it was already recorded.
    pub fn insert(&mut self, component: &Component) -> bool {
        if self.seen.insert(component.identity()) {
            self.order.push(component.clone());
            true
        } else {
            false
        }
    }

    pub fn contains(&self, component: &Component) -> bool {
        self.seen.contains(&component.identity())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.order.iter()
    }

    /// Display names, in detection order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(Component::name).collect()
    }

    /// Detected components absent from `known`.
    pub fn unknown<'a>(&'a self, known: &'a HashSet<Identity>) -> impl Iterator<Item = &'a Component> {
        self.order
            .iter()
            .filter(move |c| !known.contains(&c.identity()))
    }
}
