//! Host element classification.

use tracing::debug;

use super::config::{SELF_CLOSING_TAGS, UNSCANNED_ATTRS};
use super::{Saturation, Saturator};
use crate::node::{Content, Element, Props, SATURATED_ATTR};
use crate::util::{RefSet, collect_refs, omit_keys, union};

impl Saturator<'_> {
    pub(super) fn classify_host(&mut self, el: &Element, depth: usize) -> Saturation {
        if self.config.is_forced_tag(&el.tag) {
            debug!("<{}> is forced static", el.tag);
            return Saturation::fixed(el.clone().into());
        }

        // Any non-primitive value on the element itself keeps it out of
        // markup, even a known reference: markup has no way to carry it.
        let (own_static, own) = scan_own_attrs(el);
        let own_unresolved = self.unresolved(&own);

        if SELF_CLOSING_TAGS.contains(&el.tag.as_str()) || el.is_saturated() {
            return Saturation {
                node: el.clone().into(),
                is_static: own_static,
                must_keep: own_unresolved,
            };
        }

        let (children, children_static, children_keep) =
            self.classify_siblings(el.child_nodes(), depth);

        if children_static {
            let html = self.renderer.render_markup(&children);
            debug!("Collapsed <{}> into {} bytes of markup", el.tag, html.len());
            self.stats.elements_collapsed += 1;

            let mut props = Props::with_capacity(el.props.len() + 1);
            props.insert(SATURATED_ATTR, true);
            props.extend(omit_keys(&el.props, &[SATURATED_ATTR]));
            return Saturation {
                node: Element {
                    tag: el.tag.clone(),
                    key: el.key.clone(),
                    props,
                    attach: el.attach.clone(),
                    content: Content::Markup(html),
                }
                .into(),
                is_static: own_static,
                must_keep: own_unresolved,
            };
        }

        Saturation {
            node: Element {
                tag: el.tag.clone(),
                key: el.key.clone(),
                props: el.props.clone(),
                attach: el.attach.clone(),
                content: Content::Children(children),
            }
            .into(),
            is_static: false,
            must_keep: union([&own_unresolved, &children_keep]),
        }
    }
}

/// Scan the element's own attributes and attachment handle.
///
/// Returns whether every scanned value is primitive, and the live references
/// reachable from the scanned values. Excluded attributes are not scanned.
fn scan_own_attrs(el: &Element) -> (bool, RefSet) {
    let mut all_primitive = el.attach.is_none();
    let mut refs = RefSet::new();
    for (name, value) in &el.props {
        if UNSCANNED_ATTRS.contains(&name.as_str()) || value.is_primitive() {
            continue;
        }
        all_primitive = false;
        collect_refs(value, &mut refs);
    }
    if let Some(handle) = &el.attach {
        refs.insert(handle.clone());
    }
    (all_primitive, refs)
}
