//! Component element classification: invoke, then decide whether the
//! rendering can replace the element.

use tracing::debug;

use super::{Saturation, Saturator};
use crate::node::{ComponentElement, Props};
use crate::reference::Hooks;
use crate::util::{RefSet, difference};

impl Saturator<'_> {
    pub(super) fn classify_component(&mut self, el: &ComponentElement, depth: usize) -> Saturation {
        let component = &el.component;
        if component.is_passthrough() {
            return self.classify_at(&el.props.children(), depth);
        }

        // Property values are saturated first; whatever they leave
        // unresolved is attributed to the caller, not to this component.
        let mut props = Props::with_capacity(el.props.len());
        let mut from_props = RefSet::new();
        for (name, value) in &el.props {
            let result = self.classify_at(value, depth);
            from_props.extend(result.must_keep);
            props.insert(name.clone(), result.node);
        }
        if let Some(handle) = &el.attach {
            from_props.insert(handle.clone());
        }
        let from_props = self.unresolved(&from_props);

        let preserved = ComponentElement {
            component: component.clone(),
            key: el.key.clone(),
            props,
            attach: el.attach.clone(),
        };

        if self.config.is_forced_component(component) {
            debug!("{} is forced static", component.name());
            return Saturation::fixed(preserved.into());
        }

        if self.config.is_known(component) {
            self.detect(component, "Preserving known client component");
            return self.preserve(preserved, from_props);
        }

        if depth >= self.config.max_render_depth {
            self.detect(component, "Render depth limit reached, preserving");
            return self.preserve(preserved, from_props);
        }

        let rendered = match component.render(&preserved.props, &Hooks::probe()) {
            Ok(node) => node,
            Err(e) => {
                debug!("{} cannot render outside a live context: {}", component.name(), e);
                self.detect(component, "Detected client component");
                return self.preserve(preserved, from_props);
            }
        };

        let result = self.classify_at(&rendered, depth + 1);
        let self_owned = difference(&result.must_keep, &from_props);
        if !self_owned.is_empty() {
            debug!(
                "{} introduces {} live reference(s) of its own",
                component.name(),
                self_owned.len()
            );
            self.detect(component, "Detected client component");
            return self.preserve(preserved, from_props);
        }

        debug!("Compiled away {}", component.name());
        self.stats.components_compiled_away += 1;
        result
    }

    fn preserve(&mut self, el: ComponentElement, must_keep: RefSet) -> Saturation {
        self.stats.components_preserved += 1;
        Saturation {
            node: el.into(),
            is_static: false,
            must_keep,
        }
    }
}
