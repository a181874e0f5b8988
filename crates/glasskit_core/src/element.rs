//! Host element capability surface
//!
//! Widgets that mutate the element they are attached to (disable it, tag
//! it inert) do so through [`HostElement`] rather than any concrete node
//! type. Hosts implement the trait on their element handles;
//! [`ElementState`] is a plain in-memory implementation for headless hosts
//! and tests.

use std::sync::{Arc, Mutex};

use indexmap::IndexMap;

/// Mutation surface of the element a widget is attached to
pub trait HostElement: Send {
    /// Whether the element has a native disabled state (button-like
    /// elements do; generic containers do not)
    fn supports_disabled(&self) -> bool;

    /// Current native disabled state; always false when unsupported
    fn is_disabled(&self) -> bool;

    /// Set the native disabled state; no-op when unsupported
    fn set_disabled(&mut self, disabled: bool);

    fn set_attribute(&mut self, name: &str, value: &str);

    fn remove_attribute(&mut self, name: &str);

    fn set_style(&mut self, name: &str, value: &str);

    fn remove_style(&mut self, name: &str);
}

/// Shared handle to a host element
pub type SharedElement = Arc<Mutex<dyn HostElement>>;

/// Wrap an element implementation in a shared handle
pub fn shared_element(element: impl HostElement + 'static) -> SharedElement {
    Arc::new(Mutex::new(element))
}

/// In-memory element record
///
/// Implements [`HostElement`] over plain maps so interaction logic can be
/// exercised without a real node behind it.
#[derive(Debug, Default)]
pub struct ElementState {
    /// `Some` when the element kind has a native disabled state
    native_disabled: Option<bool>,
    attributes: IndexMap<String, String>,
    styles: IndexMap<String, String>,
}

impl ElementState {
    /// An element with a native disabled state, like a button
    pub fn button() -> Self {
        Self {
            native_disabled: Some(false),
            ..Self::default()
        }
    }

    /// An element without a native disabled state, like a generic container
    pub fn inline() -> Self {
        Self::default()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }
}

impl HostElement for ElementState {
    fn supports_disabled(&self) -> bool {
        self.native_disabled.is_some()
    }

    fn is_disabled(&self) -> bool {
        self.native_disabled == Some(true)
    }

    fn set_disabled(&mut self, disabled: bool) {
        if self.native_disabled.is_some() {
            self.native_disabled = Some(disabled);
        }
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.shift_remove(name);
    }

    fn set_style(&mut self, name: &str, value: &str) {
        self.styles.insert(name.to_string(), value.to_string());
    }

    fn remove_style(&mut self, name: &str) {
        self.styles.shift_remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_disabled_state() {
        let mut el = ElementState::button();
        assert!(el.supports_disabled());
        assert!(!el.is_disabled());

        el.set_disabled(true);
        assert!(el.is_disabled());

        el.set_disabled(false);
        assert!(!el.is_disabled());
    }

    #[test]
    fn test_inline_ignores_native_disable() {
        let mut el = ElementState::inline();
        assert!(!el.supports_disabled());

        el.set_disabled(true);
        assert!(!el.is_disabled());
    }

    #[test]
    fn test_attributes_and_styles() {
        let mut el = ElementState::inline();
        el.set_attribute("aria-disabled", "true");
        el.set_style("pointer-events", "none");

        assert_eq!(el.attribute("aria-disabled"), Some("true"));
        assert_eq!(el.style("pointer-events"), Some("none"));

        el.remove_attribute("aria-disabled");
        el.remove_style("pointer-events");
        assert_eq!(el.attribute("aria-disabled"), None);
        assert_eq!(el.style("pointer-events"), None);
    }
}
