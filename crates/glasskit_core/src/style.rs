//! Style-attribute mapping
//!
//! Widgets describe their visuals as a pure mapping from configuration to
//! named style properties ([`StyleProps`]); the host binds the mapping to
//! whatever its rendering layer understands. Keeping the mapping a plain
//! ordered key/value set is what makes the widgets renderer-independent.

use indexmap::IndexMap;

use crate::color::Color;

/// 2D translation applied to an element
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Transform {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
        }
    }

    /// CSS transform value, e.g. `"translate(30px, 45px)"`
    pub fn to_css(&self) -> String {
        format!("translate({}px, {}px)", self.translate_x, self.translate_y)
    }
}

/// Drop shadow
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
    pub spread: f32,
    pub color: Color,
}

impl Shadow {
    pub fn new(offset_x: f32, offset_y: f32, blur: f32, color: Color) -> Self {
        Self {
            offset_x,
            offset_y,
            blur,
            spread: 0.0,
            color,
        }
    }

    /// CSS box-shadow value, e.g. `"0px 8px 32px 0px rgba(31, 38, 135, 0.15)"`
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px {}",
            self.offset_x,
            self.offset_y,
            self.blur,
            self.spread,
            self.color.to_css_rgba()
        )
    }
}

/// Ordered name -> value style-attribute mapping
///
/// Iteration order is insertion order, so a host applying properties in
/// sequence sees a deterministic result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleProps {
    props: IndexMap<String, String>,
}

impl StyleProps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.props.insert(name.into(), value.into());
    }

    /// Builder form of [`set`](Self::set)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.props.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge another mapping on top of this one
    ///
    /// Properties from `other` override properties in `self`; everything
    /// else is preserved.
    pub fn merge(&self, other: &StyleProps) -> StyleProps {
        let mut merged = self.clone();
        for (name, value) in other.iter() {
            merged.set(name, value);
        }
        merged
    }
}
