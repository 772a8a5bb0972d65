//! Directive values: the typed key/value pairs the (external) parser
//! attaches to sections, rows, columns and elements.
//!
//! Modeled after the way `azul-css`'s `PixelValue`/`PercentageValue`
//! wrap a raw float in a typed unit carrier rather than passing bare
//! `f32`s around and hoping callers agree on units.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named, hex or literal RGB color. Parsing hex strings / color names
/// is the parser's job upstream; the engine only ever consumes an
/// already-resolved `ColorValue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColorValue {
    Named(String),
    Hex(u32),
    Rgb(u8, u8, u8),
}

/// One directive value. Percentages and fractions are stored unit-tagged
/// rather than pre-divided, so the width resolver can tell a `50%` width
/// apart from an absolute `50` point width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DirectiveValue {
    /// Absolute points, e.g. `width=150`.
    Points(f32),
    /// A percentage, e.g. `width=50%`. Stored as `50.0`, not `0.5`.
    Percent(f32),
    /// A fraction, e.g. `width=1/3`. Stored as `(numerator, denominator)`.
    Fraction(u32, u32),
    Color(ColorValue),
    Text(String),
}

impl DirectiveValue {
    pub fn as_points(&self) -> Option<f32> {
        match self {
            DirectiveValue::Points(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DirectiveValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<&ColorValue> {
        match self {
            DirectiveValue::Color(c) => Some(c),
            _ => None,
        }
    }

    /// Resolves this value as a fraction of `basis`, if it denotes a
    /// proportional quantity (`Percent` or `Fraction`). Returns `None`
    /// for `Points`/`Color`/`Text`, which are not proportional.
    pub fn as_fraction_of(&self, basis: f32) -> Option<f32> {
        match self {
            DirectiveValue::Percent(p) => Some(basis * (p / 100.0)),
            DirectiveValue::Fraction(n, d) if *d != 0 => Some(basis * (*n as f32 / *d as f32)),
            _ => None,
        }
    }
}

/// Horizontal alignment, the domain of the `align` directive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

impl Default for HorizontalAlign {
    fn default() -> Self {
        HorizontalAlign::Left
    }
}

/// An ordered, string-keyed bag of directives. Backed by a `BTreeMap` so
/// iteration order is deterministic across runs (load-bearing for the
/// determinism property in spec §8.5 — a `HashMap` would not guarantee
/// that two equal decks print or hash identically).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Directives(pub BTreeMap<String, DirectiveValue>);

impl Directives {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&DirectiveValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: DirectiveValue) {
        self.0.insert(key.into(), value);
    }

    pub fn width(&self) -> Option<&DirectiveValue> {
        self.get("width")
    }

    pub fn height(&self) -> Option<&DirectiveValue> {
        self.get("height")
    }

    pub fn align(&self) -> HorizontalAlign {
        match self.get("align").and_then(DirectiveValue::as_text) {
            Some("center") => HorizontalAlign::Center,
            Some("right") => HorizontalAlign::Right,
            _ => HorizontalAlign::Left,
        }
    }

    pub fn font_size(&self) -> Option<f32> {
        self.get("fontsize").and_then(DirectiveValue::as_points)
    }

    /// The `line-spacing` directive is a multiplier in the directive
    /// map (e.g. `1.5`); converting that multiplier to the Slides API's
    /// percentage representation (`×100`) is a downstream (request
    /// builder) concern, out of scope here.
    pub fn line_spacing(&self) -> Option<f32> {
        self.get("line-spacing").and_then(DirectiveValue::as_points)
    }

    pub fn color(&self) -> Option<&ColorValue> {
        self.get("color").and_then(DirectiveValue::as_color)
    }

    pub fn padding(&self) -> Option<f32> {
        self.get("padding").and_then(DirectiveValue::as_points)
    }

    pub fn gap(&self) -> Option<f32> {
        self.get("gap").and_then(DirectiveValue::as_points)
    }
}

/// The resolved shape of a `width` directive, used by the width
/// resolver in `deck-layout`. Grounded on the `Between`/`EqualTo`/
/// `Unconstrained` three-way split `azul-layout`'s old Yoga-derived
/// solver uses for `WhConstraint`, specialized to an
/// absolute/proportional/implicit vocabulary.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WidthMode {
    Absolute(f32),
    Proportional(f32),
    Implicit,
}

impl WidthMode {
    pub fn from_directive(value: Option<&DirectiveValue>) -> Self {
        match value {
            Some(DirectiveValue::Points(pt)) => WidthMode::Absolute(*pt),
            Some(DirectiveValue::Percent(p)) => WidthMode::Proportional(p / 100.0),
            Some(DirectiveValue::Fraction(n, d)) if *d != 0 => {
                WidthMode::Proportional(*n as f32 / *d as f32)
            }
            _ => WidthMode::Implicit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_resolves_as_proportion_of_basis() {
        let v = DirectiveValue::Fraction(1, 3);
        assert!((v.as_fraction_of(300.0).unwrap() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn percent_resolves_as_proportion_of_basis() {
        let v = DirectiveValue::Percent(25.0);
        assert!((v.as_fraction_of(400.0).unwrap() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn width_mode_defaults_to_implicit() {
        let d = Directives::new();
        assert_eq!(WidthMode::from_directive(d.width()), WidthMode::Implicit);
    }

    #[test]
    fn width_mode_reads_percent_directive() {
        let mut d = Directives::new();
        d.insert("width", DirectiveValue::Percent(50.0));
        assert_eq!(
            WidthMode::from_directive(d.width()),
            WidthMode::Proportional(0.5)
        );
    }
}
