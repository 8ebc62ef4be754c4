//! Computed style snapshots.

use std::collections::HashMap;

use tokenscope_style::types::{Edges, Side};

/// Resolved property values of one element, as the host reports them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedStyle {
    values: HashMap<String, String>,
}

impl ComputedStyle {
    /// Create an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property value.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.values.insert(property.into(), value.into());
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    /// Get a property value. Empty values count as absent.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.values
            .get(property)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Whole pixels of a length value (`"8.5px"` is 8); 0 when absent or not
    /// numeric.
    pub fn px(&self, property: &str) -> f64 {
        self.get(property).map(leading_integer).unwrap_or(0.0)
    }

    /// The four longhands of a box property (`padding`, `margin`).
    pub fn edges(&self, shorthand: &str) -> Edges<Option<String>> {
        let value = |side: Side| self.get(&side.longhand(shorthand)).map(str::to_string);
        Edges::new(
            value(Side::Top),
            value(Side::Right),
            value(Side::Bottom),
            value(Side::Left),
        )
    }

    /// Pixel amounts of a box property's longhands.
    pub fn edge_px(&self, shorthand: &str) -> Edges<f64> {
        let px = |side: Side| self.px(&side.longhand(shorthand));
        Edges::new(px(Side::Top), px(Side::Right), px(Side::Bottom), px(Side::Left))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ComputedStyle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = Self::new();
        for (property, value) in iter {
            style.set(property, value);
        }
        style
    }
}

fn leading_integer(text: &str) -> f64 {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<f64>()
        .map(|n| sign * n)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_values() {
        let style: ComputedStyle = [
            ("margin-top", "8px"),
            ("margin-left", "-4px"),
            ("margin-right", "12.75px"),
            ("margin-bottom", "auto"),
            ("width", ""),
        ]
        .into_iter()
        .collect();

        assert_eq!(style.px("margin-top"), 8.0);
        assert_eq!(style.px("margin-left"), -4.0);
        assert_eq!(style.px("margin-right"), 12.0);
        assert_eq!(style.px("margin-bottom"), 0.0);
        assert_eq!(style.px("missing"), 0.0);
        assert_eq!(style.get("width"), None);
    }

    #[test]
    fn box_longhands() {
        let style = ComputedStyle::new()
            .with("padding-top", "1px")
            .with("padding-left", "4px");

        let edges = style.edges("padding");
        assert_eq!(edges.top.as_deref(), Some("1px"));
        assert_eq!(edges.right, None);
        assert_eq!(style.edge_px("padding"), Edges::new(1.0, 0.0, 0.0, 4.0));
    }
}
