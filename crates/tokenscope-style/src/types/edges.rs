//! Box edges and shorthand expansion.

use std::fmt;

use crate::parser::Value;
use crate::{Error, Result};

/// One side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Top edge.
    Top,
    /// Right edge.
    Right,
    /// Bottom edge.
    Bottom,
    /// Left edge.
    Left,
}

impl Side {
    /// All sides in shorthand order (top, right, bottom, left).
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// Lowercase CSS name (`top`, `right`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }

    /// Parse a CSS side name.
    pub fn from_css(name: &str) -> Option<Self> {
        match name {
            "top" => Some(Side::Top),
            "right" => Some(Side::Right),
            "bottom" => Some(Side::Bottom),
            "left" => Some(Side::Left),
            _ => None,
        }
    }

    /// Longhand property for this side, e.g. `padding-left`.
    pub fn longhand(self, shorthand: &str) -> String {
        format!("{}-{}", shorthand, self.as_str())
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-side values of a box (padding, margin, border widths).
///
/// # Example
///
/// ```
/// use tokenscope_style::types::{Edges, Side};
///
/// let uniform = Edges::uniform(2.0);
/// assert_eq!(uniform.get(Side::Left), &2.0);
///
/// let symmetric = Edges::symmetric(1.0, 4.0);
/// assert_eq!(symmetric.horizontal(), 8.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Edges<T> {
    /// Top edge value.
    pub top: T,
    /// Right edge value.
    pub right: T,
    /// Bottom edge value.
    pub bottom: T,
    /// Left edge value.
    pub left: T,
}

impl<T: Clone> Edges<T> {
    /// Same value on every side.
    pub fn uniform(value: T) -> Self {
        Self {
            top: value.clone(),
            right: value.clone(),
            bottom: value.clone(),
            left: value,
        }
    }

    /// Vertical (top/bottom) and horizontal (left/right) values.
    pub fn symmetric(vertical: T, horizontal: T) -> Self {
        Self {
            top: vertical.clone(),
            bottom: vertical,
            right: horizontal.clone(),
            left: horizontal,
        }
    }

    /// Explicit values in shorthand order.
    pub fn new(top: T, right: T, bottom: T, left: T) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Expand 1, 2, 3 or 4 shorthand components using the CSS box rule.
    pub fn from_components(parts: &[T]) -> Option<Self> {
        match parts {
            [all] => Some(Self::uniform(all.clone())),
            [vertical, horizontal] => Some(Self::symmetric(vertical.clone(), horizontal.clone())),
            [top, horizontal, bottom] => Some(Self::new(
                top.clone(),
                horizontal.clone(),
                bottom.clone(),
                horizontal.clone(),
            )),
            [top, right, bottom, left] => Some(Self::new(
                top.clone(),
                right.clone(),
                bottom.clone(),
                left.clone(),
            )),
            _ => None,
        }
    }

    /// Apply `f` to every side.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Edges<U> {
        Edges {
            top: f(&self.top),
            right: f(&self.right),
            bottom: f(&self.bottom),
            left: f(&self.left),
        }
    }
}

impl<T> Edges<T> {
    /// Value for one side.
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Top => &self.top,
            Side::Right => &self.right,
            Side::Bottom => &self.bottom,
            Side::Left => &self.left,
        }
    }

    /// Mutable value for one side.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
        }
    }

    /// Sides paired with their values in shorthand order.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().map(move |side| (side, self.get(side)))
    }
}

impl Edges<f64> {
    /// Left + right.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Top + bottom.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

impl Edges<String> {
    /// Expand a box shorthand value (`padding`, `margin`, ...) into sides.
    ///
    /// Literal components keep their text and `var()` components contribute
    /// the referenced token name, so `0 var(--x)` yields `--x` on the left and
    /// right. Values with more than four components, or with dynamic
    /// expressions such as `calc()`, cannot be expanded.
    pub fn expand(value: &Value) -> Result<Self> {
        let parts: Vec<String> = value
            .edge_components()?
            .into_iter()
            .map(str::to_string)
            .collect();

        Self::from_components(&parts).ok_or_else(|| {
            Error::shorthand(
                value.raw(),
                format!("it has {} parts", parts.len()),
            )
        })
    }
}
