//! Highlight geometry.
//!
//! [`GeometryMapper`] explains a property visually: given the rule that
//! declares it, the token driving it and the element it applies to, it
//! computes a [`HighlightSpec`] the host draws over the page.

mod highlight;
mod mapper;
mod rect;

pub use highlight::{Anchor, Borders, HighlightSpec, TooltipPlacement};
pub use mapper::{GeometryMapper, InspectTarget};
pub use rect::Rect;
