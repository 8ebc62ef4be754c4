//! Host document capabilities.
//!
//! The inspector never renders anything itself. It asks a [`Document`] for
//! element structure, layout boxes and computed styles, and answers with
//! view models for the host to draw.

mod static_doc;
mod style;

pub use static_doc::{ElementId, StaticDocument};
pub use style::ComputedStyle;

use tokenscope_style::selector::ElementTree;

use crate::geometry::Rect;

/// A rendered document the inspector can query.
pub trait Document: ElementTree {
    /// Border box of an element in viewport coordinates.
    fn bounding_rect(&self, node: Self::Node) -> Rect;

    /// Computed style of an element.
    fn computed_style(&self, node: Self::Node) -> ComputedStyle;

    /// Topmost element under a viewport point.
    fn element_from_point(&self, x: f64, y: f64) -> Option<Self::Node>;

    /// Viewport height in pixels.
    fn viewport_height(&self) -> f64;

    /// Whether an element belongs to the inspector's own panel.
    fn is_editor_chrome(&self, _node: Self::Node) -> bool {
        false
    }

    /// Space-separated class attribute.
    fn class_name(&self, node: Self::Node) -> String {
        self.match_context(node).classes.join(" ")
    }

    /// Check `node` and its ancestors for editor chrome.
    fn inside_editor_chrome(&self, node: Self::Node) -> bool {
        self.is_editor_chrome(node) || self.ancestors(node).into_iter().any(|a| self.is_editor_chrome(a))
    }
}
