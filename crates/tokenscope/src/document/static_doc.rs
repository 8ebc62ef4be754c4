//! In-memory document for headless use and tests.

use slotmap::{SlotMap, new_key_type};
use tokenscope_style::selector::{ElementState, ElementTree, MatchContext};

use super::{ComputedStyle, Document};
use crate::geometry::Rect;

new_key_type! {
    /// Identifier of an element in a [`StaticDocument`].
    pub struct ElementId;
}

#[derive(Debug, Clone, Default)]
struct ElementData {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    state: ElementState,
    rect: Rect,
    style: ComputedStyle,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    chrome: bool,
}

/// A document snapshot held in memory.
///
/// # Example
///
/// ```
/// use tokenscope::document::{ComputedStyle, Document, StaticDocument};
/// use tokenscope::geometry::Rect;
///
/// let mut doc = StaticDocument::new(800.0);
/// let button = doc.add(None, "button", &["spectrum-Button"]);
/// doc.set_rect(button, Rect::new(0.0, 0.0, 100.0, 32.0));
/// doc.set_style(button, ComputedStyle::new().with("padding-left", "16px"));
///
/// assert_eq!(doc.element_from_point(10.0, 10.0), Some(button));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticDocument {
    elements: SlotMap<ElementId, ElementData>,
    roots: Vec<ElementId>,
    viewport_height: f64,
}

impl StaticDocument {
    /// Create an empty document.
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            ..Default::default()
        }
    }

    /// Append an element under `parent` (or as a new root).
    pub fn add(&mut self, parent: Option<ElementId>, tag: &str, classes: &[&str]) -> ElementId {
        let id = self.elements.insert(ElementData {
            tag: tag.to_ascii_lowercase(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            parent,
            ..Default::default()
        });

        match parent.and_then(|p| self.elements.get_mut(p)) {
            Some(parent) => parent.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Set an element's border box.
    pub fn set_rect(&mut self, element: ElementId, rect: Rect) {
        if let Some(data) = self.elements.get_mut(element) {
            data.rect = rect;
        }
    }

    /// Set an element's computed style.
    pub fn set_style(&mut self, element: ElementId, style: ComputedStyle) {
        if let Some(data) = self.elements.get_mut(element) {
            data.style = style;
        }
    }

    /// Set an element's id attribute.
    pub fn set_id(&mut self, element: ElementId, id: &str) {
        if let Some(data) = self.elements.get_mut(element) {
            data.id = Some(id.to_string());
            data.attributes.push(("id".to_string(), id.to_string()));
        }
    }

    /// Set an attribute.
    pub fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(data) = self.elements.get_mut(element) {
            data.attributes.retain(|(n, _)| n != name);
            data.attributes.push((name.to_string(), value.to_string()));
        }
    }

    /// Set interaction state.
    pub fn set_state(&mut self, element: ElementId, state: ElementState) {
        if let Some(data) = self.elements.get_mut(element) {
            data.state = state;
        }
    }

    /// Mark an element as part of the inspector panel.
    pub fn mark_editor_chrome(&mut self, element: ElementId) {
        if let Some(data) = self.elements.get_mut(element) {
            data.chrome = true;
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check whether the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl ElementTree for StaticDocument {
    type Node = ElementId;

    fn roots(&self) -> Vec<ElementId> {
        self.roots.clone()
    }

    fn parent(&self, node: ElementId) -> Option<ElementId> {
        self.elements.get(node).and_then(|data| data.parent)
    }

    fn children(&self, node: ElementId) -> Vec<ElementId> {
        self.elements
            .get(node)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    fn match_context(&self, node: ElementId) -> MatchContext<'_> {
        match self.elements.get(node) {
            Some(data) => MatchContext {
                tag: &data.tag,
                id: data.id.as_deref(),
                classes: &data.classes,
                attributes: &data.attributes,
                state: data.state,
            },
            None => MatchContext::default(),
        }
    }
}

impl Document for StaticDocument {
    fn bounding_rect(&self, node: ElementId) -> Rect {
        self.elements.get(node).map(|data| data.rect).unwrap_or_default()
    }

    fn computed_style(&self, node: ElementId) -> ComputedStyle {
        self.elements
            .get(node)
            .map(|data| data.style.clone())
            .unwrap_or_default()
    }

    /// The last element in document order whose box contains the point.
    fn element_from_point(&self, x: f64, y: f64) -> Option<ElementId> {
        self.all_nodes()
            .into_iter()
            .rev()
            .find(|node| self.bounding_rect(*node).contains(x, y))
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn is_editor_chrome(&self, node: ElementId) -> bool {
        self.elements.get(node).is_some_and(|data| data.chrome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_and_hit_testing() {
        let mut doc = StaticDocument::new(600.0);
        let root = doc.add(None, "DIV", &["spectrum-CSSExample-example"]);
        let button = doc.add(Some(root), "button", &["spectrum-Button", "spectrum-Button--cta"]);
        let label = doc.add(Some(button), "span", &["spectrum-Button-label"]);

        doc.set_rect(root, Rect::new(0.0, 0.0, 400.0, 200.0));
        doc.set_rect(button, Rect::new(10.0, 10.0, 100.0, 32.0));
        doc.set_rect(label, Rect::new(20.0, 15.0, 60.0, 20.0));

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.match_context(root).tag, "div");
        assert_eq!(doc.parent(label), Some(button));
        assert_eq!(doc.descendants(root), vec![button, label]);
        assert_eq!(doc.class_name(button), "spectrum-Button spectrum-Button--cta");

        assert_eq!(doc.element_from_point(25.0, 20.0), Some(label));
        assert_eq!(doc.element_from_point(12.0, 40.0), Some(button));
        assert_eq!(doc.element_from_point(300.0, 150.0), Some(root));
        assert_eq!(doc.element_from_point(500.0, 150.0), None);
    }

    #[test]
    fn editor_chrome_covers_descendants() {
        let mut doc = StaticDocument::new(600.0);
        let panel = doc.add(None, "div", &["CSSVariableEditor-container"]);
        let field = doc.add(Some(panel), "input", &[]);
        let page = doc.add(None, "div", &[]);
        doc.mark_editor_chrome(panel);

        assert!(doc.inside_editor_chrome(field));
        assert!(!doc.inside_editor_chrome(page));
    }

    #[test]
    fn attributes() {
        let mut doc = StaticDocument::new(600.0);
        let input = doc.add(None, "input", &[]);
        doc.set_id(input, "filter");
        doc.set_attribute(input, "type", "search");
        doc.set_attribute(input, "type", "text");

        let context = doc.match_context(input);
        assert_eq!(context.id, Some("filter"));
        assert_eq!(context.attribute("type"), Some("text"));
    }
}
