//! Selector matching against an element tree.

use std::fmt::Debug;
use std::hash::Hash;

use super::{AttributeSelector, Combinator, PseudoClass, Selector, SelectorPart, TypeSelector};

/// Intrinsic element data used for matching a single compound selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchContext<'a> {
    /// Tag name, lowercase.
    pub tag: &'a str,
    /// Element id (for #id selectors).
    pub id: Option<&'a str>,
    /// The element's class list.
    pub classes: &'a [String],
    /// Attributes as (name, value) pairs.
    pub attributes: &'a [(String, String)],
    /// Interaction state flags.
    pub state: ElementState,
}

impl MatchContext<'_> {
    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Check whether the element carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Element interaction state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementState {
    /// Pointer is over the element.
    pub hovered: bool,
    /// Element is being activated.
    pub active: bool,
    /// Element has keyboard focus.
    pub focused: bool,
    /// Focus should be visibly indicated.
    pub focus_visible: bool,
    /// Element is disabled.
    pub disabled: bool,
    /// Element is checked.
    pub checked: bool,
}

/// A tree of elements that selectors can be matched against.
///
/// Nodes are lightweight handles; all structural queries go through the tree.
pub trait ElementTree {
    /// Handle identifying one element.
    type Node: Copy + Eq + Hash + Debug;

    /// Top-level elements in document order.
    fn roots(&self) -> Vec<Self::Node>;

    /// Parent element, if any.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Child elements in document order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Matching data for one element.
    fn match_context(&self, node: Self::Node) -> MatchContext<'_>;

    /// Siblings before `node`, nearest first.
    fn previous_siblings(&self, node: Self::Node) -> Vec<Self::Node> {
        let siblings = match self.parent(node) {
            Some(parent) => self.children(parent),
            None => self.roots(),
        };
        let position = siblings.iter().position(|s| *s == node).unwrap_or(0);
        siblings[..position].iter().rev().copied().collect()
    }

    /// Ancestors from parent to root.
    fn ancestors(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut out = vec![];
        let mut current = self.parent(node);
        while let Some(ancestor) = current {
            out.push(ancestor);
            current = self.parent(ancestor);
        }
        out
    }

    /// Descendants of `node` in document order, excluding `node`.
    fn descendants(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut out = vec![];
        let mut stack: Vec<Self::Node> = self.children(node).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        out
    }

    /// Every element in document order.
    fn all_nodes(&self) -> Vec<Self::Node> {
        let mut out = vec![];
        for root in self.roots() {
            out.push(root);
            out.extend(self.descendants(root));
        }
        out
    }
}

/// Selector matching engine.
pub struct SelectorMatcher;

impl SelectorMatcher {
    /// Check if a compound selector matches one element.
    pub fn part_matches<T: ElementTree + ?Sized>(
        tree: &T,
        node: T::Node,
        part: &SelectorPart,
    ) -> bool {
        if part.pseudo_element.is_some() {
            return false;
        }

        let context = tree.match_context(node);

        if let Some(TypeSelector::Tag(name)) = &part.type_selector
            && !name.eq_ignore_ascii_case(context.tag)
        {
            return false;
        }

        if let Some(id) = &part.id {
            match context.id {
                Some(element_id) if element_id == id => {}
                _ => return false,
            }
        }

        // All classes must be present
        for class in &part.classes {
            if !context.has_class(class) {
                return false;
            }
        }

        for attribute in &part.attributes {
            if !Self::attribute_matches(attribute, &context) {
                return false;
            }
        }

        part.pseudo_classes
            .iter()
            .all(|pseudo| Self::pseudo_matches(tree, node, pseudo, &context))
    }

    fn attribute_matches(attribute: &AttributeSelector, context: &MatchContext<'_>) -> bool {
        if attribute.name == "class" && attribute.operation.is_some() {
            let joined = context.classes.join(" ");
            return attribute.matches_value(Some(&joined));
        }
        if attribute.name == "id" {
            return attribute.matches_value(context.id);
        }
        attribute.matches_value(context.attribute(&attribute.name))
    }

    fn pseudo_matches<T: ElementTree + ?Sized>(
        tree: &T,
        node: T::Node,
        pseudo: &PseudoClass,
        context: &MatchContext<'_>,
    ) -> bool {
        let disabled = context.state.disabled || context.attribute("disabled").is_some();
        match pseudo {
            PseudoClass::Hover => context.state.hovered,
            PseudoClass::Active => context.state.active,
            PseudoClass::Focus => context.state.focused,
            PseudoClass::FocusVisible => context.state.focus_visible,
            PseudoClass::FocusWithin => {
                context.state.focused
                    || tree
                        .descendants(node)
                        .into_iter()
                        .any(|d| tree.match_context(d).state.focused)
            }
            PseudoClass::Disabled => disabled,
            PseudoClass::Enabled => !disabled,
            PseudoClass::Checked => context.state.checked || context.attribute("checked").is_some(),
            PseudoClass::Root => tree.parent(node).is_none(),
            PseudoClass::FirstChild => tree.previous_siblings(node).is_empty(),
            PseudoClass::LastChild => Self::following_count(tree, node) == 0,
            PseudoClass::OnlyChild => {
                tree.previous_siblings(node).is_empty() && Self::following_count(tree, node) == 0
            }
            PseudoClass::NthChild(expr) => expr.matches(tree.previous_siblings(node).len()),
            PseudoClass::Empty => tree.children(node).is_empty(),
            PseudoClass::Not(inner) => !Self::part_matches(tree, node, inner),
            PseudoClass::Unsupported(_) => false,
        }
    }

    fn following_count<T: ElementTree + ?Sized>(tree: &T, node: T::Node) -> usize {
        let siblings = match tree.parent(node) {
            Some(parent) => tree.children(parent),
            None => tree.roots(),
        };
        match siblings.iter().position(|s| *s == node) {
            Some(position) => siblings.len() - position - 1,
            None => 0,
        }
    }

    /// Check if a full selector matches, considering combinators.
    ///
    /// Walks the selector from right to left, backtracking over ancestors and
    /// siblings when a descendant or general-sibling step has several
    /// candidates.
    pub fn matches<T: ElementTree + ?Sized>(tree: &T, node: T::Node, selector: &Selector) -> bool {
        if selector.parts.is_empty() {
            return false;
        }
        Self::matches_from(tree, node, selector, selector.parts.len() - 1)
    }

    fn matches_from<T: ElementTree + ?Sized>(
        tree: &T,
        node: T::Node,
        selector: &Selector,
        index: usize,
    ) -> bool {
        if !Self::part_matches(tree, node, &selector.parts[index]) {
            return false;
        }
        if index == 0 {
            return true;
        }

        let next = index - 1;
        match selector.combinators[next] {
            Combinator::Descendant => tree
                .ancestors(node)
                .into_iter()
                .any(|ancestor| Self::matches_from(tree, ancestor, selector, next)),
            Combinator::Child => tree
                .parent(node)
                .is_some_and(|parent| Self::matches_from(tree, parent, selector, next)),
            Combinator::AdjacentSibling => tree
                .previous_siblings(node)
                .first()
                .is_some_and(|sibling| Self::matches_from(tree, *sibling, selector, next)),
            Combinator::GeneralSibling => tree
                .previous_siblings(node)
                .into_iter()
                .any(|sibling| Self::matches_from(tree, sibling, selector, next)),
        }
    }

    /// Check if any selector of a list matches.
    pub fn matches_any<T: ElementTree + ?Sized>(
        tree: &T,
        node: T::Node,
        selectors: &[Selector],
    ) -> bool {
        selectors.iter().any(|s| Self::matches(tree, node, s))
    }

    /// All elements matching any selector, in document order.
    ///
    /// With a `scope`, the candidates are the scope element itself followed by
    /// its descendants; otherwise every element in the tree.
    pub fn query_all<T: ElementTree + ?Sized>(
        tree: &T,
        scope: Option<T::Node>,
        selectors: &[Selector],
    ) -> Vec<T::Node> {
        let candidates = match scope {
            Some(root) => {
                let mut nodes = vec![root];
                nodes.extend(tree.descendants(root));
                nodes
            }
            None => tree.all_nodes(),
        };
        candidates
            .into_iter()
            .filter(|node| Self::matches_any(tree, *node, selectors))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{AttributeOp, NthExpr};

    struct Element {
        tag: &'static str,
        classes: Vec<String>,
        attributes: Vec<(String, String)>,
        parent: Option<usize>,
        children: Vec<usize>,
    }

    /// Flat arena tree for tests.
    #[derive(Default)]
    struct Tree {
        elements: Vec<Element>,
    }

    impl Tree {
        fn add(&mut self, parent: Option<usize>, tag: &'static str, classes: &[&str]) -> usize {
            let id = self.elements.len();
            self.elements.push(Element {
                tag,
                classes: classes.iter().map(|c| c.to_string()).collect(),
                attributes: vec![],
                parent,
                children: vec![],
            });
            if let Some(parent) = parent {
                self.elements[parent].children.push(id);
            }
            id
        }
    }

    impl ElementTree for Tree {
        type Node = usize;

        fn roots(&self) -> Vec<usize> {
            (0..self.elements.len())
                .filter(|i| self.elements[*i].parent.is_none())
                .collect()
        }

        fn parent(&self, node: usize) -> Option<usize> {
            self.elements[node].parent
        }

        fn children(&self, node: usize) -> Vec<usize> {
            self.elements[node].children.clone()
        }

        fn match_context(&self, node: usize) -> MatchContext<'_> {
            let element = &self.elements[node];
            MatchContext {
                tag: element.tag,
                id: None,
                classes: &element.classes,
                attributes: &element.attributes,
                state: ElementState::default(),
            }
        }
    }

    fn sample() -> (Tree, usize, usize, usize) {
        let mut tree = Tree::default();
        let root = tree.add(None, "div", &["spectrum-CSSExample-example"]);
        let button = tree.add(Some(root), "button", &["spectrum-Button", "spectrum-Button--cta"]);
        let label = tree.add(Some(button), "span", &["spectrum-Button-label"]);
        (tree, root, button, label)
    }

    #[test]
    fn compound_matches() {
        let (tree, _, button, _) = sample();

        let part = SelectorPart::tag_only("button").with_class("spectrum-Button");
        assert!(SelectorMatcher::part_matches(&tree, button, &part));

        let part = SelectorPart::class_only("spectrum-Button").with_class("is-selected");
        assert!(!SelectorMatcher::part_matches(&tree, button, &part));
    }

    #[test]
    fn descendant_backtracks_over_ancestors() {
        let (tree, _, _, label) = sample();

        let selector = Selector::parse(".spectrum-CSSExample-example .spectrum-Button-label").unwrap();
        assert!(SelectorMatcher::matches(&tree, label, &selector));

        let selector = Selector::parse(".spectrum-CSSExample-example > .spectrum-Button-label").unwrap();
        assert!(!SelectorMatcher::matches(&tree, label, &selector));
    }

    #[test]
    fn structural_pseudo_classes() {
        let mut tree = Tree::default();
        let list = tree.add(None, "ul", &[]);
        let first = tree.add(Some(list), "li", &[]);
        let second = tree.add(Some(list), "li", &[]);

        let first_child = SelectorPart::new().with_pseudo(PseudoClass::FirstChild);
        assert!(SelectorMatcher::part_matches(&tree, first, &first_child));
        assert!(!SelectorMatcher::part_matches(&tree, second, &first_child));

        let even = SelectorPart::new().with_pseudo(PseudoClass::NthChild(NthExpr::even()));
        assert!(SelectorMatcher::part_matches(&tree, second, &even));

        let root = SelectorPart::new().with_pseudo(PseudoClass::Root);
        assert!(SelectorMatcher::part_matches(&tree, list, &root));

        let sibling = Selector::parse("li + li").unwrap();
        assert!(SelectorMatcher::matches(&tree, second, &sibling));
        assert!(!SelectorMatcher::matches(&tree, first, &sibling));
    }

    #[test]
    fn attributes_and_pseudo_elements() {
        let (mut tree, _, button, _) = sample();
        tree.elements[button]
            .attributes
            .push(("dir".to_string(), "rtl".to_string()));

        let part = SelectorPart::class_only("spectrum-Button")
            .with_attribute(AttributeSelector::with_op("dir", AttributeOp::Equals, "rtl"));
        assert!(SelectorMatcher::part_matches(&tree, button, &part));

        let mut before = SelectorPart::class_only("spectrum-Button");
        before.pseudo_element = Some("before".to_string());
        assert!(!SelectorMatcher::part_matches(&tree, button, &before));
    }

    #[test]
    fn query_all_with_scope() {
        let (tree, root, button, label) = sample();
        let selectors = vec![Selector::parse("*").unwrap()];

        assert_eq!(
            SelectorMatcher::query_all(&tree, Some(button), &selectors),
            vec![button, label]
        );
        assert_eq!(
            SelectorMatcher::query_all(&tree, None, &selectors),
            vec![root, button, label]
        );
    }
}
