//! Mapping elements to tokens and tokens back to highlights.
//!
//! [`tokens_for_tree`] answers "which tokens style this component",
//! [`token_highlights`] answers "where on screen does this token act".

mod component;

pub use component::ComponentNaming;

use std::collections::HashSet;

use tokenscope_style::index::RuleIndex;
use tokenscope_style::selector::{Selector, SelectorMatcher};
use tokenscope_style::tokens::TokenStore;

use crate::document::Document;
use crate::geometry::{GeometryMapper, HighlightSpec, InspectTarget};
use crate::logging::targets;

/// Tokens referenced by the rules styling `element` and its descendants.
///
/// Only elements whose class attribute mentions `class_prefix` are
/// considered, and elements sharing a class attribute are looked at once.
/// The result keeps first-seen order without duplicates.
pub fn tokens_for_tree<D: Document + ?Sized>(
    store: &TokenStore,
    doc: &D,
    element: D::Node,
    class_prefix: &str,
) -> Vec<String> {
    let index = RuleIndex::new(store);
    let mut seen_classes = HashSet::new();
    let mut seen_tokens = HashSet::new();
    let mut tokens = vec![];

    let mut nodes = vec![element];
    nodes.extend(doc.descendants(element));

    for node in nodes {
        let class_name = doc.class_name(node);
        if !class_name.contains(class_prefix) || !seen_classes.insert(class_name) {
            continue;
        }
        let rules = index.rules_matching(doc, node);
        for token in RuleIndex::tokens_in_rules(rules.iter().map(|(_, rule)| *rule)) {
            if seen_tokens.insert(token.clone()) {
                tokens.push(token);
            }
        }
    }

    tracing::debug!(target: targets::INSPECT, "Found {} tokens under element", tokens.len());
    tokens
}

/// Highlights for every place `token` drives a property.
///
/// Each rule referencing the token contributes the first element it styles:
/// within `within` when given, otherwise anywhere under `example_scope`.
/// Rules without a matching element or without a visual mapping are skipped.
pub fn token_highlights<D: Document + ?Sized>(
    store: &TokenStore,
    mapper: &GeometryMapper,
    doc: &D,
    token: &str,
    within: Option<D::Node>,
    example_scope: &Selector,
) -> Vec<HighlightSpec> {
    let index = RuleIndex::new(store);
    let mut highlights = vec![];

    for (_, rule) in index.rules_referencing(token) {
        let Some(property) = RuleIndex::property_driving_reference(rule, token) else {
            continue;
        };

        let elements = match within {
            Some(root) => SelectorMatcher::query_all(doc, Some(root), &rule.selectors),
            None => {
                let scoped: Vec<Selector> = rule
                    .selectors
                    .iter()
                    .map(|selector| selector.scoped(example_scope))
                    .collect();
                SelectorMatcher::query_all(doc, None, &scoped)
            }
        };

        let Some(&element) = elements.first() else {
            tracing::debug!(
                target: targets::INSPECT,
                "Could not find element for {}",
                rule.selector_text
            );
            continue;
        };

        let target = InspectTarget {
            rule,
            property,
            token,
        };
        if let Some(spec) =
            mapper.rect_for(&target, &doc.computed_style(element), doc.bounding_rect(element))
        {
            highlights.push(spec);
        }
    }

    highlights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ComputedStyle, StaticDocument};
    use crate::geometry::{Anchor, Rect};
    use tokenscope_style::rules::SheetSource;

    const BUTTON_CSS: &str = "\
.spectrum-Button {
  padding: 0 var(--spectrum-button-padding-x);
  border-width: var(--spectrum-button-border-size);
}
.spectrum-Button-label { color: var(--spectrum-button-text-color); }
.spectrum-Icon { width: var(--spectrum-icon-size); }";

    fn store() -> TokenStore {
        let mut store = TokenStore::new("spectrum").unwrap();
        store
            .register_sheets(&vec![SheetSource::new("/components/button/vars.css", BUTTON_CSS)])
            .unwrap();
        store
    }

    fn doc() -> (StaticDocument, crate::document::ElementId) {
        let mut doc = StaticDocument::new(800.0);
        let example = doc.add(None, "div", &["spectrum-CSSExample-example"]);
        let button = doc.add(Some(example), "button", &["spectrum-Button"]);
        doc.set_rect(button, Rect::new(100.0, 200.0, 120.0, 32.0));
        doc.set_style(
            button,
            ComputedStyle::new()
                .with("padding-left", "16px")
                .with("padding-right", "16px")
                .with("border-width", "2px"),
        );
        let label = doc.add(Some(button), "span", &["spectrum-Button-label"]);
        doc.add(Some(button), "span", &["spectrum-Button-label"]);
        doc.set_rect(label, Rect::new(116.0, 206.0, 40.0, 20.0));
        doc.add(Some(button), "span", &["plain"]);
        (doc, button)
    }

    #[test]
    fn subtree_tokens_are_deduplicated() {
        let store = store();
        let (doc, button) = doc();

        let tokens = tokens_for_tree(&store, &doc, button, "spectrum-");
        assert_eq!(
            tokens,
            vec![
                "--spectrum-button-padding-x",
                "--spectrum-button-border-size",
                "--spectrum-button-text-color",
            ]
        );
    }

    #[test]
    fn token_highlight_under_example_scope() {
        let store = store();
        let (doc, _) = doc();
        let mapper = GeometryMapper::new("--spectrum-");
        let scope = Selector::parse(".spectrum-CSSExample-example").unwrap();

        let specs = token_highlights(&store, &mapper, &doc, "--spectrum-button-padding-x", None, &scope);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].label, "padding: button-padding-x");
        // Left is the last side carrying the token
        assert_eq!(specs[0].from, Some(Anchor::Left));

        // No element styled by .spectrum-Icon
        let specs = token_highlights(&store, &mapper, &doc, "--spectrum-icon-size", None, &scope);
        assert!(specs.is_empty());
    }

    #[test]
    fn token_highlight_within_subtree() {
        let store = store();
        let (doc, button) = doc();
        let mapper = GeometryMapper::new("--spectrum-");
        let scope = Selector::parse(".unused").unwrap();

        let specs = token_highlights(
            &store,
            &mapper,
            &doc,
            "--spectrum-button-text-color",
            Some(button),
            &scope,
        );
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].rect, Rect::new(116.0, 206.0, 40.0, 20.0));
        assert!(specs[0].fade_quickly);
    }
}
