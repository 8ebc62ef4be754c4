//! Rule lookups across every loaded sheet.

use crate::rules::{Rule, RuleRef, StyleSheet};
use crate::selector::{ElementTree, SelectorMatcher};
use crate::tokens::TokenStore;

/// Finds rules by token reference, by element, or by selector.
///
/// Results are always in encounter order: sheet by sheet, rule by rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleIndex<'a> {
    store: &'a TokenStore,
}

impl<'a> RuleIndex<'a> {
    /// Index over every sheet of `store`, named or not.
    pub fn new(store: &'a TokenStore) -> Self {
        Self { store }
    }

    /// Resolve a rule address.
    pub fn rule(&self, rule: RuleRef) -> Option<&'a Rule> {
        self.store.rule(rule)
    }

    /// Every rule whose declaration block references `token` or declares it.
    ///
    /// References are found structurally in parsed values (including fallbacks
    /// and nested functions) and compare whole identifiers, so `--a-b` never
    /// matches `--a-bc`.
    pub fn rules_referencing(&self, token: &str) -> Vec<(RuleRef, &'a Rule)> {
        self.store
            .rules()
            .filter(|(_, rule)| rule.references(token))
            .collect()
    }

    /// Every rule with a selector the element satisfies.
    pub fn rules_matching<T: ElementTree + ?Sized>(
        &self,
        tree: &T,
        node: T::Node,
    ) -> Vec<(RuleRef, &'a Rule)> {
        self.store
            .rules()
            .filter(|(_, rule)| SelectorMatcher::matches_any(tree, node, &rule.selectors))
            .collect()
    }

    /// Every rule whose comma list contains one of `selectors` verbatim.
    pub fn rules_for_selectors(&self, selectors: &[&str]) -> Vec<(RuleRef, &'a Rule)> {
        self.store
            .rules()
            .filter(|(_, rule)| rule.selector_texts().any(|text| selectors.contains(&text)))
            .collect()
    }

    /// Named sheets holding at least one rule for `selectors`.
    pub fn sheets_for_selectors(&self, selectors: &[&str]) -> Vec<&'a StyleSheet> {
        self.store
            .named_sheets()
            .filter(|sheet| {
                sheet
                    .rules
                    .iter()
                    .any(|rule| rule.selector_texts().any(|text| selectors.contains(&text)))
            })
            .collect()
    }

    /// Every token referenced by the rules, in order, duplicates included.
    pub fn tokens_in_rules<'r>(rules: impl IntoIterator<Item = &'r Rule>) -> Vec<String> {
        let mut tokens = vec![];
        for rule in rules {
            for declaration in &rule.declarations {
                tokens.extend(declaration.value.references().into_iter().map(str::to_string));
            }
        }
        tokens
    }

    /// The property whose value the token drives within `rule`.
    ///
    /// Candidates are the declarations referencing the token, in order. The
    /// first is kept unless a later candidate's first hyphen segment
    /// (lowercased) occurs in the lowercased token name, in which case the
    /// later one replaces it. The first segment of a custom property name is
    /// empty and therefore always occurs.
    pub fn property_driving_reference<'r>(rule: &'r Rule, token: &str) -> Option<&'r str> {
        let token_lower = token.to_lowercase();
        let mut property: Option<&str> = None;

        for declaration in &rule.declarations {
            if !declaration.value.references_token(token) {
                continue;
            }
            let candidate = declaration.property.as_str();
            if property.is_none() {
                property = Some(candidate);
                continue;
            }
            let segment = candidate.split('-').next().unwrap_or_default().to_lowercase();
            if token_lower.contains(&segment) {
                property = Some(candidate);
            }
        }

        property
    }
}
