//! Single style rule definition.

use crate::parser::Value;
use crate::rules::SheetId;
use crate::selector::Selector;

/// Address of a rule: its sheet and position in the sheet's rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleRef {
    /// Owning sheet.
    pub sheet: SheetId,
    /// Index into the sheet's flattened rules.
    pub index: usize,
}

impl RuleRef {
    /// Create a rule address.
    pub fn new(sheet: SheetId, index: usize) -> Self {
        Self { sheet, index }
    }
}

/// One `property: value` entry of a rule's declaration block.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Property name. Custom properties keep their case, others are lowercase.
    pub property: String,
    /// Parsed value; `value.raw()` is the trimmed source text.
    pub value: Value,
    /// Whether the declaration carried `!important`.
    pub important: bool,
}

impl Declaration {
    /// Create a declaration, parsing `value`.
    pub fn new(property: impl Into<String>, value: &str, important: bool) -> Self {
        Self {
            property: property.into(),
            value: Value::parse(value),
            important,
        }
    }

    /// Check if this declares a custom property (`--*`).
    pub fn is_custom_property(&self) -> bool {
        self.property.starts_with("--")
    }
}

/// A style rule: selector list plus declaration block.
///
/// Rules nested inside conditional at-rules are flattened into the sheet's
/// rule list and remember the enclosing condition.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Selector list as written, trimmed (may contain commas).
    pub selector_text: String,
    /// Parsed selectors. Entries that failed to parse are left out.
    pub selectors: Vec<Selector>,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
    /// Enclosing at-rule conditions, e.g. `@media (max-width: 600px)`.
    pub condition: Option<String>,
    /// Owning sheet.
    pub sheet: SheetId,
    /// Source order within the sheet.
    pub order: u32,
}

impl Rule {
    /// Create a rule from selector text and declarations.
    pub fn new(selector_text: impl Into<String>, declarations: Vec<Declaration>, order: u32) -> Self {
        let selector_text = selector_text.into().trim().to_string();
        let selectors = crate::parser::parse_selector_list(&selector_text);
        Self {
            selector_text,
            selectors,
            declarations,
            condition: None,
            sheet: SheetId::default(),
            order,
        }
    }

    /// Current value of `property`: the last declaration wins.
    pub fn get(&self, property: &str) -> Option<&Declaration> {
        self.declarations.iter().rev().find(|d| d.property == property)
    }

    /// Check whether the block declares `property`.
    pub fn declares(&self, property: &str) -> bool {
        self.declarations.iter().any(|d| d.property == property)
    }

    /// Set a property value, replacing the last existing declaration or
    /// appending a new one.
    pub fn set(&mut self, property: &str, value: &str) {
        match self
            .declarations
            .iter_mut()
            .rev()
            .find(|d| d.property == property)
        {
            Some(declaration) => declaration.value = Value::parse(value),
            None => self
                .declarations
                .push(Declaration::new(property, value, false)),
        }
    }

    /// Check whether the declaration block references `token` through a
    /// `var()` anywhere, or declares it.
    pub fn references(&self, token: &str) -> bool {
        self.declarations
            .iter()
            .any(|d| d.property == token || d.value.references_token(token))
    }

    /// Selector texts of the comma list, trimmed.
    pub fn selector_texts(&self) -> impl Iterator<Item = &str> {
        self.selector_text.split(',').map(str::trim)
    }

    /// Serialize as `selector {\n  prop: value;\n}`.
    pub fn to_css(&self) -> String {
        let mut out = format!("{} {{\n", self.selector_text);
        for declaration in &self.declarations {
            out.push_str("  ");
            out.push_str(&declaration.property);
            out.push_str(": ");
            out.push_str(declaration.value.raw());
            if declaration.important {
                out.push_str(" !important");
            }
            out.push_str(";\n");
        }
        out.push('}');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button_rule() -> Rule {
        Rule::new(
            ".spectrum-Button, .spectrum-ActionButton",
            vec![
                Declaration::new("border-radius", "var(--spectrum-button-border-radius)", false),
                Declaration::new("padding", "0 var(--spectrum-button-padding-x)", false),
            ],
            0,
        )
    }

    #[test]
    fn rule_creation() {
        let rule = button_rule();

        assert_eq!(rule.selectors.len(), 2);
        assert_eq!(
            rule.selector_texts().collect::<Vec<_>>(),
            vec![".spectrum-Button", ".spectrum-ActionButton"]
        );
        assert!(rule.references("--spectrum-button-padding-x"));
        assert!(!rule.references("--spectrum-button-padding"));
    }

    #[test]
    fn set_replaces_or_appends() {
        let mut rule = button_rule();

        rule.set("padding", "4px");
        assert_eq!(rule.get("padding").unwrap().value.raw(), "4px");
        assert_eq!(rule.declarations.len(), 2);

        rule.set("color", "red");
        assert_eq!(rule.declarations.len(), 3);
    }

    #[test]
    fn serializes_block() {
        let rule = Rule::new(":root", vec![Declaration::new("--a", "1px", true)], 0);
        assert_eq!(rule.to_css(), ":root {\n  --a: 1px !important;\n}");
    }
}
