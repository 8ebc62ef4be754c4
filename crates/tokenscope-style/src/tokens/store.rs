//! Sheet registry and token extraction.

use std::collections::HashMap;

use crate::rules::{Rule, RuleRef, SheetId, SheetNaming, SheetSource, StyleSheet, StyleSheetProvider};
use crate::tokens::TokenMap;
use crate::{Error, Result};

/// Href fragment that marks a global (non-component) variables sheet.
pub const DEFAULT_GLOBAL_MARKER: &str = "/components/vars/";

/// Whether a named sheet holds global tokens or a component's tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetKind {
    /// Global token sheet (href contains the global marker).
    Global,
    /// Component sheet.
    Component,
}

/// Registry of every loaded sheet.
///
/// Sheets whose href follows the naming convention are registered under their
/// logical name and contribute tokens. All other sheets are kept too, keyed by
/// href or by a digest of their text, so rule lookups can scan every loaded
/// rule. Sheets are never removed; a reload replaces a sheet in place.
#[derive(Debug, Clone)]
pub struct TokenStore {
    naming: SheetNaming,
    global_marker: String,
    sheets: Vec<StyleSheet>,
    by_key: HashMap<String, SheetId>,
    /// Named sheets in registration order.
    registered: Vec<SheetId>,
}

impl TokenStore {
    /// Create an empty store recognizing `<sheet_prefix>-<name>.css` sheets.
    pub fn new(sheet_prefix: &str) -> Result<Self> {
        Ok(Self::with_naming(SheetNaming::new(sheet_prefix)?))
    }

    /// Create an empty store with explicit naming rules.
    pub fn with_naming(naming: SheetNaming) -> Self {
        Self {
            naming,
            global_marker: DEFAULT_GLOBAL_MARKER.to_string(),
            sheets: vec![],
            by_key: HashMap::new(),
            registered: vec![],
        }
    }

    /// Set the href fragment that marks global sheets.
    pub fn with_global_marker(mut self, marker: impl Into<String>) -> Self {
        self.global_marker = marker.into();
        self
    }

    /// Scan every sheet the provider reports.
    ///
    /// New sheets are added; a sheet whose source changed since it was
    /// registered is re-parsed in place. Returns the logical names that were
    /// newly registered or reloaded, in provider order.
    pub fn register_sheets<P: StyleSheetProvider + ?Sized>(
        &mut self,
        provider: &P,
    ) -> Result<Vec<String>> {
        let mut changed = vec![];
        for source in provider.sheets()? {
            if let Some(name) = self.register_source(&source)? {
                changed.push(name);
            }
        }
        Ok(changed)
    }

    /// Register a single sheet source. Returns its logical name when the sheet
    /// is named and was added or reloaded.
    pub fn register_source(&mut self, source: &SheetSource) -> Result<Option<String>> {
        let name = source
            .href
            .as_deref()
            .and_then(|href| self.naming.logical_name(href));
        let key = match (&name, &source.href) {
            (Some(name), _) => name.clone(),
            (None, Some(href)) => href.clone(),
            (None, None) => format!("inline:{:016x}", source.digest()),
        };

        if let Some(&id) = self.by_key.get(&key) {
            let existing = &self.sheets[id.0];
            if existing.digest() == source.digest() {
                return Ok(None);
            }

            let mut sheet = StyleSheet::from_source(source)?;
            sheet.name = name.clone();
            sheet.source_path = existing.source_path.clone();
            sheet.set_id(id);
            self.sheets[id.0] = sheet;

            if let Some(name) = &name {
                tracing::info!("Reloaded sheet {}", name);
            } else {
                tracing::debug!("Reloaded unnamed sheet {}", key);
            }
            return Ok(name);
        }

        let id = SheetId(self.sheets.len());
        let mut sheet = StyleSheet::from_source(source)?;
        sheet.name = name.clone();
        sheet.set_id(id);
        self.sheets.push(sheet);
        self.by_key.insert(key.clone(), id);

        match &name {
            Some(name) => {
                self.registered.push(id);
                tracing::info!("Loaded sheet {}", name);
            }
            None => tracing::debug!("Keeping unnamed sheet {} for rule lookups", key),
        }

        Ok(name)
    }

    /// Every `--*` declaration of a sheet, trimmed; later declarations win.
    pub fn extract_sheet(sheet: &StyleSheet) -> TokenMap {
        let mut tokens = TokenMap::new();
        for rule in &sheet.rules {
            for declaration in &rule.declarations {
                if declaration.is_custom_property() {
                    tokens.insert(
                        declaration.property.clone(),
                        declaration.value.raw().trim(),
                        sheet.id,
                    );
                }
            }
        }
        tokens
    }

    /// Tokens of one named sheet.
    pub fn extract(&self, name: &str) -> Result<TokenMap> {
        Ok(Self::extract_sheet(self.named(name)?))
    }

    /// Union of every named sheet's tokens in registration order; the last
    /// registered sheet wins for duplicate names.
    pub fn all_tokens(&self) -> TokenMap {
        let mut tokens = TokenMap::new();
        for id in &self.registered {
            tokens.extend(&Self::extract_sheet(&self.sheets[id.0]));
        }
        tokens
    }

    /// Current value of `property` in a named sheet's edit target rule.
    ///
    /// Returns an empty string when the property is not declared.
    pub fn get(&self, name: &str, property: &str) -> Result<String> {
        let rule = self.edit_target(name, property)?;
        Ok(rule
            .get(property)
            .map(|d| d.value.raw().trim().to_string())
            .unwrap_or_default())
    }

    /// The rule edits of `property` apply to: the first rule of the sheet that
    /// declares it, else the sheet's first rule.
    pub fn edit_target(&self, name: &str, property: &str) -> Result<&Rule> {
        let sheet = self.named(name)?;
        let index = Self::edit_target_index(sheet, name, property)?;
        Ok(&sheet.rules[index])
    }

    /// Mutable access to the rule edits of `property` apply to.
    pub fn edit_target_mut(&mut self, name: &str, property: &str) -> Result<&mut Rule> {
        let id = self.named_id(name)?;
        let sheet = &mut self.sheets[id.0];
        let index = Self::edit_target_index(sheet, name, property)?;
        Ok(&mut sheet.rules[index])
    }

    fn edit_target_index(sheet: &StyleSheet, name: &str, property: &str) -> Result<usize> {
        if sheet.rules.is_empty() {
            return Err(Error::rule_not_found(format!("no rules in sheet {}", name)));
        }
        Ok(sheet
            .rules
            .iter()
            .position(|rule| rule.declares(property))
            .unwrap_or(0))
    }

    /// Serialize a named sheet: one block per rule, one declaration per line.
    pub fn sheet_as_css(&self, name: &str) -> Result<String> {
        Ok(self.named(name)?.to_css())
    }

    /// Replace a named sheet's rules with those parsed from `css`.
    pub fn set_sheet_from_css(&mut self, name: &str, css: &str) -> Result<()> {
        let id = self.named_id(name)?;
        self.sheets[id.0].replace_css(css)?;
        tracing::debug!("Replaced rules of sheet {}", name);
        Ok(())
    }

    /// Global when the sheet's href contains the global marker.
    pub fn sheet_kind(&self, name: &str) -> Result<SheetKind> {
        let sheet = self.named(name)?;
        let global = sheet
            .href
            .as_deref()
            .is_some_and(|href| href.contains(self.global_marker.as_str()));
        Ok(if global {
            SheetKind::Global
        } else {
            SheetKind::Component
        })
    }

    /// Look up a named sheet.
    pub fn sheet(&self, name: &str) -> Option<&StyleSheet> {
        self.by_key
            .get(name)
            .map(|id| &self.sheets[id.0])
            .filter(|sheet| sheet.name.is_some())
    }

    /// Look up a sheet by id.
    pub fn sheet_by_id(&self, id: SheetId) -> Option<&StyleSheet> {
        self.sheets.get(id.0)
    }

    /// Look up a rule by address.
    pub fn rule(&self, rule: RuleRef) -> Option<&Rule> {
        self.sheets.get(rule.sheet.0)?.rules.get(rule.index)
    }

    /// Every loaded sheet, named or not, in load order.
    pub fn sheets(&self) -> impl Iterator<Item = &StyleSheet> {
        self.sheets.iter()
    }

    /// Named sheets in registration order.
    pub fn named_sheets(&self) -> impl Iterator<Item = &StyleSheet> {
        self.registered.iter().map(|id| &self.sheets[id.0])
    }

    /// Logical names in registration order.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.named_sheets().filter_map(|sheet| sheet.name.as_deref())
    }

    /// Every rule with its address, sheet by sheet.
    pub fn rules(&self) -> impl Iterator<Item = (RuleRef, &Rule)> {
        self.sheets.iter().flat_map(|sheet| {
            sheet
                .rules
                .iter()
                .enumerate()
                .map(move |(index, rule)| (RuleRef::new(sheet.id, index), rule))
        })
    }

    fn named(&self, name: &str) -> Result<&StyleSheet> {
        self.sheet(name).ok_or_else(|| Error::sheet_not_found(name))
    }

    fn named_id(&self, name: &str) -> Result<SheetId> {
        self.named(name).map(|sheet| sheet.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> Vec<SheetSource> {
        vec![
            SheetSource::new(
                "/dist/vars/spectrum-global.css",
                ":root { --spectrum-global-dimension-size-100: 8px; --spectrum-global-color-blue-500: #2680EB; }",
            ),
            SheetSource::new(
                "/dist/vars/spectrum-light.css",
                ":root { --spectrum-global-color-blue-500: #1473E6; }\n@media (min-width: 1px) { :root { --spectrum-alias-focus-color: var(--spectrum-global-color-blue-500); } }",
            ),
            SheetSource::new("/docs/site.css", ".page { --site-gap: 4px; }"),
            SheetSource::inline(".inline { color: red; }"),
        ]
    }

    #[test]
    fn registers_named_and_keeps_unnamed() {
        let mut store = TokenStore::new("spectrum").unwrap();
        let names = store.register_sheets(&sources()).unwrap();

        assert_eq!(names, vec!["global", "light"]);
        assert_eq!(store.sheets().count(), 4);
        assert_eq!(store.sheet_names().collect::<Vec<_>>(), vec!["global", "light"]);
        assert!(store.sheet("/docs/site.css").is_none());
    }

    #[test]
    fn rescanning_unchanged_sheets_is_a_no_op() {
        let mut store = TokenStore::new("spectrum").unwrap();
        store.register_sheets(&sources()).unwrap();

        assert!(store.register_sheets(&sources()).unwrap().is_empty());
        assert_eq!(store.sheets().count(), 4);
    }

    #[test]
    fn reload_replaces_in_place() {
        let mut store = TokenStore::new("spectrum").unwrap();
        store.register_sheets(&sources()).unwrap();

        let mut changed = sources();
        changed[0].css = ":root { --spectrum-global-dimension-size-100: 10px; }".to_string();
        assert_eq!(store.register_sheets(&changed).unwrap(), vec!["global"]);

        let global = store.sheet("global").unwrap();
        assert_eq!(global.id, SheetId(0));
        assert_eq!(
            store.extract("global").unwrap().get("--spectrum-global-dimension-size-100"),
            Some("10px")
        );
    }

    #[test]
    fn all_tokens_last_registration_wins() {
        let mut store = TokenStore::new("spectrum").unwrap();
        store.register_sheets(&sources()).unwrap();
        let tokens = store.all_tokens();

        assert_eq!(tokens.get("--spectrum-global-color-blue-500"), Some("#1473E6"));
        assert_eq!(
            tokens.get("--spectrum-alias-focus-color"),
            Some("var(--spectrum-global-color-blue-500)")
        );
        // Unnamed sheets never contribute tokens
        assert!(!tokens.contains("--site-gap"));
    }

    #[test]
    fn zero_rule_sheet_extracts_nothing() {
        let mut store = TokenStore::new("spectrum").unwrap();
        store
            .register_source(&SheetSource::new("spectrum-empty.css", "/* nothing */"))
            .unwrap();

        assert!(store.extract("empty").unwrap().is_empty());
        assert!(store.get("empty", "--a").unwrap_err().is_not_found());
    }

    #[test]
    fn get_and_edit_target() {
        let mut store = TokenStore::new("spectrum").unwrap();
        store
            .register_source(&SheetSource::new(
                "components/button/vars.css",
                ".a { --x: 1px; } .b { --y: 2px; }",
            ))
            .unwrap();

        assert_eq!(store.get("button", "--y").unwrap(), "2px");
        assert_eq!(store.edit_target("button", "--y").unwrap().selector_text, ".b");
        assert_eq!(store.edit_target("button", "--new").unwrap().selector_text, ".a");
        assert_eq!(store.get("button", "--new").unwrap(), "");
        assert!(store.get("missing", "--x").unwrap_err().is_not_found());
    }

    #[test]
    fn sheet_kinds_and_css_round_trip() {
        let mut store = TokenStore::new("spectrum").unwrap();
        store
            .register_source(&SheetSource::new(
                "/dist/components/vars/spectrum-global.css",
                ":root { --a: 1px; }",
            ))
            .unwrap();
        store
            .register_source(&SheetSource::new("/dist/components/button/vars.css", ".b { --b: 2px; }"))
            .unwrap();

        assert_eq!(store.sheet_kind("global").unwrap(), SheetKind::Global);
        assert_eq!(store.sheet_kind("button").unwrap(), SheetKind::Component);

        store.set_sheet_from_css("button", ".b { --b: 3px; }").unwrap();
        assert_eq!(store.sheet_as_css("button").unwrap(), ".b {\n  --b: 3px;\n}");
    }
}
