//! Ordered name → value token mappings.

use std::collections::HashMap;

use crate::rules::SheetId;

/// A design token: a custom property declared in a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Property name including the leading `--`.
    pub name: String,
    /// Declared value, trimmed.
    pub value: String,
    /// Sheet that declared the value.
    pub sheet: SheetId,
}

/// Token mapping that keeps first-insertion order.
///
/// Inserting an existing name replaces its value and sheet but keeps the
/// name's original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    tokens: Vec<Token>,
    index: HashMap<String, usize>,
}

impl TokenMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a token.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>, sheet: SheetId) {
        let name = name.into();
        let value = value.into();
        match self.index.get(&name) {
            Some(&position) => {
                let token = &mut self.tokens[position];
                token.value = value;
                token.sheet = sheet;
            }
            None => {
                self.index.insert(name.clone(), self.tokens.len());
                self.tokens.push(Token { name, value, sheet });
            }
        }
    }

    /// Overlay every token of `other`, later values winning.
    pub fn extend(&mut self, other: &TokenMap) {
        for token in &other.tokens {
            self.insert(token.name.clone(), token.value.clone(), token.sheet);
        }
    }

    /// Value declared for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.token(name).map(|t| t.value.as_str())
    }

    /// Full token entry for `name`.
    pub fn token(&self, name: &str) -> Option<&Token> {
        self.index.get(name).map(|&i| &self.tokens[i])
    }

    /// Check whether `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Token names in first-insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.name.as_str())
    }
}

impl<'a> IntoIterator for &'a TokenMap {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_keeps_position() {
        let mut map = TokenMap::new();
        map.insert("--a", "1px", SheetId(0));
        map.insert("--b", "2px", SheetId(0));
        map.insert("--a", "3px", SheetId(1));

        assert_eq!(map.names().collect::<Vec<_>>(), vec!["--a", "--b"]);
        assert_eq!(map.get("--a"), Some("3px"));
        assert_eq!(map.token("--a").unwrap().sheet, SheetId(1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn extend_overlays() {
        let mut base = TokenMap::new();
        base.insert("--a", "1px", SheetId(0));

        let mut overlay = TokenMap::new();
        overlay.insert("--a", "2px", SheetId(1));
        overlay.insert("--c", "red", SheetId(1));

        base.extend(&overlay);
        assert_eq!(base.get("--a"), Some("2px"));
        assert_eq!(base.get("--c"), Some("red"));
    }
}
