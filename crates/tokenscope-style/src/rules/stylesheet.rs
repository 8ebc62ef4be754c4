//! Stylesheet collection and management.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::rules::Rule;
use crate::{Error, Result};

/// Position of a sheet in its store, stable for the store's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SheetId(pub usize);

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sheet#{}", self.0)
    }
}

/// A loaded sheet as reported by a sheet provider: where it came from and its
/// CSS text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSource {
    /// Href or path the sheet was loaded from; `None` for inline sheets.
    pub href: Option<String>,
    /// Full CSS text.
    pub css: String,
}

impl SheetSource {
    /// A sheet loaded from `href`.
    pub fn new(href: impl Into<String>, css: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            css: css.into(),
        }
    }

    /// An inline `<style>` sheet.
    pub fn inline(css: impl Into<String>) -> Self {
        Self {
            href: None,
            css: css.into(),
        }
    }

    /// Hash of href and text, used to detect reloads.
    pub fn digest(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.href.hash(&mut hasher);
        self.css.hash(&mut hasher);
        hasher.finish()
    }
}

/// A parsed stylesheet.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    /// Position in the owning store.
    pub id: SheetId,
    /// Logical name derived from the href, if it follows the naming convention.
    pub name: Option<String>,
    /// Href the sheet was loaded from.
    pub href: Option<String>,
    /// Flattened rules in source order.
    pub rules: Vec<Rule>,
    /// Source file path (for hot-reload tracking).
    pub source_path: Option<PathBuf>,
    digest: u64,
}

impl StyleSheet {
    /// Load a stylesheet from a CSS file.
    ///
    /// The path doubles as the sheet's href.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let source = SheetSource::new(path.to_string_lossy(), content);
        let mut sheet = Self::from_source(&source)?;
        sheet.source_path = Some(path.to_path_buf());
        Ok(sheet)
    }

    /// Parse an inline stylesheet from CSS text.
    pub fn from_css(css: &str) -> Result<Self> {
        Self::from_source(&SheetSource::inline(css))
    }

    /// Parse a provider-reported sheet.
    pub fn from_source(source: &SheetSource) -> Result<Self> {
        let rules = crate::parser::parse_css(&source.css)?;
        Ok(Self {
            id: SheetId::default(),
            name: None,
            href: source.href.clone(),
            rules,
            source_path: None,
            digest: source.digest(),
        })
    }

    /// Assign the sheet's position, updating every rule's back-reference.
    pub fn set_id(&mut self, id: SheetId) {
        self.id = id;
        for rule in &mut self.rules {
            rule.sheet = id;
        }
    }

    /// Replace all rules with those parsed from `css`.
    pub fn replace_css(&mut self, css: &str) -> Result<()> {
        let mut rules = crate::parser::parse_css(css)?;
        for rule in &mut rules {
            rule.sheet = self.id;
        }
        self.rules = rules;
        self.digest = SheetSource {
            href: self.href.clone(),
            css: css.to_string(),
        }
        .digest();
        Ok(())
    }

    /// Digest of the source this sheet was parsed from.
    pub fn digest(&self) -> u64 {
        self.digest
    }

    /// Name used in logs and errors: logical name, href, or id.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.href.clone())
            .unwrap_or_else(|| self.id.to_string())
    }

    /// Get the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the stylesheet is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over rules.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Serialize the sheet: one block per rule, one declaration per line.
    ///
    /// Rules that came from a conditional block are wrapped in their condition.
    pub fn to_css(&self) -> String {
        let blocks: Vec<String> = self
            .rules
            .iter()
            .map(|rule| match &rule.condition {
                Some(condition) => format!("{} {{\n{}\n}}", condition, rule.to_css()),
                None => rule.to_css(),
            })
            .collect();
        blocks.join("\n\n")
    }
}
