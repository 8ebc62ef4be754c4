//! Edit tracking and patch export.

use tokenscope_style::tokens::TokenStore;

use crate::Result;
use crate::logging::targets;

/// One changed property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    /// Selector of the edited rule.
    pub selector: String,
    /// Edited property.
    pub property: String,
    /// Value before the first edit.
    pub old_value: String,
    /// Current value.
    pub value: String,
}

#[derive(Debug, Clone, Default)]
struct SheetChanges {
    sheet: String,
    entries: Vec<ChangeEntry>,
}

/// Pending edits, kept as a diff against the original values.
///
/// An entry exists only while its value differs from the original; editing
/// a property back removes the entry, and a sheet without entries is
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    sheets: Vec<SheetChanges>,
}

impl ChangeTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `property` of a named sheet and record the change.
    ///
    /// The edited rule is the first one in the sheet declaring the property,
    /// else the sheet's first rule. Setting the current value is a no-op.
    pub fn set(&mut self, store: &mut TokenStore, sheet: &str, property: &str, value: &str) -> Result<()> {
        let rule = store.edit_target_mut(sheet, property)?;
        let current = rule
            .get(property)
            .map(|d| d.value.raw().trim().to_string())
            .unwrap_or_default();
        if current == value {
            return Ok(());
        }

        let position = self.sheets.iter().position(|s| s.sheet == sheet);
        let existing = position.and_then(|i| {
            self.sheets[i]
                .entries
                .iter()
                .position(|e| e.property == property)
                .map(|j| (i, j))
        });

        match existing {
            Some((i, j)) if self.sheets[i].entries[j].old_value == value => {
                self.sheets[i].entries.remove(j);
                if self.sheets[i].entries.is_empty() {
                    self.sheets.remove(i);
                }
                tracing::debug!(target: targets::CHANGES, "Reverted {}:{}", sheet, property);
            }
            Some((i, j)) => {
                self.sheets[i].entries[j].value = value.to_string();
            }
            None => {
                let entry = ChangeEntry {
                    selector: rule.selector_text.clone(),
                    property: property.to_string(),
                    old_value: current,
                    value: value.to_string(),
                };
                match position {
                    Some(i) => self.sheets[i].entries.push(entry),
                    None => self.sheets.push(SheetChanges {
                        sheet: sheet.to_string(),
                        entries: vec![entry],
                    }),
                }
            }
        }

        tracing::debug!(target: targets::CHANGES, "Changing {}:{} to {}", sheet, property, value);
        rule.set(property, value);
        Ok(())
    }

    /// The tracked change of one property.
    pub fn get(&self, sheet: &str, property: &str) -> Option<&ChangeEntry> {
        self.sheet_changes(sheet)?.iter().find(|e| e.property == property)
    }

    /// Tracked changes of one sheet; `None` when it has none.
    pub fn sheet_changes(&self, sheet: &str) -> Option<&[ChangeEntry]> {
        self.sheets
            .iter()
            .find(|s| s.sheet == sheet)
            .map(|s| s.entries.as_slice())
    }

    /// Check whether anything is pending.
    pub fn has_changes(&self) -> bool {
        !self.sheets.is_empty()
    }

    /// Every change with its sheet name, in the order first recorded.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ChangeEntry)> {
        self.sheets
            .iter()
            .flat_map(|s| s.entries.iter().map(move |e| (s.sheet.as_str(), e)))
    }

    /// Forget every tracked change. Sheets keep their edited values.
    pub fn clear(&mut self) {
        self.sheets.clear();
    }

    /// Changed properties as a stylesheet, one block per selector.
    ///
    /// Selectors and properties keep the order they were first changed in;
    /// the same property changed under one selector in two sheets keeps the
    /// later value.
    pub fn export_patch(&self) -> String {
        let mut selectors: Vec<(&str, Vec<(&str, &str)>)> = vec![];
        for (_, entry) in self.entries() {
            let index = match selectors.iter().position(|(s, _)| *s == entry.selector) {
                Some(index) => index,
                None => {
                    selectors.push((entry.selector.as_str(), vec![]));
                    selectors.len() - 1
                }
            };
            let properties = &mut selectors[index].1;
            match properties.iter_mut().find(|(p, _)| *p == entry.property) {
                Some(existing) => existing.1 = entry.value.as_str(),
                None => properties.push((entry.property.as_str(), entry.value.as_str())),
            }
        }

        let mut css = String::new();
        for (selector, properties) in selectors {
            let body = properties
                .iter()
                .map(|(property, value)| format!("  {}: {};", property, value))
                .collect::<Vec<_>>()
                .join("\n");
            css.push_str(&format!("\n{} {{\n{}\n}}\n", selector, body));
        }
        css
    }
}

/// File name for a patch, with `.css` appended when missing.
pub fn patch_file_name(name: &str) -> String {
    if name.ends_with(".css") {
        name.to_string()
    } else {
        format!("{}.css", name)
    }
}
