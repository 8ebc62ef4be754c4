//! Component detection from class names.

use regex::Regex;
use tokenscope_style::selector::ElementTree;

use crate::config::InspectorConfig;
use crate::{Error, Result};

/// Recognizes component root classes (`spectrum-Button`) and sub-element
/// classes (`spectrum-Button-label`).
#[derive(Debug, Clone)]
pub struct ComponentNaming {
    class_prefix: String,
    component: Regex,
    sub_element: Regex,
    banned: Vec<String>,
}

impl ComponentNaming {
    /// Build the patterns for a class prefix such as `spectrum-`.
    pub fn new(class_prefix: &str, banned: &[String]) -> Result<Self> {
        let escaped = regex::escape(class_prefix);
        Ok(Self {
            class_prefix: class_prefix.to_string(),
            component: compile(&format!("^{}[^-]+$", escaped))?,
            sub_element: compile(&format!(r"^{}[\w-]+$", escaped))?,
            banned: banned.to_vec(),
        })
    }

    /// Build from a session configuration.
    pub fn from_config(config: &InspectorConfig) -> Result<Self> {
        Self::new(&config.class_prefix(), &config.banned_classes)
    }

    /// Class prefix shared by component classes.
    pub fn class_prefix(&self) -> &str {
        &self.class_prefix
    }

    /// Check whether an element is excluded from inspection.
    ///
    /// An element is banned when it has classes and every prefixed class
    /// starts with a banned name. An element with classes but none prefixed
    /// is banned too.
    pub fn is_banned(&self, classes: &[String]) -> bool {
        if classes.is_empty() {
            return false;
        }
        classes
            .iter()
            .filter(|class| class.starts_with(self.class_prefix.as_str()))
            .all(|class| self.banned.iter().any(|banned| class.starts_with(banned.as_str())))
    }

    /// The first class naming a component; `loose` also accepts sub-element
    /// classes.
    pub fn component_name(&self, classes: &[String], loose: bool) -> Option<String> {
        if self.is_banned(classes) {
            return None;
        }
        let pattern = if loose { &self.sub_element } else { &self.component };
        classes.iter().find(|class| pattern.is_match(class)).cloned()
    }

    /// Walk from `node` up to the nearest inspectable component.
    ///
    /// Returns the element and its component name. Nothing is found when the
    /// walk reaches a top-level element without a name, or ends on a banned
    /// element.
    pub fn find_component<T: ElementTree + ?Sized>(
        &self,
        tree: &T,
        node: T::Node,
        loose: bool,
    ) -> Option<(T::Node, String)> {
        let mut current = node;
        let mut name = self.component_name(tree.match_context(current).classes, loose);

        while name.is_none() {
            current = tree.parent(current)?;
            name = self.component_name(tree.match_context(current).classes, loose);
        }

        if self.is_banned(tree.match_context(current).classes) {
            return None;
        }
        name.map(|name| (current, name))
    }

    /// Breadcrumb label: the component name (or first class) without the
    /// class prefix.
    pub fn label(&self, classes: &[String]) -> String {
        let name = self
            .component_name(classes, false)
            .or_else(|| classes.first().cloned())
            .unwrap_or_default();
        name.strip_prefix(self.class_prefix.as_str())
            .map(str::to_string)
            .unwrap_or(name)
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| Error::Style(tokenscope_style::Error::invalid_pattern(pattern, e.to_string())))
}
