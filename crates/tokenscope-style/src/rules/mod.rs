//! Style rules, stylesheets and sheet sources.

mod provider;
mod rule;
mod stylesheet;

pub use provider::{DirectorySheetProvider, SheetNaming, StyleSheetProvider};
pub use rule::{Declaration, Rule, RuleRef};
pub use stylesheet::{SheetId, SheetSource, StyleSheet};
