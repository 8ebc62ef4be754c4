//! Stylesheet model and design-token resolution for tokenscope.
//!
//! This crate provides the CSS side of token inspection:
//!
//! - **Parsing**: Flatten stylesheets into rules with structured values
//! - **Selectors**: Parse selector lists and match them against any element tree
//! - **Tokens**: Register sheets, extract custom properties, resolve alias chains
//! - **Rule lookup**: Find rules by token reference, element, or selector
//! - **Hot Reload**: Rescan sheets when files change during development
//!
//! # Example
//!
//! ```
//! use tokenscope_style::prelude::*;
//!
//! let sheets = vec![SheetSource::new(
//!     "/dist/spectrum-global.css",
//!     ":root { --spectrum-global-color-blue-500: #2680EB; --spectrum-alias-focus-color: var(--spectrum-global-color-blue-500); }",
//! )];
//!
//! let mut store = TokenStore::new("spectrum")?;
//! store.register_sheets(&sheets)?;
//!
//! let tokens = store.all_tokens();
//! let resolver = AliasResolver::new(&tokens);
//! assert_eq!(resolver.resolve("--spectrum-alias-focus-color"), "#2680EB");
//! # Ok::<(), tokenscope_style::Error>(())
//! ```

pub mod index;
pub mod parser;
pub mod rules;
pub mod selector;
pub mod tokens;
pub mod types;

#[cfg(feature = "hot-reload")]
pub mod hot_reload;

mod error;

pub use error::{Error, Result};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::index::RuleIndex;
    pub use crate::parser::{Value, ValueNode, parse_css, strip_var};
    pub use crate::rules::{
        Declaration, DirectorySheetProvider, Rule, RuleRef, SheetId, SheetNaming, SheetSource,
        StyleSheet, StyleSheetProvider,
    };
    pub use crate::selector::{
        Combinator, ElementState, ElementTree, MatchContext, PseudoClass, Selector,
        SelectorMatcher, SelectorPart,
    };
    pub use crate::tokens::{AliasResolver, SheetKind, Token, TokenMap, TokenStore};
    pub use crate::types::{Edges, Side};

    #[cfg(feature = "hot-reload")]
    pub use crate::hot_reload::SheetWatcher;
}
