//! tokenscope - an inspector and live editor for design tokens written as
//! CSS custom properties.
//!
//! This is the umbrella crate. It re-exports the stylesheet model from
//! [`tokenscope_style`] as [`style`] and adds the inspection engine:
//!
//! - **Session**: Loaded sheets, merged tokens, search index and pending edits
//! - **Geometry**: Which part of an element's box a token drives
//! - **Search**: Ranked token search with wildcard and category queries
//! - **Changes**: Edit tracking and patch export
//! - **Editor**: A message-driven state machine for interactive inspection
//!
//! # Example
//!
//! ```
//! use tokenscope::prelude::*;
//!
//! let sheets = vec![
//!     SheetSource::new(
//!         "/components/vars/spectrum-colorGlobals.css",
//!         ":root { --spectrum-global-color-blue-500: #2680EB; }",
//!     ),
//!     SheetSource::new(
//!         "/components/vars/spectrum-colorAliases.css",
//!         ":root { --spectrum-alias-focus-color: var(--spectrum-global-color-blue-500); }",
//!     ),
//! ];
//!
//! let mut session = Session::new(InspectorConfig::default(), sheets)?;
//! assert_eq!(session.resolve("--spectrum-alias-focus-color"), "#2680EB");
//!
//! session.set("colorGlobals", "--spectrum-global-color-blue-500", "#1473E6")?;
//! assert_eq!(
//!     session.export_patch(),
//!     "\n:root {\n  --spectrum-global-color-blue-500: #1473E6;\n}\n"
//! );
//! # Ok::<(), tokenscope::Error>(())
//! ```

pub use tokenscope_style as style;

pub mod changes;
pub mod config;
pub mod document;
pub mod editor;
pub mod geometry;
pub mod inspect;
pub mod logging;
pub mod prelude;
pub mod search;

mod error;
mod session;

pub use config::InspectorConfig;
pub use error::{Error, Result};
pub use session::Session;
