//! Prelude module for tokenscope.
//!
//! ```ignore
//! use tokenscope::prelude::*;
//! ```
//!
//! This provides access to:
//! - Session setup (`Session`, `InspectorConfig`, sheet sources)
//! - Token lookup (`TokenStore`, `TokenMap`, `AliasResolver`, `RuleIndex`)
//! - Documents and geometry (`Document`, `StaticDocument`, `HighlightSpec`)
//! - Search (`SearchIndex`, `Query`)
//! - The editor (`EditorController`, `EditorMessage`, `EditorEffect`)

// ============================================================================
// Session
// ============================================================================

pub use crate::changes::{ChangeEntry, ChangeTracker};
pub use crate::{Error, InspectorConfig, Result, Session};

// ============================================================================
// Stylesheets and Tokens
// ============================================================================

pub use tokenscope_style::index::RuleIndex;
pub use tokenscope_style::rules::{
    DirectorySheetProvider, Rule, SheetSource, StyleSheet, StyleSheetProvider,
};
pub use tokenscope_style::selector::{ElementTree, Selector};
pub use tokenscope_style::tokens::{AliasResolver, SheetKind, Token, TokenMap, TokenStore};
pub use tokenscope_style::types::{Edges, Side};

// ============================================================================
// Documents and Geometry
// ============================================================================

pub use crate::document::{ComputedStyle, Document, ElementId, StaticDocument};
pub use crate::geometry::{
    Anchor, Borders, GeometryMapper, HighlightSpec, InspectTarget, Rect, TooltipPlacement,
};

// ============================================================================
// Search
// ============================================================================

pub use crate::search::{Query, SearchIndex, SearchResult};

// ============================================================================
// Editor
// ============================================================================

pub use crate::editor::{
    EditorController, EditorEffect, EditorMessage, EditorState, PanelView, ValuePreview,
};
