//! CSS selector types and matching.

mod matcher;
mod types;

pub use matcher::{ElementState, ElementTree, MatchContext, SelectorMatcher};
pub use types::*;
