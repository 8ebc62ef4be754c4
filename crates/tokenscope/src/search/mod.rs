//! Token search.
//!
//! [`SearchIndex`] ranks tokens of the global, alias and semantic tiers with
//! a tantivy index, weighting the spaced-out token name well above the
//! declared value.
//! Free text typed into a value field goes through
//! [`SearchIndex::query`], which rewrites it into the [`Query`] grammar.

mod cursor;
mod index;
mod query;

pub use cursor::{NavKey, ResultCursor};
pub use index::{SearchIndex, SearchResult, tokenize};
pub use query::{Clause, Field, Presence, Query};
