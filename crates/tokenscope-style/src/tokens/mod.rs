//! Design tokens: extraction, storage and alias resolution.

mod alias;
mod map;
mod store;

pub use alias::AliasResolver;
pub use map::{Token, TokenMap};
pub use store::{DEFAULT_GLOBAL_MARKER, SheetKind, TokenStore};
