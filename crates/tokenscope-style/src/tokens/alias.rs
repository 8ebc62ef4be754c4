//! Alias chain resolution.
//!
//! A token whose value is exactly one `var()` reference is an alias: resolving
//! it means following references until a value that is not an alias. Cycles
//! and runaway chains are cut off; they never produce an error.

use std::collections::HashSet;

use crate::parser::{Value, strip_var};
use crate::tokens::TokenMap;

/// Walks alias chains over a token mapping.
#[derive(Debug, Clone, Copy)]
pub struct AliasResolver<'a> {
    tokens: &'a TokenMap,
    scope: Option<&'a TokenMap>,
}

impl<'a> AliasResolver<'a> {
    /// Resolve against a single (usually global) mapping.
    pub fn new(tokens: &'a TokenMap) -> Self {
        Self {
            tokens,
            scope: None,
        }
    }

    /// Resolve starting from one sheet's tokens, falling back to `global`.
    pub fn scoped(sheet_tokens: &'a TokenMap, global: &'a TokenMap) -> Self {
        Self {
            tokens: global,
            scope: Some(sheet_tokens),
        }
    }

    fn lookup(&self, name: &str) -> Option<&'a str> {
        self.scope
            .and_then(|scope| scope.get(name))
            .or_else(|| self.tokens.get(name))
    }

    fn key_count(&self) -> usize {
        match self.scope {
            Some(scope) => scope.len() + self.tokens.len(),
            None => self.tokens.len(),
        }
    }

    /// The alias chain starting at `name`.
    ///
    /// The chain starts with `name` and ends with the first value that is not
    /// a known alias. On a cycle the repeated name is appended once and the
    /// walk stops, so `A → B → C → A` yields `[A, B, C, A]`. The chain never
    /// has more than (number of tokens + 1) entries.
    pub fn chain(&self, name: &str) -> Vec<String> {
        let mut chain = vec![name.to_string()];
        let mut visited: HashSet<String> = HashSet::from([name.to_string()]);
        let max_steps = self.key_count() + 1;
        let mut current = name.to_string();

        for _ in 0..max_steps {
            let Some(value) = self.lookup(&current) else {
                return chain;
            };

            let next = self.step(value);
            if visited.contains(&next) {
                tracing::debug!("Alias cycle detected at {} (from {})", next, name);
                chain.push(next);
                return chain;
            }

            visited.insert(next.clone());
            chain.push(next.clone());
            current = next;
        }

        tracing::debug!("Alias chain from {} hit the step limit", name);
        chain
    }

    /// The value at the end of `name`'s alias chain.
    pub fn resolve(&self, name: &str) -> String {
        self.chain(name).pop().unwrap_or_else(|| name.to_string())
    }

    /// Resolve `name` from one sheet's view, falling back to this resolver's
    /// mapping.
    pub fn resolve_in(&self, sheet_tokens: &TokenMap, name: &str) -> String {
        AliasResolver::scoped(sheet_tokens, self.tokens).resolve(name)
    }

    /// Resolve a raw value: a `var()` wrapper is stripped before resolving.
    pub fn resolve_value(&self, raw: &str) -> String {
        self.resolve(&strip_var(raw))
    }

    /// One resolution step from a declared value.
    ///
    /// A single `var(--x)` steps to `--x`. When `--x` is unknown and a fallback
    /// is given, the fallback text is the next value. Anything else is the
    /// value itself, trimmed.
    fn step(&self, value: &str) -> String {
        let parsed = Value::parse(value);
        match parsed.single_reference() {
            Some((name, Some(fallback))) if self.lookup(name).is_none() => {
                fallback.raw().to_string()
            }
            Some((name, _)) => name.to_string(),
            None => parsed.raw().to_string(),
        }
    }
}
