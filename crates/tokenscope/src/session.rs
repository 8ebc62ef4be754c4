//! The inspection session.
//!
//! A [`Session`] owns everything one inspector instance needs: the loaded
//! sheets, the merged token mapping, the search index and the pending
//! edits. Components borrow it instead of reaching for globals.

use tokenscope_style::rules::StyleSheetProvider;
use tokenscope_style::selector::Selector;
use tokenscope_style::tokens::{AliasResolver, TokenMap, TokenStore};

use crate::changes::{ChangeTracker, patch_file_name};
use crate::config::InspectorConfig;
use crate::geometry::GeometryMapper;
use crate::inspect::ComponentNaming;
use crate::logging::targets;
use crate::search::{SearchIndex, SearchResult};
use crate::Result;

/// State shared by every inspector component.
pub struct Session {
    config: InspectorConfig,
    provider: Box<dyn StyleSheetProvider>,
    store: TokenStore,
    tokens: TokenMap,
    search: SearchIndex,
    changes: ChangeTracker,
    mapper: GeometryMapper,
    naming: ComponentNaming,
    example_scope: Selector,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("sheets", &self.store.sheet_names().collect::<Vec<_>>())
            .field("tokens", &self.tokens.len())
            .field("searchable", &self.search.len())
            .field("has_changes", &self.changes.has_changes())
            .finish()
    }
}

impl Session {
    /// Create a session and load every sheet the provider reports.
    pub fn new(config: InspectorConfig, provider: impl StyleSheetProvider + 'static) -> Result<Self> {
        let store = TokenStore::new(&config.sheet_prefix)?.with_global_marker(config.global_marker.clone());
        let tokens = TokenMap::new();
        let search = SearchIndex::build(&tokens, &config)?;
        let naming = ComponentNaming::from_config(&config)?;
        let example_scope = Selector::parse(&config.example_scope)?;

        let mut session = Self {
            mapper: GeometryMapper::new(config.token_prefix.clone()),
            provider: Box::new(provider),
            changes: ChangeTracker::new(),
            config,
            store,
            tokens,
            search,
            naming,
            example_scope,
        };
        session.reload()?;
        Ok(session)
    }

    /// Rescan the provider's sheets and rebuild the indices.
    ///
    /// Returns the sheets that were added or changed.
    pub fn reload(&mut self) -> Result<Vec<String>> {
        let changed = self.store.register_sheets(self.provider.as_ref())?;
        if !changed.is_empty() {
            tracing::info!(target: targets::SESSION, "Loaded {} sheets", changed.len());
        }
        self.refresh()?;
        Ok(changed)
    }

    /// Rebuild the merged token mapping and the search index from the
    /// current sheets.
    pub fn refresh(&mut self) -> Result<()> {
        let tokens = self.store.all_tokens();

        let mut searchable = TokenMap::new();
        for name in self.store.sheet_names() {
            if self.config.is_searchable(name) {
                searchable.extend(&self.store.extract(name)?);
            }
        }
        let search = SearchIndex::build(&searchable, &self.config)?;

        tracing::debug!(
            target: targets::SESSION,
            "Indexed {} of {} tokens",
            search.len(),
            tokens.len()
        );
        self.tokens = tokens;
        self.search = search;
        Ok(())
    }

    /// Session configuration.
    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// Loaded sheets.
    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Every token of every named sheet.
    pub fn tokens(&self) -> &TokenMap {
        &self.tokens
    }

    /// Search index over the searchable tiers.
    pub fn search_index(&self) -> &SearchIndex {
        &self.search
    }

    /// Pending edits.
    pub fn changes(&self) -> &ChangeTracker {
        &self.changes
    }

    /// Highlight geometry.
    pub fn mapper(&self) -> &GeometryMapper {
        &self.mapper
    }

    /// Component class detection.
    pub fn naming(&self) -> &ComponentNaming {
        &self.naming
    }

    /// Container of the rendered examples.
    pub fn example_scope(&self) -> &Selector {
        &self.example_scope
    }

    /// Resolver over every loaded token.
    pub fn resolver(&self) -> AliasResolver<'_> {
        AliasResolver::new(&self.tokens)
    }

    /// Final value of a token.
    pub fn resolve(&self, name: &str) -> String {
        self.resolver().resolve(name)
    }

    /// Alias chain of a token.
    pub fn chain(&self, name: &str) -> Vec<String> {
        self.resolver().chain(name)
    }

    /// Search suggestions for free text typed into the field of `context`.
    pub fn search(&self, text: &str, context: Option<&str>) -> Vec<SearchResult> {
        self.search.query(text, context)
    }

    /// Edit a token in a named sheet and refresh the indices.
    pub fn set(&mut self, sheet: &str, property: &str, value: &str) -> Result<()> {
        self.changes.set(&mut self.store, sheet, property, value)?;
        self.refresh()
    }

    /// Changed rules as a patch stylesheet.
    pub fn export_patch(&self) -> String {
        self.changes.export_patch()
    }

    /// Patch file name, defaulting to the configured one.
    pub fn patch_file_name(&self, name: Option<&str>) -> String {
        patch_file_name(name.unwrap_or(&self.config.patch_file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenscope_style::rules::SheetSource;

    fn sources() -> Vec<SheetSource> {
        vec![
            SheetSource::new(
                "/components/vars/spectrum-colorGlobals.css",
                ":root { --spectrum-global-color-blue-500: #2680EB; }",
            ),
            SheetSource::new(
                "/components/vars/spectrum-colorAliases.css",
                ":root { --spectrum-alias-focus-color: var(--spectrum-global-color-blue-500); }",
            ),
        ]
    }

    #[test]
    fn loads_and_resolves() {
        let session = Session::new(InspectorConfig::default(), sources()).unwrap();
        assert_eq!(session.tokens().len(), 2);
        assert_eq!(session.search_index().len(), 2);
        assert_eq!(session.resolve("--spectrum-alias-focus-color"), "#2680EB");
    }

    #[test]
    fn edits_refresh_tokens() {
        let mut session = Session::new(InspectorConfig::default(), sources()).unwrap();
        session
            .set("colorGlobals", "--spectrum-global-color-blue-500", "rgb(0, 0, 255)")
            .unwrap();

        assert_eq!(session.resolve("--spectrum-alias-focus-color"), "rgb(0, 0, 255)");
        assert!(session.changes().has_changes());
        assert_eq!(session.patch_file_name(None), "spectrum-custom.css");
        assert_eq!(session.patch_file_name(Some("mine")), "mine.css");
    }

    #[test]
    fn unsearchable_sheets_stay_out_of_the_index() {
        let mut sources = sources();
        sources.push(SheetSource::new(
            "/components/vars/spectrum-experimental.css",
            ":root { --spectrum-global-experimental-size: 1px; }",
        ));
        let session = Session::new(InspectorConfig::default(), sources).unwrap();
        assert_eq!(session.tokens().len(), 3);
        assert!(!session.search_index().contains("--spectrum-global-experimental-size"));
    }
}
