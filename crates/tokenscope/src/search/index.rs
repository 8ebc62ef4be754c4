//! Ranked token index.
//!
//! Tokens are stored in an in-RAM tantivy index with two analyzed fields,
//! the spaced-out name and the declared value, and the token name as a
//! stored, untokenized key. Queries in the [`Query`] grammar become a
//! `BooleanQuery`; wildcard terms are expanded against each field's term
//! dictionary so every expanded term is scored with BM25 like a plain one.

use std::collections::BTreeSet;
use std::fmt;

use parking_lot::Mutex;
use regex::Regex;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, BoostQuery, Occur, Query as TantivyQuery, TermQuery};
use tantivy::schema::{
    Field as SchemaField, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing,
    TextOptions, Value,
};
use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, TextAnalyzer};
use tantivy::{DocAddress, Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument, Term};
use tokenscope_style::tokens::TokenMap;

use super::query::{Clause, Field, Presence, Query};
use crate::config::InspectorConfig;
use crate::logging::targets;
use crate::{Error, Result};

/// Token names that look like colors.
const COLOR_CONTEXT: &str = r"-color[^\w]?";

/// Analyzer splitting on anything but letters and digits, lowercased.
const TOKEN_TERMS: &str = "token_terms";

/// Indexing memory; the minimum tantivy accepts for one thread.
const WRITER_MEMORY: usize = 15_000_000;

/// One ranked hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Token name.
    pub reference: String,
    /// Relevance score; higher is better.
    pub score: f64,
}

/// Schema handles of the token index.
#[derive(Debug, Clone, Copy)]
struct Fields {
    reference: SchemaField,
    separated_name: SchemaField,
    value: SchemaField,
}

impl Fields {
    fn get(&self, field: Field) -> SchemaField {
        match field {
            Field::SeparatedName => self.separated_name,
            Field::Value => self.value,
        }
    }
}

/// Ranked, wildcard-capable index over the searchable token tiers.
///
/// The index is immutable once built; rebuild and swap it when tokens
/// change. Queries go through a shared reference: the last query and its
/// results are cached behind a mutex.
pub struct SearchIndex {
    reader: IndexReader,
    fields: Fields,
    references: Vec<String>,
    name_boost: f32,
    value_boost: f32,
    token_prefix: String,
    color_context: Regex,
    last: Mutex<Option<(String, Vec<SearchResult>)>>,
}

impl fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchIndex")
            .field("documents", &self.references.len())
            .field("name_boost", &self.name_boost)
            .field("value_boost", &self.value_boost)
            .field("last_query", &self.last_query())
            .finish()
    }
}

impl SearchIndex {
    /// Index the tokens whose names start with one of the configured tiers.
    pub fn build(tokens: &TokenMap, config: &InspectorConfig) -> Result<Self> {
        let color_context = Regex::new(COLOR_CONTEXT)
            .map_err(|e| Error::Style(tokenscope_style::Error::invalid_pattern(COLOR_CONTEXT, e.to_string())))?;

        let mut schema_builder = Schema::builder();
        let reference = schema_builder.add_text_field("ref", STRING | STORED);
        let indexing = TextFieldIndexing::default()
            .set_tokenizer(TOKEN_TERMS)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions);
        let text = TextOptions::default().set_indexing_options(indexing);
        let separated_name = schema_builder.add_text_field(Field::SeparatedName.as_str(), text.clone());
        let value = schema_builder.add_text_field(Field::Value.as_str(), text);
        let fields = Fields {
            reference,
            separated_name,
            value,
        };

        let index = Index::create_in_ram(schema_builder.build());
        index.tokenizers().register(TOKEN_TERMS, token_analyzer());

        // One indexing thread keeps a single segment in insertion order
        let mut writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY)?;
        let mut references = vec![];

        for token in tokens {
            if !config.tier_prefixes.iter().any(|tier| token.name.starts_with(tier.as_str())) {
                continue;
            }
            let mut document = TantivyDocument::new();
            document.add_text(fields.reference, &token.name);
            document.add_text(fields.separated_name, token.name.replace('-', " "));
            document.add_text(fields.value, &token.value);
            writer.add_document(document)?;
            references.push(token.name.clone());
        }

        writer.commit()?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        tracing::debug!(target: targets::SEARCH, "Indexed {} of {} tokens", references.len(), tokens.len());

        Ok(Self {
            reader,
            fields,
            references,
            name_boost: config.search.name_boost as f32,
            value_boost: config.search.value_boost as f32,
            token_prefix: config.token_prefix.clone(),
            color_context,
            last: Mutex::new(None),
        })
    }

    /// Number of indexed tokens.
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Check whether nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Check whether a token is indexed.
    pub fn contains(&self, name: &str) -> bool {
        self.references.iter().any(|reference| reference == name)
    }

    /// Run a query written in the search grammar.
    ///
    /// A clause's boost scales its name-field matches; value-field matches
    /// only carry the value field's weight. Results are sorted by
    /// descending score, ties in index order. Index failures are logged and
    /// yield no results.
    pub fn search(&self, query: &Query) -> Vec<SearchResult> {
        if query.is_empty() || self.is_empty() {
            return vec![];
        }

        match self.run(query) {
            Ok(results) => results,
            Err(err) => {
                tracing::error!(target: targets::SEARCH, "Search for '{}' failed: {}", query, err);
                vec![]
            }
        }
    }

    fn run(&self, query: &Query) -> tantivy::Result<Vec<SearchResult>> {
        let searcher = self.reader.searcher();

        let mut subqueries: Vec<(Occur, Box<dyn TantivyQuery>)> = vec![];
        for clause in &query.clauses {
            let occur = match clause.presence {
                Presence::Optional => Occur::Should,
                Presence::Required => Occur::Must,
                Presence::Prohibited => Occur::MustNot,
            };
            subqueries.push((occur, Box::new(self.clause_query(&searcher, clause)?)));
        }

        let limit = self.references.len().max(1);
        let mut hits: Vec<(f32, DocAddress)> =
            searcher.search(&BooleanQuery::new(subqueries), &TopDocs::with_limit(limit))?;
        hits.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));

        let mut results = Vec::with_capacity(hits.len());
        for (score, address) in hits {
            let document: TantivyDocument = searcher.doc(address)?;
            let Some(reference) = document.get_first(self.fields.reference).and_then(|v| v.as_str()) else {
                continue;
            };
            results.push(SearchResult {
                reference: reference.to_string(),
                score: f64::from(score),
            });
        }
        Ok(results)
    }

    /// Any of the clause's terms, in any of its fields.
    fn clause_query(&self, searcher: &Searcher, clause: &Clause) -> tantivy::Result<BooleanQuery> {
        let mut alternatives: Vec<(Occur, Box<dyn TantivyQuery>)> = vec![];

        for field in clause.fields() {
            let boost = match field {
                Field::SeparatedName => self.name_boost * clause.boost as f32,
                Field::Value => self.value_boost,
            };
            let schema_field = self.fields.get(field);
            let terms = if clause.is_wildcard() {
                expand_wildcard(searcher, schema_field, clause)?
            } else {
                tokenize(&clause.term)
            };

            for term in terms {
                let term = TermQuery::new(
                    Term::from_field_text(schema_field, &term),
                    IndexRecordOption::WithFreqs,
                );
                alternatives.push((Occur::Should, Box::new(BoostQuery::new(Box::new(term), boost))));
            }
        }

        Ok(BooleanQuery::new(alternatives))
    }

    /// Turn free text (often a half-typed value) into a query string.
    ///
    /// `var(`, closing parentheses and the first occurrence of the token
    /// prefix are removed, hyphens become spaces and one-character terms are
    /// dropped. The last term becomes a prefix match and earlier terms get a
    /// boost that falls with position. A color `context` token restricts
    /// results to colors without opacity; any other context excludes colors.
    /// Returns `None` when no term survives.
    pub fn rewrite(&self, text: &str, context: Option<&str>) -> Option<String> {
        let text = text
            .replacen("var(", "", 1)
            .replace(')', "")
            .replacen(self.token_prefix.as_str(), "", 1)
            .replace('-', " ");

        let terms: Vec<&str> = text
            .split_whitespace()
            .filter(|term| term.chars().count() > 1)
            .collect();
        if terms.is_empty() {
            return None;
        }

        let count = terms.len();
        let mut query = terms
            .iter()
            .enumerate()
            .map(|(i, term)| {
                if i + 1 == count {
                    format!("{}*", term)
                } else {
                    format!("{}^{}", term, (count - i) * 10)
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        if let Some(context) = context {
            if self.color_context.is_match(context) {
                query.push_str(" +color -opacity");
            } else {
                query.push_str(" -color");
            }
        }

        Some(query)
    }

    /// Search free text, with the category of `context` shaping the results.
    ///
    /// Repeating the previous query returns the cached results.
    pub fn query(&self, text: &str, context: Option<&str>) -> Vec<SearchResult> {
        let Some(query) = self.rewrite(text, context) else {
            return vec![];
        };

        let mut last = self.last.lock();
        if let Some((previous, results)) = last.as_ref()
            && *previous == query
        {
            return results.clone();
        }

        tracing::debug!(target: targets::SEARCH, "Searching for {}", query);
        let results = self.search(&Query::parse(&query));
        *last = Some((query, results.clone()));
        results
    }

    /// The last query string that ran, if any.
    pub fn last_query(&self) -> Option<String> {
        self.last.lock().as_ref().map(|(query, _)| query.clone())
    }
}

/// Split text into lowercase index terms, the way the index analyzes it.
///
/// Anything that is not a letter or digit separates terms.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut analyzer = token_analyzer();
    let mut stream = analyzer.token_stream(text);
    let mut terms = vec![];
    stream.process(&mut |token| terms.push(token.text.clone()));
    terms
}

fn token_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .build()
}

/// Indexed terms of `field` matching a wildcard clause.
fn expand_wildcard(searcher: &Searcher, field: SchemaField, clause: &Clause) -> tantivy::Result<Vec<String>> {
    let prefix = clause.term.split('*').next().unwrap_or_default();
    let mut terms = BTreeSet::new();

    for segment in searcher.segment_readers() {
        let inverted = segment.inverted_index(field)?;
        let mut stream = inverted.terms().range().ge(prefix.as_bytes()).into_stream()?;
        while stream.advance() {
            let Ok(candidate) = std::str::from_utf8(stream.key()) else {
                continue;
            };
            if !candidate.starts_with(prefix) {
                break;
            }
            if clause.matches_term(candidate) {
                terms.insert(candidate.to_string());
            }
        }
    }

    Ok(terms.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenscope_style::rules::SheetId;

    fn index(entries: &[(&str, &str)]) -> SearchIndex {
        let mut tokens = TokenMap::new();
        for (name, value) in entries {
            tokens.insert(*name, *value, SheetId(0));
        }
        SearchIndex::build(&tokens, &InspectorConfig::default()).unwrap()
    }

    #[test]
    fn tokenizer() {
        assert_eq!(
            tokenize("rgb(38, 128, 235) var(--spectrum-global-color-blue-400)"),
            vec!["rgb", "38", "128", "235", "var", "spectrum", "global", "color", "blue", "400"]
        );
        assert_eq!(tokenize("#2680EB"), vec!["2680eb"]);
    }

    #[test]
    fn only_tiers_are_indexed() {
        let index = index(&[
            ("--spectrum-global-color-blue-500", "#2680EB"),
            ("--spectrum-alias-focus-color", "var(--spectrum-global-color-blue-500)"),
            ("--spectrum-button-primary-background-color", "red"),
        ]);
        assert_eq!(index.len(), 2);
        assert!(!index.contains("--spectrum-button-primary-background-color"));
    }

    #[test]
    fn rewrite_query() {
        let index = index(&[]);
        assert_eq!(
            index.rewrite("var(--spectrum-global-color-blue", None).as_deref(),
            Some("global^30 color^20 blue*")
        );
        assert_eq!(
            index.rewrite("size-1", Some("--spectrum-button-padding")).as_deref(),
            Some("size* -color")
        );
        assert_eq!(
            index.rewrite("blue", Some("--spectrum-button-background-color")).as_deref(),
            Some("blue* +color -opacity")
        );
        assert_eq!(index.rewrite("a - b", None), None);
    }

    #[test]
    fn required_and_prohibited() {
        let index = index(&[
            ("--spectrum-global-color-blue-500", "#2680EB"),
            ("--spectrum-global-color-opacity-blue", "0.5"),
            ("--spectrum-global-dimension-size-100", "8px"),
        ]);

        let results = index.search(&Query::parse("blue +color -opacity"));
        let names: Vec<_> = results.iter().map(|r| r.reference.as_str()).collect();
        assert_eq!(names, vec!["--spectrum-global-color-blue-500"]);

        assert!(index.search(&Query::parse("size -dimension")).is_empty());
    }

    #[test]
    fn repeated_queries_are_cached() {
        let index = index(&[("--spectrum-global-color-blue-500", "#2680EB")]);
        let first = index.query("blue", None);
        assert_eq!(index.last_query().as_deref(), Some("blue*"));
        assert_eq!(index.query("blue", None), first);
        assert!(index.query("", None).is_empty());
    }
}
