//! Tests for token search ranking and the query grammar.

use tokenscope::prelude::*;
use tokenscope::search::{NavKey, ResultCursor};
use tokenscope::style::rules::SheetId;

fn tokens() -> TokenMap {
    let mut tokens = TokenMap::new();
    for (name, value) in [
        ("--spectrum-global-color-blue-400", "rgb(55, 142, 240)"),
        ("--spectrum-global-color-blue-500", "rgb(38, 128, 235)"),
        ("--spectrum-global-color-gray-500", "rgb(142, 142, 142)"),
        ("--spectrum-global-color-opacity-50", "0.5"),
        ("--spectrum-alias-border-color-focus", "var(--spectrum-global-color-blue-400)"),
        ("--spectrum-global-dimension-size-100", "8px"),
        ("--spectrum-global-dimension-size-1000", "80px"),
        ("--spectrum-semantic-cta-color-background-default", "var(--spectrum-global-color-blue-500)"),
        // Not a searchable tier
        ("--spectrum-button-cta-background-color", "var(--spectrum-global-color-blue-500)"),
    ] {
        tokens.insert(name, value, SheetId(0));
    }
    tokens
}

fn index() -> SearchIndex {
    SearchIndex::build(&tokens(), &InspectorConfig::default()).expect("Failed to build index")
}

fn references(results: &[SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.reference.as_str()).collect()
}

#[test]
fn test_only_tier_tokens_are_indexed() {
    let index = index();
    assert_eq!(index.len(), 8);
    assert!(!index.contains("--spectrum-button-cta-background-color"));
}

#[test]
fn test_name_matches_outrank_value_matches() {
    let index = index();
    let results = index.search(&Query::parse("blue"));

    // Names mentioning blue first; the alias and semantic tokens only mention
    // it in their values
    let found = references(&results);
    assert_eq!(found.len(), 4);
    assert!(found[..2].contains(&"--spectrum-global-color-blue-400"));
    assert!(found[..2].contains(&"--spectrum-global-color-blue-500"));
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_boosted_terms_rank_first() {
    let index = index();
    let results = index.search(&Query::parse("color blue^30 gray"));
    assert!(results[0].reference.starts_with("--spectrum-global-color-blue"));
    assert!(results[1].reference.starts_with("--spectrum-global-color-blue"));
}

#[test]
fn test_presence_operators() {
    let index = index();

    let colors = index.search(&Query::parse("global* +color -opacity"));
    let found = references(&colors);
    assert!(found.contains(&"--spectrum-global-color-gray-500"));
    assert!(!found.contains(&"--spectrum-global-color-opacity-50"));
    assert!(!found.contains(&"--spectrum-global-dimension-size-100"));

    let names_only = index.search(&Query::parse("separatedName:blue"));
    assert_eq!(names_only.len(), 2);
}

#[test]
fn test_free_text_rewrite() {
    let index = index();

    assert_eq!(
        index.rewrite("var(--spectrum-global-dimension-size", None).as_deref(),
        Some("global^30 dimension^20 size*")
    );
    assert_eq!(
        index.rewrite("blue", Some("--spectrum-alias-border-color-focus")).as_deref(),
        Some("blue* +color -opacity")
    );
    assert_eq!(
        index.rewrite("size-1", Some("--spectrum-button-padding")).as_deref(),
        Some("size* -color")
    );
    assert_eq!(index.rewrite("a-b", None), None);
}

#[test]
fn test_dimension_context_excludes_colors() {
    let index = index();
    let results = index.query("size", Some("--spectrum-button-min-width"));
    assert_eq!(
        references(&results),
        vec![
            "--spectrum-global-dimension-size-100",
            "--spectrum-global-dimension-size-1000",
        ]
    );
}

#[test]
fn test_repeated_query_hits_the_cache() {
    let index = index();
    let first = index.query("var(--spectrum-global-color", Some("--spectrum-alias-focus-color"));
    assert_eq!(index.last_query().as_deref(), Some("global^20 color* +color -opacity"));

    let second = index.query("var(--spectrum-global-color", Some("--spectrum-alias-focus-color"));
    assert_eq!(first, second);
    assert!(index.query("", None).is_empty());
}

#[test]
fn test_result_navigation() {
    let results = index().query("blue", None);
    let mut cursor = ResultCursor::new(results.len());

    assert_eq!(cursor.current(), Some(0));
    assert_eq!(cursor.navigate(NavKey::ArrowUp), Some(results.len() - 1));
    assert_eq!(cursor.navigate(NavKey::Home), Some(0));
}

#[test]
fn test_blue_names_outrank_color_values() {
    let mut tokens = TokenMap::new();
    for (name, value) in [
        ("--spectrum-global-color-gray-500", "rgb(142, 142, 142)"),
        ("--spectrum-alias-background-color-default", "var(--spectrum-global-color-gray-50)"),
        ("--spectrum-global-color-blue-500", "rgb(38, 128, 235)"),
        ("--spectrum-alias-text-color", "var(--spectrum-global-color-gray-800)"),
    ] {
        tokens.insert(name, value, SheetId(0));
    }
    let index = SearchIndex::build(&tokens, &InspectorConfig::default()).expect("Failed to build index");

    let results = index.query("color blue", None);
    assert_eq!(index.last_query().as_deref(), Some("color^20 blue*"));
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].reference, "--spectrum-global-color-blue-500");
    assert!(results[0].score > results[1].score);
}
