//! Tests mapping tokens to highlight geometry through a rendered document.

use tokenscope::inspect::token_highlights;
use tokenscope::prelude::*;

const BUTTON_CSS: &str = "
.spectrum-Button {
  min-width: var(--spectrum-button-min-width);
  height: var(--spectrum-button-height);
  padding: 0 var(--spectrum-button-padding-x);
  margin-left: var(--spectrum-button-gap);
  border-width: var(--spectrum-button-border-size);
  border-radius: var(--spectrum-button-border-radius);
  border-color: var(--spectrum-button-border-color);
  background-color: var(--spectrum-button-background-color);
}
.spectrum-Button-label {
  padding-top: var(--spectrum-button-label-padding-top);
  color: var(--spectrum-button-text-color);
  font-size: var(--spectrum-button-text-size);
}
.spectrum-Button--quiet {
  padding: calc(var(--spectrum-button-quiet-padding) - 1px);
}";

const BUTTON_BOX: Rect = Rect {
    top: 200.0,
    left: 100.0,
    width: 120.0,
    height: 32.0,
};

struct Fixture {
    store: TokenStore,
    doc: StaticDocument,
    mapper: GeometryMapper,
    scope: Selector,
}

impl Fixture {
    fn new() -> Self {
        let mut store = TokenStore::new("spectrum").expect("Failed to create store");
        store
            .register_sheets(&vec![SheetSource::new("/components/button/vars.css", BUTTON_CSS)])
            .expect("Failed to register sheets");

        let mut doc = StaticDocument::new(800.0);
        let example = doc.add(None, "div", &["spectrum-CSSExample-example"]);

        let button = doc.add(Some(example), "button", &["spectrum-Button"]);
        doc.set_rect(button, BUTTON_BOX);
        doc.set_style(
            button,
            [
                ("padding-top", "0px"),
                ("padding-right", "14px"),
                ("padding-bottom", "0px"),
                ("padding-left", "14px"),
                ("margin-left", "8px"),
                ("border-width", "2px"),
                ("border-radius", "16px"),
            ]
            .into_iter()
            .collect(),
        );

        let label = doc.add(Some(button), "span", &["spectrum-Button-label"]);
        doc.set_rect(label, Rect::new(114.0, 204.0, 92.0, 24.0));
        doc.set_style(label, ComputedStyle::new().with("padding-top", "4px"));

        let quiet = doc.add(Some(example), "button", &["spectrum-Button", "spectrum-Button--quiet"]);
        doc.set_rect(quiet, Rect::new(240.0, 200.0, 100.0, 32.0));
        doc.set_style(
            quiet,
            ComputedStyle::new()
                .with("padding-top", "1px")
                .with("padding-right", "2px")
                .with("padding-bottom", "3px")
                .with("padding-left", "4px"),
        );

        Self {
            store,
            doc,
            mapper: GeometryMapper::new("--spectrum-"),
            scope: Selector::parse(".spectrum-CSSExample-example").expect("Failed to parse scope"),
        }
    }

    fn highlight(&self, token: &str) -> Option<HighlightSpec> {
        token_highlights(&self.store, &self.mapper, &self.doc, token, None, &self.scope)
            .into_iter()
            .next()
    }
}

#[test]
fn test_width_draws_a_top_strip() {
    let spec = Fixture::new()
        .highlight("--spectrum-button-min-width")
        .expect("Expected a highlight");

    assert_eq!(spec.rect, Rect::new(100.0, 200.0, 120.0, 4.0));
    assert_eq!(spec.from, Some(Anchor::Top));
    assert_eq!(spec.borders, Borders::Uniform("0px".to_string()));
    assert_eq!(spec.label, "min-width: button-min-width");
    assert!(spec.redline);
}

#[test]
fn test_height_draws_a_side_strip() {
    let fixture = Fixture::new();
    let spec = fixture
        .highlight("--spectrum-button-height")
        .expect("Expected a highlight");

    assert_eq!(spec.rect, Rect::new(100.0, 200.0, 4.0, 32.0));
    assert_eq!(spec.from, Some(Anchor::Side));
    // 100px from the left edge leaves room for the tooltip
    assert_eq!(
        TooltipPlacement::resolve(&spec, fixture.doc.viewport_height(), 80.0),
        TooltipPlacement::Left
    );
}

#[test]
fn test_padding_shorthand_marks_matching_sides() {
    let spec = Fixture::new()
        .highlight("--spectrum-button-padding-x")
        .expect("Expected a highlight");

    assert_eq!(spec.rect, BUTTON_BOX);
    assert_eq!(spec.borders.edge(Side::Left), Some("14px"));
    assert_eq!(spec.borders.edge(Side::Right), Some("14px"));
    assert_eq!(spec.borders.edge(Side::Top), None);
    assert_eq!(spec.borders.edge(Side::Bottom), None);
    assert_eq!(spec.from, Some(Anchor::Left));
    assert_eq!(spec.background.as_deref(), Some("transparent"));
}

#[test]
fn test_padding_side_marks_one_edge() {
    let spec = Fixture::new()
        .highlight("--spectrum-button-label-padding-top")
        .expect("Expected a highlight");

    assert_eq!(spec.rect, Rect::new(114.0, 204.0, 92.0, 24.0));
    assert_eq!(spec.borders.edge(Side::Top), Some("4px"));
    assert_eq!(spec.borders.edge(Side::Left), None);
    assert_eq!(spec.from, Some(Anchor::Top));
}

#[test]
fn test_dynamic_padding_falls_back_to_computed_sides() {
    let spec = Fixture::new()
        .highlight("--spectrum-button-quiet-padding")
        .expect("Expected a highlight");

    // The first element matching .spectrum-Button--quiet
    assert_eq!(spec.rect.left, 240.0);
    assert_eq!(spec.from, Some(Anchor::Top));
    for (side, width) in [
        (Side::Top, "1px"),
        (Side::Right, "2px"),
        (Side::Bottom, "3px"),
        (Side::Left, "4px"),
    ] {
        assert_eq!(spec.borders.edge(side), Some(width));
    }
}

#[test]
fn test_margin_grows_the_box() {
    let spec = Fixture::new()
        .highlight("--spectrum-button-gap")
        .expect("Expected a highlight");

    assert_eq!(spec.rect, Rect::new(92.0, 200.0, 128.0, 32.0));
    assert_eq!(spec.from, Some(Anchor::Left));
    assert_eq!(spec.borders.edge(Side::Left), Some("8px"));
    assert_eq!(spec.borders.edge(Side::Right), None);
    assert_eq!(spec.background.as_deref(), Some("transparent"));
}

#[test]
fn test_border_properties_use_computed_border() {
    let fixture = Fixture::new();

    let width = fixture
        .highlight("--spectrum-button-border-size")
        .expect("Expected a highlight");
    assert_eq!(width.borders, Borders::Uniform("2px".to_string()));
    assert_eq!(width.border_radius.as_deref(), Some("16px"));
    assert!(!width.fade_quickly);

    let color = fixture
        .highlight("--spectrum-button-border-color")
        .expect("Expected a highlight");
    assert!(color.fade_quickly);
    assert_eq!(color.background.as_deref(), Some("transparent"));
}

#[test]
fn test_missing_border_width_defaults_to_two_pixels() {
    let rule = Rule::new(
        ".spectrum-Card",
        vec![tokenscope::style::rules::Declaration::new(
            "border-radius",
            "var(--spectrum-card-border-radius)",
            false,
        )],
        0,
    );
    let target = InspectTarget {
        rule: &rule,
        property: "border-radius",
        token: "--spectrum-card-border-radius",
    };
    let spec = GeometryMapper::new("--spectrum-")
        .rect_for(&target, &ComputedStyle::new(), BUTTON_BOX)
        .expect("Expected a highlight");

    assert_eq!(spec.borders, Borders::Uniform("2px".to_string()));
    assert_eq!(spec.border_radius, None);
}

#[test]
fn test_colors_fade_quickly() {
    let fixture = Fixture::new();

    let background = fixture
        .highlight("--spectrum-button-background-color")
        .expect("Expected a highlight");
    assert_eq!(background.rect, BUTTON_BOX);
    assert!(background.fade_quickly);

    let text = fixture
        .highlight("--spectrum-button-text-color")
        .expect("Expected a highlight");
    assert_eq!(text.rect, Rect::new(114.0, 204.0, 92.0, 24.0));
    assert!(text.fade_quickly);
}

#[test]
fn test_unmapped_property_has_no_highlight() {
    assert!(Fixture::new().highlight("--spectrum-button-text-size").is_none());
}
