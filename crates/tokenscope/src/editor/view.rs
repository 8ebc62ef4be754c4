//! Panel view models.
//!
//! The host renders these records; filtering and expansion only toggle
//! their `hidden` and `expanded` flags.

use regex::Regex;
use tokenscope_style::tokens::SheetKind;

use crate::Result;
use crate::session::Session;

/// Longest resolved value shown inline in a preview.
const INLINE_VALUE_LEN: usize = 5;

/// How a resolved value is previewed next to its field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValuePreview {
    /// Color swatch filled with the value.
    Swatch(String),
    /// Checkerboard swatch.
    Transparent,
    /// Timing function or other parenthesized value.
    Animation,
    /// Too long to show inline.
    Truncated,
    /// Short value shown as text.
    Literal(String),
}

impl ValuePreview {
    /// Classify a resolved value.
    pub fn classify(value: &str) -> Self {
        if value.starts_with("rgb") {
            ValuePreview::Swatch(value.to_string())
        } else if value == "transparent" {
            ValuePreview::Transparent
        } else if value.starts_with('(') {
            ValuePreview::Animation
        } else if value.chars().count() > INLINE_VALUE_LEN {
            ValuePreview::Truncated
        } else {
            ValuePreview::Literal(value.to_string())
        }
    }
}

/// One editable token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    /// Owning sheet.
    pub sheet: String,
    /// Token name.
    pub token: String,
    /// Token name without the common prefix.
    pub label: String,
    /// Declared value.
    pub value: String,
    /// Preview of the resolved value.
    pub preview: ValuePreview,
    /// Alias chain shown in the preview tooltip.
    pub chain: Vec<String>,
    /// Hidden by the current filter.
    pub hidden: bool,
}

/// One collapsible sheet section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetView {
    /// Logical sheet name.
    pub name: String,
    /// Heading text.
    pub title: String,
    /// Global or component sheet.
    pub kind: SheetKind,
    /// Hidden by the current filter.
    pub hidden: bool,
    /// Section expanded.
    pub expanded: bool,
    /// Fields in declaration order.
    pub fields: Vec<FieldView>,
}

impl SheetView {
    fn field_mut(&mut self, token: &str) -> Option<&mut FieldView> {
        self.fields.iter_mut().find(|f| f.token == token)
    }

    /// Show the fields `matches` accepts; returns whether any matched.
    fn filter(&mut self, matches: impl Fn(&str) -> bool) -> bool {
        let mut any = false;
        for field in &mut self.fields {
            field.hidden = !matches(&field.token);
            any |= !field.hidden;
        }
        self.hidden = !any;
        any
    }
}

/// The whole editor panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelView {
    /// Sheets in registration order.
    pub sheets: Vec<SheetView>,
}

impl PanelView {
    /// Build the panel from every named sheet that declares tokens.
    ///
    /// Component sheets start hidden; all sections start expanded.
    pub fn build(session: &Session) -> Result<Self> {
        let store = session.store();
        let prefix = session.config().token_prefix.as_str();
        let mut sheets = vec![];

        for name in store.sheet_names() {
            let tokens = store.extract(name)?;
            if tokens.is_empty() {
                continue;
            }
            let kind = store.sheet_kind(name)?;
            let fields = tokens
                .iter()
                .map(|token| FieldView {
                    sheet: name.to_string(),
                    token: token.name.clone(),
                    label: token.name.strip_prefix(prefix).unwrap_or(&token.name).to_string(),
                    value: token.value.clone(),
                    preview: ValuePreview::classify(&session.resolve(&token.name)),
                    chain: session.chain(&token.name),
                    hidden: false,
                })
                .collect();

            sheets.push(SheetView {
                name: name.to_string(),
                title: title_case(name),
                kind,
                hidden: kind == SheetKind::Component,
                expanded: true,
                fields,
            });
        }

        Ok(Self { sheets })
    }

    /// Look up a sheet section.
    pub fn sheet(&self, name: &str) -> Option<&SheetView> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Look up a field.
    pub fn field(&self, sheet: &str, token: &str) -> Option<&FieldView> {
        self.sheet(sheet)?.fields.iter().find(|f| f.token == token)
    }

    /// Update one field after an edit.
    pub fn update_field(&mut self, sheet: &str, token: &str, value: &str, preview: ValuePreview) {
        if let Some(field) = self
            .sheets
            .iter_mut()
            .find(|s| s.name == sheet)
            .and_then(|s| s.field_mut(token))
        {
            field.value = value.to_string();
            field.preview = preview;
        }
    }

    /// Show every sheet and field.
    pub fn show_all(&mut self) {
        for sheet in &mut self.sheets {
            sheet.hidden = false;
            sheet.fields.iter_mut().for_each(|f| f.hidden = false);
        }
    }

    /// Show every field of the global sheets and hide the component sheets.
    pub fn show_global(&mut self) {
        for sheet in &mut self.sheets {
            sheet.hidden = sheet.kind == SheetKind::Component;
            sheet.fields.iter_mut().for_each(|f| f.hidden = false);
        }
    }

    /// Collapse every section.
    pub fn collapse_all(&mut self) {
        self.sheets.iter_mut().for_each(|s| s.expanded = false);
    }

    /// Expand every section.
    pub fn expand_all(&mut self) {
        self.sheets.iter_mut().for_each(|s| s.expanded = true);
    }

    /// Show the fields whose token name matches `query`, restricted to
    /// `within` when given.
    ///
    /// The query is a regular expression; an invalid pattern is matched
    /// literally. Sections with a visible field are expanded, the others
    /// hidden and collapsed.
    pub fn filter_by_query(&mut self, query: &str, within: Option<&[String]>) {
        let pattern = Regex::new(query).or_else(|_| Regex::new(&regex::escape(query)));
        let Ok(pattern) = pattern else {
            return;
        };

        for sheet in &mut self.sheets {
            let matched = sheet.filter(|token| {
                pattern.is_match(token) && within.is_none_or(|w| w.iter().any(|t| t == token))
            });
            sheet.expanded = matched;
        }
    }

    /// Show only the fields for `tokens`; sections without one are hidden.
    pub fn filter_by_tokens(&mut self, tokens: &[String]) {
        for sheet in &mut self.sheets {
            sheet.filter(|token| tokens.iter().any(|t| t == token));
        }
    }

    /// Number of visible fields across visible sections.
    pub fn visible_fields(&self) -> usize {
        self.sheets
            .iter()
            .filter(|s| !s.hidden)
            .map(|s| s.fields.iter().filter(|f| !f.hidden).count())
            .sum()
    }
}

/// `colorGlobals` → `Color Globals`.
fn title_case(name: &str) -> String {
    let mut title = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i == 0 {
            title.extend(c.to_uppercase());
        } else if c.is_ascii_uppercase() {
            title.push(' ');
            title.push(c);
        } else {
            title.push(c);
        }
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InspectorConfig;
    use tokenscope_style::rules::SheetSource;

    fn session() -> Session {
        Session::new(
            InspectorConfig::default(),
            vec![
                SheetSource::new(
                    "/components/vars/spectrum-colorGlobals.css",
                    ":root { --spectrum-global-color-blue-500: rgb(38, 128, 235); --spectrum-global-color-gray-50: #fff; }",
                ),
                SheetSource::new(
                    "/components/button/vars.css",
                    ".spectrum-Button { --spectrum-button-background: var(--spectrum-global-color-blue-500); }",
                ),
                SheetSource::new("/components/vars/spectrum-empty.css", ".x { color: red; }"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn previews() {
        assert_eq!(ValuePreview::classify("rgb(0, 0, 0)"), ValuePreview::Swatch("rgb(0, 0, 0)".into()));
        assert_eq!(ValuePreview::classify("transparent"), ValuePreview::Transparent);
        assert_eq!(ValuePreview::classify("(0.45, 0, 0.40, 1)"), ValuePreview::Animation);
        assert_eq!(ValuePreview::classify("#2680EB"), ValuePreview::Truncated);
        assert_eq!(ValuePreview::classify("4px"), ValuePreview::Literal("4px".into()));
    }

    #[test]
    fn titles() {
        assert_eq!(title_case("colorGlobals"), "Color Globals");
        assert_eq!(title_case("button"), "Button");
    }

    #[test]
    fn build_skips_empty_sheets_and_hides_components() {
        let panel = PanelView::build(&session()).unwrap();
        let names: Vec<_> = panel.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["colorGlobals", "button"]);

        let button = panel.sheet("button").unwrap();
        assert!(button.hidden);
        assert_eq!(button.kind, SheetKind::Component);

        let field = panel.field("button", "--spectrum-button-background").unwrap();
        assert_eq!(field.label, "button-background");
        assert_eq!(field.preview, ValuePreview::Swatch("rgb(38, 128, 235)".into()));
        assert_eq!(field.chain.len(), 3);
    }

    #[test]
    fn query_filter_falls_back_to_literal() {
        let mut panel = PanelView::build(&session()).unwrap();

        panel.filter_by_query("blue-5", None);
        assert_eq!(panel.visible_fields(), 1);
        assert!(panel.sheet("colorGlobals").unwrap().expanded);
        assert!(panel.sheet("button").unwrap().hidden);

        // Unbalanced paren is not a valid pattern
        panel.filter_by_query("var(", None);
        assert_eq!(panel.visible_fields(), 0);

        let within = vec!["--spectrum-button-background".to_string()];
        panel.filter_by_query("spectrum", Some(&within));
        assert_eq!(panel.visible_fields(), 1);
        assert!(panel.sheet("colorGlobals").unwrap().hidden);
    }

    #[test]
    fn token_filter_and_reset() {
        let mut panel = PanelView::build(&session()).unwrap();
        panel.filter_by_tokens(&["--spectrum-button-background".to_string()]);
        assert!(!panel.sheet("button").unwrap().hidden);
        assert!(panel.sheet("colorGlobals").unwrap().hidden);

        panel.show_global();
        assert!(panel.sheet("button").unwrap().hidden);
        assert_eq!(panel.visible_fields(), 2);

        panel.show_all();
        assert_eq!(panel.visible_fields(), 3);
        panel.collapse_all();
        assert!(panel.sheets.iter().all(|s| !s.expanded));
    }
}
