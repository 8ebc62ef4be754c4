//! The editor state machine.

use tokenscope_style::parser::strip_var;
use tokenscope_style::selector::{Selector, SelectorMatcher};

use super::message::{EditorEffect, EditorMessage, Suggestion};
use super::state::{EditorState, Inspection};
use super::timing::{Debounce, Throttle};
use super::view::{PanelView, ValuePreview};
use crate::document::Document;
use crate::geometry::{HighlightSpec, TooltipPlacement};
use crate::inspect::{token_highlights, tokens_for_tree};
use crate::logging::targets;
use crate::search::{NavKey, ResultCursor};
use crate::session::Session;
use crate::Result;

#[derive(Debug, Clone)]
struct PendingEdit {
    sheet: String,
    token: String,
    value: String,
}

#[derive(Debug, Clone)]
struct SuggestionList {
    sheet: String,
    token: String,
    references: Vec<String>,
    cursor: ResultCursor,
}

/// Drives inspection, filtering and editing from host events.
///
/// The controller owns the [`Session`] and turns each [`EditorMessage`]
/// into a list of [`EditorEffect`]s. It never touches the document; the
/// [`Document`] passed to [`handle`](Self::handle) is only read.
///
/// # Example
///
/// ```
/// use tokenscope::document::StaticDocument;
/// use tokenscope::editor::{EditorController, EditorEffect, EditorMessage};
/// use tokenscope::style::rules::SheetSource;
/// use tokenscope::{InspectorConfig, Session};
///
/// let sheets = vec![SheetSource::new(
///     "/components/vars/spectrum-colorGlobals.css",
///     ":root { --spectrum-global-color-blue-500: rgb(38, 128, 235); }",
/// )];
/// let session = Session::new(InspectorConfig::default(), sheets).unwrap();
/// let doc = StaticDocument::new(800.0);
///
/// let mut editor = EditorController::new(session);
/// let effects = editor.handle(&doc, EditorMessage::Load).unwrap();
/// assert!(effects.contains(&EditorEffect::SetBreadcrumb(None)));
/// ```
#[derive(Debug)]
pub struct EditorController<N> {
    session: Session,
    state: EditorState<N>,
    panel: PanelView,
    hovered_field: Option<String>,
    edits: Debounce<PendingEdit>,
    scroll: Throttle,
    suggestions: Option<SuggestionList>,
    panel_open: bool,
}

impl<N: Copy + Eq> EditorController<N> {
    /// Create a controller over a loaded session.
    pub fn new(session: Session) -> Self {
        let timings = session.config().timings;
        Self {
            session,
            state: EditorState::Idle,
            panel: PanelView::default(),
            hovered_field: None,
            edits: Debounce::new(timings.debounce()),
            scroll: Throttle::new(timings.throttle()),
            suggestions: None,
            panel_open: false,
        }
    }

    /// The session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable session access, e.g. to edit outside the panel.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Current state.
    pub fn state(&self) -> &EditorState<N> {
        &self.state
    }

    /// Current panel.
    pub fn panel(&self) -> &PanelView {
        &self.panel
    }

    /// Whether the panel is open.
    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    /// When the host should next send [`EditorMessage::Tick`].
    pub fn next_deadline(&self) -> Option<std::time::Instant> {
        self.edits.deadline()
    }

    /// Process one message.
    pub fn handle<D>(&mut self, doc: &D, message: EditorMessage) -> Result<Vec<EditorEffect>>
    where
        D: Document<Node = N> + ?Sized,
    {
        let mut effects = vec![];

        match message {
            EditorMessage::Load => self.load(doc, &mut effects)?,
            EditorMessage::Reload => {
                self.session.reload()?;
                self.load(doc, &mut effects)?;
            }
            EditorMessage::ToggleInspectMode => {
                if self.state.is_inspect_mode() {
                    self.leave_inspect_mode(&mut effects);
                } else {
                    let inspecting = std::mem::take(&mut self.state).into_inspection();
                    self.state = EditorState::InspectMode {
                        hovered: None,
                        precision: None,
                        inspecting,
                    };
                    effects.push(EditorEffect::InspectModeChanged(true));
                }
            }
            EditorMessage::PointerMove { x, y } => {
                if self.state.is_inspect_mode() {
                    effects.push(EditorEffect::HideHighlight);
                    if let Some(element) = doc.element_from_point(x, y)
                        && !doc.inside_editor_chrome(element)
                    {
                        self.draw(doc, element, false, &mut effects);
                    }
                }
            }
            EditorMessage::ClickHighlight => {
                if let EditorState::InspectMode {
                    hovered: Some(element),
                    ..
                } = self.state
                {
                    self.inspect(doc, element, &mut effects);
                }
            }
            EditorMessage::ContextClickHighlight => self.context_click(doc, &mut effects),
            EditorMessage::EmptyClick => {
                if self.state.is_inspect_mode() {
                    self.leave_inspect_mode(&mut effects);
                    self.stop_inspecting(&mut effects);
                }
            }
            EditorMessage::StopInspecting => self.stop_inspecting(&mut effects),
            EditorMessage::FilterInput(text) => self.filter(text.trim(), &mut effects),
            EditorMessage::ResetFilter => self.reset_filter(&mut effects),
            EditorMessage::FieldHover(token) => self.hover_field(doc, token, &mut effects),
            EditorMessage::FieldLeave => {
                self.hovered_field = None;
                if self.state.is_inspect_mode() {
                    self.leave_inspect_mode(&mut effects);
                } else {
                    effects.push(EditorEffect::HideHighlight);
                }
            }
            EditorMessage::FieldEdit {
                sheet,
                token,
                value,
                at,
            } => self.edits.push(PendingEdit { sheet, token, value }, at),
            EditorMessage::Autocomplete { sheet, token, text } => {
                self.autocomplete(sheet, token, &text, &mut effects)
            }
            EditorMessage::PickSuggestion { index, at } => {
                if let Some(list) = self.suggestions.take()
                    && let Some(reference) = list.references.get(index)
                {
                    let value = format!("var({})", reference);
                    effects.push(EditorEffect::SetFieldValue {
                        sheet: list.sheet.clone(),
                        token: list.token.clone(),
                        value: value.clone(),
                    });
                    self.edits.push(
                        PendingEdit {
                            sheet: list.sheet,
                            token: list.token,
                            value,
                        },
                        at,
                    );
                    effects.push(EditorEffect::HidePopover);
                }
            }
            EditorMessage::Tick(now) => {
                if let Some(edit) = self.edits.poll(now) {
                    self.apply_edit(edit, &mut effects)?;
                }
            }
            EditorMessage::Scroll(now) => {
                if self.scroll.ready(now) {
                    self.suggestions = None;
                    effects.push(EditorEffect::HidePopover);
                }
            }
            EditorMessage::KeyDown { key, ctrl, meta } => self.key_down(&key, ctrl || meta, &mut effects),
            EditorMessage::Export { file_name } => {
                let file_name = self.session.patch_file_name(file_name.as_deref());
                tracing::info!(target: targets::EDITOR, "Exporting changes to {}", file_name);
                effects.push(EditorEffect::Patch {
                    file_name,
                    css: self.session.export_patch(),
                });
            }
        }

        Ok(effects)
    }

    fn load<D>(&mut self, doc: &D, effects: &mut Vec<EditorEffect>) -> Result<()>
    where
        D: Document<Node = N> + ?Sized,
    {
        self.panel = PanelView::build(&self.session)?;
        self.hovered_field = None;
        effects.push(EditorEffect::SaveEnabled(self.session.changes().has_changes()));

        let config = self.session.config();
        let candidate = Selector::parse(&format!(
            "{} [class*=\"{}\"]",
            config.example_scope,
            config.class_prefix()
        ))?;
        match SelectorMatcher::query_all(doc, None, std::slice::from_ref(&candidate)).first() {
            Some(&element) => self.inspect(doc, element, effects),
            None => self.stop_inspecting(effects),
        }
        Ok(())
    }

    fn leave_inspect_mode(&mut self, effects: &mut Vec<EditorEffect>) {
        let inspection = std::mem::take(&mut self.state).into_inspection();
        self.state = EditorState::settled(inspection);
        effects.push(EditorEffect::HideHighlight);
        effects.push(EditorEffect::InspectModeChanged(false));
    }

    /// Highlight the component around `active`.
    fn draw<D>(&mut self, doc: &D, active: N, loose: bool, effects: &mut Vec<EditorEffect>)
    where
        D: Document<Node = N> + ?Sized,
    {
        let found = self.session.naming().find_component(doc, active, loose);

        let EditorState::InspectMode { hovered, precision, .. } = &mut self.state else {
            return;
        };
        *precision = Some(active);

        if let Some((element, name)) = found {
            *hovered = Some(element);
            let spec = HighlightSpec::component(doc.bounding_rect(element), name);
            effects.push(self.highlight(doc, spec));
        }
    }

    /// Precision inspection: first the element itself, then one level up per
    /// repeated context click.
    fn context_click<D>(&mut self, doc: &D, effects: &mut Vec<EditorEffect>)
    where
        D: Document<Node = N> + ?Sized,
    {
        let EditorState::InspectMode {
            hovered,
            precision: Some(precision),
            ..
        } = &self.state
        else {
            return;
        };

        let mut target = *precision;
        if Some(target) == *hovered
            && let Some(parent) = doc.parent(target)
        {
            tracing::debug!(target: targets::EDITOR, "Moving up");
            target = parent;
        }
        self.draw(doc, target, true, effects);
    }

    fn inspect<D>(&mut self, doc: &D, element: N, effects: &mut Vec<EditorEffect>)
    where
        D: Document<Node = N> + ?Sized,
    {
        let was_inspect_mode = self.state.is_inspect_mode();
        tracing::info!(target: targets::EDITOR, "Inspecting {}", doc.class_name(element));

        let naming = self.session.naming();
        let tokens = tokens_for_tree(self.session.store(), doc, element, naming.class_prefix());
        let label = naming.label(doc.match_context(element).classes);

        self.panel.filter_by_tokens(&tokens);
        self.panel.expand_all();
        self.state = EditorState::Inspecting(Inspection { element, tokens });

        effects.push(EditorEffect::ClearFilter);
        effects.push(EditorEffect::Panel(self.panel.clone()));
        effects.push(EditorEffect::SetBreadcrumb(Some(label)));
        effects.push(EditorEffect::HideHighlight);
        if was_inspect_mode {
            effects.push(EditorEffect::InspectModeChanged(false));
        }
    }

    fn stop_inspecting(&mut self, effects: &mut Vec<EditorEffect>) {
        self.state = match std::mem::take(&mut self.state) {
            EditorState::InspectMode { hovered, precision, .. } => EditorState::InspectMode {
                hovered,
                precision,
                inspecting: None,
            },
            _ => EditorState::Idle,
        };
        self.panel.collapse_all();
        self.panel.show_global();
        effects.push(EditorEffect::Panel(self.panel.clone()));
        effects.push(EditorEffect::SetBreadcrumb(None));
    }

    fn filter(&mut self, query: &str, effects: &mut Vec<EditorEffect>) {
        if query.is_empty() {
            self.reset_filter(effects);
            return;
        }
        if self.state.is_inspect_mode() {
            self.leave_inspect_mode(effects);
        }

        let within = std::mem::take(&mut self.state).into_inspection();
        self.panel
            .filter_by_query(query, within.as_ref().map(|i| i.tokens.as_slice()));
        self.state = EditorState::Filtered {
            query: query.to_string(),
            within,
        };
        effects.push(EditorEffect::Panel(self.panel.clone()));
    }

    fn reset_filter(&mut self, effects: &mut Vec<EditorEffect>) {
        if self.state.is_inspect_mode() {
            self.leave_inspect_mode(effects);
        }

        let within = std::mem::take(&mut self.state).into_inspection();
        match &within {
            Some(inspection) => self.panel.filter_by_tokens(&inspection.tokens),
            None => {
                self.panel.show_all();
                self.panel.collapse_all();
            }
        }
        self.state = EditorState::settled(within);
        effects.push(EditorEffect::Panel(self.panel.clone()));
    }

    fn hover_field<D>(&mut self, doc: &D, token: String, effects: &mut Vec<EditorEffect>)
    where
        D: Document<Node = N> + ?Sized,
    {
        if self.hovered_field.as_deref() == Some(token.as_str()) {
            return;
        }

        let within = self.state.inspection().map(|i| i.element);
        let mut highlights = token_highlights(
            self.session.store(),
            self.session.mapper(),
            doc,
            &token,
            within,
            self.session.example_scope(),
        );
        self.hovered_field = Some(token);

        // Each rule's highlight replaces the previous one
        if let Some(spec) = highlights.pop() {
            effects.push(self.highlight(doc, spec));
        }
    }

    fn highlight<D>(&self, doc: &D, spec: HighlightSpec) -> EditorEffect
    where
        D: Document<Node = N> + ?Sized,
    {
        let config = self.session.config();
        let placement = TooltipPlacement::resolve(&spec, doc.viewport_height(), config.tooltip_margin);
        let fade_after = spec.fade_quickly.then(|| config.timings.fade());
        EditorEffect::ShowHighlight {
            spec,
            placement,
            fade_after,
        }
    }

    fn apply_edit(&mut self, edit: PendingEdit, effects: &mut Vec<EditorEffect>) -> Result<()> {
        // Half-written reference
        if edit.value.starts_with("var(") && !edit.value.ends_with(')') {
            return Ok(());
        }

        self.session.set(&edit.sheet, &edit.token, &edit.value)?;

        let preview = ValuePreview::classify(&self.session.resolve(&strip_var(&edit.value)));
        let chain = self.session.chain(&edit.token);
        self.panel
            .update_field(&edit.sheet, &edit.token, &edit.value, preview.clone());

        effects.push(EditorEffect::Preview {
            sheet: edit.sheet,
            token: edit.token,
            preview,
            chain,
        });
        effects.push(EditorEffect::SaveEnabled(self.session.changes().has_changes()));
        Ok(())
    }

    fn autocomplete(&mut self, sheet: String, token: String, text: &str, effects: &mut Vec<EditorEffect>) {
        if text.is_empty() {
            self.suggestions = None;
            effects.push(EditorEffect::HidePopover);
            return;
        }
        if text.chars().count() < 2 {
            return;
        }

        let results = self.session.search(text, Some(&token));
        if results.is_empty() {
            return;
        }

        let items: Vec<Suggestion> = results
            .iter()
            .map(|result| Suggestion {
                reference: result.reference.clone(),
                preview: ValuePreview::classify(&self.session.resolve(&result.reference)),
                chain: self.session.chain(&result.reference),
            })
            .collect();

        self.suggestions = Some(SuggestionList {
            sheet,
            token: token.clone(),
            references: items.iter().map(|s| s.reference.clone()).collect(),
            cursor: ResultCursor::new(items.len()),
        });
        effects.push(EditorEffect::Suggestions { token, items });
    }

    fn key_down(&mut self, key: &str, command: bool, effects: &mut Vec<EditorEffect>) {
        if command && key.eq_ignore_ascii_case("e") {
            self.panel_open = !self.panel_open;
            effects.push(EditorEffect::TogglePanel(self.panel_open));
            return;
        }

        let Some(list) = &mut self.suggestions else {
            return;
        };
        if let Some(nav) = NavKey::from_key(key) {
            if let Some(index) = list.cursor.navigate(nav) {
                effects.push(EditorEffect::SuggestionFocused(index));
            }
        } else if key == "Escape" {
            self.suggestions = None;
            effects.push(EditorEffect::HidePopover);
        }
    }
}
