//! Controller inputs and outputs.

use std::time::{Duration, Instant};

use super::view::{PanelView, ValuePreview};
use crate::geometry::{HighlightSpec, TooltipPlacement};

/// Input to [`EditorController::handle`](super::EditorController::handle).
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMessage {
    /// The page finished loading; draw the panel and inspect the first
    /// example component.
    Load,
    /// Sheets may have changed; rescan them, then act as [`Load`](Self::Load).
    Reload,
    /// The inspect-mode button was pressed.
    ToggleInspectMode,
    /// Pointer moved, in viewport coordinates.
    PointerMove { x: f64, y: f64 },
    /// The component highlight was clicked.
    ClickHighlight,
    /// The component highlight was context-clicked.
    ContextClickHighlight,
    /// A click in inspect mode that hit nothing of ours.
    EmptyClick,
    /// The root breadcrumb was clicked.
    StopInspecting,
    /// The filter field changed.
    FilterInput(String),
    /// The filter field was cleared.
    ResetFilter,
    /// The pointer entered a token field.
    FieldHover(String),
    /// The pointer left a token field.
    FieldLeave,
    /// A token field was typed into.
    FieldEdit {
        sheet: String,
        token: String,
        value: String,
        at: Instant,
    },
    /// Text typed into a token field should be completed.
    Autocomplete {
        sheet: String,
        token: String,
        text: String,
    },
    /// A suggestion was picked.
    PickSuggestion { index: usize, at: Instant },
    /// Host clock; flushes debounced edits.
    Tick(Instant),
    /// The panel scrolled.
    Scroll(Instant),
    /// A key went down anywhere in the document.
    KeyDown { key: String, ctrl: bool, meta: bool },
    /// The save button was pressed.
    Export { file_name: Option<String> },
}

/// One autocomplete entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Suggested token.
    pub reference: String,
    /// Preview of its resolved value.
    pub preview: ValuePreview,
    /// Its alias chain.
    pub chain: Vec<String>,
}

/// Output of the controller for the host to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEffect {
    /// Draw a highlight.
    ShowHighlight {
        spec: HighlightSpec,
        placement: TooltipPlacement,
        /// Start fading after this delay.
        fade_after: Option<Duration>,
    },
    /// Remove the highlight.
    HideHighlight,
    /// Redraw the panel.
    Panel(PanelView),
    /// Component breadcrumb; `None` removes it.
    SetBreadcrumb(Option<String>),
    /// Empty the filter field.
    ClearFilter,
    /// Update one field's preview.
    Preview {
        sheet: String,
        token: String,
        preview: ValuePreview,
        chain: Vec<String>,
    },
    /// Set the value of a field, e.g. from a picked suggestion.
    SetFieldValue {
        sheet: String,
        token: String,
        value: String,
    },
    /// Enable or disable saving.
    SaveEnabled(bool),
    /// A patch stylesheet to hand to the user.
    Patch { file_name: String, css: String },
    /// Show autocomplete results, the first one highlighted.
    Suggestions {
        token: String,
        items: Vec<Suggestion>,
    },
    /// Focus an autocomplete result.
    SuggestionFocused(usize),
    /// Close the autocomplete popover.
    HidePopover,
    /// Panel opened (`true`) or closed.
    TogglePanel(bool),
    /// Inspect mode switched on or off.
    InspectModeChanged(bool),
}
