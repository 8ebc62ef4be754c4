//! Editor states.

/// An inspected component and the tokens styling its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection<N> {
    /// Inspected element.
    pub element: N,
    /// Tokens referenced by the rules of the element and its descendants.
    pub tokens: Vec<String>,
}

/// Where the editor is.
///
/// An inspection survives entering inspect mode and filtering; leaving
/// either returns to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState<N> {
    /// Showing the global sheets.
    Idle,
    /// Highlighting components under the pointer.
    InspectMode {
        /// Component currently highlighted.
        hovered: Option<N>,
        /// Element precision inspection starts from.
        precision: Option<N>,
        /// Inspection in effect when inspect mode was entered.
        inspecting: Option<Inspection<N>>,
    },
    /// Panel narrowed to one component's tokens.
    Inspecting(Inspection<N>),
    /// Panel narrowed by a typed query.
    Filtered {
        /// The query as typed, trimmed.
        query: String,
        /// Inspection the filter is restricted to.
        within: Option<Inspection<N>>,
    },
}

impl<N> Default for EditorState<N> {
    fn default() -> Self {
        EditorState::Idle
    }
}

impl<N> EditorState<N> {
    /// The inspection in effect, if any.
    pub fn inspection(&self) -> Option<&Inspection<N>> {
        match self {
            EditorState::Idle => None,
            EditorState::InspectMode { inspecting, .. } => inspecting.as_ref(),
            EditorState::Inspecting(inspection) => Some(inspection),
            EditorState::Filtered { within, .. } => within.as_ref(),
        }
    }

    /// Drop everything but the inspection.
    pub fn into_inspection(self) -> Option<Inspection<N>> {
        match self {
            EditorState::Idle => None,
            EditorState::InspectMode { inspecting, .. } => inspecting,
            EditorState::Inspecting(inspection) => Some(inspection),
            EditorState::Filtered { within, .. } => within,
        }
    }

    /// The resting state for an optional inspection.
    pub fn settled(inspection: Option<Inspection<N>>) -> Self {
        match inspection {
            Some(inspection) => EditorState::Inspecting(inspection),
            None => EditorState::Idle,
        }
    }

    /// Check whether inspect mode is on.
    pub fn is_inspect_mode(&self) -> bool {
        matches!(self, EditorState::InspectMode { .. })
    }
}
