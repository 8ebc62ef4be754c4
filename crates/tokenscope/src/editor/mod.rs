//! The interactive editor.
//!
//! [`EditorController`] is an explicit state machine: the host feeds it
//! [`EditorMessage`]s (pointer moves, clicks, typing, clock ticks) and
//! applies the [`EditorEffect`]s it returns. Panel contents are plain view
//! models ([`PanelView`]) rather than markup.

mod controller;
mod message;
mod state;
mod timing;
mod view;

pub use controller::EditorController;
pub use message::{EditorEffect, EditorMessage, Suggestion};
pub use state::{EditorState, Inspection};
pub use timing::{Debounce, Throttle};
pub use view::{FieldView, PanelView, SheetView, ValuePreview};
