//! Keyboard navigation over a result list.

/// Navigation keys understood by [`ResultCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    Home,
    End,
}

impl NavKey {
    /// Map a DOM `key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" => Some(NavKey::ArrowDown),
            "ArrowUp" => Some(NavKey::ArrowUp),
            "Home" => Some(NavKey::Home),
            "End" => Some(NavKey::End),
            _ => None,
        }
    }
}

/// Position of the focused item in an autocomplete list.
///
/// Arrow keys wrap around at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultCursor {
    len: usize,
    current: Option<usize>,
}

impl ResultCursor {
    /// Cursor over `len` results, on the first one if any.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            current: (len > 0).then_some(0),
        }
    }

    /// Focused index.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Move the cursor and return the new position.
    pub fn navigate(&mut self, key: NavKey) -> Option<usize> {
        let current = self.current?;
        let last = self.len - 1;
        let next = match key {
            NavKey::ArrowDown if current < last => current + 1,
            NavKey::ArrowDown => 0,
            NavKey::ArrowUp if current > 0 => current - 1,
            NavKey::ArrowUp => last,
            NavKey::Home => 0,
            NavKey::End => last,
        };
        self.current = Some(next);
        self.current
    }
}
