//! Input abstraction layer.
//!
//! Normalizes browser mouse and keyboard events into `InputEvent`s consumed
//! by the editor surface. Coordinates are client (page) pixels; the editor
//! only ever uses differences between them, so no container offset is
//! needed.

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// ⌘ on macOS; treated as `ctrl` when matching shortcuts.
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };
}

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The block at this index in the current block list.
    Block(usize),
    /// Empty container background.
    Container,
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button pressed over the canvas.
    PointerDown {
        x: f64,
        y: f64,
        target: PointerTarget,
        modifiers: Modifiers,
    },

    /// Mouse moved anywhere on the page.
    PointerMove { x: f64, y: f64, modifiers: Modifiers },

    /// Mouse button released anywhere on the page.
    PointerUp { x: f64, y: f64 },

    /// Key pressed. `key` is the `KeyboardEvent.key` value.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64, target: PointerTarget, modifiers: Modifiers) -> Self {
        Self::PointerDown {
            x,
            y,
            target,
            modifiers,
        }
    }

    pub fn pointer_move(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self::PointerMove { x, y, modifiers }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y } => Some((*x, *y)),
            Self::Key { .. } => None,
        }
    }
}
