//! Keyboard shortcut strings and live key matching.
//!
//! Shortcuts are written `modifier+modifier+key`, e.g. `ctrl+z`,
//! `ctrl+shift+z`, `backspace`. Modifier and key names are
//! case-insensitive. Browser key names are normalized so that a binding
//! written `ctrl+up` matches a `KeyboardEvent.key` of `"ArrowUp"`.
//!
//! | Modifier spelling                | Meaning           |
//! |----------------------------------|-------------------|
//! | `ctrl`, `control`, `cmd`, `meta` | ctrl (⌘ on macOS) |
//! | `shift`                          | shift             |
//! | `alt`, `option`                  | alt               |

use crate::error::{EditorError, Result};
use crate::input::Modifiers;
use std::fmt;
use std::str::FromStr;
use winnow::ascii::space0;
use winnow::combinator::{delimited, separated};
use winnow::prelude::*;
use winnow::token::take_while;

/// A parsed, canonical shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Normalized lowercase key name (`"z"`, `"up"`, `"backspace"`).
    pub key: String,
}

impl Shortcut {
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &str| EditorError::InvalidShortcut {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let tokens = parse_tokens
            .parse(input.trim())
            .map_err(|e| invalid(&e.to_string()))?;
        let Some((key, mods)) = tokens.split_last() else {
            return Err(invalid("empty shortcut"));
        };

        let key = normalize_key(key);
        if Modifier::from_token(&key).is_some() {
            return Err(invalid("missing key after modifiers"));
        }
        let mut shortcut = Shortcut {
            ctrl: false,
            shift: false,
            alt: false,
            key,
        };
        for m in mods {
            match Modifier::from_token(&m.to_ascii_lowercase()) {
                Some(Modifier::Ctrl) => shortcut.ctrl = true,
                Some(Modifier::Shift) => shortcut.shift = true,
                Some(Modifier::Alt) => shortcut.alt = true,
                None => return Err(invalid(&format!("unknown modifier `{m}`"))),
            }
        }
        Ok(shortcut)
    }

    /// `ctrl+key`, without going through the parser.
    pub fn ctrl(key: &str) -> Self {
        Shortcut {
            ctrl: true,
            shift: false,
            alt: false,
            key: normalize_key(key),
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn matches(&self, combo: &KeyCombo) -> bool {
        *self == combo.to_shortcut()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    Ctrl,
    Shift,
    Alt,
}

impl Modifier {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "ctrl" | "control" | "cmd" | "meta" => Some(Self::Ctrl),
            "shift" => Some(Self::Shift),
            "alt" | "option" => Some(Self::Alt),
            _ => None,
        }
    }
}

impl FromStr for Shortcut {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self> {
        Shortcut::parse(s)
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.shift {
            f.write_str("shift+")?;
        }
        if self.alt {
            f.write_str("alt+")?;
        }
        f.write_str(&self.key)
    }
}

// ─── Parsing ────────────────────────────────────────────────────────────

fn parse_tokens<'a>(input: &mut &'a str) -> ModalResult<Vec<&'a str>> {
    separated(1.., delimited(space0, parse_token, space0), '+').parse_next(input)
}

fn parse_token<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c != '+' && !c.is_whitespace()).parse_next(input)
}

/// Map a browser `KeyboardEvent.key` (or a shortcut key token) onto the
/// canonical lowercase name.
pub fn normalize_key(key: &str) -> String {
    let lower = key.to_ascii_lowercase();
    match lower.as_str() {
        "arrowup" => "up".into(),
        "arrowdown" => "down".into(),
        "arrowleft" => "left".into(),
        "arrowright" => "right".into(),
        "del" => "delete".into(),
        "esc" => "escape".into(),
        " " | "spacebar" => "space".into(),
        _ => lower,
    }
}

// ─── Live key events ─────────────────────────────────────────────────────

/// A key press as reported by the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCombo {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: &str, modifiers: Modifiers) -> Self {
        Self {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Canonical form. `meta` folds into `ctrl`.
    pub fn to_shortcut(&self) -> Shortcut {
        Shortcut {
            ctrl: self.modifiers.ctrl || self.modifiers.meta,
            shift: self.modifiers.shift,
            alt: self.modifiers.alt,
            key: normalize_key(&self.key),
        }
    }
}
