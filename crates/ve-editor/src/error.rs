use thiserror::Error;
use ve_core::DocumentError;

pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("unknown command: {name}")]
    UnknownCommand { name: String },

    #[error("command already registered: {name}")]
    DuplicateCommand { name: String },

    #[error("shortcut `{shortcut}` of `{incoming}` is already bound to `{existing}`")]
    ShortcutCollision {
        shortcut: String,
        existing: String,
        incoming: String,
    },

    #[error("invalid shortcut `{input}`: {reason}")]
    InvalidShortcut { input: String, reason: String },

    #[error("command `{name}` expects {expected}")]
    InvalidArguments { name: String, expected: String },

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl EditorError {
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownCommand { name: name.into() }
    }

    pub fn invalid_args(name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidArguments {
            name: name.into(),
            expected: expected.into(),
        }
    }
}
