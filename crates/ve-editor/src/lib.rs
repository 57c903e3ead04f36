//! Stateful editing engine for VE documents.
//!
//! The UI layer owns a `VisualEditor`, forwards pointer and key events to
//! it, and renders from its `BlockStore`. Every document change made
//! through a command is undoable; selection, live drag movement and render
//! measurement are not.

pub mod commands;
pub mod config;
pub mod drag;
pub mod editor;
pub mod error;
pub mod history;
pub mod input;
pub mod shortcuts;
pub mod signal;
pub mod standard;
pub mod store;

pub use commands::{Command, CommandArgs, CommandManager, InitContext, Teardown};
pub use config::EditorConfig;
pub use drag::{DragPhase, DragSession, Guides};
pub use editor::VisualEditor;
pub use error::{EditorError, Result};
pub use history::{History, HistoryEntry};
pub use input::{InputEvent, Modifiers, PointerTarget};
pub use shortcuts::{KeyCombo, Shortcut};
pub use signal::{DragSignals, Signal, SubscriptionId};
pub use store::BlockStore;
