//! Named-command registry with undo/redo.
//!
//! A `Command` turns the current document into a `HistoryEntry` (a
//! redo/undo pair). `CommandManager::execute` looks the command up by
//! name, pushes the entry (dropping any redo tail) and applies its redo
//! immediately. `undo` and `redo` are registered as built-in pseudo-commands
//! so keyboard dispatch treats them like any other command.
//!
//! Commands may carry private state written by their `init` hook. The drag
//! command, for instance, subscribes to the drag-start signal in `init` and
//! stores the "before" snapshot in a cell it owns; `execute` reads it back.
//!
//! Registration is strict: a duplicate name or a shortcut already bound to
//! another command is rejected, so dispatch never depends on registration
//! order.

use crate::error::{EditorError, Result};
use crate::history::{History, HistoryEntry};
use crate::shortcuts::{KeyCombo, Shortcut};
use crate::signal::DragSignals;
use crate::store::BlockStore;
use smallvec::{SmallVec, smallvec};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use ve_core::model::{BlockRecord, ModelValue};

pub const UNDO: &str = "undo";
pub const REDO: &str = "redo";

/// Arguments passed through `execute` to a command.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CommandArgs {
    #[default]
    None,
    /// Replace `old`, expected at `index`, with `new` (property panel
    /// "apply", per-block import).
    UpdateBlock {
        index: usize,
        new: Box<BlockRecord>,
        old: Box<BlockRecord>,
    },
    /// Replace the whole document (bulk import, container edits).
    ModelValue(Box<ModelValue>),
}

/// Cleanup returned by an `init` hook, run by `CommandManager::destroy`.
pub type Teardown = Box<dyn FnOnce()>;

/// What an `init` hook may hold on to.
pub struct InitContext {
    pub store: Rc<RefCell<BlockStore>>,
    pub signals: DragSignals,
    /// Weak so subscribers stored in the signals don't keep the manager
    /// alive.
    pub commands: WeakCommandManager,
}

pub trait Command {
    fn name(&self) -> &str;

    /// Shortcut strings, e.g. `["backspace", "ctrl+d"]`.
    fn keyboard(&self) -> &[&str] {
        &[]
    }

    /// Called once by `CommandManager::init`.
    fn init(&mut self, _ctx: &InitContext) -> Option<Teardown> {
        None
    }

    /// Capture before/after state and return the reversible entry. Must not
    /// mutate the store; the manager applies the entry's redo itself.
    fn execute(&mut self, store: &BlockStore, args: CommandArgs) -> Result<HistoryEntry>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryOp {
    Undo,
    Redo,
}

enum Action {
    History(HistoryOp),
    Command {
        command: Box<dyn Command>,
        initialized: bool,
    },
}

struct Registration {
    name: String,
    shortcuts: SmallVec<[Shortcut; 3]>,
    action: Action,
}

struct ManagerState {
    registrations: Vec<Registration>,
    index: HashMap<String, usize>,
    history: History,
    teardowns: Vec<Teardown>,
    initialized: bool,
}

struct Inner {
    state: RefCell<ManagerState>,
    store: Rc<RefCell<BlockStore>>,
    signals: DragSignals,
}

/// Command table and history for one editing session.
///
/// Cheap to clone; clones share the same table and history.
#[derive(Clone)]
pub struct CommandManager {
    inner: Rc<Inner>,
}

/// Non-owning handle held by signal subscribers.
#[derive(Clone)]
pub struct WeakCommandManager {
    inner: Weak<Inner>,
}

impl WeakCommandManager {
    pub fn upgrade(&self) -> Option<CommandManager> {
        self.inner.upgrade().map(|inner| CommandManager { inner })
    }
}

impl CommandManager {
    /// New manager with `undo` (`ctrl+z`) and `redo` (`ctrl+y`,
    /// `ctrl+shift+z`) pre-registered.
    pub fn new(store: Rc<RefCell<BlockStore>>, signals: DragSignals, history_limit: usize) -> Self {
        let builtins: [(&str, SmallVec<[Shortcut; 3]>, HistoryOp); 2] = [
            (UNDO, smallvec![Shortcut::ctrl("z")], HistoryOp::Undo),
            (
                REDO,
                smallvec![Shortcut::ctrl("y"), Shortcut::ctrl("z").with_shift()],
                HistoryOp::Redo,
            ),
        ];
        let mut state = ManagerState {
            registrations: Vec::new(),
            index: HashMap::new(),
            history: History::new(history_limit),
            teardowns: Vec::new(),
            initialized: false,
        };
        for (name, shortcuts, op) in builtins {
            state.index.insert(name.to_string(), state.registrations.len());
            state.registrations.push(Registration {
                name: name.to_string(),
                shortcuts,
                action: Action::History(op),
            });
        }
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(state),
                store,
                signals,
            }),
        }
    }

    pub fn downgrade(&self) -> WeakCommandManager {
        WeakCommandManager {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn store(&self) -> &Rc<RefCell<BlockStore>> {
        &self.inner.store
    }

    pub fn signals(&self) -> &DragSignals {
        &self.inner.signals
    }

    // ─── Registration ────────────────────────────────────────────────────

    /// Add a command. Fails on a duplicate name, an unparsable shortcut, or
    /// a shortcut already bound elsewhere; the table is unchanged on failure.
    ///
    /// A command registered after `init` has its hook run immediately.
    pub fn registry(&self, command: impl Command + 'static) -> Result<()> {
        let name = command.name().to_string();
        let keyboard: Vec<String> = command.keyboard().iter().map(|s| s.to_string()).collect();
        let keys: Vec<&str> = keyboard.iter().map(String::as_str).collect();
        self.register_action(
            &name,
            &keys,
            Action::Command {
                command: Box::new(command),
                initialized: false,
            },
        )?;
        if self.inner.state.borrow().initialized {
            self.init();
        }
        Ok(())
    }

    fn register_action(&self, name: &str, keyboard: &[&str], action: Action) -> Result<()> {
        let mut state = self.inner.state.borrow_mut();
        if state.index.contains_key(name) {
            return Err(EditorError::DuplicateCommand {
                name: name.to_string(),
            });
        }

        let mut shortcuts: SmallVec<[Shortcut; 3]> = SmallVec::new();
        for raw in keyboard {
            let shortcut = Shortcut::parse(raw)?;
            let owner = state
                .registrations
                .iter()
                .find(|r| r.shortcuts.contains(&shortcut))
                .map(|r| r.name.clone())
                .or_else(|| shortcuts.contains(&shortcut).then(|| name.to_string()));
            if let Some(existing) = owner {
                return Err(EditorError::ShortcutCollision {
                    shortcut: shortcut.to_string(),
                    existing,
                    incoming: name.to_string(),
                });
            }
            shortcuts.push(shortcut);
        }

        log::debug!("register command `{name}` keys {keyboard:?}");
        let idx = state.registrations.len();
        state.index.insert(name.to_string(), idx);
        state.registrations.push(Registration {
            name: name.to_string(),
            shortcuts,
            action,
        });
        Ok(())
    }

    /// Run every pending `init` hook in registration order and keep the
    /// returned teardowns. Hooks that already ran are skipped.
    pub fn init(&self) {
        let ctx = InitContext {
            store: Rc::clone(&self.inner.store),
            signals: self.inner.signals.clone(),
            commands: self.downgrade(),
        };
        let mut guard = self.inner.state.borrow_mut();
        let state = &mut *guard;
        for reg in &mut state.registrations {
            if let Action::Command {
                command,
                initialized,
            } = &mut reg.action
                && !*initialized
            {
                *initialized = true;
                log::debug!("init command `{}`", reg.name);
                if let Some(teardown) = command.init(&ctx) {
                    state.teardowns.push(teardown);
                }
            }
        }
        state.initialized = true;
    }

    /// Run all teardowns, most recent first.
    pub fn destroy(&self) {
        let teardowns = std::mem::take(&mut self.inner.state.borrow_mut().teardowns);
        log::debug!("destroy: {} teardown(s)", teardowns.len());
        for teardown in teardowns.into_iter().rev() {
            teardown();
        }
    }

    // ─── Dispatch ────────────────────────────────────────────────────────

    /// Execute a command by name. `undo`/`redo` ignore `args`.
    pub fn execute(&self, name: &str, args: CommandArgs) -> Result<()> {
        let mut guard = self.inner.state.borrow_mut();
        let state = &mut *guard;
        let idx = *state
            .index
            .get(name)
            .ok_or_else(|| EditorError::unknown(name))?;

        if let Action::History(op) = state.registrations[idx].action {
            step(state, &self.inner.store, op);
            return Ok(());
        }
        let entry = match &mut state.registrations[idx].action {
            Action::Command { command, .. } => {
                let store = self.inner.store.borrow();
                command.execute(&store, args)?
            }
            Action::History(_) => return Ok(()),
        };

        let entry = state.history.push(entry);
        log::debug!("execute `{name}` -> entry `{}`", entry.label());
        entry.redo(&mut self.inner.store.borrow_mut());
        log::trace!("history cursor {}", state.history.cursor());
        Ok(())
    }

    /// Step back one entry. Returns `false` at the start of history.
    pub fn undo(&self) -> bool {
        let mut state = self.inner.state.borrow_mut();
        step(&mut state, &self.inner.store, HistoryOp::Undo)
    }

    /// Step forward one entry. Returns `false` at the end of history.
    pub fn redo(&self) -> bool {
        let mut state = self.inner.state.borrow_mut();
        step(&mut state, &self.inner.store, HistoryOp::Redo)
    }

    /// Execute the first command bound to `combo`. Returns the command name,
    /// or `None` if nothing is bound.
    pub fn handle_key(&self, combo: &KeyCombo) -> Result<Option<String>> {
        let target = combo.to_shortcut();
        let name = self
            .inner
            .state
            .borrow()
            .registrations
            .iter()
            .find(|r| r.shortcuts.contains(&target))
            .map(|r| r.name.clone());
        match name {
            Some(name) => {
                log::debug!("key `{target}` -> `{name}`");
                self.execute(&name, CommandArgs::None)?;
                Ok(Some(name))
            }
            None => Ok(None),
        }
    }

    // ─── Introspection ───────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        self.inner.state.borrow().history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.inner.state.borrow().history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.inner.state.borrow().history.len()
    }

    pub fn cursor(&self) -> usize {
        self.inner.state.borrow().history.cursor()
    }

    pub fn history_labels(&self) -> Vec<String> {
        self.inner
            .state
            .borrow()
            .history
            .labels()
            .map(str::to_string)
            .collect()
    }

    pub fn command_names(&self) -> Vec<String> {
        self.inner
            .state
            .borrow()
            .registrations
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }

    /// Canonical shortcut strings bound to `name`.
    pub fn shortcuts_of(&self, name: &str) -> Option<Vec<String>> {
        let state = self.inner.state.borrow();
        let idx = *state.index.get(name)?;
        Some(
            state.registrations[idx]
                .shortcuts
                .iter()
                .map(Shortcut::to_string)
                .collect(),
        )
    }
}

fn step(state: &mut ManagerState, store: &RefCell<BlockStore>, op: HistoryOp) -> bool {
    let entry = match op {
        HistoryOp::Undo => state.history.step_back(),
        HistoryOp::Redo => state.history.step_forward(),
    };
    let Some(entry) = entry else {
        log::debug!("{op:?}: nothing to do");
        return false;
    };
    log::debug!("{op:?} `{}`", entry.label());
    let mut store = store.borrow_mut();
    match op {
        HistoryOp::Undo => entry.undo(&mut store),
        HistoryOp::Redo => entry.redo(&mut store),
    }
    true
}

impl fmt::Debug for CommandManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("CommandManager")
            .field("commands", &state.index.len())
            .field("history", &state.history)
            .finish()
    }
}
