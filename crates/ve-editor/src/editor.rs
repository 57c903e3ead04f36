//! The editor surface.
//!
//! `VisualEditor` wires the store, the drag signals, the command table and
//! a `DragSession` together. The UI layer forwards normalized input here,
//! renders from `store()`, and calls the command shortcuts from its toolbar
//! and menus.
//!
//! Drag-start and drag-end are emitted from here and only here (for block
//! drags and palette drops alike), always with no store borrow held, since
//! the drag command's subscribers read and write the store.

use crate::commands::{CommandArgs, CommandManager, REDO, UNDO};
use crate::config::EditorConfig;
use crate::drag::{DragSession, Guides};
use crate::error::{EditorError, Result};
use crate::input::{InputEvent, Modifiers, PointerTarget};
use crate::shortcuts::KeyCombo;
use crate::signal::DragSignals;
use crate::standard::{
    self, CLEAR, DELETE, PLACE_BOTTOM, PLACE_TOP, UPDATE_BLOCK, UPDATE_MODEL_VALUE,
};
use crate::store::BlockStore;
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use ve_core::document::{emit_block, emit_document, parse_block, parse_document};
use ve_core::hit::hit_test;
use ve_core::model::{BlockRecord, ModelValue};
use ve_core::ComponentKey;

pub struct VisualEditor {
    store: Rc<RefCell<BlockStore>>,
    signals: DragSignals,
    commands: CommandManager,
    config: EditorConfig,
    session: DragSession,
    /// Index of the last clicked block.
    selected: Option<usize>,
    preview: bool,
    /// Component being dragged in from the palette.
    palette: Option<ComponentKey>,
}

impl VisualEditor {
    /// Editor over `doc` with the standard command set registered and
    /// initialized.
    pub fn new(doc: ModelValue, config: EditorConfig) -> Result<Self> {
        let store = Rc::new(RefCell::new(BlockStore::new(doc)));
        let signals = DragSignals::default();
        let commands =
            CommandManager::new(Rc::clone(&store), signals.clone(), config.history_limit);
        standard::register_standard_commands(&commands)?;
        commands.init();
        log::debug!("editor ready: {:?}", commands.command_names());
        Ok(Self {
            store,
            signals,
            commands,
            config,
            session: DragSession::new(),
            selected: None,
            preview: false,
            palette: None,
        })
    }

    /// Editor over an empty document sized `config.default_container`.
    pub fn new_empty(config: EditorConfig) -> Result<Self> {
        let doc = ModelValue::new(config.default_container, Vec::new());
        Self::new(doc, config)
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn store(&self) -> Ref<'_, BlockStore> {
        self.store.borrow()
    }

    pub fn document(&self) -> ModelValue {
        self.store.borrow().doc().clone()
    }

    pub fn commands(&self) -> &CommandManager {
        &self.commands
    }

    pub fn signals(&self) -> &DragSignals {
        &self.signals
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    /// Guide lines to draw right now; both `None` outside a drag.
    pub fn guides(&self) -> Guides {
        self.session.guides()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The last clicked block, if it still exists.
    pub fn selected_block(&self) -> Option<BlockRecord> {
        let index = self.selected?;
        self.store.borrow().blocks().get(index).cloned()
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    /// What lies under a container-local point.
    pub fn target_at(&self, x: f64, y: f64) -> PointerTarget {
        match hit_test(self.store.borrow().blocks(), x, y) {
            Some(index) => PointerTarget::Block(index),
            None => PointerTarget::Container,
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &InputEvent) -> Result<()> {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                target,
                modifiers,
            } => {
                if self.preview {
                    return Ok(());
                }
                self.pointer_down(*x, *y, *target, *modifiers);
            }
            InputEvent::PointerMove { x, y, modifiers } => self.pointer_move(*x, *y, *modifiers),
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::Key { key, modifiers } => {
                self.handle_key(key, *modifiers)?;
            }
        }
        Ok(())
    }

    /// Dispatch a key press. Returns the name of the command it ran.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> Result<Option<String>> {
        self.commands.handle_key(&KeyCombo::new(key, modifiers))
    }

    fn pointer_down(&mut self, x: f64, y: f64, target: PointerTarget, modifiers: Modifiers) {
        if self.session.is_active() {
            self.pointer_up();
        }
        match target {
            PointerTarget::Container => {
                if !modifiers.shift {
                    self.store.borrow_mut().clear_focus(None);
                }
                self.selected = None;
            }
            PointerTarget::Block(index) => {
                if !self.select(index, modifiers.shift) {
                    return;
                }
                self.session.arm(&self.store.borrow(), index, x, y);
            }
        }
    }

    /// Apply click-selection rules to the block at `index`.
    fn select(&mut self, index: usize, shift: bool) -> bool {
        let mut store = self.store.borrow_mut();
        let Some(focus) = store.blocks().get(index).map(|b| b.focus) else {
            log::warn!("pointer down on missing block {index}");
            return false;
        };
        if shift {
            if store.focused_indices().len() <= 1 {
                store.set_focus(index, true);
            } else {
                store.set_focus(index, !focus);
            }
        } else if !focus {
            store.clear_focus(Some(index));
            store.set_focus(index, true);
        }
        self.selected = Some(index);
        true
    }

    fn pointer_move(&mut self, x: f64, y: f64, modifiers: Modifiers) {
        if self.session.begin() {
            self.signals.start.emit();
        }
        let mut store = self.store.borrow_mut();
        self.session
            .update(&mut store, x, y, modifiers.shift, self.config.snap_tolerance);
    }

    fn pointer_up(&mut self) {
        if self.session.release() {
            self.signals.end.emit();
        }
    }

    // ─── Palette drops ───────────────────────────────────────────────────

    /// A component left the palette.
    pub fn begin_component_drag(&mut self, key: ComponentKey) {
        if self.preview {
            return;
        }
        log::debug!("palette drag {key:?}");
        self.palette = Some(key);
        self.signals.start.emit();
    }

    /// The palette drag was released at container-local `(x, y)`. Appends a
    /// block centred there once measured, and commits the drop as one
    /// `drag` entry. Returns the new block's index, or `None` if no palette
    /// drag is active or the point is outside the container.
    pub fn drop_component(&mut self, x: f64, y: f64) -> Option<usize> {
        let key = self.palette?;
        if !self.store.borrow().container().bounds().contains(x, y) {
            log::debug!("drop at ({x}, {y}) outside container");
            return None;
        }
        self.palette = None;
        let index = self
            .store
            .borrow_mut()
            .push_block(BlockRecord::new_dropped(key, y, x));
        self.signals.end.emit();
        Some(index)
    }

    /// The palette drag ended. Without a preceding drop nothing is recorded.
    pub fn end_component_drag(&mut self) {
        if let Some(key) = self.palette.take() {
            log::debug!("palette drag {key:?} ended without drop");
        }
    }

    /// The renderer measured block `index`.
    pub fn apply_measurement(&mut self, index: usize, width: f64, height: f64) -> bool {
        self.store.borrow_mut().apply_measurement(index, width, height)
    }

    // ─── Preview ─────────────────────────────────────────────────────────

    pub fn set_preview(&mut self, preview: bool) {
        if preview == self.preview {
            return;
        }
        if preview {
            self.pointer_up();
            self.palette = None;
            self.store.borrow_mut().clear_focus(None);
            self.selected = None;
        }
        log::debug!("preview: {preview}");
        self.preview = preview;
    }

    // ─── Commands ────────────────────────────────────────────────────────

    pub fn execute(&self, name: &str, args: CommandArgs) -> Result<()> {
        self.commands.execute(name, args)
    }

    pub fn undo(&self) -> Result<()> {
        self.execute(UNDO, CommandArgs::None)
    }

    pub fn redo(&self) -> Result<()> {
        self.execute(REDO, CommandArgs::None)
    }

    pub fn delete(&self) -> Result<()> {
        self.execute(DELETE, CommandArgs::None)
    }

    pub fn clear(&self) -> Result<()> {
        self.execute(CLEAR, CommandArgs::None)
    }

    pub fn place_top(&self) -> Result<()> {
        self.execute(PLACE_TOP, CommandArgs::None)
    }

    pub fn place_bottom(&self) -> Result<()> {
        self.execute(PLACE_BOTTOM, CommandArgs::None)
    }

    /// Replace block `index`, last read as `old`, with `new`.
    pub fn update_block(&self, index: usize, new: BlockRecord, old: BlockRecord) -> Result<()> {
        self.execute(
            UPDATE_BLOCK,
            CommandArgs::UpdateBlock {
                index,
                new: Box::new(new),
                old: Box::new(old),
            },
        )
    }

    pub fn update_model_value(&self, value: ModelValue) -> Result<()> {
        self.execute(UPDATE_MODEL_VALUE, CommandArgs::ModelValue(Box::new(value)))
    }

    // ─── Import / export ─────────────────────────────────────────────────

    pub fn export_json(&self) -> Result<String> {
        Ok(emit_document(self.store.borrow().doc())?)
    }

    /// Replace the document with parsed `text`, undoably. Malformed text
    /// leaves the document and history untouched.
    pub fn import_json(&self, text: &str) -> Result<()> {
        let doc = parse_document(text).map_err(|err| {
            log::warn!("import rejected: {err}");
            EditorError::from(err)
        })?;
        self.update_model_value(doc)
    }

    /// JSON of block `index`, for the per-block "show" dialog.
    pub fn block_json(&self, index: usize) -> Result<Option<String>> {
        let store = self.store.borrow();
        match store.blocks().get(index) {
            Some(block) => Ok(Some(emit_block(block)?)),
            None => Ok(None),
        }
    }

    /// Replace block `index` with parsed `text`, undoably. Returns `false`
    /// if there is no such block.
    pub fn import_block_json(&self, index: usize, text: &str) -> Result<bool> {
        let new = parse_block(text).map_err(|err| {
            log::warn!("block import rejected: {err}");
            EditorError::from(err)
        })?;
        let Some(old) = self.store.borrow().blocks().get(index).cloned() else {
            return Ok(false);
        };
        self.update_block(index, new, old)?;
        Ok(true)
    }

    /// Run every command teardown. The editor stays usable for direct
    /// command calls, but drags are no longer recorded.
    pub fn destroy(&self) {
        self.commands.destroy();
    }
}

impl Drop for VisualEditor {
    fn drop(&mut self) {
        self.commands.destroy();
    }
}
