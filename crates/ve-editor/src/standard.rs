//! The editor's built-in commands.
//!
//! | Name               | Keys                             | Effect                          |
//! |--------------------|----------------------------------|---------------------------------|
//! | `delete`           | `backspace`, `ctrl+d`, `delete`  | drop focused blocks             |
//! | `drag`             | (drag-end signal)                | commit a finished drag gesture  |
//! | `clear`            |                                  | empty the document              |
//! | `placeTop`         | `ctrl+up`                        | raise focused blocks            |
//! | `placeBottom`      | `ctrl+down`                      | sink focused blocks             |
//! | `updateBlock`      |                                  | replace one block               |
//! | `updateModelValue` |                                  | replace the whole document      |

use crate::commands::{Command, CommandArgs, CommandManager, InitContext, Teardown};
use crate::error::{EditorError, Result};
use crate::history::HistoryEntry;
use crate::store::BlockStore;
use std::cell::RefCell;
use std::rc::Rc;
use ve_core::model::BlockRecord;
use ve_core::zorder::{place_bottom, place_top};

pub const DELETE: &str = "delete";
pub const DRAG: &str = "drag";
pub const CLEAR: &str = "clear";
pub const PLACE_TOP: &str = "placeTop";
pub const PLACE_BOTTOM: &str = "placeBottom";
pub const UPDATE_BLOCK: &str = "updateBlock";
pub const UPDATE_MODEL_VALUE: &str = "updateModelValue";

/// Register every built-in command on `manager`.
pub fn register_standard_commands(manager: &CommandManager) -> Result<()> {
    manager.registry(Delete)?;
    manager.registry(Drag::default())?;
    manager.registry(Clear)?;
    manager.registry(PlaceTop)?;
    manager.registry(PlaceBottom)?;
    manager.registry(UpdateBlock)?;
    manager.registry(UpdateModelValue)?;
    Ok(())
}

fn snapshot(store: &BlockStore) -> Option<Vec<BlockRecord>> {
    store.block_list().cloned()
}

// ─── delete ──────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Delete;

impl Command for Delete {
    fn name(&self) -> &str {
        DELETE
    }

    fn keyboard(&self) -> &[&str] {
        &["backspace", "ctrl+d", "delete"]
    }

    fn execute(&mut self, store: &BlockStore, _args: CommandArgs) -> Result<HistoryEntry> {
        let before = snapshot(store);
        let after = store
            .block_list()
            .map(|blocks| blocks.iter().filter(|b| !b.focus).cloned().collect());
        Ok(HistoryEntry::blocks(DELETE, before, after))
    }
}

// ─── drag ────────────────────────────────────────────────────────────────

/// Commits a drag gesture as one history entry.
///
/// `init` subscribes to drag-start (capture the "before" list) and drag-end
/// (execute `drag` through the manager). `execute` pairs that snapshot with
/// the store as it stands when the gesture ends.
#[derive(Default)]
pub struct Drag {
    /// Outer `None`: no gesture in progress. Inner: the captured list.
    before: Rc<RefCell<Option<Option<Vec<BlockRecord>>>>>,
}

impl Command for Drag {
    fn name(&self) -> &str {
        DRAG
    }

    fn init(&mut self, ctx: &InitContext) -> Option<Teardown> {
        let before = Rc::clone(&self.before);
        let store = Rc::clone(&ctx.store);
        let start_id = ctx.signals.start.on(move || {
            *before.borrow_mut() = Some(snapshot(&store.borrow()));
        });

        let commands = ctx.commands.clone();
        let end_id = ctx.signals.end.on(move || {
            let Some(manager) = commands.upgrade() else {
                return;
            };
            if let Err(err) = manager.execute(DRAG, CommandArgs::None) {
                log::error!("drag commit failed: {err}");
            }
        });

        let signals = ctx.signals.clone();
        Some(Box::new(move || {
            signals.start.off(start_id);
            signals.end.off(end_id);
        }))
    }

    fn execute(&mut self, store: &BlockStore, _args: CommandArgs) -> Result<HistoryEntry> {
        let after = snapshot(store);
        let before = match self.before.borrow_mut().take() {
            Some(before) => before,
            None => {
                log::warn!("drag executed without a drag-start snapshot");
                after.clone()
            }
        };
        Ok(HistoryEntry::blocks(DRAG, before, after))
    }
}

// ─── clear ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Clear;

impl Command for Clear {
    fn name(&self) -> &str {
        CLEAR
    }

    fn execute(&mut self, store: &BlockStore, _args: CommandArgs) -> Result<HistoryEntry> {
        Ok(HistoryEntry::blocks(CLEAR, snapshot(store), None))
    }
}

// ─── z-order ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct PlaceTop;

impl Command for PlaceTop {
    fn name(&self) -> &str {
        PLACE_TOP
    }

    fn keyboard(&self) -> &[&str] {
        &["ctrl+up"]
    }

    fn execute(&mut self, store: &BlockStore, _args: CommandArgs) -> Result<HistoryEntry> {
        let before = snapshot(store);
        let mut after = before.clone();
        if let Some(blocks) = after.as_mut() {
            place_top(blocks);
        }
        Ok(HistoryEntry::blocks(PLACE_TOP, before, after))
    }
}

#[derive(Debug, Default)]
pub struct PlaceBottom;

impl Command for PlaceBottom {
    fn name(&self) -> &str {
        PLACE_BOTTOM
    }

    fn keyboard(&self) -> &[&str] {
        &["ctrl+down"]
    }

    fn execute(&mut self, store: &BlockStore, _args: CommandArgs) -> Result<HistoryEntry> {
        let before = snapshot(store);
        let mut after = before.clone();
        if let Some(blocks) = after.as_mut() {
            place_bottom(blocks);
        }
        Ok(HistoryEntry::blocks(PLACE_BOTTOM, before, after))
    }
}

// ─── replacement ─────────────────────────────────────────────────────────

/// Replace the block at `index` with `new`.
///
/// The block there must still equal `old`, focus aside; otherwise the first
/// block that does is replaced instead. With no match at all the entry is
/// still recorded, its redo and undo both restoring the current list.
#[derive(Debug, Default)]
pub struct UpdateBlock;

impl Command for UpdateBlock {
    fn name(&self) -> &str {
        UPDATE_BLOCK
    }

    fn execute(&mut self, store: &BlockStore, args: CommandArgs) -> Result<HistoryEntry> {
        let CommandArgs::UpdateBlock { index, new, old } = args else {
            return Err(EditorError::invalid_args(UPDATE_BLOCK, "(index, new, old) blocks"));
        };
        let before = snapshot(store);
        let mut after = before.clone();
        let slot = after.as_mut().and_then(|blocks| locate(blocks, index, &old));
        match slot {
            Some(slot) => *slot = *new,
            None => log::warn!("updateBlock: block {index} not found, recording no-op"),
        }
        Ok(HistoryEntry::blocks(UPDATE_BLOCK, before, after))
    }
}

/// Focus flips between reading a block and applying an edit to it.
fn same_ignoring_focus(stored: &BlockRecord, old: &BlockRecord) -> bool {
    *stored == BlockRecord { focus: stored.focus, ..old.clone() }
}

fn locate<'a>(
    blocks: &'a mut [BlockRecord],
    index: usize,
    old: &BlockRecord,
) -> Option<&'a mut BlockRecord> {
    if blocks.get(index).is_some_and(|b| same_ignoring_focus(b, old)) {
        return blocks.get_mut(index);
    }
    let moved = blocks.iter().position(|b| same_ignoring_focus(b, old))?;
    log::debug!("updateBlock: block {index} moved to {moved}");
    blocks.get_mut(moved)
}

#[derive(Debug, Default)]
pub struct UpdateModelValue;

impl Command for UpdateModelValue {
    fn name(&self) -> &str {
        UPDATE_MODEL_VALUE
    }

    fn execute(&mut self, store: &BlockStore, args: CommandArgs) -> Result<HistoryEntry> {
        let CommandArgs::ModelValue(value) = args else {
            return Err(EditorError::invalid_args(UPDATE_MODEL_VALUE, "a document"));
        };
        Ok(HistoryEntry::document(
            UPDATE_MODEL_VALUE,
            store.doc().clone(),
            *value,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::UNDO;
    use crate::signal::DragSignals;
    use ve_core::ComponentKey;
    use ve_core::model::{Container, ModelValue};

    fn block(top: f64, left: f64, z: i64, focus: bool) -> BlockRecord {
        let mut b = BlockRecord::new_dropped(ComponentKey::intern("text"), 0.0, 0.0)
            .with_position(top, left)
            .with_size(50.0, 20.0)
            .with_z_index(z);
        b.focus = focus;
        b
    }

    fn manager(blocks: Vec<BlockRecord>) -> CommandManager {
        let store = Rc::new(RefCell::new(BlockStore::new(ModelValue::new(
            Container::default(),
            blocks,
        ))));
        let m = CommandManager::new(store, DragSignals::default(), 0);
        register_standard_commands(&m).unwrap();
        m.init();
        m
    }

    fn blocks(m: &CommandManager) -> Vec<BlockRecord> {
        m.store().borrow().blocks().to_vec()
    }

    #[test]
    fn delete_keeps_unfocused_in_order() {
        let a = block(0.0, 0.0, 0, false);
        let b = block(10.0, 0.0, 1, true);
        let c = block(20.0, 0.0, 2, false);
        let m = manager(vec![a.clone(), b, c.clone()]);
        m.execute(DELETE, CommandArgs::None).unwrap();
        assert_eq!(blocks(&m), vec![a, c]);
    }

    #[test]
    fn clear_then_undo_restores_list() {
        let original = vec![block(0.0, 0.0, 0, false), block(5.0, 5.0, 1, true)];
        let m = manager(original.clone());
        m.execute(CLEAR, CommandArgs::None).unwrap();
        assert_eq!(m.store().borrow().block_list(), None);
        m.execute(UNDO, CommandArgs::None).unwrap();
        assert_eq!(blocks(&m), original);
    }

    #[test]
    fn place_top_and_bottom() {
        let m = manager(vec![block(0.0, 0.0, 0, true), block(0.0, 0.0, 4, false)]);
        m.execute(PLACE_TOP, CommandArgs::None).unwrap();
        assert_eq!(blocks(&m)[0].z_index, 5);
        m.execute(PLACE_BOTTOM, CommandArgs::None).unwrap();
        assert_eq!(blocks(&m)[0].z_index, 3);
        assert!(m.undo());
        assert_eq!(blocks(&m)[0].z_index, 5);
    }

    #[test]
    fn update_block_replaces_at_index() {
        let a = block(0.0, 0.0, 0, false);
        let b = block(10.0, 10.0, 1, false);
        let m = manager(vec![a.clone(), b.clone()]);
        let mut edited = b.clone();
        edited.props.insert("text".into(), "Submit".into());
        m.execute(
            UPDATE_BLOCK,
            CommandArgs::UpdateBlock {
                index: 1,
                new: Box::new(edited.clone()),
                old: Box::new(b.clone()),
            },
        )
        .unwrap();
        assert_eq!(blocks(&m), vec![a.clone(), edited]);
        m.undo();
        assert_eq!(blocks(&m), vec![a, b]);
    }

    #[test]
    fn update_block_missing_target_is_recorded_noop() {
        let a = block(0.0, 0.0, 0, false);
        let m = manager(vec![a.clone()]);
        let ghost = block(99.0, 99.0, 9, false);
        m.execute(
            UPDATE_BLOCK,
            CommandArgs::UpdateBlock {
                index: 0,
                new: Box::new(ghost.clone()),
                old: Box::new(ghost),
            },
        )
        .unwrap();
        assert_eq!(blocks(&m), vec![a]);
        assert_eq!(m.history_len(), 1);
    }

    fn update(index: usize, new: &BlockRecord, old: &BlockRecord) -> CommandArgs {
        CommandArgs::UpdateBlock {
            index,
            new: Box::new(new.clone()),
            old: Box::new(old.clone()),
        }
    }

    #[test]
    fn update_block_between_identical_blocks_uses_index() {
        let a = block(0.0, 0.0, 0, false);
        let m = manager(vec![a.clone(), a.clone()]);
        let edited = block(0.0, 0.0, 7, false);
        m.execute(UPDATE_BLOCK, update(1, &edited, &a)).unwrap();
        assert_eq!(blocks(&m), vec![a, edited]);
    }

    #[test]
    fn update_block_ignores_focus_change_since_read() {
        let read = block(0.0, 0.0, 0, true);
        let m = manager(vec![block(5.0, 5.0, 1, false), block(0.0, 0.0, 0, false)]);
        let mut edited = read.clone();
        edited.props.insert("text".into(), "Submit".into());
        m.execute(UPDATE_BLOCK, update(1, &edited, &read)).unwrap();
        assert_eq!(blocks(&m)[1], edited);
    }

    #[test]
    fn update_block_follows_block_moved_from_index() {
        let a = block(0.0, 0.0, 0, false);
        let b = block(10.0, 10.0, 1, false);
        let m = manager(vec![a.clone(), b.clone()]);
        let edited = block(10.0, 10.0, 4, false);
        m.execute(UPDATE_BLOCK, update(0, &edited, &b)).unwrap();
        assert_eq!(blocks(&m), vec![a, edited]);
    }

    #[test]
    fn wrong_arguments_are_rejected() {
        let m = manager(vec![]);
        assert!(matches!(
            m.execute(UPDATE_BLOCK, CommandArgs::None),
            Err(EditorError::InvalidArguments { .. })
        ));
        assert!(matches!(
            m.execute(UPDATE_MODEL_VALUE, CommandArgs::None),
            Err(EditorError::InvalidArguments { .. })
        ));
        assert_eq!(m.history_len(), 0);
    }

    #[test]
    fn update_model_value_replaces_container_too() {
        let m = manager(vec![block(0.0, 0.0, 0, false)]);
        let original = m.store().borrow().doc().clone();
        let next = ModelValue::new(
            Container {
                width: 1024.0,
                height: 768.0,
            },
            vec![],
        );
        m.execute(UPDATE_MODEL_VALUE, CommandArgs::ModelValue(Box::new(next.clone())))
            .unwrap();
        assert_eq!(m.store().borrow().doc(), &next);
        m.undo();
        assert_eq!(m.store().borrow().doc(), &original);
    }

    #[test]
    fn drag_signals_commit_one_entry() {
        let m = manager(vec![block(10.0, 10.0, 0, true)]);
        m.signals().start.emit();
        m.store().borrow_mut().set_position(0, 30.0, 50.0);
        m.signals().end.emit();
        assert_eq!(m.history_labels(), vec![DRAG.to_string()]);
        m.undo();
        let b = &blocks(&m)[0];
        assert_eq!((b.top, b.left), (10.0, 10.0));
    }

    #[test]
    fn destroy_unsubscribes_both_drag_handlers() {
        let m = manager(vec![]);
        assert_eq!(m.signals().start.subscriber_count(), 1);
        assert_eq!(m.signals().end.subscriber_count(), 1);
        m.destroy();
        assert_eq!(m.signals().start.subscriber_count(), 0);
        assert_eq!(m.signals().end.subscriber_count(), 0);
    }

    #[test]
    fn default_keyboard_map() {
        let m = manager(vec![]);
        assert_eq!(
            m.shortcuts_of(DELETE),
            Some(vec![
                "backspace".to_string(),
                "ctrl+d".to_string(),
                "delete".to_string()
            ])
        );
        assert_eq!(m.shortcuts_of(PLACE_TOP), Some(vec!["ctrl+up".to_string()]));
        assert_eq!(m.shortcuts_of(PLACE_BOTTOM), Some(vec!["ctrl+down".to_string()]));
    }
}
