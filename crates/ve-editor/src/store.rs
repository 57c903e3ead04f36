//! The document owner.
//!
//! `BlockStore` is the only place a `ModelValue` lives. Commands change it
//! exclusively through whole-list or whole-document replacement
//! (`update_blocks`, `update_model_value`), so one history entry always
//! holds enough to restore the previous state. Live interaction (focus
//! toggling, drag movement, render measurement) edits fields in place and
//! is captured by the drag command's before/after snapshots instead.

use ve_core::model::{BlockRecord, Container, FocusSplit, ModelValue};

#[derive(Debug, Clone, Default)]
pub struct BlockStore {
    doc: ModelValue,
    /// Bumped on every change, so the UI can cheaply tell whether to redraw.
    revision: u64,
}

impl BlockStore {
    pub fn new(doc: ModelValue) -> Self {
        Self { doc, revision: 0 }
    }

    pub fn doc(&self) -> &ModelValue {
        &self.doc
    }

    pub fn blocks(&self) -> &[BlockRecord] {
        self.doc.blocks()
    }

    /// The raw block list, distinguishing absent from empty.
    pub fn block_list(&self) -> Option<&Vec<BlockRecord>> {
        self.doc.blocks.as_ref()
    }

    pub fn container(&self) -> Container {
        self.doc.container
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn split_focus(&self) -> FocusSplit<'_> {
        self.doc.split_focus()
    }

    // ─── Replacement entry points ───────────────────────────────────────

    /// Replace the block list, keeping the container. `None` empties the
    /// document.
    pub fn update_blocks(&mut self, blocks: Option<Vec<BlockRecord>>) {
        log::trace!(
            "update_blocks: {} block(s)",
            blocks.as_ref().map_or(0, Vec::len)
        );
        self.doc.blocks = blocks;
        self.touch();
    }

    /// Replace the whole document.
    pub fn update_model_value(&mut self, doc: ModelValue) {
        log::trace!("update_model_value: {} block(s)", doc.blocks().len());
        self.doc = doc;
        self.touch();
    }

    // ─── In-place interaction edits ─────────────────────────────────────

    /// Unfocus every block except the one at `keep`.
    pub fn clear_focus(&mut self, keep: Option<usize>) {
        let Some(blocks) = self.doc.blocks.as_mut() else {
            return;
        };
        for (i, block) in blocks.iter_mut().enumerate() {
            if Some(i) != keep {
                block.focus = false;
            }
        }
        self.touch();
    }

    pub fn set_focus(&mut self, index: usize, focus: bool) -> bool {
        match self.block_mut(index) {
            Some(block) => {
                block.focus = focus;
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn focused_indices(&self) -> Vec<usize> {
        self.blocks()
            .iter()
            .enumerate()
            .filter(|(_, b)| b.focus)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn set_position(&mut self, index: usize, top: f64, left: f64) -> bool {
        match self.block_mut(index) {
            Some(block) => {
                block.top = top;
                block.left = left;
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Append a freshly dropped block.
    pub fn push_block(&mut self, block: BlockRecord) -> usize {
        let blocks = self.doc.blocks_mut();
        blocks.push(block);
        let index = blocks.len() - 1;
        self.touch();
        index
    }

    /// Record the size the renderer measured. A block still flagged
    /// `adjust_position` is re-centred on its drop point, once.
    pub fn apply_measurement(&mut self, index: usize, width: f64, height: f64) -> bool {
        let Some(block) = self.block_mut(index) else {
            return false;
        };
        if block.adjust_position {
            block.left -= width / 2.0;
            block.top -= height / 2.0;
            block.adjust_position = false;
        }
        block.width = width;
        block.height = height;
        self.touch();
        true
    }

    fn block_mut(&mut self, index: usize) -> Option<&mut BlockRecord> {
        self.doc.blocks.as_mut()?.get_mut(index)
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}
