//! Hit testing: point → block lookup.
//!
//! Paint order is z-index ascending, then list order, so the topmost block
//! at a point is the one with the highest z-index; among equals the later
//! list entry wins.

use crate::model::BlockRecord;

/// Index of the topmost block containing `(x, y)`, or `None` for the bare
/// container.
pub fn hit_test(blocks: &[BlockRecord], x: f64, y: f64) -> Option<usize> {
    blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.bounds().contains(x, y))
        .max_by_key(|(i, b)| (b.z_index, *i))
        .map(|(i, _)| i)
}
