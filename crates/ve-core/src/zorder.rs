//! Z-order re-stacking for "bring to front" / "send to back".
//!
//! Both operations move the whole focused set relative to the unfocused
//! set. Focused blocks all land on the same index; their relative order
//! among themselves is not preserved.

use crate::model::BlockRecord;

/// Raise every focused block above every unfocused block.
///
/// Returns `false` (and leaves the list untouched) when there is nothing to
/// raise or nothing to raise above.
pub fn place_top(blocks: &mut [BlockRecord]) -> bool {
    let Some(max) = unfocused(blocks).max() else {
        return false;
    };
    let (target, mut changed) = match max.checked_add(1) {
        Some(target) => (target, false),
        None => {
            renormalize(blocks);
            (unfocused(blocks).max().map_or(0, |max| max + 1), true)
        }
    };
    for block in blocks.iter_mut().filter(|b| b.focus) {
        changed |= block.z_index != target;
        block.z_index = target;
    }
    log::debug!("place_top: focused blocks -> z {target}");
    changed
}

/// Sink every focused block below every unfocused block.
///
/// The target is one below the lowest unfocused index. If that would be
/// negative, the unfocused blocks are shifted up first so the target is 0;
/// indices never drift below zero.
pub fn place_bottom(blocks: &mut [BlockRecord]) -> bool {
    let Some(min) = unfocused(blocks).min() else {
        return false;
    };
    if !blocks.iter().any(|b| b.focus) {
        return false;
    }
    let target = match sink_target(blocks, min) {
        Some(target) => target,
        None => {
            renormalize(blocks);
            let min = unfocused(blocks).min().unwrap_or(0);
            sink_target(blocks, min).unwrap_or(0)
        }
    };
    for block in blocks.iter_mut().filter(|b| b.focus) {
        block.z_index = target;
    }
    log::debug!("place_bottom: focused blocks -> z {target}");
    true
}

fn unfocused(blocks: &[BlockRecord]) -> impl Iterator<Item = i64> + '_ {
    blocks.iter().filter(|b| !b.focus).map(|b| b.z_index)
}

/// One below `min`, shifting the unfocused blocks up when that is negative.
/// `None` if the arithmetic would overflow; nothing is modified then.
fn sink_target(blocks: &mut [BlockRecord], min: i64) -> Option<i64> {
    let target = min.checked_sub(1)?;
    if target >= 0 {
        return Some(target);
    }
    let shift = target.checked_neg()?;
    if !unfocused(blocks).all(|z| z.checked_add(shift).is_some()) {
        return None;
    }
    for block in blocks.iter_mut().filter(|b| !b.focus) {
        block.z_index += shift;
    }
    Some(0)
}

/// Re-rank every index to `0..n`, keeping order and ties.
fn renormalize(blocks: &mut [BlockRecord]) {
    let mut levels: Vec<i64> = blocks.iter().map(|b| b.z_index).collect();
    levels.sort_unstable();
    levels.dedup();
    for block in blocks.iter_mut() {
        let rank = levels.partition_point(|&z| z < block.z_index);
        block.z_index = rank as i64;
    }
    log::debug!("z-order renormalized to 0..{}", levels.len());
}
