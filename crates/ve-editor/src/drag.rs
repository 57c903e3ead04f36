//! Live pointer state for one drag gesture.
//!
//! ```text
//! Idle ──press──▶ Armed ──first move──▶ Dragging ──release──▶ Idle
//!                   └────────release (click)──────────────────▶ Idle
//! ```
//!
//! The session never emits signals itself. `begin` and `release` report the
//! transitions that must fire drag-start and drag-end, and the editor emits
//! them while no store borrow is held.
//!
//! ## Modifier behaviors
//!
//! | Modifier  | Effect                                              |
//! |-----------|-----------------------------------------------------|
//! | **Shift** | lock the delta to the axis with the larger movement |

use crate::store::BlockStore;
use ve_core::align::{MarkLines, Snap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Armed,
    Dragging,
}

/// Guide lines currently shown. Each axis is independent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Guides {
    /// Vertical line at this x, when `left` snapped.
    pub x: Option<f64>,
    /// Horizontal line at this y, when `top` snapped.
    pub y: Option<f64>,
}

impl Guides {
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none()
    }
}

/// Everything captured on press.
#[derive(Debug, Clone)]
struct Gesture {
    start_x: f64,
    start_y: f64,
    /// Block whose geometry drives snapping. Only focused blocks move.
    primary: usize,
    start_left: f64,
    start_top: f64,
    /// `(index, top, left)` of every focused block at press time.
    origins: Vec<(usize, f64, f64)>,
    lines: MarkLines,
}

#[derive(Debug, Default)]
pub struct DragSession {
    phase: DragPhase,
    gesture: Option<Gesture>,
    guides: Guides,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn guides(&self) -> Guides {
        self.guides
    }

    pub fn is_active(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    /// Capture the press. Snap candidates come from every unfocused block
    /// plus the container, sized for the primary block.
    ///
    /// Returns `false` (and stays idle) if `primary` is out of range.
    pub fn arm(&mut self, store: &BlockStore, primary: usize, x: f64, y: f64) -> bool {
        let Some(block) = store.blocks().get(primary) else {
            return false;
        };
        let split = store.split_focus();
        let lines = MarkLines::compute(
            split.unfocused_bounds(),
            store.container(),
            block.width,
            block.height,
        );
        let origins = store
            .blocks()
            .iter()
            .enumerate()
            .filter(|(_, b)| b.focus)
            .map(|(i, b)| (i, b.top, b.left))
            .collect();

        log::trace!("drag armed on block {primary} at ({x}, {y})");
        self.gesture = Some(Gesture {
            start_x: x,
            start_y: y,
            primary,
            start_left: block.left,
            start_top: block.top,
            origins,
            lines,
        });
        self.phase = DragPhase::Armed;
        self.guides = Guides::default();
        true
    }

    /// `Armed → Dragging`. Returns `true` exactly once per gesture: the
    /// caller emits drag-start then.
    pub fn begin(&mut self) -> bool {
        if self.phase != DragPhase::Armed {
            return false;
        }
        log::debug!("drag started");
        self.phase = DragPhase::Dragging;
        true
    }

    /// Move the focused set for a pointer at `(x, y)`. Only valid while
    /// dragging; returns the snap applied to the primary block.
    pub fn update(
        &mut self,
        store: &mut BlockStore,
        x: f64,
        y: f64,
        shift: bool,
        tolerance: f64,
    ) -> Option<Snap> {
        if self.phase != DragPhase::Dragging {
            return None;
        }
        let g = self.gesture.as_ref()?;

        let mut dx = x - g.start_x;
        let mut dy = y - g.start_y;
        if shift {
            if dx.abs() > dy.abs() {
                dy = 0.0;
            } else {
                dx = 0.0;
            }
        }

        let snap = g.lines.snap(g.start_left + dx, g.start_top + dy, tolerance);
        log::trace!("drag block {} by ({dx}, {dy})", g.primary);
        let dl = snap.left - g.start_left;
        let dt = snap.top - g.start_top;
        for &(index, top, left) in &g.origins {
            store.set_position(index, top + dt, left + dl);
        }

        self.guides = Guides {
            x: snap.guide_x,
            y: snap.guide_y,
        };
        Some(snap)
    }

    /// End the gesture. Returns `true` if it had reached `Dragging`: the
    /// caller emits drag-end then. Guides are cleared either way.
    pub fn release(&mut self) -> bool {
        let dragged = self.phase == DragPhase::Dragging;
        log::trace!("drag released (dragged: {dragged})");
        self.phase = DragPhase::Idle;
        self.gesture = None;
        self.guides = Guides::default();
        dragged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ve_core::ComponentKey;
    use ve_core::model::{BlockRecord, Container, ModelValue};

    fn block(top: f64, left: f64, focus: bool) -> BlockRecord {
        let mut b = BlockRecord::new_dropped(ComponentKey::intern("text"), 0.0, 0.0)
            .with_position(top, left)
            .with_size(40.0, 20.0);
        b.focus = focus;
        b
    }

    fn store(blocks: Vec<BlockRecord>) -> BlockStore {
        BlockStore::new(ModelValue::new(Container::default(), blocks))
    }

    fn pos(s: &BlockStore, i: usize) -> (f64, f64) {
        let b = &s.blocks()[i];
        (b.top, b.left)
    }

    #[test]
    fn click_without_move_never_drags() {
        let s = store(vec![block(10.0, 10.0, true)]);
        let mut d = DragSession::new();
        assert!(d.arm(&s, 0, 0.0, 0.0));
        assert_eq!(d.phase(), DragPhase::Armed);
        assert!(!d.release());
        assert_eq!(d.phase(), DragPhase::Idle);
    }

    #[test]
    fn begin_fires_once() {
        let s = store(vec![block(10.0, 10.0, true)]);
        let mut d = DragSession::new();
        d.arm(&s, 0, 0.0, 0.0);
        assert!(d.begin());
        assert!(!d.begin());
        assert!(d.release());
        assert!(!d.begin());
    }

    #[test]
    fn update_before_begin_is_ignored() {
        let mut s = store(vec![block(10.0, 10.0, true)]);
        let mut d = DragSession::new();
        d.arm(&s, 0, 0.0, 0.0);
        assert_eq!(d.update(&mut s, 100.0, 100.0, false, 5.0), None);
        assert_eq!(pos(&s, 0), (10.0, 10.0));
    }

    #[test]
    fn shift_locks_dominant_axis() {
        let mut s = store(vec![block(100.0, 100.0, true)]);
        let mut d = DragSession::new();
        d.arm(&s, 0, 0.0, 0.0);
        d.begin();
        d.update(&mut s, 60.0, 17.0, true, 0.0);
        assert_eq!(pos(&s, 0), (100.0, 160.0));
        d.update(&mut s, 13.0, -70.0, true, 0.0);
        assert_eq!(pos(&s, 0), (30.0, 100.0));
    }

    #[test]
    fn focused_blocks_move_together() {
        let mut s = store(vec![
            block(100.0, 100.0, true),
            block(300.0, 50.0, true),
            block(500.0, 600.0, false),
        ]);
        let mut d = DragSession::new();
        d.arm(&s, 0, 0.0, 0.0);
        d.begin();
        d.update(&mut s, 33.0, 21.0, false, 0.0);
        assert_eq!(pos(&s, 0), (121.0, 133.0));
        assert_eq!(pos(&s, 1), (321.0, 83.0));
        assert_eq!(pos(&s, 2), (500.0, 600.0));
    }

    #[test]
    fn snap_sets_guides_and_release_clears_them() {
        // Sibling at left 200; primary starts at left 100, moved to 197.
        let mut s = store(vec![block(100.0, 100.0, true), block(300.0, 200.0, false)]);
        let mut d = DragSession::new();
        d.arm(&s, 0, 0.0, 0.0);
        d.begin();
        let snap = d.update(&mut s, 97.0, 50.0, false, 5.0).unwrap();
        assert_eq!(snap.left, 200.0);
        assert_eq!(d.guides().x, Some(200.0));
        assert_eq!(pos(&s, 0).1, 200.0);

        d.release();
        assert!(d.guides().is_empty());
    }

    #[test]
    fn arm_out_of_range_stays_idle() {
        let s = store(vec![]);
        let mut d = DragSession::new();
        assert!(!d.arm(&s, 3, 0.0, 0.0));
        assert!(!d.is_active());
    }
}
