//! Snap-to-sibling alignment for block dragging.
//!
//! At drag start, every unfocused block plus the container itself yields
//! five candidate positions per axis for the moving block's top-left corner.
//! During the drag the first candidate within tolerance wins, per axis.
//!
//! | # | candidate (y axis)          | display line at |
//! |---|-----------------------------|-----------------|
//! | 1 | top to top                  | `t`             |
//! | 2 | top to bottom (abut after)  | `t + h`         |
//! | 3 | centre to centre            | `t + h / 2`     |
//! | 4 | bottom to top (abut before) | `t`             |
//! | 5 | bottom to bottom            | `t + h`         |
//!
//! The x axis is the same table with `left`/`width`.

use crate::model::{Bounds, Container};

/// Default snap distance in pixels. A candidate exactly this far away
/// still snaps.
pub const SNAP_TOLERANCE: f64 = 5.0;

/// One snap candidate along a single axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkLine {
    /// Value the moving block's top (or left) must take to align.
    pub coordinate: f64,
    /// Where the guide line is drawn when this candidate is accepted.
    pub display: f64,
}

impl MarkLine {
    const fn new(coordinate: f64, display: f64) -> Self {
        Self {
            coordinate,
            display,
        }
    }
}

/// Snap candidates for both axes, in generation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkLines {
    /// Candidates for `left`; guide lines are vertical.
    pub x: Vec<MarkLine>,
    /// Candidates for `top`; guide lines are horizontal.
    pub y: Vec<MarkLine>,
}

/// Outcome of snapping one proposed position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub left: f64,
    pub top: f64,
    /// Vertical guide line position, if the x axis snapped.
    pub guide_x: Option<f64>,
    /// Horizontal guide line position, if the y axis snapped.
    pub guide_y: Option<f64>,
}

impl MarkLines {
    /// Build the candidate lists for a block of size `moving_width` x
    /// `moving_height` against `targets` and the container.
    ///
    /// The container comes last, after every target, so sibling alignment
    /// takes precedence over canvas centring at equal distance.
    pub fn compute<I>(
        targets: I,
        container: Container,
        moving_width: f64,
        moving_height: f64,
    ) -> Self
    where
        I: IntoIterator<Item = Bounds>,
    {
        let mut lines = MarkLines::default();
        for b in targets.into_iter().chain(std::iter::once(container.bounds())) {
            push_axis(&mut lines.y, b.top, b.height, moving_height);
            push_axis(&mut lines.x, b.left, b.width, moving_width);
        }
        lines
    }

    /// Snap a proposed top-left position. Axes resolve independently.
    pub fn snap(&self, left: f64, top: f64, tolerance: f64) -> Snap {
        let x = resolve_axis(&self.x, left, tolerance);
        let y = resolve_axis(&self.y, top, tolerance);
        let snap = Snap {
            left: x.map_or(left, |m| m.coordinate),
            top: y.map_or(top, |m| m.coordinate),
            guide_x: x.map(|m| m.display),
            guide_y: y.map(|m| m.display),
        };
        log::trace!(
            "snap ({left}, {top}) -> ({}, {}) guides {:?}/{:?}",
            snap.left,
            snap.top,
            snap.guide_x,
            snap.guide_y
        );
        snap
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.y.is_empty()
    }
}

fn push_axis(out: &mut Vec<MarkLine>, start: f64, size: f64, moving: f64) {
    let end = start + size;
    out.push(MarkLine::new(start, start));
    out.push(MarkLine::new(end, end));
    out.push(MarkLine::new(start + size / 2.0 - moving / 2.0, start + size / 2.0));
    out.push(MarkLine::new(start - moving, start));
    out.push(MarkLine::new(end - moving, end));
}

/// First candidate (in generation order) within `tolerance` of `current`.
pub fn resolve_axis(lines: &[MarkLine], current: f64, tolerance: f64) -> Option<&MarkLine> {
    lines
        .iter()
        .find(|m| (m.coordinate - current).abs() <= tolerance)
}
