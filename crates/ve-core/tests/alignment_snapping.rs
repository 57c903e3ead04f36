//! Integration tests: snap candidates computed from a real document.

use ve_core::align::{MarkLines, SNAP_TOLERANCE};
use ve_core::model::*;
use ve_core::{ComponentKey, parse_document};

fn sibling_at_left(left: f64) -> ModelValue {
    let sibling = BlockRecord::new_dropped(ComponentKey::intern("text"), 0.0, 0.0)
        .with_position(400.0, left)
        .with_size(40.0, 20.0);
    let moving = BlockRecord::new_dropped(ComponentKey::intern("button"), 0.0, 0.0)
        .with_position(200.0, 300.0)
        .with_size(40.0, 20.0)
        .focused();
    ModelValue::new(
        Container {
            width: 1000.0,
            height: 1000.0,
        },
        vec![sibling, moving],
    )
}

fn lines_for(doc: &ModelValue) -> MarkLines {
    let split = doc.split_focus();
    let moving = split.focus[0];
    MarkLines::compute(split.unfocused_bounds(), doc.container, moving.width, moving.height)
}

// ─── Tolerance boundary ─────────────────────────────────────────────────

#[test]
fn snaps_at_exactly_five_pixels() {
    let doc = sibling_at_left(100.0);
    let snap = lines_for(&doc).snap(105.0, 200.0, SNAP_TOLERANCE);
    assert_eq!(snap.left, 100.0);
    assert_eq!(snap.guide_x, Some(100.0));
}

#[test]
fn does_not_snap_at_six_pixels() {
    let doc = sibling_at_left(100.0);
    let snap = lines_for(&doc).snap(106.0, 200.0, SNAP_TOLERANCE);
    assert_eq!(snap.left, 106.0);
    assert_eq!(snap.guide_x, None);
}

#[test]
fn no_candidate_passes_position_through() {
    let doc = sibling_at_left(100.0);
    let snap = lines_for(&doc).snap(613.0, 713.0, SNAP_TOLERANCE);
    assert_eq!((snap.left, snap.top), (613.0, 713.0));
    assert_eq!((snap.guide_x, snap.guide_y), (None, None));
}

// ─── Container centring ─────────────────────────────────────────────────

#[test]
fn centres_in_container() {
    let doc = sibling_at_left(100.0);
    // Moving block is 40 wide: centred left is 500 - 20.
    let snap = lines_for(&doc).snap(478.0, 200.0, SNAP_TOLERANCE);
    assert_eq!(snap.left, 480.0);
    assert_eq!(snap.guide_x, Some(500.0));
}

#[test]
fn focused_blocks_are_not_targets() {
    let doc = parse_document(include_str!("fixtures/form.json")).unwrap();
    let lines = lines_for(&doc);
    // Two unfocused blocks plus the container.
    assert_eq!(lines.x.len(), 15);
    let mut without_button = doc.clone();
    without_button.blocks_mut().retain(|b| !b.focus);
    let expected = MarkLines::compute(
        without_button.blocks().iter().map(|b| b.bounds()),
        doc.container,
        80.0,
        40.0,
    );
    assert_eq!(lines, expected);
}

#[test]
fn abut_below_sibling() {
    let doc = parse_document(include_str!("fixtures/form.json")).unwrap();
    let lines = lines_for(&doc);
    // Text block spans top 100..130; moving top near 132 abuts at 130.
    let snap = lines.snap(700.0, 132.0, SNAP_TOLERANCE);
    assert_eq!(snap.top, 130.0);
    assert_eq!(snap.guide_y, Some(130.0));
}
