//! Core data model for visual-editor documents.
//!
//! A document (`ModelValue`) is a fixed-size container plus a flat list of
//! placed component instances (`BlockRecord`). List order is only the render
//! iteration order; visual stacking is decided by `z_index`.
//!
//! `props` and `model` are opaque bags owned by the property panel. The core
//! copies them along with the block but never reads them.

use crate::id::ComponentKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque design-time properties of a block (`{"text": "OK", "color": ...}`).
pub type PropsBag = serde_json::Map<String, serde_json::Value>;

/// Opaque field bindings of a block (`{"default": "username"}`).
pub type ModelBag = BTreeMap<String, String>;

// ─── Geometry ────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in container-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Edges are inclusive.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

// ─── Blocks ──────────────────────────────────────────────────────────────

/// One placed component instance on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    /// Key into the external component registry.
    pub component_key: ComponentKey,
    pub top: f64,
    pub left: f64,
    /// Re-centre on the drop point once the renderer has measured the block.
    #[serde(default)]
    pub adjust_position: bool,
    #[serde(default)]
    pub focus: bool,
    #[serde(default)]
    pub z_index: i64,
    /// `0` until first measured.
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Whether the user resized the block explicitly.
    #[serde(default)]
    pub has_resize: bool,
    #[serde(default)]
    pub props: PropsBag,
    #[serde(default)]
    pub model: ModelBag,
    /// Name of a host-supplied slot that renders this block instead of the
    /// registered component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_name: Option<String>,
}

impl BlockRecord {
    /// A freshly dropped block at the pointer position. Its size is unknown
    /// until the renderer measures it, at which point it is re-centred.
    pub fn new_dropped(component_key: ComponentKey, top: f64, left: f64) -> Self {
        Self {
            component_key,
            top,
            left,
            adjust_position: true,
            focus: false,
            z_index: 0,
            width: 0.0,
            height: 0.0,
            has_resize: false,
            props: PropsBag::new(),
            model: ModelBag::new(),
            slot_name: None,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.top, self.left, self.width, self.height)
    }

    pub fn with_position(mut self, top: f64, left: f64) -> Self {
        self.top = top;
        self.left = left;
        self.adjust_position = false;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn focused(mut self) -> Self {
        self.focus = true;
        self
    }
}

// ─── Document ────────────────────────────────────────────────────────────

/// Size of the editing canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub width: f64,
    pub height: f64,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Container {
    /// The container as a pseudo-block at the origin, used as an
    /// alignment target.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(0.0, 0.0, self.width, self.height)
    }
}

/// The whole document.
///
/// `blocks` is `None` after a `clear`; an absent list and an empty list
/// render the same way but are kept distinct so undo restores exactly
/// what was there.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelValue {
    pub container: Container,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<BlockRecord>>,
}

impl ModelValue {
    pub fn new(container: Container, blocks: Vec<BlockRecord>) -> Self {
        Self {
            container,
            blocks: Some(blocks),
        }
    }

    /// Blocks in render order; empty when the list is absent.
    pub fn blocks(&self) -> &[BlockRecord] {
        self.blocks.as_deref().unwrap_or(&[])
    }

    /// Mutable block list, materializing an empty one if absent.
    pub fn blocks_mut(&mut self) -> &mut Vec<BlockRecord> {
        self.blocks.get_or_insert_with(Vec::new)
    }

    /// Split blocks into focused and unfocused, preserving list order.
    pub fn split_focus(&self) -> FocusSplit<'_> {
        FocusSplit::of(self.blocks())
    }
}

/// Focused / unfocused partition of a block list, preserving order.
#[derive(Debug, Default)]
pub struct FocusSplit<'a> {
    pub focus: Vec<&'a BlockRecord>,
    pub unfocus: Vec<&'a BlockRecord>,
}

impl<'a> FocusSplit<'a> {
    pub fn of(blocks: &'a [BlockRecord]) -> Self {
        let (focus, unfocus) = blocks.iter().partition(|b| b.focus);
        Self { focus, unfocus }
    }

    /// Bounds of every unfocused block, the alignment targets of a drag.
    pub fn unfocused_bounds(&self) -> impl Iterator<Item = Bounds> + '_ {
        self.unfocus.iter().map(|b| b.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(key: &str) -> BlockRecord {
        BlockRecord::new_dropped(ComponentKey::intern(key), 10.0, 20.0)
    }

    #[test]
    fn dropped_block_defaults() {
        let b = block("text");
        assert!(b.adjust_position);
        assert!(!b.focus);
        assert_eq!(b.z_index, 0);
        assert_eq!((b.width, b.height), (0.0, 0.0));
        assert!(b.props.is_empty());
        assert!(b.model.is_empty());
    }

    #[test]
    fn bounds_edges_are_inclusive() {
        let b = Bounds::new(10.0, 10.0, 20.0, 5.0);
        assert!(b.contains(10.0, 10.0));
        assert!(b.contains(30.0, 15.0));
        assert!(!b.contains(30.1, 15.0));
        assert_eq!(b.right(), 30.0);
        assert_eq!(b.bottom(), 15.0);
    }

    #[test]
    fn split_focus_preserves_order() {
        let doc = ModelValue::new(
            Container::default(),
            vec![
                block("a"),
                block("b").focused(),
                block("c"),
                block("d").focused(),
            ],
        );
        let split = doc.split_focus();
        let keys = |v: &[&BlockRecord]| {
            v.iter()
                .map(|b| b.component_key.as_str().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(keys(&split.focus), vec!["b", "d"]);
        assert_eq!(keys(&split.unfocus), vec!["a", "c"]);
    }

    #[test]
    fn absent_blocks_read_as_empty() {
        let mut doc = ModelValue::default();
        assert!(doc.blocks().is_empty());
        doc.blocks_mut().push(block("a"));
        assert_eq!(doc.blocks().len(), 1);
    }

    #[test]
    fn container_pseudo_block() {
        let c = Container {
            width: 400.0,
            height: 300.0,
        };
        assert_eq!(c.bounds(), Bounds::new(0.0, 0.0, 400.0, 300.0));
    }
}
