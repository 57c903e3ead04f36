pub mod align;
pub mod document;
pub mod hit;
pub mod id;
pub mod model;
pub mod zorder;

pub use align::{MarkLine, MarkLines, SNAP_TOLERANCE, Snap};
pub use document::{DocumentError, emit_document, parse_document};
pub use hit::hit_test;
pub use id::ComponentKey;
pub use model::*;
pub use zorder::{place_bottom, place_top};
