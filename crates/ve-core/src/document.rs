//! JSON import/export of whole documents and single blocks.
//!
//! The wire shape is the one the host page stores:
//! `{ "container": { "width": .., "height": .. }, "blocks": [ .. ] }`
//! with camelCase block fields.

use crate::model::{BlockRecord, Container, ModelValue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid container size {width} x {height}")]
    InvalidContainer { width: f64, height: f64 },
}

/// Parse a document, rejecting containers with negative or non-finite size.
pub fn parse_document(text: &str) -> Result<ModelValue, DocumentError> {
    let doc: ModelValue = serde_json::from_str(text)?;
    validate_container(doc.container)?;
    Ok(doc)
}

/// Parse a single block, as pasted into the per-block import dialog.
pub fn parse_block(text: &str) -> Result<BlockRecord, DocumentError> {
    Ok(serde_json::from_str(text)?)
}

pub fn emit_document(doc: &ModelValue) -> Result<String, DocumentError> {
    Ok(serde_json::to_string(doc)?)
}

pub fn emit_block(block: &BlockRecord) -> Result<String, DocumentError> {
    Ok(serde_json::to_string(block)?)
}

fn validate_container(c: Container) -> Result<(), DocumentError> {
    let ok = |v: f64| v.is_finite() && v >= 0.0;
    if ok(c.width) && ok(c.height) {
        Ok(())
    } else {
        Err(DocumentError::InvalidContainer {
            width: c.width,
            height: c.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ComponentKey;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_minimal_document() {
        let doc = parse_document(r#"{"container":{"width":800,"height":600},"blocks":[]}"#)
            .unwrap();
        assert_eq!(doc.container.width, 800.0);
        assert_eq!(doc.blocks, Some(vec![]));
    }

    #[test]
    fn parse_document_without_blocks() {
        let doc = parse_document(r#"{"container":{"width":10,"height":10}}"#).unwrap();
        assert_eq!(doc.blocks, None);
    }

    #[test]
    fn parse_block_with_defaults() {
        let b = parse_block(r#"{"componentKey":"text","top":12,"left":34}"#).unwrap();
        assert_eq!(b.component_key, ComponentKey::intern("text"));
        assert_eq!((b.top, b.left), (12.0, 34.0));
        assert!(!b.focus);
        assert_eq!(b.z_index, 0);
    }

    #[test]
    fn emit_uses_camel_case() {
        let b = BlockRecord::new_dropped(ComponentKey::intern("input"), 1.0, 2.0);
        let json = emit_block(&b).unwrap();
        assert!(json.contains("\"componentKey\":\"input\""));
        assert!(json.contains("\"zIndex\":0"));
        assert!(json.contains("\"adjustPosition\":true"));
        assert!(!json.contains("slotName"));
    }

    #[test]
    fn document_survives_emit_and_parse() {
        let mut b = BlockRecord::new_dropped(ComponentKey::intern("select"), 5.0, 6.0);
        b.props.insert("size".into(), serde_json::json!("14px"));
        b.model.insert("default".into(), "city".into());
        b.slot_name = Some("custom".into());
        let doc = ModelValue::new(Container::default(), vec![b]);
        let text = emit_document(&doc).unwrap();
        assert_eq!(parse_document(&text).unwrap(), doc);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(parse_document("{not json"), Err(DocumentError::Json(_))));
    }

    #[test]
    fn negative_container_is_rejected() {
        let err = parse_document(r#"{"container":{"width":-1,"height":10}}"#).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidContainer { .. }));
    }
}
