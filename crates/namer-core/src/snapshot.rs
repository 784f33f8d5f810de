//! Host snapshots: a nested, serde-friendly copy of a `Document`.
//!
//! The JSON shape uses the host's own attribute spelling so a plugin shell
//! can serialize its live nodes directly:
//!
//! ```json
//! { "page": { "id": "0:1", "type": "PAGE", "name": "Page 1",
//!             "children": [ { "id": "1:2", "type": "VECTOR", "name": "Vector",
//!                             "fills": [], "strokes": [{ "type": "SOLID" }] } ] },
//!   "selection": ["1:2"] }
//! ```
//!
//! MessagePack uses the same shape with named fields.

use crate::id::NodeId;
use crate::model::{Document, Layer, NodeType};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    #[serde(flatten)]
    pub layer: Layer,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub page: SnapshotNode,

    #[serde(default)]
    pub selection: Vec<NodeId>,
}

impl Snapshot {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            page: snapshot_node(doc, doc.page),
            selection: doc.selected_ids(),
        }
    }

    /// Rebuild a `Document`.
    ///
    /// # Errors
    /// Fails when the root is not a page, a leaf layer has children, an id
    /// appears twice, or the selection names an unknown layer.
    pub fn into_document(self) -> Result<Document, String> {
        let Snapshot { page, selection } = self;
        if page.layer.node_type != NodeType::Page {
            return Err(format!(
                "snapshot root {} must be a PAGE, found {:?}",
                page.layer.id, page.layer.node_type
            ));
        }

        let mut doc = Document::with_page(page.layer);
        let mut seen = HashSet::from([doc.layer(doc.page).id]);
        let root = doc.page;
        for child in page.children {
            insert_recursive(&mut doc, root, child, &mut seen)?;
        }
        doc.select(&selection)?;
        Ok(doc)
    }
}

fn snapshot_node(doc: &Document, idx: NodeIndex) -> SnapshotNode {
    SnapshotNode {
        layer: doc.layer(idx).clone(),
        children: doc
            .children(idx)
            .into_iter()
            .map(|child| snapshot_node(doc, child))
            .collect(),
    }
}

fn insert_recursive(
    doc: &mut Document,
    parent: NodeIndex,
    node: SnapshotNode,
    seen: &mut HashSet<NodeId>,
) -> Result<(), String> {
    let parent_type = doc.layer(parent).node_type;
    if !parent_type.is_container() {
        return Err(format!(
            "{:?} layer {} cannot contain children",
            parent_type,
            doc.layer(parent).id
        ));
    }
    if !seen.insert(node.layer.id) {
        return Err(format!("duplicate layer id {}", node.layer.id));
    }
    if node.layer.node_type == NodeType::Page {
        return Err(format!("PAGE layer {} nested inside the tree", node.layer.id));
    }

    let idx = doc.add_layer(parent, node.layer);
    for child in node.children {
        insert_recursive(doc, idx, child, seen)?;
    }
    Ok(())
}

// ─── Encodings ────────────────────────────────────────────────────────────

/// # Errors
/// Returns the serde_json error text.
pub fn to_json(doc: &Document) -> Result<String, String> {
    serde_json::to_string_pretty(&Snapshot::from_document(doc))
        .map_err(|e| format!("JSON encode error: {e}"))
}

/// # Errors
/// Returns the serde_json error text or a structural error.
pub fn from_json(text: &str) -> Result<Document, String> {
    serde_json::from_str::<Snapshot>(text)
        .map_err(|e| format!("JSON decode error: {e}"))?
        .into_document()
}

/// # Errors
/// Returns the rmp-serde error text.
pub fn to_msgpack(doc: &Document) -> Result<Vec<u8>, String> {
    rmp_serde::to_vec_named(&Snapshot::from_document(doc))
        .map_err(|e| format!("MessagePack encode error: {e}"))
}

/// # Errors
/// Returns the rmp-serde error text or a structural error.
pub fn from_msgpack(bytes: &[u8]) -> Result<Document, String> {
    rmp_serde::from_slice::<Snapshot>(bytes)
        .map_err(|e| format!("MessagePack decode error: {e}"))?
        .into_document()
}
