//! JSON interchange format.
//!
//! A [`Document`] is the full graph: every node with its id, label, position and
//! size, and every edge with its id and endpoints. Export walks the store; import
//! validates the whole document, then replaces the store contents and asks the
//! store to lay itself out.

use crate::error::FormatError;
use crate::store::GraphStore;
use crate::types::{Edge, Node};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Coordinates must be finite and sizes positive so the node survives an export.
fn has_valid_geometry(node: &Node) -> bool {
    let Node { position, size, .. } = node;
    position.x.is_finite()
        && position.y.is_finite()
        && size.width.is_finite()
        && size.height.is_finite()
        && size.width > 0.0
        && size.height > 0.0
}

/// Serialized form of a whole flowchart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Nodes in store order
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Edges in store order
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// Counts reported after a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Number of nodes added
    pub nodes: usize,
    /// Number of edges added
    pub edges: usize,
}

impl Document {
    /// Serialize the document to a pretty-printed JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a document from a JSON string. Does not validate references.
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks node geometry, id uniqueness and that every edge endpoint names a
    /// node in this document.
    pub fn validate(&self) -> Result<(), FormatError> {
        let mut node_ids = HashSet::new();
        for node in &self.nodes {
            if !node_ids.insert(node.id.as_str()) {
                return Err(FormatError::DuplicateNode {
                    id: node.id.clone(),
                });
            }
            if !has_valid_geometry(node) {
                return Err(FormatError::InvalidGeometry {
                    id: node.id.clone(),
                });
            }
        }

        let mut edge_ids = HashSet::new();
        for edge in &self.edges {
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(FormatError::DuplicateEdge {
                    id: edge.id.clone(),
                });
            }
            for end in [&edge.source, &edge.target] {
                if !node_ids.contains(end.as_str()) {
                    return Err(FormatError::UnknownNode {
                        edge: edge.id.clone(),
                        node: end.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Snapshots every node and edge in the store.
pub fn export<S: GraphStore + ?Sized>(store: &S) -> Document {
    Document {
        nodes: store.nodes().to_vec(),
        edges: store.edges().to_vec(),
    }
}

/// Parses `json` and replaces the store contents with it.
///
/// Nothing in the store changes unless the document parses and validates.
pub fn import<S: GraphStore + ?Sized>(store: &mut S, json: &str) -> Result<ImportSummary, FormatError> {
    let document = Document::from_json(json)?;
    import_document(store, document)
}

/// Replaces the store contents with `document` and runs the store's layout.
pub fn import_document<S: GraphStore + ?Sized>(
    store: &mut S,
    document: Document,
) -> Result<ImportSummary, FormatError> {
    document.validate()?;

    let summary = ImportSummary {
        nodes: document.nodes.len(),
        edges: document.edges.len(),
    };

    store.clear();
    // Edges check their endpoints, so nodes go in first
    for node in document.nodes {
        store.add_node(node)?;
    }
    for edge in document.edges {
        store.add_edge(edge)?;
    }
    store.run_layout();

    log::info!(
        "imported flowchart with {} nodes and {} edges",
        summary.nodes,
        summary.edges
    );
    Ok(summary)
}
