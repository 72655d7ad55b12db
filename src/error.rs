//! Error types for graph mutations and document import.

use crate::types::{EdgeId, NodeId};
use thiserror::Error;

/// Errors raised by the graph store when a mutation would break its invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// No node has this id
    #[error("Node {id} does not exist")]
    UnknownNode {
        /// The missing node
        id: NodeId,
    },

    /// No edge has this id
    #[error("Edge {id} does not exist")]
    UnknownEdge {
        /// The missing edge
        id: EdgeId,
    },

    /// A node with this id is already stored
    #[error("Node id {id} is already in use")]
    DuplicateNode {
        /// The id in use
        id: NodeId,
    },

    /// An edge with this id is already stored
    #[error("Edge id {id} is already in use")]
    DuplicateEdge {
        /// The id in use
        id: EdgeId,
    },

    /// Source and target are the same node
    #[error("Edge would connect node {id} to itself")]
    SelfLoop {
        /// The node at both ends
        id: NodeId,
    },
}

/// Errors raised while importing a flowchart document.
///
/// Import validates the whole document before touching the store, so any of
/// these leaves the current graph as it was.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The text is not a well-formed document
    #[error("Invalid JSON: {source}")]
    Syntax {
        /// Parser error
        #[from]
        source: serde_json::Error,
    },

    /// Two nodes in the document share an id
    #[error("Node id {id} appears more than once")]
    DuplicateNode {
        /// The repeated id
        id: NodeId,
    },

    /// Two edges in the document share an id
    #[error("Edge id {id} appears more than once")]
    DuplicateEdge {
        /// The repeated id
        id: EdgeId,
    },

    /// An edge endpoint is not among the document's nodes
    #[error("Edge {edge} references unknown node {node}")]
    UnknownNode {
        /// Edge holding the reference
        edge: EdgeId,
        /// Node id that was not found
        node: NodeId,
    },

    /// A node position is not finite or its size is not positive
    #[error("Node {id} has an unusable position or size")]
    InvalidGeometry {
        /// The offending node
        id: NodeId,
    },

    /// The store refused an element after validation passed
    #[error("Rejected by graph store: {source}")]
    Store {
        /// Store error
        #[from]
        source: GraphError,
    },
}

/// Errors surfaced by [`crate::Editor::dispatch`].
#[derive(Error, Debug)]
pub enum EditorError {
    /// A graph mutation failed
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// An import was rejected
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The graph could not be written as JSON
    #[error("Failed to serialize flowchart: {0}")]
    Export(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_geometry_names_node() {
        let error = FormatError::InvalidGeometry { id: "n7".into() };
        assert_eq!(error.to_string(), "Node n7 has an unusable position or size");
    }

    #[test]
    fn test_unknown_node_message() {
        let error = FormatError::UnknownNode {
            edge: "e1".into(),
            node: "ghost".into(),
        };
        let msg = error.to_string();
        assert!(msg.contains("e1"));
        assert!(msg.contains("ghost"));
    }

    #[test]
    fn test_syntax_error_from_serde() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{ nope");
        let error: FormatError = parse.unwrap_err().into();
        assert!(matches!(error, FormatError::Syntax { .. }));
        assert!(error.to_string().starts_with("Invalid JSON"));
    }
}
