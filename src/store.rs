//! The graph store seam.
//!
//! The editor never touches node or edge storage directly; it goes through
//! [`GraphStore`], which owns elements, their geometry and the layout hook.
//! [`Graph`] is the in-memory implementation used by the application.

use crate::error::GraphError;
use crate::layout;
use crate::types::*;

/// Storage and geometry for nodes and edges.
pub trait GraphStore {
    /// All nodes in insertion order.
    fn nodes(&self) -> &[Node];

    /// All edges in insertion order.
    fn edges(&self) -> &[Edge];

    /// Adds a node. Fails if the id is already in use.
    fn add_node(&mut self, node: Node) -> Result<NodeId, GraphError>;

    /// Adds an edge. Fails if the id is taken or either endpoint is missing.
    fn add_edge(&mut self, edge: Edge) -> Result<EdgeId, GraphError>;

    /// Removes a node along with every edge attached to it.
    fn remove_node(&mut self, id: &str) -> Option<Node>;

    /// Removes a single edge.
    fn remove_edge(&mut self, id: &str) -> Option<Edge>;

    /// Replaces a node's label. Returns false if the node does not exist.
    fn set_label(&mut self, id: &str, label: &str) -> bool;

    /// Replaces a node's rendered size. Returns false if the node does not exist.
    fn set_size(&mut self, id: &str, size: Size) -> bool;

    /// Moves a node. Returns false if the node does not exist.
    fn set_position(&mut self, id: &str, position: Position) -> bool;

    /// Removes every node and edge.
    fn clear(&mut self);

    /// Recomputes node positions.
    fn run_layout(&mut self);

    /// Looks up a node by id.
    fn node(&self, id: &str) -> Option<&Node> {
        self.nodes().iter().find(|n| n.id == id)
    }

    /// Looks up an edge by id.
    fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges().iter().find(|e| e.id == id)
    }

    /// Returns true if an edge already runs from `source` to `target`.
    fn has_edge_between(&self, source: &str, target: &str) -> bool {
        self.edges()
            .iter()
            .any(|e| e.source == source && e.target == target)
    }
}

impl GraphStore for Graph {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn add_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        self.insert_node(node)
    }

    fn add_edge(&mut self, edge: Edge) -> Result<EdgeId, GraphError> {
        self.insert_edge(edge)
    }

    fn remove_node(&mut self, id: &str) -> Option<Node> {
        self.take_node(id)
    }

    fn remove_edge(&mut self, id: &str) -> Option<Edge> {
        self.take_edge(id)
    }

    fn set_label(&mut self, id: &str, label: &str) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.label = label.to_string();
                true
            }
            None => false,
        }
    }

    fn set_size(&mut self, id: &str, size: Size) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.size = size;
                true
            }
            None => false,
        }
    }

    fn set_position(&mut self, id: &str, position: Position) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    fn run_layout(&mut self) {
        match self.layout_mode {
            LayoutMode::Preset => {}
            LayoutMode::ForceDirected => layout::force_directed(&mut self.nodes, &self.edges),
        }
    }
}
