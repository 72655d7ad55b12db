//! Core data types for the flowchart editor.
//!
//! This module defines nodes, edges and the in-memory [`Graph`] that stores them.
//! The serde representation of [`Node`] and [`Edge`] is exactly the shape used by
//! the JSON interchange document.

use crate::constants::{NODE_HEIGHT, NODE_WIDTH};
use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for nodes.
pub type NodeId = String;

/// Unique identifier for edges.
pub type EdgeId = String;

/// Generates a fresh element id.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Position of a node's center in world space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Position {
    /// Creates a position from its coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Rendered dimensions of a node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Size {
    /// Width in world units
    pub width: f32,
    /// Height in world units
    pub height: f32,
}

impl Size {
    /// Creates a size from width and height.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: NODE_WIDTH,
            height: NODE_HEIGHT,
        }
    }
}

/// A labelled box on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Unique identifier, fixed at creation
    pub id: NodeId,
    /// Text displayed inside the node
    #[serde(default)]
    pub label: String,
    /// Center of the node in world space
    pub position: Position,
    /// Rendered dimensions; older documents omit it
    #[serde(default)]
    pub size: Size,
}

impl Node {
    /// Creates a node with a generated id and the default size.
    pub fn new(label: impl Into<String>, position: Position) -> Self {
        Self::with_id(generate_id(), label, position)
    }

    /// Creates a node with an explicit id and the default size.
    pub fn with_id(id: impl Into<NodeId>, label: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            position,
            size: Size::default(),
        }
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    /// Unique identifier, fixed at creation
    pub id: EdgeId,
    /// ID of the source node
    pub source: NodeId,
    /// ID of the target node
    pub target: NodeId,
}

impl Edge {
    /// Creates an edge with a generated id.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self::with_id(generate_id(), source, target)
    }

    /// Creates an edge with an explicit id.
    pub fn with_id(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Returns true if this edge starts or ends at `node_id`.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// How the graph arranges itself when a layout pass is requested.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Keep every node where it is
    #[default]
    Preset,
    /// Physics-based force-directed layout
    ForceDirected,
}

/// In-memory graph of nodes and edges, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    /// Layout applied by [`crate::GraphStore::run_layout`]
    pub layout_mode: LayoutMode,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph that lays itself out with `mode`.
    pub fn with_layout(mode: LayoutMode) -> Self {
        Self {
            layout_mode: mode,
            ..Self::default()
        }
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub(crate) fn insert_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        if self.nodes.iter().any(|n| n.id == node.id) {
            return Err(GraphError::DuplicateNode { id: node.id });
        }
        let id = node.id.clone();
        self.nodes.push(node);
        Ok(id)
    }

    pub(crate) fn insert_edge(&mut self, edge: Edge) -> Result<EdgeId, GraphError> {
        if self.edges.iter().any(|e| e.id == edge.id) {
            return Err(GraphError::DuplicateEdge { id: edge.id });
        }
        for end in [&edge.source, &edge.target] {
            if !self.nodes.iter().any(|n| &n.id == end) {
                return Err(GraphError::UnknownNode { id: end.clone() });
            }
        }
        let id = edge.id.clone();
        self.edges.push(edge);
        Ok(id)
    }

    /// Removes a node and every edge attached to it.
    pub(crate) fn take_node(&mut self, id: &str) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        let node = self.nodes.remove(index);
        self.edges.retain(|e| !e.touches(id));
        Some(node)
    }

    pub(crate) fn take_edge(&mut self, id: &str) -> Option<Edge> {
        let index = self.edges.iter().position(|e| e.id == id)?;
        Some(self.edges.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_graph() -> (Graph, NodeId, NodeId) {
        let mut graph = Graph::new();
        let a = graph
            .insert_node(Node::new("A", Position::new(0.0, 0.0)))
            .unwrap();
        let b = graph
            .insert_node(Node::new("B", Position::new(100.0, 0.0)))
            .unwrap();
        (graph, a, b)
    }

    #[test]
    fn test_node_creation() {
        let node = Node::new("Start", Position::new(10.0, 20.0));

        assert_eq!(node.label, "Start");
        assert_eq!(node.position, Position::new(10.0, 20.0));
        assert_eq!(node.size, Size::new(NODE_WIDTH, NODE_HEIGHT));
        assert!(Uuid::parse_str(&node.id).is_ok());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Node::new("A", Position::default());
        let b = Node::new("A", Position::default());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_edge_touches() {
        let edge = Edge::with_id("e", "a", "b");
        assert!(edge.touches("a"));
        assert!(edge.touches("b"));
        assert!(!edge.touches("c"));
    }

    #[test]
    fn test_insert_edge_success() {
        let (mut graph, a, b) = two_node_graph();

        let id = graph.insert_edge(Edge::new(a.clone(), b.clone())).unwrap();

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].id, id);
        assert_eq!(graph.edges[0].source, a);
        assert_eq!(graph.edges[0].target, b);
    }

    #[test]
    fn test_insert_edge_unknown_endpoint() {
        let (mut graph, a, _) = two_node_graph();

        let result = graph.insert_edge(Edge::new(a, "ghost"));

        assert_eq!(
            result,
            Err(GraphError::UnknownNode {
                id: "ghost".to_string()
            })
        );
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_insert_duplicate_node_id() {
        let (mut graph, a, _) = two_node_graph();

        let result = graph.insert_node(Node::with_id(a.clone(), "again", Position::default()));

        assert_eq!(result, Err(GraphError::DuplicateNode { id: a }));
        assert_eq!(graph.nodes.len(), 2);
    }

    #[test]
    fn test_take_node_removes_incident_edges() {
        let (mut graph, a, b) = two_node_graph();
        let c = graph
            .insert_node(Node::new("C", Position::new(200.0, 0.0)))
            .unwrap();
        graph.insert_edge(Edge::new(a.clone(), b.clone())).unwrap();
        graph.insert_edge(Edge::new(b.clone(), c.clone())).unwrap();
        graph.insert_edge(Edge::new(a.clone(), c.clone())).unwrap();

        let removed = graph.take_node(&b);

        assert_eq!(removed.map(|n| n.label), Some("B".to_string()));
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, a);
        assert_eq!(graph.edges[0].target, c);
    }

    #[test]
    fn test_take_missing_node() {
        let (mut graph, _, _) = two_node_graph();
        assert!(graph.take_node("ghost").is_none());
        assert_eq!(graph.nodes.len(), 2);
    }

    #[test]
    fn test_node_without_size_deserializes_with_default() {
        let json = r#"{"id": "n1", "label": "Old", "position": {"x": 1.0, "y": 2.0}}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.size, Size::default());
        assert_eq!(node.position, Position::new(1.0, 2.0));
    }
}
