//! Editor actions on top of a graph store.
//!
//! [`Editor`] owns the store, the [`Selection`] and the edge-draw flag. The UI
//! talks to it through [`Editor::dispatch`], one [`EditorAction`] per control.

use crate::codec::{self, ImportSummary};
use crate::constants::{DEFAULT_NODE_LABEL, NODE_MAX_SIZE, NODE_MIN_SIZE, SPAWN_EXTENT};
use crate::error::{EditorError, FormatError, GraphError};
use crate::selection::{Selection, TapOutcome};
use crate::store::GraphStore;
use crate::types::*;
use rand::Rng;

/// Everything the UI can ask the editor to do.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Create a node; `None` or an empty label uses the placeholder
    AddNode {
        /// Label entered by the user
        label: Option<String>,
    },
    /// Primary tap on a node
    TapNode(NodeId),
    /// Primary tap on empty canvas
    TapBackground,
    /// Secondary activation on a node
    ContextNode(NodeId),
    /// Secondary activation on an edge
    ContextEdge(EdgeId),
    /// Delete the active node
    DeleteNode,
    /// Delete the active edge
    DeleteEdge,
    /// Rename the active node
    RenameSave {
        /// New label
        label: String,
    },
    /// Resize the active node
    ResizeNode {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },
    /// Drag-to-connect finished over `target`
    DrawEdge {
        /// Node the drag started on
        source: NodeId,
        /// Node the drag ended on
        target: NodeId,
    },
    /// Enable drag-to-connect
    DrawModeOn,
    /// Disable drag-to-connect
    DrawModeOff,
    /// Replace the graph with a JSON document
    Import {
        /// Raw document text
        json: String,
    },
    /// Serialize the graph
    Export,
}

/// What a dispatched action did.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// A node was added
    NodeCreated(NodeId),
    /// An edge was added
    EdgeCreated(EdgeId),
    /// A node or edge was removed
    Removed,
    /// State changed without adding or removing elements
    Updated,
    /// The action did not apply and was skipped
    Skipped,
    /// The graph was replaced by an imported document
    Imported(ImportSummary),
    /// The graph serialized to this JSON text
    Exported(String),
}

/// Flowchart editing session.
#[derive(Debug, Clone, Default)]
pub struct Editor<S: GraphStore = Graph> {
    store: S,
    selection: Selection,
    edge_draw_mode: bool,
}

impl<S: GraphStore> Editor<S> {
    /// Creates an editor over `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            selection: Selection::new(),
            edge_draw_mode: false,
        }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store, for settings such as the layout mode.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Current selection state.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Whether drag-to-connect is enabled.
    pub fn edge_draw_mode(&self) -> bool {
        self.edge_draw_mode
    }

    /// Routes a UI action to its handler.
    pub fn dispatch(&mut self, action: EditorAction) -> Result<ActionOutcome, EditorError> {
        log::debug!("dispatch {:?}", action);
        let outcome = match action {
            EditorAction::AddNode { label } => {
                ActionOutcome::NodeCreated(self.create_node(label.as_deref())?)
            }
            EditorAction::TapNode(id) => match self.tap_node(&id)? {
                Some(edge) => ActionOutcome::EdgeCreated(edge),
                None => ActionOutcome::Updated,
            },
            EditorAction::TapBackground => {
                self.tap_background();
                ActionOutcome::Updated
            }
            EditorAction::ContextNode(id) => updated_or_skipped(self.activate_node(&id)),
            EditorAction::ContextEdge(id) => updated_or_skipped(self.activate_edge(&id)),
            EditorAction::DeleteNode => removed_or_skipped(self.delete_active_node()),
            EditorAction::DeleteEdge => removed_or_skipped(self.delete_active_edge()),
            EditorAction::RenameSave { label } => {
                updated_or_skipped(self.rename_active_node(&label))
            }
            EditorAction::ResizeNode { width, height } => {
                updated_or_skipped(self.resize_active_node(Size::new(width, height)))
            }
            EditorAction::DrawEdge { source, target } => match self.draw_edge(&source, &target)? {
                Some(edge) => ActionOutcome::EdgeCreated(edge),
                None => ActionOutcome::Skipped,
            },
            EditorAction::DrawModeOn => {
                self.set_edge_draw_mode(true);
                ActionOutcome::Updated
            }
            EditorAction::DrawModeOff => {
                self.set_edge_draw_mode(false);
                ActionOutcome::Updated
            }
            EditorAction::Import { json } => ActionOutcome::Imported(self.import_json(&json)?),
            EditorAction::Export => {
                ActionOutcome::Exported(self.export_json().map_err(EditorError::Export)?)
            }
        };
        Ok(outcome)
    }

    /// Adds a node at a random spot in the spawn region.
    pub fn create_node(&mut self, label: Option<&str>) -> Result<NodeId, GraphError> {
        let label = match label.map(str::trim) {
            Some(text) if !text.is_empty() => text,
            _ => DEFAULT_NODE_LABEL,
        };
        let mut rng = rand::thread_rng();
        let position = Position::new(
            rng.gen_range(0.0..SPAWN_EXTENT),
            rng.gen_range(0.0..SPAWN_EXTENT),
        );

        let id = self.store.add_node(Node::new(label, position))?;
        log::info!("created node {} ({})", id, label);
        Ok(id)
    }

    /// Feeds a primary tap into the selection machine.
    ///
    /// Returns the id of the edge created when the tap completed a pair. Taps on
    /// unknown nodes are ignored.
    pub fn tap_node(&mut self, id: &str) -> Result<Option<EdgeId>, GraphError> {
        if self.store.node(id).is_none() {
            return Ok(None);
        }
        match self.selection.tap_node(id) {
            TapOutcome::EdgeRequested { source, target } => {
                self.connect(&source, &target).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Clears node selection and the active target.
    pub fn tap_background(&mut self) {
        self.selection.tap_background();
    }

    /// Marks a node as the active target. Returns false for unknown nodes.
    pub fn activate_node(&mut self, id: &str) -> bool {
        if self.store.node(id).is_none() {
            return false;
        }
        self.selection.activate_node(id);
        true
    }

    /// Marks an edge as the active target. Returns false for unknown edges.
    pub fn activate_edge(&mut self, id: &str) -> bool {
        if self.store.edge(id).is_none() {
            return false;
        }
        self.selection.activate_edge(id);
        true
    }

    /// Adds an edge between two existing, distinct nodes.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<EdgeId, GraphError> {
        if source == target {
            return Err(GraphError::SelfLoop {
                id: source.to_string(),
            });
        }
        let id = self.store.add_edge(Edge::new(source, target))?;
        log::info!("connected {} -> {} as {}", source, target, id);
        Ok(id)
    }

    /// Drag-to-connect: like [`Editor::connect`] but skips self drops and existing edges.
    pub fn draw_edge(&mut self, source: &str, target: &str) -> Result<Option<EdgeId>, GraphError> {
        if source == target || self.store.has_edge_between(source, target) {
            return Ok(None);
        }
        self.connect(source, target).map(Some)
    }

    /// Removes the active node and its edges. No-op without an active node.
    pub fn delete_active_node(&mut self) -> bool {
        let Some(id) = self.selection.active_node().cloned() else {
            return false;
        };
        let removed = self.store.remove_node(&id).is_some();
        self.selection.forget_node(&id);
        if removed {
            log::info!("deleted node {}", id);
        }
        removed
    }

    /// Removes the active edge. No-op without an active edge.
    pub fn delete_active_edge(&mut self) -> bool {
        let Some(id) = self.selection.active_edge().cloned() else {
            return false;
        };
        let removed = self.store.remove_edge(&id).is_some();
        self.selection.forget_edge(&id);
        if removed {
            log::info!("deleted edge {}", id);
        }
        removed
    }

    /// Relabels the active node. No-op without an active node.
    pub fn rename_active_node(&mut self, label: &str) -> bool {
        match self.selection.active_node() {
            Some(id) => self.store.set_label(id, label),
            None => false,
        }
    }

    /// Resizes the active node, clamping each side to the allowed range.
    pub fn resize_active_node(&mut self, size: Size) -> bool {
        let clamped = Size::new(
            size.width.clamp(NODE_MIN_SIZE, NODE_MAX_SIZE),
            size.height.clamp(NODE_MIN_SIZE, NODE_MAX_SIZE),
        );
        match self.selection.active_node() {
            Some(id) => self.store.set_size(id, clamped),
            None => false,
        }
    }

    /// Moves a node, e.g. at the end of a canvas drag.
    pub fn move_node(&mut self, id: &str, position: Position) -> bool {
        self.store.set_position(id, position)
    }

    /// Turns drag-to-connect on or off.
    pub fn set_edge_draw_mode(&mut self, on: bool) {
        self.edge_draw_mode = on;
    }

    /// Serializes the whole graph as a pretty-printed document.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        codec::export(&self.store).to_json()
    }

    /// Replaces the graph with the document in `json`.
    ///
    /// On failure the graph and selection are left exactly as they were.
    pub fn import_json(&mut self, json: &str) -> Result<ImportSummary, FormatError> {
        let summary = codec::import(&mut self.store, json)?;
        self.selection = Selection::new();
        Ok(summary)
    }
}

fn updated_or_skipped(applied: bool) -> ActionOutcome {
    if applied {
        ActionOutcome::Updated
    } else {
        ActionOutcome::Skipped
    }
}

fn removed_or_skipped(applied: bool) -> ActionOutcome {
    if applied {
        ActionOutcome::Removed
    } else {
        ActionOutcome::Skipped
    }
}
