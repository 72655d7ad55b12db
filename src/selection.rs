//! Node/edge selection state machine.
//!
//! Primary taps build up a selection of at most two nodes; the moment a second
//! node joins, the machine asks for an edge from the first to the second and
//! starts over. Secondary activation (right click) picks a single "active
//! target" for destructive or edit actions.

use crate::types::{EdgeId, NodeId};

/// Maximum number of nodes that can be selected at once.
pub const MAX_SELECTED: usize = 2;

/// Coarse view of how many nodes are currently selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    /// Nothing selected
    Idle,
    /// One node is waiting for a partner
    OneSelected,
    /// Two nodes selected; only observable between a tap and its edge request
    TwoSelected,
}

/// The element picked for a delete/rename action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveTarget {
    /// A node chosen via secondary activation
    Node(NodeId),
    /// An edge chosen via secondary activation
    Edge(EdgeId),
}

/// Result of tapping a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// The node joined the selection
    Selected,
    /// The node was already selected and has been removed
    Deselected,
    /// Two nodes were selected; the caller should connect them. Selection is already reset.
    EdgeRequested {
        /// First node tapped
        source: NodeId,
        /// Second node tapped
        target: NodeId,
    },
    /// The selection was full; nothing changed
    Ignored,
}

/// Selection state owned by the editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    selected: Vec<NodeId>,
    active: Option<ActiveTarget>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected nodes, in the order they were tapped.
    pub fn selected_nodes(&self) -> &[NodeId] {
        &self.selected
    }

    /// Returns true if `id` carries the selection marker.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|n| n == id)
    }

    /// Coarse selection phase.
    pub fn phase(&self) -> SelectionPhase {
        match self.selected.len() {
            0 => SelectionPhase::Idle,
            1 => SelectionPhase::OneSelected,
            _ => SelectionPhase::TwoSelected,
        }
    }

    /// The current active target, if any.
    pub fn active(&self) -> Option<&ActiveTarget> {
        self.active.as_ref()
    }

    /// The active node, if the active target is a node.
    pub fn active_node(&self) -> Option<&NodeId> {
        match &self.active {
            Some(ActiveTarget::Node(id)) => Some(id),
            _ => None,
        }
    }

    /// The active edge, if the active target is an edge.
    pub fn active_edge(&self) -> Option<&EdgeId> {
        match &self.active {
            Some(ActiveTarget::Edge(id)) => Some(id),
            _ => None,
        }
    }

    /// Handles a primary tap on a node.
    ///
    /// Remove-if-present, else add-if-room. Reaching two nodes yields
    /// [`TapOutcome::EdgeRequested`] and clears the selection.
    pub fn tap_node(&mut self, id: &str) -> TapOutcome {
        if let Some(index) = self.selected.iter().position(|n| n == id) {
            self.selected.remove(index);
            return TapOutcome::Deselected;
        }
        if self.selected.len() >= MAX_SELECTED {
            return TapOutcome::Ignored;
        }

        self.selected.push(id.to_string());
        if self.selected.len() < MAX_SELECTED {
            return TapOutcome::Selected;
        }

        let mut pair = std::mem::take(&mut self.selected).into_iter();
        match (pair.next(), pair.next()) {
            (Some(source), Some(target)) => TapOutcome::EdgeRequested { source, target },
            _ => TapOutcome::Ignored,
        }
    }

    /// Handles a tap on empty canvas: clears everything.
    pub fn tap_background(&mut self) {
        self.selected.clear();
        self.active = None;
    }

    /// Makes `id` the sole active target.
    pub fn activate_node(&mut self, id: &str) {
        self.active = Some(ActiveTarget::Node(id.to_string()));
    }

    /// Makes `id` the sole active target.
    pub fn activate_edge(&mut self, id: &str) {
        self.active = Some(ActiveTarget::Edge(id.to_string()));
    }

    /// Drops the active target without touching the node selection.
    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// Forgets a node that no longer exists.
    pub fn forget_node(&mut self, id: &str) {
        self.selected.retain(|n| n != id);
        if self.active_node().is_some_and(|n| n == id) {
            self.active = None;
        }
    }

    /// Forgets an edge that no longer exists.
    pub fn forget_edge(&mut self, id: &str) {
        if self.active_edge().is_some_and(|e| e == id) {
            self.active = None;
        }
    }
}
