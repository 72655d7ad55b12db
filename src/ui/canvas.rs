//! Canvas interaction and navigation functionality.
//!
//! This module handles canvas panning, zooming, hit-testing, node dragging and
//! edge drawing, and turns pointer gestures into editor actions.

use super::state::FlowchartApp;
use crate::constants::CLICK_THRESHOLD;
use crate::editor::EditorAction;
use crate::selection::ActiveTarget;
use crate::store::GraphStore;
use crate::types::*;
use eframe::egui;

impl FlowchartApp {
    /// Converts screen coordinates to world coordinates accounting for zoom and pan.
    pub fn screen_to_world(&self, screen_pos: egui::Pos2) -> egui::Pos2 {
        (screen_pos - self.canvas.offset) / self.canvas.zoom_factor
    }

    /// Converts world coordinates to screen coordinates accounting for zoom and pan.
    pub fn world_to_screen(&self, world_pos: egui::Pos2) -> egui::Pos2 {
        world_pos * self.canvas.zoom_factor + self.canvas.offset
    }

    /// Handles middle-click or Cmd/Ctrl+left-click canvas panning functionality.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    /// * `response` - The response from the canvas widget
    pub fn handle_canvas_panning(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        // modifiers.command is Cmd on macOS and Ctrl elsewhere
        let should_pan = ui.input(|i| {
            i.pointer.middle_down() || (i.pointer.primary_down() && i.modifiers.command)
        });

        if should_pan {
            if let Some(current_pos) = response.interact_pointer_pos() {
                if !self.interaction.is_panning {
                    self.interaction.is_panning = true;
                    self.interaction.last_pan_pos = Some(current_pos);
                    self.interaction.reset_press();
                } else if let Some(last_pos) = self.interaction.last_pan_pos {
                    self.canvas.offset += current_pos - last_pos;
                    self.interaction.last_pan_pos = Some(current_pos);
                }
            }
        } else {
            self.interaction.is_panning = false;
            self.interaction.last_pan_pos = None;
        }
    }

    /// Handles scroll wheel zooming functionality.
    ///
    /// Zooms around the cursor, clamped between 0.25x and 5.0x.
    pub fn handle_canvas_zoom(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta == 0.0 {
            return;
        }

        let mouse_pos = ui
            .input(|i| i.pointer.hover_pos())
            .or_else(|| response.interact_pointer_pos());
        let Some(mouse_pos) = mouse_pos else {
            return;
        };
        if !response.rect.contains(mouse_pos) {
            return;
        }

        let world_before = self.screen_to_world(mouse_pos);
        let zoom_delta = if scroll_delta > 0.0 { 0.025 } else { -0.025 };
        let old_zoom = self.canvas.zoom_factor;
        self.canvas.zoom_factor = (self.canvas.zoom_factor + zoom_delta).clamp(0.25, 5.0);

        if (self.canvas.zoom_factor - old_zoom).abs() > f32::EPSILON {
            // Keep the world point under the cursor fixed
            let screen_after = self.world_to_screen(world_before);
            self.canvas.offset += mouse_pos - screen_after;
        }
    }

    /// Handles primary-button gestures on the canvas.
    ///
    /// A press and release within [`CLICK_THRESHOLD`] is a tap; anything longer
    /// moves the pressed node, or draws an edge when edge-draw mode is on.
    pub fn handle_primary_pointer(&mut self, ui: &mut egui::Ui, response: &egui::Response) {
        if self.interaction.is_panning {
            return;
        }

        if ui.input(|i| i.pointer.primary_down()) {
            match self.interaction.press_start {
                None => {
                    // Only presses that land on the canvas itself, not on a popup above it
                    if let Some(current_pos) = response.interact_pointer_pos() {
                        let world_pos = self.screen_to_world(current_pos);
                        self.start_press(current_pos, world_pos);
                    }
                }
                Some(start) => {
                    let Some(current_pos) = response
                        .interact_pointer_pos()
                        .or_else(|| ui.input(|i| i.pointer.interact_pos()))
                    else {
                        return;
                    };
                    let world_pos = self.screen_to_world(current_pos);
                    self.interaction.pointer_pos = Some(current_pos);
                    let moved = (self.screen_to_world(start) - world_pos).length() >= CLICK_THRESHOLD;
                    if moved {
                        if let Some(node_id) = self.interaction.dragging_node.clone() {
                            let target = world_pos + self.interaction.drag_offset;
                            self.editor.move_node(&node_id, Position::new(target.x, target.y));
                        }
                    }
                }
            }
        } else if let Some(start) = self.interaction.press_start {
            let end = self.interaction.pointer_pos.unwrap_or(start);
            self.finish_press(start, end);
            self.interaction.reset_press();
        }
    }

    fn start_press(&mut self, screen_pos: egui::Pos2, world_pos: egui::Pos2) {
        self.interaction.press_start = Some(screen_pos);
        self.interaction.pointer_pos = Some(screen_pos);

        let Some(node_id) = self.find_node_at_position(world_pos) else {
            return;
        };
        if self.editor.edge_draw_mode() {
            self.interaction.drawing_edge_from = Some(node_id.clone());
        } else if let Some(node) = self.editor.store().node(&node_id) {
            let center = egui::pos2(node.position.x, node.position.y);
            self.interaction.drag_offset = center - world_pos;
            self.interaction.dragging_node = Some(node_id.clone());
        }
        self.interaction.pressed_node = Some(node_id);
    }

    fn finish_press(&mut self, start: egui::Pos2, end: egui::Pos2) {
        let start_world = self.screen_to_world(start);
        let end_world = self.screen_to_world(end);
        let is_tap = (end_world - start_world).length() < CLICK_THRESHOLD;

        if !is_tap {
            if let Some(source) = self.interaction.drawing_edge_from.clone() {
                if let Some(target) = self.find_node_at_position(end_world) {
                    self.run_action(EditorAction::DrawEdge { source, target });
                }
            }
            return;
        }

        self.context_menu.show = false;
        match self.interaction.pressed_node.clone() {
            Some(node_id) => {
                self.run_action(EditorAction::TapNode(node_id));
            }
            // Taps on edges fall through without touching the selection
            None if self.find_edge_at_position(end_world).is_some() => {}
            None => {
                self.run_action(EditorAction::TapBackground);
            }
        }
    }

    /// Opens the context menu for the node or edge under a right click.
    pub fn handle_secondary_click(&mut self, response: &egui::Response) {
        if !response.secondary_clicked() || self.interaction.is_panning {
            return;
        }
        let Some(screen_pos) = response.interact_pointer_pos() else {
            return;
        };
        let world_pos = self.screen_to_world(screen_pos);

        let target = if let Some(node_id) = self.find_node_at_position(world_pos) {
            self.run_action(EditorAction::ContextNode(node_id.clone()));
            Some(ActiveTarget::Node(node_id))
        } else if let Some(edge_id) = self.find_edge_at_position(world_pos) {
            self.run_action(EditorAction::ContextEdge(edge_id.clone()));
            Some(ActiveTarget::Edge(edge_id))
        } else {
            None
        };

        match target {
            Some(target) => {
                self.context_menu.screen_pos = screen_pos;
                self.context_menu.target = Some(target);
                self.context_menu.show = true;
                self.context_menu.just_opened = true;
            }
            None => self.context_menu.show = false,
        }
    }

    /// Finds the topmost node at the given world position, if any.
    pub fn find_node_at_position(&self, pos: egui::Pos2) -> Option<NodeId> {
        // Nodes drawn last sit on top
        self.editor
            .store()
            .nodes()
            .iter()
            .rev()
            .find(|node| node_world_rect(node).contains(pos))
            .map(|node| node.id.clone())
    }

    /// Finds the first edge within [`CLICK_THRESHOLD`] of the given world position.
    pub fn find_edge_at_position(&self, pos: egui::Pos2) -> Option<EdgeId> {
        let store = self.editor.store();
        store
            .edges()
            .iter()
            .find(|edge| {
                match (store.node(&edge.source), store.node(&edge.target)) {
                    (Some(from), Some(to)) => {
                        let start = egui::pos2(from.position.x, from.position.y);
                        let end = egui::pos2(to.position.x, to.position.y);
                        point_to_line_distance(pos, start, end) < CLICK_THRESHOLD
                    }
                    _ => false,
                }
            })
            .map(|edge| edge.id.clone())
    }
}

/// World-space rectangle occupied by a node.
pub fn node_world_rect(node: &Node) -> egui::Rect {
    egui::Rect::from_center_size(
        egui::pos2(node.position.x, node.position.y),
        egui::vec2(node.size.width, node.size.height),
    )
}

/// Distance from a point to a line segment.
fn point_to_line_distance(point: egui::Pos2, line_start: egui::Pos2, line_end: egui::Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;
    let line_len_sq = line_vec.length_sq();

    if line_len_sq < 0.0001 {
        return point_vec.length();
    }

    // Project onto the segment, clamped to its endpoints
    let t = (point_vec.dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    let projection = line_start + line_vec * t;
    (point - projection).length()
}
