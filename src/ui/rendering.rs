//! Canvas rendering functionality for nodes, edges, and grid.
//!
//! Elements are drawn in layers: grid first, then edges, then nodes, so nodes
//! always sit on top of the lines that connect them.

use super::canvas::node_world_rect;
use super::state::FlowchartApp;
use crate::constants::GRID_SIZE;
use crate::store::GraphStore;
use crate::types::*;
use eframe::egui;
use eframe::epaint::StrokeKind;

const NODE_FILL: egui::Color32 = egui::Color32::from_rgb(173, 216, 230);
const NODE_BORDER: egui::Color32 = egui::Color32::from_rgb(0, 0, 255);
const EDGE_COLOR: egui::Color32 = egui::Color32::from_rgb(160, 160, 160);
const HIGHLIGHT: egui::Color32 = egui::Color32::from_rgb(255, 165, 0);

impl FlowchartApp {
    /// Renders grid, edges, the edge being drawn, and nodes.
    pub fn render_flowchart_elements(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        if self.settings.show_grid {
            self.draw_grid(painter, canvas_rect);
        }

        let store = self.editor.store();
        let active_edge = self.editor.selection().active_edge();
        for edge in store.edges() {
            self.draw_edge(painter, edge, active_edge == Some(&edge.id));
        }

        if let (Some(from), Some(pointer)) = (
            &self.interaction.drawing_edge_from,
            self.interaction.pointer_pos,
        ) {
            self.draw_edge_preview(painter, from, pointer);
        }

        for node in store.nodes() {
            self.draw_node(painter, node);
        }
    }

    /// Draws a zoom-aware grid on the canvas for visual reference.
    pub fn draw_grid(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let stroke = egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(128, 128, 128, 32));

        // Grid too small to see clearly, skip drawing
        let screen_grid_size = GRID_SIZE * self.canvas.zoom_factor;
        if screen_grid_size < 2.0 {
            return;
        }

        let top_left = self.screen_to_world(canvas_rect.min);
        let bottom_right = self.screen_to_world(canvas_rect.max);

        let mut x = (top_left.x / GRID_SIZE).floor() * GRID_SIZE;
        while x <= bottom_right.x {
            let screen_x = self.world_to_screen(egui::pos2(x, 0.0)).x;
            painter.line_segment(
                [
                    egui::pos2(screen_x, canvas_rect.min.y),
                    egui::pos2(screen_x, canvas_rect.max.y),
                ],
                stroke,
            );
            x += GRID_SIZE;
        }

        let mut y = (top_left.y / GRID_SIZE).floor() * GRID_SIZE;
        while y <= bottom_right.y {
            let screen_y = self.world_to_screen(egui::pos2(0.0, y)).y;
            painter.line_segment(
                [
                    egui::pos2(canvas_rect.min.x, screen_y),
                    egui::pos2(canvas_rect.max.x, screen_y),
                ],
                stroke,
            );
            y += GRID_SIZE;
        }
    }

    /// Draws an edge as a line with an arrowhead where it meets the target node.
    pub fn draw_edge(&self, painter: &egui::Painter, edge: &Edge, is_active: bool) {
        let store = self.editor.store();
        let (Some(source), Some(target)) = (store.node(&edge.source), store.node(&edge.target))
        else {
            return;
        };

        let start = self.world_to_screen(egui::pos2(source.position.x, source.position.y));
        let target_rect = node_world_rect(target);
        let target_center = self.world_to_screen(target_rect.center());
        let end = self.world_to_screen(border_point(
            target_rect,
            egui::pos2(source.position.x, source.position.y),
        ));

        let (color, width) = if is_active {
            (HIGHLIGHT, 4.0)
        } else {
            (EDGE_COLOR, 3.0)
        };
        let width = width * self.canvas.zoom_factor;

        painter.line_segment([start, end], egui::Stroke::new(width, color));
        if start != target_center {
            self.draw_arrow_head(painter, start, end, color);
        }
    }

    /// Draws a filled triangle at `tip`, pointing away from `from`.
    fn draw_arrow_head(
        &self,
        painter: &egui::Painter,
        from: egui::Pos2,
        tip: egui::Pos2,
        color: egui::Color32,
    ) {
        let direction = (tip - from).normalized();
        let perpendicular = egui::vec2(-direction.y, direction.x);
        let length = 12.0 * self.canvas.zoom_factor;
        let half_width = 6.0 * self.canvas.zoom_factor;

        let base = tip - direction * length;
        painter.add(egui::Shape::convex_polygon(
            vec![
                tip,
                base + perpendicular * half_width,
                base - perpendicular * half_width,
            ],
            color,
            egui::Stroke::NONE,
        ));
    }

    /// Draws the rubber-band line while an edge is dragged out in edge-draw mode.
    pub fn draw_edge_preview(&self, painter: &egui::Painter, from: &str, pointer: egui::Pos2) {
        let Some(node) = self.editor.store().node(from) else {
            return;
        };
        let from_screen = self.world_to_screen(egui::pos2(node.position.x, node.position.y));

        let target = self.find_node_at_position(self.screen_to_world(pointer));
        let color = match target {
            Some(id) if id == from => egui::Color32::from_rgb(255, 80, 80),
            _ => egui::Color32::from_rgb(100, 150, 255),
        };

        painter.line_segment([from_screen, pointer], egui::Stroke::new(2.0, color));
        painter.circle_filled(pointer, 4.0, color);
    }

    /// Renders a single node: rectangle, border and centered label.
    ///
    /// Nodes picked by taps get a yellow border; the active node gets an orange one.
    pub fn draw_node(&self, painter: &egui::Painter, node: &Node) {
        let rect = node_world_rect(node);
        let screen_rect = egui::Rect::from_min_max(
            self.world_to_screen(rect.min),
            self.world_to_screen(rect.max),
        );

        let mut fill = NODE_FILL;
        if self.interaction.dragging_node.as_ref() == Some(&node.id) {
            fill = fill.gamma_multiply(0.8);
        }
        painter.rect_filled(screen_rect, 0.0, fill);

        let selection = self.editor.selection();
        let (stroke_color, stroke_width) = if selection.active_node() == Some(&node.id) {
            (HIGHLIGHT, 3.0)
        } else if selection.is_selected(&node.id) {
            (egui::Color32::YELLOW, 3.0)
        } else {
            (NODE_BORDER, 1.0)
        };
        painter.rect_stroke(
            screen_rect,
            0.0,
            egui::Stroke::new(stroke_width, stroke_color),
            StrokeKind::Outside,
        );

        let font_size = (14.0 * self.canvas.zoom_factor).clamp(6.0, 48.0);
        let galley = painter.layout(
            node.label.clone(),
            egui::FontId::proportional(font_size),
            egui::Color32::BLACK,
            (screen_rect.width() - 10.0 * self.canvas.zoom_factor).max(1.0),
        );
        let text_pos = screen_rect.center() - galley.size() / 2.0;
        painter.galley(text_pos, galley, egui::Color32::BLACK);
    }
}

/// Point where the segment from `from` to the center of `rect` crosses the rect's border.
fn border_point(rect: egui::Rect, from: egui::Pos2) -> egui::Pos2 {
    let center = rect.center();
    let delta = from - center;
    if delta.x == 0.0 && delta.y == 0.0 {
        return center;
    }
    let half = rect.size() / 2.0;
    let scale_x = if delta.x != 0.0 { half.x / delta.x.abs() } else { f32::INFINITY };
    let scale_y = if delta.y != 0.0 { half.y / delta.y.abs() } else { f32::INFINITY };
    let scale = scale_x.min(scale_y).min(1.0);
    center + delta * scale
}
