//! User interface components for the flowchart editor.
//!
//! This module contains the eframe application: toolbar, canvas, context menu,
//! properties panel and modal dialogs. Every control ends up as an
//! [`EditorAction`] passed to [`crate::Editor::dispatch`].
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main FlowchartApp
//! - `canvas` - Canvas navigation, hit-testing and pointer gestures
//! - `rendering` - Drawing nodes, edges and the grid
//! - `file_ops` - JSON export/import through files or the browser

mod canvas;
mod file_ops;
mod rendering;
mod state;

pub use state::{EditorSettings, FlowchartApp};

use self::file_ops::describe_error;
use self::state::{Notice, Prompt, SETTINGS_KEY};
use crate::constants::{DEFAULT_NODE_LABEL, NODE_MAX_SIZE, NODE_MIN_SIZE};
use crate::editor::{ActionOutcome, EditorAction};
use crate::selection::ActiveTarget;
use crate::store::GraphStore;
use crate::types::*;
use eframe::egui;

impl eframe::App for FlowchartApp {
    /// Persist user settings between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.settings.to_json() {
            Ok(json) => storage.set_string(SETTINGS_KEY, json),
            Err(err) => log::error!("Failed to serialize settings: {err}"),
        }
    }

    /// Main update function called by egui for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.settings.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_file_results();
        self.handle_delete_key(ctx);

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        if self.editor.selection().active_node().is_some() {
            egui::SidePanel::right("properties_panel")
                .resizable(true)
                .default_width(220.0)
                .show(ctx, |ui| {
                    self.draw_properties_panel(ui);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });

        self.draw_prompt(ctx);
        self.draw_notice(ctx);
    }
}

impl FlowchartApp {
    /// Dispatches an action, surfacing failures as a notice.
    pub(crate) fn run_action(&mut self, action: EditorAction) -> Option<ActionOutcome> {
        match self.editor.dispatch(action) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                log::warn!("Action failed: {}", err);
                self.modal.notice = Some(Notice::new("Error", describe_error(&err)));
                None
            }
        }
    }

    /// Deletes the active node or edge when Delete/Backspace is pressed.
    fn handle_delete_key(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() || self.modal.is_open() {
            return;
        }
        let pressed =
            ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace));
        if !pressed {
            return;
        }
        let action = match self.editor.selection().active() {
            Some(ActiveTarget::Node(_)) => EditorAction::DeleteNode,
            Some(ActiveTarget::Edge(_)) => EditorAction::DeleteEdge,
            None => return,
        };
        self.run_action(action);
        self.context_menu.show = false;
    }

    /// Renders the top toolbar.
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Add Node").clicked() {
                self.modal.open(Prompt::NodeLabel, DEFAULT_NODE_LABEL);
            }

            let selection = self.editor.selection();
            let has_active_node = selection.active_node().is_some();
            let has_active_edge = selection.active_edge().is_some();
            if ui
                .add_enabled(has_active_node, egui::Button::new("Delete Node"))
                .clicked()
            {
                self.run_action(EditorAction::DeleteNode);
                self.context_menu.show = false;
            }
            if ui
                .add_enabled(has_active_edge, egui::Button::new("Delete Edge"))
                .clicked()
            {
                self.run_action(EditorAction::DeleteEdge);
                self.context_menu.show = false;
            }

            ui.separator();

            let draw_mode = self.editor.edge_draw_mode();
            if ui.selectable_label(draw_mode, "Draw Edges").clicked() {
                let action = if draw_mode {
                    EditorAction::DrawModeOff
                } else {
                    EditorAction::DrawModeOn
                };
                self.run_action(action);
            }

            ui.separator();

            if ui.button("Import JSON").clicked() {
                self.modal.open(Prompt::ImportJson, "");
            }
            if ui.button("Open File").clicked() {
                self.open_flowchart_file(ui.ctx());
            }
            if ui.button("Export JSON").clicked() {
                self.export_flowchart(ui.ctx());
            }

            ui.separator();

            ui.label("Import layout:");
            let before = self.settings.layout_mode;
            egui::ComboBox::from_id_salt("layout_mode_combo")
                .selected_text(layout_mode_name(self.settings.layout_mode))
                .show_ui(ui, |ui| {
                    for mode in [LayoutMode::Preset, LayoutMode::ForceDirected] {
                        ui.selectable_value(&mut self.settings.layout_mode, mode, layout_mode_name(mode));
                    }
                });
            if self.settings.layout_mode != before {
                self.apply_layout_setting();
            }

            ui.separator();
            ui.checkbox(&mut self.settings.show_grid, "Show Grid");
            ui.checkbox(&mut self.settings.dark_mode, "Dark Mode");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let store = self.editor.store();
                ui.label(format!(
                    "{} nodes, {} edges",
                    store.nodes().len(),
                    store.edges().len()
                ));
                ui.label(format!("Zoom: {:.0}%", self.canvas.zoom_factor * 100.0));
            });
        });
    }

    /// Shows the active node's label and size.
    fn draw_properties_panel(&mut self, ui: &mut egui::Ui) {
        let Some(node) = self
            .editor
            .selection()
            .active_node()
            .and_then(|id| self.editor.store().node(id))
            .cloned()
        else {
            return;
        };

        ui.heading("Node");
        ui.separator();
        ui.label(format!("Label: {}", node.label));
        if ui.button("Rename…").clicked() {
            self.modal.open(Prompt::RenameNode, node.label.clone());
        }
        ui.label(format!("Position: ({:.0}, {:.0})", node.position.x, node.position.y));

        ui.separator();
        let mut width = node.size.width;
        let mut height = node.size.height;
        let range = NODE_MIN_SIZE..=NODE_MAX_SIZE;
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.label("Width");
            changed |= ui
                .add(egui::DragValue::new(&mut width).range(range.clone()))
                .changed();
        });
        ui.horizontal(|ui| {
            ui.label("Height");
            changed |= ui
                .add(egui::DragValue::new(&mut height).range(range))
                .changed();
        });
        if changed {
            self.run_action(EditorAction::ResizeNode { width, height });
        }

        ui.separator();
        ui.small(format!("id: {}", node.id));
    }

    /// Renders the canvas and handles pointer input on it.
    fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        // Leave a margin around the region new nodes spawn in
        if !self.canvas.initialized {
            self.canvas.offset = response.rect.min.to_vec2() + egui::vec2(60.0, 60.0);
            self.canvas.initialized = true;
        }

        if !self.modal.is_open() {
            self.handle_canvas_panning(ui, &response);
            self.handle_canvas_zoom(ui, &response);
            self.handle_primary_pointer(ui, &response);
            self.handle_secondary_click(&response);
        }

        self.render_flowchart_elements(&painter, response.rect);

        if self.context_menu.show {
            self.draw_context_menu(ui);
        }
    }

    /// Renders the right-click menu for the active node or edge.
    fn draw_context_menu(&mut self, ui: &mut egui::Ui) {
        let Some(target) = self.context_menu.target.clone() else {
            self.context_menu.show = false;
            return;
        };

        let mut chosen: Option<EditorAction> = None;
        let mut rename = false;
        let area_response = egui::Area::new(egui::Id::new("context_menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(self.context_menu.screen_pos)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.vertical(|ui| match &target {
                        ActiveTarget::Node(_) => {
                            if ui.button("Rename Node").clicked() {
                                rename = true;
                            }
                            if ui.button("Delete Node").clicked() {
                                chosen = Some(EditorAction::DeleteNode);
                            }
                        }
                        ActiveTarget::Edge(_) => {
                            if ui.button("Delete Edge").clicked() {
                                chosen = Some(EditorAction::DeleteEdge);
                            }
                        }
                    });
                })
            });

        if rename {
            self.context_menu.show = false;
            if let ActiveTarget::Node(id) = &target {
                let label = self
                    .editor
                    .store()
                    .node(id)
                    .map(|n| n.label.clone())
                    .unwrap_or_default();
                self.modal.open(Prompt::RenameNode, label);
            }
        }
        if let Some(action) = chosen {
            self.context_menu.show = false;
            self.run_action(action);
        }

        // Click-outside-to-close after the first frame
        if !self.context_menu.just_opened && ui.input(|i| i.pointer.any_click()) {
            if let Some(click_pos) = ui.input(|i| i.pointer.interact_pos()) {
                if !area_response.response.rect.contains(click_pos) {
                    self.context_menu.show = false;
                }
            }
        }
        self.context_menu.just_opened = false;
    }

    /// Renders the pending prompt and dispatches its answer.
    fn draw_prompt(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.modal.prompt.clone() else {
            return;
        };
        let (title, question, confirm) = match prompt {
            Prompt::NodeLabel => ("Add Node", "Enter node label:", "Add"),
            Prompt::ImportJson => ("Import JSON", "Paste your JSON data here:", "Import"),
            Prompt::RenameNode => ("Edit Node", "Node label:", "Save"),
        };

        let mut confirmed = false;
        let mut cancelled = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        let input = &mut self.modal.input;
        egui::Window::new(title)
            .id(egui::Id::new("prompt_window"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(question);
                if prompt == Prompt::ImportJson {
                    ui.add(
                        egui::TextEdit::multiline(input)
                            .code_editor()
                            .desired_rows(12)
                            .desired_width(420.0),
                    );
                } else {
                    let response = ui.text_edit_singleline(input);
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        confirmed = true;
                    } else if ui.memory(|m| m.focused().is_none()) {
                        response.request_focus();
                    }
                }
                ui.horizontal(|ui| {
                    if ui.button(confirm).clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });

        if confirmed {
            self.submit_prompt();
        } else if cancelled {
            self.cancel_prompt();
        }
    }

    /// Closes the open prompt. A cancelled Add Node still creates a placeholder node.
    fn cancel_prompt(&mut self) {
        let prompt = self.modal.prompt.clone();
        self.modal.close();
        if prompt == Some(Prompt::NodeLabel) {
            self.run_action(EditorAction::AddNode { label: None });
        }
    }

    /// Closes the open prompt and acts on what was typed.
    fn submit_prompt(&mut self) {
        let Some(prompt) = self.modal.prompt.clone() else {
            return;
        };
        let text = self.modal.close();
        match prompt {
            Prompt::NodeLabel => {
                self.run_action(EditorAction::AddNode { label: Some(text) });
            }
            Prompt::ImportJson => self.import_text(text),
            Prompt::RenameNode => {
                self.run_action(EditorAction::RenameSave { label: text });
            }
        }
    }

    /// Renders the current notice until acknowledged.
    fn draw_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.modal.notice.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .id(egui::Id::new("notice_window"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(notice.message.as_str());
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.modal.notice = None;
        }
    }
}

fn layout_mode_name(mode: LayoutMode) -> &'static str {
    match mode {
        LayoutMode::Preset => "Keep positions",
        LayoutMode::ForceDirected => "Force-directed",
    }
}

#[cfg(test)]
mod tests;
