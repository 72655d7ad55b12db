//! Application state management structures.
//!
//! This module contains the state that sits around the [`Editor`]: canvas
//! navigation, pointer interactions, the context menu, pending modal prompts,
//! file operations, and the persisted user settings.

use crate::editor::Editor;
use crate::selection::ActiveTarget;
use crate::types::*;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Storage key for persisted settings.
pub const SETTINGS_KEY: &str = "editor_settings";

/// User preferences persisted between sessions.
///
/// The graph itself is never persisted; exporting is the only way to keep it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorSettings {
    /// Layout applied after importing a document
    pub layout_mode: LayoutMode,
    /// Whether the grid should be displayed on the canvas
    pub show_grid: bool,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            layout_mode: LayoutMode::Preset,
            show_grid: true,
            dark_mode: true,
        }
    }
}

impl EditorSettings {
    /// Serializes the settings to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// State related to canvas navigation.
pub struct CanvasState {
    /// Current canvas pan offset (in screen space)
    pub offset: egui::Vec2,
    /// Current zoom level (1.0 = normal)
    pub zoom_factor: f32,
    /// Whether the origin has been placed for the first frame
    pub initialized: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            offset: egui::Vec2::ZERO,
            zoom_factor: 1.0,
            initialized: false,
        }
    }
}

/// Pointer interaction in progress on the canvas.
#[derive(Default)]
pub struct InteractionState {
    /// Screen position where the primary button went down
    pub press_start: Option<egui::Pos2>,
    /// Latest pointer position while the primary button is held
    pub pointer_pos: Option<egui::Pos2>,
    /// Node under the pointer when the press started
    pub pressed_node: Option<NodeId>,
    /// Node currently being moved
    pub dragging_node: Option<NodeId>,
    /// Offset from the pointer to the dragged node's center (world space)
    pub drag_offset: egui::Vec2,
    /// Node an edge is being drawn from in edge-draw mode
    pub drawing_edge_from: Option<NodeId>,
    /// Whether the user is currently panning the canvas
    pub is_panning: bool,
    /// Last pointer position during panning
    pub last_pan_pos: Option<egui::Pos2>,
}

impl InteractionState {
    /// Forgets any press, drag or edge drawing in progress.
    pub fn reset_press(&mut self) {
        self.press_start = None;
        self.pointer_pos = None;
        self.pressed_node = None;
        self.dragging_node = None;
        self.drawing_edge_from = None;
    }
}

/// Right-click menu for the active node or edge.
#[derive(Default)]
pub struct ContextMenuState {
    /// Whether the context menu is currently visible
    pub show: bool,
    /// Screen position where the menu appears
    pub screen_pos: egui::Pos2,
    /// Element the menu acts on
    pub target: Option<ActiveTarget>,
    /// Prevents the menu from closing on the click that opened it
    pub just_opened: bool,
}

/// A question the editor is waiting on before it can act.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Label for a node about to be created
    NodeLabel,
    /// JSON text to import
    ImportJson,
    /// New label for the active node
    RenameNode,
}

/// A message the user has to acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Window title
    pub title: String,
    /// Body text
    pub message: String,
}

impl Notice {
    /// Creates a notice.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Modal dialog state.
#[derive(Default)]
pub struct ModalState {
    /// Prompt currently shown, if any
    pub prompt: Option<Prompt>,
    /// Text being edited in the prompt
    pub input: String,
    /// Message currently shown, if any
    pub notice: Option<Notice>,
}

impl ModalState {
    /// Opens `prompt` with the given initial text.
    pub fn open(&mut self, prompt: Prompt, input: impl Into<String>) {
        self.prompt = Some(prompt);
        self.input = input.into();
    }

    /// Closes the prompt and hands back whatever was typed.
    pub fn close(&mut self) -> String {
        self.prompt = None;
        std::mem::take(&mut self.input)
    }

    /// Returns true while any modal window is up.
    pub fn is_open(&self) -> bool {
        self.prompt.is_some() || self.notice.is_some()
    }
}

/// Messages sent from async file operations back to the main app.
#[derive(Debug)]
pub enum FileOperationResult {
    /// Export written to the given path
    ExportCompleted(String),
    /// A file was read; carries its name and content
    OpenCompleted(String, String),
    /// Operation failed with an error message
    OperationFailed(String),
}

/// State related to file import/export.
pub struct FileState {
    /// Channel for receiving file operation results from async contexts
    pub sender: Sender<FileOperationResult>,
    /// Receiving end drained once per frame
    pub receiver: Receiver<FileOperationResult>,
}

impl Default for FileState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }
}

/// The main application structure: the editor plus its presentation state.
///
/// This struct implements the `eframe::App` trait and routes every user action
/// through [`Editor::dispatch`].
#[derive(Default)]
pub struct FlowchartApp {
    /// The editing session
    pub editor: Editor,
    /// Persisted preferences
    pub settings: EditorSettings,
    /// Canvas navigation state
    pub canvas: CanvasState,
    /// Pointer interaction state
    pub interaction: InteractionState,
    /// Context menu state
    pub context_menu: ContextMenuState,
    /// Modal prompts and notices
    pub modal: ModalState,
    /// File operations state
    pub file: FileState,
}

impl FlowchartApp {
    /// Creates the app, restoring settings from eframe storage when available.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = cc
            .storage
            .and_then(|storage| storage.get_string(SETTINGS_KEY))
            .and_then(|json| match EditorSettings::from_json(&json) {
                Ok(settings) => Some(settings),
                Err(err) => {
                    log::warn!("Ignoring unreadable settings: {err}");
                    None
                }
            })
            .unwrap_or_default();
        Self::with_settings(settings)
    }

    /// Creates the app with the given settings.
    pub fn with_settings(settings: EditorSettings) -> Self {
        let mut app = Self {
            settings,
            ..Default::default()
        };
        app.apply_layout_setting();
        app
    }

    /// Pushes the layout setting down into the graph store.
    pub fn apply_layout_setting(&mut self) {
        self.editor.store_mut().layout_mode = self.settings.layout_mode;
    }
}
