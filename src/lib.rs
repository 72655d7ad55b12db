//! # Flowchart Editor
//!
//! An interactive flowchart editor: labeled rectangular nodes joined by directed
//! edges, drawn on a pannable, zoomable canvas.
//!
//! ## Features
//! - Node creation, renaming, resizing, dragging and deletion
//! - Edge creation by tapping two nodes, or by dragging in edge-draw mode
//! - Right-click context menu for the node or edge under the cursor
//! - JSON export and validated, all-or-nothing JSON import
//! - Optional force-directed layout after import
//!
//! The editing core ([`Editor`], [`Selection`], [`GraphStore`] and the JSON
//! [`codec`]) has no UI dependencies; the `ui` module maps egui input to
//! [`EditorAction`]s.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod codec;
pub mod constants;
mod editor;
mod error;
mod layout;
mod selection;
mod store;
mod types;
mod ui;

// Re-export public types and functions
pub use codec::{Document, ImportSummary};
pub use editor::{ActionOutcome, Editor, EditorAction};
pub use error::{EditorError, FormatError, GraphError};
pub use layout::force_directed;
pub use selection::{ActiveTarget, Selection, SelectionPhase, TapOutcome};
pub use store::GraphStore;
pub use types::*;
pub use ui::{EditorSettings, FlowchartApp};

/// Runs the flowchart editor in a native window.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), eframe::Error> {
///     flowchart_editor::run_app()
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Flowchart Editor")
            .with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    log::info!("Starting flowchart editor");
    eframe::run_native(
        "Flowchart Editor",
        options,
        Box::new(|cc| Ok(Box::new(FlowchartApp::new(cc)))),
    )
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Starts the editor on the `flowchart-canvas` element of the host page.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    use wasm_bindgen::JsCast;

    wasm_bindgen_futures::spawn_local(async {
        let canvas = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id("flowchart-canvas"))
            .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok());
        let Some(canvas) = canvas else {
            log::error!("No canvas element with id 'flowchart-canvas'");
            return;
        };

        let started = eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|cc| Ok(Box::new(FlowchartApp::new(cc)))),
            )
            .await;
        if let Err(err) = started {
            log::error!("Failed to start eframe: {:?}", err);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_default() {
        let graph = Graph::default();
        assert!(graph.nodes().is_empty());
        assert!(graph.edges().is_empty());
        assert_eq!(graph.layout_mode, LayoutMode::Preset);
    }

    #[test]
    fn test_editor_starts_idle() {
        let editor: Editor = Editor::default();
        assert_eq!(editor.selection().phase(), SelectionPhase::Idle);
        assert!(editor.selection().active().is_none());
        assert!(!editor.edge_draw_mode());
    }
}
