use super::state::Prompt;
use super::*;
use crate::selection::SelectionPhase;
use eframe::egui;

fn screen_rect() -> egui::Rect {
    egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1200.0, 800.0))
}

/// App with screen space equal to world space.
fn test_app() -> FlowchartApp {
    let mut app = FlowchartApp::default();
    app.canvas.initialized = true;
    app.canvas.offset = egui::Vec2::ZERO;
    app.canvas.zoom_factor = 1.0;
    app
}

fn add_node(app: &mut FlowchartApp, id: &str, x: f32, y: f32) -> NodeId {
    app.editor
        .store_mut()
        .add_node(Node::with_id(id, id, Position::new(x, y)))
        .unwrap()
}

/// Runs one canvas frame on a shared context so pointer state carries over.
fn canvas_frame(
    ctx: &egui::Context,
    app: &mut FlowchartApp,
    events: Vec<egui::Event>,
) -> egui::FullOutput {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(screen_rect());
    raw.events = events;
    ctx.run(raw, |ctx| {
        ctx.set_visuals(egui::Visuals::dark());
        egui::CentralPanel::default().show(ctx, |ui| {
            app.draw_canvas(ui);
        });
    })
}

fn button(pos: egui::Pos2, button: egui::PointerButton, pressed: bool) -> egui::Event {
    egui::Event::PointerButton {
        pos,
        button,
        pressed,
        modifiers: egui::Modifiers::NONE,
    }
}

fn key(key: egui::Key) -> egui::Event {
    egui::Event::Key {
        key,
        physical_key: None,
        pressed: true,
        repeat: false,
        modifiers: egui::Modifiers::NONE,
    }
}

/// Hover, press and release the primary button at `pos`.
fn tap(ctx: &egui::Context, app: &mut FlowchartApp, pos: egui::Pos2) {
    canvas_frame(ctx, app, vec![egui::Event::PointerMoved(pos)]);
    canvas_frame(
        ctx,
        app,
        vec![
            egui::Event::PointerMoved(pos),
            button(pos, egui::PointerButton::Primary, true),
        ],
    );
    canvas_frame(ctx, app, vec![button(pos, egui::PointerButton::Primary, false)]);
}

/// Press at `start`, move to `end` in two steps, release.
fn drag(ctx: &egui::Context, app: &mut FlowchartApp, start: egui::Pos2, end: egui::Pos2) {
    let mid = start + (end - start) / 2.0;
    canvas_frame(ctx, app, vec![egui::Event::PointerMoved(start)]);
    canvas_frame(
        ctx,
        app,
        vec![
            egui::Event::PointerMoved(start),
            button(start, egui::PointerButton::Primary, true),
        ],
    );
    canvas_frame(ctx, app, vec![egui::Event::PointerMoved(mid)]);
    canvas_frame(ctx, app, vec![egui::Event::PointerMoved(end)]);
    canvas_frame(ctx, app, vec![button(end, egui::PointerButton::Primary, false)]);
}

fn right_click(ctx: &egui::Context, app: &mut FlowchartApp, pos: egui::Pos2) {
    canvas_frame(ctx, app, vec![egui::Event::PointerMoved(pos)]);
    canvas_frame(
        ctx,
        app,
        vec![
            egui::Event::PointerMoved(pos),
            button(pos, egui::PointerButton::Secondary, true),
        ],
    );
    canvas_frame(ctx, app, vec![button(pos, egui::PointerButton::Secondary, false)]);
}

#[test]
fn tapping_one_node_selects_it() {
    let mut app = test_app();
    let a = add_node(&mut app, "a", 200.0, 150.0);
    let ctx = egui::Context::default();

    tap(&ctx, &mut app, egui::pos2(200.0, 150.0));

    assert!(app.editor.selection().is_selected(&a));
    assert_eq!(app.editor.selection().phase(), SelectionPhase::OneSelected);
}

#[test]
fn tapping_two_nodes_creates_edge() {
    let mut app = test_app();
    let a = add_node(&mut app, "a", 200.0, 150.0);
    let b = add_node(&mut app, "b", 500.0, 150.0);
    let ctx = egui::Context::default();

    tap(&ctx, &mut app, egui::pos2(200.0, 150.0));
    tap(&ctx, &mut app, egui::pos2(500.0, 150.0));

    let edges = app.editor.store().edges();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source, a);
    assert_eq!(edges[0].target, b);
    assert_eq!(app.editor.selection().phase(), SelectionPhase::Idle);
}

#[test]
fn tapping_selected_node_again_deselects_it() {
    let mut app = test_app();
    add_node(&mut app, "a", 200.0, 150.0);
    let ctx = egui::Context::default();

    tap(&ctx, &mut app, egui::pos2(200.0, 150.0));
    tap(&ctx, &mut app, egui::pos2(210.0, 155.0));

    assert_eq!(app.editor.selection().phase(), SelectionPhase::Idle);
    assert!(app.editor.store().edges().is_empty());
}

#[test]
fn tapping_background_clears_selection() {
    let mut app = test_app();
    add_node(&mut app, "a", 200.0, 150.0);
    let ctx = egui::Context::default();

    tap(&ctx, &mut app, egui::pos2(200.0, 150.0));
    tap(&ctx, &mut app, egui::pos2(800.0, 600.0));

    assert_eq!(app.editor.selection().phase(), SelectionPhase::Idle);
}

#[test]
fn tapping_edge_keeps_node_selection() {
    let mut app = test_app();
    let a = add_node(&mut app, "a", 200.0, 150.0);
    add_node(&mut app, "b", 500.0, 150.0);
    app.editor
        .store_mut()
        .add_edge(Edge::with_id("e", "a", "b"))
        .unwrap();
    let ctx = egui::Context::default();

    tap(&ctx, &mut app, egui::pos2(200.0, 150.0));
    tap(&ctx, &mut app, egui::pos2(350.0, 152.0));

    assert!(app.editor.selection().is_selected(&a));
    assert_eq!(app.editor.selection().phase(), SelectionPhase::OneSelected);
    assert_eq!(app.editor.store().edges().len(), 1);
}

#[test]
fn dragging_node_moves_it_without_selecting() {
    let mut app = test_app();
    let a = add_node(&mut app, "a", 200.0, 150.0);
    let ctx = egui::Context::default();

    drag(&ctx, &mut app, egui::pos2(200.0, 150.0), egui::pos2(300.0, 190.0));

    let node = app.editor.store().node(&a).unwrap();
    assert!((node.position.x - 300.0).abs() < 0.5);
    assert!((node.position.y - 190.0).abs() < 0.5);
    assert_eq!(app.editor.selection().phase(), SelectionPhase::Idle);
}

#[test]
fn drag_in_draw_mode_connects_nodes() {
    let mut app = test_app();
    let a = add_node(&mut app, "a", 200.0, 150.0);
    let b = add_node(&mut app, "b", 500.0, 150.0);
    app.run_action(EditorAction::DrawModeOn);
    let ctx = egui::Context::default();

    drag(&ctx, &mut app, egui::pos2(200.0, 150.0), egui::pos2(500.0, 150.0));

    let edges = app.editor.store().edges();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source, a);
    assert_eq!(edges[0].target, b);
    // The source node stays where it was
    assert_eq!(app.editor.store().node(&a).unwrap().position, Position::new(200.0, 150.0));
    assert!(app.interaction.drawing_edge_from.is_none());
}

#[test]
fn drag_in_draw_mode_onto_background_creates_nothing() {
    let mut app = test_app();
    add_node(&mut app, "a", 200.0, 150.0);
    app.run_action(EditorAction::DrawModeOn);
    let ctx = egui::Context::default();

    drag(&ctx, &mut app, egui::pos2(200.0, 150.0), egui::pos2(700.0, 600.0));

    assert!(app.editor.store().edges().is_empty());
}

#[test]
fn right_click_on_node_opens_context_menu() {
    let mut app = test_app();
    let a = add_node(&mut app, "a", 200.0, 150.0);
    let ctx = egui::Context::default();

    right_click(&ctx, &mut app, egui::pos2(200.0, 150.0));

    assert!(app.context_menu.show);
    assert_eq!(app.context_menu.target, Some(ActiveTarget::Node(a.clone())));
    assert_eq!(app.editor.selection().active_node(), Some(&a));
}

#[test]
fn right_click_on_edge_activates_edge() {
    let mut app = test_app();
    add_node(&mut app, "a", 200.0, 150.0);
    add_node(&mut app, "b", 500.0, 150.0);
    let edge = app
        .editor
        .store_mut()
        .add_edge(Edge::with_id("e", "a", "b"))
        .unwrap();
    let ctx = egui::Context::default();

    right_click(&ctx, &mut app, egui::pos2(350.0, 152.0));

    assert!(app.context_menu.show);
    assert_eq!(app.editor.selection().active_edge(), Some(&edge));
}

#[test]
fn right_click_on_background_keeps_menu_closed() {
    let mut app = test_app();
    add_node(&mut app, "a", 200.0, 150.0);
    let ctx = egui::Context::default();

    right_click(&ctx, &mut app, egui::pos2(800.0, 600.0));

    assert!(!app.context_menu.show);
    assert!(app.editor.selection().active().is_none());
}

#[test]
fn delete_key_removes_active_node_and_its_edges() {
    let mut app = test_app();
    let a = add_node(&mut app, "a", 200.0, 150.0);
    add_node(&mut app, "b", 500.0, 150.0);
    app.editor
        .store_mut()
        .add_edge(Edge::with_id("e", "a", "b"))
        .unwrap();
    app.run_action(EditorAction::ContextNode(a.clone()));

    let ctx = egui::Context::default();
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(screen_rect());
    raw.events = vec![key(egui::Key::Delete)];
    let _ = ctx.run(raw, |ctx| app.handle_delete_key(ctx));

    assert!(app.editor.store().node(&a).is_none());
    assert!(app.editor.store().edges().is_empty());
    assert!(app.editor.selection().active().is_none());
}

#[test]
fn delete_key_is_ignored_while_prompt_is_open() {
    let mut app = test_app();
    let a = add_node(&mut app, "a", 200.0, 150.0);
    app.run_action(EditorAction::ContextNode(a.clone()));
    app.modal.open(Prompt::RenameNode, "a");

    let ctx = egui::Context::default();
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(screen_rect());
    raw.events = vec![key(egui::Key::Delete)];
    let _ = ctx.run(raw, |ctx| app.handle_delete_key(ctx));

    assert!(app.editor.store().node(&a).is_some());
}

#[test]
fn canvas_ignores_taps_while_modal_is_open() {
    let mut app = test_app();
    add_node(&mut app, "a", 200.0, 150.0);
    app.modal.notice = Some(Notice::new("Hello", "world"));
    let ctx = egui::Context::default();

    tap(&ctx, &mut app, egui::pos2(200.0, 150.0));

    assert_eq!(app.editor.selection().phase(), SelectionPhase::Idle);
}

#[test]
fn add_node_prompt_creates_labeled_node() {
    let mut app = test_app();
    app.modal.open(Prompt::NodeLabel, DEFAULT_NODE_LABEL);
    app.modal.input = "  Start  ".into();

    app.submit_prompt();

    let nodes = app.editor.store().nodes();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].label, "Start");
    assert!(!app.modal.is_open());
}

#[test]
fn escape_on_add_node_prompt_creates_placeholder_node() {
    let mut app = test_app();
    app.modal.open(Prompt::NodeLabel, "Typed but cancelled");

    let ctx = egui::Context::default();
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(screen_rect());
    raw.events = vec![key(egui::Key::Escape)];
    let _ = ctx.run(raw, |ctx| app.draw_prompt(ctx));

    assert!(app.modal.prompt.is_none());
    let nodes = app.editor.store().nodes();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].label, DEFAULT_NODE_LABEL);
}

#[test]
fn escape_on_rename_prompt_keeps_label() {
    let mut app = test_app();
    let a = add_node(&mut app, "a", 200.0, 150.0);
    app.run_action(EditorAction::ContextNode(a.clone()));
    app.modal.open(Prompt::RenameNode, "Changed");

    let ctx = egui::Context::default();
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(screen_rect());
    raw.events = vec![key(egui::Key::Escape)];
    let _ = ctx.run(raw, |ctx| app.draw_prompt(ctx));

    assert!(app.modal.prompt.is_none());
    assert_eq!(app.editor.store().node(&a).unwrap().label, "a");
    assert_eq!(app.editor.store().nodes().len(), 1);
}

#[test]
fn rename_prompt_updates_active_node() {
    let mut app = test_app();
    let a = add_node(&mut app, "a", 200.0, 150.0);
    app.run_action(EditorAction::ContextNode(a.clone()));
    app.modal.open(Prompt::RenameNode, "a");
    app.modal.input = "Renamed".into();

    app.submit_prompt();

    assert_eq!(app.editor.store().node(&a).unwrap().label, "Renamed");
}

#[test]
fn import_prompt_replaces_graph_and_reports_success() {
    let mut app = test_app();
    add_node(&mut app, "old", 200.0, 150.0);
    app.modal.open(Prompt::ImportJson, "");
    app.modal.input = r#"{
        "nodes": [
            {"id": "n1", "label": "One", "position": {"x": 10.0, "y": 20.0}, "size": {"width": 100.0, "height": 50.0}},
            {"id": "n2", "label": "Two", "position": {"x": 200.0, "y": 20.0}, "size": {"width": 100.0, "height": 50.0}}
        ],
        "edges": [{"id": "e1", "source": "n1", "target": "n2"}]
    }"#
    .into();

    app.submit_prompt();

    let store = app.editor.store();
    assert!(store.node("old").is_none());
    assert_eq!(store.nodes().len(), 2);
    assert_eq!(store.edges().len(), 1);
    let notice = app.modal.notice.as_ref().unwrap();
    assert_eq!(notice.message, "Flowchart imported successfully!");
}

#[test]
fn invalid_import_keeps_graph_and_shows_notice() {
    let mut app = test_app();
    let a = add_node(&mut app, "a", 200.0, 150.0);

    app.import_text("{ not json".to_string());

    assert!(app.editor.store().node(&a).is_some());
    let notice = app.modal.notice.as_ref().unwrap();
    assert!(notice
        .message
        .starts_with("Invalid JSON format. Please check your input."));
}

#[test]
fn file_results_are_drained_into_import() {
    let mut app = test_app();
    app.file
        .sender
        .send(state::FileOperationResult::OpenCompleted(
            "chart.json".into(),
            r#"{"nodes": [{"id": "x", "label": "X", "position": {"x": 0.0, "y": 0.0}}], "edges": []}"#
                .into(),
        ))
        .unwrap();

    app.handle_file_results();

    assert_eq!(app.editor.store().nodes().len(), 1);
    assert_eq!(app.editor.store().nodes()[0].size, Size::default());
}

#[test]
fn drawing_canvas_with_node_produces_shapes() {
    let mut app = test_app();
    add_node(&mut app, "a", 200.0, 150.0);
    let ctx = egui::Context::default();

    let output = canvas_frame(&ctx, &mut app, vec![]);

    assert!(!output.shapes.is_empty());
}
