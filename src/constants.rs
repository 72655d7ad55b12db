//! Shared application-wide constants.
//! Centralizes tweakable values used by the editor core and the canvas.

// Node dimensions
/// Default node width in world units.
pub const NODE_WIDTH: f32 = 100.0;
/// Default node height in world units.
pub const NODE_HEIGHT: f32 = 50.0;
/// Smallest width/height a node can be resized to.
pub const NODE_MIN_SIZE: f32 = 50.0;
/// Largest width/height a node can be resized to.
pub const NODE_MAX_SIZE: f32 = 300.0;

// Node creation
/// Label given to nodes created without one.
pub const DEFAULT_NODE_LABEL: &str = "New Node";
/// New nodes are scattered over `[0, SPAWN_EXTENT)` on both axes.
pub const SPAWN_EXTENT: f32 = 400.0;

// Grid/drawing
/// Grid cell size in world units.
pub const GRID_SIZE: f32 = 20.0;

// Canvas interactions
/// Hit distance in world units for picking edges.
pub const CLICK_THRESHOLD: f32 = 10.0;

// Force-directed layout
/// Number of relaxation steps per layout run.
pub const LAYOUT_ITERATIONS: usize = 500;
/// Pairwise repulsion constant.
pub const LAYOUT_REPULSION: f32 = 50000.0;
/// Spring constant along edges.
pub const LAYOUT_ATTRACTION: f32 = 0.08;
/// Velocity damping per step.
pub const LAYOUT_DAMPING: f32 = 0.85;

// Interchange
/// File name offered when exporting.
pub const EXPORT_FILE_NAME: &str = "flowchart.json";
