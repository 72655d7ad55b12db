#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // File dialogs are spawned onto this runtime
    flowchart_editor::run_app()
}

// The web build starts from `wasm_main` in the library
#[cfg(target_arch = "wasm32")]
fn main() {}
