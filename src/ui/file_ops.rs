//! File operations for exporting and importing flowchart documents.
//!
//! Native builds use `rfd` dialogs on a tokio task; the web build downloads a
//! blob and reads files through a hidden `<input type="file">`. Either way the
//! result comes back through the app's channel and is handled on the UI thread.

use super::state::{FileOperationResult, FlowchartApp, Notice};
use crate::constants::EXPORT_FILE_NAME;
use crate::editor::{ActionOutcome, EditorAction};
use crate::error::EditorError;
use eframe::egui;

impl FlowchartApp {
    /// Processes completed file operations.
    pub fn handle_file_results(&mut self) {
        while let Ok(result) = self.file.receiver.try_recv() {
            match result {
                FileOperationResult::ExportCompleted(path) => {
                    log::info!("Flowchart exported to {}", path);
                }
                FileOperationResult::OpenCompleted(name, content) => {
                    log::info!("Read {} for import", name);
                    self.import_text(content);
                }
                FileOperationResult::OperationFailed(error) => {
                    log::error!("File operation failed: {}", error);
                    self.modal.notice = Some(Notice::new("File error", error));
                }
            }
        }
    }

    /// Imports `json`, replacing the graph, and reports the result in a notice.
    pub fn import_text(&mut self, json: String) {
        self.context_menu.show = false;
        self.interaction.reset_press();
        match self.editor.dispatch(EditorAction::Import { json }) {
            Ok(_) => {
                self.modal.notice = Some(Notice::new(
                    "Import",
                    "Flowchart imported successfully!",
                ));
            }
            Err(err) => {
                log::warn!("Import rejected: {}", err);
                self.modal.notice = Some(Notice::new("Import failed", describe_error(&err)));
            }
        }
    }

    /// Serializes the graph and hands it to the platform's save mechanism.
    pub fn export_flowchart(&mut self, ctx: &egui::Context) {
        let json = match self.editor.dispatch(EditorAction::Export) {
            Ok(ActionOutcome::Exported(json)) => json,
            Ok(_) => return,
            Err(err) => {
                log::error!("{}", err);
                self.modal.notice = Some(Notice::new("Export failed", err.to_string()));
                return;
            }
        };
        let sender = self.file.sender.clone();

        #[cfg(target_arch = "wasm32")]
        {
            let result = match Self::trigger_download(EXPORT_FILE_NAME, &json) {
                Ok(()) => FileOperationResult::ExportCompleted(EXPORT_FILE_NAME.to_string()),
                Err(e) => FileOperationResult::OperationFailed(e),
            };
            let _ = sender.send(result);
            ctx.request_repaint();
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let ctx = ctx.clone();
            tokio::spawn(async move {
                if let Some(handle) = rfd::AsyncFileDialog::new()
                    .add_filter("JSON", &["json"])
                    .set_file_name(EXPORT_FILE_NAME)
                    .save_file()
                    .await
                {
                    let path = handle.path();
                    let result = match std::fs::write(path, json) {
                        Ok(()) => FileOperationResult::ExportCompleted(path.display().to_string()),
                        Err(e) => {
                            FileOperationResult::OperationFailed(format!("Failed to save file: {}", e))
                        }
                    };
                    let _ = sender.send(result);
                }
                ctx.request_repaint();
            });
        }
    }

    /// Lets the user pick a JSON file to import.
    pub fn open_flowchart_file(&mut self, ctx: &egui::Context) {
        let ctx = ctx.clone();
        let sender = self.file.sender.clone();

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                match Self::show_open_file_picker().await {
                    Some(file) => {
                        let name = file.name();
                        let result = match Self::read_file(file).await {
                            Ok(content) => FileOperationResult::OpenCompleted(name, content),
                            Err(e) => FileOperationResult::OperationFailed(e),
                        };
                        let _ = sender.send(result);
                    }
                    None => log::debug!("Open dialog cancelled or API not supported"),
                }
                ctx.request_repaint();
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            tokio::spawn(async move {
                if let Some(handle) = rfd::AsyncFileDialog::new()
                    .add_filter("JSON", &["json"])
                    .pick_file()
                    .await
                {
                    let path = handle.path();
                    let result = match std::fs::read_to_string(path) {
                        Ok(json) => FileOperationResult::OpenCompleted(path.display().to_string(), json),
                        Err(e) => {
                            FileOperationResult::OperationFailed(format!("Failed to read file: {}", e))
                        }
                    };
                    let _ = sender.send(result);
                }
                ctx.request_repaint();
            });
        }
    }

    /// Triggers a file download in the browser.
    ///
    /// Creates a temporary anchor element with a blob URL and clicks it.
    #[cfg(target_arch = "wasm32")]
    fn trigger_download(filename: &str, content: &str) -> Result<(), String> {
        use wasm_bindgen::JsCast;

        let window = web_sys::window().ok_or("No window found")?;
        let document = window.document().ok_or("No document found")?;

        let blob_parts = js_sys::Array::new();
        blob_parts.push(&wasm_bindgen::JsValue::from_str(content));

        let blob_options = web_sys::BlobPropertyBag::new();
        blob_options.set_type("application/json");

        let blob = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &blob_options)
            .map_err(|_| "Failed to create blob")?;
        let url = web_sys::Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Failed to create object URL")?;

        let anchor = document
            .create_element("a")
            .map_err(|_| "Failed to create anchor element")?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| "Failed to cast to anchor element")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        let body = document.body().ok_or("No body found")?;
        body.append_child(&anchor)
            .map_err(|_| "Failed to append anchor")?;
        anchor.click();
        body.remove_child(&anchor)
            .map_err(|_| "Failed to remove anchor")?;

        web_sys::Url::revoke_object_url(&url).map_err(|_| "Failed to revoke object URL")?;
        Ok(())
    }

    /// Opens a file picker in the browser and waits for a selection.
    #[cfg(target_arch = "wasm32")]
    async fn show_open_file_picker() -> Option<web_sys::File> {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let window = web_sys::window()?;
        let document = window.document()?;

        let input = document
            .create_element("input")
            .ok()?
            .dyn_into::<web_sys::HtmlInputElement>()
            .ok()?;
        input.set_type("file");
        input.set_accept(".json,application/json");
        input.style().set_property("display", "none").ok()?;

        let (sender, receiver) = futures::channel::oneshot::channel::<Option<web_sys::File>>();
        let sender = std::rc::Rc::new(std::cell::RefCell::new(Some(sender)));

        let onchange = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let file = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            if let Some(sender) = sender.borrow_mut().take() {
                let _ = sender.send(file);
            }
        }) as Box<dyn FnMut(_)>);
        input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();

        document.body()?.append_child(&input).ok()?;
        input.click();

        let file = receiver.await.ok()??;
        document.body()?.remove_child(&input).ok()?;
        Some(file)
    }

    /// Reads a browser `File` as text.
    #[cfg(target_arch = "wasm32")]
    async fn read_file(file: web_sys::File) -> Result<String, String> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::JsValue;

        let file_reader =
            web_sys::FileReader::new().map_err(|_| "Failed to create FileReader".to_string())?;

        let promise = js_sys::Promise::new(&mut |resolve, reject| {
            let reader = file_reader.clone();
            let onload = wasm_bindgen::closure::Closure::wrap(Box::new(
                move |_event: web_sys::ProgressEvent| {
                    if let Ok(result) = reader.result() {
                        let _ = resolve.call1(&JsValue::NULL, &result);
                    }
                },
            ) as Box<dyn FnMut(_)>);
            file_reader.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();

            let onerror = wasm_bindgen::closure::Closure::wrap(Box::new(
                move |_event: web_sys::ProgressEvent| {
                    let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("Failed to read file"));
                },
            ) as Box<dyn FnMut(_)>);
            file_reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();
        });

        file_reader
            .read_as_text(&file)
            .map_err(|_| "Failed to start reading file".to_string())?;

        let result = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|e| format!("Failed to read file: {:?}", e))?;
        result
            .as_string()
            .ok_or_else(|| "File content is not a string".to_string())
    }
}

/// Human-readable summary of a dispatch failure.
pub fn describe_error(err: &EditorError) -> String {
    match err {
        EditorError::Format(_) => format!("Invalid JSON format. Please check your input.\n\n{}", err),
        other => other.to_string(),
    }
}
