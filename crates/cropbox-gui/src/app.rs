use std::sync::mpsc;
use std::sync::Arc;

use cropbox_core::config::CropboxConfig;
use cropbox_core::events::CropEvent;
use cropbox_core::session::CropSession;

use crate::convert::rgba_to_color_image;
use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::sink::ChannelEventSink;
use crate::state::UiState;
use crate::worker;

pub struct CropboxApp {
    pub cmd_tx: mpsc::Sender<WorkerCommand>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub event_rx: mpsc::Receiver<CropEvent>,
    pub session: CropSession,
    pub ui_state: UiState,
    pub source_texture: Option<egui::TextureHandle>,
    pub result_texture: Option<egui::TextureHandle>,
    pub show_about: bool,
}

impl CropboxApp {
    pub fn new(ctx: &egui::Context) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = worker::spawn_worker(result_tx, ctx.clone());

        let (event_tx, event_rx) = mpsc::channel();
        let sink = Arc::new(ChannelEventSink::new(event_tx, ctx.clone()));
        let session = CropSession::with_sink(CropboxConfig::default(), sink)
            .expect("default config is valid");

        Self {
            cmd_tx,
            result_rx,
            event_rx,
            session,
            ui_state: UiState::default(),
            source_texture: None,
            result_texture: None,
            show_about: false,
        }
    }

    /// Drain all pending results from the worker. If two loads raced, the
    /// later message wins.
    fn poll_results(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::ImageLoaded { path, source } => {
                    self.ui_state.add_log(format!(
                        "Opened: {} ({}x{})",
                        path.display(),
                        source.width(),
                        source.height()
                    ));
                    let color_image = rgba_to_color_image(source.pixels());
                    self.source_texture = Some(ctx.load_texture(
                        "source",
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                    self.session.load_decoded(source);
                    // Init the zoom with the value set on the slider.
                    let _ = self.session.set_zoom_slider(self.ui_state.zoom_slider);
                    self.ui_state.file_path = Some(path);
                    self.ui_state.editor_open = true;
                }
                WorkerResult::ResultSaved { path } => {
                    self.ui_state.add_log(format!("Saved: {}", path.display()));
                }
                WorkerResult::Error { message } => {
                    self.ui_state.add_log(format!("ERROR: {message}"));
                }
            }
        }
    }

    /// Drain session events into the log and refresh the result strip.
    fn poll_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                CropEvent::FileSelected { payloads } => {
                    let labels: Vec<_> = payloads.iter().map(|p| p.label()).collect();
                    self.ui_state
                        .add_log(format!("file-selected [{}]", labels.join(", ")));
                }
                CropEvent::CropSaved { payloads } => {
                    let labels: Vec<_> = payloads.iter().map(|p| p.label()).collect();
                    self.ui_state
                        .add_log(format!("crop-saved [{}]", labels.join(", ")));
                    self.refresh_result_texture(ctx);
                }
                CropEvent::CropCanceled { canceled } => {
                    self.ui_state
                        .add_log(format!("crop-canceled (canceled: {canceled})"));
                }
                CropEvent::EditorClosed { closed } => {
                    self.ui_state
                        .add_log(format!("editor-closed (closed: {closed})"));
                }
            }
        }
    }

    fn refresh_result_texture(&mut self, ctx: &egui::Context) {
        let Some(result) = self.session.committed() else {
            return;
        };
        match image::load_from_memory(result.png_bytes()) {
            Ok(img) => {
                let color_image = rgba_to_color_image(&img.to_rgba8());
                self.result_texture = Some(ctx.load_texture(
                    "crop-result",
                    color_image,
                    egui::TextureOptions::LINEAR,
                ));
                self.ui_state.result_name = Some(self.result_file_name());
            }
            Err(e) => self.ui_state.add_log(format!("ERROR: {e}")),
        }
    }

    /// Default filename for the committed result, derived from the input.
    pub fn result_file_name(&self) -> String {
        let stem = self
            .ui_state
            .file_path
            .as_ref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("avatar");
        let viewport = self.session.viewport();
        format!("{stem}_crop{}x{}.png", viewport.width, viewport.height)
    }

    /// Export the current view, then ask where to write it.
    pub fn save_crop(&mut self) {
        let result = match self.session.crop() {
            Ok(r) => r,
            Err(e) => {
                self.ui_state.add_log(format!("ERROR: {e}"));
                return;
            }
        };
        // Saving ends the edit: the surface closes with the crop committed.
        self.session.close();
        self.ui_state.editor_open = false;
        self.source_texture = None;

        let cmd_tx = self.cmd_tx.clone();
        let file_name = self.result_file_name();
        let png = result.png_bytes().to_vec();
        std::thread::spawn(move || {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("PNG", &["png"])
                .set_file_name(file_name)
                .save_file()
            {
                let _ = cmd_tx.send(WorkerCommand::WriteResult { path, png });
            }
        });
    }

    pub fn cancel_edit(&mut self) {
        self.session.cancel();
        self.session.close();
        self.ui_state.editor_open = false;
        self.source_texture = None;
    }
}

impl eframe::App for CropboxApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results(ctx);
        self.poll_events(ctx);

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::controls::show(ctx, self);
        panels::viewport::show(ctx, self);

        // About dialog
        if self.show_about {
            egui::Window::new("About Cropbox")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Cropbox");
                        ui.label("Pan/zoom avatar cropper");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}
