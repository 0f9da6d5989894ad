use std::path::{Path, PathBuf};
use std::time::Instant;

use eframe::egui;

use crate::error::EditError;
use crate::file_handler::{self, DEFAULT_EXPORT_NAME, FileHandler};
use crate::panels::{central_panel, tools_panel};
use crate::settings::{SelectionParams, ToolKind};
use crate::state::{EditSession, Preferences};
use crate::texture_manager::TextureManager;
use crate::view::{ViewTransform, ZOOM_STEP};
use crate::worker::PipelineWorker;

/// Status line shown under the tools
#[derive(Debug, Clone)]
pub enum Status {
    Info(String),
    Error(String),
}

/// The desktop front end around an [`EditSession`].
pub struct EraserApp {
    pub(crate) session: EditSession,
    pub(crate) preferences: Preferences,
    pub(crate) view: ViewTransform,
    pub(crate) textures: TextureManager,
    file_handler: FileHandler,
    /// Runs live-selection updates off the UI thread when available
    worker: Option<PipelineWorker>,
    pub(crate) status: Option<Status>,
    pub(crate) open_path: String,
    pub(crate) export_path: String,
    pub(crate) show_settings: bool,
    /// Capacity being edited in the settings window
    pub(crate) capacity_input: usize,
    /// Showing the original while the compare button is held
    pub(crate) comparing: bool,
    /// Fit the view on the next canvas frame
    pub(crate) fit_pending: bool,
    /// The busy indicator for a queued wand click has been drawn
    busy_shown: bool,
}

impl EraserApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, initial_image: Option<PathBuf>) -> Self {
        let preferences = Preferences::load(cc.storage);

        let repaint_ctx = cc.egui_ctx.clone();
        let worker = match PipelineWorker::spawn(move || repaint_ctx.request_repaint()) {
            Ok(worker) => Some(worker),
            Err(err) => {
                log::warn!("Running live updates on the UI thread: {}", err);
                None
            }
        };

        let mut app = Self::with_parts(preferences, worker);
        if let Some(path) = initial_image {
            app.open_file(&path);
        }
        app
    }

    fn with_parts(preferences: Preferences, worker: Option<PipelineWorker>) -> Self {
        Self {
            session: EditSession::new(preferences.history_capacity),
            preferences,
            view: ViewTransform::default(),
            textures: TextureManager::new(8),
            file_handler: FileHandler::new(),
            worker,
            status: None,
            open_path: String::new(),
            export_path: DEFAULT_EXPORT_NAME.to_owned(),
            show_settings: false,
            capacity_input: preferences.history_capacity,
            comparing: false,
            fit_pending: false,
            busy_shown: false,
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub(crate) fn open_file(&mut self, path: &Path) {
        match file_handler::load_image_file(path) {
            Ok(buffer) => self.install_image(buffer),
            Err(err) => {
                log::error!("Failed to load {}: {}", path.display(), err);
                self.status = Some(Status::Error(format!("Could not load image: {}", err)));
            }
        }
    }

    fn install_image(&mut self, buffer: crate::buffer::PixelBuffer) {
        self.textures.clear_cache();
        self.session.load_image(buffer);
        self.fit_pending = true;
        self.status = None;
    }

    pub(crate) fn close_image(&mut self) {
        self.session.close_image();
        self.textures.clear_cache();
        self.view = ViewTransform::default();
    }

    pub(crate) fn export(&mut self) {
        let result = self
            .session
            .export_buffer()
            .map_err(|_| crate::error::ExportError::NoImage)
            .and_then(|buffer| file_handler::export_png(&buffer, Path::new(&self.export_path)));
        self.status = Some(match result {
            Ok(()) => Status::Info(format!("Saved {}", self.export_path)),
            Err(err) => {
                log::error!("Export failed: {}", err);
                Status::Error(format!("Export failed: {}", err))
            }
        });
    }

    pub(crate) fn set_tool(&mut self, tool: ToolKind) {
        self.session.set_tool(tool);
    }

    pub(crate) fn set_params(&mut self, params: SelectionParams) {
        self.session.params_changed(params, Instant::now());
    }

    pub(crate) fn undo(&mut self) {
        self.session.undo();
    }

    pub(crate) fn redo(&mut self) {
        self.session.redo();
    }

    pub(crate) fn reset_to_original(&mut self) {
        if let Err(err) = self.session.reset_to_original() {
            log::warn!("Reset failed: {}", err);
        }
    }

    pub(crate) fn apply_history_capacity(&mut self) {
        let applied = self.session.set_history_capacity(self.capacity_input);
        self.capacity_input = applied;
        self.preferences.history_capacity = applied;
    }

    pub(crate) fn zoom(&mut self, steps: f32) {
        self.view.zoom_by(steps * ZOOM_STEP);
    }

    /// Pointer pressed on the image at image coordinates (`x`, `y`)
    pub(crate) fn pointer_pressed(&mut self, x: f32, y: f32) {
        let result = match self.session.tool() {
            ToolKind::Brush => self.session.brush_down(x, y),
            ToolKind::MagicWand => {
                if x < 0.0 || y < 0.0 {
                    return;
                }
                let queued = self.session.request_wand_click(x.floor() as u32, y.floor() as u32);
                self.busy_shown = false;
                queued
            }
        };
        match result {
            Ok(()) | Err(EditError::SeedOutOfBounds { .. }) => {}
            Err(err) => log::warn!("Pointer press ignored: {}", err),
        }
    }

    /// Run a queued wand click once its busy indicator has been on screen
    fn run_pending_click(&mut self, ctx: &egui::Context) {
        if !self.session.is_busy() {
            return;
        }
        if !self.busy_shown {
            self.busy_shown = true;
            ctx.request_repaint();
            return;
        }
        if let Err(err) = self.session.run_pending_wand_click() {
            log::warn!("Wand click failed: {}", err);
        }
    }

    /// Hand due live updates to the worker (or run them inline) and collect results
    fn drive_live_updates(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        match &self.worker {
            Some(worker) => {
                if let Some(job) = self.session.take_due_job(now) {
                    worker.submit(job);
                }
                if let Some(output) = worker.try_take() {
                    self.session.commit_live_result(output);
                }
            }
            None => {
                self.session.poll(now);
            }
        }
        if let Some(wait) = self.session.next_live_update_in(now) {
            ctx.request_repaint_after(wait);
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        use egui::{Key, Modifiers};

        let (redo, undo, redo_y, brush, wand) = ctx.input_mut(|i| {
            (
                i.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z),
                i.consume_key(Modifiers::COMMAND, Key::Z),
                i.consume_key(Modifiers::COMMAND, Key::Y),
                i.consume_key(Modifiers::NONE, Key::B),
                i.consume_key(Modifiers::NONE, Key::W),
            )
        });

        if redo || redo_y {
            self.redo();
        } else if undo {
            self.undo();
        }
        if brush {
            self.set_tool(ToolKind::Brush);
        }
        if wand {
            self.set_tool(ToolKind::MagicWand);
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        self.file_handler.preview_files_being_dropped(ctx);
        if !self.file_handler.check_for_dropped_files(ctx) {
            return;
        }
        match self.file_handler.take_dropped_image(!self.session.has_image()) {
            Some(Ok(buffer)) => self.install_image(buffer),
            Some(Err(err)) => {
                log::error!("Failed to load dropped file: {}", err);
                self.status = Some(Status::Error(format!("Could not load image: {}", err)));
            }
            None => {}
        }
    }

    fn settings_window(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }
        let mut open = true;
        let mut save = false;
        egui::Window::new("Settings")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Undo steps:");
                    ui.add(egui::DragValue::new(&mut self.capacity_input).range(5..=100));
                });
                if ui.button("Save").clicked() {
                    save = true;
                }
            });
        if save {
            self.apply_history_capacity();
            open = false;
        }
        self.show_settings = open;
    }
}

impl eframe::App for EraserApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.preferences.save(storage);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.textures.begin_frame();
        self.handle_dropped_files(ctx);
        self.handle_shortcuts(ctx);
        self.run_pending_click(ctx);
        self.drive_live_updates(ctx);

        tools_panel(self, ctx);
        central_panel(self, ctx);
        self.settings_window(ctx);
    }
}
