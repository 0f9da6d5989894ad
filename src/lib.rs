#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod buffer;
pub mod composite;
pub mod error;
pub mod event;
pub mod file_handler;
pub mod history;
pub mod panels;
pub mod pipeline;
pub mod selection;
pub mod settings;
pub mod state;
pub mod texture_manager;
pub mod view;
pub mod worker;

pub use app::EraserApp;
pub use buffer::{BufferRef, PixelBuffer, Rgba};
pub use composite::{composite, erase_dab};
pub use error::{EditError, EditResult, ExportError, LoadError};
pub use event::EditorEvent;
pub use history::HistoryStore;
pub use pipeline::{PipelineJob, PipelineOutput, erase_region};
pub use selection::{Mask, grow, smooth};
pub use settings::{BrushSettings, SelectionParams, ToolKind};
pub use state::{EditSession, EditorState, LiveSelection};
pub use view::ViewTransform;
pub use worker::PipelineWorker;
