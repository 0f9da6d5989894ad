//! The editing session: current image, history and the tool state machine.
//!
//! `EditSession` owns everything the core needs and is driven by the UI
//! through discrete operations (or [`EditorEvent`]s via [`EditSession::handle`]).
//! Exactly one buffer is current at a time. History snapshots are immutable
//! `Arc`s and are never the buffer a brush stroke is painting into.
//!
//! # Live selection
//!
//! A wand click pushes a new snapshot and keeps the pre-click buffer as the
//! base of a [`LiveSelection`]. Parameter changes are debounced; when the
//! debounce expires the pipeline reruns against that base and overwrites the
//! top snapshot instead of pushing.
//!
//! ```rust,no_run
//! use std::time::Instant;
//! use eframe_eraser::{EditSession, PixelBuffer, SelectionParams};
//!
//! let mut session = EditSession::default();
//! session.load_image(PixelBuffer::filled(64, 64, [255, 0, 0, 255]).unwrap());
//! session.wand_click(0, 0).unwrap();
//! session.params_changed(SelectionParams::new(40, 1.0, 4), Instant::now());
//! session.poll(Instant::now());
//! ```
use std::time::{Duration, Instant};

use super::debounce::Debouncer;
use super::{EditorState, LiveSelection};
use crate::buffer::{BufferRef, PixelBuffer};
use crate::composite::erase_dab;
use crate::error::{EditError, EditResult};
use crate::event::EditorEvent;
use crate::history::{DEFAULT_CAPACITY, HistoryStore};
use crate::pipeline::{PipelineJob, PipelineOutput, erase_region};
use crate::settings::{BrushSettings, SelectionParams, ToolKind};

#[derive(Debug)]
pub struct EditSession {
    /// The image as loaded, target of reset-to-original
    original: Option<BufferRef>,
    /// The committed buffer, always equal to the history snapshot at the cursor
    current: Option<BufferRef>,
    history: HistoryStore,
    state: EditorState,
    tool: ToolKind,
    params: SelectionParams,
    brush: BrushSettings,
    debouncer: Debouncer,
    /// A validated wand click waiting for the busy indicator to show
    pending_click: Option<(u32, u32)>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EditSession {
    /// Creates an empty session. `history_capacity` is clamped to 5..=100.
    pub fn new(history_capacity: usize) -> Self {
        Self {
            original: None,
            current: None,
            history: HistoryStore::new(history_capacity),
            state: EditorState::Idle,
            tool: ToolKind::default(),
            params: SelectionParams::default(),
            brush: BrushSettings::default(),
            debouncer: Debouncer::default(),
            pending_click: None,
        }
    }

    /// Replace the session's debouncer, e.g. with a different window
    pub fn with_debouncer(mut self, debouncer: Debouncer) -> Self {
        self.debouncer = debouncer;
        self
    }

    fn transition_to(&mut self, new_state: EditorState) -> EditResult<()> {
        if !self.state.can_transition_to(&new_state) {
            return Err(EditError::InvalidTransition {
                from: self.state.name(),
                to: new_state.name(),
            });
        }
        log::trace!("State {} -> {}", self.state.name(), new_state.name());
        self.state = new_state;
        Ok(())
    }

    /// Drop the live selection and anything scheduled or in flight for it.
    /// A brush stroke in progress is abandoned.
    fn return_to_idle(&mut self) {
        self.debouncer.cancel();
        self.pending_click = None;
        self.state = EditorState::Idle;
    }

    fn require_current(&self) -> EditResult<BufferRef> {
        self.current.clone().ok_or(EditError::NoImage)
    }

    fn commit(&mut self, buffer: BufferRef) {
        self.history.push(buffer.clone());
        self.current = Some(buffer);
    }

    // ---- Image lifecycle ----

    /// Install a freshly decoded image. History restarts with it as the only entry.
    pub fn load_image(&mut self, buffer: PixelBuffer) {
        log::info!("Loaded {}x{} image", buffer.width(), buffer.height());
        self.return_to_idle();
        let buffer = buffer.into_ref();
        self.history.clear();
        self.original = Some(buffer.clone());
        self.commit(buffer);
    }

    /// Forget the image and all history
    pub fn close_image(&mut self) {
        self.return_to_idle();
        self.history.clear();
        self.original = None;
        self.current = None;
    }

    pub fn has_image(&self) -> bool {
        self.current.is_some()
    }

    /// Push the original image as a new history entry
    pub fn reset_to_original(&mut self) -> EditResult<()> {
        let original = self.original.clone().ok_or(EditError::NoImage)?;
        self.return_to_idle();
        self.commit(original);
        Ok(())
    }

    // ---- Tools and settings ----

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switch tools. Commits an unfinished stroke and drops the live selection.
    /// Re-selecting the active tool changes nothing.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tool == tool {
            return;
        }
        if self.state.is_drawing() {
            self.brush_up();
        }
        log::debug!("Tool changed to {}", tool.name());
        self.tool = tool;
        self.return_to_idle();
    }

    pub fn params(&self) -> SelectionParams {
        self.params
    }

    pub fn brush(&self) -> BrushSettings {
        self.brush
    }

    pub fn set_brush(&mut self, brush: BrushSettings) {
        self.brush = brush.clamped();
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn live_selection(&self) -> Option<&LiveSelection> {
        self.state.live_selection()
    }

    // ---- Brush ----

    /// Start a stroke at (`x`, `y`) and erase the first dab.
    pub fn brush_down(&mut self, x: f32, y: f32) -> EditResult<()> {
        let current = self.require_current()?;
        if self.state.is_drawing() {
            return Err(EditError::InvalidTransition {
                from: "Drawing",
                to: "Drawing",
            });
        }
        if self.state.is_wand_active() {
            self.return_to_idle();
        }
        // A stroke supersedes a wand click still waiting to run
        self.pending_click = None;

        let mut canvas = PixelBuffer::clone(&current);
        erase_dab(&mut canvas, x, y, &self.brush);
        self.transition_to(EditorState::Drawing { canvas })
    }

    /// Continue the stroke. Returns false when no stroke is in progress.
    pub fn brush_move(&mut self, x: f32, y: f32) -> bool {
        let brush = self.brush;
        match self.state.canvas_mut() {
            Some(canvas) => {
                erase_dab(canvas, x, y, &brush);
                true
            }
            None => false,
        }
    }

    /// Finish the stroke and push it. Returns false when no stroke was in progress.
    pub fn brush_up(&mut self) -> bool {
        if !self.state.is_drawing() {
            return false;
        }
        if let EditorState::Drawing { canvas } = std::mem::take(&mut self.state) {
            self.commit(canvas.into_ref());
        }
        true
    }

    // ---- Magic wand ----

    /// Validate a wand click and queue it. The UI shows its busy indicator
    /// while [`is_busy`](Self::is_busy), then calls
    /// [`run_pending_wand_click`](Self::run_pending_wand_click).
    pub fn request_wand_click(&mut self, x: u32, y: u32) -> EditResult<()> {
        let current = self.require_current()?;
        if !current.contains(x, y) {
            log::warn!("Wand click outside image at ({}, {})", x, y);
            return Err(EditError::SeedOutOfBounds {
                x,
                y,
                width: current.width(),
                height: current.height(),
            });
        }
        if self.state.is_drawing() {
            return Err(EditError::InvalidTransition {
                from: "Drawing",
                to: "WandActive",
            });
        }
        self.pending_click = Some((x, y));
        Ok(())
    }

    /// True between a queued wand click and its execution
    pub fn is_busy(&self) -> bool {
        self.pending_click.is_some()
    }

    /// Run a queued wand click: erase the region from the current buffer,
    /// push the result and make it the new live selection.
    /// Returns false if nothing was queued.
    pub fn run_pending_wand_click(&mut self) -> EditResult<bool> {
        let Some((x, y)) = self.pending_click.take() else {
            return Ok(false);
        };
        if self.state.is_drawing() {
            return Err(EditError::InvalidTransition {
                from: "Drawing",
                to: "WandActive",
            });
        }
        let base = self.require_current()?;
        let result = erase_region(&base, x, y, &self.params)?;

        // A new seed ends the previous live selection
        self.return_to_idle();
        self.commit(result.into_ref());
        self.transition_to(EditorState::WandActive {
            live: LiveSelection {
                seed_x: x,
                seed_y: y,
                base,
            },
        })?;
        Ok(true)
    }

    /// Queue and immediately run a wand click
    pub fn wand_click(&mut self, x: u32, y: u32) -> EditResult<()> {
        self.request_wand_click(x, y)?;
        self.run_pending_wand_click().map(|_| ())
    }

    /// Store new selection parameters. While a live selection exists this
    /// (re)schedules its recomputation and returns the new generation.
    pub fn params_changed(&mut self, params: SelectionParams, now: Instant) -> Option<u64> {
        self.params = params.clamped();
        if self.state.is_wand_active() {
            Some(self.debouncer.schedule(now))
        } else {
            None
        }
    }

    /// Hand out the due live update as a job, for running off the UI thread.
    pub fn take_due_job(&mut self, now: Instant) -> Option<PipelineJob> {
        let live = self.state.live_selection()?.clone();
        let generation = self.debouncer.take_due(now)?;
        Some(PipelineJob {
            generation,
            base: live.base,
            seed: (live.seed_x, live.seed_y),
            params: self.params,
        })
    }

    /// Accept the result of a live update if it is still the newest one.
    /// Returns true if the current buffer changed.
    pub fn commit_live_result(&mut self, output: PipelineOutput) -> bool {
        if !self.state.is_wand_active() || !self.debouncer.is_current(output.generation) {
            log::debug!("Discarding stale live update (generation {})", output.generation);
            return false;
        }
        match output.result {
            Ok(buffer) => {
                let buffer = buffer.into_ref();
                self.history.replace_top(buffer.clone());
                self.current = Some(buffer);
                true
            }
            Err(err) => {
                log::warn!("Live update failed: {}", err);
                false
            }
        }
    }

    /// Run a due live update inline. Returns true if the current buffer changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.take_due_job(now) {
            Some(job) => {
                let output = job.run();
                self.commit_live_result(output)
            }
            None => false,
        }
    }

    /// How long until a scheduled live update is due
    pub fn next_live_update_in(&self, now: Instant) -> Option<Duration> {
        if self.state.is_wand_active() {
            self.debouncer.time_until_due(now)
        } else {
            None
        }
    }

    // ---- History ----

    /// Step back in history. Abandons a stroke in progress and the live selection.
    pub fn undo(&mut self) -> bool {
        self.return_to_idle();
        match self.history.undo() {
            Some(buffer) => {
                self.current = Some(buffer);
                true
            }
            None => false,
        }
    }

    /// Step forward in history. Abandons a stroke in progress and the live selection.
    pub fn redo(&mut self) -> bool {
        self.return_to_idle();
        match self.history.redo() {
            Some(buffer) => {
                self.current = Some(buffer);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Change the history capacity; returns the clamped value actually used
    pub fn set_history_capacity(&mut self, n: usize) -> usize {
        let applied = self.history.set_capacity(n);
        log::info!("History capacity set to {}", applied);
        if let Some(buffer) = self.history.current() {
            self.current = Some(buffer);
        }
        applied
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    // ---- Output ----

    /// The buffer to display, including an unfinished stroke
    pub fn current_buffer(&self) -> Option<&PixelBuffer> {
        self.state.canvas().or(self.current.as_deref())
    }

    pub fn original_buffer(&self) -> Option<&PixelBuffer> {
        self.original.as_deref()
    }

    /// The committed result, for encoding and saving
    pub fn export_buffer(&self) -> EditResult<BufferRef> {
        self.require_current()
    }

    // ---- Event dispatch ----

    /// Apply one input event
    pub fn handle(&mut self, event: EditorEvent, now: Instant) -> EditResult<()> {
        log::trace!("Handling {}", event.name());
        match event {
            EditorEvent::BrushDown { x, y } => self.brush_down(x, y)?,
            EditorEvent::BrushMove { x, y } => {
                self.brush_move(x, y);
            }
            EditorEvent::BrushUp => {
                self.brush_up();
            }
            EditorEvent::WandClick { x, y } => self.wand_click(x, y)?,
            EditorEvent::ParamsChanged(params) => {
                self.params_changed(params, now);
            }
            EditorEvent::BrushChanged(brush) => self.set_brush(brush),
            EditorEvent::ToolChanged(tool) => self.set_tool(tool),
            EditorEvent::Undo => {
                self.undo();
            }
            EditorEvent::Redo => {
                self.redo();
            }
            EditorEvent::ResetToOriginal => self.reset_to_original()?,
            EditorEvent::SetHistoryCapacity(n) => {
                self.set_history_capacity(n);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(width: u32, height: u32) -> EditSession {
        let mut session = EditSession::default();
        session.load_image(PixelBuffer::filled(width, height, [255, 0, 0, 255]).unwrap());
        session
    }

    #[test]
    fn test_operations_need_an_image() {
        let mut session = EditSession::default();
        assert_eq!(session.wand_click(0, 0), Err(EditError::NoImage));
        assert_eq!(session.brush_down(0.0, 0.0), Err(EditError::NoImage));
        assert_eq!(session.reset_to_original(), Err(EditError::NoImage));
        assert!(session.export_buffer().is_err());
        assert!(!session.undo());
    }

    #[test]
    fn test_busy_until_pending_click_runs() {
        let mut session = session_with(4, 4);
        session.request_wand_click(1, 1).unwrap();
        assert!(session.is_busy());
        // Nothing happened yet
        assert_eq!(session.history().len(), 1);

        assert!(session.run_pending_wand_click().unwrap());
        assert!(!session.is_busy());
        assert_eq!(session.history().len(), 2);
        assert!(!session.run_pending_wand_click().unwrap());
    }

    #[test]
    fn test_brush_down_twice_is_rejected() {
        let mut session = session_with(4, 4);
        session.brush_down(1.0, 1.0).unwrap();
        assert!(matches!(
            session.brush_down(2.0, 2.0),
            Err(EditError::InvalidTransition { .. })
        ));
        assert!(session.brush_up());
        assert!(!session.brush_up());
    }

    #[test]
    fn test_wand_click_while_drawing_is_rejected() {
        let mut session = session_with(4, 4);
        session.brush_down(1.0, 1.0).unwrap();
        assert!(session.wand_click(0, 0).is_err());
        assert!(session.state().is_drawing());
    }

    #[test]
    fn test_pending_click_never_runs_over_a_stroke() {
        let mut session = session_with(8, 8);
        session.brush_down(4.0, 4.0).unwrap();
        session.pending_click = Some((0, 0));

        assert!(matches!(
            session.run_pending_wand_click(),
            Err(EditError::InvalidTransition { .. })
        ));
        assert!(!session.is_busy());
        assert!(session.state().is_drawing());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_params_change_without_live_selection_only_stores() {
        let mut session = session_with(4, 4);
        let params = SelectionParams::new(55, 0.5, 3);
        assert_eq!(session.params_changed(params, Instant::now()), None);
        assert_eq!(session.params(), params);
        assert!(session.next_live_update_in(Instant::now()).is_none());
    }
}
