//! Background thread for live-selection updates on large images.
//!
//! The worker has a single-slot mailbox: submitting a job replaces any job
//! that has not started yet, so at most one job runs and at most one waits.
//! Results are tagged with the job's generation; the session decides whether
//! they are still wanted.

use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};

use crate::pipeline::{PipelineJob, PipelineOutput};

#[derive(Default)]
struct Slots {
    job: Option<PipelineJob>,
    output: Option<PipelineOutput>,
    busy: bool,
    shutdown: bool,
}

#[derive(Default)]
struct Shared {
    slots: Mutex<Slots>,
    wake: Condvar,
}

/// Runs [`PipelineJob`]s one at a time on a dedicated thread
pub struct PipelineWorker {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl PipelineWorker {
    /// Spawn the worker thread. `on_done` is called after every finished job,
    /// e.g. to request a repaint.
    pub fn spawn(on_done: impl Fn() + Send + 'static) -> std::io::Result<Self> {
        let shared = Arc::new(Shared::default());
        let thread_shared = shared.clone();
        let handle = std::thread::Builder::new()
            .name("pipeline-worker".to_owned())
            .spawn(move || run(&thread_shared, on_done))?;
        Ok(Self {
            shared,
            handle: Some(handle),
        })
    }

    /// Queue a job, superseding a queued job that has not started
    pub fn submit(&self, job: PipelineJob) {
        let mut slots = self.shared.slots.lock();
        if let Some(old) = slots.job.replace(job) {
            log::debug!("Superseded queued live update (generation {})", old.generation);
        }
        self.shared.wake.notify_one();
    }

    /// Take the latest finished result, if any
    pub fn try_take(&self) -> Option<PipelineOutput> {
        self.shared.slots.lock().output.take()
    }

    /// True while a job is queued or running
    pub fn is_busy(&self) -> bool {
        let slots = self.shared.slots.lock();
        slots.busy || slots.job.is_some()
    }
}

fn run(shared: &Shared, on_done: impl Fn()) {
    loop {
        let job = {
            let mut slots = shared.slots.lock();
            loop {
                if slots.shutdown {
                    return;
                }
                if let Some(job) = slots.job.take() {
                    slots.busy = true;
                    break job;
                }
                shared.wake.wait(&mut slots);
            }
        };

        let output = job.run();

        {
            let mut slots = shared.slots.lock();
            slots.busy = false;
            // An unread older result is simply replaced
            slots.output = Some(output);
        }
        on_done();
    }
}

impl Drop for PipelineWorker {
    fn drop(&mut self) {
        self.shared.slots.lock().shutdown = true;
        self.shared.wake.notify_all();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Pipeline worker panicked");
            }
        }
    }
}
