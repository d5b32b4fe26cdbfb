//! Completion dispatch.
//!
//! Network work runs on the async runtime, but completions belong to the
//! context that owns the UI. A [`Dispatcher`] decides where a completion
//! runs. [`MainQueue`] hands completions to a [`MainLoop`] that the UI
//! thread drains; [`Immediate`] runs them wherever the work finished.

use tokio::sync::mpsc;

/// A unit of work to run on the dispatch context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Where completion callbacks run.
pub trait Dispatcher: Send + Sync {
    /// Schedule `job`. It must run exactly once, unless the context is gone.
    fn dispatch(&self, job: Job);
}

/// Runs jobs inline on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl Dispatcher for Immediate {
    fn dispatch(&self, job: Job) {
        job();
    }
}

/// Sending half of the main-context queue.
#[derive(Debug, Clone)]
pub struct MainQueue {
    tx: mpsc::UnboundedSender<Job>,
}

/// Receiving half of the main-context queue.
///
/// Whoever drives this loop is the main context: every job dispatched to
/// the paired [`MainQueue`] runs on the thread that calls
/// [`run_pending`](MainLoop::run_pending) or [`run_next`](MainLoop::run_next).
pub struct MainLoop {
    rx: mpsc::UnboundedReceiver<Job>,
}

/// Create a connected queue and loop.
pub fn main_queue() -> (MainQueue, MainLoop) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MainQueue { tx }, MainLoop { rx })
}

impl Dispatcher for MainQueue {
    fn dispatch(&self, job: Job) {
        if self.tx.send(job).is_err() {
            tracing::warn!("main loop is gone, dropping completion");
        }
    }
}

impl MainLoop {
    /// Run every job that is already queued, without waiting.
    ///
    /// Returns the number of jobs run. Suited to a UI frame tick.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Wait for the next job and run it.
    ///
    /// Returns `false` once every [`MainQueue`] has been dropped and the
    /// queue is drained.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Block the current thread, running jobs until all queues are dropped.
    ///
    /// Must not be called from within an async runtime.
    pub fn run(mut self) {
        while let Some(job) = self.rx.blocking_recv() {
            job();
        }
    }
}
