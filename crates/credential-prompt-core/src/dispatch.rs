//! Running prompts on a designated prompt thread.
//!
//! Some surfaces must only be touched from one thread (a GUI main loop, a
//! terminal owned by one reader). [`UiThread`] owns such a thread and lets
//! any other thread run a job on it and block until the job is done.
//!
//! Jobs run one at a time in submission order, so two callers can never
//! have prompts open at the same moment. A job that panics on the prompt
//! thread resumes the panic on the calling thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle, ThreadId};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Error type for dispatching work to the prompt thread.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The prompt thread could not be started.
    #[error("failed to spawn prompt thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The prompt thread is no longer accepting work.
    #[error("prompt thread is closed")]
    Closed,
}

/// A dedicated thread that runs prompt jobs.
pub struct UiThread {
    sender: Option<mpsc::Sender<Job>>,
    thread_id: ThreadId,
    handle: Option<JoinHandle<()>>,
}

impl UiThread {
    /// Start the prompt thread.
    pub fn spawn(name: impl Into<String>) -> Result<Self, DispatchError> {
        // A single slot: callers block in `invoke_and_wait` anyway
        let (sender, mut receiver) = mpsc::channel::<Job>(1);

        let handle = thread::Builder::new()
            .name(name.into())
            .spawn(move || {
                while let Some(job) = receiver.blocking_recv() {
                    job();
                }
                debug!("Prompt thread queue closed");
            })
            .map_err(DispatchError::Spawn)?;

        Ok(Self {
            sender: Some(sender),
            thread_id: handle.thread().id(),
            handle: Some(handle),
        })
    }

    /// Whether the current thread is the prompt thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Run `job` on the prompt thread and wait for its result.
    ///
    /// Runs `job` inline when already on the prompt thread.
    ///
    /// Must not be called from inside an async runtime; use
    /// `spawn_blocking` there.
    pub fn invoke_and_wait<F, T>(&self, job: F) -> Result<T, DispatchError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        if self.is_current() {
            return Ok(job());
        }

        let sender = self.sender.as_ref().ok_or(DispatchError::Closed)?;
        let (result_tx, result_rx) = oneshot::channel::<Result<T, Box<dyn Any + Send>>>();

        let wrapped: Job = Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(job));
            // Caller gone means nobody wants the result
            let _ = result_tx.send(result);
        });

        sender
            .blocking_send(wrapped)
            .map_err(|_| DispatchError::Closed)?;

        match result_rx.blocking_recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(payload)) => panic::resume_unwind(payload),
            Err(_) => Err(DispatchError::Closed),
        }
    }
}

impl Drop for UiThread {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop
        self.sender.take();

        if let Some(handle) = self.handle.take() {
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                warn!("Prompt thread panicked");
            }
        }
    }
}

impl std::fmt::Debug for UiThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiThread")
            .field("thread_id", &self.thread_id)
            .field("open", &self.sender.is_some())
            .finish()
    }
}
