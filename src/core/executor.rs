//! Automation execution context
//!
//! Every capability-facing call runs on one designated context. Callers on
//! any thread hand work over through an `AutomationExecutor` and are resumed
//! through a channel once it finishes.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Mutex, PoisonError};
use std::thread::JoinHandle;

use tokio::sync::{mpsc, oneshot};

use crate::shared::errors::{BridgeError, BridgeResult};

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// The context has shut down and will not run further jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorClosed;

pub trait AutomationExecutor: Send + Sync {
    /// Queue `job` to run on the automation context
    fn execute(&self, job: Job) -> Result<(), ExecutorClosed>;
}

/// Runs jobs synchronously on the calling thread
#[derive(Default, Clone, Copy)]
pub struct InlineExecutor;

impl AutomationExecutor for InlineExecutor {
    fn execute(&self, job: Job) -> Result<(), ExecutorClosed> {
        job();
        Ok(())
    }
}

/// One dedicated OS thread draining jobs in submission order.
///
/// Dropping the last handle stops accepting jobs and waits for the queued
/// ones to drain.
pub struct AutomationThread {
    sender: Option<mpsc::UnboundedSender<Job>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl AutomationThread {
    pub fn spawn(name: &str) -> BridgeResult<Self> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let thread_name = name.to_string();
        let handle = std::thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                tracing::debug!("[AutomationThread] {} started", thread_name);
                let context_name = thread_name.clone();
                runtime.block_on(async move {
                    while let Some(job) = receiver.recv().await {
                        // A panicking host binding must not take the context down with it
                        if catch_unwind(AssertUnwindSafe(job)).is_err() {
                            tracing::error!("[AutomationThread] job panicked on {}", context_name);
                        }
                    }
                });
                tracing::debug!("[AutomationThread] {} stopped", thread_name);
            })?;

        Ok(Self {
            sender: Some(sender),
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Stop accepting jobs and wait for the queued ones to drain
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for AutomationThread {
    fn drop(&mut self) {
        self.sender.take();

        let handle = self.handle.get_mut().unwrap_or_else(PoisonError::into_inner).take();
        let Some(handle) = handle else {
            return;
        };

        // The last handle can be released by a job on the context itself
        if handle.thread().id() == std::thread::current().id() {
            return;
        }
        if handle.join().is_err() {
            tracing::warn!("[AutomationThread] thread exited abnormally");
        }
    }
}

impl AutomationExecutor for AutomationThread {
    fn execute(&self, job: Job) -> Result<(), ExecutorClosed> {
        let Some(sender) = self.sender.as_ref() else {
            return Err(ExecutorClosed);
        };
        sender.send(job).map_err(|_| {
            tracing::warn!("[AutomationThread] job submitted after shutdown, dropping");
            ExecutorClosed
        })
    }
}

/// Run `f` on the automation context and await its result from any caller.
pub async fn run_on_automation_context<T, F>(executor: &dyn AutomationExecutor, f: F) -> BridgeResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    executor
        .execute(Box::new(move || {
            let _ = sender.send(f());
        }))
        .map_err(|_| BridgeError::Cancelled)?;

    receiver.await.map_err(|_| BridgeError::Cancelled)
}
