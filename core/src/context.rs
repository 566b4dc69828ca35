//! # Execution-Context Adapter
//!
//! Native callbacks arrive on whatever thread the backend owns. Nothing
//! above the engine should care: the engine hands every notification to an
//! [`ExecutionContext`], which runs it on the caller-chosen context through
//! a single-consumer queue. Submission order per context is delivery order;
//! nothing is reordered or coalesced.
//!
//! A torn-down context fails pending and future posts with
//! [`DialError::ContextUnavailable`] instead of hanging the poster.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use dialr_common::error::DialError;

/// A unit of work posted to a context.
pub type Callback = Box<dyn FnOnce() + Send>;

struct Job {
    callback: Callback,
    done: Sender<()>,
}

/// Completes once the posted callback has actually run on its context.
///
/// If the context is torn down before the callback runs, waiting reports
/// [`DialError::ContextUnavailable`].
pub struct CompletionToken {
    rx: Receiver<()>,
}

impl CompletionToken {
    pub fn wait(self) -> Result<(), DialError> {
        self.rx.recv().map_err(|_| DialError::ContextUnavailable)
    }
}

/// "Run this callback on context X."
pub trait ExecutionContext: Send + Sync {
    /// Schedules `callback` on the context. Callbacks posted from one thread
    /// run in submission order.
    fn post(&self, callback: Callback) -> Result<CompletionToken, DialError>;

    /// Posts and blocks the calling thread until the callback has executed.
    ///
    /// For native-callback threads that must not proceed until a
    /// caller-owned handler has finished. Never call this from the context's
    /// own consumer thread.
    fn blocking_wait(&self, callback: Callback) -> Result<(), DialError> {
        self.post(callback)?.wait()
    }
}

/// A context backed by one dedicated worker thread.
pub struct ThreadContext {
    tx: Mutex<Option<Sender<Job>>>,
    stopped: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ThreadContext {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<Job>();
        let stopped = Arc::new(AtomicBool::new(false));
        let stop_flag = stopped.clone();

        let worker = std::thread::spawn(move || {
            while let Ok(job) = rx.recv() {
                if stop_flag.load(Ordering::Acquire) {
                    // Pending jobs fail: dropping the job drops its `done`
                    // sender, which wakes any waiter with an error.
                    continue;
                }
                (job.callback)();
                let _ = job.done.send(());
            }
        });

        Self {
            tx: Mutex::new(Some(tx)),
            stopped,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Tears the context down. Queued-but-unrun callbacks are discarded and
    /// their waiters observe [`DialError::ContextUnavailable`].
    pub fn shutdown(&self) {
        self.stopped.store(true, Ordering::Release);
        self.tx.lock().unwrap().take();
        if let Some(worker) = self.worker.lock().unwrap().take() {
            let _ = worker.join();
        }
    }
}

impl Default for ThreadContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionContext for ThreadContext {
    fn post(&self, callback: Callback) -> Result<CompletionToken, DialError> {
        let (done, rx) = mpsc::channel();
        let guard = self.tx.lock().unwrap();
        let tx = guard.as_ref().ok_or(DialError::ContextUnavailable)?;
        tx.send(Job { callback, done })
            .map_err(|_| DialError::ContextUnavailable)?;
        Ok(CompletionToken { rx })
    }
}

impl Drop for ThreadContext {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::Release);
        self.tx.get_mut().unwrap().take();
        if let Some(worker) = self.worker.get_mut().unwrap().take() {
            let _ = worker.join();
        }
    }
}

/// A context that runs callbacks on a tokio runtime.
///
/// One consumer task per context keeps delivery single-file; plain
/// `tokio::spawn` per callback would not preserve submission order.
pub struct TokioContext {
    tx: Mutex<Option<tokio::sync::mpsc::UnboundedSender<Job>>>,
    stopped: Arc<AtomicBool>,
}

impl TokioContext {
    pub fn new(handle: &tokio::runtime::Handle) -> Self {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Job>();
        let stopped = Arc::new(AtomicBool::new(false));
        let stop_flag = stopped.clone();

        handle.spawn(async move {
            while let Some(job) = rx.recv().await {
                if stop_flag.load(Ordering::Acquire) {
                    continue;
                }
                (job.callback)();
                let _ = job.done.send(());
            }
        });

        Self {
            tx: Mutex::new(Some(tx)),
            stopped,
        }
    }

    /// Builds a context on the current runtime. Panics outside one, same as
    /// `Handle::current()`.
    pub fn current() -> Self {
        Self::new(&tokio::runtime::Handle::current())
    }

    pub fn shutdown(&self) {
        self.stopped.store(true, Ordering::Release);
        self.tx.lock().unwrap().take();
    }
}

impl ExecutionContext for TokioContext {
    fn post(&self, callback: Callback) -> Result<CompletionToken, DialError> {
        let (done, rx) = mpsc::channel();
        let guard = self.tx.lock().unwrap();
        let tx = guard.as_ref().ok_or(DialError::ContextUnavailable)?;
        tx.send(Job { callback, done })
            .map_err(|_| DialError::ContextUnavailable)?;
        Ok(CompletionToken { rx })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_run_in_submission_order() {
        let context = ThreadContext::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let mut last = None;
        for i in 0..100usize {
            let seen = seen.clone();
            last = Some(
                context
                    .post(Box::new(move || seen.lock().unwrap().push(i)))
                    .unwrap(),
            );
        }
        last.unwrap().wait().unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn blocking_wait_returns_after_execution() {
        let context = ThreadContext::new();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();

        context
            .blocking_wait(Box::new(move || flag.store(true, Ordering::SeqCst)))
            .unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn shutdown_fails_new_posts() {
        let context = ThreadContext::new();
        context.shutdown();
        let result = context.post(Box::new(|| {}));
        assert!(matches!(result, Err(DialError::ContextUnavailable)));
    }

    #[tokio::test]
    async fn tokio_context_preserves_order() {
        let context = TokioContext::current();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let handle = tokio::task::spawn_blocking({
            let seen = seen.clone();
            move || {
                let mut last = None;
                for i in 0..50usize {
                    let seen = seen.clone();
                    last = Some(
                        context
                            .post(Box::new(move || seen.lock().unwrap().push(i)))
                            .unwrap(),
                    );
                }
                last.unwrap().wait().unwrap();
            }
        });
        handle.await.unwrap();

        assert_eq!(*seen.lock().unwrap(), (0..50).collect::<Vec<_>>());
    }
}
