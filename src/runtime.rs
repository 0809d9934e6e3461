//! Runtime - execution context and client teardown
//!
//! A client either owns a multi-thread tokio runtime (created at build time)
//! or borrows a caller's [`Handle`]. Shutdown stops the owned runtime in the
//! background, so it is safe from async code; a borrowed runtime keeps
//! running and the client is only marked closed.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::error::ApiError;

/// Shutdown signal broadcaster
#[derive(Clone)]
pub struct Shutdown {
    sender: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl Default for Shutdown {
    fn default() -> Self { Self::new() }
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self { sender, triggered: Arc::new(AtomicBool::new(false)) }
    }

    /// Subscribe to shutdown signal
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Trigger shutdown; returns false if it had already fired.
    pub fn trigger(&self) -> bool {
        if self.triggered.swap(true, Ordering::SeqCst) {
            return false;
        }
        let _ = self.sender.send(());
        true
    }

    /// Check if shutdown was triggered
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }
}

/// Worker pool every request of one client runs on.
pub struct ExecutionContext {
    handle: Handle,
    owned: Mutex<Option<Runtime>>,
    shutdown: Shutdown,
}

impl ExecutionContext {
    /// Create and own a multi-thread runtime.
    pub fn owned(worker_threads: Option<usize>, thread_name: &str) -> Result<Self, ApiError> {
        let mut builder = Builder::new_multi_thread();
        builder.enable_all().thread_name(thread_name);
        if let Some(n) = worker_threads {
            if n == 0 {
                return Err(ApiError::InvalidConfig("worker thread count must be at least 1".into()));
            }
            builder.worker_threads(n);
        }
        let runtime = builder
            .build()
            .map_err(|e| ApiError::InvalidConfig(format!("cannot start runtime: {e}")))?;
        tracing::debug!(thread_name, ?worker_threads, "started owned runtime");
        Ok(Self { handle: runtime.handle().clone(), owned: Mutex::new(Some(runtime)), shutdown: Shutdown::new() })
    }

    /// Run on a caller-provided runtime.
    pub fn external(handle: Handle) -> Self {
        Self { handle, owned: Mutex::new(None), shutdown: Shutdown::new() }
    }

    pub fn handle(&self) -> &Handle { &self.handle }

    pub fn owns_runtime(&self) -> bool {
        self.owned.lock().map(|g| g.is_some()).unwrap_or(false)
    }

    pub fn is_closed(&self) -> bool { self.shutdown.is_triggered() }

    pub fn shutdown_signal(&self) -> Shutdown { self.shutdown.clone() }

    pub fn spawn<F>(&self, future: F) -> Result<JoinHandle<F::Output>, ApiError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        if self.is_closed() {
            return Err(ApiError::Closed);
        }
        Ok(self.handle.spawn(future))
    }

    /// Idempotent. In-flight tasks on an owned runtime are dropped and resolve to `CLOSED`.
    pub fn shutdown(&self) {
        if !self.shutdown.trigger() {
            return;
        }
        let runtime = match self.owned.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match runtime {
            Some(rt) => {
                rt.shutdown_background();
                tracing::info!("client runtime stopped");
            }
            None => tracing::info!("client closed"),
        }
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) { self.shutdown() }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("owns_runtime", &self.owns_runtime())
            .field("closed", &self.is_closed())
            .finish()
    }
}
