//! Scoped ownership of spawned background tasks

use std::future::Future;

use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, warn};

/// Owns a spawned task and aborts it when dropped
#[derive(Debug)]
pub struct TaskGuard {
    name: String,
    handle: JoinHandle<()>,
}

impl TaskGuard {
    /// Spawn `future` on the current tokio runtime.
    ///
    /// Returns `None` when called outside a runtime; the caller keeps
    /// working without the background task.
    pub fn spawn<F>(name: impl Into<String>, future: F) -> Option<Self>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        match Handle::try_current() {
            Ok(runtime) => {
                debug!("Spawning {} task", name);
                Some(Self {
                    handle: runtime.spawn(future),
                    name,
                })
            }
            Err(e) => {
                warn!("Cannot spawn {} task outside a tokio runtime: {}", name, e);
                None
            }
        }
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!("Cancelling {} task", self.name);
            self.handle.abort();
        }
    }
}
