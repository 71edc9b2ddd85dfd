use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::JoinHandle,
};

use thiserror::Error;

use crate::{
    config::Channel,
    workflow::{self, StatusSink, StatusUpdate},
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a build is already running")]
    AlreadyRunning,
    #[error("failed to start build worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Allows at most one build worker at a time.
#[derive(Debug, Clone, Default)]
pub struct Session {
    running: Arc<AtomicBool>,
}

/// Forwards posts to the UI sink and frees the session slot as soon as a
/// terminal update goes through, so a fresh start is accepted by the time
/// the UI re-enables its trigger.
struct GuardedSink<S> {
    inner: S,
    slot: SlotGuard,
}

impl<S: StatusSink> StatusSink for GuardedSink<S> {
    fn post(&self, update: StatusUpdate) {
        if update.finished {
            self.slot.release();
        }
        self.inner.post(update);
    }
}

struct SlotGuard {
    running: Arc<AtomicBool>,
    released: AtomicBool,
}

impl SlotGuard {
    // Releases at most once, so a late drop cannot free a slot that a
    // newer run has already claimed.
    fn release(&self) {
        if !self.released.swap(true, Ordering::SeqCst) {
            self.running.store(false, Ordering::SeqCst);
        }
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Starts the real build for `channel` on a background thread.
    pub fn start_build<S>(&self, channel: Channel, sink: S) -> Result<JoinHandle<()>, SessionError>
    where
        S: StatusSink + Send + 'static,
    {
        self.start_with(channel, sink, |channel, sink| {
            let _ = workflow::run(channel, sink);
        })
    }

    /// Claims the slot and runs `job` on a new worker thread. The slot is
    /// freed when `job` posts a finished update, or when the worker ends.
    pub fn start_with<S, F>(
        &self,
        channel: Channel,
        sink: S,
        job: F,
    ) -> Result<JoinHandle<()>, SessionError>
    where
        S: StatusSink + Send + 'static,
        F: FnOnce(Channel, &dyn StatusSink) + Send + 'static,
    {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!(%channel, "start rejected, build already running");
            return Err(SessionError::AlreadyRunning);
        }

        let guarded = GuardedSink {
            inner: sink,
            slot: SlotGuard {
                running: Arc::clone(&self.running),
                released: AtomicBool::new(false),
            },
        };
        let spawned = std::thread::Builder::new()
            .name("build-worker".to_string())
            .spawn(move || {
                tracing::info!(%channel, "build worker started");
                job(channel, &guarded);
            });
        // a failed spawn drops the closure, and with it the slot guard
        spawned.map_err(SessionError::Spawn)
    }
}
