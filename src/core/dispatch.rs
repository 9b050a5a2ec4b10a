//! UI-affine dispatch: background completions marshaled onto the owner thread.
//!
//! The access core is owned by one logical thread (the one driving row reads
//! and pack installation). Background work — the actual load-more fetch, cache
//! population — finishes on other threads and must not touch the view state
//! directly. Instead it posts a job through a [`DispatchHandle`]; the owner
//! thread drains jobs with [`UiDispatcher::run_pending`] at its convenience.

#![allow(missing_docs)]

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::core::errors::{Result, WindowError};

/// A unit of work to run on the owner thread.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Completion callback for load-more requests. Invoked exactly once, on the
/// owner thread, whether the load succeeded, failed, or was superseded.
pub type OnLoaded = Box<dyn FnOnce() + Send + 'static>;

/// A no-op completion, for triggers that only care about the side effect.
#[must_use]
pub fn noop_on_loaded() -> OnLoaded {
    Box::new(|| {})
}

/// Cloneable sending side handed to background workers.
#[derive(Clone)]
pub struct DispatchHandle {
    tx: Sender<Job>,
}

impl DispatchHandle {
    /// Queue a job for the owner thread. Fails only if the dispatcher was
    /// dropped, which means the whole access core is shutting down.
    pub fn post(&self, job: Job) -> Result<()> {
        self.tx
            .send(job)
            .map_err(|_| WindowError::ChannelClosed {
                component: "ui-dispatcher",
            })
    }
}

/// Owner-thread side: drains queued jobs in arrival order.
pub struct UiDispatcher {
    tx: Sender<Job>,
    rx: Receiver<Job>,
}

impl Default for UiDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl UiDispatcher {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Handle for background threads to post completions through.
    #[must_use]
    pub fn handle(&self) -> DispatchHandle {
        DispatchHandle {
            tx: self.tx.clone(),
        }
    }

    /// Run every job queued so far. Returns the number of jobs executed.
    /// Jobs posted while draining are picked up in the same pass.
    pub fn run_pending(&self) -> usize {
        let mut executed = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            executed += 1;
        }
        executed
    }

    /// Block until one job arrives and run it. Test-oriented: lets a test
    /// wait for a background completion without spinning.
    pub fn run_one_blocking(&self) -> Result<()> {
        let job = self
            .rx
            .recv()
            .map_err(|_| WindowError::ChannelClosed {
                component: "ui-dispatcher",
            })?;
        job();
        Ok(())
    }
}
