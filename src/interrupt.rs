//! Cooperative interruption
//!
//! The controller wraps a cancellation token plus a registry of cleanup
//! callbacks. Cancellation is poll-based: the engine checks
//! [`InterruptController::is_interrupted`] at the top of its loop, so an
//! in-flight fetch always completes before the crawl actually stops.
//!
//! The controller is owned per crawl and passed in explicitly; there is no
//! process-global flag, which keeps tests isolated from each other.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Identifies a registered interrupt handler for later removal
pub type HandlerId = usize;

type Handler = Box<dyn Fn() + Send>;

/// Cancellation flag plus cleanup-callback registry for one crawl
pub struct InterruptController {
    token: CancellationToken,
    handlers: Mutex<Vec<(HandlerId, Handler)>>,
    next_id: AtomicUsize,
}

impl InterruptController {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            handlers: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(0),
        }
    }

    /// Registers a cleanup callback, invoked on the first interrupt
    ///
    /// Handlers run in registration order. A panicking handler is logged and
    /// swallowed so it cannot abort the shutdown sequence.
    pub fn on_interrupt<F>(&self, handler: F) -> HandlerId
    where
        F: Fn() + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.handlers
            .lock()
            .expect("interrupt handler registry poisoned")
            .push((id, Box::new(handler)));
        id
    }

    /// Deregisters a previously registered handler
    pub fn remove_handler(&self, id: HandlerId) {
        self.handlers
            .lock()
            .expect("interrupt handler registry poisoned")
            .retain(|(handler_id, _)| *handler_id != id);
    }

    /// Polls the interruption flag
    pub fn is_interrupted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A child token observing this controller's cancellation
    pub fn token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Signals an interruption
    ///
    /// On the first call the flag is set and every registered handler runs in
    /// registration order. Returns `true` if this call was the first signal;
    /// callers treat a second signal as a forceful abort (the binary exits
    /// with a distinct status).
    pub fn trigger(&self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.token.cancel();

        let handlers = self
            .handlers
            .lock()
            .expect("interrupt handler registry poisoned");
        for (id, handler) in handlers.iter() {
            if catch_unwind(AssertUnwindSafe(handler)).is_err() {
                tracing::warn!("Interrupt handler {} panicked during shutdown", id);
            }
        }

        true
    }
}

impl Default for InterruptController {
    fn default() -> Self {
        Self::new()
    }
}
