//! Ctrl-C handling.
//!
//! One listener owns the process interrupt signal. Each suspending operation
//! arms a fresh [`CancellationToken`]; the next interrupt cancels that token
//! and consumes it, so the following operation must arm again to become
//! interruptible. An interrupt that arrives while nothing is armed ends
//! [`Interrupts::listen`], which the binary treats as a request to quit.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug)]
struct Armed {
    token: CancellationToken,
    armed: bool,
}

/// Hands out one cancellation token per interruptible operation.
#[derive(Debug, Clone)]
pub struct Interrupts {
    state: Arc<Mutex<Armed>>,
}

impl Interrupts {
    /// Creates a listener with nothing armed.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(Armed {
                token: CancellationToken::new(),
                armed: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Armed> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Arms a fresh token for the next operation and returns it.
    ///
    /// A token armed earlier and never triggered is replaced; it will not be
    /// cancelled by later interrupts.
    pub fn arm(&self) -> CancellationToken {
        let mut state = self.lock();
        state.token = CancellationToken::new();
        state.armed = true;
        debug!("interrupt armed");
        state.token.clone()
    }

    /// Returns true if an operation is waiting for an interrupt.
    pub fn is_armed(&self) -> bool {
        self.lock().armed
    }

    /// Delivers one interrupt.
    ///
    /// Cancels and consumes the armed token. Returns false when nothing was
    /// armed.
    pub fn trigger(&self) -> bool {
        let mut state = self.lock();
        if !state.armed {
            return false;
        }
        state.armed = false;
        state.token.cancel();
        debug!("interrupt delivered");
        true
    }

    /// Forwards Ctrl-C to the armed token until an interrupt arrives with
    /// nothing armed, then returns.
    pub async fn listen(&self) {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Unable to listen for Ctrl-C: {}", e);
                // Without a signal handler the command simply runs to completion.
                std::future::pending::<()>().await;
            }
            if !self.trigger() {
                debug!("interrupt with nothing armed");
                return;
            }
        }
    }
}

impl Default for Interrupts {
    fn default() -> Self {
        Self::new()
    }
}
