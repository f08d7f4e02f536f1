//! Pointer-inactivity timer that hides the playback chrome.
//!
//! One timer per mounted player. Every pointer movement replaces the pending
//! timer; when it expires a [`PlayerEvent::ChromeTimeout`] is posted back to
//! the controller loop carrying the generation it was armed with. The timer
//! holds only a weak sender, so it never keeps an abandoned player alive.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use super::events::PlayerEvent;

pub const DEFAULT_INACTIVITY_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug)]
pub struct InactivityMonitor {
    delay: Duration,
    sender: mpsc::WeakUnboundedSender<PlayerEvent>,
    timer: Option<JoinHandle<()>>,
    generation: u64,
}

impl InactivityMonitor {
    pub fn new(delay: Duration, sender: mpsc::WeakUnboundedSender<PlayerEvent>) -> Self {
        Self {
            delay,
            sender,
            timer: None,
            generation: 0,
        }
    }

    /// Cancels the pending hide and arms a fresh one.
    pub fn on_pointer_move(&mut self) {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);

        let Ok(runtime) = Handle::try_current() else {
            warn!("no async runtime, chrome will stay visible");
            return;
        };
        let generation = self.generation;
        let delay = self.delay;
        let sender = self.sender.clone();
        self.timer = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(sender) = sender.upgrade() {
                let _ = sender.send(PlayerEvent::ChromeTimeout { generation });
            }
        }));
    }

    /// Consumes a timer expiry. Returns `true` only for the expiry of the
    /// currently armed timer.
    pub fn fired(&mut self, generation: u64) -> bool {
        if self.timer.is_none() || generation != self.generation {
            trace!(generation, current = self.generation, "ignoring stale inactivity timer");
            return false;
        }
        self.timer = None;
        true
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Releases the timer. Safe to call any number of times.
    pub fn dispose(&mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for InactivityMonitor {
    fn drop(&mut self) {
        self.cancel();
    }
}
