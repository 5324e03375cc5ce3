//! Timer scheduler for the work/break cycle.
//!
//! This module provides the core state machine:
//! - Two named, cancellable single-fire timers (`Main` and `Break`)
//! - State transitions (Working → OnBreak → Working, any → Idle)
//! - Start/stop/toggle of the cycle
//!
//! Timers are tokio tasks that sleep and then post a [`TimerFired`] message
//! on a channel. The owner of the scheduler receives those messages and
//! feeds them back through [`TimerScheduler::on_fired`], so every state
//! change happens on a single call path.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Duration;

use crate::notification::{NotificationGate, NotificationPayload};
use crate::types::{CycleConfig, CyclePhase, TimerKey};

// ============================================================================
// TimerFired
// ============================================================================

/// Posted by a timer task when its delay has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    /// Which timer fired
    pub key: TimerKey,
    /// Arming generation, used to discard firings of cancelled timers
    generation: u64,
}

// ============================================================================
// NamedTimers
// ============================================================================

#[derive(Debug)]
struct PendingTimer {
    handle: JoinHandle<()>,
    duration: Duration,
    generation: u64,
}

/// Two timer slots with at most one pending action each.
#[derive(Debug, Default)]
pub struct NamedTimers {
    main: Option<PendingTimer>,
    brk: Option<PendingTimer>,
    next_generation: u64,
}

impl NamedTimers {
    fn slot(&self, key: TimerKey) -> &Option<PendingTimer> {
        match key {
            TimerKey::Main => &self.main,
            TimerKey::Break => &self.brk,
        }
    }

    fn slot_mut(&mut self, key: TimerKey) -> &mut Option<PendingTimer> {
        match key {
            TimerKey::Main => &mut self.main,
            TimerKey::Break => &mut self.brk,
        }
    }

    /// Arms `key` to fire after `duration`, cancelling any action already
    /// pending on that key.
    ///
    /// Must be called within a Tokio runtime.
    pub fn arm(
        &mut self,
        key: TimerKey,
        duration: Duration,
        fired_tx: &mpsc::UnboundedSender<TimerFired>,
    ) {
        self.cancel(key);

        self.next_generation += 1;
        let fired = TimerFired {
            key,
            generation: self.next_generation,
        };
        let tx = fired_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            // The receiver is gone only when the owner is shutting down
            let _ = tx.send(fired);
        });

        *self.slot_mut(key) = Some(PendingTimer {
            handle,
            duration,
            generation: fired.generation,
        });
        tracing::debug!(key = %key, ?duration, "Timer armed");
    }

    /// Cancels the action pending on `key`.
    ///
    /// Returns false if the key was already idle.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        match self.slot_mut(key).take() {
            Some(pending) => {
                pending.handle.abort();
                tracing::debug!(key = %key, "Timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Returns true if an action is pending on `key`.
    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.slot(key).is_some()
    }

    /// Returns the delay of the action pending on `key`.
    pub fn pending_duration(&self, key: TimerKey) -> Option<Duration> {
        self.slot(key).as_ref().map(|pending| pending.duration)
    }

    /// Clears the slot a firing belongs to.
    ///
    /// Returns false if the firing is stale: its timer was cancelled or
    /// re-armed after the delay elapsed.
    fn consume(&mut self, fired: TimerFired) -> bool {
        let slot = self.slot_mut(fired.key);
        let current = slot
            .as_ref()
            .is_some_and(|pending| pending.generation == fired.generation);
        if current {
            *slot = None;
        }
        current
    }
}

impl Drop for NamedTimers {
    fn drop(&mut self) {
        self.cancel(TimerKey::Main);
        self.cancel(TimerKey::Break);
    }
}

// ============================================================================
// TimerScheduler
// ============================================================================

/// Drives the work/break alternation.
///
/// `running` is true exactly when one of the two timers is pending.
pub struct TimerScheduler {
    /// Fixed cycle durations
    config: CycleConfig,
    /// Main and break timer slots
    timers: NamedTimers,
    /// Whether the cycle is active
    running: bool,
    /// Channel the timer tasks post to
    fired_tx: mpsc::UnboundedSender<TimerFired>,
}

impl TimerScheduler {
    /// Creates an idle scheduler. Firings are posted to `fired_tx`.
    pub fn new(config: CycleConfig, fired_tx: mpsc::UnboundedSender<TimerFired>) -> Self {
        Self {
            config,
            timers: NamedTimers::default(),
            running: false,
            fired_tx,
        }
    }

    /// Starts a fresh work interval.
    ///
    /// Starting while already running restarts the work interval from zero
    /// and drops a break in progress.
    pub fn start(&mut self) {
        self.timers.cancel(TimerKey::Break);
        self.timers
            .arm(TimerKey::Main, self.config.work_interval, &self.fired_tx);
        self.running = true;
        tracing::info!(work_interval = ?self.config.work_interval, "Cycle started");
    }

    /// Stops the cycle, cancelling both timers.
    pub fn stop(&mut self) {
        self.timers.cancel(TimerKey::Main);
        self.timers.cancel(TimerKey::Break);
        if self.running {
            tracing::info!("Cycle stopped");
        }
        self.running = false;
    }

    /// Starts the cycle if it is stopped, stops it otherwise.
    ///
    /// Returns whether the cycle was running before the call.
    pub fn toggle(&mut self) -> bool {
        let was_running = self.running;
        if was_running {
            self.stop();
        } else {
            self.start();
        }
        was_running
    }

    /// Handles a timer firing: notifies, then arms the other timer.
    ///
    /// The next timer is armed whatever happened to the notification.
    /// Returns the new phase, or `None` for a stale firing.
    pub fn on_fired(&mut self, fired: TimerFired, gate: &NotificationGate) -> Option<CyclePhase> {
        if !self.timers.consume(fired) {
            tracing::debug!(key = %fired.key, "Ignoring stale timer firing");
            return None;
        }

        let (payload, next) = match fired.key {
            TimerKey::Main => (NotificationPayload::take_a_break(), TimerKey::Break),
            TimerKey::Break => (NotificationPayload::back_to_work(), TimerKey::Main),
        };

        tracing::info!(key = %fired.key, "{}", payload.title);
        gate.notify_if_permitted(&payload);

        self.timers
            .arm(next, self.config.interval_for(next), &self.fired_tx);
        Some(self.phase())
    }

    /// Returns true if the cycle is active.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns the current phase of the cycle.
    pub fn phase(&self) -> CyclePhase {
        if !self.running {
            CyclePhase::Idle
        } else if self.timers.is_pending(TimerKey::Break) {
            CyclePhase::OnBreak
        } else {
            CyclePhase::Working
        }
    }

    /// Returns true if the named timer is pending.
    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.timers.is_pending(key)
    }

    /// Returns the delay the named timer was armed with.
    pub fn pending_duration(&self, key: TimerKey) -> Option<Duration> {
        self.timers.pending_duration(key)
    }
}

impl std::fmt::Debug for TimerScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerScheduler")
            .field("config", &self.config)
            .field("running", &self.running)
            .field("timers", &self.timers)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
