//! Daemon module for Blinker.
//!
//! This module contains the core daemon functionality:
//! - `timer`: named one-shot timers and the work/break scheduler
//! - `bridge`: menu events to settings and scheduler operations
//! - `host`: line-delimited JSON adapter on stdin/stdout
//!
//! [`Daemon`] owns all of them and serializes timer firings and menu events
//! through a single loop, so nothing else ever mutates cycle state.

pub mod bridge;
pub mod host;
pub mod timer;

pub use bridge::MenuEventBridge;
pub use timer::{NamedTimers, TimerFired, TimerScheduler};

use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::menubar::{MenuCommand, MenuEvent};
use crate::notification::NotificationGate;
use crate::settings::{SettingsError, SettingsStore};
use crate::types::{CycleConfig, CyclePhase, PermissionState};

// ============================================================================
// Daemon
// ============================================================================

/// The single owner of cycle state, preferences and notification permission.
pub struct Daemon {
    scheduler: TimerScheduler,
    fired_rx: mpsc::UnboundedReceiver<TimerFired>,
    store: SettingsStore,
    gate: Arc<NotificationGate>,
    bridge: MenuEventBridge,
}

impl Daemon {
    /// Creates an idle daemon. Call [`Daemon::startup`] before [`Daemon::run`].
    pub fn new(
        config: CycleConfig,
        store: SettingsStore,
        gate: NotificationGate,
        ack_tx: Sender<MenuCommand>,
    ) -> Self {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        Self {
            scheduler: TimerScheduler::new(config, fired_tx),
            fired_rx,
            store,
            gate: Arc::new(gate),
            bridge: MenuEventBridge::new(ack_tx),
        }
    }

    /// Starts the cycle and loads preferences.
    ///
    /// The cycle starts first so an unreadable settings file never delays
    /// the first work interval. A store that fails to initialize is logged
    /// and left uninitialized. Notification permission is resolved later,
    /// by [`Daemon::run`].
    pub fn startup(&mut self) {
        self.scheduler.start();

        match self.store.initialize() {
            Ok(()) => {
                if let Err(e) = self.bridge.sync_preferences(&self.store) {
                    tracing::warn!("Failed to sync preferences: {}", e);
                }
            }
            Err(e) => tracing::error!(path = %self.store.path().display(), "{}", e),
        }

        tracing::info!(phase = %self.scheduler.phase(), "Daemon started");
    }

    /// Resolves notification permission on a spawned task.
    ///
    /// Until the task completes the cached state stays `Unknown`, so firings
    /// handled meanwhile advance the cycle without notifying.
    pub fn resolve_permission(&self) -> JoinHandle<PermissionState> {
        let gate = Arc::clone(&self.gate);
        tokio::spawn(async move { gate.resolve().await })
    }

    /// Applies one menu event.
    ///
    /// # Errors
    ///
    /// Propagates store errors from preference toggles.
    pub fn handle_event(&mut self, event: &MenuEvent) -> Result<Option<MenuCommand>, SettingsError> {
        self.bridge
            .handle(event, &mut self.store, &mut self.scheduler)
    }

    /// Applies one timer firing and returns the resulting phase.
    ///
    /// Returns `None` for firings that were cancelled after being posted.
    pub fn handle_fired(&mut self, fired: TimerFired) -> Option<CyclePhase> {
        let phase = self.scheduler.on_fired(fired, &self.gate);
        if let Some(phase) = phase {
            tracing::info!(phase = %phase, "Cycle advanced");
        }
        phase
    }

    /// Waits for the next timer firing.
    pub async fn next_fired(&mut self) -> Option<TimerFired> {
        self.fired_rx.recv().await
    }

    /// Runs the event loop until `quit` arrives or Ctrl-C is pressed.
    ///
    /// Permission is resolved concurrently, so a pending prompt holds up
    /// neither firings nor menu events. When `events` closes the cycle keeps
    /// running until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if the Ctrl-C handler cannot be installed.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<MenuEvent>) -> Result<()> {
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);
        let mut resolving = self.resolve_permission();
        let mut resolved = false;
        let mut inbound_open = true;

        loop {
            tokio::select! {
                Some(fired) = self.fired_rx.recv() => {
                    self.handle_fired(fired);
                }
                result = &mut resolving, if !resolved => {
                    resolved = true;
                    if let Err(e) = result {
                        tracing::warn!("Notification permission task failed: {}", e);
                    }
                }
                event = events.recv(), if inbound_open => match event {
                    Some(event) if event.is_quit() => {
                        tracing::info!("Quit requested");
                        break;
                    }
                    Some(event) => {
                        if let Err(e) = self.handle_event(&event) {
                            tracing::error!(message = %event.message, "Menu event failed: {}", e);
                        }
                    }
                    None => {
                        tracing::info!("Menu surface closed; cycle keeps running");
                        inbound_open = false;
                    }
                },
                result = &mut shutdown => {
                    result.context("Failed to listen for Ctrl-C")?;
                    tracing::info!("Interrupted");
                    break;
                }
            }
        }

        if !resolved {
            resolving.abort();
        }
        self.scheduler.stop();
        Ok(())
    }

    /// Returns the scheduler.
    pub fn scheduler(&self) -> &TimerScheduler {
        &self.scheduler
    }

    /// Returns the settings store.
    pub fn store(&self) -> &SettingsStore {
        &self.store
    }
}

impl std::fmt::Debug for Daemon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Daemon")
            .field("scheduler", &self.scheduler)
            .field("store", &self.store)
            .field("gate", &self.gate)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menubar::MsgType;
    use crate::notification::{
        MockNotificationHost, NotificationError, NotificationHost, NotificationPayload,
    };
    use crate::types::TimerKey;
    use crossbeam_channel::{unbounded, Receiver};
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    const WORK: Duration = Duration::from_secs(60);
    const BREAK: Duration = Duration::from_secs(5);

    struct Fixture {
        daemon: Daemon,
        host: Arc<MockNotificationHost>,
        ack_rx: Receiver<MenuCommand>,
        dir: TempDir,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let host = Arc::new(MockNotificationHost::new());
        let (ack_tx, ack_rx) = unbounded();
        let daemon = Daemon::new(
            CycleConfig::new(WORK, BREAK),
            SettingsStore::new(dir.path().join("settings.json")),
            NotificationGate::new(host.clone()),
            ack_tx,
        );
        Fixture {
            daemon,
            host,
            ack_rx,
            dir,
        }
    }

    mod startup_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_startup_starts_cycle_and_syncs() {
            let mut f = fixture();

            f.daemon.startup();

            assert_eq!(f.daemon.scheduler().phase(), CyclePhase::Working);
            assert_eq!(
                f.daemon.scheduler().pending_duration(TimerKey::Main),
                Some(WORK)
            );
            assert!(f.daemon.store().is_initialized());
            let sent: Vec<_> = f.ack_rx.try_iter().collect();
            assert_eq!(sent.len(), 2);
            assert!(sent.iter().all(|c| c.msg_type == MsgType::Activate));
        }

        #[tokio::test(start_paused = true)]
        async fn test_corrupt_store_still_starts_cycle() {
            let mut f = fixture();
            let path = f.dir.path().join("settings.json");
            std::fs::write(&path, "{broken").unwrap();

            f.daemon.startup();

            assert!(f.daemon.scheduler().is_running());
            assert!(!f.daemon.store().is_initialized());
            assert!(f.ack_rx.try_iter().next().is_none());
            assert!(matches!(
                f.daemon.handle_event(&MenuEvent::new("playSound")),
                Err(SettingsError::NotInitialized)
            ));
            assert_eq!(std::fs::read_to_string(&path).unwrap(), "{broken");
        }
    }

    mod loop_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_fired_alternates_phases() {
            let mut f = fixture();
            f.daemon.startup();
            let permission = f.daemon.resolve_permission().await.unwrap();
            assert_eq!(permission, PermissionState::Granted);

            let fired = f.daemon.next_fired().await.unwrap();
            assert_eq!(f.daemon.handle_fired(fired), Some(CyclePhase::OnBreak));
            let fired = f.daemon.next_fired().await.unwrap();
            assert_eq!(f.daemon.handle_fired(fired), Some(CyclePhase::Working));

            assert_eq!(f.host.delivery_attempts(), 2);
        }

        #[tokio::test(start_paused = true)]
        async fn test_run_exits_on_quit() {
            let mut f = fixture();
            f.daemon.startup();
            f.ack_rx.try_iter().for_each(drop);
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(MenuEvent::new("toggleTimer")).unwrap();
            tx.send(MenuEvent::new("quit")).unwrap();

            f.daemon.run(rx).await.unwrap();

            let sent: Vec<_> = f.ack_rx.try_iter().collect();
            assert_eq!(sent, vec![MenuCommand::cycle(false)]);
        }

        #[tokio::test(start_paused = true)]
        async fn test_run_survives_failed_events() {
            let mut f = fixture();
            std::fs::write(f.dir.path().join("settings.json"), "{broken").unwrap();
            f.daemon.startup();
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(MenuEvent::new("playSound")).unwrap();
            tx.send(MenuEvent::new("launchOnStartup")).unwrap();
            tx.send(MenuEvent::new("toggleTimer")).unwrap();
            tx.send(MenuEvent::new("quit")).unwrap();

            f.daemon.run(rx).await.unwrap();

            let sent: Vec<_> = f.ack_rx.try_iter().collect();
            assert_eq!(sent, vec![MenuCommand::cycle(false)]);
        }

        #[tokio::test(start_paused = true)]
        async fn test_run_toggles_preferences() {
            let mut f = fixture();
            f.daemon.startup();
            f.ack_rx.try_iter().for_each(drop);
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(MenuEvent::new("playSound")).unwrap();
            tx.send(MenuEvent::new("showAbout")).unwrap();
            tx.send(MenuEvent::new("playSound")).unwrap();
            tx.send(MenuEvent::new("quit")).unwrap();

            f.daemon.run(rx).await.unwrap();

            let sent: Vec<_> = f.ack_rx.try_iter().collect();
            assert_eq!(
                sent,
                vec![
                    MenuCommand::new("playSound", MsgType::Deactivate),
                    MenuCommand::new("playSound", MsgType::Activate),
                ]
            );
        }

        #[tokio::test(start_paused = true)]
        async fn test_closed_inbound_keeps_cycle_running() {
            let mut f = fixture();
            f.daemon.startup();
            let (tx, rx) = mpsc::unbounded_channel::<MenuEvent>();
            drop(tx);

            let result =
                tokio::time::timeout(WORK * 3 + BREAK * 3, f.daemon.run(rx)).await;

            assert!(result.is_err());
            assert!(f.host.delivery_attempts() >= 5);
        }
    }

    // ------------------------------------------------------------------------
    // Permission Tests
    // ------------------------------------------------------------------------

    mod permission_tests {
        use super::*;

        const PROMPT_DELAY: Duration = Duration::from_millis(600);
        const SHORT_WORK: Duration = Duration::from_millis(100);

        /// A host whose permission prompt blocks until the user answers.
        struct SlowPromptHost {
            inner: MockNotificationHost,
        }

        impl NotificationHost for SlowPromptHost {
            fn permission_status(&self) -> PermissionState {
                self.inner.permission_status()
            }

            fn request_permission(&self) -> PermissionState {
                std::thread::sleep(PROMPT_DELAY);
                self.inner.request_permission()
            }

            fn deliver(&self, payload: &NotificationPayload) -> Result<(), NotificationError> {
                self.inner.deliver(payload)
            }
        }

        fn slow_prompt_daemon() -> (Daemon, Arc<SlowPromptHost>, Receiver<MenuCommand>, TempDir) {
            let dir = tempfile::tempdir().unwrap();
            let host = Arc::new(SlowPromptHost {
                inner: MockNotificationHost::with_permission(
                    PermissionState::Unknown,
                    PermissionState::Granted,
                ),
            });
            let (ack_tx, ack_rx) = unbounded();
            let daemon = Daemon::new(
                CycleConfig::new(SHORT_WORK, BREAK),
                SettingsStore::new(dir.path().join("settings.json")),
                NotificationGate::new(host.clone()),
                ack_tx,
            );
            (daemon, host, ack_rx, dir)
        }

        #[tokio::test]
        async fn test_firing_during_prompt_reaches_break() {
            let (mut daemon, host, _ack_rx, _dir) = slow_prompt_daemon();
            daemon.startup();
            let resolving = daemon.resolve_permission();

            let fired = daemon.next_fired().await.unwrap();

            assert_eq!(daemon.handle_fired(fired), Some(CyclePhase::OnBreak));
            assert!(!resolving.is_finished());
            assert_eq!(daemon.gate.permission(), PermissionState::Unknown);
            assert_eq!(host.inner.delivery_attempts(), 0);

            assert_eq!(resolving.await.unwrap(), PermissionState::Granted);
            assert!(daemon.gate.is_granted());
        }

        #[tokio::test]
        async fn test_startup_does_not_wait_for_prompt() {
            let (mut daemon, _host, _ack_rx, _dir) = slow_prompt_daemon();
            let started = Instant::now();

            daemon.startup();

            assert!(started.elapsed() < PROMPT_DELAY);
            assert_eq!(daemon.scheduler().phase(), CyclePhase::Working);
        }

        #[tokio::test]
        async fn test_run_handles_events_during_prompt() {
            let (mut daemon, _host, ack_rx, _dir) = slow_prompt_daemon();
            daemon.startup();
            ack_rx.try_iter().for_each(drop);
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(MenuEvent::new("toggleTimer")).unwrap();
            tx.send(MenuEvent::new("quit")).unwrap();
            let started = Instant::now();

            daemon.run(rx).await.unwrap();

            assert!(started.elapsed() < PROMPT_DELAY);
            assert_eq!(
                ack_rx.try_iter().collect::<Vec<_>>(),
                vec![MenuCommand::cycle(false)]
            );
        }
    }
}
