//! Playback controller for one mounted video player.
//!
//! The controller exclusively owns the [`PlaybackState`], the engine, the
//! fullscreen coordinator, the inactivity timer and the checkpoint persister.
//! Everything else talks to it through [`PlayerEvent`]s, either directly via
//! the `&mut self` command methods or through a [`PlayerHandle`].

pub mod checkpoint;
pub mod engine;
pub mod events;
pub mod fullscreen;
pub mod inactivity;
pub mod reconcile;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::PlayerConfig;
use crate::overlay::Overlay;
use crate::player::PlaybackState;
use checkpoint::{Checkpoint, CheckpointPersister, CheckpointStore};
use engine::{EngineCommand, EngineEvent, MediaEngine, SeekUnit};
use events::{Key, PlayerEvent, PlayerHandle};
use fullscreen::{FullscreenCoordinator, HostFullscreen, SurfaceId};
use inactivity::InactivityMonitor;
use reconcile::ProgressReconciler;

#[derive(thiserror::Error, Debug)]
pub enum PlaybackError {
    #[error("player has been unmounted")]
    Closed,
    #[error("invalid seek target: {0}")]
    InvalidSeek(f64),
}

/// What the parent supplies when mounting a player.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSource {
    pub url: String,
    /// Backend id of the film. Anything negative disables resume points.
    pub media_id: Option<i64>,
    pub surface: SurfaceId,
}

impl MediaSource {
    pub fn new(url: impl Into<String>, media_id: Option<i64>) -> Self {
        Self {
            url: url.into(),
            media_id,
            surface: SurfaceId("player".to_string()),
        }
    }
}

/// Whether the event loop should keep going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Unmount,
}

/// Owns one mounted player. Teardown happens exactly once: through
/// [`PlaybackController::unmount`], at the end of [`PlaybackController::run`],
/// or when the controller is dropped, e.g. because the `run` future was
/// cancelled.
pub struct PlaybackController {
    media: MediaSource,
    state: PlaybackState,
    reconciler: ProgressReconciler,
    engine: Box<dyn MediaEngine>,
    fullscreen: FullscreenCoordinator,
    monitor: InactivityMonitor,
    persister: CheckpointPersister,
    receiver: mpsc::UnboundedReceiver<PlayerEvent>,
    unmounted: bool,
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("media", &self.media)
            .field("state", &self.state)
            .field("monitor", &self.monitor)
            .field("persister", &self.persister)
            .finish_non_exhaustive()
    }
}

impl PlaybackController {
    /// Mounts a player for `media`, returning the parent's handle and the
    /// controller itself.
    pub fn new(
        media: MediaSource,
        config: &PlayerConfig,
        engine: Box<dyn MediaEngine>,
        host: Box<dyn HostFullscreen>,
        store: Arc<dyn CheckpointStore>,
    ) -> (PlayerHandle, PlaybackController) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let monitor = InactivityMonitor::new(config.inactivity_delay, sender.downgrade());
        let controller = PlaybackController {
            media,
            state: PlaybackState::new(config.initial_volume, config.looping),
            reconciler: ProgressReconciler::new(),
            engine,
            fullscreen: FullscreenCoordinator::new(host),
            monitor,
            persister: CheckpointPersister::new(store, config.checkpoint_dead_zone),
            receiver,
            unmounted: false,
        };
        (PlayerHandle::new(sender), controller)
    }

    /// Reports every saved resume point on `saved`.
    pub fn notify_checkpoints(mut self, saved: mpsc::UnboundedSender<Checkpoint>) -> Self {
        self.persister.set_notifier(saved);
        self
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn media(&self) -> &MediaSource {
        &self.media
    }

    pub fn reconciler(&self) -> &ProgressReconciler {
        &self.reconciler
    }

    pub fn overlay(&self) -> Overlay {
        Overlay::render(&self.state)
    }

    fn command(&mut self, command: EngineCommand) {
        debug!(?command, "engine command");
        self.engine.execute(command);
    }

    pub fn play_pause(&mut self) {
        self.state = self.state.toggled();
        let command = if self.state.playing {
            EngineCommand::Play
        } else {
            EngineCommand::Pause
        };
        self.command(command);
    }

    pub fn play(&mut self) {
        self.state = self.state.with_playing(true);
        self.command(EngineCommand::Play);
    }

    pub fn pause(&mut self) {
        self.state = self.state.with_playing(false);
        self.command(EngineCommand::Pause);
    }

    pub fn on_engine_play(&mut self) {
        self.state = self.state.with_playing(true);
    }

    pub fn on_engine_pause(&mut self) {
        self.state = self.state.with_playing(false);
    }

    pub fn on_engine_progress(&mut self, fraction: f64) {
        self.state = self.reconciler.reconcile(self.state, fraction);
    }

    pub fn on_engine_duration(&mut self, seconds: f64) {
        let next = self.state.with_duration(seconds);
        if next == self.state && seconds != self.state.duration {
            warn!(
                known = self.state.duration,
                reported = seconds,
                "ignoring duration report"
            );
        }
        self.state = next;
    }

    /// Rewinds and restarts when looping. During a drag only playback is
    /// restarted; the pending commit decides where it lands.
    pub fn on_engine_ended(&mut self) {
        self.state = self.state.ended();
        if !self.state.playing {
            return;
        }
        if !self.state.seeking {
            self.command(EngineCommand::Seek {
                amount: 0.0,
                unit: SeekUnit::Fraction,
            });
        }
        self.command(EngineCommand::Play);
    }

    pub fn seek_start(&mut self) {
        self.state = self.state.seek_started();
    }

    pub fn seek_change(&mut self, fraction: f64) {
        self.state = self.state.seek_moved(fraction);
    }

    pub fn seek_commit(&mut self, fraction: f64) {
        self.state = self.state.seek_committed(fraction);
        if !fraction.is_finite() {
            warn!(fraction, "dropping seek to malformed position");
            return;
        }
        self.command(EngineCommand::Seek {
            amount: fraction.clamp(0.0, 1.0),
            unit: SeekUnit::Fraction,
        });
    }

    /// Seek issued from outside the overlay, e.g. resuming from a checkpoint.
    pub fn seek_to(&mut self, amount: f64, unit: SeekUnit) {
        if !amount.is_finite() || amount < 0.0 {
            warn!(amount, ?unit, "dropping invalid seek");
            return;
        }
        let amount = match unit {
            SeekUnit::Fraction => amount.min(1.0),
            SeekUnit::Seconds => amount,
        };
        self.command(EngineCommand::Seek { amount, unit });
    }

    pub fn toggle_mute(&mut self) {
        self.state = self.state.mute_toggled();
        self.command(EngineCommand::SetMuted {
            muted: self.state.muted,
        });
    }

    pub fn set_volume(&mut self, level: f64) {
        let next = self.state.with_volume(level);
        if next == self.state {
            return;
        }
        self.state = next;
        self.command(EngineCommand::SetVolume {
            volume: self.state.volume,
        });
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.state = self.state.with_loop(looping);
    }

    pub fn toggle_fullscreen(&mut self) {
        self.set_fullscreen(!self.state.fullscreen);
    }

    /// Flips the flag first so the overlay follows the user's intent even if
    /// the host cannot comply.
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.state = self.state.with_fullscreen(fullscreen);
        self.fullscreen.apply(fullscreen, &self.media.surface);
    }

    /// The host left or entered fullscreen on its own.
    pub fn on_host_fullscreen_changed(&mut self, fullscreen: bool) {
        if self.state.fullscreen != fullscreen {
            debug!(fullscreen, "host changed fullscreen");
        }
        self.state = self.state.with_fullscreen(fullscreen);
    }

    pub fn on_key(&mut self, key: Key) {
        match key {
            Key::F11 => self.toggle_fullscreen(),
            Key::Escape if self.state.fullscreen => self.set_fullscreen(false),
            Key::Escape => {}
        }
    }

    /// Fullscreen, then play.
    pub fn start(&mut self) {
        self.set_fullscreen(true);
        self.play();
    }

    pub fn resume(&mut self, seconds: f64) {
        if !seconds.is_finite() || seconds <= 0.0 {
            debug!(seconds, "no resume point");
            return;
        }
        self.seek_to(seconds, SeekUnit::Seconds);
        self.start();
    }

    pub fn on_pointer_move(&mut self) {
        self.state = self.state.chrome_shown();
        self.monitor.on_pointer_move();
    }

    fn on_chrome_timeout(&mut self, generation: u64) {
        if self.monitor.fired(generation) {
            self.state = self.state.chrome_hidden();
        }
    }

    pub fn handle(&mut self, event: PlayerEvent) -> Flow {
        match event {
            PlayerEvent::Engine(event) => match event {
                EngineEvent::Play => self.on_engine_play(),
                EngineEvent::Pause => self.on_engine_pause(),
                EngineEvent::Ended => self.on_engine_ended(),
                EngineEvent::Progress { played } => self.on_engine_progress(played),
                EngineEvent::Duration { seconds } => self.on_engine_duration(seconds),
            },
            PlayerEvent::PlayPause => self.play_pause(),
            PlayerEvent::Play => self.play(),
            PlayerEvent::Pause => self.pause(),
            PlayerEvent::SeekStart => self.seek_start(),
            PlayerEvent::SeekChange { fraction } => self.seek_change(fraction),
            PlayerEvent::SeekCommit { fraction } => self.seek_commit(fraction),
            PlayerEvent::ToggleMute => self.toggle_mute(),
            PlayerEvent::SetVolume { level } => self.set_volume(level),
            PlayerEvent::SetLoop { looping } => self.set_loop(looping),
            PlayerEvent::ToggleFullscreen => self.toggle_fullscreen(),
            PlayerEvent::SetFullscreen { fullscreen } => self.set_fullscreen(fullscreen),
            PlayerEvent::SeekTo { amount, unit } => self.seek_to(amount, unit),
            PlayerEvent::Start => self.start(),
            PlayerEvent::Resume { seconds } => self.resume(seconds),
            PlayerEvent::PointerMove => self.on_pointer_move(),
            PlayerEvent::Key { key } => self.on_key(key),
            PlayerEvent::HostFullscreenChanged { fullscreen } => {
                self.on_host_fullscreen_changed(fullscreen)
            }
            PlayerEvent::ChromeTimeout { generation } => self.on_chrome_timeout(generation),
            PlayerEvent::Unmount => return Flow::Unmount,
        }
        Flow::Continue
    }

    /// Handles everything already queued without waiting for more.
    pub fn drain_pending(&mut self) -> Flow {
        while let Ok(event) = self.receiver.try_recv() {
            if self.handle(event) == Flow::Unmount {
                return Flow::Unmount;
            }
        }
        Flow::Continue
    }

    /// Runs the event loop until the parent unmounts the player or drops
    /// every handle, calling `on_render` whenever the overlay changes.
    pub async fn run<F>(mut self, mut on_render: F) -> Option<JoinHandle<()>>
    where
        F: FnMut(&Overlay),
    {
        let mut last = self.overlay();
        on_render(&last);
        while let Some(event) = self.receiver.recv().await {
            if self.handle(event) == Flow::Unmount {
                break;
            }
            let overlay = self.overlay();
            if overlay != last {
                on_render(&overlay);
                last = overlay;
            }
        }
        self.unmount()
    }

    /// Tears the player down: releases the timer and fires the resume-point
    /// save with the last known position.
    pub fn unmount(mut self) -> Option<JoinHandle<()>> {
        self.teardown()
    }

    fn teardown(&mut self) -> Option<JoinHandle<()>> {
        if self.unmounted {
            return None;
        }
        self.unmounted = true;
        self.monitor.dispose();
        debug!(url = %self.media.url, played = self.state.played, "unmounting player");
        self.persister
            .persist(self.media.media_id, self.state.played, self.state.duration)
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        let _ = self.teardown();
    }
}
