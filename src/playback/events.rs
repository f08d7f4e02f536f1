//! Events flowing into the controller loop and the handle parent views use
//! to drive playback without touching controller state directly.

use serde::Deserialize;
use tokio::sync::mpsc;

use super::engine::{EngineEvent, SeekUnit};
use super::PlaybackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Key {
    F11,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlayerEvent {
    Engine(EngineEvent),
    PlayPause,
    Play,
    Pause,
    SeekStart,
    SeekChange { fraction: f64 },
    SeekCommit { fraction: f64 },
    ToggleMute,
    SetVolume { level: f64 },
    SetLoop { looping: bool },
    ToggleFullscreen,
    SetFullscreen { fullscreen: bool },
    SeekTo {
        amount: f64,
        #[serde(default)]
        unit: SeekUnit,
    },
    /// Play from the start, fullscreen.
    Start,
    /// Jump to a saved resume point (seconds) and start.
    Resume { seconds: f64 },
    PointerMove,
    Key { key: Key },
    HostFullscreenChanged { fullscreen: bool },
    /// Inactivity timer expiry; only the latest generation counts.
    #[serde(skip)]
    ChromeTimeout { generation: u64 },
    Unmount,
}

/// Command interface handed to the parent view.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    sender: mpsc::UnboundedSender<PlayerEvent>,
}

impl PlayerHandle {
    pub(crate) fn new(sender: mpsc::UnboundedSender<PlayerEvent>) -> Self {
        Self { sender }
    }

    pub fn send(&self, event: PlayerEvent) -> Result<(), PlaybackError> {
        self.sender.send(event).map_err(|_| PlaybackError::Closed)
    }

    pub fn play(&self) -> Result<(), PlaybackError> {
        self.send(PlayerEvent::Play)
    }

    pub fn pause(&self) -> Result<(), PlaybackError> {
        self.send(PlayerEvent::Pause)
    }

    pub fn set_fullscreen(&self, fullscreen: bool) -> Result<(), PlaybackError> {
        self.send(PlayerEvent::SetFullscreen { fullscreen })
    }

    pub fn seek_to(&self, amount: f64, unit: SeekUnit) -> Result<(), PlaybackError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(PlaybackError::InvalidSeek(amount));
        }
        self.send(PlayerEvent::SeekTo { amount, unit })
    }

    pub fn start(&self) -> Result<(), PlaybackError> {
        self.send(PlayerEvent::Start)
    }

    /// Resumes from a saved point. Returns `Ok(false)` without sending
    /// anything when there is no usable resume point.
    pub fn resume(&self, left_off: Option<f64>) -> Result<bool, PlaybackError> {
        match left_off {
            Some(seconds) if seconds.is_finite() && seconds > 0.0 => {
                self.send(PlayerEvent::Resume { seconds })?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn unmount(&self) -> Result<(), PlaybackError> {
        self.send(PlayerEvent::Unmount)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_script_lines() {
        let event: PlayerEvent =
            serde_json::from_str(r#"{"event":"seek_commit","fraction":0.5}"#).unwrap();
        assert_eq!(event, PlayerEvent::SeekCommit { fraction: 0.5 });

        let line = r#"{"event":"engine","engine":"duration","seconds":120.0}"#;
        let event: PlayerEvent = serde_json::from_str(line).unwrap();
        assert_eq!(
            event,
            PlayerEvent::Engine(EngineEvent::Duration { seconds: 120.0 })
        );

        let event: PlayerEvent =
            serde_json::from_str(r#"{"event":"seek_to","amount":42}"#).unwrap();
        assert_eq!(
            event,
            PlayerEvent::SeekTo {
                amount: 42.0,
                unit: SeekUnit::Seconds
            }
        );

        let event: PlayerEvent = serde_json::from_str(r#"{"event":"key","key":"F11"}"#).unwrap();
        assert_eq!(event, PlayerEvent::Key { key: Key::F11 });
    }

    #[test]
    fn timer_events_cannot_be_scripted() {
        let line = r#"{"event":"chrome_timeout","generation":1}"#;
        let parsed = serde_json::from_str::<PlayerEvent>(line);
        assert!(parsed.is_err());
    }

    #[test]
    fn handle_validates_seek_targets() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = PlayerHandle::new(tx);
        assert_matches!(
            handle.seek_to(f64::NAN, SeekUnit::Seconds),
            Err(PlaybackError::InvalidSeek(_))
        );
        assert_matches!(
            handle.seek_to(-1.0, SeekUnit::Fraction),
            Err(PlaybackError::InvalidSeek(_))
        );
        assert!(handle.seek_to(30.0, SeekUnit::Seconds).is_ok());
        assert_eq!(
            rx.try_recv().unwrap(),
            PlayerEvent::SeekTo {
                amount: 30.0,
                unit: SeekUnit::Seconds
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn resume_without_checkpoint_is_a_no_op() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = PlayerHandle::new(tx);
        assert_eq!(handle.resume(None).unwrap(), false);
        assert_eq!(handle.resume(Some(0.0)).unwrap(), false);
        assert!(rx.try_recv().is_err());
        assert_eq!(handle.resume(Some(95.0)).unwrap(), true);
        assert_eq!(rx.try_recv().unwrap(), PlayerEvent::Resume { seconds: 95.0 });
    }

    #[test]
    fn closed_controller_reports_closed() {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = PlayerHandle::new(tx);
        drop(rx);
        assert!(handle.is_closed());
        assert_matches!(handle.play(), Err(PlaybackError::Closed));
    }
}
