//! Playback state record and its transitions.
//!
//! Every transition takes the state by value and hands back the next one, so a
//! handler either commits a whole new state or nothing at all.

use serde::Serialize;

use crate::utils::unit_interval;

pub const DEFAULT_VOLUME: f64 = 0.5;

/// Coarse phase of the player, derived from the `playing` and `seeking` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Paused,
    Playing,
    Seeking,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaybackState {
    pub playing: bool,
    /// While set, progress reported by the engine must not touch `played`.
    pub seeking: bool,
    /// Fraction of the duration elapsed, always within `[0, 1]`.
    pub played: f64,
    /// Seconds; zero until the engine reports it.
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub fullscreen: bool,
    pub controls_visible: bool,
    pub mouse_inactive: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            playing: false,
            seeking: false,
            played: 0.0,
            duration: 0.0,
            volume: DEFAULT_VOLUME,
            muted: false,
            looping: false,
            fullscreen: false,
            controls_visible: true,
            mouse_inactive: false,
        }
    }
}

impl PlaybackState {
    pub fn new(volume: f64, looping: bool) -> Self {
        Self::default().with_volume(volume).with_loop(looping)
    }

    pub fn phase(&self) -> Phase {
        if self.seeking {
            Phase::Seeking
        } else if self.playing {
            Phase::Playing
        } else {
            Phase::Paused
        }
    }

    /// Seconds elapsed according to the last known position.
    pub fn elapsed(&self) -> f64 {
        self.played * self.duration
    }

    pub fn toggled(self) -> Self {
        Self {
            playing: !self.playing,
            ..self
        }
    }

    pub fn with_playing(self, playing: bool) -> Self {
        Self { playing, ..self }
    }

    pub fn with_played(self, fraction: f64) -> Self {
        match unit_interval(fraction) {
            Some(played) => Self { played, ..self },
            None => self,
        }
    }

    /// Records the media length. Only the first valid report sticks.
    pub fn with_duration(self, seconds: f64) -> Self {
        if self.duration > 0.0 || !seconds.is_finite() || seconds <= 0.0 {
            return self;
        }
        Self {
            duration: seconds,
            ..self
        }
    }

    /// End of media: keep running when looping, stop otherwise. A drag in
    /// progress owns `played`, so a loop only rewinds when nothing is seeking.
    pub fn ended(self) -> Self {
        if self.looping && self.seeking {
            Self {
                playing: true,
                ..self
            }
        } else if self.looping {
            Self {
                playing: true,
                played: 0.0,
                ..self
            }
        } else {
            Self {
                playing: false,
                ..self
            }
        }
    }

    pub fn seek_started(self) -> Self {
        Self {
            seeking: true,
            ..self
        }
    }

    /// Live slider feedback while dragging.
    pub fn seek_moved(self, fraction: f64) -> Self {
        self.with_played(fraction)
    }

    pub fn seek_committed(self, fraction: f64) -> Self {
        Self {
            seeking: false,
            ..self
        }
        .with_played(fraction)
    }

    pub fn mute_toggled(self) -> Self {
        Self {
            muted: !self.muted,
            ..self
        }
    }

    pub fn with_volume(self, level: f64) -> Self {
        match unit_interval(level) {
            Some(volume) => Self { volume, ..self },
            None => self,
        }
    }

    pub fn with_loop(self, looping: bool) -> Self {
        Self { looping, ..self }
    }

    pub fn with_fullscreen(self, fullscreen: bool) -> Self {
        Self { fullscreen, ..self }
    }

    pub fn chrome_shown(self) -> Self {
        Self {
            controls_visible: true,
            mouse_inactive: false,
            ..self
        }
    }

    pub fn chrome_hidden(self) -> Self {
        Self {
            controls_visible: false,
            mouse_inactive: true,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let state = PlaybackState::default();
        assert!(!state.playing);
        assert!(!state.seeking);
        assert_eq!(state.played, 0.0);
        assert_eq!(state.duration, 0.0);
        assert_eq!(state.volume, 0.5);
        assert!(!state.looping);
        assert!(state.controls_visible);
        assert!(!state.mouse_inactive);
        assert_eq!(state.phase(), Phase::Paused);
    }

    #[test]
    fn transitions_leave_the_original_untouched() {
        let before = PlaybackState::default();
        let after = before.toggled();
        assert!(!before.playing);
        assert!(after.playing);
        assert_eq!(after.phase(), Phase::Playing);
    }

    #[test]
    fn seeking_phase_wins_over_playing() {
        let state = PlaybackState::default().with_playing(true).seek_started();
        assert_eq!(state.phase(), Phase::Seeking);
        let state = state.seek_committed(0.3);
        assert_eq!(state.phase(), Phase::Playing);
        assert_eq!(state.played, 0.3);
    }

    #[test]
    fn duration_is_set_once() {
        let state = PlaybackState::default().with_duration(120.0);
        assert_eq!(state.duration, 120.0);
        assert_eq!(state.with_duration(90.0).duration, 120.0);
        assert_eq!(PlaybackState::default().with_duration(f64::NAN).duration, 0.0);
        assert_eq!(PlaybackState::default().with_duration(-4.0).duration, 0.0);
    }

    #[test]
    fn ended_respects_loop() {
        let playing = PlaybackState::default().with_playing(true).with_played(1.0);
        assert!(!playing.ended().playing);
        let looped = playing.with_loop(true).ended();
        assert!(looped.playing);
        assert_eq!(looped.played, 0.0);
    }

    #[test]
    fn loop_end_leaves_a_drag_alone() {
        let dragging = PlaybackState::default()
            .with_loop(true)
            .with_playing(true)
            .seek_started()
            .seek_moved(0.7);
        let looped = dragging.ended();
        assert!(looped.playing);
        assert!(looped.seeking);
        assert_eq!(looped.played, 0.7);
        assert_eq!(looped.seek_committed(0.7).played, 0.7);
    }

    #[test]
    fn volume_is_clamped_and_nan_ignored() {
        let state = PlaybackState::default();
        assert_eq!(state.with_volume(3.0).volume, 1.0);
        assert_eq!(state.with_volume(-1.0).volume, 0.0);
        assert_eq!(state.with_volume(f64::NAN).volume, 0.5);
    }

    #[test]
    fn chrome_flags_move_together() {
        let hidden = PlaybackState::default().chrome_hidden();
        assert!(!hidden.controls_visible);
        assert!(hidden.mouse_inactive);
        let shown = hidden.chrome_shown();
        assert!(shown.controls_visible);
        assert!(!shown.mouse_inactive);
    }

    #[test]
    fn elapsed_is_fraction_times_duration() {
        let state = PlaybackState::default().with_duration(40.0).with_played(0.5);
        assert_eq!(state.elapsed(), 20.0);
    }
}
