//! Control overlay drawn on top of the video surface.
//!
//! Rendering is a pure function of [`PlaybackState`]; the host toolkit only
//! has to map the icon enums to its own glyphs.

use serde::Serialize;

use crate::player::PlaybackState;
use crate::utils::format_time;

const QUIET_BELOW: f64 = 0.33;
const MODERATE_BELOW: f64 = 0.66;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayIcon {
    Play,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MuteIcon {
    Off,
    Quiet,
    Moderate,
    Loud,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FullscreenIcon {
    Enter,
    Exit,
}

/// Picks the speaker glyph for the current volume.
pub fn mute_icon(muted: bool, volume: f64) -> MuteIcon {
    if muted || volume <= 0.0 {
        MuteIcon::Off
    } else if volume < QUIET_BELOW {
        MuteIcon::Quiet
    } else if volume < MODERATE_BELOW {
        MuteIcon::Moderate
    } else {
        MuteIcon::Loud
    }
}

/// Shows pause while playing, play otherwise.
pub fn play_icon(playing: bool) -> PlayIcon {
    if playing {
        PlayIcon::Pause
    } else {
        PlayIcon::Play
    }
}

pub fn fullscreen_icon(fullscreen: bool) -> FullscreenIcon {
    if fullscreen {
        FullscreenIcon::Exit
    } else {
        FullscreenIcon::Enter
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub play: PlayIcon,
    pub mute: MuteIcon,
    pub fullscreen: FullscreenIcon,
    /// Seek slider position, `[0, 1]`.
    pub seek: f64,
    pub volume: f64,
    /// `elapsed / total`, e.g. `1:02:03 / 1:45:00`.
    pub time: String,
    pub controls_opacity: f64,
    pub cursor_hidden: bool,
}

impl Overlay {
    pub fn render(state: &PlaybackState) -> Self {
        Self {
            play: play_icon(state.playing),
            mute: mute_icon(state.muted, state.volume),
            fullscreen: fullscreen_icon(state.fullscreen),
            seek: state.played,
            volume: state.volume,
            time: format!(
                "{} / {}",
                format_time(state.elapsed()),
                format_time(state.duration)
            ),
            controls_opacity: if state.controls_visible { 1.0 } else { 0.0 },
            cursor_hidden: state.mouse_inactive,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({ "overlay": self }).to_string()
    }
}

/// Print the overlay, only if output changes.
pub fn print_overlay(overlay: &Overlay, last_output: &mut String) -> bool {
    let json_output = overlay.to_json();
    if *last_output == json_output {
        return false;
    }
    println!("{}", json_output);
    *last_output = json_output;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mute_icon_thresholds() {
        assert_eq!(mute_icon(true, 0.9), MuteIcon::Off);
        assert_eq!(mute_icon(false, 0.0), MuteIcon::Off);
        assert_eq!(mute_icon(false, 0.01), MuteIcon::Quiet);
        assert_eq!(mute_icon(false, 0.329), MuteIcon::Quiet);
        assert_eq!(mute_icon(false, 0.33), MuteIcon::Moderate);
        assert_eq!(mute_icon(false, 0.659), MuteIcon::Moderate);
        assert_eq!(mute_icon(false, 0.66), MuteIcon::Loud);
        assert_eq!(mute_icon(false, 1.0), MuteIcon::Loud);
    }

    #[test]
    fn play_icon_mirrors_playing() {
        assert_eq!(play_icon(true), PlayIcon::Pause);
        assert_eq!(play_icon(false), PlayIcon::Play);
    }

    #[test]
    fn renders_time_label_and_chrome() {
        let state = PlaybackState::default()
            .with_duration(3700.0)
            .with_played(0.5)
            .with_fullscreen(true)
            .chrome_hidden();
        let overlay = Overlay::render(&state);
        assert_eq!(overlay.time, "30:50 / 1:01:40");
        assert_eq!(overlay.fullscreen, FullscreenIcon::Exit);
        assert_eq!(overlay.controls_opacity, 0.0);
        assert!(overlay.cursor_hidden);
        assert_eq!(overlay.mute, MuteIcon::Moderate);
    }

    #[test]
    fn json_uses_lowercase_icon_names() {
        let json = Overlay::render(&PlaybackState::default()).to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["overlay"]["play"], "play");
        assert_eq!(value["overlay"]["mute"], "moderate");
        assert_eq!(value["overlay"]["time"], "0:00 / 0:00");
    }

    #[test]
    fn print_overlay_skips_duplicates() {
        let overlay = Overlay::render(&PlaybackState::default());
        let mut last = String::new();
        assert!(print_overlay(&overlay, &mut last));
        assert!(!print_overlay(&overlay, &mut last));
    }
}
