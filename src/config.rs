use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::playback::checkpoint::{parse_media_id, DEFAULT_CHECKPOINT_DEAD_ZONE};
use crate::playback::inactivity::DEFAULT_INACTIVITY_DELAY;
use crate::player::DEFAULT_VOLUME;

/// Tunables for one mounted player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    /// Quiet period after the last pointer movement before the chrome hides.
    pub inactivity_delay: Duration,
    /// Views at or below this many seconds do not leave a resume point.
    pub checkpoint_dead_zone: u32,
    pub initial_volume: f64,
    pub looping: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            inactivity_delay: DEFAULT_INACTIVITY_DELAY,
            checkpoint_dead_zone: DEFAULT_CHECKPOINT_DEAD_ZONE,
            initial_volume: DEFAULT_VOLUME,
            looping: false,
        }
    }
}

/// Configuration parsed from command-line arguments.
#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version,
    about = "Drive a movie player controller from a JSON-lines event script",
    long_about = None
)]
pub struct Config {
    /// Media URL handed to the engine
    #[arg(short = 'u', long = "url", default_value = "stream://film")]
    pub url: String,
    /// Backend id of the film; resume points are only saved for valid ids
    #[arg(short = 'i', long = "media-id", value_name = "ID", allow_hyphen_values = true)]
    media_id_raw: Option<String>,
    /// Event script (JSON lines). Reads stdin when omitted
    #[arg(short = 's', long = "script")]
    pub script: Option<PathBuf>,
    /// Pointer inactivity before the controls hide, in milliseconds
    #[arg(long = "inactivity-ms", default_value_t = DEFAULT_INACTIVITY_DELAY.as_millis() as u64)]
    pub inactivity_ms: u64,
    /// Seconds of playback below which no resume point is saved
    #[arg(long = "dead-zone", default_value_t = DEFAULT_CHECKPOINT_DEAD_ZONE)]
    pub dead_zone: u32,
    /// Initial volume (0.0 - 1.0)
    #[arg(short = 'v', long = "volume", default_value_t = DEFAULT_VOLUME)]
    pub volume: f64,
    /// Restart when the media ends
    #[arg(long = "loop", default_value_t = false, action = clap::ArgAction::SetTrue)]
    pub looping: bool,
    /// Pretend the host cannot go fullscreen
    #[arg(long = "no-fullscreen", default_value_t = false, action = clap::ArgAction::SetTrue)]
    pub no_fullscreen: bool,
    /// Make every resume-point save fail
    #[arg(long = "fail-checkpoint", default_value_t = false, action = clap::ArgAction::SetTrue)]
    pub fail_checkpoint: bool,
    /// Log filter used when RUST_LOG is not set
    #[arg(long = "log-level", default_value = "info")]
    pub log_level: String,
    /// Media id after validation
    #[arg(skip)]
    pub media_id: Option<i64>,
}

impl Config {
    /// Parse arguments and compute derived fields.
    pub fn parse() -> Self {
        <Self as Parser>::parse().normalized()
    }

    fn normalized(mut self) -> Self {
        self.media_id = self
            .media_id_raw
            .as_deref()
            .and_then(parse_media_id)
            .map(i64::from);
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            DEFAULT_VOLUME
        };
        self.log_level = self.log_level.trim().to_lowercase();
        self
    }

    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            inactivity_delay: Duration::from_millis(self.inactivity_ms),
            checkpoint_dead_zone: self.dead_zone,
            initial_volume: self.volume,
            looping: self.looping,
        }
    }
}
