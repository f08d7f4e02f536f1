//! Playback controller for the movie catalog's embedded video player.
//!
//! The player engine, the host window and the catalog backend are all
//! external; this crate owns the state machine in between.

pub mod config;
pub mod logging;
pub mod overlay;
pub mod playback;
pub mod player;
pub mod utils;

pub use config::PlayerConfig;
pub use playback::{Flow, MediaSource, PlaybackController, PlaybackError};
pub use player::PlaybackState;
