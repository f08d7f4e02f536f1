//! Bridge between the controller's fullscreen intent and the host.
//!
//! The coordinator never polls the host. It forwards the caller's intent and
//! swallows every failure, so the overlay always reflects what the user asked
//! for even on hosts that cannot go fullscreen.

use std::fmt;

use tracing::{debug, warn};

/// Identifies the element that should fill the screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub String);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FullscreenError {
    #[error("fullscreen is not supported by this host")]
    Unsupported,
    #[error("host refused fullscreen request: {0}")]
    Host(String),
}

pub trait HostFullscreen: Send {
    /// Whether element fullscreen is available at all.
    fn is_enabled(&self) -> bool;

    fn request(&mut self, target: &SurfaceId) -> Result<(), FullscreenError>;

    fn exit(&mut self) -> Result<(), FullscreenError>;

    /// Application window fullscreen. Hosts without a separate window
    /// concept can keep the default.
    fn set_window_fullscreen(&mut self, _fullscreen: bool) -> Result<(), FullscreenError> {
        Ok(())
    }
}

/// Host that never supports fullscreen.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFullscreen;

impl HostFullscreen for NoFullscreen {
    fn is_enabled(&self) -> bool {
        false
    }

    fn request(&mut self, _target: &SurfaceId) -> Result<(), FullscreenError> {
        Err(FullscreenError::Unsupported)
    }

    fn exit(&mut self) -> Result<(), FullscreenError> {
        Err(FullscreenError::Unsupported)
    }
}

pub struct FullscreenCoordinator {
    host: Box<dyn HostFullscreen>,
}

impl fmt::Debug for FullscreenCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FullscreenCoordinator")
            .field("enabled", &self.host.is_enabled())
            .finish()
    }
}

impl FullscreenCoordinator {
    pub fn new(host: Box<dyn HostFullscreen>) -> Self {
        Self { host }
    }

    pub fn enter(&mut self, target: &SurfaceId) {
        if !self.host.is_enabled() {
            debug!(%target, "fullscreen unavailable, ignoring enter");
            return;
        }
        if let Err(e) = self.host.set_window_fullscreen(true) {
            warn!("window fullscreen failed: {}", e);
        }
        if let Err(e) = self.host.request(target) {
            warn!(%target, "fullscreen request failed: {}", e);
        }
    }

    pub fn exit(&mut self) {
        if !self.host.is_enabled() {
            debug!("fullscreen unavailable, ignoring exit");
            return;
        }
        if let Err(e) = self.host.set_window_fullscreen(false) {
            warn!("leaving window fullscreen failed: {}", e);
        }
        if let Err(e) = self.host.exit() {
            warn!("fullscreen exit failed: {}", e);
        }
    }

    pub fn apply(&mut self, fullscreen: bool, target: &SurfaceId) {
        if fullscreen {
            self.enter(target);
        } else {
            self.exit();
        }
    }
}
