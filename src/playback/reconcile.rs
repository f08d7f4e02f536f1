//! Arbitration between engine progress and local seeking.
//!
//! The engine keeps reporting progress while the user drags the seek slider.
//! Those late reports must never overwrite the position the user is choosing,
//! so each one is checked against the seeking flag as it arrives.

use tracing::trace;

use crate::player::PlaybackState;
use crate::utils::unit_interval;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Store this (clamped) fraction.
    Apply(f64),
    /// A local seek is in progress.
    Suppressed,
    /// NaN or infinite.
    Malformed,
}

#[derive(Debug, Default)]
pub struct ProgressReconciler {
    suppressed: u64,
    malformed: u64,
}

impl ProgressReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn judge(&mut self, state: &PlaybackState, fraction: f64) -> Verdict {
        let Some(played) = unit_interval(fraction) else {
            self.malformed += 1;
            trace!(fraction, "dropping malformed progress report");
            return Verdict::Malformed;
        };
        if state.seeking {
            self.suppressed += 1;
            trace!(fraction, "dropping progress report while seeking");
            return Verdict::Suppressed;
        }
        Verdict::Apply(played)
    }

    /// Applies a progress report to `state`, returning it unchanged when the
    /// report is rejected.
    pub fn reconcile(&mut self, state: PlaybackState, fraction: f64) -> PlaybackState {
        match self.judge(&state, fraction) {
            Verdict::Apply(played) => state.with_played(played),
            Verdict::Suppressed | Verdict::Malformed => state,
        }
    }

    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    pub fn malformed(&self) -> u64 {
        self.malformed
    }
}
