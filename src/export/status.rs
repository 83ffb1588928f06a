//! Per-slide export control state.
//!
//! Three states: idle → loading → success (transient) or back to idle on
//! failure. Success auto-reverts to idle after two seconds. There is no
//! queueing: a capture request while one is in flight is refused, which
//! is how the UI disables its trigger control during `loading`.
//!
//! Time is passed in by the caller so the transition logic is testable
//! without sleeping.

use std::time::{Duration, Instant};

/// How long the success state lingers before reverting to idle.
pub const SUCCESS_LINGER: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportStatus {
    #[default]
    Idle,
    Loading,
    Success,
}

/// State machine for one slide's export trigger.
#[derive(Debug, Clone, Default)]
pub struct ExportControl {
    status: ExportStatus,
    success_since: Option<Instant>,
}

impl ExportControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ExportStatus {
        self.status
    }

    /// Try to start a capture. Returns false while one is in flight.
    pub fn begin(&mut self) -> bool {
        if self.status == ExportStatus::Loading {
            return false;
        }
        self.status = ExportStatus::Loading;
        self.success_since = None;
        true
    }

    /// Capture completed; show success until it expires.
    pub fn succeed(&mut self, now: Instant) {
        self.status = ExportStatus::Success;
        self.success_since = Some(now);
    }

    /// Capture failed; revert straight to idle (the caller surfaces the
    /// error message).
    pub fn fail(&mut self) {
        self.status = ExportStatus::Idle;
        self.success_since = None;
    }

    /// Advance time-based transitions.
    pub fn poll(&mut self, now: Instant) {
        if self.status == ExportStatus::Success {
            if let Some(since) = self.success_since {
                if now.duration_since(since) >= SUCCESS_LINGER {
                    self.status = ExportStatus::Idle;
                    self.success_since = None;
                }
            }
        }
    }
}
