//! Hold-to-confirm countdown.
//!
//! While the user keeps pressing, progress rises by [`HOLD_STEP`] every
//! [`HOLD_TICK`]. The ticker belongs to the countdown future, so releasing
//! the press or dropping the future stops it; nothing keeps firing after the
//! owning screen is gone.
//!
//! [`ConfirmGuard`] holds the session in `Confirming` for the duration of the
//! hold and the mark call. If it is dropped without reaching `Marked`, the
//! session falls back to `EventLoaded` with progress 0.

use super::session::SessionState;
use crate::shared::models::attendance::AttendanceEvent;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Progress added per tick, in percent
pub const HOLD_STEP: u8 = 10;
/// Interval between progress ticks
pub const HOLD_TICK: Duration = Duration::from_millis(20);
/// Progress at which the mark call fires
pub const HOLD_COMPLETE: u8 = 100;

pub(crate) struct ConfirmGuard<'a> {
    state: &'a mut SessionState,
    progress: &'a watch::Sender<u8>,
    armed: bool,
}

impl<'a> ConfirmGuard<'a> {
    /// Move `EventLoaded` into `Confirming` at 0%. Callers check the state first.
    pub(crate) fn begin(state: &'a mut SessionState, progress: &'a watch::Sender<u8>) -> Self {
        if let SessionState::EventLoaded(event) = std::mem::replace(state, SessionState::CodeEntry) {
            *state = SessionState::Confirming { event, progress: 0 };
        }
        progress.send_replace(0);
        tracing::debug!(from = "EventLoaded", to = "Confirming", "session transition");
        Self {
            state,
            progress,
            armed: true,
        }
    }

    pub(crate) fn progress(&self) -> u8 {
        match &*self.state {
            SessionState::Confirming { progress, .. } => *progress,
            _ => 0,
        }
    }

    pub(crate) fn event(&self) -> Option<&AttendanceEvent> {
        self.state.event()
    }

    fn set_progress(&mut self, value: u8) {
        if let SessionState::Confirming { progress, .. } = &mut *self.state {
            *progress = value;
        }
        self.progress.send_replace(value);
    }

    /// Count up until 100% (returns true) or until `release` resolves (false)
    pub(crate) async fn count_up<R>(&mut self, release: R) -> bool
    where
        R: Future<Output = ()>,
    {
        tokio::pin!(release);
        let mut ticker = interval_at(Instant::now() + HOLD_TICK, HOLD_TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut release => return false,
                _ = ticker.tick() => {
                    let next = self.progress().saturating_add(HOLD_STEP).min(HOLD_COMPLETE);
                    self.set_progress(next);
                    if next >= HOLD_COMPLETE {
                        return true;
                    }
                }
            }
        }
    }

    /// Finish in `Marked`
    pub(crate) fn into_marked(mut self) {
        if let SessionState::Confirming { event, .. } =
            std::mem::replace(&mut *self.state, SessionState::CodeEntry)
        {
            *self.state = SessionState::Marked(event);
        }
        self.armed = false;
        tracing::debug!(from = "Confirming", to = "Marked", "session transition");
    }
}

impl Drop for ConfirmGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let SessionState::Confirming { event, .. } =
            std::mem::replace(&mut *self.state, SessionState::CodeEntry)
        {
            *self.state = SessionState::EventLoaded(event);
        }
        self.progress.send_replace(0);
        tracing::debug!(from = "Confirming", to = "EventLoaded", "session transition");
    }
}
