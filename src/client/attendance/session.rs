//! Attendance session state machine.

use super::api::AttendanceApi;
use super::hold::ConfirmGuard;
use crate::client::auth::AuthContext;
use crate::client::location::{GeoSample, LocationProvider};
use crate::client::notice::Notice;
use crate::shared::error::{ClientError, LocationError};
use crate::shared::models::attendance::{AttendanceEvent, SubscriptionAction};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Digits in an attendance shortcode
pub const CODE_LENGTH: usize = 6;

const MSG_CODE_LENGTH: &str = "Please enter a 6-digit code";
const MSG_ALREADY_MARKED: &str = "You have already marked attendance for this event.";
const MSG_SUBSCRIBED: &str =
    "Subscribed successfully! We will notify you when a new attendance drops for this book";
const MSG_UNSUBSCRIBED: &str = "Unsubscribed successfully! You will no longer receive notifications from this attendance book";

/// Where the attend screen is
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Waiting for a 6-digit code
    CodeEntry,
    /// Event found; the user can subscribe or start the long press
    EventLoaded(AttendanceEvent),
    /// Long press in progress (0..=100)
    Confirming {
        event: AttendanceEvent,
        progress: u8,
    },
    /// Attendance recorded
    Marked(AttendanceEvent),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CodeEntry => "CodeEntry",
            Self::EventLoaded(_) => "EventLoaded",
            Self::Confirming { .. } => "Confirming",
            Self::Marked(_) => "Marked",
        }
    }

    pub fn event(&self) -> Option<&AttendanceEvent> {
        match self {
            Self::CodeEntry => None,
            Self::EventLoaded(event) | Self::Marked(event) => Some(event),
            Self::Confirming { event, .. } => Some(event),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::CodeEntry => "entering a code",
            Self::EventLoaded(_) => "an event is loaded",
            Self::Confirming { .. } => "confirming",
            Self::Marked(_) => "attendance is marked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Moved to `EventLoaded`
    Loaded,
    /// The user already attended this event; still in `CodeEntry`
    AlreadyMarked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// Press released before completion; no request was sent
    Released { progress: u8 },
    /// Attendance recorded
    Marked,
}

/// Physical feedback when a press starts
pub trait Feedback: Send + Sync {
    fn pulse(&self);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoFeedback;

impl Feedback for NoFeedback {
    fn pulse(&self) {}
}

/// One attend screen: code entry through confirmation
pub struct AttendanceSession<A> {
    api: A,
    auth: AuthContext,
    state: SessionState,
    code: String,
    location: Option<GeoSample>,
    notice: Option<Notice>,
    progress: watch::Sender<u8>,
    feedback: Arc<dyn Feedback>,
}

impl<A: AttendanceApi> AttendanceSession<A> {
    pub fn new(api: A, auth: AuthContext) -> Self {
        Self {
            api,
            auth,
            state: SessionState::CodeEntry,
            code: String::new(),
            location: None,
            notice: None,
            progress: watch::Sender::new(0),
            feedback: Arc::new(NoFeedback),
        }
    }

    pub fn with_feedback(mut self, feedback: impl Feedback + 'static) -> Self {
        self.feedback = Arc::new(feedback);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn location(&self) -> Option<GeoSample> {
        self.location
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Long-press progress, 0 outside `Confirming`
    pub fn progress(&self) -> u8 {
        match &self.state {
            SessionState::Confirming { progress, .. } => *progress,
            _ => 0,
        }
    }

    /// Live progress updates for rendering the press bar
    pub fn subscribe_progress(&self) -> watch::Receiver<u8> {
        self.progress.subscribe()
    }

    pub fn set_location(&mut self, sample: Option<GeoSample>) {
        self.location = sample;
    }

    /// Take the one position sample this screen uses. A failure is shown as a
    /// blocking alert and leaves any previous sample in place.
    pub async fn acquire_location<P: LocationProvider>(
        &mut self,
        provider: &P,
    ) -> Result<GeoSample, ClientError> {
        match provider.current_position().await {
            Ok(sample) => {
                self.location = Some(sample);
                Ok(sample)
            }
            Err(err) => {
                tracing::warn!(error = %err, "position unavailable");
                let err = ClientError::Location(err);
                self.notice = Some(Notice::from_error(&err, "", ""));
                Err(err)
            }
        }
    }

    /// Replace the code buffer. Only digits are kept, at most six.
    pub fn enter_code(&mut self, input: &str) {
        if !matches!(self.state, SessionState::CodeEntry) {
            return;
        }
        self.code = sanitize_code(input);
    }

    /// Look up the event behind the entered code
    pub async fn submit_code(&mut self) -> Result<SubmitOutcome, ClientError> {
        self.expect("submit a code", |s| matches!(s, SessionState::CodeEntry))?;

        if self.code.len() != CODE_LENGTH {
            let err = ClientError::validation("code", MSG_CODE_LENGTH);
            return Err(self.fail("lookup event", err, "", ""));
        }

        let user_id = match self.auth.require_token() {
            Ok(token) => token,
            Err(err) => return Err(self.fail("lookup event", err, "", "")),
        };

        match self.api.lookup_event(&self.code, &user_id).await {
            Ok(event) if event.already_marked => {
                tracing::info!(column_id = event.column_id, "attendance already marked");
                self.notice = Some(Notice::error(MSG_ALREADY_MARKED));
                Ok(SubmitOutcome::AlreadyMarked)
            }
            Ok(event) => {
                tracing::info!(column_id = event.column_id, "event loaded");
                self.transition(SessionState::EventLoaded(event));
                Ok(SubmitOutcome::Loaded)
            }
            Err(err) => Err(self.fail(
                "lookup event",
                err,
                "Invalid attendance code",
                "Error fetching event details",
            )),
        }
    }

    /// Flip the subscription for the loaded event's book.
    ///
    /// The local flag changes only after the backend confirms. Returns the new flag.
    pub async fn toggle_subscription(&mut self) -> Result<bool, ClientError> {
        let (column_id, subscribed) = match &self.state {
            SessionState::EventLoaded(event) => (event.column_id, event.subscribed),
            other => {
                return Err(ClientError::InvalidState {
                    operation: "change subscription",
                    state: other.describe(),
                })
            }
        };

        let user_id = match self.auth.require_token() {
            Ok(token) => token,
            Err(err) => return Err(self.fail("toggle subscription", err, "", "")),
        };

        let action = SubscriptionAction::toggling(subscribed);
        match self.api.set_subscription(action, column_id, &user_id).await {
            Ok(_) => {
                if let SessionState::EventLoaded(event) = &mut self.state {
                    event.subscribed = !subscribed;
                }
                tracing::info!(column_id, subscribed = !subscribed, "subscription updated");
                self.notice = Some(Notice::success(if subscribed {
                    MSG_UNSUBSCRIBED
                } else {
                    MSG_SUBSCRIBED
                }));
                Ok(!subscribed)
            }
            Err(err) => Err(self.fail(
                "toggle subscription",
                err,
                "Failed to update subscription",
                "Error updating subscription",
            )),
        }
    }

    /// Run the long press.
    ///
    /// Progress climbs while `release` is pending. If `release` resolves
    /// first, the press is abandoned with no request sent. At 100% the mark
    /// call is issued once. Dropping this future cancels the countdown and
    /// returns the session to `EventLoaded`.
    pub async fn hold_to_confirm<R>(&mut self, release: R) -> Result<HoldOutcome, ClientError>
    where
        R: Future<Output = ()>,
    {
        self.expect("confirm attendance", |s| matches!(s, SessionState::EventLoaded(_)))?;
        self.feedback.pulse();

        let Self {
            api,
            auth,
            state,
            location,
            notice,
            progress,
            ..
        } = self;

        let mut guard = ConfirmGuard::begin(state, progress);
        if !guard.count_up(release).await {
            let reached = guard.progress();
            drop(guard);
            tracing::debug!(progress = reached, "press released early");
            return Ok(HoldOutcome::Released { progress: reached });
        }

        let column_id = guard.event().map(|e| e.column_id).unwrap_or_default();

        let result = match (*location, auth.require_token()) {
            (None, _) => Err(ClientError::Location(LocationError::Unavailable)),
            (_, Err(err)) => Err(err),
            (Some(at), Ok(user_id)) => api.mark_attendance(column_id, &user_id, at).await.map(|_| ()),
        };

        match result {
            Ok(()) => {
                guard.into_marked();
                tracing::info!(column_id, "attendance marked");
                Ok(HoldOutcome::Marked)
            }
            Err(err) => {
                drop(guard);
                err.log("mark attendance");
                *notice = Some(Notice::from_error(
                    &err,
                    "Failed to mark attendance",
                    "Error marking attendance",
                ));
                Err(err)
            }
        }
    }

    /// Leave the confirmation screen and start over
    pub fn done(&mut self) -> Result<(), ClientError> {
        self.expect("finish", |s| matches!(s, SessionState::Marked(_)))?;
        self.reset();
        Ok(())
    }

    /// Drop all transient state and return to code entry
    pub fn reset(&mut self) {
        self.code.clear();
        self.progress.send_replace(0);
        self.transition(SessionState::CodeEntry);
    }

    fn expect(
        &self,
        operation: &'static str,
        allowed: impl Fn(&SessionState) -> bool,
    ) -> Result<(), ClientError> {
        if allowed(&self.state) {
            Ok(())
        } else {
            Err(ClientError::InvalidState {
                operation,
                state: self.state.describe(),
            })
        }
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(from = self.state.name(), to = next.name(), "session transition");
        self.state = next;
    }

    /// Record a failure as a notice and hand the error back
    fn fail(
        &mut self,
        operation: &str,
        err: ClientError,
        backend_fallback: &str,
        transport_fallback: &str,
    ) -> ClientError {
        err.log(operation);
        self.notice = Some(Notice::from_error(&err, backend_fallback, transport_fallback));
        err
    }
}

/// Keep only ASCII digits, at most [`CODE_LENGTH`] of them
pub fn sanitize_code(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(CODE_LENGTH)
        .collect()
}
