//! Attendance Flow
//!
//! Marking attendance for one event goes through an explicit state machine:
//!
//! ```text
//! CodeEntry --submit_code--> EventLoaded --hold_to_confirm--> Confirming --100%--> Marked
//!     ^                          |  ^                             |                  |
//!     |                          |  +------release / failure------+                  |
//!     |                          +-- toggle_subscription (self loop)                 |
//!     +---------------------------------------done-----------------------------------+
//! ```
//!
//! Errors never change the primary state. They are recorded as a notice and
//! returned to the caller.

pub mod api;
pub mod hold;
pub mod session;

pub use api::AttendanceApi;
pub use hold::{HOLD_STEP, HOLD_TICK};
pub use session::{
    AttendanceSession, Feedback, HoldOutcome, NoFeedback, SessionState, SubmitOutcome, CODE_LENGTH,
};
