//! Attendbook - Attendance Client Library
//!
//! Client for a university attendance backend: students join an event with a
//! six-digit code and confirm their presence with a hold gesture; lecturers
//! manage attendance books and their events.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types, configuration and the error taxonomy
//!   - Request/response structs per endpoint
//!   - Lenient decoders for fields the backend sends as numbers or strings
//!
//! - **`client`** - Stateful client layer
//!   - `AttendanceSession` state machine
//!   - `Paginator` over every list endpoint
//!   - Token storage, connectivity monitoring, update checks
//!
//! # Usage
//!
//! ```rust,no_run
//! use attendbook::client::attendance::AttendanceSession;
//! use attendbook::client::{ApiClient, AuthContext, Config};
//!
//! # async fn example() -> Result<(), attendbook::shared::ClientError> {
//! let api = ApiClient::new(Config::load(None)?);
//! let auth = AuthContext::in_memory(Some("uid-1"));
//! let mut session = AttendanceSession::new(api, auth);
//! session.enter_code("048217");
//! session.submit_code().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Library functions return `Result<T, ClientError>`. The stateful screens
//! also keep the last failure as a [`client::Notice`] for display.

/// Wire types, configuration and errors
pub mod shared;

/// Stateful client layer
pub mod client;
