//! Client Module
//!
//! Stateful client layer over the attendance backend.
//!
//! # Architecture
//!
//! - **`config`** - Runtime configuration (server URL, shared credential, page sizes)
//! - **`api`** - HTTP client and reply-envelope handling
//! - **`auth`** - Session token storage, login, signup, routing
//! - **`attendance`** - Code entry to hold-to-confirm state machine
//! - **`pagination`** - Generic paginated lists and their endpoint sources
//! - **`books`** - Book and event-column create/delete
//! - **`notifications`** / **`subscriptions`** - Feed actions on loaded lists
//! - **`connectivity`** / **`location`** - Preconditions shown as blocking notices
//! - **`notice`** - Transient and blocking user-facing messages
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs
//! ├── config.rs
//! ├── api.rs
//! ├── auth.rs
//! ├── notice.rs
//! ├── location.rs
//! ├── connectivity.rs
//! ├── attendance/     - session state machine, countdown, endpoint trait
//! ├── pagination/     - Paginator and page sources
//! ├── books.rs
//! ├── notifications.rs
//! ├── subscriptions.rs
//! ├── profile.rs
//! ├── resources.rs
//! └── version.rs
//! ```

pub mod api;
pub mod attendance;
pub mod auth;
pub mod books;
pub mod config;
pub mod connectivity;
pub mod location;
pub mod notice;
pub mod notifications;
pub mod pagination;
pub mod profile;
pub mod resources;
pub mod subscriptions;
pub mod version;

pub use api::ApiClient;
pub use auth::{AppView, AuthContext, FileTokenStore, MemoryTokenStore, TokenStore};
pub use config::Config;
pub use notice::{Notice, Severity, Tone};
pub use pagination::{Collection, DedupPolicy, FetchOutcome, Filters, Paginator};
