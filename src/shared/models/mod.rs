//! Request and response bodies for every backend endpoint the client uses.
//!
//! Request structs serialize to exactly the field names the backend expects.
//! Response structs decode only what the client reads; unknown fields are ignored.

pub mod attendance;
pub mod auth;
pub mod book;
pub mod history;
pub mod notification;
pub mod profile;
pub mod resources;
pub mod subscription;

use serde::Deserialize;

/// Pagination block returned by the book endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PaginationInfo {
    #[serde(default, deserialize_with = "crate::shared::wire::lenient_count")]
    pub current_page: u64,
    #[serde(default, deserialize_with = "crate::shared::wire::lenient_count")]
    pub total_pages: u64,
    #[serde(default, rename = "hasMore")]
    pub has_more: Option<bool>,
}

impl PaginationInfo {
    /// Explicit `hasMore` when sent, otherwise `current_page < total_pages`.
    pub fn more_available(&self) -> bool {
        self.has_more
            .unwrap_or(self.current_page < self.total_pages)
    }
}
