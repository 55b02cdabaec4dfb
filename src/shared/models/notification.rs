//! Notification feed types (`/user/notifications`, `/user/mark-read`)

use crate::shared::wire::{lenient_bool, lenient_count, RecordId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct NotificationsRequest<'a> {
    pub user_id: &'a str,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsResponse {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_pages: u64,
}

/// Category used to pick an icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Attendance,
    Success,
    Alert,
    Message,
    Academic,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Notification {
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, rename = "type")]
    pub kind: NotificationKind,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_read: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkReadRequest<'a> {
    pub user_id: &'a str,
}
