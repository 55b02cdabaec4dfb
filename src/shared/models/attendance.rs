//! Attendance endpoint types (`/attendance/attendance`, `/attendance/subscribe`)

use crate::shared::wire::{lenient_bool, lenient_count, lenient_f64_opt, lenient_i64};
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventLookupRequest<'a> {
    pub action: &'static str,
    pub identifier_type: &'static str,
    pub identifier: &'a str,
    pub user_id: &'a str,
}

impl<'a> EventLookupRequest<'a> {
    pub fn by_shortcode(code: &'a str, user_id: &'a str) -> Self {
        Self {
            action: "get_event_details",
            identifier_type: "shortcode",
            identifier: code,
            user_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventLookupResponse {
    pub data: EventDetails,
}

/// Event as the backend describes it
#[derive(Debug, Clone, Deserialize)]
pub struct EventDetails {
    #[serde(default)]
    pub book_title: String,
    #[serde(default)]
    pub column_name: String,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_attendance: u64,
    #[serde(default, deserialize_with = "lenient_f64_opt")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64_opt")]
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub column_id: i64,
    #[serde(default, rename = "hasMarkedAttendance", deserialize_with = "lenient_bool")]
    pub has_marked_attendance: bool,
    #[serde(default, rename = "isSubscribed", deserialize_with = "lenient_bool")]
    pub is_subscribed: bool,
}

/// Snapshot of a looked-up event, held while the user confirms attendance
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceEvent {
    pub event_title: String,
    pub location_label: String,
    pub location_name: String,
    pub checked_in_count: u64,
    /// Absent for online events
    pub coordinates: Option<Coordinates>,
    pub column_id: i64,
    pub already_marked: bool,
    pub subscribed: bool,
}

impl From<EventDetails> for AttendanceEvent {
    fn from(value: EventDetails) -> Self {
        let coordinates = match (value.latitude, value.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        };
        Self {
            event_title: value.book_title,
            location_label: value.column_name,
            location_name: value.location_name.unwrap_or_default(),
            checked_in_count: value.total_attendance,
            coordinates,
            column_id: value.column_id,
            already_marked: value.has_marked_attendance,
            subscribed: value.is_subscribed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkAttendanceRequest<'a> {
    pub action: &'static str,
    pub book_column_id: i64,
    pub user_id: &'a str,
    pub latitude: f64,
    pub longitude: f64,
}

impl<'a> MarkAttendanceRequest<'a> {
    pub fn new(column_id: i64, user_id: &'a str, at: Coordinates) -> Self {
        Self {
            action: "mark_attendance",
            book_column_id: column_id,
            user_id,
            latitude: at.latitude,
            longitude: at.longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionAction {
    Subscribe,
    Unsubscribe,
}

impl SubscriptionAction {
    /// The action that flips the current flag
    pub fn toggling(subscribed: bool) -> Self {
        if subscribed {
            Self::Unsubscribe
        } else {
            Self::Subscribe
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscribeRequest<'a> {
    pub action: SubscriptionAction,
    pub book_column_id: i64,
    pub user_id: &'a str,
}
