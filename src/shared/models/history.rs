//! Attendance history types (`/attendance/attendance-history`)

use crate::shared::models::PaginationInfo;
use crate::shared::wire::RecordId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct HistoryRequest<'a> {
    pub user_id: &'a str,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub data: Vec<AttendanceRecord>,
    #[serde(default)]
    pub pagination: Option<PaginationInfo>,
}

/// One past check-in
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttendanceRecord {
    pub attendance_id: RecordId,
    #[serde(default)]
    pub book_title: String,
    #[serde(default)]
    pub column_name: String,
    #[serde(default)]
    pub attendance_time: String,
}
