//! Book and event-column endpoint types (`/book/*`)

use crate::shared::models::PaginationInfo;
use crate::shared::wire::{lenient_count, lenient_i64};
use serde::{Deserialize, Serialize};

/// Direction for the book list sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Ascending,
    #[default]
    #[serde(rename = "DESC")]
    Descending,
}

#[derive(Debug, Clone, Serialize)]
pub struct BooksRequest<'a> {
    pub user_id: &'a str,
    pub search: &'a str,
    pub page: u32,
    pub per_page: u32,
    pub sort_by: &'a str,
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BooksResponse {
    #[serde(default)]
    pub data: Vec<Book>,
    #[serde(default)]
    pub pagination: PaginationInfo,
}

/// Attendance book summary as shown in the book list
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Book {
    #[serde(deserialize_with = "lenient_i64")]
    pub book_id: i64,
    #[serde(default)]
    pub book_title: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookDetailsRequest<'a> {
    pub user_id: &'a str,
    pub book_id: i64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookDetailsResponse {
    #[serde(rename = "bookDetails")]
    pub book_details: BookDetails,
    #[serde(default)]
    pub events: Vec<BookEvent>,
    #[serde(default)]
    pub pagination: PaginationInfo,
}

/// Header of the book detail screen
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookDetails {
    #[serde(deserialize_with = "lenient_i64")]
    pub book_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_students: u64,
}

/// One event (column) inside a book
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookEvent {
    #[serde(deserialize_with = "lenient_i64")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub short_code: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub attendance_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBookRequest<'a> {
    pub user_id: &'a str,
    pub book_title: &'a str,
    pub description: &'a str,
    pub level: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Physical,
    Online,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateColumnRequest<'a> {
    pub book_id: i64,
    pub user_id: &'a str,
    pub column_name: &'a str,
    pub radius: u32,
    pub event_type: EventType,
    pub location_name: Option<&'a str>,
    pub event_starttime: String,
    pub event_endtime: String,
    pub event_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteBookRequest<'a> {
    pub user_id: &'a str,
    pub book_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteColumnRequest<'a> {
    pub user_id: &'a str,
    pub book_column_id: i64,
}
