//! Book and event-column management.
//!
//! Listing books and a book's events goes through
//! [`Paginator`](crate::client::pagination::Paginator); this module covers the
//! create and delete calls, each validated locally before anything is sent.

use crate::client::api::ApiClient;
use crate::client::auth::AuthContext;
use crate::client::location::GeoSample;
use crate::shared::error::ClientError;
use crate::shared::models::book::{
    CreateBookRequest, CreateColumnRequest, DeleteBookRequest, DeleteColumnRequest, EventType,
};
use crate::shared::wire::Ack;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Geofence radius in metres when the form leaves it blank
pub const DEFAULT_RADIUS: u32 = 200;

pub const BOOK_CREATED: &str = "Book created successfully";
pub const COLUMN_CREATED: &str = "Book column created successfully";
pub const BOOK_DELETED: &str = "Book deleted successfully";
pub const COLUMN_DELETED: &str = "Event deleted successfully";

/// New attendance book
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub description: String,
    pub level: String,
}

impl BookForm {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.title.trim().is_empty() {
            return Err(ClientError::validation("book_title", "Book Name is required"));
        }
        if self.description.trim().is_empty() {
            return Err(ClientError::validation("description", "Description is required"));
        }
        if self.level.trim().is_empty() {
            return Err(ClientError::validation("level", "Level/Year is required"));
        }
        Ok(())
    }
}

/// New event (column) inside a book
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnForm {
    pub column_name: String,
    /// `None` means [`DEFAULT_RADIUS`]
    pub radius: Option<u32>,
    pub event_type: EventType,
    pub location_name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub date: NaiveDate,
    /// Venue position; required for physical events
    pub position: Option<GeoSample>,
}

impl ColumnForm {
    pub fn radius(&self) -> u32 {
        self.radius.unwrap_or(DEFAULT_RADIUS)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.column_name.trim().is_empty() {
            return Err(ClientError::validation("column_name", "Column name is required"));
        }
        if self.radius() == 0 {
            return Err(ClientError::validation("radius", "Radius must be a positive number"));
        }
        if self.event_type == EventType::Physical {
            if self.location_name.trim().is_empty() {
                return Err(ClientError::validation(
                    "location_name",
                    "Location name is required for physical events",
                ));
            }
            if self.position.is_none() {
                return Err(ClientError::validation("location", "Please select a location"));
            }
        }
        if self.ends_at <= self.starts_at {
            return Err(ClientError::validation(
                "event_endtime",
                "End time must be after start time",
            ));
        }
        Ok(())
    }

    fn to_request<'a>(&'a self, book_id: i64, user_id: &'a str) -> CreateColumnRequest<'a> {
        let physical = self.event_type == EventType::Physical;
        let position = self.position.filter(|_| physical);
        let location_name = Some(self.location_name.trim()).filter(|name| !name.is_empty());

        CreateColumnRequest {
            book_id,
            user_id,
            column_name: self.column_name.trim(),
            radius: self.radius(),
            event_type: self.event_type,
            location_name,
            event_starttime: self.starts_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            event_endtime: self.ends_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            event_date: self.date.format("%Y-%m-%d").to_string(),
            longitude: position.map(|p| p.longitude.to_string()),
            latitude: position.map(|p| p.latitude.to_string()),
        }
    }
}

pub async fn create_book(api: &ApiClient, auth: &AuthContext, form: &BookForm) -> Result<Ack, ClientError> {
    form.validate()?;
    let user_id = auth.require_token()?;
    let request = CreateBookRequest {
        user_id: &user_id,
        book_title: form.title.trim(),
        description: form.description.trim(),
        level: form.level.trim(),
    };
    let ack: Ack = api
        .post("/book/create", &request)
        .await
        .inspect_err(|e| e.log("create_book"))?;
    tracing::info!(title = request.book_title, "book created");
    Ok(ack)
}

pub async fn create_column(
    api: &ApiClient,
    auth: &AuthContext,
    book_id: i64,
    form: &ColumnForm,
) -> Result<Ack, ClientError> {
    form.validate()?;
    let user_id = auth.require_token()?;
    let ack: Ack = api
        .post("/book/create-column", &form.to_request(book_id, &user_id))
        .await
        .inspect_err(|e| e.log("create_column"))?;
    tracing::info!(book_id, "event column created");
    Ok(ack)
}

pub async fn delete_book(api: &ApiClient, auth: &AuthContext, book_id: i64) -> Result<Ack, ClientError> {
    let user_id = auth.require_token()?;
    let ack: Ack = api
        .post(
            "/book/delete-book",
            &DeleteBookRequest {
                user_id: &user_id,
                book_id,
            },
        )
        .await
        .inspect_err(|e| e.log("delete_book"))?;
    tracing::info!(book_id, "book deleted");
    Ok(ack)
}

pub async fn delete_column(
    api: &ApiClient,
    auth: &AuthContext,
    column_id: i64,
) -> Result<Ack, ClientError> {
    let user_id = auth.require_token()?;
    let ack: Ack = api
        .post(
            "/book/delete-column",
            &DeleteColumnRequest {
                user_id: &user_id,
                book_column_id: column_id,
            },
        )
        .await
        .inspect_err(|e| e.log("delete_column"))?;
    tracing::info!(column_id, "event column deleted");
    Ok(ack)
}
