//! Page sources for each list endpoint

use super::{Page, PageRequest, PageSource};
use crate::client::api::ApiClient;
use crate::shared::config::PageSizes;
use crate::shared::error::ClientError;
use crate::shared::models::book::{
    Book, BookDetails, BookDetailsRequest, BookDetailsResponse, BookEvent, BooksRequest,
    BooksResponse,
};
use crate::shared::models::history::{AttendanceRecord, HistoryRequest, HistoryResponse};
use crate::shared::models::notification::{Notification, NotificationsRequest, NotificationsResponse};
use crate::shared::models::subscription::{Subscription, SubscriptionsRequest, SubscriptionsResponse};
use crate::shared::wire::RecordId;
use std::future::Future;
use std::sync::RwLock;

/// Column the book list sorts on unless the caller picks another
pub const DEFAULT_BOOK_SORT: &str = "created_at";

fn has_more_by_count(page: u32, total_pages: u64) -> bool {
    u64::from(page) < total_pages
}

/// `/book/books`
#[derive(Debug, Clone, Copy, Default)]
pub struct BooksSource;

impl PageSource for BooksSource {
    type Item = Book;
    type Key = i64;

    const NAME: &'static str = "books";
    const FAILURE_MESSAGE: &'static str = "Failed to load books. Please try again.";

    fn key(item: &Book) -> i64 {
        item.book_id
    }

    fn page_size(sizes: &PageSizes) -> u32 {
        sizes.books
    }

    fn fetch(
        &self,
        api: &ApiClient,
        request: PageRequest<'_>,
    ) -> impl Future<Output = Result<Page<Book>, ClientError>> + Send {
        let body = BooksRequest {
            user_id: request.user_id,
            search: &request.filters.search,
            page: request.page,
            per_page: request.per_page,
            sort_by: request.filters.sort_by.as_deref().unwrap_or(DEFAULT_BOOK_SORT),
            sort_order: request.filters.sort_order,
        };
        async move {
            let reply: BooksResponse = api.post("/book/books", &body).await?;
            Ok(Page {
                current_page: reply.pagination.current_page.try_into().unwrap_or(0),
                has_more: reply.pagination.more_available(),
                records: reply.data,
            })
        }
    }
}

/// `/book/book-details`: events of one book, plus the book header
#[derive(Debug)]
pub struct BookEventsSource {
    book_id: i64,
    details: RwLock<Option<BookDetails>>,
}

impl BookEventsSource {
    pub fn new(book_id: i64) -> Self {
        Self {
            book_id,
            details: RwLock::new(None),
        }
    }

    pub fn book_id(&self) -> i64 {
        self.book_id
    }

    /// Header from the most recent successful page
    pub fn details(&self) -> Option<BookDetails> {
        self.details.read().ok().and_then(|d| d.clone())
    }
}

impl PageSource for BookEventsSource {
    type Item = BookEvent;
    type Key = i64;

    const NAME: &'static str = "book_events";
    const FAILURE_MESSAGE: &'static str = "Failed to fetch book details";

    fn key(item: &BookEvent) -> i64 {
        item.id
    }

    fn page_size(sizes: &PageSizes) -> u32 {
        sizes.events
    }

    fn fetch(
        &self,
        api: &ApiClient,
        request: PageRequest<'_>,
    ) -> impl Future<Output = Result<Page<BookEvent>, ClientError>> + Send {
        let body = BookDetailsRequest {
            user_id: request.user_id,
            book_id: self.book_id,
            page: request.page,
            per_page: request.per_page,
        };
        async move {
            let reply: BookDetailsResponse = api.post("/book/book-details", &body).await?;
            if let Ok(mut details) = self.details.write() {
                *details = Some(reply.book_details);
            }
            Ok(Page {
                current_page: reply.pagination.current_page.try_into().unwrap_or(0),
                has_more: reply.pagination.more_available(),
                records: reply.events,
            })
        }
    }
}

/// `/user/notifications`
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationsSource;

impl PageSource for NotificationsSource {
    type Item = Notification;
    type Key = RecordId;

    const NAME: &'static str = "notifications";
    const FAILURE_MESSAGE: &'static str = "Failed to load notifications. Please try again.";

    fn key(item: &Notification) -> RecordId {
        item.id.clone()
    }

    fn page_size(sizes: &PageSizes) -> u32 {
        sizes.notifications
    }

    fn fetch(
        &self,
        api: &ApiClient,
        request: PageRequest<'_>,
    ) -> impl Future<Output = Result<Page<Notification>, ClientError>> + Send {
        let body = NotificationsRequest {
            user_id: request.user_id,
            page: request.page,
            per_page: request.per_page,
        };
        let page = request.page;
        async move {
            let reply: NotificationsResponse = api.post("/user/notifications", &body).await?;
            Ok(Page {
                records: reply.notifications,
                current_page: page,
                has_more: has_more_by_count(page, reply.total_pages),
            })
        }
    }
}

/// `/user/subscriptions` with `action: list_subscriptions`
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscriptionsSource;

impl PageSource for SubscriptionsSource {
    type Item = Subscription;
    type Key = RecordId;

    const NAME: &'static str = "subscriptions";
    const FAILURE_MESSAGE: &'static str = "Failed to load subscriptions. Please try again.";

    fn key(item: &Subscription) -> RecordId {
        item.id.clone()
    }

    fn page_size(sizes: &PageSizes) -> u32 {
        sizes.subscriptions
    }

    fn fetch(
        &self,
        api: &ApiClient,
        request: PageRequest<'_>,
    ) -> impl Future<Output = Result<Page<Subscription>, ClientError>> + Send {
        let body = SubscriptionsRequest::list(request.user_id, request.page, request.per_page);
        let page = request.page;
        async move {
            let reply: SubscriptionsResponse = api.post("/user/subscriptions", &body).await?;
            Ok(Page {
                records: reply.subscriptions,
                current_page: page,
                has_more: has_more_by_count(page, reply.total_pages),
            })
        }
    }
}

/// `/attendance/attendance-history`
#[derive(Debug, Clone, Copy, Default)]
pub struct HistorySource;

impl PageSource for HistorySource {
    type Item = AttendanceRecord;
    type Key = RecordId;

    const NAME: &'static str = "history";
    const FAILURE_MESSAGE: &'static str = "Failed to load attendance history";

    fn key(item: &AttendanceRecord) -> RecordId {
        item.attendance_id.clone()
    }

    fn page_size(sizes: &PageSizes) -> u32 {
        sizes.history
    }

    fn fetch(
        &self,
        api: &ApiClient,
        request: PageRequest<'_>,
    ) -> impl Future<Output = Result<Page<AttendanceRecord>, ClientError>> + Send {
        let body = HistoryRequest {
            user_id: request.user_id,
            page: request.page,
            per_page: request.per_page,
        };
        let page = request.page;
        async move {
            let reply: HistoryResponse = api.post("/attendance/attendance-history", &body).await?;
            // without a pagination block the whole history arrives at once
            let (current_page, has_more) = match reply.pagination {
                Some(info) => (info.current_page.try_into().unwrap_or(page), info.more_available()),
                None => (page, false),
            };
            Ok(Page {
                records: reply.data,
                current_page,
                has_more,
            })
        }
    }
}
