//! Paginated lists against a mock backend

mod common;

use attendbook::client::notifications::{mark_all_read, unread_count};
use attendbook::client::pagination::{
    BookEventsSource, BooksSource, Filters, HistorySource, NotificationsSource, Paginator,
    SubscriptionsSource,
};
use attendbook::client::subscriptions::delete_subscription;
use attendbook::client::{FetchOutcome, Tone};
use attendbook::shared::models::book::SortOrder;
use attendbook::shared::{ClientError, PageSizes, RecordId};
use common::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

const BOOKS: &str = "/book/books";
const NOTIFICATIONS: &str = "/user/notifications";

fn ids<T>(items: &[T], key: impl Fn(&T) -> String) -> Vec<String> {
    items.iter().map(key).collect()
}

#[tokio::test]
async fn test_reset_then_append_keeps_server_order() {
    let backend = TestBackend::start().await;
    backend
        .on_post(
            BOOKS,
            json!({"page": 1, "per_page": 5, "sort_by": "created_at", "sort_order": "DESC", "user_id": TEST_UID}),
            ok(json!({
                "data": [book(9, "CHM101"), book(8, "PHY102"), book(7, "MTH103")],
                "pagination": {"current_page": 1, "total_pages": 2}
            })),
        )
        .await;
    backend
        .on_post(
            BOOKS,
            json!({"page": 2}),
            ok(json!({
                "data": [book(6, "BIO104"), book(5, "GST105")],
                "pagination": {"current_page": 2, "total_pages": 2}
            })),
        )
        .await;

    let books = Paginator::new(backend.api(), backend.auth(), BooksSource);
    assert_ok!(books.fetch_page(1, true).await);
    assert_ok!(books.fetch_page(2, false).await);

    let snapshot = books.snapshot().await;
    assert_eq!(
        ids(&snapshot.items, |b| b.book_id.to_string()),
        vec!["9", "8", "7", "6", "5"]
    );
    assert_eq!(snapshot.page, 2);
    assert!(!snapshot.has_more);
    assert!(!snapshot.is_loading);
}

#[tokio::test]
async fn test_load_more_while_loading_is_a_no_op() {
    let backend = TestBackend::start().await;
    backend
        .on_post(
            BOOKS,
            json!({"page": 1}),
            slow(
                ok(json!({
                    "data": [book(1, "CHM101")],
                    "pagination": {"current_page": 1, "hasMore": true}
                })),
                300,
            ),
        )
        .await;
    backend
        .expect_post(BOOKS, json!({"page": 2}), ok(json!({"data": []})), 0)
        .await;

    let books = Paginator::new(backend.api(), backend.auth(), BooksSource);
    let (refreshed, skipped) = tokio::join!(books.refresh(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(books.is_loading().await);
        let page_before = books.snapshot().await.page;
        let outcome = books.load_more().await;
        assert_eq!(books.snapshot().await.page, page_before);
        outcome
    });

    assert_eq!(assert_ok!(skipped), FetchOutcome::Skipped);
    assert_eq!(
        assert_ok!(refreshed),
        FetchOutcome::Applied { received: 1, added: 1 }
    );
    assert_eq!(backend.hits(BOOKS).await, 1);
}

#[tokio::test]
async fn test_refresh_does_not_cancel_in_flight_load_more() {
    let backend = TestBackend::start().await;
    backend
        .on_post(
            BOOKS,
            json!({"page": 1}),
            ok(json!({
                "data": [book(9, "CHM101"), book(8, "PHY102")],
                "pagination": {"current_page": 1, "total_pages": 3}
            })),
        )
        .await;
    backend
        .expect_post(
            BOOKS,
            json!({"page": 2}),
            slow(
                ok(json!({
                    "data": [book(7, "MTH103"), book(6, "BIO104")],
                    "pagination": {"current_page": 2, "total_pages": 3}
                })),
                300,
            ),
            1,
        )
        .await;

    let books = Paginator::new(backend.api(), backend.auth(), BooksSource);
    assert_ok!(books.refresh().await);

    let (appended, refreshed) = tokio::join!(books.load_more(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let outcome = books.refresh().await;
        // the refresh lands first and the older page is still pending
        let snapshot = books.snapshot().await;
        assert_eq!(ids(&snapshot.items, |b| b.book_id.to_string()), vec!["9", "8"]);
        assert_eq!(snapshot.page, 1);
        outcome
    });

    assert_eq!(
        assert_ok!(refreshed),
        FetchOutcome::Applied { received: 2, added: 2 }
    );
    assert_eq!(
        assert_ok!(appended),
        FetchOutcome::Applied { received: 2, added: 2 }
    );
    // last completion wins: the page requested before the refresh is appended
    let snapshot = books.snapshot().await;
    assert_eq!(
        ids(&snapshot.items, |b| b.book_id.to_string()),
        vec!["9", "8", "7", "6"]
    );
    assert_eq!(snapshot.page, 2);
    assert!(!snapshot.is_loading);
    assert_eq!(backend.hits(BOOKS).await, 3);
}

#[tokio::test]
async fn test_load_more_stops_when_exhausted() {
    let backend = TestBackend::start().await;
    backend
        .on_post(NOTIFICATIONS, json!({"page": 1}), notifications_page(1..=3, 1))
        .await;

    let feed = Paginator::new(backend.api(), backend.auth(), NotificationsSource);
    assert_ok!(feed.refresh().await);
    assert!(!feed.snapshot().await.has_more);

    assert_eq!(assert_ok!(feed.load_more().await), FetchOutcome::Skipped);
    assert_eq!(backend.hits(NOTIFICATIONS).await, 1);
}

#[tokio::test]
async fn test_overlapping_notification_page_is_deduplicated() {
    let backend = TestBackend::start().await;
    backend
        .on_post(NOTIFICATIONS, json!({"page": 1, "per_page": 3}), notifications_page(1..=3, 3))
        .await;
    backend
        .on_post(NOTIFICATIONS, json!({"page": 2}), notifications_page(3..=5, 3))
        .await;

    let sizes = PageSizes {
        notifications: 3,
        ..PageSizes::default()
    };
    let feed = Paginator::new(backend.api_with_sizes(sizes), backend.auth(), NotificationsSource);
    assert_ok!(feed.refresh().await);
    let outcome = assert_ok!(feed.load_more().await);

    assert_eq!(outcome, FetchOutcome::Applied { received: 3, added: 2 });
    let items = feed.items().await;
    assert_eq!(ids(&items, |n| n.id.to_string()), vec!["1", "2", "3", "4", "5"]);
    assert!(feed.snapshot().await.has_more);
}

#[tokio::test]
async fn test_failed_page_leaves_collection_untouched() {
    let backend = TestBackend::start().await;
    backend
        .on_post(NOTIFICATIONS, json!({"page": 1}), notifications_page(1..=2, 4))
        .await;
    backend
        .on_post(NOTIFICATIONS, json!({"page": 2}), rejected("Database busy"))
        .await;

    let feed = Paginator::new(backend.api(), backend.auth(), NotificationsSource);
    assert_ok!(feed.refresh().await);
    let before = feed.snapshot().await;

    assert_err!(feed.load_more().await, ClientError::Backend { .. });
    let after = feed.snapshot().await;
    assert_eq!(after.items, before.items);
    assert_eq!(after.page, 1);
    assert!(after.has_more);
    assert!(!after.is_loading);
    assert_notice!(feed.notice().await, Tone::Error, "Database busy");
}

#[tokio::test]
async fn test_transport_failure_shows_fallback() {
    let backend = TestBackend::start().await;
    backend
        .on_post(
            "/user/subscriptions",
            json!({"action": "list_subscriptions"}),
            wiremock::ResponseTemplate::new(503),
        )
        .await;

    let list = Paginator::new(backend.api(), backend.auth(), SubscriptionsSource);
    assert!(list.refresh().await.unwrap_err().is_transport());
    assert!(list.items().await.is_empty());
    assert_notice!(
        list.notice().await,
        Tone::Error,
        "Failed to load subscriptions. Please try again."
    );
}

#[tokio::test]
async fn test_search_filters_reset_to_page_one() {
    let backend = TestBackend::start().await;
    backend
        .on_post(BOOKS, json!({"search": ""}), ok(json!({
            "data": [book(1, "CHM101"), book(2, "PHY102")],
            "pagination": {"current_page": 1, "total_pages": 3}
        })))
        .await;
    backend
        .expect_post(
            BOOKS,
            json!({"search": "CHM", "page": 1, "sort_order": "ASC"}),
            ok(json!({
                "data": [book(1, "CHM101")],
                "pagination": {"current_page": 1, "total_pages": 1}
            })),
            1,
        )
        .await;

    let books = Paginator::new(backend.api(), backend.auth(), BooksSource);
    assert_ok!(books.refresh().await);
    assert_eq!(books.items().await.len(), 2);

    let filters = Filters {
        search: "CHM".into(),
        sort_by: None,
        sort_order: SortOrder::Ascending,
    };
    assert_ok!(books.apply_filters(filters.clone()).await);
    assert_eq!(books.filters().await, filters);
    let snapshot = books.snapshot().await;
    assert_eq!(ids(&snapshot.items, |b| b.book_title.clone()), vec!["CHM101"]);
    assert_eq!(snapshot.page, 1);
}

#[tokio::test]
async fn test_book_events_keep_header() {
    let backend = TestBackend::start().await;
    backend
        .on_post(
            "/book/book-details",
            json!({"book_id": 3, "page": 1, "per_page": 10}),
            ok(json!({
                "bookDetails": {"book_id": 3, "name": "CHM101", "total_students": 80},
                "events": [
                    {"id": 55, "name": "Week 3 Lab", "type": "physical", "short_code": "048217", "attendance_count": 12}
                ],
                "pagination": {"current_page": 1, "hasMore": false}
            })),
        )
        .await;

    let events = Paginator::new(backend.api(), backend.auth(), BookEventsSource::new(3));
    assert_ok!(events.refresh().await);

    let details = events.source().details().unwrap();
    assert_eq!(details.name, "CHM101");
    assert_eq!(details.total_students, 80);
    assert_eq!(events.items().await[0].short_code, "048217");
}

#[tokio::test]
async fn test_history_without_pagination_is_single_page() {
    let backend = TestBackend::start().await;
    backend
        .on_post(
            "/attendance/attendance-history",
            json!({"user_id": TEST_UID}),
            ok(json!({"data": [
                {"attendance_id": 1, "book_title": "CHM101", "column_name": "Week 3 Lab", "attendance_time": "2024-09-02 09:05"},
                {"attendance_id": "2", "book_title": "PHY102", "column_name": "Tutorial", "attendance_time": "2024-09-03 14:00"}
            ]})),
        )
        .await;

    let history = Paginator::new(backend.api(), backend.auth(), HistorySource);
    assert_ok!(history.refresh().await);
    let snapshot = history.snapshot().await;
    assert_eq!(snapshot.items.len(), 2);
    assert!(!snapshot.has_more);
}

#[tokio::test]
async fn test_mark_all_read_updates_loaded_items() {
    let backend = TestBackend::start().await;
    backend
        .on_post(NOTIFICATIONS, json!({"page": 1}), notifications_page(1..=3, 1))
        .await;
    backend
        .expect_post("/user/mark-read", json!({"user_id": TEST_UID}), ok(json!({})), 1)
        .await;

    let feed = Paginator::new(backend.api(), backend.auth(), NotificationsSource);
    assert_ok!(feed.refresh().await);
    assert_eq!(unread_count(&feed).await, 3);

    assert_ok!(mark_all_read(&feed).await);
    assert_eq!(unread_count(&feed).await, 0);
}

#[tokio::test]
async fn test_delete_subscription_removes_record() {
    let backend = TestBackend::start().await;
    backend
        .on_post(
            "/user/subscriptions",
            json!({"action": "list_subscriptions"}),
            ok(json!({
                "subscriptions": [
                    {"id": 11, "book_name": "CHM101", "subscription_date": "2024-09-01"},
                    {"id": 12, "book_name": "PHY102", "subscription_date": "2024-09-02"}
                ],
                "total_pages": 1
            })),
        )
        .await;
    backend
        .expect_post(
            "/user/subscriptions",
            json!({"action": "delete_subscription", "subscription_id": "11"}),
            ok(json!({})),
            1,
        )
        .await;

    let list = Paginator::new(backend.api(), backend.auth(), SubscriptionsSource);
    assert_ok!(list.refresh().await);
    assert_ok!(delete_subscription(&list, &RecordId::from(11_i64)).await);

    let remaining = list.items().await;
    assert_eq!(ids(&remaining, |s| s.id.to_string()), vec!["12"]);
    assert_notice!(list.notice().await, Tone::Success, "Subscription deleted successfully");
}

#[tokio::test]
async fn test_logged_out_list_sends_nothing() {
    let backend = TestBackend::start().await;
    let feed = Paginator::new(
        backend.api(),
        attendbook::client::AuthContext::in_memory(None),
        NotificationsSource,
    );
    assert_err!(feed.refresh().await, ClientError::NotAuthenticated);
    assert!(!feed.is_loading().await);
    assert_eq!(backend.hits(NOTIFICATIONS).await, 0);
}
