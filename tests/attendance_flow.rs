//! Attend screen against a mock backend

mod common;

use assert_matches::assert_matches;
use attendbook::client::attendance::{AttendanceSession, HoldOutcome, SessionState, SubmitOutcome};
use attendbook::client::location::FixedLocation;
use attendbook::client::{ApiClient, AuthContext, Tone};
use attendbook::shared::ClientError;
use common::*;
use serde_json::json;
use std::time::Duration;

const LOOKUP: &str = "/attendance/attendance";
const SUBSCRIBE: &str = "/attendance/subscribe";

fn chm101(marked: bool, subscribed: bool) -> serde_json::Value {
    json!({
        "data": {
            "book_title": "CHM101",
            "column_name": "Week 3 Lab",
            "location_name": "Chemistry Lab 2",
            "total_attendance": "12",
            "latitude": "7.2201",
            "longitude": "3.4301",
            "column_id": 55,
            "hasMarkedAttendance": if marked { 1 } else { 0 },
            "isSubscribed": if subscribed { "1" } else { "0" }
        }
    })
}

async fn mount_lookup(backend: &TestBackend, marked: bool) {
    backend
        .on_post(
            LOOKUP,
            json!({
                "action": "get_event_details",
                "identifier": "048217",
                "identifier_type": "shortcode",
                "user_id": TEST_UID,
                "pass": TEST_PASS
            }),
            ok(chm101(marked, false)),
        )
        .await;
}

async fn located_session(backend: &TestBackend) -> AttendanceSession<ApiClient> {
    let mut session = AttendanceSession::new(backend.api(), backend.auth());
    assert_ok!(
        session
            .acquire_location(&FixedLocation::at(7.2201, 3.4301))
            .await
    );
    session
}

#[tokio::test]
async fn test_code_to_marked_end_to_end() {
    let backend = TestBackend::start().await;
    mount_lookup(&backend, false).await;
    backend
        .expect_post(
            LOOKUP,
            json!({
                "action": "mark_attendance",
                "book_column_id": 55,
                "user_id": TEST_UID,
                "latitude": 7.2201,
                "longitude": 3.4301
            }),
            ok(json!({"message": "Attendance marked successfully"})),
            1,
        )
        .await;

    let mut session = located_session(&backend).await;
    session.enter_code("048217");
    assert_eq!(assert_ok!(session.submit_code().await), SubmitOutcome::Loaded);

    let event = session.state().event().cloned().unwrap();
    assert_eq!(event.event_title, "CHM101");
    assert_eq!(event.location_label, "Week 3 Lab");
    assert_eq!(event.checked_in_count, 12);
    assert_eq!(event.column_id, 55);
    assert!(!event.subscribed);

    let outcome = session.hold_to_confirm(std::future::pending()).await;
    assert_eq!(assert_ok!(outcome), HoldOutcome::Marked);
    assert_matches!(session.state(), SessionState::Marked(e) if e.column_id == 55);
    assert_eq!(session.progress(), 100);

    assert_ok!(session.done());
    assert_eq!(session.state(), &SessionState::CodeEntry);
    assert_eq!(session.code(), "");
}

#[tokio::test]
async fn test_already_marked_stays_in_code_entry() {
    let backend = TestBackend::start().await;
    mount_lookup(&backend, true).await;

    let mut session = located_session(&backend).await;
    session.enter_code("048217");
    assert_eq!(assert_ok!(session.submit_code().await), SubmitOutcome::AlreadyMarked);
    assert_eq!(session.state(), &SessionState::CodeEntry);
    assert_eq!(session.notice().map(|n| n.tone), Some(Tone::Error));
}

#[tokio::test]
async fn test_short_code_never_reaches_backend() {
    let backend = TestBackend::start().await;
    let mut session = located_session(&backend).await;
    session.enter_code("0482");

    assert_err!(session.submit_code().await, ClientError::Validation { field: "code", .. });
    assert_notice!(session.notice(), Tone::Error, "Please enter a 6-digit code");
    assert_eq!(backend.hits(LOOKUP).await, 0);
}

#[tokio::test]
async fn test_invalid_code_shows_backend_message() {
    let backend = TestBackend::start().await;
    backend
        .on_post(LOOKUP, json!({"action": "get_event_details"}), rejected("Invalid attendance code"))
        .await;

    let mut session = located_session(&backend).await;
    session.enter_code("999999");
    assert_err!(session.submit_code().await, ClientError::Backend { .. });
    assert_eq!(session.state(), &SessionState::CodeEntry);
    assert_notice!(session.notice(), Tone::Error, "Invalid attendance code");
}

#[tokio::test]
async fn test_transport_failure_uses_generic_message() {
    let backend = TestBackend::start().await;
    backend
        .on_post(
            LOOKUP,
            json!({"action": "get_event_details"}),
            wiremock::ResponseTemplate::new(500).set_body_string("Internal Server Error"),
        )
        .await;

    let mut session = located_session(&backend).await;
    session.enter_code("048217");
    let err = session.submit_code().await.unwrap_err();
    assert!(err.is_transport());
    assert_notice!(session.notice(), Tone::Error, "Error fetching event details");
}

#[tokio::test]
async fn test_subscription_toggle_round_trip() {
    let backend = TestBackend::start().await;
    mount_lookup(&backend, false).await;
    backend
        .expect_post(
            SUBSCRIBE,
            json!({"action": "subscribe", "book_column_id": 55, "user_id": TEST_UID}),
            ok(json!({})),
            1,
        )
        .await;
    backend
        .expect_post(
            SUBSCRIBE,
            json!({"action": "unsubscribe", "book_column_id": 55}),
            ok(json!({})),
            1,
        )
        .await;

    let mut session = located_session(&backend).await;
    session.enter_code("048217");
    assert_ok!(session.submit_code().await);

    assert!(assert_ok!(session.toggle_subscription().await));
    assert_eq!(session.notice().map(|n| n.tone), Some(Tone::Success));
    assert!(!assert_ok!(session.toggle_subscription().await));
    assert_matches!(session.state(), SessionState::EventLoaded(e) if !e.subscribed);
}

#[tokio::test]
async fn test_released_press_sends_nothing() {
    let backend = TestBackend::start().await;
    mount_lookup(&backend, false).await;

    let mut session = located_session(&backend).await;
    session.enter_code("048217");
    assert_ok!(session.submit_code().await);

    let outcome = session
        .hold_to_confirm(tokio::time::sleep(Duration::from_millis(70)))
        .await;
    assert_matches!(outcome, Ok(HoldOutcome::Released { progress }) if progress < 100);
    assert_matches!(session.state(), SessionState::EventLoaded(_));
    assert_eq!(session.progress(), 0);
    // only the lookup reached the backend
    assert_eq!(backend.hits(LOOKUP).await, 1);
}

#[tokio::test]
async fn test_rejected_mark_returns_to_event_loaded() {
    let backend = TestBackend::start().await;
    mount_lookup(&backend, false).await;
    backend
        .expect_post(
            LOOKUP,
            json!({"action": "mark_attendance"}),
            rejected("You are outside the event radius"),
            1,
        )
        .await;

    let mut session = located_session(&backend).await;
    session.enter_code("048217");
    assert_ok!(session.submit_code().await);

    assert_err!(
        session.hold_to_confirm(std::future::pending()).await,
        ClientError::Backend { .. }
    );
    assert_matches!(session.state(), SessionState::EventLoaded(_));
    assert_notice!(session.notice(), Tone::Error, "You are outside the event radius");
}

#[tokio::test]
async fn test_logged_out_lookup_is_blocking() {
    let backend = TestBackend::start().await;
    let mut session = AttendanceSession::new(backend.api(), AuthContext::in_memory(None));
    session.enter_code("048217");

    assert_err!(session.submit_code().await, ClientError::NotAuthenticated);
    assert_eq!(backend.hits(LOOKUP).await, 0);
}
