//! Backend calls used by the attendance flow.
//!
//! The session is generic over [`AttendanceApi`] so it can be driven against
//! the real backend or an in-process fake.

use crate::client::api::ApiClient;
use crate::client::location::GeoSample;
use crate::shared::error::ClientError;
use crate::shared::models::attendance::{
    AttendanceEvent, EventLookupRequest, EventLookupResponse, MarkAttendanceRequest,
    SubscribeRequest, SubscriptionAction,
};
use crate::shared::wire::Ack;
use std::future::Future;

const ATTENDANCE_PATH: &str = "/attendance/attendance";
const SUBSCRIBE_PATH: &str = "/attendance/subscribe";

pub trait AttendanceApi {
    /// Resolve a shortcode to the event it opens
    fn lookup_event(
        &self,
        code: &str,
        user_id: &str,
    ) -> impl Future<Output = Result<AttendanceEvent, ClientError>> + Send;

    /// Record the user as present at `column_id`, reporting where they are
    fn mark_attendance(
        &self,
        column_id: i64,
        user_id: &str,
        at: GeoSample,
    ) -> impl Future<Output = Result<Ack, ClientError>> + Send;

    fn set_subscription(
        &self,
        action: SubscriptionAction,
        column_id: i64,
        user_id: &str,
    ) -> impl Future<Output = Result<Ack, ClientError>> + Send;
}

impl AttendanceApi for ApiClient {
    async fn lookup_event(&self, code: &str, user_id: &str) -> Result<AttendanceEvent, ClientError> {
        let response: EventLookupResponse = self
            .post(ATTENDANCE_PATH, &EventLookupRequest::by_shortcode(code, user_id))
            .await?;
        Ok(response.data.into())
    }

    async fn mark_attendance(
        &self,
        column_id: i64,
        user_id: &str,
        at: GeoSample,
    ) -> Result<Ack, ClientError> {
        self.post(ATTENDANCE_PATH, &MarkAttendanceRequest::new(column_id, user_id, at))
            .await
    }

    async fn set_subscription(
        &self,
        action: SubscriptionAction,
        column_id: i64,
        user_id: &str,
    ) -> Result<Ack, ClientError> {
        self.post(
            SUBSCRIBE_PATH,
            &SubscribeRequest {
                action,
                book_column_id: column_id,
                user_id,
            },
        )
        .await
    }
}
