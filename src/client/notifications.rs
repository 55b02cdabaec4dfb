//! Notification feed actions

use crate::client::pagination::{NotificationsSource, Paginator};
use crate::shared::error::ClientError;
use crate::shared::models::notification::MarkReadRequest;
use crate::shared::wire::Ack;

/// Paginated notification feed
pub type NotificationFeed = Paginator<NotificationsSource>;

/// Mark every notification read on the backend, then locally.
///
/// Failures are logged and returned but raise no notice; the feed simply keeps
/// showing the unread markers.
pub async fn mark_all_read(feed: &NotificationFeed) -> Result<(), ClientError> {
    let user_id = feed.auth().require_token()?;
    let _: Ack = feed
        .api()
        .post("/user/mark-read", &MarkReadRequest { user_id: &user_id })
        .await
        .inspect_err(|e| e.log("mark_all_read"))?;

    feed.update_items(|items| items.iter_mut().for_each(|n| n.is_read = true))
        .await;
    tracing::debug!("notifications marked read");
    Ok(())
}

/// Number of loaded notifications not yet read
pub async fn unread_count(feed: &NotificationFeed) -> usize {
    feed.items().await.iter().filter(|n| !n.is_read).count()
}
