//! Subscription list actions

use crate::client::notice::Notice;
use crate::client::pagination::{Paginator, SubscriptionsSource};
use crate::shared::error::ClientError;
use crate::shared::models::subscription::DeleteSubscriptionRequest;
use crate::shared::wire::{Ack, RecordId};

pub type SubscriptionList = Paginator<SubscriptionsSource>;

const DELETED: &str = "Subscription deleted successfully";
const DELETE_FAILED: &str = "Failed to delete subscription";
const DELETE_ERROR: &str = "Failed to delete subscription. Please try again.";

/// Delete one subscription and drop it from the loaded list
pub async fn delete_subscription(list: &SubscriptionList, id: &RecordId) -> Result<(), ClientError> {
    let result = async {
        list.auth().require_token()?;
        list.api()
            .post::<_, Ack>("/user/subscriptions", &DeleteSubscriptionRequest::new(id))
            .await
    }
    .await;

    match result {
        Ok(_) => {
            list.update_items(|items| items.retain(|s| &s.id != id)).await;
            list.set_notice(Notice::success(DELETED)).await;
            tracing::info!(subscription = %id, "subscription deleted");
            Ok(())
        }
        Err(err) => {
            err.log("delete_subscription");
            list.set_notice(Notice::from_error(&err, DELETE_FAILED, DELETE_ERROR))
                .await;
            Err(err)
        }
    }
}
