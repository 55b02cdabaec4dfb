//! Subscription list types (`/user/subscriptions`)

use crate::shared::wire::{lenient_count, RecordId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionsRequest<'a> {
    pub action: &'static str,
    pub user_id: &'a str,
    pub page: u32,
    pub per_page: u32,
}

impl<'a> SubscriptionsRequest<'a> {
    pub fn list(user_id: &'a str, page: u32, per_page: u32) -> Self {
        Self {
            action: "list_subscriptions",
            user_id,
            page,
            per_page,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionsResponse {
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Subscription {
    pub id: RecordId,
    #[serde(default)]
    pub book_name: String,
    #[serde(default)]
    pub subscription_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteSubscriptionRequest<'a> {
    pub action: &'static str,
    pub subscription_id: &'a RecordId,
}

impl<'a> DeleteSubscriptionRequest<'a> {
    pub fn new(subscription_id: &'a RecordId) -> Self {
        Self {
            action: "delete_subscription",
            subscription_id,
        }
    }
}
