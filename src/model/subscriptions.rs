use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::domain::{MonthYear, Price, ServiceName};

/// Create subscription request body, as sent by clients
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub service_name: String,
    pub price: i64,
    pub user_id: Uuid,
    /// `MM-YYYY`
    pub start_date: String,
    /// `MM-YYYY`, absent for open-ended subscriptions
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Validated subscription waiting to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub service_name: ServiceName,
    pub price: Price,
    pub user_id: Uuid,
    pub start_date: MonthYear,
    pub end_date: Option<MonthYear>,
}

/// Stored Subscription record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// ID of the subscription, assigned by the store
    pub id: i32,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: MonthYear,
    /// `None` while the subscription is still active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<MonthYear>,
}

impl Subscription {
    /// Attach a store-assigned id to a freshly inserted subscription
    pub fn from_new(id: i32, new_subscription: NewSubscription) -> Self {
        Self {
            id,
            service_name: new_subscription.service_name.into(),
            price: new_subscription.price.value(),
            user_id: new_subscription.user_id,
            start_date: new_subscription.start_date,
            end_date: new_subscription.end_date,
        }
    }

    /// Whether the subscription is active at some point of the inclusive `[start, end]` window.
    ///
    /// Reversed windows are not rejected; the comparison is applied as written.
    pub fn overlaps(&self, start: MonthYear, end: MonthYear) -> bool {
        self.start_date <= end && self.end_date.map_or(true, |end_date| end_date >= start)
    }
}

/// Cost aggregation query string
#[derive(Debug, Clone, Deserialize)]
pub struct CostQuery {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    /// `MM-YYYY`
    pub start_date: String,
    /// `MM-YYYY`
    pub end_date: String,
}

/// Validated cost aggregation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CostFilter {
    pub start_date: MonthYear,
    pub end_date: MonthYear,
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
}

impl CostFilter {
    pub fn matches(&self, subscription: &Subscription) -> bool {
        subscription.overlaps(self.start_date, self.end_date)
            && self.user_id.map_or(true, |id| subscription.user_id == id)
            && self
                .service_name
                .as_deref()
                .map_or(true, |name| subscription.service_name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TotalCost {
    pub total_cost: i64,
}
