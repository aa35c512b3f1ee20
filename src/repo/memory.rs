use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::model::{CostFilter, NewSubscription, Subscription};

use super::SubscriptionRepo;

#[derive(Debug, Default)]
struct Store {
    last_id: i32,
    rows: BTreeMap<i32, Subscription>,
}

/// Process-local subscription storage.
///
/// Every operation holds the lock for its whole duration, so `total_cost`
/// sums over a consistent snapshot even with concurrent writers.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionRepo {
    store: RwLock<Store>,
}

impl InMemorySubscriptionRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubscriptionRepo for InMemorySubscriptionRepo {
    #[tracing::instrument(name = "Insert subscription", skip(self))]
    async fn insert(&self, new_subscription: &NewSubscription) -> Result<i32> {
        let mut store = self.store.write().await;

        let id = store
            .last_id
            .checked_add(1)
            .ok_or_else(|| Error::Storage(anyhow::anyhow!("subscription id space exhausted")))?;
        store.last_id = id;
        store
            .rows
            .insert(id, Subscription::from_new(id, new_subscription.clone()));

        Ok(id)
    }

    #[tracing::instrument(name = "Fetch all subscriptions", skip(self))]
    async fn fetch_all(&self) -> Result<Vec<Subscription>> {
        let store = self.store.read().await;
        Ok(store.rows.values().cloned().collect())
    }

    #[tracing::instrument(name = "Fetch subscription by id", skip(self))]
    async fn fetch_by_id(&self, id: i32) -> Result<Subscription> {
        let store = self.store.read().await;
        store.rows.get(&id).cloned().ok_or(Error::NotFound)
    }

    #[tracing::instrument(name = "Delete subscription by id", skip(self))]
    async fn delete_by_id(&self, id: i32) -> Result<()> {
        let mut store = self.store.write().await;
        store.rows.remove(&id).map(|_| ()).ok_or(Error::NotFound)
    }

    #[tracing::instrument(name = "Sum subscription prices", skip(self))]
    async fn total_cost(&self, filter: &CostFilter) -> Result<i64> {
        let store = self.store.read().await;
        let total: i64 = store
            .rows
            .values()
            .filter(|subscription| filter.matches(subscription))
            .map(|subscription| i64::from(subscription.price))
            .sum();

        Ok(total)
    }
}
