use chrono::NaiveDate;

use sqlx::{PgPool, Postgres, QueryBuilder};

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{CostFilter, NewSubscription, Subscription};

/// Subscription repository trait, implemented once per storage backend.
/// NOTE: Intended to facilitate easier testing/mocking
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SubscriptionRepo: Send + Sync {
    /// Insert a new subscription, returning the id assigned by the store
    async fn insert(&self, new_subscription: &NewSubscription) -> Result<i32>;

    /// Fetch every subscription ordered by id
    async fn fetch_all(&self) -> Result<Vec<Subscription>>;

    /// Fetch a single subscription, `Error::NotFound` if there is none
    async fn fetch_by_id(&self, id: i32) -> Result<Subscription>;

    /// Delete a single subscription, `Error::NotFound` if nothing was deleted
    async fn delete_by_id(&self, id: i32) -> Result<()>;

    /// Sum of prices over all subscriptions matching the filter, 0 if none match
    async fn total_cost(&self, filter: &CostFilter) -> Result<i64>;
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: i32,
    service_name: String,
    price: i32,
    user_id: Uuid,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Self {
            id: row.id,
            service_name: row.service_name,
            price: row.price,
            user_id: row.user_id,
            start_date: row.start_date.into(),
            end_date: row.end_date.map(Into::into),
        }
    }
}

/// Postgres Subscription Repository
#[derive(Debug, Clone)]
pub struct PgSubscriptionRepo {
    pool: PgPool,
}

impl PgSubscriptionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SubscriptionRepo for PgSubscriptionRepo {
    #[tracing::instrument(name = "Insert subscription", skip(self))]
    async fn insert(&self, new_subscription: &NewSubscription) -> Result<i32> {
        let id: i32 = sqlx::query_scalar(
            "insert into subscriptions(service_name, price, user_id, start_date, end_date) \
             values ($1, $2, $3, $4, $5) returning id",
        )
        .bind(new_subscription.service_name.as_ref())
        .bind(new_subscription.price.value())
        .bind(new_subscription.user_id)
        .bind(new_subscription.start_date.first_day())
        .bind(new_subscription.end_date.map(|date| date.first_day()))
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    #[tracing::instrument(name = "Fetch all subscriptions", skip(self))]
    async fn fetch_all(&self) -> Result<Vec<Subscription>> {
        let rows: Vec<SubscriptionRow> = sqlx::query_as(
            "select id, service_name, price, user_id, start_date, end_date \
             from subscriptions order by id",
        )
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = rows.len(), "Fetched subscriptions");
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(name = "Fetch subscription by id", skip(self))]
    async fn fetch_by_id(&self, id: i32) -> Result<Subscription> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            "select id, service_name, price, user_id, start_date, end_date \
             from subscriptions where id=$1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Into::into).ok_or(Error::NotFound)
    }

    #[tracing::instrument(name = "Delete subscription by id", skip(self))]
    async fn delete_by_id(&self, id: i32) -> Result<()> {
        let result = sqlx::query("delete from subscriptions where id=$1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Sum subscription prices", skip(self))]
    async fn total_cost(&self, filter: &CostFilter) -> Result<i64> {
        let mut query = QueryBuilder::<Postgres>::new(
            "select coalesce(sum(price), 0)::bigint from subscriptions where start_date <= ",
        );
        query.push_bind(filter.end_date.first_day());
        query.push(" and (end_date is null or end_date >= ");
        query.push_bind(filter.start_date.first_day());
        query.push(")");

        if let Some(user_id) = filter.user_id {
            query.push(" and user_id = ");
            query.push_bind(user_id);
        }
        if let Some(service_name) = &filter.service_name {
            query.push(" and service_name = ");
            query.push_bind(service_name.clone());
        }

        let total: i64 = query.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(total)
    }
}
