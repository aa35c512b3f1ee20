use uuid::Uuid;

use crate::domain::MonthYear;
use crate::error::{Error, Result};
use crate::model::{CostFilter, CostQuery, CreateSubscriptionRequest, NewSubscription, Subscription};
use crate::repo::SubscriptionRepo;

/// Validates incoming requests and hands them over to a subscription repository
pub struct SubscriptionService {
    repo: Box<dyn SubscriptionRepo>,
}

impl SubscriptionService {
    pub fn new(repo: impl SubscriptionRepo + 'static) -> Self {
        Self {
            repo: Box::new(repo),
        }
    }

    #[tracing::instrument(name = "Create subscription", skip(self))]
    pub async fn create(&self, request: CreateSubscriptionRequest) -> Result<Subscription> {
        let new_subscription = NewSubscription::try_from(request)?;

        let id = self.repo.insert(&new_subscription).await?;

        tracing::info!(subscription_id = id, "Created subscription");
        Ok(Subscription::from_new(id, new_subscription))
    }

    #[tracing::instrument(name = "List subscriptions", skip(self))]
    pub async fn list(&self) -> Result<Vec<Subscription>> {
        self.repo.fetch_all().await
    }

    #[tracing::instrument(name = "Get subscription", skip(self))]
    pub async fn get(&self, id: i32) -> Result<Subscription> {
        self.repo.fetch_by_id(id).await
    }

    #[tracing::instrument(name = "Delete subscription", skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        self.repo.delete_by_id(id).await
    }

    #[tracing::instrument(name = "Calculate total cost", skip(self))]
    pub async fn total_cost(&self, query: CostQuery) -> Result<i64> {
        let filter = CostFilter::try_from(query)?;

        let total = self.repo.total_cost(&filter).await?;

        tracing::info!(total_cost = total, "Calculated total cost");
        Ok(total)
    }
}

/// Parse a `MM-YYYY` request field, naming the field on failure
fn parse_month(field: &str, value: &str) -> Result<MonthYear> {
    value.parse::<MonthYear>().map_err(|e| {
        tracing::warn!(error.cause_chain = ?e, "Invalid {} \"{}\"", field, value);
        Error::Validation(format!("invalid {} format, expected MM-YYYY", field))
    })
}

impl TryFrom<CreateSubscriptionRequest> for NewSubscription {
    type Error = Error;

    fn try_from(request: CreateSubscriptionRequest) -> Result<Self> {
        let service_name = request.service_name.parse()?;
        let price = request.price.try_into()?;
        let start_date = parse_month("start_date", &request.start_date)?;
        let end_date = request
            .end_date
            .as_deref()
            .map(|value| parse_month("end_date", value))
            .transpose()?;

        if let Some(end_date) = end_date {
            if end_date < start_date {
                return Err(Error::Validation(
                    "end_date must not be earlier than start_date".into(),
                ));
            }
        }

        Ok(Self {
            service_name,
            price,
            user_id: request.user_id,
            start_date,
            end_date,
        })
    }
}

impl TryFrom<CostQuery> for CostFilter {
    type Error = Error;

    fn try_from(query: CostQuery) -> Result<Self> {
        let start_date = parse_month("start_date", &query.start_date)?;
        let end_date = parse_month("end_date", &query.end_date)?;
        let user_id = query
            .user_id
            .as_deref()
            .map(|value| {
                Uuid::parse_str(value).map_err(|_| {
                    Error::Validation("invalid user_id format, expected UUID".into())
                })
            })
            .transpose()?;

        Ok(Self {
            start_date,
            end_date,
            user_id,
            service_name: query.service_name,
        })
    }
}
