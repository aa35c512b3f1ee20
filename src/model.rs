mod subscriptions;

pub use subscriptions::{
    CostFilter, CostQuery, CreateSubscriptionRequest, NewSubscription, Subscription, TotalCost,
};
