mod memory;
mod subscriptions;

pub use memory::InMemorySubscriptionRepo;
pub use subscriptions::{PgSubscriptionRepo, SubscriptionRepo};

#[cfg(test)]
pub use subscriptions::MockSubscriptionRepo;
