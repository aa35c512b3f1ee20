mod error;
pub mod subscriptions;

pub use error::{RestError, RestResult};
