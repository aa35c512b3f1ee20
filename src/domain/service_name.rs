use std::str::FromStr;

use crate::error::{Error, Result};

/// Name of the subscribed service, e.g. "Netflix"
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceName(String);

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ServiceName> for String {
    fn from(name: ServiceName) -> Self {
        name.0
    }
}

impl FromStr for ServiceName {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        if value.trim().is_empty() {
            return Err(Error::Validation("service_name cannot be empty".into()));
        }
        Ok(Self(value.to_string()))
    }
}
