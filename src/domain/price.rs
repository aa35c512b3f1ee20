use crate::error::{Error, Result};

/// Monthly price in minor currency units, always at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(i32);

impl Price {
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for Price {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        if value < 1 {
            return Err(Error::Validation("price must be a positive integer".into()));
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| Error::Validation("price is too large".into()))
    }
}
