use std::fmt::Formatter;

use crate::data::repo::StoreError;

#[derive(Debug)]
pub enum QueryError {
    /// A parameter did not parse; the store was not queried
    InvalidArgument { name: &'static str, value: String },
    StoreUnavailable(StoreError)
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            QueryError::InvalidArgument { name, value } => {
                write!(f, "Invalid value for {}: {:?}", name, value)
            },
            QueryError::StoreUnavailable(inner) => {
                write!(f, "Postcode store unavailable: {}", inner)
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl From<StoreError> for QueryError {
    fn from(error: StoreError) -> Self {
        QueryError::StoreUnavailable(error)
    }
}
