use std::fmt::Formatter;

#[derive(Debug)]
pub enum StoreError {
    /// No connection could be obtained
    Unavailable(Box<dyn std::fmt::Debug + Send>),
    Database(diesel::result::Error),
    /// A writer panicked while holding the in-memory lock
    Poisoned
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let msg = match self {
            StoreError::Unavailable(inner) => {
                format!("store unavailable: {:?}", inner)
            },
            StoreError::Database(inner) => {
                format!("database error: {}", inner)
            },
            StoreError::Poisoned => {
                "store lock poisoned".into()
            }
        };
        write!(f, "Store error: {}", msg)
    }
}

impl std::error::Error for StoreError {}

impl From<diesel::result::Error> for StoreError {
    fn from(error: diesel::result::Error) -> Self {
        StoreError::Database(error)
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(error: r2d2::Error) -> Self {
        StoreError::Unavailable(Box::new(error))
    }
}

impl <T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        StoreError::Poisoned
    }
}
