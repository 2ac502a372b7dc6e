use std::fmt::Formatter;

/// Failures that end an import run. Per-row problems never show up here.
#[derive(Debug)]
pub enum ImportError {
    /// The local source file could not be opened
    Open(std::io::Error),
    Download(Box<dyn std::fmt::Debug + Send>),
    Archive(Box<zip::result::ZipError>),
    /// No archive entry matched the pattern
    EntryNotFound(String),
    /// The row stream broke mid-read
    Read(Box<csv::Error>),
    Store(Box<dyn std::fmt::Debug + Send>)
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            ImportError::Open(inner) => {
                write!(f, "Failed to open CSV file: {}", inner)
            },
            ImportError::Download(inner) => {
                write!(f, "Failed to download postcode archive: {:?}", inner)
            },
            ImportError::Archive(inner) => {
                write!(f, "Failed to open ZIP archive: {}", inner)
            },
            ImportError::EntryNotFound(pattern) => {
                write!(f, "No CSV file matching {} in archive", pattern)
            },
            ImportError::Read(inner) => {
                write!(f, "Failed to read CSV data: {}", inner)
            },
            ImportError::Store(inner) => {
                write!(f, "Store error: {:?}", inner)
            }
        }
    }
}

impl std::error::Error for ImportError {}

impl From<reqwest::Error> for ImportError {
    fn from(error: reqwest::Error) -> Self {
        ImportError::Download(Box::new(error))
    }
}

impl From<zip::result::ZipError> for ImportError {
    fn from(error: zip::result::ZipError) -> Self {
        ImportError::Archive(Box::new(error))
    }
}

impl From<csv::Error> for ImportError {
    fn from(error: csv::Error) -> Self {
        ImportError::Read(Box::new(error))
    }
}

impl From<crate::data::repo::StoreError> for ImportError {
    fn from(error: crate::data::repo::StoreError) -> Self {
        ImportError::Store(Box::new(error))
    }
}
