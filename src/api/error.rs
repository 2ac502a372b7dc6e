use std::fmt::Formatter;

use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;

use crate::query::QueryError;

#[derive(Debug)]
pub enum ApiError {
    Query(QueryError),
    /// The blocking pool dropped the task
    Blocking
}

#[derive(Serialize)]
struct ErrorDocument {
    errors: Vec<ErrorObject>
}

#[derive(Serialize)]
struct ErrorObject {
    status: String,
    detail: String
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            ApiError::Query(inner) => write!(f, "{}", inner),
            ApiError::Blocking => write!(f, "Request could not be completed")
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Query(QueryError::InvalidArgument { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Query(QueryError::StoreUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Blocking => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Error while retrieving postcodes: {}", self);
        }

        HttpResponse::build(status).json(ErrorDocument {
            errors: vec![ErrorObject {
                status: status.as_u16().to_string(),
                detail: self.to_string()
            }]
        })
    }
}

impl From<QueryError> for ApiError {
    fn from(error: QueryError) -> Self {
        ApiError::Query(error)
    }
}

impl From<BlockingError> for ApiError {
    fn from(_: BlockingError) -> Self {
        ApiError::Blocking
    }
}
