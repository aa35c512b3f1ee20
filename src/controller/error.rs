use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use serde::Serialize;

use thiserror::Error;

pub type RestResult<T> = Result<T, RestError>;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InternalError(String),
}

/// JSON body sent with every error response
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl From<crate::error::Error> for RestError {
    fn from(e: crate::error::Error) -> Self {
        use crate::error::Error as E;
        match e {
            E::Validation(msg) => Self::BadRequest(msg),
            E::NotFound => Self::NotFound(E::NotFound.to_string()),
            E::Storage(error) => {
                tracing::error!(error.cause_chain = ?error, "Storage failure");
                Self::InternalError(format!("storage error: {}", error))
            }
        }
    }
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(ErrorBody { error: &message })
    }
}
