use log::{error, warn};
use mongodb::error::Error as DbError;
use rocket::{
    http::Status,
    response::{self, Responder},
    serde::json::Json,
    Catcher, Request,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    pub fn not_found(what: String) -> Self {
        Self::Status(Status::NotFound, format!("{} not found", what))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Status(Status::BadRequest, message.into())
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Status(Status::UnprocessableEntity, message.into())
    }

    /// The HTTP status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::Db(_) => Status::InternalServerError,
            Self::Status(status, _) => *status,
        }
    }
}

/// Body of every error response, whether raised by a handler or by Rocket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl ErrorBody {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: status.code,
            message: message.into(),
        }
    }

    /// A body with the fixed message for the given status.
    pub fn generic(status: Status) -> Self {
        let message = match status.code {
            400 => "bad request",
            404 => "resource not found",
            405 => "method not allowed",
            422 => "unprocessable",
            500 => "internal server error",
            _ => status.reason().unwrap_or("unknown error"),
        };
        Self::new(status, message)
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        let body = match self {
            // Don't leak database internals to the caller.
            Self::Db(err) => {
                error!("Database error: {err}");
                ErrorBody::generic(status)
            }
            Self::Status(status, message) => {
                if status.code >= 500 {
                    error!("{message}");
                } else {
                    warn!("{message}");
                }
                ErrorBody::new(status, message)
            }
        };
        (status, Json(body)).respond_to(req)
    }
}

/// Renders every error Rocket raises itself (unknown routes, bad JSON, failed
/// guards) in the same shape as handler errors.
#[catch(default)]
fn default_catcher(status: Status, _req: &Request<'_>) -> (Status, Json<ErrorBody>) {
    (status, Json(ErrorBody::generic(status)))
}

pub fn catchers() -> Vec<Catcher> {
    catchers![default_catcher]
}
