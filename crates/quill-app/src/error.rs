use quill_core::error::CoreError;
use quill_db::error::DbError;
use quill_service::error::ServiceError;
use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Writer, async_trait};
use serde::Serialize;
use thiserror::Error;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] DbError),

    #[error(transparent)]
    RenderError(#[from] quill_render::error::RenderError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Failed to write response: {0}")]
    ResponseWrite(String),
}

impl AppError {
    /// ## Summary
    /// Maps the error to the HTTP status returned to the client.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ServiceError(err) => service_status(err),
            Self::DatabaseError(err) => db_status(err),
            Self::CoreError(err) => core_status(err),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::RenderError(_) | Self::ResponseWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// ## Summary
    /// Message sent to the client. Server-side failures get a generic
    /// message; the details are only logged.
    #[must_use]
    pub fn client_message(&self) -> String {
        if self.status_code().is_server_error() {
            match self.status_code() {
                StatusCode::SERVICE_UNAVAILABLE => "Database unavailable".to_string(),
                StatusCode::BAD_GATEWAY => "Failed to download the requested file".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            match self {
                Self::ServiceError(ServiceError::NotFound(message)
                    | ServiceError::ValidationError(message)
                    | ServiceError::Conflict(message))
                | Self::BadRequest(message) => message.clone(),
                Self::ServiceError(ServiceError::NotAuthenticated) => {
                    "Authentication required".to_string()
                }
                other => other.to_string(),
            }
        }
    }
}

fn core_status(err: &CoreError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn db_status(err: &DbError) -> StatusCode {
    match err {
        DbError::PoolError(_) => StatusCode::SERVICE_UNAVAILABLE,
        DbError::CoreError(core) => core_status(core),
        DbError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn service_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::NotAuthenticated => StatusCode::UNAUTHORIZED,
        ServiceError::CoreError(core) => core_status(core),
        ServiceError::DatabaseError(db) => db_status(db),
        ServiceError::InvalidConfiguration(_) | ServiceError::DieselError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[async_trait]
impl Writer for AppError {
    async fn write(self, req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, path = %req.uri().path(), "Request failed");
        } else {
            tracing::debug!(error = %self, %status, path = %req.uri().path(), "Request rejected");
        }

        res.status_code(status);
        res.render(Json(ErrorResponse {
            error: self.client_message(),
        }));
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
