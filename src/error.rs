use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::upload::StorageError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("{entity} id mismatch: path {path}, body {body}")]
    IdMismatch { entity: &'static str, path: i32, body: i32 },

    #[error("{entity} {id} was modified by another request")]
    ConcurrencyConflict { entity: &'static str, id: i32 },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("database error: {0}")]
    Database(#[source] DbErr),
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                Self::ValidationFailed(format!("referenced row does not exist ({msg})"))
            },
            _ => Self::Database(err),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match &self {
            ServiceError::ValidationFailed(_)
            | ServiceError::InvalidArgument(_)
            | ServiceError::IdMismatch { .. } => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            },
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND.into_response(),
            ServiceError::Conflict(_) | ServiceError::ConcurrencyConflict { .. } => {
                tracing::warn!(error = %self, "rejected conflicting write");
                (StatusCode::CONFLICT, self.to_string()).into_response()
            },
            ServiceError::Storage(_) | ServiceError::Database(_) => {
                tracing::error!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            },
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<ServiceError>() {
            Some(ServiceError::NotFound { .. }) => StatusCode::NOT_FOUND,
            _ => {
                tracing::error!(error = %self.0, "page failed");
                StatusCode::INTERNAL_SERVER_ERROR
            },
        };
        let body = crate::templates::error_page(self.to_string());
        (status, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
