use super::date_service::DateError;

/// Errors surfaced by the domain services.
///
/// `NotFound` covers both "does not exist" and "exists but belongs to someone
/// else", so callers cannot discover other users' records.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Date(#[from] DateError),
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Storage(err.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub(crate) fn validation<T>(message: impl Into<String>) -> ServiceResult<T> {
    Err(ServiceError::Validation(message.into()))
}
