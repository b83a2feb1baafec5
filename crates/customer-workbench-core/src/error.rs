use thiserror::Error;

/// Failure of a service operation.
///
/// Only caller errors are classified. Anything coming out of the store is
/// carried opaquely in [`ServiceError::Storage`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
