use crate::error::DomainError;

/// Error enumeration for document store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl From<RepositoryError> for DomainError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict => DomainError::Conflict("record already exists".to_string()),
            RepositoryError::NotFound => DomainError::NotFound {
                entity: "record",
                id: String::new(),
            },
            RepositoryError::Unavailable(reason) => DomainError::Internal(reason),
        }
    }
}
