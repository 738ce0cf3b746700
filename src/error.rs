use thiserror::Error;

/// Error type raised by collaborators (gateway, repository, audit sink).
///
/// The service never inspects it; it is carried back to the caller as-is and
/// can be downcast to the concrete type the collaborator produced.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias for collaborator capabilities.
pub type CollaboratorResult<T> = std::result::Result<T, BoxError>;

#[derive(Error, Debug)]
pub enum OrderError {
    /// Caller misuse. No collaborator has been called.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The gateway did not approve the payment.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// Failure raised by a collaborator, passed through untouched.
    #[error(transparent)]
    Collaborator(BoxError),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
}

impl OrderError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Whether the failed call reached the payment gateway.
    ///
    /// Only `InvalidArgument` is raised before authorization. For a
    /// `Collaborator` failure the payment may or may not have been authorized.
    pub fn payment_attempted(&self) -> bool {
        matches!(self, Self::PermissionDenied(_) | Self::Collaborator(_))
    }

    /// Returns the collaborator error if this is a passthrough failure.
    pub fn collaborator(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Collaborator(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, OrderError>;
