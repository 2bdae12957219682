use thiserror::Error;

/// Failures the store layer knows how to name.
///
/// Repository and gateway errors end up as the message of a failure action,
/// so `Display` is what the user eventually sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Todo not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn transport(e: impl std::fmt::Display) -> Self {
        Self::Transport(e.to_string())
    }

    pub fn persistence(e: impl std::fmt::Display) -> Self {
        Self::Persistence(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
