//! Unified error handling for the console application.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Engine(#[from] biblio_engine::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether this failure is an expected business outcome (a rejected
    /// operation or a bad field) rather than an application fault. Engine
    /// failures are always expected: every one is a validated business
    /// outcome, not a crash.
    pub fn is_expected(&self) -> bool {
        match self {
            AppError::Engine(_) | AppError::InvalidInput(_) => true,
            AppError::Io(_) => false,
        }
    }
}

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
