use thiserror::Error;

/// Errors that prevent a search session from starting.
///
/// Worker-level faults are contained inside the scheduler and never surface
/// here; interruption is a [`crate::search::SearchOutcome`], not an error.
#[derive(Error, Debug)]
pub enum CrackError {
    #[error("invalid target digest '{0}': expected 40 hex characters")]
    InvalidDigest(String),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, CrackError>;
