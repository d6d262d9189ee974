use thiserror::Error;

/// Coarse classification of a [`JabrError`].
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ErrorKind {
    /// Input network is not a tree (or not connected).
    Structural,
    /// A numeric quantity is outside the domain of the formula applied to it.
    Domain,
    /// The conic solver produced no usable answer.
    SolverNonConvergence,
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum JabrError {
    #[error("network is not a tree: {0}")]
    Structural(String),

    #[error("branch ({from}, {to}): {reason}")]
    Domain {
        from: usize,
        to: usize,
        reason: String,
    },

    #[error("solver did not converge: {0}")]
    SolverNonConvergence(String),

    #[error("solver setup failed: {0}")]
    Solver(String),
}

impl JabrError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JabrError::Structural(_) => ErrorKind::Structural,
            JabrError::Domain { .. } => ErrorKind::Domain,
            JabrError::SolverNonConvergence(_) | JabrError::Solver(_) => {
                ErrorKind::SolverNonConvergence
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, JabrError>;
