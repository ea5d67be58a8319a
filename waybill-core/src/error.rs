//! Pipeline error types.

use thiserror::Error;

use crate::{DecodeError, FleetError, JobId, MatrixError, OracleError, RangeError};

/// The request was rejected before any model was built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The matrix was empty or not square.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    /// The fleet was empty or its IDs or starts were invalid.
    #[error(transparent)]
    Fleet(#[from] FleetError),
    /// A job referenced a location outside the matrix.
    #[error(transparent)]
    Range(#[from] RangeError),
    /// Job ID zero is reserved.
    #[error("job id 0 is reserved")]
    ZeroJobId,
    /// Two jobs share an ID.
    #[error("job id {id} appears more than once")]
    DuplicateJobId {
        /// Repeated identifier.
        id: JobId,
    },
    /// A job has no delivery quantities.
    #[error("job {id} has no delivery quantity")]
    MissingDelivery {
        /// Offending job.
        id: JobId,
    },
}

/// Errors returned by [`crate::Solver::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The request was invalid.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
    /// No assignment satisfies the capacity and duration limits.
    #[error("no solution found")]
    Infeasible,
    /// The engine failed for a reason other than feasibility.
    #[error("routing engine failed: {message}")]
    Engine {
        /// Engine-provided description.
        message: String,
    },
    /// The engine returned an assignment that could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl From<OracleError> for SolveError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::Infeasible => Self::Infeasible,
            OracleError::Engine { message } => Self::Engine { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn oracle_errors_map_onto_solve_errors() {
        assert_eq!(SolveError::from(OracleError::Infeasible), SolveError::Infeasible);
        let engine = SolveError::from(OracleError::Engine {
            message: "boom".into(),
        });
        assert_eq!(engine.to_string(), "routing engine failed: boom");
    }

    #[rstest]
    fn validation_errors_keep_their_message() {
        let err = SolveError::from(ValidationError::from(MatrixError::Empty));
        assert_eq!(
            err.to_string(),
            "invalid request: travel-time matrix must contain at least one location"
        );
    }
}
