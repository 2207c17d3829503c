use crate::symbolic::symbolic_series::SeriesError;
use thiserror::Error;

/// Everything that can stop a limit computation.
///
/// None of these are recovered internally: a computation either returns a value or
/// surfaces exactly one of them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LimitError {
    /// the expression has a shape no rule covers
    #[error("unsupported expression: {0}")]
    UnsupportedExpression(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid direction '{0}', expected '+' or '-'")]
    InvalidDirection(String),
    /// a leading coefficient vanished or an exponent ratio was not a constant
    #[error("degenerate leading term: {0}")]
    DegenerateLeadingTerm(String),
    #[error("could not determine limit: recursion depth {0} exceeded")]
    LimitComputationTooComplex(usize),
    /// the sign of a variable-free expression is needed but not known
    #[error("cannot determine the sign of {0}")]
    UndeterminedSign(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type LimitResult<T> = Result<T, LimitError>;

impl From<SeriesError> for LimitError {
    fn from(err: SeriesError) -> Self {
        match err {
            SeriesError::Unsupported(_) | SeriesError::EssentialSingularity(_) => {
                LimitError::UnsupportedExpression(err.to_string())
            }
            SeriesError::NoLeadingTerm(_) => LimitError::DegenerateLeadingTerm(err.to_string()),
            // the order of w^y against other powers depends on the unknown sign of y
            SeriesError::SymbolicExponent(exponent) => LimitError::UndeterminedSign(exponent),
        }
    }
}
