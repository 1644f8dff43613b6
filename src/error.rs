use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DarbouxError {
    #[error("upper bound must be greater than lower bound: a={a}, b={b}")]
    InvalidBounds { a: f64, b: f64 },

    #[error("maximum points must be at least 2, got {0}")]
    TooFewPoints(usize),

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("unknown partition mode: {0}")]
    UnknownMode(String),

    #[error("partition needs at least 2 points, got {0}")]
    PartitionTooShort(usize),

    #[error("subinterval index {index} out of range for {subintervals} subintervals")]
    SubintervalOutOfRange { index: usize, subintervals: usize },
}

pub type Result<T> = std::result::Result<T, DarbouxError>;
