use thiserror::Error;

/// Errors returned at the edges of the crate: configuration and file I/O.
/// Stepping the simulator itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    /// Input contained no usable points.
    #[error("no points found in input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
