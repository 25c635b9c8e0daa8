//! Assist Error Types

use thiserror::Error;

/// Result type for assist operations
pub type Result<T> = std::result::Result<T, AssistError>;

/// Assist module error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssistError {
    /// Curve breakpoints are not strictly increasing (`0 < a < b < s`)
    #[error("Invalid curve breakpoints: expected 0 < a < b < s, got a={a}, b={b}, s={s}")]
    InvalidBreakpoints {
        /// First breakpoint
        a: f64,
        /// Second breakpoint
        b: f64,
        /// Domain end
        s: f64,
    },

    /// Curve slope is NaN or infinite
    #[error("Invalid curve slope: {0}")]
    InvalidSlope(f64),

    /// Position or delta with a NaN/infinite coordinate
    #[error("Invalid position: ({0}, {1})")]
    InvalidPosition(f64, f64),

    /// Out-of-range tunable parameter
    #[error("Invalid assist configuration: {0}")]
    InvalidConfig(String),
}

/// Error classification for caller recovery decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Construction-time errors; the controller cannot be built
    Startup,
    /// Per-call input rejection; state is untouched and the next tick may proceed
    Input,
}

/// Classify error for recovery strategy selection
pub fn classify_error(error: &AssistError) -> ErrorType {
    match error {
        AssistError::InvalidBreakpoints { .. }
        | AssistError::InvalidSlope(_)
        | AssistError::InvalidConfig(_) => ErrorType::Startup,

        AssistError::InvalidPosition(_, _) => ErrorType::Input,
    }
}
