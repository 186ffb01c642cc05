use thiserror::Error;

/// Errors that may occur when evaluating a gas or water property.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    /// The input values are invalid or inconsistent.
    ///
    /// Indicates that the inputs are physically invalid or outside the model's valid domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The calculation failed due to a numerical or internal error.
    ///
    /// For example, an equation of state with no physical root.
    #[error("calculation error: {0}")]
    Calculation(String),
}
