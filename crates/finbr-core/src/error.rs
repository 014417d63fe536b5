use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinbrError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (residual: {last_residual})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_residual: f64,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FinbrError {
    fn from(e: serde_json::Error) -> Self {
        FinbrError::SerializationError(e.to_string())
    }
}
