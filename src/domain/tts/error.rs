use crate::error::AppError;

/// Terminal failure of a synthesis request after every attempt failed.
///
/// Cloneable so every caller sharing one in-flight computation receives the
/// same error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("synthesis failed after {attempts} attempts: {last_error}")]
pub struct SynthesisError {
    pub attempts: u32,
    pub last_error: String,
}

impl From<SynthesisError> for AppError {
    fn from(err: SynthesisError) -> Self {
        AppError::Internal(err.to_string())
    }
}
