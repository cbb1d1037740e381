use thiserror::Error;

/// Errors that can occur while deriving issuance metrics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IssuanceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid issuance parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("mint rate unavailable: current rate is zero")]
    RateUnavailable,

    #[error("forecast undefined: no issuance observed in the current period")]
    ForecastUndefined,

    #[error("arithmetic overflow while performing issuance calculation: {0}")]
    CalculationOverflow(&'static str),
}

impl IssuanceError {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        IssuanceError::InvalidInput(msg.into())
    }
}

/// Reject negative and non-finite floating-point inputs.
pub(crate) fn ensure_non_negative(name: &str, value: f64) -> Result<f64, IssuanceError> {
    if !value.is_finite() {
        return Err(IssuanceError::invalid_input(format!(
            "{name} must be finite, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(IssuanceError::invalid_input(format!(
            "{name} must be non-negative, got {value}"
        )));
    }
    Ok(value)
}
