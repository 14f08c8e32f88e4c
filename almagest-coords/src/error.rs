use thiserror::Error;

/// Errors raised by coordinate validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordError {
    /// A structured value remained out of range after normalization.
    #[error("{quantity} = {value} is out of range: {message}")]
    OutOfRange {
        quantity: &'static str,
        value: f64,
        message: String,
    },
}

/// Convenience alias for `Result<T, CoordError>`.
pub type CoordResult<T> = Result<T, CoordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_the_quantity() {
        let err = CoordError::OutOfRange {
            quantity: "latitude",
            value: 91.0,
            message: "must be within +/-90 degrees".into(),
        };
        let text = err.to_string();
        assert!(text.contains("latitude"));
        assert!(text.contains("91"));
    }
}
