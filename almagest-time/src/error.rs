use thiserror::Error;

/// Errors raised by calendar validation and time-scale conversion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimeError {
    /// Out-of-range month, day or hour, or an impossible date such as
    /// February 29 in a non-leap year.
    #[error("invalid date {year}-{month:02}-{day:02}: {message}")]
    InvalidDate {
        year: i32,
        month: u32,
        day: u32,
        message: String,
    },

    /// A Julian Date outside the range the time model is defined over.
    #[error("julian date {jd} is outside the supported range")]
    JdOutOfRange { jd: f64 },
}

/// Convenience alias for `Result<T, TimeError>`.
pub type TimeResult<T> = Result<T, TimeError>;
