use crate::houses::HouseSystem;
use almagest_time::TimeError;
use thiserror::Error;

/// Errors raised by chart computations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// The house system has no defined cusps at this latitude and does
    /// not substitute a fallback.
    #[error("{system:?} houses are undefined at latitude {latitude_deg}")]
    HouseSystemUndefined {
        system: HouseSystem,
        latitude_deg: f64,
    },

    /// A time-scale or sidereal-time computation failed underneath.
    #[error(transparent)]
    Time(#[from] TimeError),
}

/// Convenience alias for `Result<T, ChartError>`.
pub type ChartResult<T> = Result<T, ChartError>;
