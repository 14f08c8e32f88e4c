use crate::body::Body;
use almagest_time::TimeError;
use thiserror::Error;

/// Errors raised by the ephemeris readers and the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    /// Underlying file I/O failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// No candidate file was found on the search path.
    #[error("ephemeris file not found: {name}")]
    FileNotFound { name: String },

    /// The file opened but its header violates a format invariant.
    #[error("corrupt ephemeris header: {0}")]
    CorruptHeader(String),

    /// Neither byte order produced a sane header.
    #[error("cannot determine byte order: {0}")]
    BadEndianness(String),

    /// The requested instant is outside the data a file declares.
    #[error("JD {jd} is outside the ephemeris span [{start}, {end}]")]
    JdOutOfRange { jd: f64, start: f64, end: f64 },

    /// No binary data and no analytic model covers the body.
    #[error("no ephemeris source supports {0:?}")]
    BodyUnsupported(Body),

    /// A Chebyshev series with no coefficients was evaluated.
    #[error("empty coefficient array")]
    EmptyCoefficients,

    /// A value fell outside the interval it was to be normalized over.
    #[error("value {value} is outside the interval [{start}, {end}]")]
    OutOfInterval { value: f64, start: f64, end: f64 },

    /// The search-path configuration cannot satisfy a file request.
    #[error("invalid ephemeris configuration: {0}")]
    ConfigurationInvalid(String),

    /// A time-scale conversion failed underneath the engine.
    #[error(transparent)]
    Time(#[from] TimeError),
}

/// Convenience alias for `Result<T, EphemerisError>`.
pub type EphemerisResult<T> = Result<T, EphemerisError>;

impl From<std::io::Error> for EphemerisError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            EphemerisError::FileNotFound {
                name: err.to_string(),
            }
        } else {
            EphemerisError::Io(err.to_string())
        }
    }
}
