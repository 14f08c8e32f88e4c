//! Ephemeris engine: binary Chebyshev readers, analytic fallback series,
//! and the source-selecting position engine.
//!
//! Two on-disk formats are supported:
//! - the segmented per-planet SE1 format ([`se1::Se1Reader`])
//! - JPL development-ephemeris record files ([`jpl::JplReader`])
//!
//! When neither covers a request, the Sun, Moon and lunar nodes fall back
//! to built-in analytic series; everything else is refused.

pub mod analytic;
pub mod body;
pub mod bytes;
pub mod chebyshev;
pub mod config;
pub mod engine;
pub mod error;
pub mod jpl;
pub mod position;
pub mod se1;

pub use body::Body;
pub use config::{DataSource, EphemerisConfig, FileFormat, PathResolver};
pub use engine::Engine;
pub use error::{EphemerisError, EphemerisResult};
pub use jpl::{JplHeader, JplReader};
pub use position::{BodyPosition, CoordinateType, ReferenceFrame};
pub use se1::{Se1Header, Se1Reader, Se1Record};
