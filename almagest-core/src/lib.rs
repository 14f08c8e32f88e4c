//! Shared foundation for the almagest workspace.
//!
//! This crate carries the constants, angle helpers and small math
//! primitives that every other layer builds on. It has no I/O and no
//! error type of its own: everything here is total over finite inputs.

pub mod angle;
pub mod constants;
pub mod math;

pub use angle::{
    arc_forward_deg, deg_to_hours, hours_to_deg, wrap_0_2pi, wrap_deg_0_360, wrap_hours_0_24,
};
pub use constants::*;
