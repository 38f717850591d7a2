//! Generic schema enforcement.
//!
//! Schemas in `sphincter-model` are plain descriptors; this crate holds the
//! one routine that interprets them.

mod coerce;
mod validator;

pub use validator::{project, validate_and_coerce};
