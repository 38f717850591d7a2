//! Shared utilities for the sphincter preparation crates.
//!
//! This crate provides the Polars `AnyValue` conversions and row-wise column
//! helpers that the validation, transformation and serialization crates all
//! build on.

pub mod frame;
pub mod values;

// Re-export commonly used functions at crate root for convenience
pub use frame::{bool_column, column_names, float_column, frames_equal, text_column};
pub use values::{
    any_to_bool, any_to_f64, any_to_i64, any_to_string, format_numeric, is_missing, parse_bool,
    parse_f64, parse_i64,
};
