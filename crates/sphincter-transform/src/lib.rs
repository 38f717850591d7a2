//! Dataset construction for the sphincter study.
//!
//! - [`build_variant`]: raw table to [`ValidatedDataset`](sphincter_model::ValidatedDataset)
//! - [`one_encode`]: dense, order-stable category codes
//! - [`build_coordinates`]: dimension labels
//! - [`build_model_input`]: the typed record consumed by the model

pub mod adapter;
pub mod aggregate;
pub mod builder;
pub mod coords;
pub mod derive;
pub mod encode;
pub mod filter;
pub mod header;
pub mod sort;

pub use adapter::build_model_input;
pub use builder::{build_variant, index_and_encode};
pub use coords::build_coordinates;
pub use encode::{Encoding, one_encode};
pub use sort::sort_rows;
