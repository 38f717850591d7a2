//! Schemas, category domains and variant descriptors of the sphincter study.
//!
//! Each module describes one family of prepared datasets:
//!
//! - [`diameter`]: diameter response to stimulation
//! - [`pulsatility`]: harmonic power of diameter and center signals
//! - [`branchpoints`]: sphincters and bulbs at capillary branchpoints
//! - [`collaterals`]: collateral vessels, per collateral and per mouse
//!
//! [`StudyRegistry`] collects them and resolves dataset names to schemas.

pub mod branchpoints;
pub mod categories;
pub mod collaterals;
pub mod diameter;
pub mod options;
pub mod pulsatility;
pub mod registry;

pub use options::StudyOptions;
pub use registry::{SchemaFamily, StudyRegistry};
