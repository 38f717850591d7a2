//! Library side of the `sphincter` command: configuration, logging setup and
//! the preparation pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;
