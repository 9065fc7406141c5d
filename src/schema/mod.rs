//! Schema module - Configuration and scenario types.

mod config;
mod scenario;

pub use config::*;
pub use scenario::*;
