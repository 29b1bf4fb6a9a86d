//! Shared error contracts and typed identifiers for Quarry crates.
//!
//! Architecture role:
//! - provides the common [`QuarryError`] / [`Result`] contracts
//! - defines typed ids passed between catalog and planner layers
//!
//! Key modules:
//! - [`error`]
//! - [`ids`]

pub mod error;
pub mod ids;

pub use error::{QuarryError, Result};
pub use ids::*;
