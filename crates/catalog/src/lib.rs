//! Table, partition, and block metadata consumed by Quarry's planner.
//!
//! Architecture role:
//! - owns the immutable partition/block data model the planner shares read-only
//! - hosts the table registry and its JSON snapshot loader
//! - defines the [`BlockSource`] seam to the block-location service
//!
//! Key modules:
//! - [`catalog`]
//! - [`partition`]
//! - [`source`]

pub mod catalog;
pub mod partition;
pub mod source;

pub use catalog::{Catalog, TableMeta};
pub use partition::{BlockMeta, Literal, Partition};
pub use source::{BlockSource, PartitionBlockSource};
