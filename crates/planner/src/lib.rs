//! Scan placement and work distribution for Quarry's plan finalizer.
//!
//! Architecture role:
//! - prunes a table's partitions against key-range predicates at plan
//!   finalization and caches the active set on the scan node;
//! - assigns every block of the active set to one of its replica hosts with
//!   a greedy least-loaded rule, then levels host workloads down to the
//!   requested execution-node count;
//! - emits one host-addressed [`ScanUnit`] per surviving host for dispatch.
//!
//! Key modules:
//! - [`scan_node`]
//! - [`block_scan`]
//! - [`placement`]
//! - [`scan_unit`]
//! - [`predicate`]

pub mod block_scan;
pub mod placement;
pub mod predicate;
pub mod scan_node;
pub mod scan_unit;

pub use block_scan::*;
pub use placement::*;
pub use predicate::*;
pub use scan_node::*;
pub use scan_unit::*;
