use quarry_common::Result;

use crate::predicate::KeyRanges;
use crate::scan_unit::ScanUnit;

/// Execution-node count requested for one scheduling run.
///
/// Explicit variants instead of sentinel integer constants; the invalid
/// combinations either cannot be expressed or fail fast as precondition
/// errors in the scheduler that receives them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetNodes {
    /// Spread work across exactly this many execution hosts. Zero is a
    /// precondition error.
    Exactly(usize),
    /// Use every host that received blocks; skips load leveling.
    AllDataHosts,
    /// Use every host in every rack. Meaningful only to rack-aware
    /// scheduling strategies; block-locality scheduling rejects it.
    AllRackHosts,
}

/// Narrow planning capability of a scan over one storage backend.
///
/// Backends differ in how they place work (block-replica locality here,
/// key-ordered row stores elsewhere) but expose the same two planning entry
/// points to the plan finalizer.
pub trait ScanNode {
    /// Computes and caches the active partition set for the scan.
    ///
    /// Runs once at plan finalization. The cached set is read-only
    /// afterwards and shared by every subsequent
    /// [`ScanNode::compute_scan_units`] call.
    fn finalize(&mut self, key_ranges: Option<&KeyRanges>) -> Result<()>;

    /// Packages the finalized scan into per-host units of work.
    ///
    /// May be invoked repeatedly with different node requests; invocations
    /// are independent and never mutate the finalized partition set.
    fn compute_scan_units(&self, nodes: TargetNodes) -> Result<Vec<ScanUnit>>;
}
