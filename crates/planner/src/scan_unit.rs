use quarry_common::{PartitionId, PlanNodeId};
use serde::{Deserialize, Serialize};

/// One contiguous file byte range scheduled for scanning.
///
/// Emitted one-per-block with no adjacent-range merging; the execution layer
/// decides how to batch its reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRange {
    /// Data file path.
    pub path: String,
    /// Start byte offset within the file.
    pub offset: u64,
    /// Byte length.
    pub length: u64,
    /// Partition the range belongs to.
    pub partition: PartitionId,
}

/// Host-addressed unit of scan work for one execution fragment.
///
/// The external message-encoding layer serializes units as-is for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanUnit {
    /// Scan node the unit belongs to.
    pub node: PlanNodeId,
    /// Execution host the unit is routed to.
    pub host: String,
    /// File ranges to scan, in assignment order.
    pub ranges: Vec<FileRange>,
}

impl ScanUnit {
    /// Total bytes covered by the unit's ranges.
    pub fn total_bytes(&self) -> u64 {
        self.ranges.iter().map(|r| r.length).sum()
    }
}

/// Hostnames of `units`, index-aligned with the unit list, for dispatchers
/// that route units by position.
pub fn unit_hosts(units: &[ScanUnit]) -> Vec<&str> {
    units.iter().map(|u| u.host.as_str()).collect()
}
