use quarry_common::PartitionId;
use serde::{Deserialize, Serialize};

/// Literal clustering-column value of a partition key.
///
/// Partition keys are discrete values with total equality; fractional types
/// are not valid clustering-column values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Literal {
    Null,
    Boolean(bool),
    Int64(i64),
    Utf8(String),
}

/// One replicated contiguous byte range of a data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockMeta {
    /// Path of the owning data file.
    pub path: String,
    /// Partition the block belongs to.
    pub partition: PartitionId,
    /// Start byte offset within the file.
    pub offset: u64,
    /// Byte length of the block.
    pub length: u64,
    /// Candidate replica hostnames, in catalog order.
    ///
    /// Must be non-empty: a block nobody holds is corrupt metadata, rejected
    /// during placement rather than repaired.
    pub hosts: Vec<String>,
}

/// One partition of a partitioned table.
///
/// Immutable once registered. The planner references partitions read-only
/// through `Arc` and never copies or mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partition {
    /// Partition identifier, unique within the table.
    pub id: PartitionId,
    /// Clustering-column values, one per clustering column of the table.
    pub key_values: Vec<Literal>,
    /// Block descriptors of the partition's data files, in file order.
    pub blocks: Vec<BlockMeta>,
}

impl Partition {
    /// True when the partition holds at least one data block.
    pub fn has_blocks(&self) -> bool {
        !self.blocks.is_empty()
    }

    /// Total bytes across the partition's blocks.
    pub fn total_bytes(&self) -> u64 {
        self.blocks.iter().map(|b| b.length).sum()
    }
}
