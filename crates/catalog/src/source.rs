use quarry_common::Result;

use crate::partition::{BlockMeta, Partition};

/// Block-location adapter: enumerates the replicated block descriptors of
/// one partition.
///
/// Implementations are backend-specific. A deployed engine answers from the
/// storage service's block-location cache; [`PartitionBlockSource`] answers
/// from descriptors embedded in the catalog snapshot.
pub trait BlockSource: Send + Sync {
    /// Returns fresh block descriptors for `partition`, in file order.
    ///
    /// # Errors
    /// Returns an error when the backing metadata service cannot enumerate
    /// the partition's blocks.
    fn blocks(&self, partition: &Partition) -> Result<Vec<BlockMeta>>;
}

/// Catalog-backed [`BlockSource`] reading the descriptors registered with
/// the partition itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct PartitionBlockSource;

impl BlockSource for PartitionBlockSource {
    fn blocks(&self, partition: &Partition) -> Result<Vec<BlockMeta>> {
        Ok(partition.blocks.clone())
    }
}
