//! Block-replica-locality scan scheduling.
//!
//! Responsibilities:
//! - prune a table's partitions down to the active set at plan finalization;
//! - place every block of the active set onto one of its replica hosts;
//! - level host workloads down to a requested execution-node count;
//! - emit one host-addressed scan unit per surviving host.
//!
//! Pruning runs once; placement/leveling/emission re-run on every
//! [`ScanNode::compute_scan_units`] call against the cached active set, so a
//! caller can ask for several node counts without re-filtering.

use std::fmt;
use std::sync::Arc;

use quarry_catalog::{BlockSource, Partition, TableMeta};
use quarry_common::{PlanNodeId, QuarryError, Result};
use tracing::{debug, info};

use crate::placement::{assign_blocks, emit_units, level_workloads};
use crate::predicate::KeyRanges;
use crate::scan_node::{ScanNode, TargetNodes};
use crate::scan_unit::ScanUnit;

/// Prunes `partitions` to those worth scanning.
///
/// A partition survives when it holds at least one data block and every
/// supplied key-range slot accepts its key value at that position. The slots
/// may cover a prefix of the clustering columns; `None` slots leave their
/// column unrestricted. Order-preserving and side-effect free.
///
/// # Errors
/// [`QuarryError::Precondition`] when a partition's key-value count differs
/// from `clustering_cols`, or when more range slots than key values are
/// supplied. Both indicate planner bugs; no partial result is produced.
pub fn filter_partitions(
    partitions: &[Arc<Partition>],
    clustering_cols: usize,
    key_ranges: Option<&KeyRanges>,
) -> Result<Vec<Arc<Partition>>> {
    let mut active = Vec::new();
    for partition in partitions {
        if !partition.has_blocks() {
            // No IO value in visiting an empty partition.
            continue;
        }
        if partition.key_values.len() != clustering_cols {
            return Err(QuarryError::Precondition(format!(
                "partition {} carries {} key values, table declares {} clustering columns",
                partition.id,
                partition.key_values.len(),
                clustering_cols
            )));
        }
        if let Some(ranges) = key_ranges {
            if ranges.len() > partition.key_values.len() {
                return Err(QuarryError::Precondition(format!(
                    "{} key ranges supplied for {} clustering columns",
                    ranges.len(),
                    partition.key_values.len()
                )));
            }
            let in_range = ranges
                .iter()
                .zip(&partition.key_values)
                .all(|(slot, value)| slot.as_ref().map_or(true, |range| range.contains(value)));
            if !in_range {
                continue;
            }
        }
        active.push(Arc::clone(partition));
    }
    Ok(active)
}

/// Scan node over a block-replicated table.
///
/// [`ScanNode::finalize`] prunes partitions once and caches the active set;
/// [`ScanNode::compute_scan_units`] re-places blocks for each requested node
/// count against that cached set.
pub struct BlockScanNode {
    id: PlanNodeId,
    table: Arc<TableMeta>,
    source: Arc<dyn BlockSource>,
    /// Partitions surviving pruning; written once by `finalize`.
    active: Vec<Arc<Partition>>,
}

impl BlockScanNode {
    pub fn new(id: PlanNodeId, table: Arc<TableMeta>, source: Arc<dyn BlockSource>) -> Self {
        Self {
            id,
            table,
            source,
            active: Vec::new(),
        }
    }

    pub fn id(&self) -> PlanNodeId {
        self.id
    }

    /// Partitions surviving pruning, in table order.
    pub fn active_partitions(&self) -> &[Arc<Partition>] {
        &self.active
    }
}

impl ScanNode for BlockScanNode {
    fn finalize(&mut self, key_ranges: Option<&KeyRanges>) -> Result<()> {
        self.active =
            filter_partitions(&self.table.partitions, self.table.clustering_cols, key_ranges)?;
        debug!(
            table = %self.table.name,
            total = self.table.partitions.len(),
            active = self.active.len(),
            "finalized scan partitions"
        );
        Ok(())
    }

    fn compute_scan_units(&self, nodes: TargetNodes) -> Result<Vec<ScanUnit>> {
        let target = match nodes {
            TargetNodes::Exactly(0) => {
                return Err(QuarryError::Precondition(
                    "requested an execution-node count of zero".to_string(),
                ));
            }
            TargetNodes::Exactly(n) => Some(n),
            TargetNodes::AllDataHosts => None,
            TargetNodes::AllRackHosts => {
                return Err(QuarryError::Precondition(
                    "rack-level node requests are not answerable by block-locality scheduling"
                        .to_string(),
                ));
            }
        };

        let mut workloads = assign_blocks(&self.active, self.source.as_ref())?;
        if let Some(target) = target {
            workloads = level_workloads(workloads, target);
        }

        let units = emit_units(self.id, &workloads);
        info!(
            node = %self.id,
            table = %self.table.name,
            hosts = units.len(),
            "computed scan units"
        );
        Ok(units)
    }
}

impl fmt::Debug for BlockScanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("BlockScanNode");
        s.field("id", &self.id).field("table", &self.table.name);
        for partition in &self.active {
            s.field(
                &format!("partition {}", partition.id),
                &format_args!("{} blocks, {} bytes", partition.blocks.len(), partition.total_bytes()),
            );
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::KeyRange;
    use quarry_catalog::{BlockMeta, Literal, PartitionBlockSource};
    use quarry_common::PartitionId;

    /// Closed integer interval over `Literal::Int64` values.
    struct IntRange(i64, i64);

    impl KeyRange for IntRange {
        fn contains(&self, value: &Literal) -> bool {
            matches!(value, Literal::Int64(v) if (self.0..=self.1).contains(v))
        }
    }

    fn block(path: &str, partition: u64, length: u64, hosts: &[&str]) -> BlockMeta {
        BlockMeta {
            path: path.to_string(),
            partition: PartitionId(partition),
            offset: 0,
            length,
            hosts: hosts.iter().map(|h| h.to_string()).collect(),
        }
    }

    fn part(id: u64, keys: Vec<Literal>, blocks: Vec<BlockMeta>) -> Arc<Partition> {
        Arc::new(Partition {
            id: PartitionId(id),
            key_values: keys,
            blocks,
        })
    }

    fn table(clustering_cols: usize, partitions: Vec<Arc<Partition>>) -> Arc<TableMeta> {
        Arc::new(TableMeta {
            name: "t".to_string(),
            clustering_cols,
            partitions,
        })
    }

    fn ranged(lo: i64, hi: i64) -> Option<Box<dyn KeyRange>> {
        Some(Box::new(IntRange(lo, hi)))
    }

    #[test]
    fn filter_drops_empty_partitions() {
        let parts = vec![
            part(1, vec![Literal::Int64(1)], vec![]),
            part(2, vec![Literal::Int64(2)], vec![block("/d/f", 2, 10, &["a"])]),
        ];
        let active = filter_partitions(&parts, 1, None).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, PartitionId(2));
    }

    #[test]
    fn filter_applies_every_present_range_slot() {
        let parts = vec![
            part(
                1,
                vec![Literal::Int64(5), Literal::Utf8("us".into())],
                vec![block("/d/f1", 1, 10, &["a"])],
            ),
            part(
                2,
                vec![Literal::Int64(50), Literal::Utf8("eu".into())],
                vec![block("/d/f2", 2, 10, &["a"])],
            ),
        ];
        // Only the first column is restricted; the second slot is absent.
        let ranges = vec![ranged(0, 10)];
        let active = filter_partitions(&parts, 2, Some(&ranges)).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, PartitionId(1));
    }

    #[test]
    fn filter_none_slot_is_unrestricted() {
        let parts = vec![part(
            1,
            vec![Literal::Int64(5)],
            vec![block("/d/f1", 1, 10, &["a"])],
        )];
        let ranges: Vec<Option<Box<dyn KeyRange>>> = vec![None];
        let active = filter_partitions(&parts, 1, Some(&ranges)).unwrap();
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn filter_rejects_surplus_range_slots() {
        let parts = vec![part(
            1,
            vec![Literal::Int64(5)],
            vec![block("/d/f1", 1, 10, &["a"])],
        )];
        let ranges = vec![ranged(0, 10), ranged(0, 10)];
        let err = filter_partitions(&parts, 1, Some(&ranges)).unwrap_err();
        assert!(matches!(err, QuarryError::Precondition(_)));
    }

    #[test]
    fn filter_rejects_key_count_mismatch() {
        let parts = vec![part(
            1,
            vec![Literal::Int64(5), Literal::Int64(6)],
            vec![block("/d/f1", 1, 10, &["a"])],
        )];
        let err = filter_partitions(&parts, 1, None).unwrap_err();
        assert!(matches!(err, QuarryError::Precondition(_)));
    }

    fn sample_node() -> BlockScanNode {
        let parts = vec![
            part(
                1,
                vec![Literal::Int64(1)],
                vec![
                    block("/d/f1", 1, 100, &["a", "b"]),
                    block("/d/f2", 1, 50, &["b", "c"]),
                ],
            ),
            part(
                2,
                vec![Literal::Int64(2)],
                vec![block("/d/f3", 2, 200, &["a"])],
            ),
        ];
        BlockScanNode::new(
            PlanNodeId(1),
            table(1, parts),
            Arc::new(PartitionBlockSource),
        )
    }

    #[test]
    fn compute_units_spreads_across_data_hosts() {
        let mut node = sample_node();
        node.finalize(None).unwrap();
        assert_eq!(node.active_partitions().len(), 2);

        let units = node.compute_scan_units(TargetNodes::AllDataHosts).unwrap();
        assert_eq!(units.len(), 2);
        let bytes: u64 = units.iter().map(|u| u.total_bytes()).sum();
        assert_eq!(bytes, 350);
    }

    #[test]
    fn compute_units_levels_to_exact_count() {
        let mut node = sample_node();
        node.finalize(None).unwrap();

        let units = node.compute_scan_units(TargetNodes::Exactly(1)).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].host, "a");
        assert_eq!(units[0].total_bytes(), 350);
        assert_eq!(units[0].ranges.len(), 3);
    }

    #[test]
    fn repeated_compute_calls_share_one_finalized_set() {
        let mut node = sample_node();
        node.finalize(None).unwrap();

        let all = node.compute_scan_units(TargetNodes::AllDataHosts).unwrap();
        let one = node.compute_scan_units(TargetNodes::Exactly(1)).unwrap();
        let all_again = node.compute_scan_units(TargetNodes::AllDataHosts).unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(one.len(), 1);
        assert_eq!(all, all_again);
    }

    #[test]
    fn zero_node_count_is_a_precondition_error() {
        let mut node = sample_node();
        node.finalize(None).unwrap();
        let err = node.compute_scan_units(TargetNodes::Exactly(0)).unwrap_err();
        assert!(matches!(err, QuarryError::Precondition(_)));
    }

    #[test]
    fn rack_level_request_is_rejected() {
        let mut node = sample_node();
        node.finalize(None).unwrap();
        let err = node
            .compute_scan_units(TargetNodes::AllRackHosts)
            .unwrap_err();
        assert!(matches!(err, QuarryError::Precondition(_)));
    }

    #[test]
    fn empty_active_set_yields_no_units() {
        let mut node = BlockScanNode::new(
            PlanNodeId(1),
            table(1, vec![part(1, vec![Literal::Int64(1)], vec![])]),
            Arc::new(PartitionBlockSource),
        );
        node.finalize(None).unwrap();
        let units = node.compute_scan_units(TargetNodes::Exactly(4)).unwrap();
        assert!(units.is_empty());
    }
}
