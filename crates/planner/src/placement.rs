//! Greedy block placement and load leveling.
//!
//! Two phases:
//! - [`assign_blocks`] walks every block of every active partition and picks
//!   the least-loaded replica host for it;
//! - [`level_workloads`] merges whole host workloads down to a requested
//!   execution-node count with a dual-heap greedy pass.
//!
//! Neither phase claims optimal balance. Assignment visits blocks in
//! partition-then-file order and never revisits a placement, so large blocks
//! encountered late are not rebalanced; leveling merges absorbed hosts
//! wholesale into the currently lightest survivor. The guarantee is
//! locality (a block only ever lands on one of its replica hosts) plus
//! deterministic, roughly leveled totals, not an optimal packing.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};
use std::sync::Arc;

use quarry_catalog::{BlockMeta, BlockSource, Partition};
use quarry_common::{PlanNodeId, QuarryError, Result};
use tracing::debug;

use crate::scan_unit::{FileRange, ScanUnit};

/// Running block assignment for a single host.
///
/// Invariant: `assigned_bytes` equals the sum of `blocks` lengths at every
/// observation point.
#[derive(Debug, Clone)]
pub struct HostWorkload {
    /// Hostname the blocks are assigned to.
    pub host: String,
    /// Sum of assigned block lengths, in bytes.
    pub assigned_bytes: u64,
    /// Blocks assigned so far, in assignment order.
    pub blocks: Vec<BlockMeta>,
}

impl HostWorkload {
    fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            assigned_bytes: 0,
            blocks: Vec::new(),
        }
    }

    fn push_block(&mut self, block: BlockMeta) {
        self.assigned_bytes += block.length;
        self.blocks.push(block);
    }

    fn absorb(&mut self, other: HostWorkload) {
        self.assigned_bytes += other.assigned_bytes;
        self.blocks.extend(other.blocks);
    }
}

/// Assigns every block of every active partition to exactly one of its
/// replica hosts, preferring the least-loaded candidate.
///
/// Selection rule per block, scanning replica hostnames in catalog order: a
/// hostname with no workload yet is created at zero bytes and selected
/// outright; otherwise the candidate with the strictly smallest byte total
/// wins, ties going to the earliest occurrence in the replica list.
///
/// # Errors
/// A block with an empty replica list aborts the whole run with
/// [`QuarryError::CorruptMetadata`]. Skipping the block instead would
/// silently drop data from query results.
pub fn assign_blocks(
    active: &[Arc<Partition>],
    source: &dyn BlockSource,
) -> Result<BTreeMap<String, HostWorkload>> {
    let mut assignments: BTreeMap<String, HostWorkload> = BTreeMap::new();

    for partition in active {
        for block in source.blocks(partition)? {
            let host = select_host(&assignments, &block)?;
            debug!(
                path = %block.path,
                offset = block.offset,
                length = block.length,
                host = %host,
                "assigned block"
            );
            assignments
                .entry(host)
                .or_insert_with_key(|h| HostWorkload::new(h))
                .push_block(block);
        }
    }

    Ok(assignments)
}

fn select_host(assignments: &BTreeMap<String, HostWorkload>, block: &BlockMeta) -> Result<String> {
    let Some(first) = block.hosts.first() else {
        return Err(QuarryError::CorruptMetadata {
            path: block.path.clone(),
            offset: block.offset,
            detail: "block reports zero replica hosts".to_string(),
        });
    };

    let mut best = first.as_str();
    let mut best_bytes = match assignments.get(first) {
        Some(load) => load.assigned_bytes,
        None => return Ok(first.clone()),
    };
    for candidate in &block.hosts[1..] {
        match assignments.get(candidate) {
            // An unassigned host starts at zero bytes, the floor of any byte
            // total, so it wins outright.
            None => return Ok(candidate.clone()),
            Some(load) if load.assigned_bytes < best_bytes => {
                best = candidate;
                best_bytes = load.assigned_bytes;
            }
            Some(_) => {}
        }
    }
    Ok(best.to_string())
}

/// Levels `workloads` down to at most `target` hosts.
///
/// The `target` heaviest hosts survive: they already hold the most data, so
/// keeping them retains the most locality. Every remaining workload is then
/// merged whole into whichever survivor is currently lightest. Whole-host
/// merging keeps the pass at O(B log H) at the cost of fine-grained balance.
///
/// `target` must be positive; [`crate::scan_node::ScanNode::compute_scan_units`]
/// validates it before calling. An empty `workloads` map is returned as-is.
pub fn level_workloads(
    workloads: BTreeMap<String, HostWorkload>,
    target: usize,
) -> BTreeMap<String, HostWorkload> {
    debug_assert!(target > 0, "target node count must be positive");
    if workloads.is_empty() {
        return workloads;
    }

    // Heap entries own their workloads; a live reference would alias the
    // survivor that gets re-inserted after each merge. Sequence numbers keep
    // both orderings total when byte counts tie.
    let mut absorb: BinaryHeap<Heaviest> = workloads
        .into_values()
        .enumerate()
        .map(|(seq, load)| Heaviest { seq, load })
        .collect();

    let mut survivors: BinaryHeap<Lightest> = BinaryHeap::with_capacity(target);
    for _ in 0..target {
        match absorb.pop() {
            Some(Heaviest { seq, load }) => survivors.push(Lightest { seq, load }),
            None => break,
        }
    }

    while let Some(source) = absorb.pop() {
        // Non-empty: target >= 1 and at least one entry was moved over.
        let Some(mut dest) = survivors.pop() else {
            break;
        };
        debug!(
            from = %source.load.host,
            into = %dest.load.host,
            bytes = source.load.assigned_bytes,
            "merged host workload"
        );
        dest.load.absorb(source.load);
        survivors.push(dest);
    }

    survivors
        .into_iter()
        .map(|entry| (entry.load.host.clone(), entry.load))
        .collect()
}

/// Packages each host's assigned blocks into one dispatchable scan unit.
///
/// One file range per block, no adjacent-range merging. Unit order follows
/// the map's hostname order, so repeated runs over identical inputs emit
/// identical unit lists.
pub fn emit_units(node: PlanNodeId, workloads: &BTreeMap<String, HostWorkload>) -> Vec<ScanUnit> {
    workloads
        .values()
        .map(|load| ScanUnit {
            node,
            host: load.host.clone(),
            ranges: load
                .blocks
                .iter()
                .map(|block| FileRange {
                    path: block.path.clone(),
                    offset: block.offset,
                    length: block.length,
                    partition: block.partition,
                })
                .collect(),
        })
        .collect()
}

/// Max-heap entry: pops the heaviest workload, byte ties to the lowest
/// sequence number.
struct Heaviest {
    seq: usize,
    load: HostWorkload,
}

impl Ord for Heaviest {
    fn cmp(&self, other: &Self) -> Ordering {
        self.load
            .assigned_bytes
            .cmp(&other.load.assigned_bytes)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Heaviest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Heaviest {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Heaviest {}

/// Max-heap entry over reversed byte order: pops the lightest workload, byte
/// ties to the lowest sequence number.
struct Lightest {
    seq: usize,
    load: HostWorkload,
}

impl Ord for Lightest {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .load
            .assigned_bytes
            .cmp(&self.load.assigned_bytes)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Lightest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Lightest {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Lightest {}
