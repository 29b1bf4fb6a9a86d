use quarry_catalog::Literal;

/// Membership test for one clustering-column literal.
///
/// Predicate analysis derives these from literal comparisons against
/// partition key columns; the planner treats each one as an opaque
/// capability and only ever asks "is this key value inside the range".
pub trait KeyRange: Send + Sync {
    /// True when `value` falls inside the range.
    fn contains(&self, value: &Literal) -> bool;
}

/// Per-column key-range slots, one per leading clustering column.
///
/// A `None` slot leaves its column unrestricted. The slice may cover a
/// prefix of the clustering columns, never more than all of them.
pub type KeyRanges = [Option<Box<dyn KeyRange>>];
