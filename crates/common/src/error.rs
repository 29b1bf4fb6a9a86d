use thiserror::Error;

/// Canonical Quarry error taxonomy used across crates.
///
/// Classification guidance:
/// - [`QuarryError::Planning`]: name/shape issues discovered while building a plan
/// - [`QuarryError::Precondition`]: caller broke an API contract; never retried
/// - [`QuarryError::CorruptMetadata`]: catalog state violating a storage invariant
/// - [`QuarryError::InvalidConfig`]: catalog/config file contract violations
/// - [`QuarryError::Io`]: raw filesystem IO failures from std APIs
#[derive(Debug, Error)]
pub enum QuarryError {
    /// Invalid or inconsistent configuration/catalog state.
    ///
    /// Examples:
    /// - malformed catalog snapshot JSON
    /// - table definition missing required fields
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Query planning failures.
    ///
    /// Examples:
    /// - unknown table
    #[error("planning error: {0}")]
    Planning(String),

    /// A caller-side contract violation. Fatal for the operation that raised
    /// it: no retry, no partial result.
    ///
    /// Examples:
    /// - more key-range predicates than clustering columns
    /// - a concrete execution-node count of zero
    /// - a rack-level node request handed to a host-level scheduler
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Storage metadata violating a structural invariant.
    ///
    /// Carries the owning file path and byte offset so the offending entry
    /// can be located in the block catalog.
    #[error("corrupt block metadata for {path} at offset {offset}: {detail}")]
    CorruptMetadata {
        /// Path of the data file the bad block belongs to.
        path: String,
        /// Byte offset of the bad block within the file.
        offset: u64,
        /// What invariant the block broke.
        detail: String,
    },

    /// Transparent std IO failures.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Standard Quarry result alias.
pub type Result<T> = std::result::Result<T, QuarryError>;
