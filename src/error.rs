use thiserror::Error;

/// Errors reported by table construction and insertion.
///
/// Looking up or removing a missing key is not an error; those operations
/// return `None` or `false`. Likewise, an unset key passed to `put` is
/// reported through the boolean result rather than through this type.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// A table was requested with zero buckets.
    #[error("table capacity must be non-zero")]
    ZeroCapacity,
    /// Every slot of a probing table is occupied and the key is new.
    #[error("all {capacity} slots are occupied")]
    CapacityExhausted {
        /// Number of slots in the table.
        capacity: usize,
    },
}

/// Validates a requested bucket count.
pub(crate) fn check_capacity(capacity: usize) -> Result<usize, TableError> {
    if capacity == 0 {
        return Err(TableError::ZeroCapacity);
    }
    Ok(capacity)
}
