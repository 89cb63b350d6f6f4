use crate::error::TableError;

/// Operations shared by both collision strategies.
///
/// Useful for code that wants to stay agnostic of how a table resolves
/// collisions:
///
/// ```rust
/// use bucket_hash::ChainedHashTable;
/// use bucket_hash::HashFunction;
/// use bucket_hash::KeyValueTable;
/// use bucket_hash::ProbingHashTable;
///
/// fn load(table: &mut impl KeyValueTable<&'static str, u32>) {
///     for (name, age) in [("Ygritte", 4), ("Jonathan", 5), ("Jamie", 5)] {
///         table.put(name, age).unwrap();
///     }
/// }
///
/// let mut chained = ChainedHashTable::new(37, HashFunction::Summation);
/// let mut probing = ProbingHashTable::new(37, HashFunction::Summation);
/// load(&mut chained);
/// load(&mut probing);
/// assert_eq!(KeyValueTable::len(&chained), 3);
/// assert_eq!(KeyValueTable::get(&probing, &"Jamie"), Some(&5));
/// ```
pub trait KeyValueTable<K, V> {
    /// Inserts or replaces the value for `key`.
    ///
    /// Returns `Ok(false)` without writing anything when `key` or `value` is
    /// unset.
    fn put(&mut self, key: K, value: V) -> Result<bool, TableError>;

    /// Returns the value stored for `key`.
    fn get(&self, key: &K) -> Option<&V>;

    /// Removes `key`, returning whether it was present.
    fn remove(&mut self, key: &K) -> bool;

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Returns `true` if no entries are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    fn clear(&mut self);

    /// Number of buckets.
    fn capacity(&self) -> usize;
}
