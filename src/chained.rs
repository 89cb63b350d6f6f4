use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Display;

use log::debug;
use log::trace;

use crate::chain;
use crate::chain::Chain;
use crate::entry::ValuePair;
use crate::error::TableError;
use crate::error::check_capacity;
use crate::hash_fn::HashFunction;
use crate::key::Canonicalize;
use crate::key::DefaultCanonicalizer;
use crate::key::HashKey;
use crate::key::Unset;
use crate::table::KeyValueTable;

/// A fixed-capacity hash table resolving collisions with separate chaining.
///
/// Each bucket holds an optional [`Chain`] of entries whose keys hash to that
/// bucket, in insertion order. Chains grow without bound, so insertion never
/// fails for lack of space; a degenerate hash only makes lookups slower.
///
/// Keys are compared by their canonical token (see
/// [`Canonicalize`]), never by `Eq`.
///
/// # Example
///
/// ```rust
/// use bucket_hash::ChainedHashTable;
/// use bucket_hash::HashFunction;
///
/// let mut table = ChainedHashTable::new(37, HashFunction::Summation);
/// table.put("Ygritte", 4);
/// table.put("Jonathan", 5);
/// table.put("Jamie", 5);
///
/// // Jonathan and Jamie share bucket 5.
/// assert_eq!(table.bucket(5).map(|chain| chain.len()), Some(2));
/// assert_eq!(table.get(&"Jamie"), Some(&5));
/// assert_eq!(
///     table.to_string(),
///     "{4 => [#Ygritte: 4]},{5 => [#Jonathan: 5],[#Jamie: 5]}"
/// );
/// ```
#[derive(Clone)]
pub struct ChainedHashTable<K, V, C = DefaultCanonicalizer> {
    buckets: Vec<Option<Chain<ValuePair<K, V>>>>,
    len: usize,
    hash_fn: HashFunction,
    canonicalizer: C,
}

fn empty_buckets<T>(capacity: usize) -> Vec<Option<T>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, || None);
    buckets
}

impl<K, V> ChainedHashTable<K, V, DefaultCanonicalizer> {
    /// Creates a table with `capacity` buckets, canonicalizing keys through
    /// their `Display` rendering.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize, hash_fn: HashFunction) -> Self {
        Self::with_canonicalizer(capacity, hash_fn, DefaultCanonicalizer)
    }

    /// Like [`new`](Self::new), but reports a zero capacity as an error.
    pub fn try_new(capacity: usize, hash_fn: HashFunction) -> Result<Self, TableError> {
        Self::try_with_canonicalizer(capacity, hash_fn, DefaultCanonicalizer)
    }
}

impl<K, V, C> ChainedHashTable<K, V, C> {
    /// Creates a table with `capacity` buckets and an explicit canonicalizer.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_canonicalizer(capacity: usize, hash_fn: HashFunction, canonicalizer: C) -> Self {
        assert!(capacity > 0, "table capacity must be non-zero");
        Self {
            buckets: empty_buckets(capacity),
            len: 0,
            hash_fn,
            canonicalizer,
        }
    }

    /// Like [`with_canonicalizer`](Self::with_canonicalizer), but reports a
    /// zero capacity as an error.
    pub fn try_with_canonicalizer(
        capacity: usize,
        hash_fn: HashFunction,
        canonicalizer: C,
    ) -> Result<Self, TableError> {
        let capacity = check_capacity(capacity)?;
        Ok(Self::with_canonicalizer(capacity, hash_fn, canonicalizer))
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// The hash function in use.
    pub fn hash_function(&self) -> HashFunction {
        self.hash_fn
    }

    /// Drops every entry and every chain. Capacity is unchanged.
    pub fn clear(&mut self) {
        debug!("clearing chained table of {} entries", self.len);
        self.buckets.iter_mut().for_each(|bucket| *bucket = None);
        self.len = 0;
    }

    /// The chain stored at bucket `index`, or `None` when the bucket is
    /// empty or out of range.
    pub fn bucket(&self, index: usize) -> Option<&Chain<ValuePair<K, V>>> {
        self.buckets.get(index)?.as_ref()
    }

    /// Iterates over the entries in bucket order, and within a bucket in
    /// chain order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
            remaining: self.len,
        }
    }

    /// Iterates over the keys in [`iter`](Self::iter) order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// Iterates over the values in [`iter`](Self::iter) order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Calls `f` on every entry in [`iter`](Self::iter) order until it
    /// returns `false`.
    pub fn for_each(&self, mut f: impl FnMut(&K, &V) -> bool) {
        for (k, v) in self.iter() {
            if !f(k, v) {
                break;
            }
        }
    }

    /// Computes occupancy statistics.
    #[cfg(feature = "stats")]
    pub fn stats(&self) -> crate::stats::TableStats {
        let occupied = self.buckets.iter().flatten().count();
        let longest = self
            .buckets
            .iter()
            .flatten()
            .map(Chain::len)
            .max()
            .unwrap_or(0);
        crate::stats::TableStats::new(self.len, self.capacity(), occupied, longest)
    }

    /// Histogram of chain lengths: bin `i` counts the buckets holding `i`
    /// entries.
    #[cfg(feature = "stats")]
    pub fn chain_length_histogram(&self) -> crate::stats::Histogram {
        let mut hist = crate::stats::Histogram::new("chain length");
        for bucket in &self.buckets {
            hist.record(bucket.as_ref().map_or(0, Chain::len));
        }
        hist
    }
}

impl<K, V, C> ChainedHashTable<K, V, C>
where
    K: HashKey,
    C: Canonicalize<K>,
{
    fn locate(&self, key: &K) -> (usize, String) {
        let token = self.canonicalizer.canonicalize(key);
        let index = self.hash_fn.bucket(key, &token, self.capacity());
        (index, token)
    }

    /// Inserts `value` for `key`, replacing the value of an entry with the
    /// same canonical token.
    ///
    /// Returns `false`, leaving the table untouched, when `key` or `value`
    /// is unset (see [`Unset`]).
    ///
    /// ```rust
    /// use bucket_hash::ChainedHashTable;
    /// use bucket_hash::HashFunction;
    /// use bucket_hash::Key;
    ///
    /// let mut table = ChainedHashTable::new(7, HashFunction::Polynomial);
    /// assert!(table.put(Key::from("a"), 1));
    /// assert!(table.put(Key::from("a"), 2));
    /// assert!(!table.put(Key::Null, 3));
    /// assert_eq!(table.len(), 1);
    /// assert_eq!(table.get(&Key::from("a")), Some(&2));
    /// ```
    pub fn put(&mut self, key: K, value: V) -> bool
    where
        V: Unset,
    {
        if key.is_unset() {
            debug!("refusing to store an unset key");
            return false;
        }
        if value.is_unset() {
            debug!("refusing to store an unset value");
            return false;
        }

        let (index, token) = self.locate(&key);
        let chain = self.buckets[index].get_or_insert_with(Chain::new);
        if let Some(pair) = chain.find_mut(|pair| pair.matches(&token)) {
            pair.replace_value(value);
            return true;
        }

        if !chain.is_empty() {
            trace!("'{token}' chained behind {} in bucket {index}", chain.len());
        }
        chain.push_back(ValuePair::new(key, token, value));
        self.len += 1;
        true
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let (index, token) = self.locate(key);
        self.buckets[index]
            .as_ref()?
            .find(|pair| pair.matches(&token))
            .map(ValuePair::value)
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let (index, token) = self.locate(key);
        self.buckets[index]
            .as_mut()?
            .find_mut(|pair| pair.matches(&token))
            .map(ValuePair::value_mut)
    }

    /// Returns `true` if an entry with the key's token is stored.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key`, returning whether it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Removes `key`, returning the stored key and value.
    ///
    /// A bucket whose chain becomes empty is reset, so it is
    /// indistinguishable from a bucket that was never used.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let (index, token) = self.locate(key);
        let chain = self.buckets[index].as_mut()?;
        let pair = chain.remove_first(|pair| pair.matches(&token))?;
        if chain.is_empty() {
            self.buckets[index] = None;
        }
        self.len -= 1;
        Some(pair.into_parts())
    }

    /// Rebuilds the table with `capacity` buckets, re-placing every entry
    /// with the same hash function. Stored tokens are reused.
    ///
    /// This is the only way a table changes capacity; `put` never resizes.
    pub fn rehash(&mut self, capacity: usize) -> Result<(), TableError> {
        let capacity = check_capacity(capacity)?;
        debug!(
            "rehashing chained table of {} entries from {} to {capacity} buckets",
            self.len,
            self.capacity()
        );

        let old = core::mem::replace(&mut self.buckets, empty_buckets(capacity));
        for pair in old.into_iter().flatten().flatten() {
            let index = self.hash_fn.bucket(pair.key(), pair.token(), capacity);
            self.buckets[index]
                .get_or_insert_with(Chain::new)
                .push_back(pair);
        }
        Ok(())
    }

    /// Re-scans every bucket and checks the table's invariants.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut seen = 0;
        for (index, bucket) in self.buckets.iter().enumerate() {
            let Some(chain) = bucket else { continue };
            assert!(!chain.is_empty(), "empty chain left in bucket {index}");
            for (i, pair) in chain.iter().enumerate() {
                assert_eq!(
                    self.hash_fn.bucket(pair.key(), pair.token(), self.capacity()),
                    index,
                    "'{}' stored in the wrong bucket",
                    pair.token()
                );
                assert!(
                    chain.iter().skip(i + 1).all(|other| other.token() != pair.token()),
                    "duplicate token '{}' in bucket {index}",
                    pair.token()
                );
            }
            seen += chain.len();
        }
        assert_eq!(seen, self.len);
    }
}

impl<K, V, C> KeyValueTable<K, V> for ChainedHashTable<K, V, C>
where
    K: HashKey,
    V: Unset,
    C: Canonicalize<K>,
{
    fn put(&mut self, key: K, value: V) -> Result<bool, TableError> {
        Ok(ChainedHashTable::put(self, key, value))
    }

    fn get(&self, key: &K) -> Option<&V> {
        ChainedHashTable::get(self, key)
    }

    fn remove(&mut self, key: &K) -> bool {
        ChainedHashTable::remove(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        ChainedHashTable::clear(self)
    }

    fn capacity(&self) -> usize {
        ChainedHashTable::capacity(self)
    }
}

impl<K, V, C> Debug for ChainedHashTable<K, V, C>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Buckets<'a, K, V>(&'a [Option<Chain<ValuePair<K, V>>>]);

        impl<K: Debug, V: Debug> Debug for Buckets<'_, K, V> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut map = f.debug_map();
                for (index, bucket) in self.0.iter().enumerate() {
                    if let Some(chain) = bucket {
                        map.entry(&index, chain);
                    }
                }
                map.finish()
            }
        }

        f.debug_struct("ChainedHashTable")
            .field("buckets", &Buckets(&self.buckets))
            .field("len", &self.len)
            .field("capacity", &self.buckets.len())
            .field("hash_fn", &self.hash_fn)
            .finish()
    }
}

/// Renders non-empty buckets in index order as `{index => chain}`,
/// separated by `,`. An empty table renders as the empty string.
impl<K, V, C> Display for ChainedHashTable<K, V, C>
where
    K: Display,
    V: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let occupied = self
            .buckets
            .iter()
            .enumerate()
            .filter_map(|(index, bucket)| Some((index, bucket.as_ref()?)));
        for (i, (index, chain)) in occupied.enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{{{index} => {chain}}}")?;
        }
        Ok(())
    }
}

/// Iterator over the entries of a [`ChainedHashTable`].
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Option<Chain<ValuePair<K, V>>>>,
    chain: Option<chain::Iter<'a, ValuePair<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pair) = self.chain.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some((pair.key(), pair.value()));
            }
            self.chain = self.buckets.next()?.as_ref().map(Chain::iter);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, C> IntoIterator for &'a ChainedHashTable<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
