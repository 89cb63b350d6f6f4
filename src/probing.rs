use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Display;

use log::debug;
use log::trace;

use crate::entry::ValuePair;
use crate::error::TableError;
use crate::error::check_capacity;
use crate::hash_fn::HashFunction;
use crate::key::Canonicalize;
use crate::key::DefaultCanonicalizer;
use crate::key::HashKey;
use crate::key::Unset;
use crate::table::KeyValueTable;

/// Outcome of a bounded linear probe.
enum Probe {
    /// The slot holding the key.
    Found(usize),
    /// The first empty slot on the key's probe path.
    Vacant(usize),
    /// Every slot was visited without finding the key or an empty slot.
    Exhausted,
}

/// Number of steps from `from` forward to `to`, wrapping at `capacity`.
#[inline(always)]
fn distance(from: usize, to: usize, capacity: usize) -> usize {
    (to + capacity - from) % capacity
}

/// A fixed-capacity hash table resolving collisions with linear probing.
///
/// Each slot holds at most one entry. A key that finds its natural slot
/// taken is stored in the next free slot, scanning forward and wrapping at
/// the end of the table. Removal compacts the cluster that follows the freed
/// slot instead of leaving a tombstone, so every stored key is reachable from
/// its natural slot without crossing an empty slot.
///
/// # Example
///
/// ```rust
/// use bucket_hash::HashFunction;
/// use bucket_hash::ProbingHashTable;
///
/// let mut table = ProbingHashTable::new(37, HashFunction::Summation);
/// table.put("Ygritte", 4)?;
/// table.put("Jonathan", 5)?;
/// table.put("Jamie", 5)?;
/// assert_eq!(table.slot_of(&"Jamie"), Some(6));
///
/// // Removing Jonathan pulls Jamie back into its natural slot.
/// assert!(table.remove(&"Jonathan"));
/// assert_eq!(table.slot_of(&"Jamie"), Some(5));
/// assert_eq!(table.to_string(), "{4 => [#Ygritte: 4]},{5 => [#Jamie: 5]}");
/// # Ok::<(), bucket_hash::TableError>(())
/// ```
#[derive(Clone)]
pub struct ProbingHashTable<K, V, C = DefaultCanonicalizer> {
    slots: Vec<Option<ValuePair<K, V>>>,
    len: usize,
    hash_fn: HashFunction,
    canonicalizer: C,
}

fn empty_slots<T>(capacity: usize) -> Vec<Option<T>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || None);
    slots
}

impl<K, V> ProbingHashTable<K, V, DefaultCanonicalizer> {
    /// Creates a table with `capacity` slots, canonicalizing keys through
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

impl<K, V, C> ProbingHashTable<K, V, C> {
    /// Creates a table with `capacity` slots and an explicit canonicalizer.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_canonicalizer(capacity: usize, hash_fn: HashFunction, canonicalizer: C) -> Self {
        assert!(capacity > 0, "table capacity must be non-zero");
        Self {
            slots: empty_slots(capacity),
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

    /// Returns `true` if every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The hash function in use.
    pub fn hash_function(&self) -> HashFunction {
        self.hash_fn
    }

    /// Empties every slot. Capacity is unchanged.
    pub fn clear(&mut self) {
        debug!("clearing probing table of {} entries", self.len);
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.len = 0;
    }

    /// The entry stored in slot `index`, if any.
    pub fn slot(&self, index: usize) -> Option<&ValuePair<K, V>> {
        self.slots.get(index)?.as_ref()
    }

    /// Iterates over the entries in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Iterates over the keys in slot order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// Iterates over the values in slot order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Calls `f` on every entry in slot order until it returns `false`.
    pub fn for_each(&self, mut f: impl FnMut(&K, &V) -> bool) {
        for (k, v) in self.iter() {
            if !f(k, v) {
                break;
            }
        }
    }

    /// Length of the longest run of consecutive occupied slots, wrapping at
    /// the end of the table.
    #[cfg(feature = "stats")]
    fn longest_cluster(&self) -> usize {
        if self.is_full() {
            return self.len;
        }
        let capacity = self.slots.len();
        // Start right after an empty slot so no run is split by the wrap.
        let start = self
            .slots
            .iter()
            .position(Option::is_none)
            .map_or(0, |empty| empty + 1);

        let mut longest = 0;
        let mut run = 0;
        for step in 0..capacity {
            if self.slots[(start + step) % capacity].is_some() {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 0;
            }
        }
        longest
    }
}

impl<K, V, C> ProbingHashTable<K, V, C>
where
    K: HashKey,
    C: Canonicalize<K>,
{
    fn natural_slot(&self, pair: &ValuePair<K, V>) -> usize {
        self.hash_fn
            .bucket(pair.key(), pair.token(), self.slots.len())
    }

    /// Scans forward from `start` for `token`, stopping at the first empty
    /// slot and after at most one full lap.
    fn probe(&self, start: usize, token: &str) -> Probe {
        let capacity = self.slots.len();
        for step in 0..capacity {
            let index = (start + step) % capacity;
            match &self.slots[index] {
                None => return Probe::Vacant(index),
                Some(pair) if pair.matches(token) => return Probe::Found(index),
                Some(_) => {}
            }
        }
        Probe::Exhausted
    }

    fn find_index(&self, key: &K) -> Option<usize> {
        let token = self.canonicalizer.canonicalize(key);
        let start = self.hash_fn.bucket(key, &token, self.slots.len());
        match self.probe(start, &token) {
            Probe::Found(index) => Some(index),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    /// Inserts `value` for `key`, replacing the value of an entry with the
    /// same canonical token.
    ///
    /// Returns `Ok(false)`, leaving the table untouched, when `key` or
    /// `value` is unset (see [`Unset`]).
    ///
    /// # Errors
    ///
    /// Returns [`TableError::CapacityExhausted`] when `key` is new and every
    /// slot is occupied. Replacing the value of a stored key always succeeds.
    ///
    /// ```rust
    /// use bucket_hash::HashFunction;
    /// use bucket_hash::ProbingHashTable;
    /// use bucket_hash::TableError;
    ///
    /// let mut table = ProbingHashTable::new(2, HashFunction::Polynomial);
    /// assert_eq!(table.put("a", 1), Ok(true));
    /// assert_eq!(table.put("b", 2), Ok(true));
    /// assert_eq!(table.put("a", 3), Ok(true));
    /// assert_eq!(
    ///     table.put("c", 4),
    ///     Err(TableError::CapacityExhausted { capacity: 2 })
    /// );
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Result<bool, TableError>
    where
        V: Unset,
    {
        if key.is_unset() {
            debug!("refusing to store an unset key");
            return Ok(false);
        }
        if value.is_unset() {
            debug!("refusing to store an unset value");
            return Ok(false);
        }

        let token = self.canonicalizer.canonicalize(&key);
        let natural = self.hash_fn.bucket(&key, &token, self.slots.len());
        // A full table can still take a replacement, so the probe runs either
        // way; it is bounded to one lap and reports exhaustion instead of
        // spinning.
        match self.probe(natural, &token) {
            Probe::Found(index) => {
                if let Some(pair) = self.slots[index].as_mut() {
                    pair.replace_value(value);
                }
            }
            Probe::Vacant(index) => {
                if index != natural {
                    trace!(
                        "'{token}' displaced from slot {natural} to {index} ({} steps)",
                        distance(natural, index, self.slots.len())
                    );
                }
                self.slots[index] = Some(ValuePair::new(key, token, value));
                self.len += 1;
            }
            Probe::Exhausted => {
                debug!(
                    "no free slot for '{token}' in a full table of {}",
                    self.slots.len()
                );
                return Err(TableError::CapacityExhausted {
                    capacity: self.slots.len(),
                });
            }
        }
        Ok(true)
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let index = self.find_index(key)?;
        self.slots[index].as_ref().map(ValuePair::value)
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.find_index(key)?;
        self.slots[index].as_mut().map(ValuePair::value_mut)
    }

    /// Returns `true` if an entry with the key's token is stored.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_index(key).is_some()
    }

    /// Returns the slot currently holding `key`.
    pub fn slot_of(&self, key: &K) -> Option<usize> {
        self.find_index(key)
    }

    /// Removes `key`, returning whether it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Removes `key`, returning the stored key and value, then compacts the
    /// cluster following the freed slot.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let index = self.find_index(key)?;
        let pair = self.slots[index].take()?;
        self.len -= 1;
        self.compact(index);
        Some(pair.into_parts())
    }

    /// Closes the gap left at `freed`.
    ///
    /// Walks forward from the slot after the gap until the first empty slot.
    /// An entry whose natural slot is not strictly between the gap and its
    /// current slot (in probe order) would be unreachable past the gap, so it
    /// moves into the gap and its old slot becomes the new gap.
    fn compact(&mut self, freed: usize) {
        let capacity = self.slots.len();
        let mut gap = freed;
        let mut index = (freed + 1) % capacity;

        while let Some(pair) = &self.slots[index] {
            let natural = self.natural_slot(pair);
            if distance(natural, index, capacity) >= distance(gap, index, capacity) {
                trace!(
                    "compaction moves '{}' from slot {index} to {gap}",
                    pair.token()
                );
                self.slots[gap] = self.slots[index].take();
                gap = index;
            }
            index = (index + 1) % capacity;
        }
    }

    /// Rebuilds the table with `capacity` slots, re-placing every entry with
    /// the same hash function. Stored tokens are reused.
    ///
    /// This is the only way a table changes capacity; `put` never resizes.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ZeroCapacity`] for a zero capacity and
    /// [`TableError::CapacityExhausted`] if the entries would not fit. The
    /// table is unchanged on error.
    pub fn rehash(&mut self, capacity: usize) -> Result<(), TableError> {
        let capacity = check_capacity(capacity)?;
        if capacity < self.len {
            return Err(TableError::CapacityExhausted { capacity });
        }
        debug!(
            "rehashing probing table of {} entries from {} to {capacity} slots",
            self.len,
            self.slots.len()
        );

        let old = core::mem::replace(&mut self.slots, empty_slots(capacity));
        for pair in old.into_iter().flatten() {
            let natural = self.natural_slot(&pair);
            let mut index = natural;
            while self.slots[index].is_some() {
                index = (index + 1) % capacity;
            }
            self.slots[index] = Some(pair);
        }
        Ok(())
    }

    /// Computes occupancy statistics.
    #[cfg(feature = "stats")]
    pub fn stats(&self) -> crate::stats::TableStats {
        crate::stats::TableStats::new(self.len, self.capacity(), self.len, self.longest_cluster())
    }

    /// Histogram of probe distances: bin `d` counts the entries stored `d`
    /// slots past their natural slot.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> crate::stats::Histogram {
        let capacity = self.slots.len();
        let mut hist = crate::stats::Histogram::new("probe distance");
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(pair) = slot {
                hist.record(distance(self.natural_slot(pair), index, capacity));
            }
        }
        hist
    }

    /// Re-scans every slot and checks that no entry sits behind a gap and
    /// that every entry is the one a lookup from its natural slot finds.
    ///
    /// Two entries may share a token when their natural slots differ (an
    /// integer key and its text spelling under summation); only one of them
    /// may lie on the other's probe path.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let capacity = self.slots.len();
        let mut seen = 0;
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(pair) = slot else { continue };
            seen += 1;
            let natural = self.natural_slot(pair);
            for step in 0..distance(natural, index, capacity) {
                let between = (natural + step) % capacity;
                assert!(
                    self.slots[between].is_some(),
                    "'{}' at {index} is cut off from slot {natural} by a gap at {between}",
                    pair.token()
                );
            }
            assert!(
                matches!(
                    self.probe(natural, pair.token()),
                    Probe::Found(found) if found == index
                ),
                "'{}' at {index} is shadowed by an earlier entry with the same token",
                pair.token()
            );
        }
        assert_eq!(seen, self.len);
    }
}

impl<K, V, C> KeyValueTable<K, V> for ProbingHashTable<K, V, C>
where
    K: HashKey,
    V: Unset,
    C: Canonicalize<K>,
{
    fn put(&mut self, key: K, value: V) -> Result<bool, TableError> {
        ProbingHashTable::put(self, key, value)
    }

    fn get(&self, key: &K) -> Option<&V> {
        ProbingHashTable::get(self, key)
    }

    fn remove(&mut self, key: &K) -> bool {
        ProbingHashTable::remove(self, key)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        ProbingHashTable::clear(self)
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<K, V, C> Debug for ProbingHashTable<K, V, C>
where
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use alloc::format;

        f.debug_struct("ProbingHashTable")
            .field(
                "slots",
                &self
                    .slots
                    .iter()
                    .map(|slot| match slot {
                        Some(pair) => format!("{}: {:?}", pair.token(), pair.value()),
                        None => String::from(".."),
                    })
                    .collect::<Vec<_>>(),
            )
            .field("len", &self.len)
            .field("capacity", &self.slots.len())
            .field("hash_fn", &self.hash_fn)
            .finish()
    }
}

/// Renders occupied slots in index order as `{index => [#key: value]}`,
/// separated by `,`. An empty table renders as the empty string.
impl<K, V, C> Display for ProbingHashTable<K, V, C>
where
    K: Display,
    V: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let occupied = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| Some((index, slot.as_ref()?)));
        for (i, (index, pair)) in occupied.enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{{{index} => {pair}}}")?;
        }
        Ok(())
    }
}

/// Iterator over the entries of a [`ProbingHashTable`].
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Option<ValuePair<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.slots.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some((pair.key(), pair.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, C> IntoIterator for &'a ProbingHashTable<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::format;
    use alloc::string::ToString;
    use alloc::vec;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::key::Key;

    fn init_logging() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .try_init();
    }

    fn tutorial_table() -> ProbingHashTable<&'static str, u32> {
        let mut table = ProbingHashTable::new(37, HashFunction::Summation);
        for (name, age) in [("Ygritte", 4), ("Jonathan", 5), ("Jamie", 5)] {
            assert_eq!(table.put(name, age), Ok(true));
        }
        table
    }

    #[test]
    fn collision_lands_in_next_slot() {
        init_logging();
        let table = tutorial_table();
        assert_eq!(table.slot_of(&"Ygritte"), Some(4));
        assert_eq!(table.slot_of(&"Jonathan"), Some(5));
        assert_eq!(table.slot_of(&"Jamie"), Some(6));
        assert_eq!(table.get(&"Jamie"), Some(&5));
        assert_eq!(
            table.to_string(),
            "{4 => [#Ygritte: 4]},{5 => [#Jonathan: 5]},{6 => [#Jamie: 5]}"
        );
        table.assert_invariants();
    }

    #[test]
    fn removal_compacts_displaced_entry() {
        init_logging();
        let mut table = tutorial_table();
        assert!(table.remove(&"Jonathan"));
        assert_eq!(table.get(&"Jonathan"), None);
        assert_eq!(table.slot_of(&"Jamie"), Some(5));
        assert!(table.slot(6).is_none());
        assert_eq!(table.len(), 2);
        table.assert_invariants();
    }

    #[test]
    fn removing_middle_of_three_colliders() {
        let mut table = ProbingHashTable::new(10, HashFunction::Summation);
        for key in [3u32, 13, 23] {
            table.put(key, key * 10).unwrap();
        }
        assert_eq!(table.slot_of(&23), Some(5));
        assert!(table.remove(&13));
        assert_eq!(table.get(&23), Some(&230));
        assert_eq!(table.get(&13), None);
        assert_eq!(table.slot_of(&23), Some(4));
        table.assert_invariants();
    }

    #[test]
    fn entries_at_home_are_not_moved() {
        let mut table = ProbingHashTable::new(10, HashFunction::Summation);
        for key in [1u32, 11, 3] {
            table.put(key, ()).unwrap();
        }
        assert_eq!(table.slot_of(&11), Some(2));
        assert_eq!(table.slot_of(&3), Some(3));
        assert!(table.remove(&1));
        assert_eq!(table.slot_of(&11), Some(1));
        assert_eq!(table.slot_of(&3), Some(3));
        assert!(table.slot(2).is_none());
        table.assert_invariants();
    }

    #[test]
    fn probing_wraps_around() {
        init_logging();
        let mut table = ProbingHashTable::new(5, HashFunction::Summation);
        for key in [4i64, 9, 14] {
            table.put(key, key).unwrap();
        }
        assert_eq!(table.slot_of(&4), Some(4));
        assert_eq!(table.slot_of(&9), Some(0));
        assert_eq!(table.slot_of(&14), Some(1));

        assert!(table.remove(&4));
        assert_eq!(table.slot_of(&9), Some(4));
        assert_eq!(table.slot_of(&14), Some(0));
        assert_eq!(table.get(&14), Some(&14));
        table.assert_invariants();
    }

    #[test]
    fn negative_integer_keys() {
        let mut table = ProbingHashTable::new(7, HashFunction::Summation);
        table.put(-1i32, "minus one").unwrap();
        assert_eq!(table.slot_of(&-1), Some(6));
        assert_eq!(table.get(&-1), Some(&"minus one"));
    }

    #[test]
    fn full_table_rejects_new_keys_only() {
        let mut table = ProbingHashTable::new(4, HashFunction::Polynomial);
        for i in 0..4u32 {
            assert_eq!(table.put(i, i), Ok(true));
        }
        assert!(table.is_full());
        assert_eq!(
            table.put(99, 99),
            Err(TableError::CapacityExhausted { capacity: 4 })
        );
        assert_eq!(table.len(), 4);
        assert_eq!(table.put(2, 20), Ok(true));
        assert_eq!(table.get(&2), Some(&20));
        // Lookups of missing keys terminate on a full table.
        assert_eq!(table.get(&99), None);
        assert!(!table.remove(&99));

        assert!(table.remove(&0));
        assert_eq!(table.put(99, 99), Ok(true));
        table.assert_invariants();
    }

    #[test]
    fn single_slot_table() {
        let mut table = ProbingHashTable::new(1, HashFunction::Summation);
        assert_eq!(table.put("only", 1), Ok(true));
        assert!(table.put("other", 2).is_err());
        assert!(table.remove(&"only"));
        assert!(table.is_empty());
        assert_eq!(table.put("other", 2), Ok(true));
        table.assert_invariants();
    }

    #[test]
    fn unset_keys_are_rejected() {
        let mut table: ProbingHashTable<Key, u8> =
            ProbingHashTable::new(3, HashFunction::Summation);
        assert_eq!(table.put(Key::Undefined, 1), Ok(false));
        assert_eq!(table.put(Key::Null, 1), Ok(false));
        assert!(table.is_empty());
        assert_eq!(table.get(&Key::Null), None);
    }

    #[test]
    fn unset_values_are_rejected() {
        let mut table: ProbingHashTable<&str, Option<u32>> =
            ProbingHashTable::new(3, HashFunction::Summation);
        assert_eq!(table.put("a", None), Ok(false));
        assert!(table.is_empty());
        assert_eq!(table.put("a", Some(1)), Ok(true));
        assert_eq!(table.put("a", None), Ok(false));
        assert_eq!(table.get(&"a"), Some(&Some(1)));

        let mut keyed: ProbingHashTable<&str, Key> =
            ProbingHashTable::new(3, HashFunction::Summation);
        assert_eq!(keyed.put("a", Key::Null), Ok(false));
        assert_eq!(KeyValueTable::put(&mut keyed, "a", Key::Undefined), Ok(false));
        assert!(keyed.is_empty());
        assert_eq!(keyed.put("a", Key::from(0)), Ok(true));
        assert_eq!(keyed.len(), 1);
    }

    #[test]
    fn integer_and_text_spellings_under_summation() {
        // 5 hashes to its own value; "5" sums to 53, so it starts at slot 3.
        let mut apart: ProbingHashTable<Key, &str> =
            ProbingHashTable::new(10, HashFunction::Summation);
        assert_eq!(apart.put(Key::from(5), "number"), Ok(true));
        assert_eq!(apart.put(Key::from("5"), "text"), Ok(true));
        assert_eq!(apart.len(), 2);
        assert_eq!(apart.slot_of(&Key::from(5)), Some(5));
        assert_eq!(apart.slot_of(&Key::from("5")), Some(3));
        assert_eq!(apart.get(&Key::from(5)), Some(&"number"));
        assert_eq!(apart.get(&Key::from("5")), Some(&"text"));
        apart.assert_invariants();

        // With slots 3 and 4 taken, the text probe reaches the integer entry.
        let mut met: ProbingHashTable<Key, &str> =
            ProbingHashTable::new(10, HashFunction::Summation);
        for key in [3, 4, 5] {
            assert_eq!(met.put(Key::from(key), "number"), Ok(true));
        }
        assert_eq!(met.put(Key::from("5"), "text"), Ok(true));
        assert_eq!(met.len(), 3);
        assert_eq!(met.get(&Key::from(5)), Some(&"text"));
        assert_eq!(met.slot(5).map(|pair| pair.key()), Some(&Key::from(5)));
        met.assert_invariants();
    }

    #[test]
    fn overwrite_keeps_size() {
        let mut table = tutorial_table();
        assert_eq!(table.put("Jamie", 6), Ok(true));
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(&"Jamie"), Some(&6));
        *table.get_mut(&"Ygritte").unwrap() = 15;
        assert_eq!(table.get(&"Ygritte"), Some(&15));
        assert_eq!(table.slot_of(&"Jamie"), Some(6));
    }

    #[test]
    fn iteration_in_slot_order() {
        let table = tutorial_table();
        assert_eq!(
            table.keys().copied().collect::<Vec<_>>(),
            ["Ygritte", "Jonathan", "Jamie"]
        );
        assert_eq!(table.iter().len(), 3);
        let mut visited = vec![];
        table.for_each(|k, v| {
            visited.push((*k, *v));
            true
        });
        assert_eq!(visited.len(), 3);
        assert_eq!((&table).into_iter().count(), 3);
    }

    #[test]
    fn clear_empties_every_slot() {
        let mut table = tutorial_table();
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.to_string(), "");
        assert_eq!(table.get(&"Jamie"), None);
        table.assert_invariants();
    }

    #[test]
    fn rehash_grows_and_shrinks() {
        let mut table = ProbingHashTable::new(8, HashFunction::Polynomial);
        for i in 0..8u32 {
            table.put(format!("k{i}"), i).unwrap();
        }
        table.rehash(64).unwrap();
        assert_eq!(table.capacity(), 64);
        table.assert_invariants();
        assert_eq!(
            table.rehash(7),
            Err(TableError::CapacityExhausted { capacity: 7 })
        );
        assert_eq!(table.capacity(), 64);
        table.rehash(8).unwrap();
        assert!(table.is_full());
        for i in 0..8u32 {
            assert_eq!(table.get(&format!("k{i}")), Some(&i));
        }
        table.assert_invariants();
    }

    #[test]
    fn debug_shows_slots() {
        let table = tutorial_table();
        let debug = format!("{table:?}");
        assert!(debug.contains("\"Jamie: 5\""), "{debug}");
        assert!(debug.contains("len: 3"), "{debug}");
    }

    #[test]
    fn random_operations_match_model() {
        init_logging();
        let mut rng = SmallRng::seed_from_u64(0xc0ffee);
        for hash_fn in [HashFunction::Summation, HashFunction::Polynomial] {
            for capacity in [1usize, 7, 31] {
                let mut table = ProbingHashTable::new(capacity, hash_fn);
                let mut model = BTreeMap::new();
                for _ in 0..4_000 {
                    let key = rng.random_range(0..48u32).to_string();
                    if rng.random_bool(0.55) {
                        let value = rng.random::<u32>();
                        let is_new = !model.contains_key(&key);
                        match table.put(key.clone(), value) {
                            Ok(true) => {
                                model.insert(key, value);
                            }
                            Ok(false) => unreachable!(),
                            Err(TableError::CapacityExhausted { .. }) => {
                                assert!(is_new && model.len() == capacity);
                            }
                            Err(err) => panic!("unexpected {err}"),
                        }
                    } else {
                        assert_eq!(table.remove(&key), model.remove(&key).is_some());
                    }
                    assert_eq!(table.len(), model.len());
                }
                table.assert_invariants();
                for (key, value) in &model {
                    assert_eq!(table.get(key), Some(value), "{table:?}");
                }
                let present = (0..48u32)
                    .filter(|k| table.contains_key(&k.to_string()))
                    .count();
                assert_eq!(present, table.len());
            }
        }
    }

    #[test]
    fn invariant_holds_after_every_removal() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut table = ProbingHashTable::new(16, HashFunction::Summation);
        // Integer keys in a narrow band pile into long clusters.
        for key in 0..14i64 {
            table.put(key * 16 + rng.random_range(0..3), key).unwrap();
        }
        loop {
            let next = table.keys().next().copied();
            let Some(key) = next else { break };
            assert!(table.remove(&key));
            table.assert_invariants();
        }
        assert!(table.is_empty());
    }

    #[cfg(feature = "stats")]
    #[test]
    fn probe_statistics() {
        let table = tutorial_table();
        assert_eq!(table.probe_histogram().bins(), &[2, 1]);
        let stats = table.stats();
        assert_eq!(stats.occupied_buckets, 3);
        assert_eq!(stats.longest_run, 3);

        let mut wrapped = ProbingHashTable::new(5, HashFunction::Summation);
        for key in [4i64, 9, 14] {
            wrapped.put(key, ()).unwrap();
        }
        assert_eq!(wrapped.stats().longest_run, 3);
        assert_eq!(wrapped.probe_histogram().bins(), &[1, 1, 1]);
    }
}
