use crate::key::HashKey;

/// Seed of the polynomial hash accumulator.
pub const POLYNOMIAL_SEED: u64 = 5381;

/// Multiplier applied to the accumulator for every character.
pub const POLYNOMIAL_MULTIPLIER: u64 = 33;

#[cfg(feature = "foldhash")]
const FOLD_SEED: u64 = 0x5eed_b0c4_e7ab_1e00;

/// Maps keys to bucket indexes.
///
/// The choice of function is independent of the collision strategy; any
/// variant works with either table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashFunction {
    /// Sum of the character code points of the token. Integer keys are used
    /// as-is. Cheap, but anagrams always collide.
    ///
    /// Because of the integer shortcut, an integer key and its text spelling
    /// share a token but usually not a bucket, so a table may hold both.
    #[default]
    Summation,
    /// `h = h * 33 + c` over the characters of the token, starting from
    /// [`POLYNOMIAL_SEED`].
    Polynomial,
    /// The token hashed by `foldhash` with a fixed seed.
    #[cfg(feature = "foldhash")]
    Folded,
}

impl HashFunction {
    /// Returns the bucket for `key`, whose canonical token is `token`, in a
    /// table of `capacity` buckets. The result is always below `capacity`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bucket_hash::HashFunction;
    ///
    /// assert_eq!(HashFunction::Summation.bucket("Jonathan", "Jonathan", 37), 5);
    /// assert_eq!(HashFunction::Summation.bucket(&42u32, "42", 37), 5);
    /// ```
    pub fn bucket<K: HashKey + ?Sized>(self, key: &K, token: &str, capacity: usize) -> usize {
        debug_assert!(capacity > 0);
        match self {
            HashFunction::Summation => match key.as_integer() {
                Some(n) => n.rem_euclid(capacity as i64) as usize,
                None => summation_hash(token, capacity),
            },
            _ => self.hash_token(token, capacity),
        }
    }

    /// Returns the bucket for a token alone, ignoring any integer fast path.
    pub fn hash_token(self, token: &str, capacity: usize) -> usize {
        match self {
            HashFunction::Summation => summation_hash(token, capacity),
            HashFunction::Polynomial => polynomial_hash(token, capacity),
            #[cfg(feature = "foldhash")]
            HashFunction::Folded => folded_hash(token, capacity),
        }
    }
}

/// Sums the code points of `token` and reduces the sum modulo `capacity`.
///
/// ```rust
/// use bucket_hash::hash_fn::summation_hash;
///
/// assert_eq!(summation_hash("Ygritte", 37), 4);
/// // Anagrams always land together.
/// assert_eq!(summation_hash("listen", 101), summation_hash("silent", 101));
/// ```
pub fn summation_hash(token: &str, capacity: usize) -> usize {
    let sum = token
        .chars()
        .fold(0u64, |acc, c| acc.wrapping_add(u64::from(c)));
    (sum % capacity as u64) as usize
}

/// Polynomial (djb2 style) hash of `token` reduced modulo `capacity`.
///
/// ```rust
/// use bucket_hash::hash_fn::polynomial_hash;
///
/// assert_ne!(polynomial_hash("listen", 101), polynomial_hash("silent", 101));
/// ```
pub fn polynomial_hash(token: &str, capacity: usize) -> usize {
    let hash = token.chars().fold(POLYNOMIAL_SEED, |acc, c| {
        acc.wrapping_mul(POLYNOMIAL_MULTIPLIER)
            .wrapping_add(u64::from(c))
    });
    (hash % capacity as u64) as usize
}

#[cfg(feature = "foldhash")]
fn folded_hash(token: &str, capacity: usize) -> usize {
    use core::hash::BuildHasher;

    let state = foldhash::fast::FixedState::with_seed(FOLD_SEED);
    (state.hash_one(token) % capacity as u64) as usize
}
