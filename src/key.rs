//! Keys and their canonical string tokens.
//!
//! Every table reduces a key to a canonical token before hashing it and
//! compares keys by token only. Two keys with the same token are the same
//! key as far as a table is concerned, even if they have different types:
//! the integer `5` and the text `"5"` share the token `5`.
//!
//! Under [`HashFunction::Summation`](crate::HashFunction::Summation) an
//! integer key skips the token and hashes to its own value, so `5` and
//! `"5"` usually start from different buckets. They only meet, and replace
//! each other, when one lies on the other's probe path or chain.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Display;

/// Token produced for [`Key::Null`].
pub const NULL_TOKEN: &str = "NULL";

/// Token produced for [`Key::Undefined`].
pub const UNDEFINED_TOKEN: &str = "UNDEFINED";

/// A dynamically typed key.
///
/// The `Display` implementation is the canonical form used by
/// [`DefaultCanonicalizer`]:
///
/// ```rust
/// use bucket_hash::Key;
///
/// assert_eq!(Key::Null.to_string(), "NULL");
/// assert_eq!(Key::Undefined.to_string(), "UNDEFINED");
/// assert_eq!(Key::from("Jamie").to_string(), "Jamie");
/// assert_eq!(Key::from(-12).to_string(), "-12");
/// assert_eq!(Key::from(vec![Key::from(1), Key::from("a")]).to_string(), "1,a");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// An explicit null. Rejected by `put`.
    Null,
    /// A key that was never set. Rejected by `put`.
    Undefined,
    /// Text, used verbatim as its token.
    Text(String),
    /// An integer, rendered in decimal.
    Integer(i64),
    /// A boolean, rendered as `true` or `false`.
    Bool(bool),
    /// A composite key, rendered as its items joined by `,`.
    List(Vec<Key>),
}

impl Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Null => f.write_str(NULL_TOKEN),
            Key::Undefined => f.write_str(UNDEFINED_TOKEN),
            Key::Text(text) => f.write_str(text),
            Key::Integer(n) => write!(f, "{n}"),
            Key::Bool(b) => write!(f, "{b}"),
            Key::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    Display::fmt(item, f)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Integer(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Integer(value.into())
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Key::Integer(value.into())
    }
}

impl From<bool> for Key {
    fn from(value: bool) -> Self {
        Key::Bool(value)
    }
}

impl From<Vec<Key>> for Key {
    fn from(value: Vec<Key>) -> Self {
        Key::List(value)
    }
}

impl<T: Into<Key>> From<Option<T>> for Key {
    fn from(value: Option<T>) -> Self {
        value.map_or(Key::Null, Into::into)
    }
}

/// Values standing for "nothing was given".
///
/// `put` refuses to store an unset key or an unset value and reports the
/// write as not performed. Only [`Key::Null`], [`Key::Undefined`] and `None`
/// are unset; every other value of the implementing types is stored as is.
///
/// ```rust
/// use bucket_hash::Key;
/// use bucket_hash::Unset;
///
/// assert!(Key::Null.is_unset());
/// assert!(None::<u32>.is_unset());
/// assert!(!Some(0u32).is_unset());
/// assert!(!"".is_unset());
/// ```
pub trait Unset {
    /// Returns `true` for the unset sentinel.
    fn is_unset(&self) -> bool {
        false
    }
}

impl Unset for Key {
    fn is_unset(&self) -> bool {
        matches!(self, Key::Null | Key::Undefined)
    }
}

impl<T: Unset> Unset for Option<T> {
    fn is_unset(&self) -> bool {
        self.as_ref().is_none_or(Unset::is_unset)
    }
}

impl<T: Unset + ?Sized> Unset for &T {
    fn is_unset(&self) -> bool {
        (**self).is_unset()
    }
}

impl<T: Unset + ?Sized> Unset for &mut T {
    fn is_unset(&self) -> bool {
        (**self).is_unset()
    }
}

impl<T: Unset + ?Sized> Unset for Box<T> {
    fn is_unset(&self) -> bool {
        (**self).is_unset()
    }
}

impl Unset for () {}
impl Unset for str {}
impl Unset for String {}
impl Unset for char {}
impl Unset for bool {}
impl Unset for f32 {}
impl Unset for f64 {}
impl<T> Unset for [T] {}
impl<T> Unset for Vec<T> {}

/// Properties of a key that the tables need beyond its token.
pub trait HashKey: Unset {
    /// Returns the key's integer value when it is natively an integer.
    ///
    /// The summation hash uses this value directly instead of summing the
    /// characters of the token.
    fn as_integer(&self) -> Option<i64> {
        None
    }
}

impl HashKey for Key {
    fn as_integer(&self) -> Option<i64> {
        match self {
            Key::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl HashKey for str {}
impl HashKey for String {}
impl HashKey for char {}
impl HashKey for bool {}

macro_rules! integer_keys {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Unset for $ty {}

            impl HashKey for $ty {
                fn as_integer(&self) -> Option<i64> {
                    i64::try_from(*self).ok()
                }
            }
        )*
    };
}

integer_keys!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl<T: HashKey> HashKey for Option<T> {
    fn as_integer(&self) -> Option<i64> {
        self.as_ref().and_then(HashKey::as_integer)
    }
}

impl<T: HashKey + ?Sized> HashKey for &T {
    fn as_integer(&self) -> Option<i64> {
        (**self).as_integer()
    }
}

/// Strategy turning a key into its canonical token.
///
/// Implementations must be total and deterministic: the same logical key
/// yields the same token for the lifetime of the process. Any
/// `Fn(&K) -> String` closure is a canonicalizer, which is how structured
/// key types without a suitable `Display` are supported:
///
/// ```rust
/// use bucket_hash::Canonicalize;
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let by_coordinates = |p: &Point| format!("{}:{}", p.x, p.y);
/// assert_eq!(by_coordinates.canonicalize(&Point { x: 1, y: 2 }), "1:2");
/// ```
pub trait Canonicalize<K: ?Sized> {
    /// Returns the canonical token for `key`.
    fn canonicalize(&self, key: &K) -> String;
}

/// Canonicalizes any `Display` key through its string rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultCanonicalizer;

impl<K: Display + ?Sized> Canonicalize<K> for DefaultCanonicalizer {
    fn canonicalize(&self, key: &K) -> String {
        key.to_string()
    }
}

impl<K: ?Sized, F> Canonicalize<K> for F
where
    F: Fn(&K) -> String,
{
    fn canonicalize(&self, key: &K) -> String {
        self(key)
    }
}
