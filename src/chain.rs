//! A minimal singly-linked list used as the per-bucket chain of
//! [`ChainedHashTable`](crate::ChainedHashTable).

use alloc::boxed::Box;
use core::fmt;
use core::fmt::Debug;
use core::fmt::Display;

struct Node<T> {
    value: T,
    next: Option<Box<Node<T>>>,
}

/// A singly-linked list with append-only insertion order.
///
/// # Examples
///
/// ```rust
/// use bucket_hash::Chain;
///
/// let mut chain = Chain::new();
/// chain.push_back(1);
/// chain.push_back(2);
/// chain.push_back(3);
///
/// assert_eq!(chain.head(), Some(&1));
/// assert_eq!(chain.remove_first(|&v| v == 2), Some(2));
/// assert_eq!(chain.iter().copied().collect::<Vec<_>>(), [1, 3]);
/// assert_eq!(chain.to_string(), "1,3");
/// ```
pub struct Chain<T> {
    head: Option<Box<Node<T>>>,
    len: usize,
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Chain<T> {
    /// Creates an empty chain.
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Number of items in the chain.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the chain holds no items.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// The first item, if any.
    pub fn head(&self) -> Option<&T> {
        self.head.as_deref().map(|node| &node.value)
    }

    /// Appends `value` after the last item.
    pub fn push_back(&mut self, value: T) {
        let mut cursor = &mut self.head;
        while let Some(node) = cursor {
            cursor = &mut node.next;
        }
        *cursor = Some(Box::new(Node { value, next: None }));
        self.len += 1;
    }

    /// Detaches and returns the first item.
    pub fn pop_front(&mut self) -> Option<T> {
        let node = self.head.take()?;
        let Node { value, next } = *node;
        self.head = next;
        self.len -= 1;
        Some(value)
    }

    /// Unlinks the first item matching `pred` and returns it. The order of
    /// the remaining items is unchanged.
    pub fn remove_first(&mut self, pred: impl Fn(&T) -> bool) -> Option<T> {
        let mut cursor = &mut self.head;
        while cursor.as_ref().is_some_and(|node| !pred(&node.value)) {
            cursor = &mut cursor.as_mut()?.next;
        }

        let node = cursor.take()?;
        let Node { value, next } = *node;
        *cursor = next;
        self.len -= 1;
        Some(value)
    }

    /// Returns the first item matching `pred`.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<&T> {
        self.iter().find(|value| pred(value))
    }

    /// Returns the first item matching `pred`, mutably.
    pub fn find_mut(&mut self, pred: impl Fn(&T) -> bool) -> Option<&mut T> {
        self.iter_mut().find(|value| pred(value))
    }

    /// Forward traversal from the head.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
            remaining: self.len,
        }
    }

    /// Forward traversal from the head with mutable access.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            next: self.head.as_deref_mut(),
            remaining: self.len,
        }
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        let mut next = self.head.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
        self.len = 0;
    }
}

impl<T> Drop for Chain<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Clone> Clone for Chain<T> {
    fn clone(&self) -> Self {
        let mut chain = Chain::new();
        for value in self.iter() {
            chain.push_back(value.clone());
        }
        chain
    }
}

impl<T: Debug> Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Renders the items in order, separated by `,`.
impl<T: Display> Display for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            Display::fmt(value, f)?;
        }
        Ok(())
    }
}

/// Borrowing iterator over a [`Chain`].
pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Mutably borrowing iterator over a [`Chain`].
pub struct IterMut<'a, T> {
    next: Option<&'a mut Node<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next.take()?;
        self.next = node.next.as_deref_mut();
        self.remaining -= 1;
        Some(&mut node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

/// Owning iterator over a [`Chain`].
pub struct IntoIter<T> {
    chain: Chain<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.chain.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.chain.len, Some(self.chain.len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for Chain<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { chain: self }
    }
}

impl<'a, T> IntoIterator for &'a Chain<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
