//! Extraction policies describing how a stored element decomposes into its
//! key and mapped-value parts.
//!
//! The [`HashTable`](crate::hash_table::HashTable) engine is generic over an
//! [`Extract`] policy rather than hard-coding a key-value layout. A set
//! instantiates the engine with [`Identity`], where the element is both its
//! own key and its own value; a map instantiates it with [`Pair`] over
//! `(K, V)` tuples. No other cooperation from the element type is required.

/// Pure key/value accessors over a stored element.
///
/// Implementations must be consistent: for a given element, `key` must always
/// return the same logical key, and the key's hash and equality must not
/// change while the element is stored in a table.
pub trait Extract<E> {
    /// The part of the element used for hashing and equality.
    type Key;
    /// The part of the element exposed as the mapped value.
    type Value;

    /// Borrows the key part of an element.
    fn key(element: &E) -> &Self::Key;

    /// Borrows the value part of an element.
    fn value(element: &E) -> &Self::Value;

    /// Mutably borrows the value part of an element.
    fn value_mut(element: &mut E) -> &mut Self::Value;
}

/// Set policy: an element is both its own key and its own value.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl<T> Extract<T> for Identity {
    type Key = T;
    type Value = T;

    #[inline(always)]
    fn key(element: &T) -> &T {
        element
    }

    #[inline(always)]
    fn value(element: &T) -> &T {
        element
    }

    #[inline(always)]
    fn value_mut(element: &mut T) -> &mut T {
        element
    }
}

/// Map policy: an element is a `(key, value)` pair. The key component is
/// immutable while stored; only the value component is handed out mutably.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pair;

impl<K, V> Extract<(K, V)> for Pair {
    type Key = K;
    type Value = V;

    #[inline(always)]
    fn key(element: &(K, V)) -> &K {
        &element.0
    }

    #[inline(always)]
    fn value(element: &(K, V)) -> &V {
        &element.1
    }

    #[inline(always)]
    fn value_mut(element: &mut (K, V)) -> &mut V {
        &mut element.1
    }
}
