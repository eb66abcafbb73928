use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;

use crate::DefaultHashBuilder;
use crate::extract::Identity;
use crate::hash_table::HashTable;

/// A set of unique values implemented on the linear-probing [`HashTable`].
///
/// `HashSet<T, S>` stores values of type `T` directly in a `HashTable`
/// instantiated with the [`Identity`] extraction policy, so the stored
/// element is its own key. Values implement `Hash + Eq` and are immutable
/// while stored; the hasher builder `S` defaults to
/// [`crate::DefaultHashBuilder`].
///
/// # Examples
///
/// ```rust
/// use probe_hash::HashSet;
///
/// let mut set: HashSet<&str> = HashSet::new();
/// assert!(set.insert("a"));
/// assert!(!set.insert("a"));
/// assert!(set.contains(&"a"));
/// ```
#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: HashTable<T, Identity, S>,
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> HashSet<T, S> {
    /// Creates a new set with the given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::with_hasher(hash_builder),
        }
    }

    /// Creates a new set that can hold at least `capacity` values before
    /// resizing, using the given hasher builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity_and_hasher(capacity, hash_builder),
        }
    }

    /// Returns the number of values in the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// assert_eq!(set.len(), 0);
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of values the set can hold before it resizes.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of buckets in the underlying table. Always a
    /// power of two.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Returns the ratio of values to buckets.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns the load factor below which the set shrinks.
    pub fn min_load_factor(&self) -> f64 {
        self.table.min_load_factor()
    }

    /// Returns the load factor at which the set grows.
    pub fn max_load_factor(&self) -> f64 {
        self.table.max_load_factor()
    }

    /// Returns a reference to the set's hasher builder.
    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    /// Removes all values, retaining the allocated buckets.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Swaps the contents and configuration of `self` and `other`.
    pub fn swap(&mut self, other: &mut Self) {
        self.table.swap(&mut other.table);
    }

    /// Returns an iterator over the values of the set, in an arbitrary
    /// order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator that removes and yields all values.
    ///
    /// The set is empty afterwards, even if the iterator is dropped before
    /// being exhausted.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Adds a value to the set.
    ///
    /// Returns `true` if the value was not already present. Inserting a
    /// value that is already present leaves the stored value in place.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let (_, inserted) = self.table.insert(value);
        inserted
    }

    /// Returns `true` if the set contains the given value.
    pub fn contains(&self, value: &T) -> bool {
        self.table.count(value) != 0
    }

    /// Returns a reference to the stored value equal to the given value.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.table.get(value)
    }

    /// Removes a value from the set. Returns `true` if the value was
    /// present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::new();
    /// set.insert(2);
    /// assert!(set.remove(&2));
    /// assert!(!set.remove(&2));
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        self.table.remove(value).is_some()
    }

    /// Removes and returns the stored value equal to the given value.
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.table.remove(value)
    }

    /// Resizes the underlying table to at least `bucket_count` buckets; see
    /// [`HashTable::rehash`].
    pub fn rehash(&mut self, bucket_count: usize) {
        self.table.rehash(bucket_count);
    }

    /// Resizes so that at least `capacity` values fit without exceeding the
    /// max load factor.
    pub fn reserve(&mut self, capacity: usize) {
        self.table.reserve(capacity);
    }

    /// Sets the load factor below which the set shrinks; see
    /// [`HashTable::set_min_load_factor`].
    pub fn set_min_load_factor(&mut self, min_load: f64) {
        self.table.set_min_load_factor(min_load);
    }

    /// Sets the load factor at which the set grows; see
    /// [`HashTable::set_max_load_factor`].
    pub fn set_max_load_factor(&mut self, max_load: f64) {
        self.table.set_max_load_factor(max_load);
    }
}

impl<T, S> HashSet<T, S>
where
    S: Default,
{
    /// Creates a new set using the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a new set that can hold at least `capacity` values before
    /// resizing, using the default hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<T, S> Default for HashSet<T, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

/// An iterator over the values of a `HashSet`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// A draining iterator over the values of a `HashSet`.
pub struct Drain<'a, T> {
    inner: crate::hash_table::Drain<'a, T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}
impl<T> FusedIterator for Drain<'_, T> {}

/// An owning iterator over the values of a `HashSet`.
pub struct IntoIter<T> {
    inner: crate::hash_table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T, S> IntoIterator for HashSet<T, S> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
