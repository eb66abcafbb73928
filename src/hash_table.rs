//! An open-addressing hash table with linear probing and backward-shift
//! deletion.
//!
//! This module contains the table engine shared by [`HashMap`] and
//! [`HashSet`]. All elements live directly in one contiguous slot array;
//! collisions are resolved by scanning forward circularly from an element's
//! home slot. Deletion repairs the probe chain by shifting later cluster
//! members back into the vacated slot, so the table never accumulates
//! tombstones and lookup cost does not degrade under insert/erase churn.
//!
//! [`HashMap`]: crate::hash_map::HashMap
//! [`HashSet`]: crate::hash_set::HashSet

use alloc::boxed::Box;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::extract::Extract;

/// Number of slots in a freshly created table. Also the floor below which
/// automatic shrinking stops, so small tables do not oscillate between
/// capacities under churn.
pub const DEFAULT_BUCKET_COUNT: usize = 16;

const DEFAULT_MIN_LOAD: f64 = 0.3;
const DEFAULT_MAX_LOAD: f64 = 0.7;

#[inline(always)]
fn threshold(bucket_count: usize, load: f64) -> usize {
    (bucket_count as f64 * load) as usize
}

fn empty_slots<E>(bucket_count: usize) -> Box<[Option<E>]> {
    core::iter::repeat_with(|| None).take(bucket_count).collect()
}

/// Decides whether the element at `current` may be relocated into the hole at
/// `hole` during backward-shift deletion.
///
/// The move is legal exactly when `home` does not lie in the cyclic interval
/// `(hole, current]`. Otherwise the element would end up in front of its own
/// probe start and a lookup scanning forward from `home` would hit the hole
/// and stop before reaching it.
#[inline(always)]
fn can_move(hole: usize, current: usize, home: usize, mask: usize) -> bool {
    (current.wrapping_sub(home) & mask) >= (current.wrapping_sub(hole) & mask)
}

/// An open-addressing hash table with linear probing and backward-shift
/// deletion.
///
/// `HashTable<E, X, S>` stores elements of type `E` in a contiguous slot
/// array whose length is always a power of two. Each slot is an
/// owned-or-empty cell; `Some` marks an occupied slot. The extraction policy
/// `X` determines how an element decomposes into its key and value parts,
/// which is the only difference between the set and map instantiations, and
/// the hash builder `S` is fixed per table instance at construction.
///
/// The table automatically doubles its capacity when the live count reaches
/// `bucket_count * max_load_factor` and halves it when the count drops below
/// `bucket_count * min_load_factor` (defaults 0.7 and 0.3), never shrinking
/// below [`DEFAULT_BUCKET_COUNT`] on its own.
///
/// Every resize rehashes all elements, so any exported position (bucket
/// index or borrowed iterator) is invalidated by an operation that resizes.
/// A removal that does not resize still invalidates positions at or after
/// the repaired hole, because backward-shift relocates elements.
///
/// ## Example
///
/// ```rust
/// use probe_hash::DefaultHashBuilder;
/// use probe_hash::extract::Identity;
/// use probe_hash::hash_table::HashTable;
///
/// let mut table: HashTable<u32, Identity, DefaultHashBuilder> = HashTable::new();
///
/// let (index, inserted) = table.insert(7);
/// assert!(inserted);
/// // Inserting an equal key reports the existing position instead of
/// // storing a duplicate.
/// assert_eq!(table.insert(7), (index, false));
/// assert_eq!(table.len(), 1);
///
/// assert_eq!(table.remove(&7), Some(7));
/// assert_eq!(table.remove(&7), None);
/// ```
#[derive(Clone)]
pub struct HashTable<E, X, S> {
    slots: Box<[Option<E>]>,
    len: usize,

    min_load: f64,
    max_load: f64,
    min_len: usize,
    max_len: usize,

    hash_builder: S,
    _extract: PhantomData<X>,
}

impl<E, X, S> Debug for HashTable<E, X, S>
where
    E: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        struct Elements<'a, E>(&'a [Option<E>]);

        impl<E: Debug> Debug for Elements<'_, E> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_set().entries(self.0.iter().flatten()).finish()
            }
        }

        f.debug_struct("HashTable")
            .field("len", &self.len)
            .field("bucket_count", &self.slots.len())
            .field("elements", &Elements(&self.slots))
            .finish()
    }
}

impl<E, X, S> HashTable<E, X, S> {
    /// Creates a new table with the given hash builder and the default
    /// bucket count.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates a new table that can hold at least `capacity` elements before
    /// resizing, using the given hash builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        let mut bucket_count = DEFAULT_BUCKET_COUNT;
        while threshold(bucket_count, DEFAULT_MAX_LOAD) < capacity {
            bucket_count *= 2;
        }

        Self {
            slots: empty_slots(bucket_count),
            len: 0,
            min_load: DEFAULT_MIN_LOAD,
            max_load: DEFAULT_MAX_LOAD,
            min_len: threshold(bucket_count, DEFAULT_MIN_LOAD),
            max_len: threshold(bucket_count, DEFAULT_MAX_LOAD),
            hash_builder,
            _extract: PhantomData,
        }
    }

    /// Returns the number of elements in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the table. Always a power of two.
    pub fn bucket_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of elements the table can hold before it resizes.
    pub fn capacity(&self) -> usize {
        self.max_len
    }

    /// Returns the ratio of live elements to slots.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.slots.len() as f64
    }

    /// Returns the load factor below which the table shrinks.
    pub fn min_load_factor(&self) -> f64 {
        self.min_load
    }

    /// Returns the load factor at which the table grows.
    pub fn max_load_factor(&self) -> f64 {
        self.max_load
    }

    /// Returns a reference to the table's hash builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the element stored in the given bucket, or `None` if the
    /// bucket is out of range or unoccupied.
    ///
    /// Bucket indices are only meaningful until the next structural
    /// mutation; see the type-level documentation.
    pub fn bucket(&self, index: usize) -> Option<&E> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Returns a mutable reference to the element stored in the given
    /// bucket, or `None` if the bucket is out of range or unoccupied.
    ///
    /// The parts of the element that contribute to its key must not be
    /// modified through this reference.
    pub fn bucket_mut(&mut self, index: usize) -> Option<&mut E> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Returns an iterator over the elements of the table.
    ///
    /// Elements are yielded in slot order, which is unrelated to insertion
    /// order and unspecified across resizes.
    pub fn iter(&self) -> Iter<'_, E> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Removes all elements from the table, yielding them by value.
    ///
    /// The table is empty once the iterator is exhausted or dropped; the
    /// allocated slot array is retained.
    pub fn drain(&mut self) -> Drain<'_, E> {
        Drain {
            slots: self.slots.iter_mut(),
            len: &mut self.len,
        }
    }

    /// Removes all elements from the table, retaining the allocated slot
    /// array.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.len = 0;
    }

    /// Swaps the contents and configuration of `self` and `other`.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// Circular successor of `index` in the slot array.
    #[inline(always)]
    fn advance(&self, index: usize) -> usize {
        (index + 1) & self.mask()
    }
}

impl<E, X, S> HashTable<E, X, S>
where
    S: Default,
{
    /// Creates a new table with the default hash builder and bucket count.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a new table that can hold at least `capacity` elements before
    /// resizing, using the default hash builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<E, X, S> Default for HashTable<E, X, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E, X, S> HashTable<E, X, S>
where
    X: Extract<E>,
    X::Key: Hash + Eq,
    S: BuildHasher,
{
    /// Home slot for a key: its hash masked against the power-of-two bucket
    /// count.
    #[inline(always)]
    fn home(&self, key: &X::Key) -> usize {
        (self.hash_builder.hash_one(key) as usize) & self.mask()
    }

    /// Returns the bucket index holding an element with the given key, or
    /// `None` if no such element is present.
    ///
    /// The scan starts at the key's home slot and stops at the first empty
    /// slot, which is correct because deletion keeps every probe chain free
    /// of holes.
    pub fn find(&self, key: &X::Key) -> Option<usize> {
        let mut index = self.home(key);
        while let Some(element) = &self.slots[index] {
            if X::key(element) == key {
                return Some(index);
            }
            index = self.advance(index);
        }
        None
    }

    /// Returns a reference to the element with the given key.
    pub fn get(&self, key: &X::Key) -> Option<&E> {
        let index = self.find(key)?;
        self.slots[index].as_ref()
    }

    /// Returns a mutable reference to the element with the given key.
    ///
    /// The parts of the element that contribute to its key must not be
    /// modified through this reference.
    pub fn get_mut(&mut self, key: &X::Key) -> Option<&mut E> {
        let index = self.find(key)?;
        self.slots[index].as_mut()
    }

    /// Returns the number of elements with the given key: `0` or `1`, since
    /// the table never stores two elements with equal keys.
    pub fn count(&self, key: &X::Key) -> usize {
        usize::from(self.find(key).is_some())
    }

    /// Inserts an element if no element with an equal key is present.
    ///
    /// Returns the bucket index of the stored element and `true` if this
    /// call inserted it, or the index of the previously stored element and
    /// `false` if an equal key was already present. The existing element is
    /// never overwritten.
    ///
    /// If the live count has reached `bucket_count * max_load_factor`, the
    /// table doubles its capacity before the element's placement is decided,
    /// since the resize reshuffles all probe chains. Doubling repeats until
    /// the threshold strictly exceeds the live count, so the load factor
    /// cannot end up above the bound even when the threshold rounds down to
    /// the count itself.
    pub fn insert(&mut self, element: E) -> (usize, bool) {
        while self.len >= self.max_len {
            self.rehash(self.slots.len() * 2);
        }

        if let Some(index) = self.find(X::key(&element)) {
            return (index, false);
        }

        (self.place(element), true)
    }

    /// Removes the element with the given key, returning it if present.
    ///
    /// Removing an absent key is not an error; the table is left untouched
    /// and `None` is returned.
    pub fn remove(&mut self, key: &X::Key) -> Option<E> {
        let index = self.find(key)?;
        self.remove_index(index)
    }

    /// Removes the element at an occupied bucket and repairs the probe
    /// chain.
    pub(crate) fn remove_index(&mut self, index: usize) -> Option<E> {
        let removed = self.slots.get_mut(index)?.take()?;
        self.len -= 1;

        // Backward-shift: walk the cluster after the hole and pull back
        // every element whose home permits it. The first empty slot is the
        // cluster boundary; past it no element still needs to cross the
        // hole.
        let mask = self.mask();
        let mut hole = index;
        let mut current = self.advance(hole);
        loop {
            let home = match &self.slots[current] {
                Some(element) => self.home(X::key(element)),
                None => break,
            };
            if can_move(hole, current, home, mask) {
                self.slots.swap(hole, current);
                hole = current;
            }
            current = self.advance(current);
        }

        if self.len < self.min_len && self.slots.len() > DEFAULT_BUCKET_COUNT {
            self.rehash(self.slots.len() / 2);
        }

        Some(removed)
    }

    /// Resizes the slot array to `bucket_count` slots, rounded up to a
    /// power of two and grown further if needed so the current elements fit
    /// under the max load factor, then re-inserts every element.
    ///
    /// Migration drains the old array through a placement-only path that
    /// cannot itself resize, so every pre-existing element is moved exactly
    /// once. Should a key's hash implementation panic mid-migration, the
    /// not-yet-migrated elements are dropped with the old array and the
    /// table remains structurally valid.
    pub fn rehash(&mut self, bucket_count: usize) {
        let mut target = bucket_count.max(1).next_power_of_two();
        while threshold(target, self.max_load) < self.len {
            target *= 2;
        }

        let old = core::mem::replace(&mut self.slots, empty_slots(target));
        self.len = 0;
        self.min_len = threshold(target, self.min_load);
        self.max_len = threshold(target, self.max_load);

        for element in old.into_vec().into_iter().flatten() {
            self.place(element);
        }
    }

    /// Resizes so that at least `capacity` elements fit without exceeding
    /// the max load factor.
    ///
    /// Like the automatic triggers this goes through [`rehash`], so it may
    /// shrink the table if `capacity` is far below the current size.
    ///
    /// [`rehash`]: HashTable::rehash
    pub fn reserve(&mut self, capacity: usize) {
        let mut bucket_count = 1;
        while threshold(bucket_count, self.max_load) < capacity {
            bucket_count *= 2;
        }
        self.rehash(bucket_count);
    }

    /// Sets the load factor below which the table shrinks, then shrinks
    /// immediately if the new threshold is already violated.
    ///
    /// # Panics
    ///
    /// Panics unless `0 < min_load < max_load_factor()`.
    pub fn set_min_load_factor(&mut self, min_load: f64) {
        assert!(
            min_load > 0.0 && min_load < self.max_load,
            "min load factor must be in (0, max_load_factor)"
        );
        self.min_load = min_load;
        self.min_len = threshold(self.slots.len(), min_load);

        while self.len < self.min_len && self.slots.len() > DEFAULT_BUCKET_COUNT {
            let before = self.slots.len();
            self.rehash(before / 2);
            if self.slots.len() >= before {
                // Halving would put the contents over the max load factor,
                // so rehash grew the target back; no smaller table exists
                // that satisfies both bounds.
                break;
            }
        }
    }

    /// Sets the load factor at which the table grows, then grows
    /// immediately if the new threshold is already violated.
    ///
    /// # Panics
    ///
    /// Panics unless `min_load_factor() < max_load < 1`.
    pub fn set_max_load_factor(&mut self, max_load: f64) {
        assert!(
            max_load > self.min_load && max_load < 1.0,
            "max load factor must be in (min_load_factor, 1)"
        );
        self.max_load = max_load;
        self.max_len = threshold(self.slots.len(), max_load);

        if self.len > self.max_len {
            // rehash grows the target until the current elements fit.
            self.rehash(self.slots.len() * 2);
        }
    }

    /// Stores an element in the first empty slot on its home chain.
    ///
    /// Callers must guarantee no equal key is present and that at least one
    /// slot is empty; both hold whenever the load-factor bounds do.
    fn place(&mut self, element: E) -> usize {
        let mut index = self.home(X::key(&element));
        while self.slots[index].is_some() {
            index = self.advance(index);
        }
        self.slots[index] = Some(element);
        self.len += 1;
        index
    }
}

/// Borrowing iterator over the elements of a [`HashTable`], in slot order.
pub struct Iter<'a, E> {
    slots: core::slice::Iter<'a, Option<E>>,
    remaining: usize,
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        for slot in self.slots.by_ref() {
            if let Some(element) = slot {
                self.remaining -= 1;
                return Some(element);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<E> ExactSizeIterator for Iter<'_, E> {}
impl<E> FusedIterator for Iter<'_, E> {}

impl<'a, E, X, S> IntoIterator for &'a HashTable<E, X, S> {
    type IntoIter = Iter<'a, E>;
    type Item = &'a E;

    fn into_iter(self) -> Iter<'a, E> {
        self.iter()
    }
}

/// Draining iterator over the elements of a [`HashTable`].
///
/// Elements not yet yielded are dropped when the iterator is dropped.
pub struct Drain<'a, E> {
    slots: core::slice::IterMut<'a, Option<E>>,
    len: &'a mut usize,
}

impl<E> Iterator for Drain<'_, E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        for slot in self.slots.by_ref() {
            if let Some(element) = slot.take() {
                *self.len -= 1;
                return Some(element);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (*self.len, Some(*self.len))
    }
}

impl<E> ExactSizeIterator for Drain<'_, E> {}
impl<E> FusedIterator for Drain<'_, E> {}

impl<E> Drop for Drain<'_, E> {
    fn drop(&mut self) {
        for slot in self.slots.by_ref() {
            if slot.take().is_some() {
                *self.len -= 1;
            }
        }
    }
}

/// Owning iterator over the elements of a [`HashTable`].
pub struct IntoIter<E> {
    slots: alloc::vec::IntoIter<Option<E>>,
    remaining: usize,
}

impl<E> Iterator for IntoIter<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        for slot in self.slots.by_ref() {
            if let Some(element) = slot {
                self.remaining -= 1;
                return Some(element);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<E> ExactSizeIterator for IntoIter<E> {}
impl<E> FusedIterator for IntoIter<E> {}

impl<E, X, S> IntoIterator for HashTable<E, X, S> {
    type IntoIter = IntoIter<E>;
    type Item = E;

    fn into_iter(self) -> IntoIter<E> {
        IntoIter {
            remaining: self.len,
            slots: self.slots.into_vec().into_iter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::hash::Hasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::extract::Identity;
    use crate::extract::Pair;

    #[derive(Clone)]
    struct SipHashBuilder {
        k0: u64,
        k1: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> SipHasher {
            SipHasher::new_with_keys(self.k0, self.k1)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            Self {
                k0: OsRng.try_next_u64().unwrap_or(0),
                k1: OsRng.try_next_u64().unwrap_or(0),
            }
        }
    }

    /// Hash builder that maps every key to slot zero, forcing all elements
    /// into one probe cluster.
    #[derive(Clone, Default)]
    struct OneBucket;

    struct ConstHasher;

    impl Hasher for ConstHasher {
        fn finish(&self) -> u64 {
            0
        }

        fn write(&mut self, _bytes: &[u8]) {}
    }

    impl BuildHasher for OneBucket {
        type Hasher = ConstHasher;

        fn build_hasher(&self) -> ConstHasher {
            ConstHasher
        }
    }

    /// Hash builder that uses a `u64` key as its own hash, giving direct
    /// control over home slots.
    #[derive(Clone, Default)]
    struct PassThrough;

    struct PassThroughHasher(u64);

    impl Hasher for PassThroughHasher {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, bytes: &[u8]) {
            for &b in bytes {
                self.0 = (self.0 << 8) | u64::from(b);
            }
        }

        fn write_u64(&mut self, n: u64) {
            self.0 = n;
        }
    }

    impl BuildHasher for PassThrough {
        type Hasher = PassThroughHasher;

        fn build_hasher(&self) -> PassThroughHasher {
            PassThroughHasher(0)
        }
    }

    type SetTable<T> = HashTable<T, Identity, SipHashBuilder>;

    fn check_invariants<E, X, S>(table: &HashTable<E, X, S>)
    where
        X: Extract<E>,
        X::Key: Hash + Eq,
        S: BuildHasher,
    {
        assert!(table.bucket_count().is_power_of_two());
        assert!(table.len() <= table.bucket_count());
        assert_eq!(table.iter().count(), table.len());

        // Every occupied slot must be reachable from its home slot without
        // crossing an empty slot.
        for (index, slot) in table.slots.iter().enumerate() {
            let Some(element) = slot else { continue };
            let mut probe = table.home(X::key(element));
            loop {
                assert!(
                    table.slots[probe].is_some(),
                    "probe chain to slot {index} broken at slot {probe}"
                );
                if probe == index {
                    break;
                }
                probe = table.advance(probe);
            }
        }

        // No two occupied slots may hold equal keys.
        for (i, a) in table.slots.iter().enumerate() {
            let Some(a) = a else { continue };
            for b in table.slots.iter().skip(i + 1).flatten() {
                assert!(X::key(a) != X::key(b), "duplicate key in table");
            }
        }
    }

    #[test]
    fn can_move_matches_interval_oracle() {
        // Enumerate every relative ordering of hole, current, and home
        // modulo a small capacity and compare against the interval
        // definition: the move is legal iff home is not in (hole, current].
        let mask = 15usize;
        for hole in 0..16usize {
            for current in 0..16usize {
                if current == hole {
                    continue;
                }
                for home in 0..16usize {
                    let hole_to_home = home.wrapping_sub(hole) & mask;
                    let hole_to_current = current.wrapping_sub(hole) & mask;
                    let inside = hole_to_home >= 1 && hole_to_home <= hole_to_current;
                    assert_eq!(
                        can_move(hole, current, home, mask),
                        !inside,
                        "hole={hole} current={current} home={home}"
                    );
                }
            }
        }
    }

    #[test]
    fn insert_and_find() {
        let mut table = SetTable::new();
        for k in 0..32u64 {
            let (index, inserted) = table.insert(k);
            assert!(inserted);
            assert_eq!(table.find(&k), Some(index));
        }
        assert_eq!(table.len(), 32);
        check_invariants(&table);

        for k in 0..32u64 {
            assert_eq!(table.get(&k), Some(&k));
            assert_eq!(table.count(&k), 1);
        }
        assert_eq!(table.find(&999), None);
        assert_eq!(table.count(&999), 0);
    }

    #[test]
    fn duplicate_insert_reports_existing_position() {
        let mut table = SetTable::new();
        let (index, inserted) = table.insert(42u64);
        assert!(inserted);

        assert_eq!(table.insert(42), (index, false));
        assert_eq!(table.len(), 1);
        check_invariants(&table);
    }

    #[test]
    fn remove_absent_key_leaves_table_unchanged() {
        let mut table = SetTable::new();
        for k in 0..8u64 {
            table.insert(k);
        }
        let mut before: Vec<u64> = table.iter().copied().collect();
        before.sort_unstable();

        assert_eq!(table.remove(&1000), None);
        assert_eq!(table.len(), 8);
        let mut after: Vec<u64> = table.iter().copied().collect();
        after.sort_unstable();
        assert_eq!(before, after);
        check_invariants(&table);
    }

    #[test]
    fn size_tracks_distinct_inserts_minus_removes() {
        let mut table = SetTable::new();
        for k in 0..20u64 {
            table.insert(k);
        }
        for k in 0..20u64 {
            // Duplicates do not change the size.
            table.insert(k);
        }
        assert_eq!(table.len(), 20);

        for k in (0..20u64).step_by(2) {
            assert_eq!(table.remove(&k), Some(k));
        }
        assert_eq!(table.len(), 10);
        check_invariants(&table);

        for k in 0..20u64 {
            assert_eq!(table.count(&k), usize::from(k % 2 == 1));
        }
    }

    #[test]
    fn growth_happens_at_max_load() {
        // Default 16 buckets at max load 0.7 hold 11 elements; the twelfth
        // insert must double the bucket count.
        let mut table = SetTable::new();
        assert_eq!(table.bucket_count(), 16);

        for k in 0..11u64 {
            table.insert(k);
        }
        assert_eq!(table.bucket_count(), 16);
        assert_eq!(table.len(), 11);

        table.insert(11);
        assert_eq!(table.bucket_count(), 32);
        assert_eq!(table.len(), 12);
        check_invariants(&table);

        for k in 0..12u64 {
            assert!(table.find(&k).is_some());
        }
    }

    #[test]
    fn erase_middle_of_collision_cluster() {
        // Every key homes to slot zero, so 1, 2, 3 form one cluster.
        let mut table: HashTable<u64, Identity, OneBucket> = HashTable::new();
        table.insert(1);
        table.insert(2);
        table.insert(3);
        assert_eq!(table.find(&1), Some(0));
        assert_eq!(table.find(&2), Some(1));
        assert_eq!(table.find(&3), Some(2));

        assert_eq!(table.remove(&2), Some(2));

        // Backward-shift must leave both the earlier and later colliders
        // reachable.
        assert!(table.find(&1).is_some());
        assert!(table.find(&3).is_some());
        assert_eq!(table.len(), 2);
        check_invariants(&table);
    }

    #[test]
    fn collision_cluster_survives_churn() {
        let mut table: HashTable<u64, Identity, OneBucket> = HashTable::new();
        for k in 0..10u64 {
            table.insert(k);
        }
        for k in [0u64, 4, 8, 2, 6] {
            assert_eq!(table.remove(&k), Some(k));
            check_invariants(&table);
        }
        for k in [1u64, 3, 5, 7, 9] {
            assert!(table.find(&k).is_some());
        }
    }

    #[test]
    fn backward_shift_across_array_boundary() {
        let mut table: HashTable<u64, Identity, PassThrough> = HashTable::new();
        table.insert(14);
        table.insert(15);
        // Homes to slot 14 and probes past the end into slot 0.
        table.insert(30);
        assert_eq!(table.find(&30), Some(0));

        assert_eq!(table.remove(&15), Some(15));
        assert_eq!(table.find(&30), Some(15));
        assert!(table.find(&14).is_some());
        check_invariants(&table);
    }

    #[test]
    fn shrink_happens_below_min_load() {
        let mut table = SetTable::new();
        for k in 0..16u64 {
            table.insert(k);
        }
        assert_eq!(table.bucket_count(), 32);

        let mut smallest = table.bucket_count();
        for k in 0..15u64 {
            table.remove(&k);
            smallest = smallest.min(table.bucket_count());
        }

        assert!(smallest < 32, "capacity never halved");
        assert_eq!(table.len(), 1);
        assert!(table.find(&15).is_some());
        check_invariants(&table);
    }

    #[test]
    fn automatic_shrink_stops_at_default_bucket_count() {
        let mut table = SetTable::new();
        for k in 0..16u64 {
            table.insert(k);
        }
        for k in 0..16u64 {
            table.remove(&k);
        }
        assert_eq!(table.bucket_count(), DEFAULT_BUCKET_COUNT);
        assert!(table.is_empty());
    }

    #[test]
    fn rehash_preserves_contents() {
        let mut table = SetTable::new();
        for k in 0..20u64 {
            table.insert(k);
        }

        table.rehash(1024);
        assert_eq!(table.bucket_count(), 1024);
        assert_eq!(table.len(), 20);
        check_invariants(&table);

        // A target too small for the current contents is grown until the
        // elements fit under the max load factor.
        table.rehash(1);
        assert_eq!(table.bucket_count(), 32);
        assert_eq!(table.len(), 20);
        check_invariants(&table);

        for k in 0..20u64 {
            assert!(table.find(&k).is_some());
        }
    }

    #[test]
    fn reserve_avoids_resizing_during_inserts() {
        let mut table = SetTable::new();
        table.reserve(100);
        assert!(table.capacity() >= 100);

        let bucket_count = table.bucket_count();
        for k in 0..100u64 {
            table.insert(k);
        }
        assert_eq!(table.bucket_count(), bucket_count);
        check_invariants(&table);
    }

    #[test]
    fn iteration_yields_each_element_once() {
        let mut table = SetTable::new();
        for k in 0..50u64 {
            table.insert(k);
        }

        let mut seen: Vec<u64> = table.iter().copied().collect();
        assert_eq!(seen.len(), table.len());
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn drain_empties_and_keeps_buckets() {
        let mut table = SetTable::new();
        for k in 0..20u64 {
            table.insert(k);
        }
        let bucket_count = table.bucket_count();

        let mut drained: Vec<u64> = table.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained, (0..20).collect::<Vec<_>>());
        assert!(table.is_empty());
        assert_eq!(table.bucket_count(), bucket_count);

        // Dropping a partly consumed drain clears the remainder.
        for k in 0..20u64 {
            table.insert(k);
        }
        {
            let mut drain = table.drain();
            let _ = drain.next();
            let _ = drain.next();
        }
        assert!(table.is_empty());
    }

    #[test]
    fn clear_keeps_buckets() {
        let mut table = SetTable::new();
        for k in 0..20u64 {
            table.insert(k);
        }
        let bucket_count = table.bucket_count();

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.bucket_count(), bucket_count);
        assert_eq!(table.find(&3), None);
    }

    #[test]
    fn swap_exchanges_contents() {
        let mut a = SetTable::new();
        let mut b = SetTable::new();
        a.insert(1u64);
        b.insert(2u64);
        b.insert(3u64);

        a.swap(&mut b);
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);
        assert!(a.find(&2).is_some());
        assert!(b.find(&1).is_some());
    }

    #[test]
    fn raising_min_load_factor_shrinks_immediately() {
        let mut table = SetTable::new();
        for k in 0..12u64 {
            table.insert(k);
        }
        table.rehash(64);
        assert_eq!(table.bucket_count(), 64);

        table.set_min_load_factor(0.4);
        assert_eq!(table.bucket_count(), 32);
        assert_eq!(table.len(), 12);
        check_invariants(&table);
    }

    #[test]
    fn lowering_max_load_factor_grows_immediately() {
        let mut table = SetTable::new();
        for k in 0..30u64 {
            table.insert(k);
        }
        assert_eq!(table.bucket_count(), 64);

        table.set_max_load_factor(0.45);
        assert_eq!(table.bucket_count(), 128);
        assert_eq!(table.len(), 30);
        check_invariants(&table);
    }

    #[test]
    fn growth_keeps_tiny_max_load_factor_satisfied() {
        // With max_load 0.03 the growth threshold rounds down hard; at 32
        // buckets it is zero and at 128 it equals a small live count
        // exactly. Growth must still fire whenever the count reaches the
        // threshold, or the table wedges at a fixed capacity and the load
        // factor climbs without bound.
        let mut table = SetTable::new();
        table.set_min_load_factor(0.01);
        table.set_max_load_factor(0.03);

        for k in 0..8u64 {
            table.insert(k);
            assert!(
                table.load_factor() <= table.max_load_factor(),
                "load_factor {} exceeds max_load_factor {} at bucket_count {}",
                table.load_factor(),
                table.max_load_factor(),
                table.bucket_count()
            );
            check_invariants(&table);
        }

        for k in 0..8u64 {
            assert!(table.find(&k).is_some());
        }
    }

    #[test]
    #[should_panic(expected = "min load factor")]
    fn min_load_factor_must_stay_below_max() {
        let mut table = SetTable::<u64>::new();
        table.set_min_load_factor(0.7);
    }

    #[test]
    #[should_panic(expected = "max load factor")]
    fn max_load_factor_must_stay_below_one() {
        let mut table = SetTable::<u64>::new();
        table.set_max_load_factor(1.0);
    }

    #[test]
    fn pair_extraction_backs_a_map() {
        let mut table: HashTable<(u64, i32), Pair, SipHashBuilder> = HashTable::new();
        for k in 0..10u64 {
            table.insert((k, k as i32 * 2));
        }

        assert_eq!(table.get(&3), Some(&(3, 6)));
        if let Some(element) = table.get_mut(&3) {
            *Pair::value_mut(element) += 1;
        }
        assert_eq!(table.get(&3), Some(&(3, 7)));
        assert_eq!(table.remove(&3), Some((3, 7)));
        check_invariants(&table);
    }

    #[cfg(feature = "std")]
    #[test]
    fn randomized_ops_match_std_hashmap() {
        use rand::Rng;
        use rand::SeedableRng;
        use rand::rngs::SmallRng;

        let mut rng = SmallRng::seed_from_u64(0x9e3779b97f4a7c15);
        let mut table: HashTable<(u64, u64), Pair, SipHashBuilder> = HashTable::new();
        let mut model = std::collections::HashMap::new();

        for round in 0..10_000u64 {
            let key = rng.random_range(0..512u64);
            match rng.random_range(0..3u8) {
                0 => {
                    let (_, inserted) = table.insert((key, round));
                    let absent = !model.contains_key(&key);
                    assert_eq!(inserted, absent);
                    if absent {
                        model.insert(key, round);
                    }
                }
                1 => {
                    assert_eq!(table.remove(&key).map(|(_, v)| v), model.remove(&key));
                }
                _ => {
                    assert_eq!(table.get(&key).map(|(_, v)| *v), model.get(&key).copied());
                }
            }
            assert_eq!(table.len(), model.len());
        }

        check_invariants(&table);
        for (key, value) in &model {
            assert_eq!(table.get(key), Some(&(*key, *value)));
        }
    }

    #[test]
    fn into_iter_consumes_all_elements() {
        let mut table = SetTable::new();
        for k in 0..12u64 {
            table.insert(k);
        }

        let mut collected: Vec<u64> = table.into_iter().collect();
        collected.sort_unstable();
        assert_eq!(collected, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn clone_is_independent() {
        let mut table = SetTable::new();
        for k in 0..10u64 {
            table.insert(k);
        }

        let mut cloned = table.clone();
        cloned.remove(&3);
        assert!(table.find(&3).is_some());
        assert_eq!(cloned.len(), 9);
        check_invariants(&cloned);
    }
}
