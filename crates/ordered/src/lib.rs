//! An array-backed collection kept sorted by a projected key.
//!
//! ```
//! use ordered::OrderedIndex;
//!
//! let mut index = OrderedIndex::by_key(|(key, _): &(u32, char)| *key);
//! index.set((2, 'b'));
//! index.set((1, 'a'));
//! index.set((2, 'c'));
//!
//! let entries: Vec<_> = index.entries().copied().collect();
//! assert_eq!(entries, [(1, 'a'), (2, 'c')]);
//! ```

use std::{cmp::Ordering, fmt, marker::PhantomData, mem, slice};

pub struct OrderedIndex<K, V, F = fn(&V) -> K, C = fn(&K, &K) -> Ordering> {
    items: Vec<V>,
    key: F,
    compare: C,
    marker: PhantomData<fn() -> K>,
}

impl<K: Ord, V> OrderedIndex<K, V> {
    /// Creates an index ordered by the natural ordering of `K`.
    pub fn by_key(key: fn(&V) -> K) -> OrderedIndex<K, V> {
        let compare: fn(&K, &K) -> Ordering = Ord::cmp;
        OrderedIndex::new(key, compare)
    }
}

impl<K, V, F, C> OrderedIndex<K, V, F, C>
where
    F: Fn(&V) -> K,
    C: Fn(&K, &K) -> Ordering,
{
    pub fn new(key: F, compare: C) -> OrderedIndex<K, V, F, C> {
        let items = vec![];
        OrderedIndex { items, key, compare, marker: PhantomData }
    }

    fn search(&self, key: &K) -> Result<usize, usize> {
        self.items.binary_search_by(|item| (self.compare)(&(self.key)(item), key))
    }

    /// Inserts `value` at its sorted position.
    ///
    /// An existing item with an equal key is overwritten in place and returned.
    pub fn set(&mut self, value: V) -> Option<V> {
        let key = (self.key)(&value);
        match self.search(&key) {
            Ok(index) => Some(mem::replace(&mut self.items[index], value)),
            Err(index) => {
                self.items.insert(index, value);
                None
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let index = self.search(key).ok()?;
        Some(&self.items[index])
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_ok()
    }

    /// Removes the item with an equal key; absent keys are ignored.
    pub fn remove_by_key(&mut self, key: &K) -> Option<V> {
        let index = self.search(key).ok()?;
        Some(self.items.remove(index))
    }

    /// Removes the item whose projected key equals that of `value`.
    pub fn remove_by_value(&mut self, value: &V) -> Option<V> {
        let key = (self.key)(value);
        self.remove_by_key(&key)
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over items in comparer order. Each call starts from the front.
    pub fn entries(&self) -> slice::Iter<'_, V> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<K, V: fmt::Debug, F, C> fmt::Debug for OrderedIndex<K, V, F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}
