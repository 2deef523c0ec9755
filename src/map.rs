use crate::Mahogany;
use crate::iter::MahoganySortedIterator;

struct MapEntry<K: Ord, V> {
    key: K,
    value: Option<V>,
}

impl<K: Default + Ord, V> Default for MapEntry<K, V> {
    fn default() -> Self {
        Self {
            key: K::default(),
            value: Option::default(),
        }
    }
}

impl<K: Ord, V> PartialEq for MapEntry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Ord, V> Eq for MapEntry<K, V> {}

impl<K: Ord, V> PartialOrd for MapEntry<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V> Ord for MapEntry<K, V> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

/// An associative array, storing key-value pairs in key order.
///
/// Backed by a [`Mahogany`] tree over entries whose ordering is reduced to
/// the key alone, so the tree never compares values. Since the tree rejects
/// duplicates, the first insertion of a key wins; updates go through
/// [`MahoganyMap::get_mut`].
pub struct MahoganyMap<K: Ord, V> {
    tree: Mahogany<MapEntry<K, V>>,
}

impl<K: Default + Ord, V> MahoganyMap<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: Mahogany::new(),
        }
    }

    pub fn contains_key(&self, key: K) -> bool {
        self.tree.contains(&MapEntry { key, value: None })
    }

    /// Inserts the pair if `key` is not yet present. Returns whether the
    /// insertion happened; an already-present key keeps its old value.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.tree.insert(MapEntry {
            key,
            value: Some(value),
        })
    }

    pub fn get(&self, key: K) -> Option<&V> {
        let probe = MapEntry { key, value: None };

        self.tree.get(&probe)?.value.as_ref()
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        let probe = MapEntry { key, value: None };

        self.tree.get_mut(&probe)?.value.as_mut()
    }

    /// Iterates over the pairs in ascending key order.
    pub fn iter(&self) -> MahoganyMapIterator<'_, K, V> {
        MahoganyMapIterator {
            entries: self.tree.iter(),
        }
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }
}

impl<K: Default + Ord, V> Default for MahoganyMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MahoganyMapIterator<'a, K: Ord, V> {
    entries: MahoganySortedIterator<'a, MapEntry<K, V>>,
}

impl<'a, K: Ord, V> Iterator for MahoganyMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.next()?;
        entry.value.as_ref().map(|value| (&entry.key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K: Ord, V> DoubleEndedIterator for MahoganyMapIterator<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let entry = self.entries.next_back()?;
        entry.value.as_ref().map(|value| (&entry.key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::MahoganyMap;

    #[test]
    pub fn map_entry_multi_insertion() {
        let mut map = MahoganyMap::<usize, usize>::new();

        map.insert(3, 17);
        map.insert(2, 12);
        map.insert(1, 7);

        assert!(map.contains_key(2));
        assert!(map.contains_key(1));
        assert!(map.contains_key(3));
        assert_eq!(map.len(), 3);

        assert!(!map.insert(3, 19));
        assert_eq!(*map.get(3).unwrap(), 17);
    }

    #[test]
    pub fn map_update_entry() {
        let mut map = MahoganyMap::<usize, usize>::new();

        map.insert(3, 17);
        *map.get_mut(3).unwrap() = 5;

        assert_eq!(*map.get(3).unwrap(), 5);
    }

    #[test]
    pub fn map_missing_key() {
        let mut map = MahoganyMap::<usize, usize>::new();

        map.insert(1, 10);

        assert!(map.get(2).is_none());
        assert!(map.get_mut(2).is_none());
        assert!(!map.contains_key(2));
    }

    #[test]
    pub fn map_sorted_iteration() {
        let mut map = MahoganyMap::<usize, &str>::new();

        map.insert(30, "thirty");
        map.insert(10, "ten");
        map.insert(20, "twenty");

        let pairs: Vec<(usize, &str)> = map.iter().map(|(&k, &v)| (k, v)).collect();
        assert_eq!(pairs, vec![(10, "ten"), (20, "twenty"), (30, "thirty")]);
    }

    #[test]
    pub fn map_clear() {
        let mut map = MahoganyMap::<usize, usize>::new();

        map.insert(1, 1);
        map.insert(2, 4);
        map.clear();

        assert!(map.is_empty());
        assert!(map.get(1).is_none());

        map.insert(1, 9);
        assert_eq!(*map.get(1).unwrap(), 9);
    }
}
