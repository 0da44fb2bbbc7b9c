//! Collection types used across the bottom sheet crates.
//!
//! Maps hash with AHash. [`IndexMap`] keeps insertion order, which the
//! observer registries rely on for deterministic delivery.

pub use ahash::RandomState;

/// Insertion-ordered map hashed with AHash.
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, RandomState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_map_keeps_insertion_order() {
        let mut map: IndexMap<u32, &str> = IndexMap::default();
        map.insert(3, "c");
        map.insert(1, "a");
        map.insert(2, "b");
        map.shift_remove(&1);
        let keys: Vec<u32> = map.keys().copied().collect();
        assert_eq!(keys, vec![3, 2]);
    }
}
