//! Hash collections used across MyGame.
//!
//! Re-exports of the AHash-backed map and set so every crate hashes the same way.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert("library", "mygame");
        assert_eq!(map.get("library"), Some(&"mygame"));
    }

    #[test]
    fn test_hashset_ahash() {
        let mut set = HashSet::new();
        set.insert(5);
        assert!(set.contains(&5));
        assert!(!set.insert(5));
    }
}
