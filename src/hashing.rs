//! Deterministic hashing. The hashing data structures in the standard library are randomly
//! seeded, which would make iteration order (and therefore anything derived from it) differ
//! between runs with the same random seed. The `HashMap` and `HashSet` exported here use
//! `rustc-hash` instead.
//!
//! The `hash_str` free function is used by `crate::random::seeded_rng` to give every named
//! generator its own stream.

use xxhash_rust::xxh3::xxh3_64;

pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

/// A convenience method to compute the hash of a `&str`.
pub fn hash_str(data: &str) -> u64 {
    xxh3_64(data.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_strings() {
        let a = hash_str("hello");
        let b = hash_str("hello");
        let c = hash_str("world");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn hash_set_is_usable_with_default() {
        let mut set: HashSet<usize> = HashSet::default();
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert_eq!(set.len(), 1);
    }
}
