//! Hashing used for node key fingerprints. `std-hash` swaps `ahash` for the
//! std `DefaultHasher`.

use std::hash::{Hash, Hasher};

#[cfg(feature = "std-hash")]
type KeyHasher = std::collections::hash_map::DefaultHasher;

#[cfg(not(feature = "std-hash"))]
type KeyHasher = ahash::AHasher;

/// Hashes `value` with the active key hasher.
///
/// Stable within one process only; never persist the result.
#[inline]
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = KeyHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_keys_share_a_fingerprint() {
        assert_eq!(hash_one("row-1"), hash_one("row-1"));
        assert_ne!(hash_one("row-1"), hash_one("row-2"));
        assert_eq!(hash_one("row-1"), hash_one(&String::from("row-1")));
    }
}
