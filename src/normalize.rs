//! Catalog Row Normalization
//!
//! Catalog sources are denormalized, so the same descriptive tuple can show
//! up many times. Uniqueness and final ordering are both driven by a
//! structured tuple key, not by joining fields with a separator, so a
//! separator character inside a field value can never merge two entries.

use std::collections::HashSet;
use std::hash::Hash;

/// A catalog row with a composite identity key. Field order inside the key
/// is the sort order: primary field first, ties broken by the rest, numeric
/// fields compared numerically.
pub trait CatalogKey {
    type Key: Ord + Hash;

    fn key(&self) -> Self::Key;
}

/// Collapse duplicate tuples (first occurrence wins) and sort ascending by
/// the full key. Pure and idempotent: re-running on its own output is a
/// no-op, and ordering does not depend on row arrival order.
pub fn dedupe_sorted<T: CatalogKey>(rows: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut unique: Vec<T> = rows
        .into_iter()
        .filter(|row| seen.insert(row.key()))
        .collect();
    unique.sort_by(|a, b| a.key().cmp(&b.key()));
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        name: String,
        year: i32,
    }

    impl CatalogKey for Entry {
        type Key = (String, i32);

        fn key(&self) -> Self::Key {
            (self.name.clone(), self.year)
        }
    }

    fn entry(name: &str, year: i32) -> Entry {
        Entry { name: name.to_string(), year }
    }

    #[test]
    fn test_duplicates_collapse_to_one() {
        let rows = vec![entry("PASTO", 2024), entry("PASTO", 2024), entry("PASTO", 2024)];
        assert_eq!(dedupe_sorted(rows).len(), 1);
    }

    #[test]
    fn test_output_sorted_by_key_numeric_tiebreak() {
        let rows = vec![
            entry("TUMACO", 2023),
            entry("PASTO", 2024),
            entry("PASTO", 2019),
            entry("IPIALES", 2024),
        ];
        let out = dedupe_sorted(rows);
        assert_eq!(
            out,
            vec![
                entry("IPIALES", 2024),
                entry("PASTO", 2019),
                entry("PASTO", 2024),
                entry("TUMACO", 2023),
            ]
        );
    }

    #[test]
    fn test_idempotent_and_arrival_order_independent() {
        let forward = vec![entry("A", 1), entry("B", 2), entry("A", 1), entry("C", 3)];
        let mut backward = forward.clone();
        backward.reverse();

        let once = dedupe_sorted(forward);
        let twice = dedupe_sorted(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once, dedupe_sorted(backward));
    }
}
