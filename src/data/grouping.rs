// ============================================================
// Layer 4 - Near-Duplicate Grouping
// ============================================================
// Groups images whose perceptual hashes are close.
//
// Comparing every pair is O(n^2). To cut that down, images are
// first bucketed by the top `prefix_bits` bits of their hash
// and only compared within a bucket. Near duplicates that
// differ inside the prefix land in different buckets and are
// missed; that is the price of the speed-up, and prefix_bits
// trades one against the other.
//
// Inside a bucket the grouping is greedy and order-dependent:
//   for each image not yet grouped:
//     start a group with it
//     add every later ungrouped image within `threshold` bits
//   keep the group only if it has 2+ members
//
// Buckets are visited in key order and items keep the order
// they were given in, so results are reproducible.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::hash::PerceptualHash;

pub type HashedImage = (PathBuf, PerceptualHash);

/// Bucket hashes by their top `prefix_bits` bits.
pub fn bucket_hashes(hashes: Vec<HashedImage>, prefix_bits: u32) -> BTreeMap<u64, Vec<HashedImage>> {
    let mut buckets: BTreeMap<u64, Vec<HashedImage>> = BTreeMap::new();
    for (path, hash) in hashes {
        buckets.entry(hash.prefix(prefix_bits)).or_default().push((path, hash));
    }
    buckets
}

/// Greedy grouping within one bucket.
pub fn group_similar_in_bucket(items: &[HashedImage], threshold: u32) -> Vec<Vec<PathBuf>> {
    let mut groups = Vec::new();
    let mut used   = vec![false; items.len()];

    for i in 0..items.len() {
        if used[i] {
            continue;
        }
        used[i] = true;

        let (path, hash) = &items[i];
        let mut group    = vec![path.clone()];

        for j in (i + 1)..items.len() {
            if !used[j] && hash.distance(&items[j].1) <= threshold {
                used[j] = true;
                group.push(items[j].0.clone());
            }
        }

        if group.len() > 1 {
            groups.push(group);
        }
    }

    groups
}

/// Group across all buckets.
pub fn group_similar(buckets: &BTreeMap<u64, Vec<HashedImage>>, threshold: u32) -> Vec<Vec<PathBuf>> {
    buckets
        .values()
        .flat_map(|items| group_similar_in_bucket(items, threshold))
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, hash: u64) -> HashedImage {
        (PathBuf::from(name), PerceptualHash(hash))
    }

    #[test]
    fn test_bucketing_by_prefix() {
        let buckets = bucket_hashes(
            vec![
                item("a", 0xF000_0000_0000_0000),
                item("b", 0xF000_0000_0000_00FF),
                item("c", 0x0000_0000_0000_0000),
            ],
            4,
        );
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[&0xF].len(), 2);
        assert_eq!(buckets[&0x0].len(), 1);
    }

    #[test]
    fn test_singletons_are_not_groups() {
        let items = vec![item("a", 0), item("b", u64::MAX)];
        assert!(group_similar_in_bucket(&items, 5).is_empty());
    }

    #[test]
    fn test_greedy_grouping() {
        let items = vec![
            item("a", 0b0000),
            item("b", 0b0001),  // 1 bit from a
            item("c", 0b0111),  // 3 bits from a
            item("d", 0b0110),  // 1 bit from c, but 2 from a
        ];
        let groups = group_similar_in_bucket(&items, 2);

        // a claims b and d; c is left alone
        assert_eq!(groups, vec![vec![
            PathBuf::from("a"),
            PathBuf::from("b"),
            PathBuf::from("d"),
        ]]);
    }

    #[test]
    fn test_group_across_buckets() {
        let buckets = bucket_hashes(
            vec![
                item("a", 0xF000_0000_0000_0000),
                item("b", 0xF000_0000_0000_0001),
                item("c", 0x1000_0000_0000_0000),
                item("d", 0x1000_0000_0000_0003),
            ],
            4,
        );
        let groups = group_similar(&buckets, 2);
        assert_eq!(groups.len(), 2);
        // Lower bucket key comes first
        assert_eq!(groups[0][0], PathBuf::from("c"));
    }
}
