//! Fingerprint assignment (`spec.md` §4.6).
//!
//! Walks the peeled stack in reverse — insertion order, the inverse of peel
//! order — writing each key's pivot slot so the three-way XOR equation
//! holds. By the time a pivot is assigned, no later-assigned key ever
//! touches it again, so this is a single linear pass with no rework.

use crate::addressing::slots_of_hash;
use crate::fingerprint::Fingerprint;
use crate::geometry::Geometry;

pub(crate) fn assign_fingerprints<F: Fingerprint>(
    fingerprints: &mut [F],
    reverse_order: &[u64],
    reverse_h: &[u8],
    geometry: &Geometry,
) {
    for i in (0..reverse_order.len()).rev() {
        let hash = reverse_order[i];
        let pivot = reverse_h[i] as usize;
        let ids = slots_of_hash(
            hash,
            geometry.segment_length,
            geometry.segment_length_mask,
            geometry.segment_count_length,
        );

        let mut value = F::truncate(hash);
        for (hi, &s) in ids.iter().enumerate() {
            if hi != pivot {
                value = value ^ fingerprints[s as usize];
            }
        }
        fingerprints[ids[pivot] as usize] = value;
    }
}

#[cfg(test)]
mod test {
    use super::assign_fingerprints;
    use crate::geometry::Geometry;
    use crate::hash::{HashFamily, SplitMix64Hash};
    use crate::peel::peel;
    use crate::strategy::tally_prefetch;

    #[test]
    fn fingerprint_equation_holds_for_every_key() {
        let keys: Vec<u64> = (0..5_000u64).map(|i| i.wrapping_mul(0x9E37_79B9)).collect();
        let geometry = Geometry::for_size(keys.len() as u64);
        let hasher = SplitMix64Hash::new();

        let mut slots = tally_prefetch(&keys, 0, keys.len(), &hasher, &geometry);
        let (order, pivots) = peel(&mut slots, &geometry, true);
        assert_eq!(order.len(), keys.len());

        let mut fingerprints = alloc::vec![0u8; geometry.array_length as usize].into_boxed_slice();
        assign_fingerprints(&mut fingerprints, &order, &pivots, &geometry);

        for &key in &keys {
            let hash = hasher.hash(key);
            let expected = hash as u8;
            let ids = crate::addressing::slots_of_hash(
                hash,
                geometry.segment_length,
                geometry.segment_length_mask,
                geometry.segment_count_length,
            );
            let got = fingerprints[ids[0] as usize]
                ^ fingerprints[ids[1] as usize]
                ^ fingerprints[ids[2] as usize];
            assert_eq!(got, expected, "key {key} must satisfy the xor equation");
        }
    }
}
