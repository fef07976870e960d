//! The two interchangeable hypergraph tallying strategies of `spec.md` §4.3.
//!
//! Both converge on the same per-slot `(count, xorSum)` state, so they are
//! modeled as one enum with two tallying functions rather than two
//! duplicated filter types — the "enum or small strategy interface" that
//! `spec.md` §9 asks for, replacing the teacher's approach of shipping the
//! prefetch variant only (inline in its `bfuse_from_impl!` macro).
//!
//! The sorted variant is not present in the teacher crate at all; it is
//! ported from `3wise_xor_binary_fuse_filter_sorted.h` in the original
//! FastFilter C++ reference, which `spec.md` §4.3(b) describes but the
//! teacher never implemented.

use alloc::vec;
use alloc::vec::Vec;

use crate::addressing::slots_of_hash;
use crate::geometry::Geometry;
use crate::hash::HashFamily;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-slot aggregate tracked during construction (`spec.md` §3).
///
/// `count` is the number of not-yet-peeled keys still referencing this slot;
/// `xor_hash` is the XOR of their hashes. When `count == 1`, `xor_hash` is
/// exactly that one remaining key's hash.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Slot {
    pub count: u32,
    pub xor_hash: u64,
}

/// Selects which hypergraph-tallying strategy [`crate::filter::BinaryFuse3::add_all`]
/// uses. Both strategies produce filters that satisfy the same invariants;
/// they differ only in construction-time memory access pattern.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildStrategy {
    /// Walk keys in input order, prefetching each key `PREFETCH_DISTANCE`
    /// slots ahead of where it is tallied. Runs an eager single pre-pass
    /// peel (`spec.md` §4.4.1) before falling into the general worklist.
    #[default]
    Prefetch,
    /// Hash all keys up front, counting-sort the hashes by their top bits,
    /// then tally in sorted order for better locality on large filters.
    /// Does not run the eager pre-pass (`spec.md` §4.3(b), §9 Open
    /// Questions).
    Sorted,
}

const PREFETCH_DISTANCE: usize = 16;

#[inline(always)]
fn prefetch_hint(slot: &Slot) {
    #[cfg(target_arch = "x86_64")]
    unsafe {
        use core::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};
        _mm_prefetch((slot as *const Slot).cast::<i8>(), _MM_HINT_T0);
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        let _ = slot;
    }
}

#[inline]
fn fold_in(slots: &mut [Slot], hash: u64, geometry: &Geometry) {
    let ids = slots_of_hash(
        hash,
        geometry.segment_length,
        geometry.segment_length_mask,
        geometry.segment_count_length,
    );
    for id in ids {
        let slot = &mut slots[id as usize];
        slot.count += 1;
        slot.xor_hash ^= hash;
    }
}

/// Tallies `keys[start..end]` in input order, prefetching ahead (`spec.md`
/// §4.3(a)).
pub(crate) fn tally_prefetch<H: HashFamily>(
    keys: &[u64],
    start: usize,
    end: usize,
    hasher: &H,
    geometry: &Geometry,
) -> Vec<Slot> {
    let mut slots = vec![Slot::default(); geometry.array_length as usize];

    let prefetch_end = end.saturating_sub(PREFETCH_DISTANCE).max(start);
    let mut i = start;
    while i < prefetch_end {
        let ahead_hash = hasher.hash(keys[i + PREFETCH_DISTANCE]);
        let ahead_ids = slots_of_hash(
            ahead_hash,
            geometry.segment_length,
            geometry.segment_length_mask,
            geometry.segment_count_length,
        );
        for id in ahead_ids {
            prefetch_hint(&slots[id as usize]);
        }

        let hash = hasher.hash(keys[i]);
        fold_in(&mut slots, hash, geometry);
        i += 1;
    }
    for &key in &keys[i..end] {
        let hash = hasher.hash(key);
        fold_in(&mut slots, hash, geometry);
    }

    slots
}

/// Smallest `b` with `2^b >= segment_count`, starting the search at `b = 1`
/// (matching the original C++ reference's `blockBits` loop exactly,
/// including its quirk of never returning 0).
fn block_bits_for(segment_count: u64) -> u32 {
    let mut bits = 1u32;
    while (1u64 << bits) < segment_count {
        bits += 1;
    }
    bits
}

/// Tallies `keys[start..end]` after counting-sorting their hashes by the top
/// `block_bits_for(segment_count)` bits, for better cache locality on large
/// filters (`spec.md` §4.3(b)).
pub(crate) fn tally_sorted<H: HashFamily>(
    keys: &[u64],
    start: usize,
    end: usize,
    hasher: &H,
    geometry: &Geometry,
) -> Vec<Slot> {
    let size = end - start;
    let block_bits = block_bits_for(geometry.segment_count);
    let bucket_count = 1usize << block_bits;

    let mut hashes = Vec::with_capacity(size);
    let mut bucket_of = Vec::with_capacity(size);
    let mut counts = vec![0usize; bucket_count];
    for &key in &keys[start..end] {
        let hash = hasher.hash(key);
        let bucket = (hash >> (64 - block_bits)) as usize;
        hashes.push(hash);
        bucket_of.push(bucket);
        counts[bucket] += 1;
    }

    let mut offsets = vec![0usize; bucket_count];
    let mut running = 0usize;
    for (bucket, count) in counts.iter().enumerate() {
        offsets[bucket] = running;
        running += count;
    }

    let mut sorted = vec![0u64; size];
    let mut cursor = offsets;
    for (hash, bucket) in hashes.into_iter().zip(bucket_of) {
        sorted[cursor[bucket]] = hash;
        cursor[bucket] += 1;
    }

    let mut slots = vec![Slot::default(); geometry.array_length as usize];
    for hash in sorted {
        fold_in(&mut slots, hash, geometry);
    }
    slots
}

#[cfg(test)]
mod test {
    use super::{block_bits_for, tally_prefetch, tally_sorted};
    use crate::geometry::Geometry;
    use crate::hash::{HashFamily, SplitMix64Hash};

    #[test]
    fn block_bits_matches_reference_quirk() {
        assert_eq!(block_bits_for(1), 1);
        assert_eq!(block_bits_for(2), 1);
        assert_eq!(block_bits_for(3), 2);
        assert_eq!(block_bits_for(4), 2);
        assert_eq!(block_bits_for(5), 3);
    }

    #[test]
    fn both_strategies_converge_on_the_same_tallies() {
        let keys: Vec<u64> = (0..5_000u64).map(|i| i.wrapping_mul(0x9E37_79B9)).collect();
        let geometry = Geometry::for_size(keys.len() as u64);
        let hasher = SplitMix64Hash::new();

        let prefetch = tally_prefetch(&keys, 0, keys.len(), &hasher, &geometry);
        let sorted = tally_sorted(&keys, 0, keys.len(), &hasher, &geometry);

        assert_eq!(prefetch.len(), sorted.len());
        for (a, b) in prefetch.iter().zip(sorted.iter()) {
            assert_eq!(a.count, b.count);
            assert_eq!(a.xor_hash, b.xor_hash);
        }
    }
}
