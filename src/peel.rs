//! The peeling engine (`spec.md` §4.4, §4.4.1).
//!
//! Produces the reverse-order stack of `(hash, pivot)` pairs that
//! [`crate::assign`] later walks to fill in the fingerprint table. Shared by
//! both [`crate::strategy::BuildStrategy`] variants; only the optional eager
//! pre-pass differs between them (`spec.md` §9 Open Questions).

use alloc::vec::Vec;

use crate::addressing::slots_of_hash;
use crate::geometry::Geometry;
use crate::strategy::Slot;

/// Runs the peeling algorithm over `slots`, mutating it in place.
///
/// Returns the peeled keys as parallel `(hash, pivot)` stacks, in peel
/// order (the *first* peeled key is at index 0). A completed peel is one
/// where `reverse_order.len() == n`; the caller checks that.
///
/// `eager_prepass` runs one linear scan that peels every slot already at
/// `count == 1` before the worklist loop starts (`spec.md` §4.4.1). It is
/// semantically a subset of the worklist algorithm: anything it peels, the
/// worklist loop would also have peeled, just not necessarily in the same
/// order. This is why both [`crate::strategy::BuildStrategy`] variants
/// satisfy determinism-up-to-strategy (`spec.md` P5) even though only one
/// of them runs it.
pub(crate) fn peel(
    slots: &mut [Slot],
    geometry: &Geometry,
    eager_prepass: bool,
) -> (Vec<u64>, Vec<u8>) {
    let array_length = slots.len();
    let mut reverse_order = Vec::new();
    let mut reverse_h = Vec::new();

    if eager_prepass {
        for idx in 0..array_length {
            if slots[idx].count != 1 {
                continue;
            }
            let hash = slots[idx].xor_hash;
            let ids = slots_of_hash(
                hash,
                geometry.segment_length,
                geometry.segment_length_mask,
                geometry.segment_count_length,
            );
            let mut pivot = 0u8;
            for (hi, &s) in ids.iter().enumerate() {
                let s = s as usize;
                slots[s].count -= 1;
                slots[s].xor_hash ^= hash;
                if s == idx {
                    pivot = hi as u8;
                }
            }
            reverse_order.push(hash);
            reverse_h.push(pivot);
        }
    }

    let mut alone: Vec<u32> = (0..array_length as u32)
        .filter(|&i| slots[i as usize].count == 1)
        .collect();

    while let Some(idx) = alone.pop() {
        let idx = idx as usize;
        if slots[idx].count != 1 {
            // Stale worklist entry: this slot was already peeled (or its
            // count changed again) since it was pushed.
            continue;
        }
        let hash = slots[idx].xor_hash;
        let ids = slots_of_hash(
            hash,
            geometry.segment_length,
            geometry.segment_length_mask,
            geometry.segment_count_length,
        );
        let mut pivot = 0u8;
        for (hi, &s) in ids.iter().enumerate() {
            let s = s as usize;
            if s == idx {
                pivot = hi as u8;
                continue;
            }
            if slots[s].count == 2 {
                alone.push(s as u32);
            }
            slots[s].count -= 1;
            slots[s].xor_hash ^= hash;
        }
        reverse_order.push(hash);
        reverse_h.push(pivot);
    }

    (reverse_order, reverse_h)
}
