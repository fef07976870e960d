//! The filter itself: geometry + retry driver + public API (`spec.md` §4.5, §6).

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::addressing::slots_of_hash;
use crate::assign::assign_fingerprints;
use crate::fingerprint::Fingerprint;
use crate::geometry::Geometry;
use crate::hash::{HashFamily, SplitMix64Hash};
use crate::peel::peel;
use crate::status::Status;
use crate::strategy::{tally_prefetch, tally_sorted, BuildStrategy};

/// Upper bound on construction retries before giving up (`spec.md` §4.5).
/// Exceeding this is treated as "impossible input" — astronomically
/// unlikely if the geometry tables in [`crate::geometry`] are honored.
const MAX_BUILD_ATTEMPTS: u32 = 100;

/// A 3-wise binary fuse filter over 8-bit fingerprints (≈9 bits/key, <0.4%
/// false-positive rate).
pub type BinaryFuse8 = BinaryFuse3<u8, SplitMix64Hash>;

/// A 3-wise binary fuse filter over 16-bit fingerprints (≈18 bits/key,
/// <0.002% false-positive rate).
pub type BinaryFuse16 = BinaryFuse3<u16, SplitMix64Hash>;

/// A 3-wise binary fuse filter over 32-bit fingerprints (≈36 bits/key,
/// negligible false-positive rate).
pub type BinaryFuse32 = BinaryFuse3<u32, SplitMix64Hash>;

/// A static, space-efficient approximate-membership filter over 64-bit keys.
///
/// `BinaryFuse3` answers membership queries with no false negatives for any
/// key present when [`add_all`](Self::add_all) last succeeded, and a
/// false-positive rate bounded by `2^-bits(F)` (plus a small constant
/// factor). It is built once via [`new`](Self::new) +
/// [`add_all`](Self::add_all) and is immutable and safe to share across
/// threads afterward — there is no interior mutability and no way to modify
/// it in place once built (`spec.md` §5, Non-goals: no dynamic
/// insertion/deletion, no concurrent modification).
///
/// ```
/// use binary_fuse_filter::{BinaryFuse8, Status};
///
/// let keys: Vec<u64> = (0..1_000u64).map(|k| k * 7 + 3).collect();
/// let mut filter = BinaryFuse8::new(keys.len() as u64);
/// assert_eq!(filter.add_all(&keys, 0, keys.len()), Status::Ok);
///
/// for &key in &keys {
///     assert_eq!(filter.contains(key), Status::Ok);
/// }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "F: serde::Serialize, H: serde::Serialize",
        deserialize = "F: serde::Deserialize<'de>, H: serde::Deserialize<'de>"
    ))
)]
#[derive(Debug, Clone)]
pub struct BinaryFuse3<F: Fingerprint, H: HashFamily = SplitMix64Hash> {
    size: u64,
    segment_length: u64,
    segment_length_mask: u64,
    segment_count: u64,
    segment_count_length: u64,
    array_length: u64,
    fingerprints: Box<[F]>,
    hasher: H,
    strategy: BuildStrategy,
}

#[cfg(feature = "uniform-random")]
fn make_fingerprint_block<F: Fingerprint>(len: usize) -> Box<[F]> {
    (0..len).map(|_| F::random()).collect()
}

#[cfg(not(feature = "uniform-random"))]
fn make_fingerprint_block<F: Fingerprint>(len: usize) -> Box<[F]> {
    vec![F::default(); len].into_boxed_slice()
}

impl<F: Fingerprint, H: HashFamily> BinaryFuse3<F, H> {
    /// Allocates geometry and a zero- (or uniform-randomly-) initialized
    /// fingerprint table sized for `n` keys, using the default
    /// [`BuildStrategy::Prefetch`] strategy. Call [`add_all`](Self::add_all)
    /// to populate it.
    #[must_use]
    pub fn new(n: u64) -> Self {
        Self::with_strategy(n, BuildStrategy::default())
    }

    /// Like [`new`](Self::new), but selects the hypergraph-tallying
    /// strategy explicitly (`spec.md` §4.3).
    #[must_use]
    pub fn with_strategy(n: u64, strategy: BuildStrategy) -> Self {
        let geometry = Geometry::for_size(n);
        let fingerprints = make_fingerprint_block::<F>(geometry.array_length as usize);
        Self {
            size: n,
            segment_length: geometry.segment_length,
            segment_length_mask: geometry.segment_length_mask,
            segment_count: geometry.segment_count,
            segment_count_length: geometry.segment_count_length,
            array_length: geometry.array_length,
            fingerprints,
            hasher: H::new(),
            strategy,
        }
    }

    fn geometry(&self) -> Geometry {
        Geometry {
            segment_length: self.segment_length,
            segment_length_mask: self.segment_length_mask,
            segment_count: self.segment_count,
            segment_count_length: self.segment_count_length,
            array_length: self.array_length,
        }
    }

    /// Builds the filter from `keys[start..end]`.
    ///
    /// `keys` must contain distinct values (debug builds assert this; see
    /// `spec.md` §7). `end - start` should equal the `n` passed to
    /// [`new`](Self::new) — the table was sized for that count.
    ///
    /// Runs the peeling algorithm, reseeding the hash family and retrying on
    /// failure, up to [`MAX_BUILD_ATTEMPTS`] times. Returns
    /// [`Status::NotEnoughSpace`] if every attempt fails (`spec.md` §4.5)
    /// rather than panicking.
    pub fn add_all(&mut self, keys: &[u64], start: usize, end: usize) -> Status {
        #[cfg(debug_assertions)]
        debug_assert!(
            crate::all_distinct(keys[start..end].iter().copied()),
            "Binary fuse filters must be constructed from a collection containing all distinct keys."
        );

        let n = end - start;
        if n == 0 {
            return Status::Ok;
        }

        let geometry = self.geometry();

        for _attempt in 0..MAX_BUILD_ATTEMPTS {
            let mut slots = match self.strategy {
                BuildStrategy::Prefetch => {
                    tally_prefetch(keys, start, end, &self.hasher, &geometry)
                }
                BuildStrategy::Sorted => tally_sorted(keys, start, end, &self.hasher, &geometry),
            };
            let eager_prepass = matches!(self.strategy, BuildStrategy::Prefetch);
            let (reverse_order, reverse_h) = peel(&mut slots, &geometry, eager_prepass);

            if reverse_order.len() == n {
                assign_fingerprints(&mut self.fingerprints, &reverse_order, &reverse_h, &geometry);
                return Status::Ok;
            }

            self.hasher.reseed();
        }

        Status::NotEnoughSpace
    }

    /// Returns `Status::Ok` if `key` was a member of the set last passed to
    /// [`add_all`](Self::add_all), `Status::NotFound` otherwise. Never
    /// returns a false negative; false positives occur at a rate bounded by
    /// `2^-bits(F)` (`spec.md` §4.7, §8 P1/P2).
    #[must_use]
    pub fn contains(&self, key: u64) -> Status {
        let hash = self.hasher.hash(key);
        let ids = slots_of_hash(
            hash,
            self.segment_length,
            self.segment_length_mask,
            self.segment_count_length,
        );
        let mut f = F::truncate(hash);
        for id in ids {
            f = f ^ self.fingerprints[id as usize];
        }
        if f.is_zero() {
            Status::Ok
        } else {
            Status::NotFound
        }
    }

    /// Number of keys this filter was built for.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Size of the fingerprint table in bytes.
    #[must_use]
    pub fn size_in_bytes(&self) -> u64 {
        self.array_length * u64::from(F::BITS / 8)
    }

    /// A human-readable summary of this filter's geometry, for logging and
    /// diagnostics.
    #[must_use]
    pub fn info(&self) -> String {
        format!(
            "BinaryFuse3 Status:\n\tKeys stored: {}\n\tFingerprint bits: {}\n\tArray length: {}\n\tSegment length: {}\n\tSegment count: {}\n",
            self.size,
            F::BITS,
            self.array_length,
            self.segment_length,
            self.segment_count,
        )
    }
}
