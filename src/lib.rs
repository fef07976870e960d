//! A 3-wise binary fuse filter: a static approximate-membership data
//! structure over 64-bit keys with no false negatives, a tunable
//! false-positive rate, and a smaller per-key footprint than a Bloom filter
//! or the classic xor filters.
//!
//! Build a filter once from a known key set, then query it with
//! [`BinaryFuse3::contains`]. The filter never grows or shrinks after
//! construction — there is no insertion or deletion once built.
//!
//! ```
//! use binary_fuse_filter::{BinaryFuse8, Status};
//!
//! let keys: Vec<u64> = (0..10_000u64).collect();
//! let mut filter = BinaryFuse8::new(keys.len() as u64);
//! assert_eq!(filter.add_all(&keys, 0, keys.len()), Status::Ok);
//! assert_eq!(filter.contains(42), Status::Ok);
//! ```
//!
//! Two fingerprint widths are provided as type aliases: [`BinaryFuse8`]
//! (≈9 bits/key, <0.4% false-positive rate) and [`BinaryFuse16`] (≈18
//! bits/key, <0.002%). [`BuildStrategy`] selects between two equivalent
//! construction-time memory access patterns; both produce filters with
//! identical query semantics.

#![no_std]
#![warn(missing_docs)]
#![forbid(clippy::all, clippy::cargo, clippy::nursery)]

extern crate alloc;

mod addressing;
mod assign;
mod filter;
mod fingerprint;
mod geometry;
mod hash;
mod murmur3;
mod peel;
mod splitmix64;
mod status;
mod strategy;

pub use filter::{BinaryFuse16, BinaryFuse3, BinaryFuse32, BinaryFuse8};
pub use fingerprint::Fingerprint;
pub use geometry::Geometry;
pub use hash::{HashFamily, SplitMix64Hash};
pub use status::Status;
pub use strategy::BuildStrategy;

/// Checks that a collection of keys has all distinct values. Used by
/// [`BinaryFuse3::add_all`]'s debug-only precondition check; duplicate keys
/// make peeling provably impossible to complete (`spec.md` §7).
#[cfg(debug_assertions)]
pub(crate) fn all_distinct(keys: impl IntoIterator<Item = u64>) -> bool {
    let mut seen = alloc::collections::BTreeSet::new();
    keys.into_iter().all(move |k| seen.insert(k))
}
