//! Generic fingerprint width (`spec.md` §9: "template specialisation over
//! fingerprint type becomes a generic parameter constrained to unsigned
//! integer widths").

use core::ops::BitXor;

/// An unsigned integer width usable as a binary fuse filter's fingerprint.
///
/// Implemented for `u8`, `u16`, and `u32` only — the three widths `spec.md`
/// §3 names. The trait is not meant to be implemented outside this crate.
pub trait Fingerprint: Copy + Default + BitXor<Output = Self> + PartialEq + 'static {
    /// Bit width of this fingerprint type.
    const BITS: u32;

    /// Low-order truncation of a 64-bit key hash to this fingerprint width
    /// (`spec.md` §4.2: "fingerprint(h) = (F)h").
    fn truncate(hash: u64) -> Self;

    /// `true` if every bit of this fingerprint is zero.
    fn is_zero(self) -> bool;

    /// A uniformly random value of this width, used to fill fingerprint
    /// slots that no key ever claims (see [`crate::filter`] for why this
    /// matters for the false-positive rate at fingerprint value zero).
    #[cfg(feature = "uniform-random")]
    fn random() -> Self;
}

macro_rules! impl_fingerprint {
    ($t:ty) => {
        impl Fingerprint for $t {
            const BITS: u32 = <$t>::BITS;

            #[inline]
            fn truncate(hash: u64) -> Self {
                hash as $t
            }

            #[inline]
            fn is_zero(self) -> bool {
                self == 0
            }

            #[cfg(feature = "uniform-random")]
            #[inline]
            fn random() -> Self {
                rand::random::<$t>()
            }
        }
    };
}

impl_fingerprint!(u8);
impl_fingerprint!(u16);
impl_fingerprint!(u32);
