//! Stable status codes returned across the public API boundary.
//!
//! No operation in this crate raises an exception or panics in release
//! builds; every fallible entry point returns a [`Status`] instead. This
//! mirrors the `enum Status` of the FastFilter C++ reference this crate's
//! algorithm is ported from, rather than the `Result<_, &'static str>` style
//! used elsewhere in this crate family for the older, non-binary filters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a filter operation.
///
/// Numeric values are part of the public contract and will not change.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    /// The operation succeeded, or the queried key is (probably) a member.
    Ok = 0,
    /// The queried key is not a member.
    NotFound = 1,
    /// Construction failed: peeling did not converge within the retry budget.
    NotEnoughSpace = 2,
    /// The requested operation is not supported by this configuration.
    NotSupported = 3,
}

impl Status {
    /// Returns `true` if this status is [`Status::Ok`].
    #[inline]
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Status::Ok => "ok",
            Status::NotFound => "not found",
            Status::NotEnoughSpace => "not enough space",
            Status::NotSupported => "not supported",
        };
        f.write_str(msg)
    }
}

#[cfg(test)]
mod test {
    use super::Status;

    #[test]
    fn codes_are_stable() {
        assert_eq!(Status::Ok as u8, 0);
        assert_eq!(Status::NotFound as u8, 1);
        assert_eq!(Status::NotEnoughSpace as u8, 2);
        assert_eq!(Status::NotSupported as u8, 3);
    }

    #[test]
    fn is_ok() {
        assert!(Status::Ok.is_ok());
        assert!(!Status::NotFound.is_ok());
        assert!(!Status::NotEnoughSpace.is_ok());
        assert!(!Status::NotSupported.is_ok());
    }
}
