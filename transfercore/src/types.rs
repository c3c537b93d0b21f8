//! Core validated types for `TransferCore`.
//!
//! Values with invariants use smart constructors so that validity is
//! established at construction time, following the "parse, don't validate"
//! principle.

use nutype::nutype;

/// The default scratch capacity used by the transfer engine, in units.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// The usable capacity of a transfer buffer, in units.
///
/// `BufferCapacity` values are guaranteed to be at least 1. A zero-capacity
/// buffer could never make progress, so ruling it out at construction time
/// is what makes the copy loop's termination argument hold.
#[nutype(
    validate(greater_or_equal = 1),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Display,
        Into
    )
)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    /// The capacity used when none is configured (8 KiB).
    pub fn default_capacity() -> Self {
        Self::try_new(DEFAULT_BUFFER_CAPACITY).expect("default capacity is non-zero")
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self::default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_capacity_rejects_zero() {
        assert!(BufferCapacity::try_new(0).is_err());
    }

    #[test]
    fn buffer_capacity_accepts_one() {
        let capacity = BufferCapacity::try_new(1).unwrap();
        assert_eq!(usize::from(capacity), 1);
    }

    #[test]
    fn default_capacity_is_eight_kibibytes() {
        assert_eq!(usize::from(BufferCapacity::default()), 8 * 1024);
    }
}
