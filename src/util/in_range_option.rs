//! No space overhead `Option`s for types with sentinels.

use std::fmt::Debug;

/// Trait to define sentinel values for types used with `InRangeOption`.
pub trait Sentinel: PartialEq + Copy {
    const SENTINEL: Self;
}

impl Sentinel for u32 {
    const SENTINEL: u32 = u32::MAX;
}

impl Sentinel for usize {
    const SENTINEL: usize = usize::MAX;
}

/// A struct to get `Option`s without space overhead.
///
/// Conceptually similar to the `NonNull` types but with sentinels other than null.
/// `InRangeOption`s are constructed from real `Option`s and converted back
/// through the `value` method to work with the encapsulated data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InRangeOption<T: Sentinel + Debug>(T);

impl<T: Sentinel + Debug> InRangeOption<T> {
    #[inline]
    pub fn new(value: Option<T>) -> InRangeOption<T> {
        match value {
            Some(value) => {
                debug_assert!(value != T::SENTINEL, "InRangeOption::new: got sentinel as a value");
                InRangeOption(value)
            }
            None => InRangeOption(T::SENTINEL),
        }
    }

    #[inline]
    pub fn some(value: T) -> InRangeOption<T> {
        Self::new(Some(value))
    }

    #[inline]
    pub fn value(self) -> Option<T> {
        let InRangeOption(value) = self;
        if value != T::SENTINEL {
            Some(value)
        } else {
            None
        }
    }
}

impl<T: Sentinel + Debug> Default for InRangeOption<T> {
    fn default() -> Self {
        Self::new(None)
    }
}
