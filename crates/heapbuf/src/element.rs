// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

/// A value that can be stored in a [`Buffer`][crate::Buffer].
///
/// Elements are plain `Copy` values that are read out of and written into shared storage one at a
/// time. Besides that, the trait defines how buffer contents are compared: buffer equality, ordering
/// and hashing are all built from the three methods here, which must agree with each other.
///
/// Implementations are provided for the integer types up to 64 bits, `f32`, `f64` and `char`.
///
/// # Floating point elements
///
/// Floating point elements use an equivalence that is total: all NaN values are equal to each
/// other and `-0.0` is equal to `0.0`. NaN sorts after every other value.
///
/// ```
/// use heapbuf::Buffer;
///
/// let a = Buffer::wrap(vec![f32::NAN, -0.0]);
/// let b = Buffer::wrap(vec![f32::NAN, 0.0]);
///
/// assert_eq!(a, b);
/// ```
pub trait Element: Copy + Default + Debug + 'static {
    /// Whether two elements are considered equal by buffer comparison.
    fn element_eq(self, other: Self) -> bool;

    /// Orders two elements for buffer comparison.
    ///
    /// Must return [`Ordering::Equal`] exactly when [`element_eq()`][Self::element_eq] is true.
    fn element_cmp(self, other: Self) -> Ordering;

    /// Feeds the element into a hasher.
    ///
    /// Elements that are [`element_eq()`][Self::element_eq] must hash identically.
    fn element_hash<H: Hasher>(self, state: &mut H);
}

macro_rules! ordered_element {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                #[inline]
                fn element_eq(self, other: Self) -> bool {
                    self == other
                }

                #[inline]
                fn element_cmp(self, other: Self) -> Ordering {
                    self.cmp(&other)
                }

                #[inline]
                fn element_hash<H: Hasher>(self, state: &mut H) {
                    self.hash(state);
                }
            }
        )*
    };
}

ordered_element!(u8, i8, u16, i16, u32, i32, u64, i64, char);

macro_rules! float_element {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                #[inline]
                fn element_eq(self, other: Self) -> bool {
                    #[expect(clippy::float_cmp, reason = "exact comparison is the contract")]
                    let equal = self == other;

                    equal || (self.is_nan() && other.is_nan())
                }

                #[inline]
                fn element_cmp(self, other: Self) -> Ordering {
                    if self < other {
                        Ordering::Less
                    } else if self > other {
                        Ordering::Greater
                    } else if self.element_eq(other) {
                        Ordering::Equal
                    } else if self.is_nan() {
                        // Only one side is NaN here.
                        Ordering::Greater
                    } else {
                        Ordering::Less
                    }
                }

                #[inline]
                fn element_hash<H: Hasher>(self, state: &mut H) {
                    // Canonical bits for the values that compare equal across representations.
                    let bits = if self.is_nan() {
                        <$t>::NAN.to_bits()
                    } else if self == 0.0 {
                        0
                    } else {
                        self.to_bits()
                    };

                    bits.hash(state);
                }
            }
        )*
    };
}

float_element!(f32, f64);
