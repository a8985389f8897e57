//! Path weights
//!
//! A [`Weight`] is the numeric domain the search accumulates distances in:
//! a totally ordered value with a zero and an addition. Floating-point
//! weights go through [`OrderedFloat`] so they satisfy `Ord` like every
//! queue priority does. Integer addition saturates instead of wrapping, so an
//! overlong path can never come out cheaper than a shorter one.

use ordered_float::OrderedFloat;
use std::fmt::Debug;

/// Trait for types that can be used as edge and path weights
pub trait Weight: Ord + Copy + Debug {
    /// Additive identity; the distance of the source node
    fn zero() -> Self;

    /// Length of a path extended by an edge of weight `other`
    fn plus(self, other: Self) -> Self;
}

impl Weight for OrderedFloat<f64> {
    #[inline]
    fn zero() -> Self {
        OrderedFloat(0.0)
    }

    #[inline]
    fn plus(self, other: Self) -> Self {
        self + other
    }
}

impl Weight for OrderedFloat<f32> {
    #[inline]
    fn zero() -> Self {
        OrderedFloat(0.0)
    }

    #[inline]
    fn plus(self, other: Self) -> Self {
        self + other
    }
}

macro_rules! impl_integer_weight {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                #[inline]
                fn zero() -> Self {
                    0
                }

                #[inline]
                fn plus(self, other: Self) -> Self {
                    self.saturating_add(other)
                }
            }
        )*
    };
}

impl_integer_weight!(u8, u16, u32, u64, usize, i32, i64);
