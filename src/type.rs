use std::fmt::Debug;

use num_traits::{Bounded, Num, NumCast, ToPrimitive};

use crate::cmp::{ApproxComparator, Comparator, ExactComparator};

/// A trait for types that can be used for indexed coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Every implementation names
/// the comparator a [`KDTree`][crate::kdtree::KDTree] uses when the caller doesn't pick one:
/// integers compare exactly, floats compare with an epsilon tolerance.
pub trait IndexableNum:
    private::Sealed
    + Num
    + NumCast
    + ToPrimitive
    + PartialOrd
    + Debug
    + Default
    + Send
    + Sync
    + bytemuck::Pod
    + Bounded
{
    /// The comparator used to order coordinates of this type by default.
    type DefaultComparator: Comparator<Self> + Default + Clone + Debug;
}

impl IndexableNum for i8 {
    type DefaultComparator = ExactComparator;
}

impl IndexableNum for u8 {
    type DefaultComparator = ExactComparator;
}

impl IndexableNum for i16 {
    type DefaultComparator = ExactComparator;
}

impl IndexableNum for u16 {
    type DefaultComparator = ExactComparator;
}

impl IndexableNum for i32 {
    type DefaultComparator = ExactComparator;
}

impl IndexableNum for u32 {
    type DefaultComparator = ExactComparator;
}

impl IndexableNum for i64 {
    type DefaultComparator = ExactComparator;
}

impl IndexableNum for u64 {
    type DefaultComparator = ExactComparator;
}

impl IndexableNum for f32 {
    type DefaultComparator = ApproxComparator;
}

impl IndexableNum for f64 {
    type DefaultComparator = ApproxComparator;
}

/// Absolute difference of two values, converted into the norm type `S`.
///
/// Both values are widened to `S` before subtracting, so `i32` coordinates with an `f64` norm
/// can't overflow. The subtraction is ordered so unsigned types never underflow. When a value
/// doesn't fit in `S` the difference is taken in `N`, or in `f64` when the values have opposite
/// signs and `N` could overflow, and saturates to `S::max_value()`.
#[inline]
pub(crate) fn abs_diff<N: IndexableNum, S: IndexableNum>(a: N, b: N) -> S {
    match (<S as NumCast>::from(a), <S as NumCast>::from(b)) {
        (Some(a), Some(b)) if a >= b => a - b,
        (Some(a), Some(b)) => b - a,
        _ => {
            let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
            let diff = if lo >= N::zero() || hi < N::zero() {
                <S as NumCast>::from(hi - lo)
            } else {
                match (hi.to_f64(), lo.to_f64()) {
                    (Some(hi), Some(lo)) => <S as NumCast>::from(hi - lo),
                    _ => None,
                }
            };
            diff.unwrap_or_else(S::max_value)
        }
    }
}

/// `acc + d * d` for a non-negative `acc` and `d`, saturating at `S::max_value()`.
#[inline]
pub(crate) fn add_square<S: IndexableNum>(acc: S, d: S) -> S {
    let max = S::max_value();
    if d != S::zero() && d > max / d {
        return max;
    }
    let square = d * d;
    if square > max - acc {
        max
    } else {
        acc + square
    }
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for i8 {}
    impl Sealed for u8 {}
    impl Sealed for i16 {}
    impl Sealed for u16 {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for i64 {}
    impl Sealed for u64 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

#[cfg(test)]
mod test {
    use super::{abs_diff, add_square};

    #[test]
    fn abs_diff_widens_before_subtracting() {
        assert_eq!(abs_diff::<u8, u8>(3, 250), 247);
        assert_eq!(abs_diff::<i32, f64>(i32::MIN, i32::MAX), 4294967295.0);
        assert_eq!(abs_diff::<f64, f64>(-1.5, 2.0), 3.5);
    }

    #[test]
    fn abs_diff_saturates_when_values_do_not_fit() {
        assert_eq!(abs_diff::<u16, u8>(300, 299), 1);
        assert_eq!(abs_diff::<u16, u8>(300, 10), u8::MAX);
        assert_eq!(abs_diff::<i16, u16>(-1, 300), 301);
        assert_eq!(abs_diff::<i64, i32>(i64::MIN, i64::MAX), i32::MAX);
        assert_eq!(abs_diff::<i64, u64>(i64::MIN, i64::MAX), u64::MAX);
        assert_eq!(abs_diff::<i64, i32>(-5, i64::MIN), i32::MAX);
    }

    #[test]
    fn add_square_saturates() {
        assert_eq!(add_square::<u8>(0, 15), 225);
        assert_eq!(add_square::<u8>(0, 16), u8::MAX);
        assert_eq!(add_square::<u8>(200, 10), u8::MAX);
        assert_eq!(add_square::<u8>(30, 15), 255);
        assert_eq!(add_square::<u8>(0, 0), 0);
        assert_eq!(add_square::<i32>(1, i32::MAX), i32::MAX);
        assert_eq!(add_square::<f64>(1.0, 2.0), 5.0);
    }
}
