//! Three-way comparison of coordinate values.
//!
//! Every ordering decision in the tree goes through a [`Comparator`]. The boolean relations the
//! algorithms need (`is_lt`, `is_ge`, ...) are then read off the returned [`Ordering`].

use std::cmp::Ordering;

use num_traits::Zero;

/// The epsilon under which two floating point coordinates compare as equal by default.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// A three-way comparison between two coordinate values.
///
/// Returns [`Ordering::Greater`] if `a > b`, [`Ordering::Equal`] if `a == b` and
/// [`Ordering::Less`] if `a < b`.
pub trait Comparator<N> {
    /// Compare `a` against `b`.
    fn compare(&self, a: N, b: N) -> Ordering;

    /// The largest difference between two values this comparator may report as
    /// [`Ordering::Equal`].
    ///
    /// A point stored on one side of a splitting plane can lie up to this far past the plane, so
    /// nearest neighbor searches shrink their plane distance by it before pruning.
    fn tolerance(&self) -> N
    where
        N: Zero,
    {
        N::zero()
    }
}

/// A comparator delegating to the type's own `<` operator.
///
/// For totally ordered types this is antisymmetric, transitive and total. Two values are equal
/// when neither is less than the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExactComparator;

impl<N: PartialOrd> Comparator<N> for ExactComparator {
    #[inline]
    fn compare(&self, a: N, b: N) -> Ordering {
        if b < a {
            Ordering::Greater
        } else if a < b {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }
}

/// A comparator for floating point coordinates that treats values closer than `epsilon` as
/// equal, absorbing rounding noise.
///
/// This is **not** transitive: near the epsilon boundary `a ≈ b` and `b ≈ c` does not imply
/// `a ≈ c`. Callers that choose this comparator accept that approximation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxComparator {
    epsilon: f64,
}

impl ApproxComparator {
    /// Create a comparator with a custom tolerance.
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// The tolerance under which values compare as equal.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl Default for ApproxComparator {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl Comparator<f64> for ApproxComparator {
    #[inline]
    fn compare(&self, a: f64, b: f64) -> Ordering {
        approx_compare(a, b, self.epsilon)
    }

    fn tolerance(&self) -> f64 {
        self.epsilon
    }
}

impl Comparator<f32> for ApproxComparator {
    #[inline]
    fn compare(&self, a: f32, b: f32) -> Ordering {
        approx_compare(a, b, self.epsilon as f32)
    }

    fn tolerance(&self) -> f32 {
        self.epsilon as f32
    }
}

#[inline]
fn approx_compare<F: num_traits::Float>(a: F, b: F, epsilon: F) -> Ordering {
    if b <= a {
        if a - b < epsilon {
            Ordering::Equal
        } else {
            Ordering::Greater
        }
    } else if b - a < epsilon {
        Ordering::Equal
    } else {
        Ordering::Less
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn exact_three_way() {
        let cmp = ExactComparator;
        assert_eq!(cmp.compare(3, 2), Ordering::Greater);
        assert_eq!(cmp.compare(2, 3), Ordering::Less);
        assert_eq!(cmp.compare(7u8, 7u8), Ordering::Equal);
        assert_eq!(cmp.compare(-1.5, -1.5), Ordering::Equal);
        assert_eq!(cmp.compare(1.0, 1.0 + 1e-9), Ordering::Less);
    }

    #[test]
    fn exact_is_antisymmetric() {
        let cmp = ExactComparator;
        let values = [-5, -1, 0, 1, 3, 3, 9];
        for &a in &values {
            for &b in &values {
                assert_eq!(cmp.compare(a, b), cmp.compare(b, a).reverse());
            }
        }
    }

    #[test]
    fn approx_absorbs_rounding_noise() {
        let cmp = ApproxComparator::default();
        assert_eq!(cmp.compare(0.1f64 + 0.2, 0.3), Ordering::Equal);
        assert_eq!(cmp.compare(1.0f64, 1.0 + 5e-7), Ordering::Equal);
        assert_eq!(cmp.compare(1.0f64, 1.0 + 1e-5), Ordering::Less);
        assert_eq!(cmp.compare(1.0f64 + 1e-5, 1.0), Ordering::Greater);
        assert_eq!(cmp.compare(0.3f32, 0.3f32 + 1e-7), Ordering::Equal);
        assert_eq!(cmp.compare(2.0f32, 1.0f32), Ordering::Greater);
    }

    #[test]
    fn approx_is_not_transitive() {
        let cmp = ApproxComparator::default();
        let (a, b, c) = (0.0f64, 0.6e-6f64, 1.2e-6f64);
        assert!(cmp.compare(a, b).is_eq());
        assert!(cmp.compare(b, c).is_eq());
        assert!(cmp.compare(a, c).is_lt());
    }

    #[test]
    fn custom_epsilon() {
        let cmp = ApproxComparator::new(0.5);
        assert_eq!(cmp.epsilon(), 0.5);
        assert_eq!(cmp.compare(1.0f64, 1.4), Ordering::Equal);
        assert_eq!(cmp.compare(1.0f64, 1.6), Ordering::Less);
    }

    #[test]
    fn tolerance_reports_epsilon() {
        let approx = ApproxComparator::default();
        assert_eq!(<ExactComparator as Comparator<i32>>::tolerance(&ExactComparator), 0);
        assert_eq!(<ExactComparator as Comparator<f64>>::tolerance(&ExactComparator), 0.0);
        assert_eq!(<ApproxComparator as Comparator<f64>>::tolerance(&approx), 1e-6);
        assert_eq!(<ApproxComparator as Comparator<f32>>::tolerance(&approx), 1e-6f32);
    }

    #[test]
    fn derived_predicates() {
        let cmp = ExactComparator;
        assert!(cmp.compare(2, 1).is_gt());
        assert!(cmp.compare(2, 1).is_ge());
        assert!(cmp.compare(1, 1).is_ge());
        assert!(cmp.compare(1, 1).is_le());
        assert!(cmp.compare(0, 1).is_lt());
        assert!(cmp.compare(0, 1).is_ne());
    }
}
