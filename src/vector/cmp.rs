use core::cmp::Ordering;
use core::hash::{Hash, Hasher};

use super::Vector;
use crate::alloc::Allocator;

/// Equality with a tolerance suited to the element type.
///
/// Floating point values compare equal when their difference does not
/// exceed the machine epsilon of the type. Every other implementation
/// compares exactly.
pub trait ApproxEq<Rhs: ?Sized = Self> {
    /// Check whether `self` and `other` are equal within the tolerance.
    fn approx_eq(&self, other: &Rhs) -> bool;
}

macro_rules! approx_eq_float {
    ($($t:ty),*) => {$(
        impl ApproxEq for $t {
            #[inline]
            fn approx_eq(&self, other: &Self) -> bool {
                if self == other {
                    return true;
                }
                let diff = if self > other { self - other } else { other - self };
                diff <= <$t>::EPSILON
            }
        }
    )*};
}

approx_eq_float!(f32, f64);

macro_rules! approx_eq_exact {
    ($($t:ty),*) => {$(
        impl ApproxEq for $t {
            #[inline]
            fn approx_eq(&self, other: &Self) -> bool {
                self == other
            }
        }
    )*};
}

approx_eq_exact!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool, char, str
);

impl<T: ApproxEq + ?Sized> ApproxEq for &T {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        (**self).approx_eq(*other)
    }
}

impl<T: ApproxEq> ApproxEq for [T] {
    fn approx_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.approx_eq(b))
    }
}

impl<T, A: Allocator> Vector<T, A> {
    /// Compare the elements of two vectors with `eq`. Vectors of different
    /// lengths are never equal.
    pub fn eq_by<U, B, F>(&self, other: &Vector<U, B>, mut eq: F) -> bool
    where
        B: Allocator,
        F: FnMut(&T, &U) -> bool,
    {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| eq(a, b))
    }

    /// Compare the elements of two vectors with [`ApproxEq`].
    ///
    /// # Examples
    ///
    /// ```
    /// use flex_vector::Vector;
    ///
    /// let a = Vector::<f64>::from_slice(&[0.3]);
    /// let b = Vector::<f64>::from_slice(&[0.1 + 0.2]);
    /// assert!(a != b);
    /// assert!(a.approx_eq(&b));
    /// ```
    pub fn approx_eq<B: Allocator>(&self, other: &Vector<T, B>) -> bool
    where
        T: ApproxEq,
    {
        self.eq_by(other, T::approx_eq)
    }
}

impl<T1, A1, T2, A2> PartialEq<Vector<T2, A2>> for Vector<T1, A1>
where
    A1: Allocator,
    A2: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &Vector<T2, A2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for Vector<T, A> {}

impl<T1, A1, T2> PartialEq<[T2]> for Vector<T1, A1>
where
    A1: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &[T2]) -> bool {
        self.as_slice() == other
    }
}

impl<T1, A1, T2> PartialEq<&[T2]> for Vector<T1, A1>
where
    A1: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &&[T2]) -> bool {
        self.as_slice() == *other
    }
}

impl<T1, A1, T2, const N: usize> PartialEq<[T2; N]> for Vector<T1, A1>
where
    A1: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &[T2; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T1, A1, T2, const N: usize> PartialEq<&[T2; N]> for Vector<T1, A1>
where
    A1: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &&[T2; N]) -> bool {
        self.as_slice() == *other
    }
}

impl<T1, T2, A2> PartialEq<Vector<T2, A2>> for [T1]
where
    A2: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &Vector<T2, A2>) -> bool {
        self == other.as_slice()
    }
}

impl<T1, T2, A2, const N: usize> PartialEq<Vector<T2, A2>> for [T1; N]
where
    A2: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &Vector<T2, A2>) -> bool {
        self == other.as_slice()
    }
}

#[cfg(feature = "alloc")]
impl<T1, A1, T2> PartialEq<alloc_crate::vec::Vec<T2>> for Vector<T1, A1>
where
    A1: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &alloc_crate::vec::Vec<T2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

#[cfg(feature = "alloc")]
impl<T1, T2, A2> PartialEq<Vector<T2, A2>> for alloc_crate::vec::Vec<T1>
where
    A2: Allocator,
    T1: PartialEq<T2>,
{
    #[inline]
    fn eq(&self, other: &Vector<T2, A2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialOrd, A: Allocator> PartialOrd for Vector<T, A> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, A: Allocator> Ord for Vector<T, A> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, A: Allocator> Hash for Vector<T, A> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}
