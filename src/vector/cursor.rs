//! Random-access cursors over the live elements of a [`Vector`](crate::Vector).
//!
//! A cursor is a signed slot offset paired with a borrow of the vector's
//! elements. Forward cursors run from `begin()` (offset `0`) to the `end()`
//! sentinel (offset `len`); reverse cursors run from `rbegin()` (offset
//! `len - 1`) to the `rend()` sentinel (offset `-1`), so that incrementing
//! a reverse cursor moves it toward the front.
//!
//! Because every cursor borrows its vector, the compiler rejects any use of
//! a cursor after the vector has been mutated or reallocated. A detached
//! [`Position`] may be taken from a forward cursor to name a slot across
//! mutating calls; it is validated on every use.
//!
//! ```compile_fail,E0502
//! use flex_vector::Vector;
//!
//! let mut v = Vector::<u32>::from_slice(&[1, 2, 3]);
//! let first = v.begin();
//! v.push(4);
//! assert_eq!(*first, 1);
//! ```

use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Deref, DerefMut, Index, IndexMut, Sub, SubAssign};
use core::ptr;

mod private {
    pub trait Sealed {}

    impl Sealed for super::Forward {}
    impl Sealed for super::Reverse {}
}

/// The direction in which a cursor advances when incremented.
pub trait Direction: private::Sealed + fmt::Debug + Copy + 'static {
    /// The change in slot offset for a single increment.
    const STEP: isize;

    /// A short name for debug output.
    const NAME: &'static str;

    /// The sentinel offset one step past the last reachable element.
    fn end_offset(len: usize) -> isize;
}

/// Cursors which advance toward the back of the vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Forward;

impl Direction for Forward {
    const STEP: isize = 1;
    const NAME: &'static str = "forward";

    #[inline]
    fn end_offset(len: usize) -> isize {
        len as isize
    }
}

/// Cursors which advance toward the front of the vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reverse;

impl Direction for Reverse {
    const STEP: isize = -1;
    const NAME: &'static str = "reverse";

    #[inline]
    fn end_offset(_len: usize) -> isize {
        -1
    }
}

/// A read-only reverse cursor.
pub type RevCursor<'a, T> = Cursor<'a, T, Reverse>;

/// A mutable reverse cursor.
pub type RevCursorMut<'a, T> = CursorMut<'a, T, Reverse>;

#[cold]
#[inline(never)]
fn cursor_panic(offset: isize, len: usize) -> ! {
    panic!(
        "Cursor does not reference a live element: the offset is {} but the length is {}",
        offset, len
    );
}

#[inline]
fn slot_index(offset: isize, len: usize) -> Option<usize> {
    usize::try_from(offset).ok().filter(|&index| index < len)
}

/// A detached slot position taken from a forward cursor.
///
/// A position holds no borrow, so it may be passed back to mutating
/// methods such as [`Vector::erase_at`](crate::Vector::erase_at). Each
/// position records the generation of the allocation it was taken from,
/// which advances whenever the block is moved or released. The vector
/// rejects positions from an earlier generation, even when the allocator
/// returned the same address. Positions from another vector and offsets
/// outside of the live range are rejected as well.
pub struct Position<T> {
    base: *const T,
    offset: isize,
    generation: usize,
}

impl<T> Position<T> {
    #[inline]
    pub(crate) const fn new(base: *const T, offset: isize, generation: usize) -> Self {
        Self {
            base,
            offset,
            generation,
        }
    }

    #[inline]
    pub(crate) const fn base(&self) -> *const T {
        self.base
    }

    #[inline]
    pub(crate) const fn generation(&self) -> usize {
        self.generation
    }

    /// The slot offset from the first element.
    #[inline]
    pub const fn offset(&self) -> isize {
        self.offset
    }
}

impl<T> Clone for Position<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Position<T> {}

impl<T> PartialEq for Position<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.base, other.base)
            && self.offset == other.offset
            && self.generation == other.generation
    }
}

impl<T> Eq for Position<T> {}

impl<T> fmt::Debug for Position<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("base", &self.base)
            .field("offset", &self.offset)
            .field("generation", &self.generation)
            .finish()
    }
}

// The base pointer is only compared, never dereferenced.
unsafe impl<T> Send for Position<T> {}
unsafe impl<T> Sync for Position<T> {}

/// A read-only random-access cursor.
pub struct Cursor<'a, T, D = Forward> {
    slice: &'a [T],
    offset: isize,
    generation: usize,
    _dir: PhantomData<D>,
}

impl<'a, T, D: Direction> Cursor<'a, T, D> {
    #[inline]
    pub(crate) const fn new(slice: &'a [T], offset: isize, generation: usize) -> Self {
        Self {
            slice,
            offset,
            generation,
            _dir: PhantomData,
        }
    }

    /// Access the referenced element, or `None` for a sentinel or
    /// out-of-range cursor.
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        slot_index(self.offset, self.slice.len()).map(|index| &self.slice[index])
    }

    /// Access the element `n` steps away from this cursor.
    #[inline]
    pub fn at(&self, n: isize) -> Option<&'a T> {
        slot_index(self.offset + n * D::STEP, self.slice.len()).map(|index| &self.slice[index])
    }

    /// The slot offset from the first element.
    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    /// Check whether this cursor is the end sentinel for its direction.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.offset == D::end_offset(self.slice.len())
    }

    /// Advance this cursor by one step.
    #[inline]
    pub fn inc(&mut self) -> &mut Self {
        self.offset += D::STEP;
        self
    }

    /// Move this cursor back by one step.
    #[inline]
    pub fn dec(&mut self) -> &mut Self {
        self.offset -= D::STEP;
        self
    }

    /// Advance this cursor by one step, returning its previous state.
    #[inline]
    pub fn post_inc(&mut self) -> Self {
        let prev = *self;
        self.inc();
        prev
    }

    /// Move this cursor back by one step, returning its previous state.
    #[inline]
    pub fn post_dec(&mut self) -> Self {
        let prev = *self;
        self.dec();
        prev
    }

    #[inline]
    fn same_buffer(&self, other: &Cursor<'_, T, D>) -> bool {
        ptr::eq(self.slice, other.slice)
    }
}

impl<'a, T> Cursor<'a, T, Forward> {
    /// Take a detached position for this cursor's slot.
    #[inline]
    pub fn position(&self) -> Position<T> {
        Position::new(self.slice.as_ptr(), self.offset, self.generation)
    }

    /// The reverse cursor referencing the element before this one.
    #[inline]
    pub fn reversed(&self) -> Cursor<'a, T, Reverse> {
        Cursor::new(self.slice, self.offset - 1, self.generation)
    }
}

impl<'a, T> Cursor<'a, T, Reverse> {
    /// The forward cursor one slot past this one, such that
    /// `rev.base() == forward + 1` when both reference the same element.
    #[inline]
    pub fn base(&self) -> Cursor<'a, T, Forward> {
        Cursor::new(self.slice, self.offset + 1, self.generation)
    }
}

impl<T, D> Clone for Cursor<'_, T, D> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, D> Copy for Cursor<'_, T, D> {}

impl<T, D: Direction> Deref for Cursor<'_, T, D> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        match self.get() {
            Some(item) => item,
            None => cursor_panic(self.offset, self.slice.len()),
        }
    }
}

impl<T, D: Direction> Index<isize> for Cursor<'_, T, D> {
    type Output = T;

    #[inline]
    fn index(&self, n: isize) -> &T {
        match self.at(n) {
            Some(item) => item,
            None => cursor_panic(self.offset + n * D::STEP, self.slice.len()),
        }
    }
}

impl<T, D: Direction> Add<isize> for Cursor<'_, T, D> {
    type Output = Self;

    #[inline]
    fn add(mut self, n: isize) -> Self {
        self += n;
        self
    }
}

impl<T, D: Direction> Sub<isize> for Cursor<'_, T, D> {
    type Output = Self;

    #[inline]
    fn sub(mut self, n: isize) -> Self {
        self -= n;
        self
    }
}

impl<T, D: Direction> AddAssign<isize> for Cursor<'_, T, D> {
    #[inline]
    fn add_assign(&mut self, n: isize) {
        self.offset += n * D::STEP;
    }
}

impl<T, D: Direction> SubAssign<isize> for Cursor<'_, T, D> {
    #[inline]
    fn sub_assign(&mut self, n: isize) {
        self.offset -= n * D::STEP;
    }
}

/// The number of increments needed to move `other` onto `self`.
impl<'b, T, D: Direction> Sub<Cursor<'b, T, D>> for Cursor<'_, T, D> {
    type Output = isize;

    #[inline]
    fn sub(self, other: Cursor<'b, T, D>) -> isize {
        debug_assert!(self.same_buffer(&other), "cursors reference different vectors");
        (self.offset - other.offset) * D::STEP
    }
}

impl<'b, T, D: Direction> PartialEq<Cursor<'b, T, D>> for Cursor<'_, T, D> {
    #[inline]
    fn eq(&self, other: &Cursor<'b, T, D>) -> bool {
        self.same_buffer(other) && self.offset == other.offset
    }
}

impl<T, D: Direction> Eq for Cursor<'_, T, D> {}

/// Cursors over different vectors are unordered.
impl<'b, T, D: Direction> PartialOrd<Cursor<'b, T, D>> for Cursor<'_, T, D> {
    #[inline]
    fn partial_cmp(&self, other: &Cursor<'b, T, D>) -> Option<Ordering> {
        if self.same_buffer(other) {
            (self.offset * D::STEP).partial_cmp(&(other.offset * D::STEP))
        } else {
            None
        }
    }
}

impl<T, D: Direction> fmt::Debug for Cursor<'_, T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("direction", &D::NAME)
            .field("offset", &self.offset)
            .field("len", &self.slice.len())
            .finish()
    }
}

/// A random-access cursor with mutable access to the referenced elements.
///
/// Two mutable cursors never share a buffer, so there is no distance
/// operator; compare [`offset`](Self::offset) values or convert with
/// [`as_const`](Self::as_const) to measure against a read-only cursor.
pub struct CursorMut<'a, T, D = Forward> {
    slice: &'a mut [T],
    offset: isize,
    generation: usize,
    _dir: PhantomData<D>,
}

impl<'a, T, D: Direction> CursorMut<'a, T, D> {
    #[inline]
    pub(crate) fn new(slice: &'a mut [T], offset: isize, generation: usize) -> Self {
        Self {
            slice,
            offset,
            generation,
            _dir: PhantomData,
        }
    }

    /// Access the referenced element, or `None` for a sentinel or
    /// out-of-range cursor.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        slot_index(self.offset, self.slice.len()).map(|index| &self.slice[index])
    }

    /// Mutably access the referenced element, or `None` for a sentinel or
    /// out-of-range cursor.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        slot_index(self.offset, self.slice.len()).map(|index| &mut self.slice[index])
    }

    /// Access the element `n` steps away from this cursor.
    #[inline]
    pub fn at(&self, n: isize) -> Option<&T> {
        slot_index(self.offset + n * D::STEP, self.slice.len()).map(|index| &self.slice[index])
    }

    /// Mutably access the element `n` steps away from this cursor.
    #[inline]
    pub fn at_mut(&mut self, n: isize) -> Option<&mut T> {
        slot_index(self.offset + n * D::STEP, self.slice.len())
            .map(|index| &mut self.slice[index])
    }

    /// The slot offset from the first element.
    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    /// Check whether this cursor is the end sentinel for its direction.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.offset == D::end_offset(self.slice.len())
    }

    /// Advance this cursor by one step.
    #[inline]
    pub fn inc(&mut self) -> &mut Self {
        self.offset += D::STEP;
        self
    }

    /// Move this cursor back by one step.
    #[inline]
    pub fn dec(&mut self) -> &mut Self {
        self.offset -= D::STEP;
        self
    }

    /// Borrow a read-only cursor at the same slot.
    #[inline]
    pub fn as_const(&self) -> Cursor<'_, T, D> {
        Cursor::new(self.slice, self.offset, self.generation)
    }

    /// Convert into a read-only cursor at the same slot.
    #[inline]
    pub fn into_const(self) -> Cursor<'a, T, D> {
        Cursor::new(self.slice, self.offset, self.generation)
    }
}

impl<'a, T> CursorMut<'a, T, Forward> {
    /// Take a detached position for this cursor's slot.
    #[inline]
    pub fn position(&self) -> Position<T> {
        Position::new(self.slice.as_ptr(), self.offset, self.generation)
    }
}

impl<'a, T> CursorMut<'a, T, Reverse> {
    /// Convert into the forward cursor one slot past this one.
    #[inline]
    pub fn base(self) -> CursorMut<'a, T, Forward> {
        CursorMut::new(self.slice, self.offset + 1, self.generation)
    }
}

impl<'a, T, D: Direction> From<CursorMut<'a, T, D>> for Cursor<'a, T, D> {
    #[inline]
    fn from(cursor: CursorMut<'a, T, D>) -> Self {
        cursor.into_const()
    }
}

impl<T, D: Direction> Deref for CursorMut<'_, T, D> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        match self.get() {
            Some(item) => item,
            None => cursor_panic(self.offset, self.slice.len()),
        }
    }
}

impl<T, D: Direction> DerefMut for CursorMut<'_, T, D> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        let (offset, len) = (self.offset, self.slice.len());
        match self.get_mut() {
            Some(item) => item,
            None => cursor_panic(offset, len),
        }
    }
}

impl<T, D: Direction> Index<isize> for CursorMut<'_, T, D> {
    type Output = T;

    #[inline]
    fn index(&self, n: isize) -> &T {
        match self.at(n) {
            Some(item) => item,
            None => cursor_panic(self.offset + n * D::STEP, self.slice.len()),
        }
    }
}

impl<T, D: Direction> IndexMut<isize> for CursorMut<'_, T, D> {
    #[inline]
    fn index_mut(&mut self, n: isize) -> &mut T {
        let (offset, len) = (self.offset + n * D::STEP, self.slice.len());
        match self.at_mut(n) {
            Some(item) => item,
            None => cursor_panic(offset, len),
        }
    }
}

impl<T, D: Direction> Add<isize> for CursorMut<'_, T, D> {
    type Output = Self;

    #[inline]
    fn add(mut self, n: isize) -> Self {
        self += n;
        self
    }
}

impl<T, D: Direction> Sub<isize> for CursorMut<'_, T, D> {
    type Output = Self;

    #[inline]
    fn sub(mut self, n: isize) -> Self {
        self -= n;
        self
    }
}

impl<T, D: Direction> AddAssign<isize> for CursorMut<'_, T, D> {
    #[inline]
    fn add_assign(&mut self, n: isize) {
        self.offset += n * D::STEP;
    }
}

impl<T, D: Direction> SubAssign<isize> for CursorMut<'_, T, D> {
    #[inline]
    fn sub_assign(&mut self, n: isize) {
        self.offset -= n * D::STEP;
    }
}

impl<'b, T, D: Direction> PartialEq<CursorMut<'b, T, D>> for CursorMut<'_, T, D> {
    #[inline]
    fn eq(&self, other: &CursorMut<'b, T, D>) -> bool {
        self.as_const() == other.as_const()
    }
}

impl<T, D: Direction> Eq for CursorMut<'_, T, D> {}

impl<'b, T, D: Direction> PartialOrd<CursorMut<'b, T, D>> for CursorMut<'_, T, D> {
    #[inline]
    fn partial_cmp(&self, other: &CursorMut<'b, T, D>) -> Option<Ordering> {
        self.as_const().partial_cmp(&other.as_const())
    }
}

impl<T, D: Direction> fmt::Debug for CursorMut<'_, T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("direction", &D::NAME)
            .field("offset", &self.offset)
            .field("len", &self.slice.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &[u32] = &[10, 20, 30, 40];

    fn forward(offset: isize) -> Cursor<'static, u32> {
        Cursor::new(DATA, offset, 0)
    }

    fn reverse(offset: isize) -> RevCursor<'static, u32> {
        Cursor::new(DATA, offset, 0)
    }

    #[test]
    fn forward_arithmetic() {
        let begin = forward(0);
        let end = forward(4);
        assert_eq!(end - begin, 4);
        assert_eq!(*(begin + 2), 30);
        assert_eq!(begin[3], 40);
        assert_eq!(end - 1, forward(3));
        assert!(begin < end);
        assert!(end.is_end());
        assert_eq!(end.get(), None);
    }

    #[test]
    fn increments() {
        let mut c = forward(0);
        assert_eq!(*c.post_inc(), 10);
        assert_eq!(**c.inc(), 30);
        assert_eq!(*c.post_dec(), 30);
        assert_eq!(c.offset(), 1);
        c.dec();
        assert_eq!(*c, 10);
    }

    #[test]
    fn reverse_arithmetic() {
        let rbegin = reverse(3);
        let rend = reverse(-1);
        assert_eq!(*rbegin, 40);
        assert_eq!(rend - rbegin, 4);
        assert_eq!(*(rbegin + 1), 30);
        assert_eq!(rbegin[2], 20);
        assert!(rbegin < rend);
        assert!(rend.is_end());
        let mut c = rbegin;
        c.inc();
        assert_eq!(*c, 30);
    }

    #[test]
    fn reverse_base() {
        let rbegin = reverse(3);
        assert_eq!(rbegin.base(), forward(4));
        let third = forward(2);
        assert_eq!(third.reversed().base(), third);
        assert_eq!(*third.reversed(), 20);
    }

    #[test]
    fn different_buffers_unordered() {
        let other = [10u32, 20, 30, 40];
        let a = forward(0);
        let b = Cursor::<u32>::new(&other, 0, 0);
        assert_ne!(a, b);
        assert_eq!(a.partial_cmp(&b), None);
    }

    #[test]
    #[should_panic(expected = "Cursor does not reference a live element")]
    fn deref_sentinel_panics() {
        let rend = reverse(-1);
        let _value: u32 = *rend;
    }

    #[test]
    fn mutable_cursor() {
        let mut data = [1u32, 2, 3];
        let mut c = CursorMut::<u32>::new(&mut data, 0, 0);
        *c += 10;
        c.inc();
        c[1] = 7;
        assert_eq!(c.at(1), Some(&7));
        let c = c + 1;
        assert_eq!(*c, 7);
        let read: Cursor<'_, u32> = c.into();
        assert_eq!(read.offset(), 2);
        assert_eq!(data, [11, 2, 7]);
    }

    #[test]
    fn mutable_reverse_base() {
        let mut data = [1u32, 2, 3];
        let mut c = RevCursorMut::new(&mut data, 2, 0);
        *c = 9;
        let base = c.base();
        assert!(base.is_end());
        assert_eq!(base.offset(), 3);
    }

    #[test]
    fn mutable_cursor_compare() {
        let mut data = [1u32, 2, 3];
        let mut other = [1u32, 2, 3];
        let mut a = CursorMut::<u32>::new(&mut data, 0, 0);
        a.inc();
        let b = CursorMut::<u32>::new(&mut other, 1, 0);
        assert_ne!(a, b);
        assert_eq!(a.partial_cmp(&b), None);
        assert_eq!(a, a);
        assert_eq!(a.partial_cmp(&a), Some(Ordering::Equal));
    }

    #[test]
    fn position_equality() {
        let a = forward(1).position();
        assert_eq!(a, forward(1).position());
        assert_ne!(a, forward(2).position());
        assert_eq!(a.offset(), 1);
    }
}
