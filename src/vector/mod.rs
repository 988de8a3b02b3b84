//! Growable contiguous vector type and support.

use core::borrow::{Borrow, BorrowMut};
use core::fmt;
use core::mem::{self, ManuallyDrop};
use core::ops::{Bound, Deref, DerefMut, Index, IndexMut, Range, RangeBounds};
use core::ptr;
use core::slice::{self, SliceIndex};

use const_default::ConstDefault;

use crate::alloc::{Allocator, AllocatorDefault, Global};
use crate::capacity::{Grow, GrowDoubling, GrowExact};
use crate::error::{StorageError, UpdateError, VectorError};
use crate::storage::insert::Inserter;
use crate::storage::lifecycle::{construct_at, destroy_at, destroy_range};
use crate::storage::{max_capacity, ArrayBuffer};

#[cfg(feature = "zeroize")]
use crate::alloc::AllocatorZeroizes;

use self::sort::{bubble_sort, introsort};
use self::sorted::SortState;

pub use self::cmp::ApproxEq;
pub use self::cursor::{
    Cursor, CursorMut, Direction, Forward, Position, RevCursor, RevCursorMut, Reverse,
};
pub use self::into_iter::IntoIter;

mod cmp;
pub mod cursor;
mod into_iter;
mod sort;
mod sorted;

#[macro_use]
mod macros;

#[cfg(all(feature = "alloc", feature = "zeroize"))]
/// A `Vector` which automatically zeroizes its buffer when it is released.
pub type ZeroizingVector<T> = Vector<T, crate::alloc::ZeroizingAlloc<Global>>;

fn checked_range(range: impl RangeBounds<usize>, len: usize) -> Result<Range<usize>, VectorError> {
    let start = match range.start_bound() {
        Bound::Unbounded => 0,
        Bound::Included(&i) => i,
        Bound::Excluded(&i) => i.checked_add(1).ok_or(VectorError::out_of_range(i, len))?,
    };
    let end = match range.end_bound() {
        Bound::Unbounded => len,
        Bound::Included(&i) => i.checked_add(1).ok_or(VectorError::out_of_range(i, len))?,
        Bound::Excluded(&i) => i,
    };
    if end > len {
        Err(VectorError::out_of_range(end, len))
    } else if start > end {
        Err(VectorError::out_of_range(start, len))
    } else {
        Ok(Range { start, end })
    }
}

#[cfg(feature = "alloc")]
#[inline]
/// Create a `Vector<T>` from an array `[T; N]`.
pub fn from_array<T: PartialOrd, const N: usize>(data: [T; N]) -> Vector<T> {
    Vector::from_array_in(data, Global)
}

#[inline]
/// Create a `Vector<T, A>` from an array `[T; N]` and an allocator instance.
pub fn from_array_in<T: PartialOrd, A: Allocator, const N: usize>(
    data: [T; N],
    alloc: A,
) -> Vector<T, A> {
    Vector::from_array_in(data, alloc)
}

#[cfg(feature = "alloc")]
#[inline]
/// Create a `Vector<T>` holding `count` clones of `elem`.
pub fn from_elem<T: Clone>(elem: T, count: usize) -> Vector<T> {
    Vector::from_elem_in(elem, count, Global)
}

#[inline]
/// Create a `Vector<T, A>` holding `count` clones of `elem`, allocated in `alloc`.
pub fn from_elem_in<T: Clone, A: Allocator>(elem: T, count: usize, alloc: A) -> Vector<T, A> {
    Vector::from_elem_in(elem, count, alloc)
}

/// A growable contiguous array.
///
/// Elements are constructed and destroyed through the allocator `A`, which
/// also supplies the backing block. The vector caches whether its elements
/// are known to be in non-decreasing order: [`is_sorted`](Self::is_sorted)
/// never reports `true` for an unsorted sequence, but may report `false`
/// for a sorted one after an operation which could have broken the order.
pub struct Vector<T, A: Allocator = Global> {
    buffer: ArrayBuffer<T, A>,
    sorted: SortState,
}

impl<T, A: AllocatorDefault> Vector<T, A> {
    /// Constructs a new, empty `Vector<T, A>`.
    ///
    /// The vector will not allocate until elements are pushed onto it.
    ///
    /// # Examples
    ///
    /// ```
    /// # #![allow(unused_mut)]
    /// use flex_vector::Vector;
    ///
    /// let mut vec: Vector<i32> = Vector::new();
    /// assert!(vec.is_sorted());
    /// ```
    pub const fn new() -> Self {
        Self {
            buffer: ArrayBuffer::DEFAULT,
            sorted: SortState::Sorted,
        }
    }

    /// Constructs a new, empty vector with space for at least `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, A::DEFAULT)
    }

    /// Constructs a new, empty vector with space for at least `capacity`
    /// elements, returning an error if the allocation fails.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, StorageError> {
        Self::try_with_capacity_in(capacity, A::DEFAULT)
    }

    /// Constructs a vector holding `count` clones of `elem`.
    pub fn from_elem(elem: T, count: usize) -> Self
    where
        T: Clone,
    {
        Self::from_elem_in(elem, count, A::DEFAULT)
    }

    /// Constructs a vector holding clones of the items of `data`. The
    /// sortedness of the new vector is verified in a single pass.
    pub fn from_slice(data: &[T]) -> Self
    where
        T: Clone + PartialOrd,
    {
        Self::from_slice_in(data, A::DEFAULT)
    }

    /// Constructs a vector holding clones of the items of `data`,
    /// returning an error if the allocation fails.
    pub fn try_from_slice(data: &[T]) -> Result<Self, StorageError>
    where
        T: Clone + PartialOrd,
    {
        Self::try_from_slice_in(data, A::DEFAULT)
    }

    /// Constructs a vector by moving in the items of `data`.
    pub fn from_array<const N: usize>(data: [T; N]) -> Self
    where
        T: PartialOrd,
    {
        Self::from_array_in(data, A::DEFAULT)
    }
}

impl<T, A: Allocator> Vector<T, A> {
    /// Constructs a new, empty vector using the allocator instance `alloc`.
    pub const fn new_in(alloc: A) -> Self {
        Self {
            buffer: ArrayBuffer::dangling(alloc),
            sorted: SortState::Sorted,
        }
    }

    /// Constructs a new, empty vector with space for at least `capacity`
    /// elements, allocated in `alloc`.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        match Self::try_with_capacity_in(capacity, alloc) {
            Ok(res) => res,
            Err(error) => error.panic(),
        }
    }

    /// Constructs a new, empty vector with space for at least `capacity`
    /// elements, allocated in `alloc`.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, StorageError> {
        Ok(Self {
            buffer: ArrayBuffer::allocate_in(capacity, alloc)?,
            sorted: SortState::Sorted,
        })
    }

    /// Constructs a vector holding `count` clones of `elem`, allocated in `alloc`.
    pub fn from_elem_in(elem: T, count: usize, alloc: A) -> Self
    where
        T: Clone,
    {
        let mut vec = Self::with_capacity_in(count, alloc);
        if count > 0 {
            unsafe {
                vec.fill_gap(0, count, |ins| {
                    ins.push_repeat(&elem, count - 1);
                    ins.push(elem);
                })
            };
        }
        vec
    }

    /// Constructs a vector holding clones of the items of `data`, allocated in `alloc`.
    pub fn from_slice_in(data: &[T], alloc: A) -> Self
    where
        T: Clone + PartialOrd,
    {
        match Self::try_from_slice_in(data, alloc) {
            Ok(res) => res,
            Err(error) => error.panic(),
        }
    }

    /// Constructs a vector holding clones of the items of `data`, allocated
    /// in `alloc`, returning an error if the allocation fails.
    pub fn try_from_slice_in(data: &[T], alloc: A) -> Result<Self, StorageError>
    where
        T: Clone + PartialOrd,
    {
        let mut vec = Self::try_with_capacity_in(data.len(), alloc)?;
        unsafe { vec.fill_gap(0, data.len(), |ins| ins.push_slice(data)) };
        vec.sorted = SortState::verify(data);
        Ok(vec)
    }

    /// Constructs a vector by moving in the items of `data`, allocated in `alloc`.
    pub fn from_array_in<const N: usize>(data: [T; N], alloc: A) -> Self
    where
        T: PartialOrd,
    {
        let sorted = SortState::verify(&data);
        let mut vec = Self::with_capacity_in(N, alloc);
        unsafe { vec.fill_gap(0, N, |ins| ins.push_iter(&mut data.into_iter())) };
        vec.sorted = sorted;
        vec
    }

    #[inline]
    fn into_buffer(self) -> ArrayBuffer<T, A> {
        let me = ManuallyDrop::new(self);
        unsafe { ptr::read(&me.buffer) }
    }

    #[inline]
    fn invalidate_order(&mut self) {
        self.sorted = SortState::Unsorted;
    }
}

// Storage management
impl<T, A: Allocator> Vector<T, A> {
    /// Access the allocator instance.
    #[inline]
    pub fn allocator(&self) -> &A {
        self.buffer.allocator()
    }

    /// The number of element slots in the current allocation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// The number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.length()
    }

    /// Check whether the vector holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.length() == 0
    }

    /// The number of unused element slots in the current allocation.
    #[inline]
    pub fn free_capacity(&self) -> usize {
        self.buffer.capacity() - self.buffer.length()
    }

    /// The largest number of elements a vector of `T` could hold.
    #[inline]
    pub const fn max_size(&self) -> usize {
        max_capacity::<T>()
    }

    fn grow_to<G: Grow>(&mut self, minimum: usize) -> Result<(), StorageError> {
        let capacity = self.buffer.capacity();
        if minimum <= capacity {
            return Ok(());
        }
        if minimum > max_capacity::<T>() {
            return Err(StorageError::CapacityLimit);
        }
        let target = G::next_capacity(capacity, minimum)
            .min(max_capacity::<T>())
            .max(minimum);
        self.buffer.grow(target)
    }

    #[inline]
    fn grow_by<G: Grow>(&mut self, additional: usize) -> Result<(), StorageError> {
        let minimum = self
            .buffer
            .length()
            .checked_add(additional)
            .ok_or(StorageError::CapacityLimit)?;
        self.grow_to::<G>(minimum)
    }

    /// Ensure that the vector can hold at least `minimum` elements. When
    /// the allocation must grow, its capacity is at least doubled.
    pub fn ensure_capacity(&mut self, minimum: usize) {
        match self.try_ensure_capacity(minimum) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Ensure that the vector can hold at least `minimum` elements. When the
    /// allocation fails, the vector is left unchanged.
    pub fn try_ensure_capacity(&mut self, minimum: usize) -> Result<(), StorageError> {
        self.grow_to::<GrowDoubling>(minimum)
    }

    /// Grow the allocation to exactly `capacity` slots, if it is currently smaller.
    pub fn reserve(&mut self, capacity: usize) {
        match self.try_reserve(capacity) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Grow the allocation to exactly `capacity` slots, if it is currently
    /// smaller. When the allocation fails, the vector is left unchanged.
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), StorageError> {
        self.grow_to::<GrowExact>(capacity)
    }

    /// Shrink the allocation to hold exactly the live elements, releasing
    /// it entirely for an empty vector.
    pub fn shrink_to_fit(&mut self) {
        match self.try_shrink_to_fit() {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Shrink the allocation to hold exactly the live elements. When the
    /// allocation fails, the vector is left unchanged.
    pub fn try_shrink_to_fit(&mut self) -> Result<(), StorageError> {
        self.buffer.shrink(self.buffer.length())
    }

    /// Shrink the allocation to `min_capacity` slots, or to the number of
    /// live elements if that is greater.
    pub fn shrink_to(&mut self, min_capacity: usize) {
        match self.try_shrink_to(min_capacity) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Shrink the allocation to `min_capacity` slots, or to the number of
    /// live elements if that is greater.
    pub fn try_shrink_to(&mut self, min_capacity: usize) -> Result<(), StorageError> {
        self.buffer
            .shrink(min_capacity.max(self.buffer.length()))
    }

    /// Shrink to fit when fewer than half of the allocated slots are in use.
    pub fn adjust_capacity(&mut self) {
        match self.try_adjust_capacity() {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Shrink to fit when fewer than half of the allocated slots are in use.
    pub fn try_adjust_capacity(&mut self) -> Result<(), StorageError> {
        if self.buffer.length() < self.buffer.capacity() / 2 {
            self.try_shrink_to_fit()
        } else {
            Ok(())
        }
    }

    /// Exchange the contents of two vectors, including their allocations
    /// and sortedness.
    #[inline]
    pub fn swap_with(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Move the contents out of this vector, leaving it empty with no allocation.
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let mut empty = Self::new_in(self.allocator().clone());
        empty.buffer.succeed(&self.buffer);
        mem::replace(self, empty)
    }
}

// Element access
impl<T, A: Allocator> Vector<T, A> {
    /// Access the live elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.buffer.as_slice()
    }

    /// Access the live elements as a mutable slice. The vector is no longer
    /// considered sorted.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.invalidate_order();
        self.buffer.as_mut_slice()
    }

    /// A read-only pointer to the first element slot.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buffer.as_ptr()
    }

    /// Access the element at `index`.
    pub fn at(&self, index: usize) -> Result<&T, VectorError> {
        let len = self.buffer.length();
        self.buffer
            .as_slice()
            .get(index)
            .ok_or(VectorError::out_of_range(index, len))
    }

    /// Mutably access the element at `index`. The vector is no longer
    /// considered sorted.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, VectorError> {
        let len = self.buffer.length();
        if index >= len {
            return Err(VectorError::out_of_range(index, len));
        }
        Ok(&mut self.as_mut_slice()[index])
    }

    /// Access the first element.
    pub fn front(&self) -> Result<&T, VectorError> {
        self.at(0)
    }

    /// Mutably access the first element.
    pub fn front_mut(&mut self) -> Result<&mut T, VectorError> {
        self.at_mut(0)
    }

    /// Access the last element.
    pub fn back(&self) -> Result<&T, VectorError> {
        self.as_slice()
            .last()
            .ok_or(VectorError::out_of_range(0, 0))
    }

    /// Mutably access the last element.
    pub fn back_mut(&mut self) -> Result<&mut T, VectorError> {
        match self.len() {
            0 => Err(VectorError::out_of_range(0, 0)),
            len => self.at_mut(len - 1),
        }
    }

    /// Access the element at `index` without a bounds check.
    ///
    /// # Safety
    /// `index` must be less than `len()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        &*self.buffer.as_ptr().add(index)
    }

    /// Mutably access the element at `index` without a bounds check. The
    /// vector is no longer considered sorted.
    ///
    /// # Safety
    /// `index` must be less than `len()`.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        self.invalidate_order();
        &mut *self.buffer.as_mut_ptr().add(index)
    }

    /// Iterate over the live elements.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Mutably iterate over the live elements. The vector is no longer
    /// considered sorted.
    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Create a copy of the elements in `range`. The copy is considered
    /// sorted when this vector is.
    pub fn subvector(&self, range: impl RangeBounds<usize>) -> Result<Self, VectorError>
    where
        T: Clone,
        A: Clone,
    {
        let range = checked_range(range, self.len())?;
        let items = &self.as_slice()[range];
        let mut vec = Self::try_with_capacity_in(items.len(), self.allocator().clone())?;
        unsafe { vec.fill_gap(0, items.len(), |ins| ins.push_slice(items)) };
        vec.sorted = if self.sorted.is_sorted() {
            SortState::Sorted
        } else {
            SortState::unknown(items.len())
        };
        Ok(vec)
    }
}

// Cursors
impl<T, A: Allocator> Vector<T, A> {
    /// A cursor over the first element.
    #[inline]
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), 0, self.buffer.generation())
    }

    /// The sentinel cursor one slot past the last element.
    #[inline]
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), self.len() as isize, self.buffer.generation())
    }

    /// A reverse cursor over the last element.
    #[inline]
    pub fn rbegin(&self) -> RevCursor<'_, T> {
        Cursor::new(self.as_slice(), self.len() as isize - 1, self.buffer.generation())
    }

    /// The reverse sentinel cursor one slot before the first element.
    #[inline]
    pub fn rend(&self) -> RevCursor<'_, T> {
        Cursor::new(self.as_slice(), -1, self.buffer.generation())
    }

    /// A mutable cursor over the first element.
    #[inline]
    pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
        let generation = self.buffer.generation();
        CursorMut::new(self.as_mut_slice(), 0, generation)
    }

    /// The mutable sentinel cursor one slot past the last element.
    #[inline]
    pub fn end_mut(&mut self) -> CursorMut<'_, T> {
        let (len, generation) = (self.len() as isize, self.buffer.generation());
        CursorMut::new(self.as_mut_slice(), len, generation)
    }

    /// A mutable reverse cursor over the last element.
    #[inline]
    pub fn rbegin_mut(&mut self) -> RevCursorMut<'_, T> {
        let (len, generation) = (self.len() as isize, self.buffer.generation());
        CursorMut::new(self.as_mut_slice(), len - 1, generation)
    }

    /// The mutable reverse sentinel cursor one slot before the first element.
    #[inline]
    pub fn rend_mut(&mut self) -> RevCursorMut<'_, T> {
        let generation = self.buffer.generation();
        CursorMut::new(self.as_mut_slice(), -1, generation)
    }

    /// Detached position of the slot at `index`, which may be `len()`.
    pub fn position(&self, index: usize) -> Result<Position<T>, VectorError> {
        let len = self.len();
        if index > len {
            return Err(VectorError::out_of_range(index, len));
        }
        Ok(self.position_unchecked(index))
    }

    #[inline]
    fn position_unchecked(&self, index: usize) -> Position<T> {
        Position::new(
            self.buffer.as_ptr(),
            index as isize,
            self.buffer.generation(),
        )
    }

    fn resolve(&self, pos: Position<T>, allow_end: bool) -> Result<usize, VectorError> {
        let len = self.len();
        let offset = pos.offset();
        let index = usize::try_from(offset).unwrap_or(usize::MAX);
        let in_bounds = if allow_end { index <= len } else { index < len };
        let current =
            pos.base() == self.buffer.as_ptr() && pos.generation() == self.buffer.generation();
        if !current || !in_bounds {
            Err(VectorError::out_of_range(index, len))
        } else {
            Ok(index)
        }
    }
}

// Mutation
impl<T, A: Allocator> Vector<T, A> {
    /// Open a gap of `count` slots at `index`, relocating the following
    /// elements toward the tail, and let `fill` populate it. A short fill
    /// closes the unfilled part of the gap. Returns the number of values
    /// inserted.
    ///
    /// If `fill` panics, the inserted values and the relocated tail are
    /// destroyed and the vector is cut down to `index` elements.
    ///
    /// # Safety
    /// `index` must not exceed the length, and capacity must already be
    /// available for `count` additional elements.
    unsafe fn fill_gap<F>(&mut self, index: usize, count: usize, fill: F) -> usize
    where
        F: FnOnce(&mut Inserter<'_, T, A>),
    {
        let len = self.buffer.length();
        let tail_count = len - index;
        self.buffer.set_length(index);
        let (slots, alloc) = self.buffer.uninit_range(index, len + count);
        if tail_count > 0 && count > 0 {
            let head = slots.as_mut_ptr();
            ptr::copy(head, head.add(count), tail_count);
        }
        let mut ins = Inserter::new_with_tail(slots, alloc, tail_count);
        fill(&mut ins);
        let filled = ins.complete();
        self.buffer.set_length(index + filled);
        filled - tail_count
    }

    /// Construct `value` in the slot after the last element, without
    /// touching the sortedness flag.
    ///
    /// # Safety
    /// There must be at least one free slot.
    #[inline]
    unsafe fn push_raw(&mut self, value: T) {
        let len = self.buffer.length();
        let slot = self.buffer.as_mut_ptr().add(len);
        construct_at(self.buffer.allocator(), slot, value);
        self.buffer.set_length(len + 1);
    }

    /// Destroy the elements from `len` onward, without touching the
    /// sortedness flag.
    fn discard_from(&mut self, len: usize) {
        let old_len = self.buffer.length();
        if len < old_len {
            unsafe {
                self.buffer.set_length(len);
                let first = self.buffer.as_mut_ptr().add(len);
                destroy_range(self.buffer.allocator(), first, old_len - len);
            }
        }
    }

    /// Append `value` to the end of the vector.
    ///
    /// # Examples
    ///
    /// ```
    /// use flex_vector::Vector;
    ///
    /// let mut vec = Vector::<i32>::new();
    /// vec.push(10);
    /// vec.push(20);
    /// assert_eq!(vec, [10, 20]);
    /// assert!(vec.is_sorted());
    /// vec.push(5);
    /// assert!(!vec.is_sorted());
    /// ```
    pub fn push(&mut self, value: T)
    where
        T: PartialOrd,
    {
        match self.try_push(value) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Append `value` to the end of the vector, returning it back inside
    /// the error if storage could not be provided.
    pub fn try_push(&mut self, value: T) -> Result<(), UpdateError<T>>
    where
        T: PartialOrd,
    {
        if let Err(error) = self.grow_by::<GrowDoubling>(1) {
            return Err(UpdateError::new(error, value));
        }
        unsafe { self.push_unchecked(value) };
        Ok(())
    }

    /// Append `value` without checking the capacity.
    ///
    /// # Safety
    /// There must be at least one free slot.
    #[inline]
    pub unsafe fn push_unchecked(&mut self, value: T)
    where
        T: PartialOrd,
    {
        self.sorted = self.sorted.after_append(self.buffer.as_slice().last(), &value);
        self.push_raw(value);
    }

    /// Append the value produced by `f`, which is called once storage is available.
    pub fn push_with<F>(&mut self, f: F)
    where
        T: PartialOrd,
        F: FnOnce() -> T,
    {
        if let Err(error) = self.grow_by::<GrowDoubling>(1) {
            error.panic();
        }
        unsafe { self.push_unchecked(f()) };
    }

    /// Remove the last element and return it, or `None` for an empty vector.
    pub fn pop(&mut self) -> Option<T> {
        let len = self.buffer.length();
        if len == 0 {
            return None;
        }
        unsafe {
            self.buffer.set_length(len - 1);
            self.sorted = self.sorted.after_truncate(len - 1);
            Some(ptr::read(self.buffer.as_ptr().add(len - 1)))
        }
    }

    /// Remove the last element and return it, failing for an empty vector.
    pub fn try_pop(&mut self) -> Result<T, VectorError> {
        self.pop().ok_or(VectorError::out_of_range(0, 0))
    }

    /// Insert `value` at `index`, shifting the following elements toward the tail.
    ///
    /// # Panics
    /// Panics if `index > len()`.
    pub fn insert(&mut self, index: usize, value: T) {
        match self.try_insert(index, value) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Insert `value` at `index`, returning it back inside the error if the
    /// index is out of range or storage could not be provided.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), UpdateError<T>> {
        let len = self.buffer.length();
        if index > len {
            return Err(UpdateError::new(VectorError::out_of_range(index, len), value));
        }
        if let Err(error) = self.grow_by::<GrowDoubling>(1) {
            return Err(UpdateError::new(error, value));
        }
        unsafe { self.insert_unchecked(index, value) };
        Ok(())
    }

    /// # Safety
    /// `index` must not exceed the length and there must be a free slot.
    unsafe fn insert_unchecked(&mut self, index: usize, value: T) {
        let len = self.buffer.length();
        self.invalidate_order();
        let head = self.buffer.as_mut_ptr().add(index);
        if index < len {
            ptr::copy(head, head.add(1), len - index);
        }
        construct_at(self.buffer.allocator(), head, value);
        self.buffer.set_length(len + 1);
    }

    /// Insert the value produced by `f` at `index`. `f` is only called once
    /// the index is validated and storage is available.
    pub fn emplace_with<F>(&mut self, index: usize, f: F)
    where
        F: FnOnce() -> T,
    {
        match self.try_emplace_with(index, f) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Insert the value produced by `f` at `index`.
    pub fn try_emplace_with<F>(&mut self, index: usize, f: F) -> Result<(), VectorError>
    where
        F: FnOnce() -> T,
    {
        let len = self.buffer.length();
        if index > len {
            return Err(VectorError::out_of_range(index, len));
        }
        self.grow_by::<GrowDoubling>(1)?;
        let value = f();
        unsafe { self.insert_unchecked(index, value) };
        Ok(())
    }

    /// Insert `value` at `pos`, returning the position of the new element.
    pub fn insert_at(&mut self, pos: Position<T>, value: T) -> Position<T> {
        match self.try_insert_at(pos, value) {
            Ok(res) => res,
            Err(error) => error.panic(),
        }
    }

    /// Insert `value` at `pos`. The position must belong to the current
    /// allocation of this vector and may name the end slot.
    pub fn try_insert_at(&mut self, pos: Position<T>, value: T) -> Result<Position<T>, UpdateError<T>> {
        let index = match self.resolve(pos, true) {
            Ok(index) => index,
            Err(error) => return Err(UpdateError::new(error, value)),
        };
        self.try_insert(index, value)?;
        Ok(self.position_unchecked(index))
    }

    /// # Safety
    /// `start + count` must not exceed the length.
    unsafe fn erase_unchecked(&mut self, start: usize, count: usize) {
        if count == 0 {
            return;
        }
        let len = self.buffer.length();
        let tail_count = len - start - count;
        self.invalidate_order();
        self.buffer.set_length(start);
        let head = self.buffer.as_mut_ptr().add(start);
        destroy_range(self.buffer.allocator(), head, count);
        ptr::copy(head.add(count), head, tail_count);
        self.buffer.set_length(start + tail_count);
    }

    /// Destroy the element at `index`, shifting the following elements
    /// toward the front.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    pub fn erase(&mut self, index: usize) {
        match self.try_erase(index) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Destroy the element at `index`, failing if it is out of range.
    ///
    /// If the element's destructor panics, the following elements are leaked.
    pub fn try_erase(&mut self, index: usize) -> Result<(), VectorError> {
        let len = self.buffer.length();
        if index >= len {
            return Err(VectorError::out_of_range(index, len));
        }
        unsafe { self.erase_unchecked(index, 1) };
        Ok(())
    }

    /// Destroy the elements in `range`, shifting the following elements
    /// toward the front.
    pub fn erase_range(&mut self, range: impl RangeBounds<usize>) {
        match self.try_erase_range(range) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Destroy the elements in `range`, failing if it exceeds the live elements.
    pub fn try_erase_range(&mut self, range: impl RangeBounds<usize>) -> Result<(), VectorError> {
        let range = checked_range(range, self.buffer.length())?;
        unsafe { self.erase_unchecked(range.start, range.end - range.start) };
        Ok(())
    }

    /// Remove the element at `index` and return it.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> T {
        match self.try_remove(index) {
            Ok(res) => res,
            Err(error) => error.panic(),
        }
    }

    /// Remove the element at `index` and return it, failing if it is out of range.
    pub fn try_remove(&mut self, index: usize) -> Result<T, VectorError> {
        let len = self.buffer.length();
        if index >= len {
            return Err(VectorError::out_of_range(index, len));
        }
        self.invalidate_order();
        unsafe {
            let head = self.buffer.as_mut_ptr().add(index);
            let value = ptr::read(head);
            ptr::copy(head.add(1), head, len - index - 1);
            self.buffer.set_length(len - 1);
            Ok(value)
        }
    }

    /// Destroy the element at `pos`, returning the position of the element
    /// which followed it.
    pub fn erase_at(&mut self, pos: Position<T>) -> Position<T> {
        match self.try_erase_at(pos) {
            Ok(res) => res,
            Err(error) => error.panic(),
        }
    }

    /// Destroy the element at `pos`. The position must belong to the current
    /// allocation of this vector and name a live element.
    pub fn try_erase_at(&mut self, pos: Position<T>) -> Result<Position<T>, VectorError> {
        let index = self.resolve(pos, false)?;
        unsafe { self.erase_unchecked(index, 1) };
        Ok(self.position_unchecked(index))
    }

    /// Destroy the elements from `first` up to but excluding `last`,
    /// returning the position of the element which followed them.
    pub fn erase_span(&mut self, first: Position<T>, last: Position<T>) -> Position<T> {
        match self.try_erase_span(first, last) {
            Ok(res) => res,
            Err(error) => error.panic(),
        }
    }

    /// Destroy the elements from `first` up to but excluding `last`.
    pub fn try_erase_span(
        &mut self,
        first: Position<T>,
        last: Position<T>,
    ) -> Result<Position<T>, VectorError> {
        let start = self.resolve(first, true)?;
        let end = self.resolve(last, true)?;
        if start > end {
            return Err(VectorError::out_of_range(start, self.len()));
        }
        unsafe { self.erase_unchecked(start, end - start) };
        Ok(self.position_unchecked(start))
    }

    /// Insert clones of `values` at `index`.
    pub fn insert_slice(&mut self, index: usize, values: &[T])
    where
        T: Clone,
    {
        match self.try_insert_slice(index, values) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Insert clones of `values` at `index`, with a single capacity check.
    ///
    /// If a clone panics, the elements from `index` onward are destroyed.
    pub fn try_insert_slice(&mut self, index: usize, values: &[T]) -> Result<(), VectorError>
    where
        T: Clone,
    {
        let len = self.buffer.length();
        if index > len {
            return Err(VectorError::out_of_range(index, len));
        }
        if values.is_empty() {
            return Ok(());
        }
        self.grow_by::<GrowDoubling>(values.len())?;
        self.invalidate_order();
        unsafe { self.fill_gap(index, values.len(), |ins| ins.push_slice(values)) };
        Ok(())
    }

    /// Insert the items of `iter` at `index`, preserving their order.
    pub fn insert_iter<I>(&mut self, index: usize, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        match self.try_insert_iter(index, iter) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Insert the items of `iter` at `index`. When the iterator reports an
    /// exact length, storage is requested once and the items are moved
    /// directly into place; otherwise they are staged behind the live
    /// elements and rotated into position.
    pub fn try_insert_iter<I>(&mut self, index: usize, iter: I) -> Result<(), VectorError>
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.buffer.length();
        if index > len {
            return Err(VectorError::out_of_range(index, len));
        }
        let mut iter = iter.into_iter();
        match iter.size_hint() {
            (lower, Some(upper)) if lower == upper => {
                self.grow_by::<GrowDoubling>(lower)?;
                let mut inserted = 0;
                if lower > 0 {
                    self.invalidate_order();
                    inserted =
                        unsafe { self.fill_gap(index, lower, |ins| ins.push_iter(&mut iter)) };
                }
                // an iterator producing more than it reported
                self.stage_at(index + inserted, iter)
            }
            (lower, _) => {
                self.try_ensure_capacity(len.saturating_add(lower))?;
                self.stage_at(index, iter)
            }
        }
    }

    /// Append the items of `iter` behind the live elements, then rotate them
    /// into place at `index`. On failure the staged items are destroyed.
    fn stage_at<I>(&mut self, index: usize, iter: I) -> Result<(), VectorError>
    where
        I: Iterator<Item = T>,
    {
        let start = self.buffer.length();
        let prev_sorted = self.sorted;
        self.invalidate_order();
        for item in iter {
            if let Err(error) = self.grow_by::<GrowDoubling>(1) {
                self.discard_from(start);
                self.sorted = prev_sorted;
                return Err(error.into());
            }
            unsafe { self.push_raw(item) };
        }
        if self.buffer.length() == start {
            self.sorted = prev_sorted;
        } else {
            self.buffer.as_mut_slice()[index..].rotate_left(start - index);
        }
        Ok(())
    }

    /// Insert clones of the elements in `range` of this same vector at
    /// `index`.
    ///
    /// # Examples
    ///
    /// ```
    /// use flex_vector::Vector;
    ///
    /// let mut vec = Vector::<i32>::from_slice(&[5, 3]);
    /// vec.insert_within(0, ..);
    /// assert_eq!(vec, [5, 3, 5, 3]);
    /// ```
    pub fn insert_within(&mut self, index: usize, range: impl RangeBounds<usize>)
    where
        T: Clone,
    {
        match self.try_insert_within(index, range) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Insert clones of the elements in `range` of this same vector at
    /// `index`. The clones are first staged in spare capacity, so the
    /// source is never read while it is being shifted.
    pub fn try_insert_within(
        &mut self,
        index: usize,
        range: impl RangeBounds<usize>,
    ) -> Result<(), VectorError>
    where
        T: Clone,
    {
        let len = self.buffer.length();
        let range = checked_range(range, len)?;
        if index > len {
            return Err(VectorError::out_of_range(index, len));
        }
        let count = range.end - range.start;
        if count == 0 {
            return Ok(());
        }
        self.grow_by::<GrowDoubling>(count)?;
        self.invalidate_order();
        let source = unsafe { self.buffer.as_ptr().add(range.start) };
        unsafe {
            self.fill_gap(len, count, |ins| {
                for i in 0..count {
                    ins.push((*source.add(i)).clone());
                }
            })
        };
        self.buffer.as_mut_slice()[index..].rotate_left(len - index);
        Ok(())
    }

    /// Move every element of `other` to the end of this vector, leaving
    /// `other` empty.
    pub fn append<B: Allocator>(&mut self, other: &mut Vector<T, B>)
    where
        T: PartialOrd,
    {
        match self.try_append(other) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Move every element of `other` to the end of this vector. When storage
    /// could not be provided, both vectors are left unchanged.
    ///
    /// The elements are moved bitwise: `other`'s allocator sees no
    /// `destroy` for them and this vector's allocator no `construct`.
    pub fn try_append<B: Allocator>(&mut self, other: &mut Vector<T, B>) -> Result<(), StorageError>
    where
        T: PartialOrd,
    {
        let count = other.len();
        if count == 0 {
            return Ok(());
        }
        self.grow_by::<GrowDoubling>(count)?;
        let len = self.buffer.length();
        self.sorted = match (self.sorted, other.sorted) {
            (SortState::Sorted, SortState::Sorted) => {
                SortState::Sorted.after_append(self.buffer.as_slice().last(), &other.as_slice()[0])
            }
            _ => SortState::Unsorted,
        };
        unsafe {
            other.buffer.set_length(0);
            other.sorted = SortState::Sorted;
            ptr::copy_nonoverlapping(
                other.buffer.as_ptr(),
                self.buffer.as_mut_ptr().add(len),
                count,
            );
            self.buffer.set_length(len + count);
        }
        Ok(())
    }

    /// Append clones of `items`, with a single capacity check.
    pub fn extend_from_slice(&mut self, items: &[T])
    where
        T: Clone + PartialOrd,
    {
        match self.try_extend_from_slice(items) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Append clones of `items`. When storage could not be provided, the
    /// vector is left unchanged.
    pub fn try_extend_from_slice(&mut self, items: &[T]) -> Result<(), StorageError>
    where
        T: Clone + PartialOrd,
    {
        if items.is_empty() {
            return Ok(());
        }
        self.grow_by::<GrowDoubling>(items.len())?;
        let len = self.buffer.length();
        let sorted = self.sorted.after_extend(self.buffer.as_slice().last(), items);
        self.invalidate_order();
        unsafe { self.fill_gap(len, items.len(), |ins| ins.push_slice(items)) };
        self.sorted = sorted;
        Ok(())
    }

    fn try_extend_iter<I>(&mut self, iter: I) -> Result<(), VectorError>
    where
        T: PartialOrd,
        I: Iterator<Item = T>,
    {
        let (lower, _) = iter.size_hint();
        self.try_ensure_capacity(self.len().saturating_add(lower))?;
        for item in iter {
            if let Err(error) = self.try_push(item) {
                return Err(error.into_parts().0);
            }
        }
        Ok(())
    }

    /// Resize the vector to `new_len` elements. Growth appends clones of
    /// `value` after an exact reservation; shrinking destroys the trailing
    /// elements and releases spare capacity once less than half is in use.
    ///
    /// # Examples
    ///
    /// ```
    /// use flex_vector::Vector;
    ///
    /// let mut vec = Vector::<u8>::new();
    /// vec.resize(8, 1);
    /// assert_eq!(vec.capacity(), 8);
    /// vec.resize(3, 0);
    /// assert_eq!(vec.capacity(), 3);
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone + PartialOrd,
    {
        match self.try_resize(new_len, value) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Resize the vector to `new_len` elements, filling with clones of `value`.
    pub fn try_resize(&mut self, new_len: usize, value: T) -> Result<(), StorageError>
    where
        T: Clone + PartialOrd,
    {
        let len = self.buffer.length();
        if new_len > len {
            self.grow_to::<GrowExact>(new_len)?;
            let count = new_len - len;
            let sorted = self.sorted.after_append(self.buffer.as_slice().last(), &value);
            self.invalidate_order();
            unsafe {
                self.fill_gap(len, count, |ins| {
                    ins.push_repeat(&value, count - 1);
                    ins.push(value);
                })
            };
            self.sorted = sorted;
            Ok(())
        } else if new_len < len {
            self.truncate(new_len);
            self.try_adjust_capacity()
        } else {
            Ok(())
        }
    }

    /// Resize the vector to `new_len` elements, filling with values produced by `f`.
    pub fn resize_with<F>(&mut self, new_len: usize, f: F)
    where
        T: PartialOrd,
        F: FnMut() -> T,
    {
        match self.try_resize_with(new_len, f) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Resize the vector to `new_len` elements, filling with values produced by `f`.
    pub fn try_resize_with<F>(&mut self, new_len: usize, mut f: F) -> Result<(), StorageError>
    where
        T: PartialOrd,
        F: FnMut() -> T,
    {
        let len = self.buffer.length();
        if new_len > len {
            self.grow_to::<GrowExact>(new_len)?;
            for _ in len..new_len {
                unsafe { self.push_unchecked(f()) };
            }
            Ok(())
        } else if new_len < len {
            self.truncate(new_len);
            self.try_adjust_capacity()
        } else {
            Ok(())
        }
    }

    /// Destroy the elements from `len` onward. Capacity is not changed.
    pub fn truncate(&mut self, len: usize) {
        if len < self.buffer.length() {
            self.sorted = self.sorted.after_truncate(len);
            self.discard_from(len);
        }
    }

    /// Destroy every element, keeping the allocation.
    pub fn clear(&mut self) {
        self.discard_from(0);
        self.sorted = SortState::Sorted;
    }

    /// Reverse the order of the elements.
    pub fn reverse(&mut self) {
        self.as_mut_slice().reverse();
    }

    /// Exchange the elements at indices `a` and `b`.
    pub fn swap_indices(&mut self, a: usize, b: usize) {
        match self.try_swap_indices(a, b) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }

    /// Exchange the elements at indices `a` and `b`, failing if either is out of range.
    pub fn try_swap_indices(&mut self, a: usize, b: usize) -> Result<(), VectorError> {
        let len = self.buffer.length();
        for index in [a, b] {
            if index >= len {
                return Err(VectorError::out_of_range(index, len));
            }
        }
        self.as_mut_slice().swap(a, b);
        Ok(())
    }

    /// Replace every element equal to `old` with a clone of `new`, returning
    /// the number of replacements. When a destructor panics, the element it
    /// was dropping is removed from the vector.
    pub fn replace_all(&mut self, old: &T, new: T) -> usize
    where
        T: Clone + PartialEq,
    {
        struct Hole<'a, T, A: Allocator> {
            buffer: &'a mut ArrayBuffer<T, A>,
            index: usize,
        }

        impl<T, A: Allocator> Drop for Hole<'_, T, A> {
            fn drop(&mut self) {
                // only reached when a destructor panicked, the slot is empty
                unsafe {
                    let len = self.buffer.length();
                    let head = self.buffer.as_mut_ptr();
                    ptr::copy(
                        head.add(self.index + 1),
                        head.add(self.index),
                        len - self.index - 1,
                    );
                    self.buffer.set_length(len - 1);
                }
            }
        }

        self.invalidate_order();
        let mut count = 0;
        for index in 0..self.buffer.length() {
            let slot = unsafe { self.buffer.as_mut_ptr().add(index) };
            if unsafe { &*slot } == old {
                let value = new.clone();
                let hole = Hole {
                    buffer: &mut self.buffer,
                    index,
                };
                unsafe {
                    destroy_at(hole.buffer.allocator(), slot);
                    construct_at(hole.buffer.allocator(), slot, value);
                }
                mem::forget(hole);
                count += 1;
            }
        }
        count
    }

    /// Sort the elements if they are not known to be sorted, then remove
    /// consecutive duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use flex_vector::Vector;
    ///
    /// let mut vec = Vector::<i32>::from_slice(&[3, 1, 3, 2, 1]);
    /// vec.remove_duplicates();
    /// assert_eq!(vec, [1, 2, 3]);
    /// ```
    pub fn remove_duplicates(&mut self)
    where
        T: PartialOrd,
    {
        if !self.sorted.is_sorted() {
            self.sort();
        }
        let len = self.buffer.length();
        if len < 2 {
            return;
        }

        struct Compact<'a, T, A: Allocator> {
            buffer: &'a mut ArrayBuffer<T, A>,
            read: usize,
            write: usize,
            len: usize,
        }

        impl<T, A: Allocator> Drop for Compact<'_, T, A> {
            fn drop(&mut self) {
                // close the gap left by removed duplicates
                unsafe {
                    let head = self.buffer.as_mut_ptr();
                    ptr::copy(
                        head.add(self.read),
                        head.add(self.write),
                        self.len - self.read,
                    );
                    self.buffer.set_length(self.write + self.len - self.read);
                }
            }
        }

        unsafe { self.buffer.set_length(0) };
        let mut compact = Compact {
            buffer: &mut self.buffer,
            read: 1,
            write: 1,
            len,
        };
        let head = compact.buffer.as_mut_ptr();
        while compact.read < compact.len {
            let (current, kept) = unsafe {
                (
                    head.add(compact.read),
                    head.add(compact.write - 1),
                )
            };
            compact.read += 1;
            if unsafe { *current == *kept } {
                unsafe { destroy_at(compact.buffer.allocator(), current) };
            } else {
                unsafe { ptr::copy(current, head.add(compact.write), 1) };
                compact.write += 1;
            }
        }
        drop(compact);
        self.sorted = SortState::Sorted;
    }

    /// Sort the elements in ascending order with an introspective sort.
    pub fn sort(&mut self)
    where
        T: PartialOrd,
    {
        self.invalidate_order();
        introsort(self.buffer.as_mut_slice());
        self.sorted = SortState::Sorted;
    }

    /// Sort the elements in ascending order with a bubble sort. This takes
    /// quadratic time and is only suited to tiny vectors.
    pub fn bubble_sort(&mut self)
    where
        T: PartialOrd,
    {
        self.invalidate_order();
        bubble_sort(self.buffer.as_mut_slice());
        self.sorted = SortState::Sorted;
    }

    /// Check whether the elements are known to be in non-decreasing order.
    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.sorted.is_sorted()
    }
}

// Queries
impl<T, A: Allocator> Vector<T, A> {
    /// Check whether an element equal to `value` is present.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.as_slice().contains(value)
    }

    /// The index of the first element equal to `value`.
    pub fn find(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.as_slice().iter().position(|item| item == value)
    }

    /// The number of elements equal to `value`.
    pub fn count(&self, value: &T) -> usize
    where
        T: PartialEq,
    {
        self.as_slice().iter().filter(|item| *item == value).count()
    }

    /// Erase the first element equal to `value`, returning whether one was found.
    pub fn remove_value(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self.find(value) {
            Some(index) => {
                unsafe { self.erase_unchecked(index, 1) };
                true
            }
            None => false,
        }
    }
}

impl<T, A: Allocator> AsRef<[T]> for Vector<T, A> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> AsMut<[T]> for Vector<T, A> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator> Borrow<[T]> for Vector<T, A> {
    #[inline]
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> BorrowMut<[T]> for Vector<T, A> {
    #[inline]
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for Vector<T, A> {
    fn clone(&self) -> Self {
        let items = self.as_slice();
        let mut inst = Self::with_capacity_in(items.len(), self.allocator().clone());
        unsafe { inst.fill_gap(0, items.len(), |ins| ins.push_slice(items)) };
        inst.sorted = self.sorted;
        inst
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Vector<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_slice().fmt(f)
    }
}

impl<T: fmt::Display, A: Allocator> fmt::Display for Vector<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, item) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(item, f)?;
        }
        f.write_str("]")
    }
}

impl<T, A: AllocatorDefault> ConstDefault for Vector<T, A> {
    const DEFAULT: Self = Self::new();
}

impl<T, A: AllocatorDefault> Default for Vector<T, A> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator> Deref for Vector<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for Vector<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator, I: SliceIndex<[T]>> Index<I> for Vector<T, A> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, A: Allocator, I: SliceIndex<[T]>> IndexMut<I> for Vector<T, A> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T, A: Allocator> Drop for Vector<T, A> {
    fn drop(&mut self) {
        self.discard_from(0);
    }
}

impl<T: PartialOrd, A: Allocator> Extend<T> for Vector<T, A> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        match self.try_extend_iter(iter.into_iter()) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }
}

impl<'a, T: Clone + PartialOrd + 'a, A: Allocator> Extend<&'a T> for Vector<T, A> {
    #[inline]
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        match self.try_extend_iter(iter.into_iter().cloned()) {
            Ok(_) => (),
            Err(error) => error.panic(),
        }
    }
}

impl<T: PartialOrd, A: AllocatorDefault> FromIterator<T> for Vector<T, A> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        vec.extend(iter);
        vec
    }
}

impl<T: PartialOrd, A: AllocatorDefault, const N: usize> From<[T; N]> for Vector<T, A> {
    #[inline]
    fn from(data: [T; N]) -> Self {
        Self::from_array(data)
    }
}

impl<T: Clone + PartialOrd, A: AllocatorDefault> From<&[T]> for Vector<T, A> {
    #[inline]
    fn from(data: &[T]) -> Self {
        Self::from_slice(data)
    }
}

#[cfg(feature = "alloc")]
impl<T: PartialOrd> From<alloc_crate::vec::Vec<T>> for Vector<T, Global> {
    fn from(vec: alloc_crate::vec::Vec<T>) -> Self {
        let sorted = SortState::verify(vec.as_slice());
        let mut vec = ManuallyDrop::new(vec);
        let header = crate::storage::BufferHeader {
            capacity: vec.capacity(),
            length: vec.len(),
        };
        let data = unsafe { ptr::NonNull::new_unchecked(vec.as_mut_ptr()) };
        Self {
            buffer: unsafe { ArrayBuffer::from_parts(data, header, Global) },
            sorted,
        }
    }
}

#[cfg(feature = "alloc")]
impl<T> From<Vector<T, Global>> for alloc_crate::vec::Vec<T> {
    fn from(vec: Vector<T, Global>) -> Self {
        let (data, header, _) = vec.into_buffer().into_parts();
        unsafe { alloc_crate::vec::Vec::from_raw_parts(data.as_ptr(), header.length, header.capacity) }
    }
}

impl<T, A: Allocator> IntoIterator for Vector<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.into_buffer())
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Vector<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

unsafe impl<T: Send, A: Allocator + Send> Send for Vector<T, A> {}

unsafe impl<T: Sync, A: Allocator + Sync> Sync for Vector<T, A> {}

#[cfg(feature = "std")]
impl<A: Allocator> std::io::Write for Vector<u8, A> {
    #[inline]
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.try_extend_from_slice(buf) {
            Ok(_) => Ok(buf.len()),
            Err(StorageError::CapacityLimit) => {
                let spare = self.free_capacity().min(buf.len());
                if spare > 0 {
                    self.extend_from_slice(&buf[..spare]);
                }
                Ok(spare)
            }
            Err(err) => Err(std::io::Error::new(std::io::ErrorKind::Other, err)),
        }
    }
}

#[cfg(feature = "zeroize")]
impl<T, A: AllocatorZeroizes> zeroize::Zeroize for Vector<T, A> {
    #[inline]
    fn zeroize(&mut self) {
        self.clear();
        self.shrink_to(0);
    }
}

#[cfg(feature = "zeroize")]
impl<T, A: AllocatorZeroizes> zeroize::ZeroizeOnDrop for Vector<T, A> {}
