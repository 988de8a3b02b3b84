use core::fmt;
use core::iter::FusedIterator;
use core::ops::Range;
use core::ptr;
use core::slice;

use crate::alloc::{Allocator, Global};
use crate::storage::lifecycle::destroy_range;
use crate::storage::ArrayBuffer;

/// An iterator which moves the elements out of a [`Vector`](crate::Vector).
pub struct IntoIter<T, A: Allocator = Global> {
    remain: Range<usize>,
    buf: ArrayBuffer<T, A>,
}

impl<T, A: Allocator> IntoIter<T, A> {
    pub(super) fn new(mut buf: ArrayBuffer<T, A>) -> Self {
        let end = buf.length();
        // SAFETY: ownership of the elements moves to the iterator
        unsafe { buf.set_length(0) };
        Self {
            remain: Range { start: 0, end },
            buf,
        }
    }

    /// Access the remaining elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.as_ptr().add(self.remain.start), self.len()) }
    }

    /// Access the remaining elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len();
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr().add(self.remain.start), len) }
    }

    fn clear(&mut self) {
        let remain_len = self.len();
        if remain_len > 0 {
            let first = unsafe { self.buf.as_mut_ptr().add(self.remain.start) };
            self.remain.start = self.remain.end;
            unsafe { destroy_range(self.buf.allocator(), first, remain_len) };
        }
    }
}

impl<T, A: Allocator> AsRef<[T]> for IntoIter<T, A> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> AsMut<[T]> for IntoIter<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.remain.start;
        if index != self.remain.end {
            self.remain.start = index + 1;
            unsafe { Some(ptr::read(self.buf.as_ptr().add(index))) }
        } else {
            None
        }
    }

    #[inline]
    fn count(self) -> usize
    where
        Self: Sized,
    {
        self.len()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let mut index = self.remain.end;
        if index != self.remain.start {
            index -= 1;
            self.remain.end = index;
            unsafe { Some(ptr::read(self.buf.as_ptr().add(index))) }
        } else {
            None
        }
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {
    #[inline]
    fn len(&self) -> usize {
        self.remain.end - self.remain.start
    }
}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

unsafe impl<T: Send, A: Allocator + Send> Send for IntoIter<T, A> {}

unsafe impl<T: Sync, A: Allocator + Sync> Sync for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}
