use core::mem::MaybeUninit;
use core::ptr;

use super::lifecycle::{construct_at, destroy_range};
use crate::alloc::Allocator;

/// Fills a gap of uninitialized slots which is followed by `tail_count`
/// already relocated values. If dropped before completion (when a value
/// producer panics), both the inserted values and the tail are destroyed.
pub struct Inserter<'a, T, A: Allocator> {
    buf: &'a mut [MaybeUninit<T>],
    alloc: &'a A,
    pos: usize,
    cap: usize,
}

impl<'a, T, A: Allocator> Inserter<'a, T, A> {
    #[inline]
    pub fn new_with_tail(data: &'a mut [MaybeUninit<T>], alloc: &'a A, tail_count: usize) -> Self {
        let cap = data.len() - tail_count;
        Self {
            buf: data,
            alloc,
            pos: 0,
            cap,
        }
    }

    #[inline]
    pub fn push(&mut self, val: T) {
        assert!(self.pos < self.cap);
        unsafe { construct_at(self.alloc, self.buf[self.pos].as_mut_ptr(), val) };
        self.pos += 1;
    }

    #[inline]
    pub fn push_iter(&mut self, iter: &mut impl Iterator<Item = T>) {
        while self.pos < self.cap {
            if let Some(item) = iter.next() {
                self.push(item);
            } else {
                break;
            }
        }
    }

    #[inline]
    pub fn push_repeat(&mut self, val: &T, len: usize)
    where
        T: Clone,
    {
        assert!(self.cap - self.pos >= len);
        for _ in 0..len {
            self.push(val.clone());
        }
    }

    #[inline]
    pub fn push_slice(&mut self, data: &[T])
    where
        T: Clone,
    {
        assert!(self.cap - self.pos >= data.len());
        for item in data {
            self.push(item.clone());
        }
    }

    // Successfully complete the insertion. Returns the number of
    // inserted entries plus the number of tail entries (equal to
    // the number of initialized slots in the buffer).
    #[inline]
    pub fn complete(mut self) -> usize {
        let count = self.pos;
        let tail_count = self.buf.len() - self.cap;
        if count < self.cap && tail_count > 0 {
            // shift tail entries back over the unfilled gap
            let range = self.buf[count..].as_mut_ptr_range();
            unsafe {
                ptr::copy(range.start.add(self.cap - count), range.start, tail_count);
            }
        }
        self.buf = &mut [];
        count + tail_count
    }
}

impl<T, A: Allocator> Drop for Inserter<'_, T, A> {
    #[inline]
    fn drop(&mut self) {
        if !self.buf.is_empty() {
            let head = self.buf.as_mut_ptr().cast::<T>();
            unsafe {
                // destroy the inserted items
                destroy_range(self.alloc, head, self.pos);
                // destroy the tail items
                destroy_range(self.alloc, head.add(self.cap), self.buf.len() - self.cap);
            }
        }
    }
}
