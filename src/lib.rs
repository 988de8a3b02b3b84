//! A growable contiguous array with allocator-driven element lifecycle,
//! random-access cursors and a cached sortedness flag.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
struct _ReadmeDoctests;

#[cfg(test)]
#[macro_use]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc as alloc_crate;

#[cfg(feature = "tracing")]
macro_rules! storage_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "flex_vector::storage", $($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! storage_trace {
    ($($arg:tt)*) => {};
}

pub mod alloc;

pub mod capacity;

pub(crate) mod error;

pub mod storage;

pub mod vector;

pub use self::error::{StorageError, UpdateError, VectorError};

pub use self::vector::Vector;
