//! Backing storage and element lifecycle for vectors.

mod buffer;
pub(crate) mod insert;
pub(crate) mod lifecycle;
pub(crate) mod utils;

pub use self::buffer::{ArrayBuffer, BufferHeader};

pub use self::utils::max_capacity;
