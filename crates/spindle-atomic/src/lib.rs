//! Full-barrier atomic operations for spindle
//!
//! - `primitives`: sealed mapping from fixed-width integers and raw pointers
//!   to their native hardware atomics, with the complete operation set
//! - `cell`: `Atomic<T>`, a single shared value accessed only through those
//!   operations

pub mod cell;
pub mod primitives;

pub use cell::Atomic;
pub use primitives::{IntegerPrimitive, Primitive};
