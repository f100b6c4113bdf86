//! Lock-free queueing for spindle
//!
//! - `tagged`: a pointer and a generation tag packed into one CAS-able word
//! - `queue`: unbounded Michael-Scott MPMC FIFO built on tagged pointers

pub mod queue;
pub mod tagged;

pub use queue::{LockFreeQueue, QueueError};
pub use tagged::{AtomicTaggedPtr, TaggedPtr};
