use std::mem::{self, MaybeUninit};
use std::ptr;

use crossbeam_utils::CachePadded;
use thiserror::Error;
use tracing::{debug, trace};

use crate::tagged::{AtomicTaggedPtr, TaggedPtr};

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue is empty")]
    Empty,
}

struct Node<T> {
    value: MaybeUninit<T>,
    next: AtomicTaggedPtr<Node<T>>,
}

impl<T> Node<T> {
    fn alloc(value: MaybeUninit<T>) -> *mut Node<T> {
        Box::into_raw(Box::new(Node {
            value,
            next: AtomicTaggedPtr::new(TaggedPtr::null()),
        }))
    }
}

/// Unbounded lock-free MPMC FIFO (Michael & Scott).
///
/// `head` always references a node whose value has already been consumed
/// (the current sentinel); `tail` references the last node or lags one link
/// behind it. Both are tagged words mutated only via compare-and-swap, and
/// every pointer-changing swap bumps the tag, so a snapshot taken before a
/// node was unlinked, freed, and reallocated cannot match afterwards.
///
/// Any number of producers and consumers may call [`enqueue`] and
/// [`dequeue`] concurrently without external locks. No operation blocks or
/// sleeps; a failed CAS retries. There is deliberately no size query and no
/// peek: both are inherently racy on this structure.
///
/// [`enqueue`]: LockFreeQueue::enqueue
/// [`dequeue`]: LockFreeQueue::dequeue
pub struct LockFreeQueue<T> {
    head: CachePadded<AtomicTaggedPtr<Node<T>>>,
    tail: CachePadded<AtomicTaggedPtr<Node<T>>>,
}

// Safety: a value moves in through enqueue and out through exactly one
// winning dequeue CAS, so T: Send suffices; the queue keeps no thread-affine
// state of its own.
unsafe impl<T: Send> Send for LockFreeQueue<T> {}
unsafe impl<T: Send> Sync for LockFreeQueue<T> {}

impl<T> LockFreeQueue<T> {
    /// Create an empty queue holding a single sentinel node.
    pub fn new() -> Self {
        let sentinel = Node::alloc(MaybeUninit::uninit());
        Self {
            head: CachePadded::new(AtomicTaggedPtr::new(TaggedPtr::new(sentinel))),
            tail: CachePadded::new(AtomicTaggedPtr::new(TaggedPtr::new(sentinel))),
        }
    }

    /// Append a value. Always succeeds; capacity is unbounded.
    pub fn enqueue(&self, value: T) {
        let node = Node::alloc(MaybeUninit::new(value));
        loop {
            let tail = self.tail.load();
            let next = unsafe { (*tail.ptr()).next.load() };
            if tail != self.tail.load() {
                continue;
            }
            if next.is_null() {
                // True tail: link the new node behind it.
                let link = TaggedPtr::with_tag(node, next.tag().wrapping_add(1));
                if unsafe { &(*tail.ptr()).next }.compare_and_swap(next, link) {
                    // Best-effort swing; a failure means another thread
                    // already moved the shared tail past us.
                    self.tail
                        .compare_and_swap(tail, TaggedPtr::with_tag(node, tail.tag().wrapping_add(1)));
                    return;
                }
            } else {
                // Lagging tail: help it forward and retry.
                trace!("enqueue helping a lagging tail");
                self.tail.compare_and_swap(
                    tail,
                    TaggedPtr::with_tag(next.ptr(), tail.tag().wrapping_add(1)),
                );
            }
        }
    }

    /// Remove the oldest value, or report that the queue is empty.
    ///
    /// Never blocks: emptiness is an expected outcome, not a fault.
    pub fn try_dequeue(&self) -> Result<T, QueueError> {
        loop {
            let head = self.head.load();
            let tail = self.tail.load();
            let next = unsafe { (*head.ptr()).next.load() };
            if head != self.head.load() {
                continue;
            }
            if head.ptr() == tail.ptr() {
                if next.is_null() {
                    return Err(QueueError::Empty);
                }
                // Tail lags behind a linked node: help it forward.
                trace!("dequeue helping a lagging tail");
                self.tail.compare_and_swap(
                    tail,
                    TaggedPtr::with_tag(next.ptr(), tail.tag().wrapping_add(1)),
                );
                continue;
            }

            // Copy before the swing: once head moves past `next`, a faster
            // consumer may unlink and free that node.
            let value = unsafe { ptr::read((*next.ptr()).value.as_ptr()) };
            let swung = TaggedPtr::with_tag(next.ptr(), head.tag().wrapping_add(1));
            if self.head.compare_and_swap(head, swung) {
                // The unlinked sentinel is now exclusively ours; its value
                // slot was spent when it was dequeued (or never written).
                unsafe { drop(Box::from_raw(head.ptr())) };
                return Ok(value);
            }
            // Lost the race: the queue still owns this value.
            mem::forget(value);
        }
    }

    /// [`LockFreeQueue::try_dequeue`], flattened to an `Option`.
    #[inline]
    pub fn dequeue(&self) -> Option<T> {
        self.try_dequeue().ok()
    }
}

impl<T> Default for LockFreeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for LockFreeQueue<T> {
    fn drop(&mut self) {
        let mut drained = 0usize;
        while self.try_dequeue().is_ok() {
            drained += 1;
        }
        if drained > 0 {
            debug!(drained, "queue dropped with values still linked");
        }
        // Only the final sentinel remains; its value slot is already spent.
        let sentinel = self.head.load();
        unsafe { drop(Box::from_raw(sentinel.ptr())) };
    }
}
