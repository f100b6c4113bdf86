use std::fmt;

use crate::primitives::{IntegerPrimitive, Primitive};

/// A single shared value whose every access is one full-barrier atomic
/// operation.
///
/// The wrapped value is never exposed by reference; reads and writes all go
/// through the [`Primitive`] operations. Integer instantiations additionally
/// carry the arithmetic/bitwise surface; pointer instantiations
/// (`Atomic<*mut T>`) support only load/store/swap/compare-exchange.
pub struct Atomic<T: Primitive> {
    repr: T::Repr,
}

impl<T: Primitive> Atomic<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Self {
            repr: value.into_repr(),
        }
    }

    /// Full-barrier read.
    #[inline]
    pub fn load(&self) -> T {
        T::load(&self.repr)
    }

    /// Full-barrier store.
    #[inline]
    pub fn store(&self, value: T) {
        T::store(&self.repr, value)
    }

    /// Store `value`, returning the previous value.
    #[inline]
    pub fn swap(&self, value: T) -> T {
        T::swap(&self.repr, value)
    }

    /// If the cell holds `current`, replace it with `new` and return
    /// `Ok(current)`; otherwise return `Err` carrying the value actually
    /// observed. A failure is the normal retry signal, not a fault.
    #[inline]
    pub fn compare_exchange(&self, current: T, new: T) -> Result<T, T> {
        T::compare_exchange(&self.repr, current, new)
    }

    /// Boolean form of [`Atomic::compare_exchange`].
    #[inline]
    pub fn compare_and_set(&self, current: T, new: T) -> bool {
        T::compare_exchange(&self.repr, current, new).is_ok()
    }
}

impl<T: IntegerPrimitive> Atomic<T> {
    /// Atomically add, returning the new value.
    #[inline]
    pub fn add(&self, value: T) -> T {
        T::add(&self.repr, value)
    }

    /// Atomically subtract, returning the new value.
    #[inline]
    pub fn sub(&self, value: T) -> T {
        T::sub(&self.repr, value)
    }

    /// Atomically bitwise-and, returning the new value.
    #[inline]
    pub fn and(&self, value: T) -> T {
        T::and(&self.repr, value)
    }

    /// Atomically bitwise-or, returning the new value.
    #[inline]
    pub fn or(&self, value: T) -> T {
        T::or(&self.repr, value)
    }

    /// Atomically bitwise-xor, returning the new value.
    #[inline]
    pub fn xor(&self, value: T) -> T {
        T::xor(&self.repr, value)
    }

    /// Atomically add, returning the old value.
    #[inline]
    pub fn fetch_add(&self, value: T) -> T {
        T::fetch_add(&self.repr, value)
    }

    /// Atomically subtract, returning the old value.
    #[inline]
    pub fn fetch_sub(&self, value: T) -> T {
        T::fetch_sub(&self.repr, value)
    }

    /// Atomically bitwise-and, returning the old value.
    #[inline]
    pub fn fetch_and(&self, value: T) -> T {
        T::fetch_and(&self.repr, value)
    }

    /// Atomically bitwise-or, returning the old value.
    #[inline]
    pub fn fetch_or(&self, value: T) -> T {
        T::fetch_or(&self.repr, value)
    }

    /// Atomically bitwise-xor, returning the old value.
    #[inline]
    pub fn fetch_xor(&self, value: T) -> T {
        T::fetch_xor(&self.repr, value)
    }

    /// Add one, returning the new value.
    #[inline]
    pub fn incr(&self) -> T {
        T::add(&self.repr, T::ONE)
    }

    /// Subtract one, returning the new value.
    #[inline]
    pub fn decr(&self) -> T {
        T::sub(&self.repr, T::ONE)
    }
}

impl<T: Primitive + Default> Default for Atomic<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Primitive> From<T> for Atomic<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Primitive + fmt::Debug> fmt::Debug for Atomic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Atomic").field(&self.load()).finish()
    }
}
