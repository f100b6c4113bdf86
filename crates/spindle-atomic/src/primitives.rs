use std::sync::atomic::{
    AtomicI16, AtomicI32, AtomicI64, AtomicI8, AtomicIsize, AtomicPtr, AtomicU16, AtomicU32,
    AtomicU64, AtomicU8, AtomicUsize, Ordering,
};

mod sealed {
    pub trait Sealed {}
}

/// A value type backed by a hardware atomic of the same width.
///
/// Every operation is indivisible with respect to every thread and carries
/// sequentially consistent (full-barrier) semantics for that one operation;
/// no cross-variable ordering is implied. Operations never block or
/// allocate, and the only reported failure is the documented
/// `compare_exchange` outcome.
///
/// The trait is sealed. A type without a matching hardware atomic cannot
/// implement it, so unsupported widths are rejected when the program is
/// compiled, never at runtime.
pub trait Primitive: Copy + Eq + sealed::Sealed {
    /// The `std::sync::atomic` representation for this width.
    type Repr: Send + Sync;

    /// Wrap an initial value into its atomic representation.
    fn into_repr(self) -> Self::Repr;

    /// Full-barrier read.
    fn load(slot: &Self::Repr) -> Self;

    /// Full-barrier store.
    fn store(slot: &Self::Repr, value: Self);

    /// Store `value`, returning the previous value.
    fn swap(slot: &Self::Repr, value: Self) -> Self;

    /// If the slot holds `current`, replace it with `new` and return
    /// `Ok(current)`; otherwise leave it unchanged and return `Err` carrying
    /// the value actually observed.
    fn compare_exchange(slot: &Self::Repr, current: Self, new: Self) -> Result<Self, Self>;
}

/// Atomic arithmetic and bitwise operations, integers only.
///
/// The `fetch_*` family returns the value the slot held before the
/// operation; the bare-named family returns the value it holds after.
/// All ops wrap on overflow.
pub trait IntegerPrimitive: Primitive {
    /// The unit for `incr`/`decr` shorthands.
    const ONE: Self;

    fn fetch_add(slot: &Self::Repr, value: Self) -> Self;
    fn fetch_sub(slot: &Self::Repr, value: Self) -> Self;
    fn fetch_and(slot: &Self::Repr, value: Self) -> Self;
    fn fetch_or(slot: &Self::Repr, value: Self) -> Self;
    fn fetch_xor(slot: &Self::Repr, value: Self) -> Self;

    fn add(slot: &Self::Repr, value: Self) -> Self;
    fn sub(slot: &Self::Repr, value: Self) -> Self;
    fn and(slot: &Self::Repr, value: Self) -> Self;
    fn or(slot: &Self::Repr, value: Self) -> Self;
    fn xor(slot: &Self::Repr, value: Self) -> Self;
}

macro_rules! integer_primitive {
    ($($int:ty => $repr:ty),* $(,)?) => {$(
        impl sealed::Sealed for $int {}

        impl Primitive for $int {
            type Repr = $repr;

            #[inline]
            fn into_repr(self) -> Self::Repr {
                <$repr>::new(self)
            }

            #[inline]
            fn load(slot: &Self::Repr) -> Self {
                slot.load(Ordering::SeqCst)
            }

            #[inline]
            fn store(slot: &Self::Repr, value: Self) {
                slot.store(value, Ordering::SeqCst)
            }

            #[inline]
            fn swap(slot: &Self::Repr, value: Self) -> Self {
                slot.swap(value, Ordering::SeqCst)
            }

            #[inline]
            fn compare_exchange(
                slot: &Self::Repr,
                current: Self,
                new: Self,
            ) -> Result<Self, Self> {
                slot.compare_exchange(current, new, Ordering::SeqCst, Ordering::SeqCst)
            }
        }

        impl IntegerPrimitive for $int {
            const ONE: Self = 1;

            #[inline]
            fn fetch_add(slot: &Self::Repr, value: Self) -> Self {
                slot.fetch_add(value, Ordering::SeqCst)
            }

            #[inline]
            fn fetch_sub(slot: &Self::Repr, value: Self) -> Self {
                slot.fetch_sub(value, Ordering::SeqCst)
            }

            #[inline]
            fn fetch_and(slot: &Self::Repr, value: Self) -> Self {
                slot.fetch_and(value, Ordering::SeqCst)
            }

            #[inline]
            fn fetch_or(slot: &Self::Repr, value: Self) -> Self {
                slot.fetch_or(value, Ordering::SeqCst)
            }

            #[inline]
            fn fetch_xor(slot: &Self::Repr, value: Self) -> Self {
                slot.fetch_xor(value, Ordering::SeqCst)
            }

            #[inline]
            fn add(slot: &Self::Repr, value: Self) -> Self {
                slot.fetch_add(value, Ordering::SeqCst).wrapping_add(value)
            }

            #[inline]
            fn sub(slot: &Self::Repr, value: Self) -> Self {
                slot.fetch_sub(value, Ordering::SeqCst).wrapping_sub(value)
            }

            #[inline]
            fn and(slot: &Self::Repr, value: Self) -> Self {
                slot.fetch_and(value, Ordering::SeqCst) & value
            }

            #[inline]
            fn or(slot: &Self::Repr, value: Self) -> Self {
                slot.fetch_or(value, Ordering::SeqCst) | value
            }

            #[inline]
            fn xor(slot: &Self::Repr, value: Self) -> Self {
                slot.fetch_xor(value, Ordering::SeqCst) ^ value
            }
        }
    )*};
}

integer_primitive! {
    i8 => AtomicI8,
    u8 => AtomicU8,
    i16 => AtomicI16,
    u16 => AtomicU16,
    i32 => AtomicI32,
    u32 => AtomicU32,
    i64 => AtomicI64,
    u64 => AtomicU64,
    isize => AtomicIsize,
    usize => AtomicUsize,
}

impl<T> sealed::Sealed for *mut T {}

// Pointers carry no arithmetic surface: `*mut T` implements `Primitive`
// only, so the fetch-and-op family is unreachable for them.
impl<T> Primitive for *mut T {
    type Repr = AtomicPtr<T>;

    #[inline]
    fn into_repr(self) -> Self::Repr {
        AtomicPtr::new(self)
    }

    #[inline]
    fn load(slot: &Self::Repr) -> Self {
        slot.load(Ordering::SeqCst)
    }

    #[inline]
    fn store(slot: &Self::Repr, value: Self) {
        slot.store(value, Ordering::SeqCst)
    }

    #[inline]
    fn swap(slot: &Self::Repr, value: Self) -> Self {
        slot.swap(value, Ordering::SeqCst)
    }

    #[inline]
    fn compare_exchange(slot: &Self::Repr, current: Self, new: Self) -> Result<Self, Self> {
        slot.compare_exchange(current, new, Ordering::SeqCst, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_forms_return_the_old_value() {
        let slot = 10u32.into_repr();
        assert_eq!(u32::fetch_add(&slot, 5), 10);
        assert_eq!(u32::load(&slot), 15);
        assert_eq!(u32::fetch_sub(&slot, 3), 15);
        assert_eq!(u32::load(&slot), 12);
    }

    #[test]
    fn bare_forms_return_the_new_value() {
        let slot = 10u32.into_repr();
        assert_eq!(u32::add(&slot, 5), 15);
        assert_eq!(u32::sub(&slot, 3), 12);
        assert_eq!(u32::and(&slot, 0b1100), 0b1100);
        assert_eq!(u32::or(&slot, 0b0001), 0b1101);
        assert_eq!(u32::xor(&slot, 0b1111), 0b0010);
    }

    #[test]
    fn compare_exchange_reports_the_observed_value() {
        let slot = 7i64.into_repr();
        assert_eq!(i64::compare_exchange(&slot, 7, 9), Ok(7));
        assert_eq!(i64::compare_exchange(&slot, 7, 11), Err(9));
        assert_eq!(i64::load(&slot), 9);
    }

    #[test]
    fn pointer_swap_and_cas() {
        let mut a = 1u8;
        let mut b = 2u8;
        let slot = (&mut a as *mut u8).into_repr();

        let prev = <*mut u8 as Primitive>::swap(&slot, &mut b);
        assert_eq!(prev, &mut a as *mut u8);
        assert!(<*mut u8>::compare_exchange(&slot, &mut b, &mut a).is_ok());
        assert!(<*mut u8>::compare_exchange(&slot, &mut b, &mut a).is_err());
    }
}
