//! The `slot` module is the core component of the `ptr-sync` library,
//! providing a [`Slot`] struct holding the single published payload.
//!
//! A `Slot` is the point of truth for one piece of shared state: writer
//! threads replace its payload with [`Slot::publish`], and reader threads
//! observe it through the cached handles in the [`handle`](crate::handle)
//! module. Replacing the payload retires the previous one, which is then
//! freed by ordinary reference counting once the last handle or in-flight
//! reference releases it.

use std::marker::PhantomData;
use std::sync::Arc;

use thiserror::Error;

use crate::payload::Payload;
use crate::strategy::{LockFree, SwapStrategy};

/// `SlotError` enumerates the failures surfaced by this library.
///
/// Absence of data is not an error: an empty slot answers fetches with
/// `None`, because "nothing published yet" is an expected state.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SlotError {
    /// A weak-to-strong handle upgrade found the slot holding no live
    /// payload (never published, or already torn down).
    #[error("expired reference: slot holds no live payload")]
    ExpiredReference,
}

/// `Slot` is a concurrency primitive that lets writer threads periodically
/// replace a shared immutable value while many reader threads access it
/// with minimal synchronization overhead.
///
/// The strategy parameter `S` selects the internals: [`LockFree`] (the
/// default) swaps an atomic pointer and never blocks either side;
/// [`Serialized`](crate::strategy::Serialized) guards the swap with a mutex.
/// Both present the identical contract.
///
/// Handles borrow the slot, so the borrow checker enforces that a slot
/// outlives every handle bound to it.
pub struct Slot<T, S: SwapStrategy<T> = LockFree<T>> {
    /// Strategy holding the currently published payload
    strategy: S,
    _payload: PhantomData<T>,
}

impl<T, S: SwapStrategy<T>> Slot<T, S> {
    /// Create an empty slot. Fetches answer `None` until the first publish.
    pub fn new() -> Self {
        Slot {
            strategy: S::empty(),
            _payload: PhantomData,
        }
    }

    /// Create a slot already holding `payload`.
    pub fn with_initial(payload: Arc<Payload<T>>) -> Self {
        Slot {
            strategy: S::seeded(payload),
            _payload: PhantomData,
        }
    }

    /// Install `payload` as the currently published value.
    ///
    /// The previously published payload, if any, has its liveness flag
    /// cleared as part of this call; its memory is released whenever the
    /// last outstanding reference drops. Republishing the payload the slot
    /// already holds is a no-op: it stays live and its reference count is
    /// unchanged.
    ///
    /// Concurrent publishes linearize; the last swap determines the
    /// externally observable state. Callers needing a specific publish
    /// order must serialize their own calls.
    pub fn publish(&self, payload: Arc<Payload<T>>) {
        self.strategy.publish(payload);
    }

    /// Return the currently published payload, or `None` if nothing has
    /// been published. Reserved for the handle types; readers go through
    /// a [`StrongHandle`](crate::handle::StrongHandle) or
    /// [`WeakHandle`](crate::handle::WeakHandle) rather than fetching
    /// directly.
    #[inline]
    pub(crate) fn fetch(&self) -> Option<Arc<Payload<T>>> {
        self.strategy.fetch()
    }
}

impl<T, S: SwapStrategy<T>> Default for Slot<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::{StrongHandle, WeakHandle};
    use crate::strategy::Serialized;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::thread;

    #[test]
    fn empty_slot_fetches_none() {
        let slot: Slot<i32> = Slot::new();
        assert!(slot.fetch().is_none());
    }

    #[test]
    fn publish_retires_only_the_previous_payload() {
        let slot: Slot<u64> = Slot::new();
        let first = Payload::new(1);
        let second = Payload::new(2);

        slot.publish(Arc::clone(&first));
        slot.publish(Arc::clone(&second));
        assert!(!first.is_live());
        assert!(second.is_live());

        let third = Payload::new(3);
        slot.publish(Arc::clone(&third));
        assert!(!second.is_live());
        assert!(third.is_live());
        assert!(Arc::ptr_eq(&slot.fetch().unwrap(), &third));
    }

    #[test]
    fn end_to_end_int_scenario() {
        let slot: Slot<i32> = Slot::new();
        assert!(slot.fetch().is_none());

        let mut handle = StrongHandle::new(&slot);
        assert!(handle.get_shared().is_none());

        slot.publish(Payload::new(1));
        assert_eq!(*handle.get_shared().unwrap(), 1);

        thread::scope(|scope| {
            scope.spawn(|| slot.publish(Payload::new(2)));
        });

        assert_eq!(*handle.get_shared().unwrap(), 2);
        let mut fresh = StrongHandle::new(&slot);
        assert_eq!(*fresh.get_shared().unwrap(), 2);
    }

    /// One writer publishing an increasing counter, several readers each
    /// asserting the observed value never decreases and eventually lands
    /// on the final published value.
    fn stress<S: SwapStrategy<u64> + Sync>() {
        const PUBLISHES: u64 = 2_000;
        const READERS: usize = 4;

        let slot: Slot<u64, S> = Slot::with_initial(Payload::new(0));

        thread::scope(|scope| {
            for _ in 0..READERS {
                scope.spawn(|| {
                    let mut rng = StdRng::from_entropy();
                    let mut handle = StrongHandle::new(&slot);
                    let mut last = 0u64;
                    loop {
                        // mix the two read paths; both revalidate the cache
                        let value = if rng.gen::<bool>() {
                            *handle.get_shared().unwrap()
                        } else {
                            *handle.get_raw().unwrap()
                        };
                        assert!(value >= last, "observed {value} after {last}");
                        last = value;
                        if value == PUBLISHES {
                            break;
                        }
                    }
                });
            }

            scope.spawn(|| {
                for i in 1..=PUBLISHES {
                    slot.publish(Payload::new(i));
                }
            });
        });

        assert_eq!(*slot.fetch().unwrap().value(), PUBLISHES);
    }

    #[test]
    fn stress_lock_free() {
        stress::<LockFree<u64>>();
    }

    #[test]
    fn stress_serialized() {
        stress::<Serialized<u64>>();
    }

    proptest! {
        #[test]
        fn handles_read_latest_after_each_publish(
            values in proptest::collection::vec(0u64..1_000, 1..50)
        ) {
            let slot: Slot<u64> = Slot::new();
            let mut strong = StrongHandle::new(&slot);
            let mut weak = WeakHandle::new(&slot);

            for value in values {
                slot.publish(Payload::new(value));
                prop_assert_eq!(*strong.get_shared().unwrap(), value);
                prop_assert_eq!(*weak.get_shared().unwrap(), value);
            }
        }
    }
}
