//! Swap strategies.
//!
//! A [`Slot`](crate::slot::Slot) stores its published payload behind one of
//! two interchangeable internals chosen at the type level: a mutex-serialized
//! swap or a lock-free atomic-pointer swap. Both satisfy the same contract;
//! the choice only trades simplicity against reader/writer blocking.
//!
//! Note: the strategy implementations are sealed to avoid committing to a
//! specific internal interface.

use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::payload::Payload;

/// The swap strategy controls how a slot replaces and hands out its current
/// payload. [`Serialized`] guards both operations with one mutex and is
/// strictly linearizable; [`LockFree`] never blocks either side.
#[allow(private_bounds)]
pub trait SwapStrategy<T>: SwapStrategySealed<T> {}

/// Sealed strategy interface used by the slot.
pub(crate) trait SwapStrategySealed<T>: Sized {
    /// Create an empty strategy holding no payload.
    fn empty() -> Self;

    /// Create a strategy pre-loaded with an initial payload.
    fn seeded(payload: Arc<Payload<T>>) -> Self {
        let strategy = Self::empty();
        strategy.publish(payload);
        strategy
    }

    /// Install `new` as the current payload, retiring the previous one
    /// unless it is the same allocation.
    fn publish(&self, new: Arc<Payload<T>>);

    /// Return a strong reference to the current payload, or `None` if
    /// nothing has been published.
    fn fetch(&self) -> Option<Arc<Payload<T>>>;
}

/// Mutex-serialized strategy.
///
/// One lock covers the stored reference and the liveness-flag update, so
/// every publish and every fetch is a short critical section. A fetch that
/// races a publish blocks for the duration of the pointer swap.
pub struct Serialized<T> {
    current: Mutex<Option<Arc<Payload<T>>>>,
}

impl<T> SwapStrategySealed<T> for Serialized<T> {
    fn empty() -> Self {
        Serialized {
            current: Mutex::new(None),
        }
    }

    fn publish(&self, new: Arc<Payload<T>>) {
        let mut current = self.current.lock();
        if let Some(old) = current.as_ref() {
            // republishing the identical payload must not retire it
            if !Arc::ptr_eq(old, &new) {
                old.retire();
            }
        }
        *current = Some(new);
    }

    #[inline]
    fn fetch(&self) -> Option<Arc<Payload<T>>> {
        self.current.lock().clone()
    }
}

impl<T> SwapStrategy<T> for Serialized<T> {}

/// Lock-free strategy.
///
/// The stored reference lives in an [`AtomicPtr`] holding one strong count.
/// Readers announce themselves through an in-flight counter before loading
/// the pointer and cloning a strong count from it; a publisher swaps the
/// pointer and then waits for the counter to drain before releasing the
/// retired payload's count. A reader caught between its load and its clone
/// therefore always pins the payload it loaded.
///
/// Fetches never block. A publish may briefly spin while readers are inside
/// that two-instruction window (load plus count clone); it never waits on a
/// reader holding a fetched payload.
///
/// The liveness flag is cleared with relaxed ordering after the swap, so a
/// concurrent reader may observe a retired payload as live for one access.
/// That read is still safe (the value is immutable and not yet freed); the
/// reader merely skips one refresh.
pub struct LockFree<T> {
    /// Currently published payload; owns one strong count, null when empty
    current: AtomicPtr<Payload<T>>,
    /// Readers currently between their pointer load and their count clone
    in_flight: AtomicUsize,
}

unsafe impl<T: Send + Sync> Send for LockFree<T> {}
unsafe impl<T: Send + Sync> Sync for LockFree<T> {}

impl<T> SwapStrategySealed<T> for LockFree<T> {
    fn empty() -> Self {
        LockFree {
            current: AtomicPtr::new(ptr::null_mut()),
            in_flight: AtomicUsize::new(0),
        }
    }

    fn publish(&self, new: Arc<Payload<T>>) {
        let raw = Arc::into_raw(new) as *mut Payload<T>;
        let old = self.current.swap(raw, Ordering::SeqCst);
        if old.is_null() {
            return;
        }

        // Wait for readers that loaded `old` before the swap to finish
        // cloning their strong count. Readers only stay in flight across a
        // load and a count increment, so this drains quickly.
        while self.in_flight.load(Ordering::SeqCst) != 0 {
            std::hint::spin_loop();
        }

        // The swap returned the slot's strong count on the outgoing payload.
        let outgoing = unsafe { Arc::from_raw(old) };
        if !ptr::eq(old, raw) {
            outgoing.retire();
        }
        // On a republish of the same allocation, dropping `outgoing` simply
        // rebalances the surplus count the swap returned.
    }

    #[inline]
    fn fetch(&self) -> Option<Arc<Payload<T>>> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let raw = self.current.load(Ordering::SeqCst);
        let payload = if raw.is_null() {
            None
        } else {
            // The in-flight counter keeps a concurrent publisher from
            // releasing this payload until the clone below completes.
            unsafe {
                Arc::increment_strong_count(raw);
                Some(Arc::from_raw(raw as *const Payload<T>))
            }
        };
        self.in_flight.fetch_sub(1, Ordering::Release);
        payload
    }
}

impl<T> SwapStrategy<T> for LockFree<T> {}

impl<T> Drop for LockFree<T> {
    fn drop(&mut self) {
        let raw = *self.current.get_mut();
        if !raw.is_null() {
            drop(unsafe { Arc::from_raw(raw) });
        }
    }
}
