//! The `handle` module provides the reader-side caches over a
//! [`Slot`](crate::slot::Slot).
//!
//! Both handle kinds remember the payload they last fetched and revalidate
//! it on every access: while the cached payload is still live the slot is
//! not contacted at all (the fast path), otherwise the handle refetches and
//! replaces its cache (the slow path). A handle is single-threaded state;
//! create one per thread, or per loop, as the access pattern dictates.

use std::ops::Deref;
use std::sync::{Arc, Weak};

use crate::payload::Payload;
use crate::slot::{Slot, SlotError};
use crate::strategy::{LockFree, SwapStrategy};

/// An owned strong reference to a published value.
///
/// Keeps the underlying payload alive for as long as it exists. The value
/// read through it never changes; [`ValueRef::is_current`] tells whether it
/// is still the slot's published value.
pub struct ValueRef<T>(Arc<Payload<T>>);

impl<T> ValueRef<T> {
    /// Whether the referenced payload is still the slot's current one.
    pub fn is_current(&self) -> bool {
        self.0.is_live()
    }
}

impl<T> Deref for ValueRef<T> {
    type Target = T;

    /// Dereferences the wrapped value for easier access
    fn deref(&self) -> &T {
        self.0.value()
    }
}

impl<T> Clone for ValueRef<T> {
    fn clone(&self) -> Self {
        ValueRef(Arc::clone(&self.0))
    }
}

/// A per-caller cache holding a strong reference to the last fetched
/// payload.
///
/// The cached strong reference keeps even a retired payload alive until the
/// next access notices the retirement and refreshes. Callers that revisit
/// the handle rarely and want retired payloads freed promptly should prefer
/// a [`WeakHandle`].
pub struct StrongHandle<'s, T, S: SwapStrategy<T> = LockFree<T>> {
    /// Slot this handle is bound to; the slot must outlive the handle
    slot: &'s Slot<T, S>,
    /// Last fetched payload, `None` while the slot is unpublished
    cached: Option<Arc<Payload<T>>>,
}

impl<'s, T, S: SwapStrategy<T>> StrongHandle<'s, T, S> {
    /// Create a handle bound to `slot`, seeding the cache with one fetch.
    pub fn new(slot: &'s Slot<T, S>) -> Self {
        StrongHandle {
            slot,
            cached: slot.fetch(),
        }
    }

    /// Refetch from the slot when the cache is absent or retired.
    #[inline]
    fn revalidate(&mut self) {
        let stale = match &self.cached {
            Some(payload) => !payload.is_live(),
            None => true,
        };
        if stale {
            self.cached = self.slot.fetch();
        }
    }

    /// Return a strong reference to the current value, or `None` if the
    /// slot has nothing published.
    #[inline]
    pub fn get_shared(&mut self) -> Option<ValueRef<T>> {
        self.revalidate();
        self.cached.clone().map(ValueRef)
    }

    /// Return a borrowed view of the current value, or `None` if the slot
    /// has nothing published.
    ///
    /// The borrow is tied to the handle, so the payload backing it cannot
    /// be released while the view is in use.
    #[inline]
    pub fn get_raw(&mut self) -> Option<&T> {
        self.revalidate();
        self.cached.as_deref().map(Payload::value)
    }
}

/// A per-caller cache holding a weak reference to the last fetched payload.
///
/// Unlike a [`StrongHandle`], a weak cache never keeps a retired payload's
/// reference count non-zero just because a reader cached it long ago, so
/// retired payloads are freed promptly even under infrequent reader
/// traffic. The price is an upgrade on every access.
pub struct WeakHandle<'s, T, S: SwapStrategy<T> = LockFree<T>> {
    /// Slot this handle is bound to; the slot must outlive the handle
    slot: &'s Slot<T, S>,
    /// Weak reference to the last fetched payload
    cached: Weak<Payload<T>>,
}

impl<'s, T, S: SwapStrategy<T>> WeakHandle<'s, T, S> {
    /// Create a handle bound to `slot`, seeding the cache with one fetch.
    pub fn new(slot: &'s Slot<T, S>) -> Self {
        WeakHandle {
            slot,
            cached: slot.fetch().as_ref().map(Arc::downgrade).unwrap_or_default(),
        }
    }

    /// Upgrade the cached reference and return the current value; on a
    /// failed upgrade or a retired payload, refetch from the slot first.
    /// Returns `None` if the slot has nothing published.
    pub fn get_shared(&mut self) -> Option<ValueRef<T>> {
        let payload = match self.cached.upgrade() {
            Some(payload) if payload.is_live() => Some(payload),
            _ => {
                let fresh = self.slot.fetch();
                self.cached = fresh.as_ref().map(Arc::downgrade).unwrap_or_default();
                fresh
            }
        };
        payload.map(ValueRef)
    }

    /// Upgrade to a [`StrongHandle`] bound to the same slot, seeded from a
    /// fresh fetch.
    ///
    /// Fails with [`SlotError::ExpiredReference`] when the slot holds no
    /// payload at the moment of the upgrade (never published, or torn
    /// down), mirroring the classic weak-pointer lock failure.
    pub fn lock(&self) -> Result<StrongHandle<'s, T, S>, SlotError> {
        let handle = StrongHandle::new(self.slot);
        if handle.cached.is_some() {
            Ok(handle)
        } else {
            Err(SlotError::ExpiredReference)
        }
    }
}
