//! The `payload` module provides the immutable, liveness-flagged value wrapper
//! shared between a [`Slot`](crate::slot::Slot) and its reader handles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An immutable value paired with a liveness flag.
///
/// A `Payload` is constructed live and directly into an [`Arc`], so a given
/// payload identity can never be duplicated or moved out of shared ownership.
/// The slot retires a payload when a newer one is published; the flag only
/// ever transitions live to not-live. The wrapped value itself never changes,
/// so a handle that reads through a just-retired payload still reads a valid
/// (merely outdated) value.
pub struct Payload<T> {
    /// Whether this payload is still the slot's currently published value
    live: AtomicBool,
    /// The wrapped value, set once at construction
    value: T,
}

impl<T> Payload<T> {
    /// Create a new live payload wrapping `value`.
    pub fn new(value: T) -> Arc<Self> {
        Arc::new(Payload {
            live: AtomicBool::new(true),
            value,
        })
    }

    /// Whether this payload is still the currently published one.
    ///
    /// Relaxed load: under the lock-free strategy this may briefly read
    /// `true` after a concurrent publish already swapped the slot. The
    /// payload's memory is still held by the outgoing reference at that
    /// point, so the reader at worst makes one extra "still current"
    /// decision before its next access refreshes.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Relaxed)
    }

    /// Borrow the wrapped value. Does not check liveness; callers decide
    /// whether a retired value is acceptable before trusting it as current.
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Mark this payload as no longer published. Monotonic: nothing ever
    /// stores `true` after construction.
    #[inline]
    pub(crate) fn retire(&self) {
        self.live.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructed_live() {
        let payload = Payload::new(42u64);
        assert!(payload.is_live());
        assert_eq!(*payload.value(), 42);
    }

    #[test]
    fn retirement_is_monotonic() {
        let payload = Payload::new("state".to_string());
        payload.retire();
        assert!(!payload.is_live());

        // retiring again is a no-op, never a revival
        payload.retire();
        assert!(!payload.is_live());
        assert_eq!(payload.value(), "state");
    }
}
