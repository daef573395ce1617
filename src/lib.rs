//! `ptr-sync` is a small concurrency library for sharing a periodically
//! replaced, immutable value between writer threads and many reader threads.
//! A writer publishes a new value into a [`Slot`](slot::Slot); readers hold
//! cached handles that revalidate with a single relaxed flag load on the hot
//! path and only contact the slot when their cached value has been retired.
//!
//! ## Features
//!
//! - **Staleness-checked reader caches**: each published payload carries a
//!   liveness flag. A reader whose cached payload is still live skips the
//!   slot entirely, so an uncontended read costs one atomic load.
//!
//! - **Two swap strategies, one contract**: the slot's internals are chosen
//!   at the type level between a mutex-serialized swap
//!   ([`Serialized`](strategy::Serialized)) and a lock-free atomic-pointer
//!   swap ([`LockFree`](strategy::LockFree), the default). Both satisfy the
//!   identical publish/fetch contract and the same property tests.
//!
//! - **Reference-counted reclamation**: retiring a payload never frees it
//!   eagerly; the memory is released by ordinary `Arc` reference counting
//!   once the slot and every handle and in-flight reference let go.
//!
//! ```
//! use ptr_sync::handle::StrongHandle;
//! use ptr_sync::payload::Payload;
//! use ptr_sync::slot::Slot;
//!
//! let slot: Slot<u64> = Slot::new();
//! slot.publish(Payload::new(1));
//!
//! let mut handle = StrongHandle::new(&slot);
//! assert_eq!(handle.get_shared().as_deref(), Some(&1));
//! ```
pub mod handle;
pub mod payload;
pub mod slot;
pub mod strategy;
