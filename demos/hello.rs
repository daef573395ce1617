//! Publish a message into a slot and read it back through both handle kinds.

use std::env;

use ptr_sync::handle::{StrongHandle, WeakHandle};
use ptr_sync::payload::Payload;
use ptr_sync::slot::Slot;

fn main() {
    // Take the message from the command line, default to an empty string
    let message = env::args().nth(1).unwrap_or_default();

    // Publish it into a fresh slot
    let slot: Slot<String> = Slot::new();
    slot.publish(Payload::new(message));

    // Read it back through a strong handle
    let mut strong = StrongHandle::new(&slot);
    match strong.get_raw() {
        Some(value) => println!("strong={value}"),
        None => println!("strong=<none>"),
    }

    // And through a weak handle
    let mut weak = WeakHandle::new(&slot);
    match weak.get_shared() {
        Some(value) => println!("weak={}", &*value),
        None => println!("weak=<none>"),
    }
}
