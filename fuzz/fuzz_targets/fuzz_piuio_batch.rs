//! Fuzzes the 32-byte kernel-module batch decoder.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_piuio_batch
#![no_main]
use libfuzzer_sys::fuzz_target;
use piuio_protocol::InputBatch;

fuzz_target!(|data: &[u8]| {
    // Only exact 32-byte buffers decode; everything else must fail cleanly.
    if let Ok(batch) = InputBatch::from_wire_slice(data) {
        for (group, slot) in batch.iter() {
            // Slot lookup and iteration order must agree.
            assert_eq!(batch.get(group).as_bytes(), slot.as_bytes());
            let _ = slot.any_active();
        }
    } else {
        assert_ne!(data.len(), InputBatch::WIRE_SIZE);
    }
});
