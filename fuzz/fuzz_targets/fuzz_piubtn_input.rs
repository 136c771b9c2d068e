//! Fuzzes the PIUBTN input packet decoder and the pressed-button iterator.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_piubtn_input
#![no_main]
use libfuzzer_sys::fuzz_target;
use piubtn_protocol::{Button, InputPacket, Player, is_piubtn_device};

fuzz_target!(|data: &[u8]| {
    if let Ok(packet) = InputPacket::from_wire_slice(data) {
        // The iterator and the per-button probe must agree.
        let listed: Vec<(Player, Button)> = packet.pressed_buttons().collect();
        for side in Player::ALL {
            for button in Button::ALL {
                assert_eq!(
                    packet.pressed(side, button),
                    listed.contains(&(side, button))
                );
            }
        }
        // any_active covers every input line, buttons included.
        if !listed.is_empty() {
            assert!(packet.any_active());
        }
    }

    // Device identification with arbitrary VID/PID.
    if data.len() >= 4 {
        let vid = u16::from_le_bytes([data[0], data[1]]);
        let pid = u16::from_le_bytes([data[2], data[3]]);
        let _ = is_piubtn_device(vid, pid);
    }
});
