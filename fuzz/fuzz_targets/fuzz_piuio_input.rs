//! Fuzzes the PIUIO input packet decoder, its typed accessors, and device
//! identification.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_piuio_input
#![no_main]
use libfuzzer_sys::fuzz_target;
use piuio_protocol::{
    InputPacket, ItgArrow, ItgMenuButton, PiuPanel, Player, is_piuio_device,
};

fuzz_target!(|data: &[u8]| {
    // Must never panic on arbitrary bytes or lengths.
    if let Ok(packet) = InputPacket::from_wire_slice(data) {
        for side in Player::ALL {
            for panel in PiuPanel::ALL {
                let _ = packet.piu_sensor(side, panel);
            }
            for arrow in ItgArrow::ALL {
                let _ = packet.itg_sensor(side, arrow);
            }
            for button in ItgMenuButton::ALL {
                let _ = packet.itg_menu(side, button);
            }
        }
        let _ = packet.test_switch();
        let _ = packet.service_switch();
        let _ = packet.clear_switch();
        let _ = packet.coin_1();
        let _ = packet.coin_2();
        let _ = packet.any_active();

        // Decoding is the pull-up inversion and nothing else.
        if let Ok(wire) = pumpio_packet::packet_from_slice(data) {
            assert_eq!(packet.as_bytes(), &pumpio_packet::invert(wire));
        }
    }

    // Device identification with arbitrary VID/PID.
    if data.len() >= 4 {
        let vid = u16::from_le_bytes([data[0], data[1]]);
        let pid = u16::from_le_bytes([data[2], data[3]]);
        let _ = is_piuio_device(vid, pid);
    }
});
