//! Fuzzes the output packet views: arbitrary bytes in, field probes and
//! select/light rewrites out.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_output_packets
#![no_main]
use libfuzzer_sys::fuzz_target;
use piuio_protocol::{self as piuio, CoinCounter, SensorGroup, TopLamp};
use piubtn_protocol as piubtn;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut output) = piuio::OutputPacket::from_slice(data) {
        let _ = output.bass_neon();
        for lamp in TopLamp::ALL {
            let _ = output.top_lamp(lamp);
        }
        let _ = output.coin_counter(CoinCounter::One);
        let _ = output.coin_counter(CoinCounter::Two);

        // Rewriting the select field must leave every caller bit alone and
        // mirror the field on both select bytes.
        let before = output.to_bytes();
        output.set_sensor_group(SensorGroup::Right);
        assert_eq!(output.sensor_group(), SensorGroup::Right);
        let after = output.to_bytes();
        assert_eq!(before[0] & !0x03, after[0] & !0x03);
        assert_eq!(before[2] & !0x03, after[2] & !0x03);
        assert_eq!(after[0] & 0x03, after[2] & 0x03);
        assert_eq!(before[1], after[1]);
        assert_eq!(&before[3..], &after[3..]);
    }

    if let Ok(mut output) = piubtn::OutputPacket::from_slice(data) {
        for side in piubtn::Player::ALL {
            for button in piubtn::Button::ALL {
                let _ = output.light(side, button);
            }
        }

        // A light set must read back, a cleared one must not, and only the
        // light byte may change.
        let before = output.to_bytes();
        output.set_light(piubtn::Player::One, piubtn::Button::Start, true);
        assert!(output.light(piubtn::Player::One, piubtn::Button::Start));
        output.set_light(piubtn::Player::One, piubtn::Button::Start, false);
        assert!(!output.light(piubtn::Player::One, piubtn::Button::Start));
        assert_eq!(&before[1..], &output.to_bytes()[1..]);
    }
});
