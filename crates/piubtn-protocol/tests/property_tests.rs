//! Property-based tests for the PIUBTN packet codec.

use piubtn_protocol::{Button, InputPacket, OutputPacket, PACKET_SIZE, Player};
use proptest::prelude::*;
use pumpio_packet::invert;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Output packets are never inverted: encode then decode is the identity.
    #[test]
    fn prop_output_round_trips_bit_for_bit(raw: [u8; PACKET_SIZE]) {
        let packet = OutputPacket::from_bytes(raw);
        let reparsed = OutputPacket::from_slice(packet.as_bytes());
        prop_assert_eq!(reparsed, Ok(packet));
    }

    /// Decoding applies exactly one inversion.
    #[test]
    fn prop_input_decode_applies_one_inversion(raw: [u8; PACKET_SIZE]) {
        let direct = InputPacket::from_wire(raw);
        let doubled = InputPacket::from_wire(invert(invert(raw)));
        prop_assert_eq!(direct, doubled);
        prop_assert_eq!(direct.as_bytes(), &invert(raw));
    }

    /// A lamp update flips at most its own mask bit, for any starting state.
    #[test]
    fn prop_set_light_touches_only_its_bit(
        raw: [u8; PACKET_SIZE],
        side_idx in 0usize..2,
        button_idx in 0usize..4,
        on: bool,
    ) {
        let side = Player::ALL[side_idx];
        let button = Button::ALL[button_idx];
        let before = OutputPacket::from_bytes(raw);
        let mut after = before;
        after.set_light(side, button, on);
        prop_assert_eq!(after.light(side, button), on);
        for (pos, (a, b)) in before.as_bytes().iter().zip(after.as_bytes()).enumerate() {
            if pos == 0 {
                prop_assert_eq!(a ^ b, (a ^ b) & button.light_mask(side));
            } else {
                prop_assert_eq!(a, b);
            }
        }
    }

    /// The typed view agrees with raw mask arithmetic on the decoded byte.
    #[test]
    fn prop_pressed_matches_mask_arithmetic(raw: [u8; PACKET_SIZE]) {
        let packet = InputPacket::from_wire(raw);
        let decoded = !raw[0];
        for side in Player::ALL {
            for button in Button::ALL {
                let expected = decoded & button.input_mask(side) != 0;
                prop_assert_eq!(packet.pressed(side, button), expected);
            }
        }
    }
}
