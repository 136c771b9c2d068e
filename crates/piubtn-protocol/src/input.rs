//! Input packet: menu button switches.

use pumpio_packet::{PACKET_SIZE, PacketResult, invert, masked_any, packet_from_slice};

use crate::types::{Button, Player};

/// Byte offsets of the decoded (active-high) input packet.
///
/// | Byte | Contents                                                 |
/// |------|----------------------------------------------------------|
/// | 0    | button switches, player 1 low nibble, player 2 high      |
/// | 1-7  | unused                                                   |
///
/// Within each nibble the order from the low bit is back, left, right,
/// start. Bit positions come from [`Button::input_mask`]. Note the nibble
/// assignment is the reverse of the output lamps.
pub mod layout {
    /// Button switch byte.
    pub const BYTE_BUTTONS: usize = 0;
}

/// Typed, active-high view over one received packet.
///
/// The wire presents every line active-low (pull-ups); [`from_wire`] applies
/// the single bitwise inversion, so a set bit here always means "pressed".
/// One packet carries the complete switch state; there is no multiplexing on
/// the button board.
///
/// [`from_wire`]: InputPacket::from_wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputPacket {
    raw: [u8; PACKET_SIZE],
}

impl InputPacket {
    /// Decode raw wire bytes, applying the pull-up inversion.
    pub fn from_wire(raw: [u8; PACKET_SIZE]) -> Self {
        Self { raw: invert(raw) }
    }

    /// Decode a raw wire buffer, rejecting any length but 8.
    pub fn from_wire_slice(buf: &[u8]) -> PacketResult<Self> {
        Ok(Self::from_wire(packet_from_slice(buf)?))
    }

    /// Wrap bytes that are already active-high (capture replay, tests).
    pub const fn from_decoded(raw: [u8; PACKET_SIZE]) -> Self {
        Self { raw }
    }

    /// Decoded (active-high) bytes.
    pub const fn as_bytes(&self) -> &[u8; PACKET_SIZE] {
        &self.raw
    }

    pub fn pressed(&self, side: Player, button: Button) -> bool {
        self.raw
            .get(layout::BYTE_BUTTONS)
            .is_some_and(|byte| masked_any(*byte, button.input_mask(side)))
    }

    /// True if any input line at all is active.
    pub fn any_active(&self) -> bool {
        self.raw.iter().any(|b| *b != 0)
    }

    /// Buttons currently held, in (side, button) order.
    pub fn pressed_buttons(&self) -> impl Iterator<Item = (Player, Button)> + '_ {
        Player::ALL.into_iter().flat_map(move |side| {
            Button::ALL
                .into_iter()
                .filter(move |button| self.pressed(side, *button))
                .map(move |button| (side, button))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wire_inverts_once() {
        // All lines idle on the wire (pull-ups) decode to all-zero.
        let idle = InputPacket::from_wire([0xFF; PACKET_SIZE]);
        assert_eq!(idle.as_bytes(), &[0u8; PACKET_SIZE]);
        assert!(!idle.any_active());

        // A grounded line (0 on the wire) decodes active.
        let mut raw = [0xFF; PACKET_SIZE];
        raw[0] = 0xFE;
        let pressed = InputPacket::from_wire(raw);
        assert!(pressed.pressed(Player::One, Button::Back));
        assert!(!pressed.pressed(Player::Two, Button::Back));
    }

    #[test]
    fn test_from_wire_slice_rejects_bad_lengths() {
        for len in [0usize, 7, 9, 32] {
            let buf = vec![0u8; len];
            assert!(InputPacket::from_wire_slice(&buf).is_err(), "len {len}");
        }
    }

    #[test]
    fn test_nibble_assignment() {
        let mut raw = [0xFF; PACKET_SIZE];
        raw[0] = !(Button::Start.input_mask(Player::One) | Button::Left.input_mask(Player::Two));
        let packet = InputPacket::from_wire(raw);
        assert!(packet.pressed(Player::One, Button::Start));
        assert!(packet.pressed(Player::Two, Button::Left));
        assert!(!packet.pressed(Player::Two, Button::Start));
        assert!(!packet.pressed(Player::One, Button::Left));
    }

    #[test]
    fn test_pressed_buttons_iterates_in_side_order() {
        let mut raw = [0xFF; PACKET_SIZE];
        raw[0] = !(Button::Back.input_mask(Player::Two) | Button::Right.input_mask(Player::One));
        let packet = InputPacket::from_wire(raw);
        let held: Vec<_> = packet.pressed_buttons().collect();
        assert_eq!(
            held,
            vec![(Player::One, Button::Right), (Player::Two, Button::Back)]
        );
    }
}
