//! Output packet: per-button lamps.

use pumpio_packet::{PACKET_SIZE, PacketResult, masked_any, packet_from_slice, set_masked};

use crate::types::{Button, Player};

/// Byte offsets of the output packet.
///
/// | Byte | Contents                                               |
/// |------|--------------------------------------------------------|
/// | 0    | button lamps, player 2 low nibble, player 1 high nibble|
/// | 1-7  | unused, preserved verbatim                             |
///
/// Within each nibble the order from the low bit is start, right, left,
/// back. Bit positions come from [`Button::light_mask`].
pub mod layout {
    /// Button lamp byte.
    pub const BYTE_LIGHTS: usize = 0;
}

/// Typed view over the 8 output bytes written to the board on every poll.
///
/// The packet is transmitted exactly as encoded (outputs are never
/// inverted). There is no sensor-select field; the button board reports all
/// switches in a single read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputPacket {
    raw: [u8; PACKET_SIZE],
}

impl OutputPacket {
    /// An all-dark packet.
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn from_bytes(raw: [u8; PACKET_SIZE]) -> Self {
        Self { raw }
    }

    /// Decode previously encoded bytes. No inversion is applied.
    pub fn from_slice(buf: &[u8]) -> PacketResult<Self> {
        Ok(Self {
            raw: packet_from_slice(buf)?,
        })
    }

    pub const fn as_bytes(&self) -> &[u8; PACKET_SIZE] {
        &self.raw
    }

    pub const fn to_bytes(self) -> [u8; PACKET_SIZE] {
        self.raw
    }

    pub fn light(&self, side: Player, button: Button) -> bool {
        masked_any(self.byte(layout::BYTE_LIGHTS), button.light_mask(side))
    }

    pub fn set_light(&mut self, side: Player, button: Button, on: bool) {
        if let Some(byte) = self.raw.get_mut(layout::BYTE_LIGHTS) {
            set_masked(byte, button.light_mask(side), on);
        }
    }

    /// True if any of the eight lamps is lit.
    pub fn any_lit(&self) -> bool {
        self.byte(layout::BYTE_LIGHTS) != 0
    }

    fn byte(&self, index: usize) -> u8 {
        self.raw.get(index).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_packet_is_all_zero() {
        assert_eq!(OutputPacket::new().to_bytes(), [0u8; PACKET_SIZE]);
        assert!(!OutputPacket::new().any_lit());
    }

    #[test]
    fn test_light_bit_positions() {
        let mut packet = OutputPacket::new();
        packet.set_light(Player::Two, Button::Start, true);
        assert_eq!(packet.to_bytes()[0], 0x01);
        packet.set_light(Player::One, Button::Back, true);
        assert_eq!(packet.to_bytes()[0], 0x81);
    }

    #[test]
    fn test_set_and_clear_are_local() {
        let mut packet = OutputPacket::new();
        packet.set_light(Player::One, Button::Start, true);
        packet.set_light(Player::One, Button::Left, true);
        packet.set_light(Player::One, Button::Start, false);
        assert!(!packet.light(Player::One, Button::Start));
        assert!(packet.light(Player::One, Button::Left));
    }

    #[test]
    fn test_reserved_bytes_round_trip_verbatim() {
        let raw = [0x00, 0x5A, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC3];
        let packet = OutputPacket::from_bytes(raw);
        assert_eq!(packet.to_bytes(), raw);
        let reparsed = OutputPacket::from_slice(&raw).expect("valid length");
        assert_eq!(reparsed, packet);
    }
}
