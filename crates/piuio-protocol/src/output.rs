//! Output packet: lamps, coin counters and the sensor-select field.

use pumpio_packet::{PACKET_SIZE, PacketResult, masked_any, packet_from_slice, set_masked};

use crate::types::{CoinCounter, ItgArrow, Player, PiuPanel, SensorGroup, TopLamp};

/// Byte offsets and field masks of the output packet.
///
/// | Byte | Contents                                              |
/// |------|-------------------------------------------------------|
/// | 0    | bits 0-1 sensor-select, bits 2-6 player-1 pad lamps   |
/// | 1    | bit 2 bass neon                                       |
/// | 2    | bits 0-1 sensor-select mirror, bits 2-6 player-2 lamps|
/// | 3    | bits 2-5 top cabinet lamps                            |
/// | 4    | coin-counter pulse bits                               |
/// | 5-7  | unused, preserved verbatim                            |
pub mod layout {
    /// Sensor-select field plus player-1 pad lamps.
    pub const BYTE_P1: usize = 0;
    /// Bass neon byte.
    pub const BYTE_NEON: usize = 1;
    /// Sensor-select mirror plus player-2 pad lamps.
    pub const BYTE_P2: usize = 2;
    /// Top cabinet lamps.
    pub const BYTE_TOP_LAMPS: usize = 3;
    /// Coin-counter pulse byte.
    pub const BYTE_COIN_COUNTERS: usize = 4;

    /// The 2-bit sensor-select field, present in both `BYTE_P1` and
    /// `BYTE_P2`. The acquisition cycle rewrites exactly these bits between
    /// sub-polls; everything else is caller state.
    pub const SENSOR_SELECT_MASK: u8 = 0x03;
    /// Bass neon bit within `BYTE_NEON`.
    pub const BASS_NEON_MASK: u8 = 0x04;
}

/// Typed view over the 8 output bytes written to the board on every
/// sub-poll.
///
/// All lamp state is caller-supplied and held constant across the four
/// sub-polls of one acquisition cycle; only the sensor-select field is
/// rewritten in between. The packet is transmitted exactly as encoded
/// (outputs are never inverted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputPacket {
    raw: [u8; PACKET_SIZE],
}

impl OutputPacket {
    /// An all-dark packet: no lamps, counters idle, sensor group 0.
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn from_bytes(raw: [u8; PACKET_SIZE]) -> Self {
        Self { raw }
    }

    /// Decode previously encoded bytes. No inversion is applied; the output
    /// direction is written and read back verbatim.
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

    /// Sensor group currently encoded in the select field.
    pub fn sensor_group(&self) -> SensorGroup {
        SensorGroup::from_select_bits(self.byte(layout::BYTE_P1))
    }

    /// Rewrite the sensor-select field (byte 0 and its byte-2 mirror),
    /// leaving every other bit untouched.
    pub fn set_sensor_group(&mut self, group: SensorGroup) {
        for index in [layout::BYTE_P1, layout::BYTE_P2] {
            if let Some(byte) = self.raw.get_mut(index) {
                *byte = (*byte & !layout::SENSOR_SELECT_MASK) | group.select_bits();
            }
        }
    }

    pub fn with_sensor_group(mut self, group: SensorGroup) -> Self {
        self.set_sensor_group(group);
        self
    }

    pub fn piu_pad_lamp(&self, side: Player, panel: PiuPanel) -> bool {
        self.get_masked(side_byte(side), panel.lamp_mask())
    }

    pub fn set_piu_pad_lamp(&mut self, side: Player, panel: PiuPanel, on: bool) {
        self.set_bits(side_byte(side), panel.lamp_mask(), on);
    }

    pub fn itg_pad_lamp(&self, side: Player, arrow: ItgArrow) -> bool {
        self.get_masked(side_byte(side), arrow.lamp_mask())
    }

    pub fn set_itg_pad_lamp(&mut self, side: Player, arrow: ItgArrow, on: bool) {
        self.set_bits(side_byte(side), arrow.lamp_mask(), on);
    }

    pub fn top_lamp(&self, lamp: TopLamp) -> bool {
        self.get_masked(layout::BYTE_TOP_LAMPS, lamp.mask())
    }

    pub fn set_top_lamp(&mut self, lamp: TopLamp, on: bool) {
        self.set_bits(layout::BYTE_TOP_LAMPS, lamp.mask(), on);
    }

    pub fn bass_neon(&self) -> bool {
        self.get_masked(layout::BYTE_NEON, layout::BASS_NEON_MASK)
    }

    pub fn set_bass_neon(&mut self, on: bool) {
        self.set_bits(layout::BYTE_NEON, layout::BASS_NEON_MASK, on);
    }

    /// Coin counters advance while their pulse bit is held high; the caller
    /// owns pulse timing.
    pub fn coin_counter(&self, counter: CoinCounter) -> bool {
        self.get_masked(layout::BYTE_COIN_COUNTERS, counter.mask())
    }

    pub fn set_coin_counter(&mut self, counter: CoinCounter, on: bool) {
        self.set_bits(layout::BYTE_COIN_COUNTERS, counter.mask(), on);
    }

    fn byte(&self, index: usize) -> u8 {
        self.raw.get(index).copied().unwrap_or(0)
    }

    fn get_masked(&self, index: usize, mask: u8) -> bool {
        masked_any(self.byte(index), mask)
    }

    fn set_bits(&mut self, index: usize, mask: u8, on: bool) {
        if let Some(byte) = self.raw.get_mut(index) {
            set_masked(byte, mask, on);
        }
    }
}

const fn side_byte(side: Player) -> usize {
    match side {
        Player::One => layout::BYTE_P1,
        Player::Two => layout::BYTE_P2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_packet_is_all_zero() {
        assert_eq!(OutputPacket::new().to_bytes(), [0u8; PACKET_SIZE]);
    }

    #[test]
    fn test_sensor_select_written_to_both_bytes() {
        let mut packet = OutputPacket::new();
        packet.set_sensor_group(SensorGroup::Right);
        let bytes = packet.to_bytes();
        assert_eq!(bytes[0] & 0x03, 3);
        assert_eq!(bytes[2] & 0x03, 3);
        assert_eq!(packet.sensor_group(), SensorGroup::Right);
    }

    #[test]
    fn test_sensor_select_leaves_lamp_bits_alone() {
        let mut packet = OutputPacket::new();
        packet.set_piu_pad_lamp(Player::One, PiuPanel::Center, true);
        packet.set_piu_pad_lamp(Player::Two, PiuPanel::DownRight, true);
        for group in SensorGroup::ALL {
            packet.set_sensor_group(group);
            assert!(packet.piu_pad_lamp(Player::One, PiuPanel::Center));
            assert!(packet.piu_pad_lamp(Player::Two, PiuPanel::DownRight));
            assert_eq!(packet.sensor_group(), group);
        }
    }

    #[test]
    fn test_piu_lamp_bit_positions() {
        let mut packet = OutputPacket::new();
        packet.set_piu_pad_lamp(Player::One, PiuPanel::UpLeft, true);
        assert_eq!(packet.to_bytes()[0], 0x04);
        packet.set_piu_pad_lamp(Player::One, PiuPanel::UpLeft, false);
        packet.set_piu_pad_lamp(Player::Two, PiuPanel::DownRight, true);
        assert_eq!(packet.to_bytes()[2], 0x40);
    }

    #[test]
    fn test_top_lamps_and_neon() {
        let mut packet = OutputPacket::new();
        packet.set_bass_neon(true);
        packet.set_top_lamp(TopLamp::Left1, true);
        packet.set_top_lamp(TopLamp::Right2, true);
        let bytes = packet.to_bytes();
        assert_eq!(bytes[1], 0x04);
        assert_eq!(bytes[3], 0x20 | 0x04);
        assert!(packet.bass_neon());
        packet.set_top_lamp(TopLamp::Left1, false);
        assert!(!packet.top_lamp(TopLamp::Left1));
        assert!(packet.top_lamp(TopLamp::Right2));
    }

    #[test]
    fn test_coin_counter_pulse_byte() {
        let mut packet = OutputPacket::new();
        packet.set_coin_counter(CoinCounter::One, true);
        packet.set_coin_counter(CoinCounter::Two, true);
        assert_eq!(packet.to_bytes()[4], 0x03);
        packet.set_coin_counter(CoinCounter::One, false);
        assert!(!packet.coin_counter(CoinCounter::One));
        assert!(packet.coin_counter(CoinCounter::Two));
    }

    #[test]
    fn test_reserved_bytes_round_trip_verbatim() {
        let raw = [0x00, 0x00, 0x00, 0x00, 0x00, 0xDE, 0xAD, 0xBF];
        let packet = OutputPacket::from_bytes(raw);
        assert_eq!(packet.to_bytes(), raw);
        let reparsed = OutputPacket::from_slice(&raw).expect("valid length");
        assert_eq!(reparsed, packet);
    }
}
