//! Input packet and the four-slot acquisition batch.

use std::ops::Index;

use pumpio_packet::{PACKET_SIZE, PacketError, PacketResult, invert, masked_any, packet_from_slice};

use crate::types::{ItgArrow, ItgMenuButton, Player, PiuPanel, SensorGroup};

/// Byte offsets and field masks of the decoded (active-high) input packet.
///
/// | Byte | Contents                                               |
/// |------|--------------------------------------------------------|
/// | 0    | player-1 pad sensors for the selected group            |
/// | 1    | bit 0 test, bit 1 coin 1, bit 6 service, bit 7 clear   |
/// | 2    | player-2 pad sensors for the selected group            |
/// | 3    | bit 1 coin 2                                           |
/// | 4-7  | unused                                                 |
pub mod layout {
    /// Player-1 sensor byte.
    pub const BYTE_P1: usize = 0;
    /// Cabinet switch byte.
    pub const BYTE_CABINET: usize = 1;
    /// Player-2 sensor byte.
    pub const BYTE_P2: usize = 2;
    /// Second coin chute byte (PIU cabinets only).
    pub const BYTE_COIN_2: usize = 3;

    /// Test switch within `BYTE_CABINET`.
    pub const TEST_MASK: u8 = 0x01;
    /// First coin chute within `BYTE_CABINET`.
    pub const COIN_1_MASK: u8 = 0x02;
    /// Service switch within `BYTE_CABINET`.
    pub const SERVICE_MASK: u8 = 0x40;
    /// Clear switch within `BYTE_CABINET`.
    pub const CLEAR_MASK: u8 = 0x80;
    /// Second coin chute within `BYTE_COIN_2`.
    pub const COIN_2_MASK: u8 = 0x02;
}

/// Typed, active-high view over one received packet.
///
/// The wire presents every line active-low (pull-ups); [`from_wire`] applies
/// the single bitwise inversion, so a set bit here always means "pressed" or
/// "switch closed". Pad sensor bytes only carry the sensor group that was
/// selected on the matching sub-poll.
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

    pub fn piu_sensor(&self, side: Player, panel: PiuPanel) -> bool {
        self.get_masked(side_byte(side), panel.sensor_mask())
    }

    pub fn itg_sensor(&self, side: Player, arrow: ItgArrow) -> bool {
        self.get_masked(side_byte(side), arrow.sensor_mask())
    }

    pub fn itg_menu(&self, side: Player, button: ItgMenuButton) -> bool {
        self.get_masked(side_byte(side), button.mask())
    }

    pub fn test_switch(&self) -> bool {
        self.get_masked(layout::BYTE_CABINET, layout::TEST_MASK)
    }

    pub fn service_switch(&self) -> bool {
        self.get_masked(layout::BYTE_CABINET, layout::SERVICE_MASK)
    }

    pub fn clear_switch(&self) -> bool {
        self.get_masked(layout::BYTE_CABINET, layout::CLEAR_MASK)
    }

    pub fn coin_1(&self) -> bool {
        self.get_masked(layout::BYTE_CABINET, layout::COIN_1_MASK)
    }

    /// Second coin chute; always false on ITG cabinets.
    pub fn coin_2(&self) -> bool {
        self.get_masked(layout::BYTE_COIN_2, layout::COIN_2_MASK)
    }

    /// True if any input line at all is active.
    pub fn any_active(&self) -> bool {
        self.raw.iter().any(|b| *b != 0)
    }

    fn get_masked(&self, index: usize, mask: u8) -> bool {
        self.raw
            .get(index)
            .is_some_and(|byte| masked_any(*byte, mask))
    }
}

const fn side_byte(side: Player) -> usize {
    match side {
        Player::One => layout::BYTE_P1,
        Player::Two => layout::BYTE_P2,
    }
}

/// One full acquisition: four input packets, slot `i` captured with
/// sensor-select `i`.
///
/// A batch only ever exists complete; a failed sub-poll aborts the whole
/// cycle and no partial batch is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputBatch {
    slots: [InputPacket; SensorGroup::COUNT],
}

impl InputBatch {
    /// Byte size of a batch on the kernel-module wire (4 packets back to
    /// back).
    pub const WIRE_SIZE: usize = PACKET_SIZE * SensorGroup::COUNT;

    pub const fn new(slots: [InputPacket; SensorGroup::COUNT]) -> Self {
        Self { slots }
    }

    /// Decode a 32-byte raw batch as returned by the kernel-module backend,
    /// applying the pull-up inversion to every packet.
    pub fn from_wire_slice(buf: &[u8]) -> PacketResult<Self> {
        if buf.len() != Self::WIRE_SIZE {
            return Err(PacketError::LengthMismatch {
                expected: Self::WIRE_SIZE,
                actual: buf.len(),
            });
        }
        let mut slots = [InputPacket::default(); SensorGroup::COUNT];
        for (slot, chunk) in slots.iter_mut().zip(buf.chunks_exact(PACKET_SIZE)) {
            *slot = InputPacket::from_wire_slice(chunk)?;
        }
        Ok(Self { slots })
    }

    pub const fn get(&self, group: SensorGroup) -> &InputPacket {
        let [up, down, left, right] = &self.slots;
        match group {
            SensorGroup::Up => up,
            SensorGroup::Down => down,
            SensorGroup::Left => left,
            SensorGroup::Right => right,
        }
    }

    /// Slots paired with their sensor group, in acquisition order.
    pub fn iter(&self) -> impl Iterator<Item = (SensorGroup, &InputPacket)> {
        SensorGroup::ALL.into_iter().zip(self.slots.iter())
    }
}

impl Index<SensorGroup> for InputBatch {
    type Output = InputPacket;

    fn index(&self, group: SensorGroup) -> &InputPacket {
        self.get(group)
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
        assert!(pressed.piu_sensor(Player::One, PiuPanel::UpLeft));
        assert!(pressed.itg_sensor(Player::One, ItgArrow::Up));
        assert!(!pressed.piu_sensor(Player::Two, PiuPanel::UpLeft));
    }

    #[test]
    fn test_from_wire_slice_rejects_bad_lengths() {
        assert!(matches!(
            InputPacket::from_wire_slice(&[0u8; 7]),
            Err(PacketError::LengthMismatch {
                expected: 8,
                actual: 7,
            })
        ));
        assert!(matches!(
            InputPacket::from_wire_slice(&[0u8; 9]),
            Err(PacketError::LengthMismatch {
                expected: 8,
                actual: 9,
            })
        ));
    }

    #[test]
    fn test_cabinet_switches() {
        let mut raw = [0xFF; PACKET_SIZE];
        raw[1] = !(layout::TEST_MASK | layout::SERVICE_MASK);
        raw[3] = !layout::COIN_2_MASK;
        let packet = InputPacket::from_wire(raw);
        assert!(packet.test_switch());
        assert!(packet.service_switch());
        assert!(!packet.clear_switch());
        assert!(!packet.coin_1());
        assert!(packet.coin_2());
    }

    #[test]
    fn test_itg_menu_buttons_sit_above_arrows() {
        let mut raw = [0xFF; PACKET_SIZE];
        raw[2] = !(ItgMenuButton::Start.mask() | ItgArrow::Left.sensor_mask());
        let packet = InputPacket::from_wire(raw);
        assert!(packet.itg_menu(Player::Two, ItgMenuButton::Start));
        assert!(packet.itg_sensor(Player::Two, ItgArrow::Left));
        assert!(!packet.itg_menu(Player::One, ItgMenuButton::Start));
    }

    #[test]
    fn test_batch_from_wire_slice_splits_and_inverts() {
        let mut wire = [0xFF; InputBatch::WIRE_SIZE];
        // Activate p1 up-left in slot 0 and p2 center in slot 3.
        wire[0] = 0xFE;
        wire[26] = !PiuPanel::Center.sensor_mask();
        let batch = InputBatch::from_wire_slice(&wire).expect("valid batch");
        assert!(batch[SensorGroup::Up].piu_sensor(Player::One, PiuPanel::UpLeft));
        assert!(batch[SensorGroup::Right].piu_sensor(Player::Two, PiuPanel::Center));
        assert!(!batch[SensorGroup::Down].any_active());
        assert!(!batch[SensorGroup::Left].any_active());
    }

    #[test]
    fn test_batch_from_wire_slice_rejects_partial_batches() {
        for len in [0usize, 8, 31, 33] {
            let buf = vec![0u8; len];
            assert_eq!(
                InputBatch::from_wire_slice(&buf),
                Err(PacketError::LengthMismatch {
                    expected: InputBatch::WIRE_SIZE,
                    actual: len,
                })
            );
        }
    }

    #[test]
    fn test_batch_iter_follows_select_order() {
        let slots = SensorGroup::ALL.map(|g| {
            let mut decoded = [0u8; PACKET_SIZE];
            decoded[0] = g.select_bits();
            InputPacket::from_decoded(decoded)
        });
        let batch = InputBatch::new(slots);
        for (group, packet) in batch.iter() {
            assert_eq!(packet.as_bytes()[0], group.select_bits());
        }
    }
}
