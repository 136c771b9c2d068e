//! Packet codec for the Andamiro PIUIO dance-pad I/O board.
//!
//! The PIUIO sits between a Pump It Up / In The Groove cabinet and the game
//! PC and is polled over a vendor-specific USB control transfer (request
//! `0xAE`): the host writes an 8-byte output packet (lamps, coin counters)
//! and reads an 8-byte input packet (pad sensors, cabinet switches) back.
//!
//! ## Protocol notes
//!
//! **Multiplexed sensors.** Each pad panel has four independent pressure
//! sensors, but one input packet only reports one *sensor group* (UP, DOWN,
//! LEFT, RIGHT edge of the panels). The host selects the group through a
//! 2-bit sensor-select field at bits 0-1 of output byte 0, mirrored at
//! bits 0-1 of byte 2, and must perform four write+read sub-polls (select
//! values 0..3, in that order) to assemble one complete [`InputBatch`].
//! Reordering the sub-polls is unsound: the select field is shared hardware
//! state, not an address.
//!
//! **Pull-up inversion.** Every input line idles at logic-1 and reads 0 when
//! active. Decoding inverts all 64 bits exactly once so the typed view is
//! active-high throughout; outputs are written verbatim.
//!
//! **Game layouts.** The same wire format serves two cabinet generations.
//! Pump It Up pads have five panels per player ([`PiuPanel`]); In The Groove
//! pads have four arrows plus per-player menu buttons ([`ItgArrow`],
//! [`ItgMenuButton`]). Both are accessor views over the same packet types;
//! the select field, cabinet switches and lamp bytes are shared.
//!
//! See `pumpio-device` for the USB and kernel-module transports and the
//! session layer that drives the cycle. The kernel-module backend returns
//! all four packets in one 32-byte read ([`InputBatch::from_wire_slice`]).

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod input;
pub mod output;
pub mod types;

pub use input::{InputBatch, InputPacket};
pub use output::OutputPacket;
pub use types::{CoinCounter, ItgArrow, ItgMenuButton, Player, PiuPanel, SensorGroup, TopLamp};

pub use pumpio_packet::{PACKET_SIZE, PacketError, PacketResult};

/// Andamiro USB vendor ID (`0x0547`).
pub const VENDOR_ID: u16 = 0x0547;
/// PIUIO product ID.
pub const PRODUCT_ID: u16 = 0x1002;
/// Vendor control request used for both directions of the poll.
pub const CONTROL_REQUEST: u8 = 0xAE;

/// True if a USB device identity matches the PIUIO.
pub const fn is_piuio_device(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == VENDOR_ID && product_id == PRODUCT_ID
}
