//! Packet codec for the Andamiro PIUBTN auxiliary button board.
//!
//! Pump It Up cabinets from the Pro generation onward carry a second I/O
//! board below the monitor with four menu buttons per player (back, left,
//! right, start), each with its own lamp. Like the main pad board it is
//! polled over a vendor-specific USB control transfer (request `0xAE`): the
//! host writes an 8-byte lamp packet and reads an 8-byte switch packet back.
//!
//! ## Protocol notes
//!
//! **Single-shot polls.** The button board has no multiplexer. One
//! write+read pair returns the complete switch state; there is no
//! sensor-select field and no batch assembly.
//!
//! **Pull-up inversion.** Every input line idles at logic-1 and reads 0 when
//! active. Decoding inverts all 64 bits exactly once so the typed view is
//! active-high; outputs are written verbatim.
//!
//! **Asymmetric nibbles.** Input byte 0 puts player 1 in the low nibble,
//! output byte 0 puts player 2 there, and the buttons run in opposite order.
//! The mask tables in [`Button`] encode both layouts; nothing else in the
//! packet is board-specific.
//!
//! See `pumpio-device` for the USB transport and the session layer that
//! drives the poll.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod input;
pub mod output;
pub mod types;

pub use input::InputPacket;
pub use output::OutputPacket;
pub use types::{Button, Player};

pub use pumpio_packet::{PACKET_SIZE, PacketError, PacketResult};

/// USB vendor ID of the button board (`0x0D2F`).
pub const VENDOR_ID: u16 = 0x0D2F;
/// PIUBTN product ID.
pub const PRODUCT_ID: u16 = 0x1010;
/// Vendor control request used for both directions of the poll.
pub const CONTROL_REQUEST: u8 = 0xAE;

/// True if a USB device identity matches the PIUBTN.
pub const fn is_piubtn_device(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == VENDOR_ID && product_id == PRODUCT_ID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(VENDOR_ID, 0x0D2F);
        assert_eq!(PRODUCT_ID, 0x1010);
        assert_eq!(CONTROL_REQUEST, 0xAE);
        assert_eq!(PACKET_SIZE, 8);
    }

    #[test]
    fn test_device_matching() {
        assert!(is_piubtn_device(0x0D2F, 0x1010));
        assert!(!is_piubtn_device(0x0D2F, 0x1002));
        assert!(!is_piubtn_device(0x0547, 0x1010));
    }
}
